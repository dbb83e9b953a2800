use colored::Colorize;
use log_ipmask::config::{Config, ENV_CONFIG};
use log_ipmask::logfile::LineFilter;
use std::error::Error;
use std::io::{self, BufWriter};

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let config_file = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(ENV_CONFIG).ok());
    let config = Config::load(config_file.as_deref())?;

    // stdout carries the filtered log, so a broken logging setup must not stop the run
    if let Err(e) = log4rs::init_file(&config.log_config, Default::default()) {
        eprintln!("ipmask: logging disabled, {}: {e}", config.log_config);
    }
    log::info!(
        "#Start main() mode={:?} mask={:?} default_mask={:?}",
        config.mode,
        config.mask,
        config.default_mask
    );
    log::debug!("Loaded config {config:?}");

    let service = config.service();
    let filter = LineFilter::new(&service, &config);
    let stats = filter.filter_stream(io::stdin().lock(), BufWriter::new(io::stdout().lock()))?;

    log::info!(
        "#End main() lines={} masked={}",
        stats.lines.to_string().on_blue(),
        stats.masked.to_string().on_green()
    );
    Ok(())
}
