//! Per-request addresses supplied by the host log layer.

/// Client addresses of one request, as known to the host server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestAddresses {
    /// Peer address of the connection. May be a proxy.
    pub client_ip: String,
    /// Effective user-agent address, after any proxy header handling.
    pub useragent_ip: String,
    /// Resolved host name of the client, if a lookup was done and succeeded.
    pub remote_host: Option<String>,
}

impl RequestAddresses {
    /// Request with a single address and no proxy or host name.
    pub fn direct(ip: &str) -> RequestAddresses {
        RequestAddresses {
            client_ip: ip.to_string(),
            useragent_ip: ip.to_string(),
            remote_host: None,
        }
    }

    /// Host name when resolved, else the connection address.
    pub fn remote_host_or_ip(&self) -> &str {
        self.remote_host.as_deref().unwrap_or(&self.client_ip)
    }
}
