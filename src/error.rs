//! Error types for address classification.

use thiserror::Error;

/// Outcome of a failed [`classify`](crate::processing::classify) call.
///
/// Neither variant is fatal. The masking layer turns both into a pass-through
/// of the original text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    /// Input is not an IP literal at all, usually an unresolved host name.
    #[error("not an IP address literal")]
    NotAnAddress,

    /// Input looked like an address or mask but could not be parsed.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
}

impl ClassifyError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        ClassifyError::InvalidInput {
            reason: reason.into(),
        }
    }
}
