//! Document loading errors

use thiserror::Error;

/// Fixed user-facing message for transport failures
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load documentation";

/// Errors raised while fetching or converting a document.
///
/// Neither kind is fatal: the viewer turns both into a `Failed` state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocumentError {
    /// The source answered with a non-success status.
    #[error("Failed to load documentation")]
    Load {
        /// Transport status (HTTP status, or 404 for a missing file)
        status: u16,
    },

    /// Anything else raised while fetching or decoding; message kept verbatim.
    #[error("{0}")]
    Runtime(String),
}

impl DocumentError {
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime(message.into())
    }

    /// Whether this error came from a non-success transport status
    pub fn is_load(&self) -> bool {
        matches!(self, Self::Load { .. })
    }
}

impl From<reqwest::Error> for DocumentError {
    fn from(err: reqwest::Error) -> Self {
        Self::Runtime(err.to_string())
    }
}
