use thiserror::Error;

/// Failure while calling the completion service or reading its answer.
///
/// Callers treat every variant the same way; the split only keeps the message readable.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not decode completion response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RelayError>;
