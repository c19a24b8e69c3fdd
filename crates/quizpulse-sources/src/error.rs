//! Fetch error helpers.

pub use quizpulse_core::error::{FetchError, PayloadKind};

/// Classify a reqwest failure for `payload`.
pub(crate) fn from_reqwest(payload: PayloadKind, err: reqwest::Error, timeout_secs: u64) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            payload,
            secs: timeout_secs,
        }
    } else if err.is_decode() {
        FetchError::Decode {
            payload,
            message: err.to_string(),
        }
    } else {
        FetchError::Network {
            payload,
            message: err.to_string(),
        }
    }
}
