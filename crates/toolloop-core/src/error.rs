//! Errors surfaced by a model gateway.
//!
//! Every variant is fatal to the current run: the orchestration loop
//! propagates it to the caller without retrying.

use thiserror::Error;

/// Failure of a single gateway call.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The endpoint could not be reached, timed out, or answered 5xx.
    #[error("model gateway unavailable: {0}")]
    Unavailable(String),

    /// The provider rejected the call with HTTP 429.
    #[error("model gateway rate limited: {0}")]
    RateLimited(String),

    /// The provider answered with a non-retryable error status.
    #[error("model gateway returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The reply could not be decoded into a message.
    #[error("invalid model gateway response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    /// Whether a caller-side retry policy may try the same call again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::Unavailable(_) | GatewayError::RateLimited(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_variants() {
        assert!(GatewayError::Unavailable("connect refused".into()).is_retryable());
        assert!(GatewayError::RateLimited("slow down".into()).is_retryable());
        assert!(!GatewayError::InvalidResponse("no choices".into()).is_retryable());
        assert!(!GatewayError::Api {
            status: 401,
            body: "bad key".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_display_includes_status() {
        let err = GatewayError::Api {
            status: 400,
            body: "invalid_request".into(),
        };
        assert_eq!(err.to_string(), "model gateway returned 400: invalid_request");
    }
}
