//! Error types for assistant providers.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors a provider can return. [`Assistant`](crate::Assistant) treats all
/// of them as "try the next tier".
#[derive(Debug, Error)]
pub enum Error {
    /// API key not configured.
    #[error("credentials not found: {0} is not set")]
    CredentialsNotFound(String),

    /// The provider answered HTTP 429.
    #[error("rate limit exceeded, please try again later")]
    RateLimited,

    /// Provider API error.
    #[error("provider API error: {0}")]
    ProviderApi(String),

    /// Request failed.
    #[error("request failed: {0}")]
    Request(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats_correctly() {
        let err = Error::CredentialsNotFound("SAGAR_GATEWAY_API_KEY".to_string());
        assert_eq!(
            err.to_string(),
            "credentials not found: SAGAR_GATEWAY_API_KEY is not set"
        );
        assert_eq!(
            Error::RateLimited.to_string(),
            "rate limit exceeded, please try again later"
        );
    }

    #[test]
    fn error_from_serde_json() {
        let json_err: serde_json::Error = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
