//! Error kinds shared by the core, the model router and the gateway.

use thiserror::Error;

/// Failure of one chat turn or persona request.
#[derive(Debug, Error)]
pub enum ChatError {
    /// A required request field is absent or empty.
    #[error("missing input: {0}")]
    MissingInput(String),
    /// The requested mode is not in the registry.
    #[error("invalid mode: {0}")]
    InvalidMode(String),
    /// The persona endpoint received an unknown action.
    #[error("invalid action: {0}")]
    InvalidAction(String),
    /// The model stream failed, or a structured call returned nothing usable.
    #[error("upstream model failure: {0}")]
    UpstreamModelFailure(String),
    /// Configuration could not be loaded or a required secret is absent.
    #[error("configuration error: {0}")]
    Config(String),
    /// Anything else that went wrong while handling the request.
    #[error("internal error: {0}")]
    InternalError(String),
}

impl ChatError {
    /// Input-validation errors are the caller's fault; everything else is ours.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingInput(_) | Self::InvalidMode(_) | Self::InvalidAction(_)
        )
    }

    /// HTTP-equivalent status code for this error kind.
    pub fn status_class(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        Self::UpstreamModelFailure(format!("malformed JSON: {}", err))
    }
}

impl From<config::ConfigError> for ChatError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for chat operations.
pub type ChatResult<T> = Result<T, ChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_400() {
        assert_eq!(ChatError::MissingInput("message".into()).status_class(), 400);
        assert_eq!(ChatError::InvalidMode("x".into()).status_class(), 400);
        assert_eq!(ChatError::InvalidAction("x".into()).status_class(), 400);
    }

    #[test]
    fn everything_else_maps_to_500() {
        assert_eq!(ChatError::UpstreamModelFailure("boom".into()).status_class(), 500);
        assert_eq!(ChatError::InternalError("boom".into()).status_class(), 500);
        assert_eq!(ChatError::Config("boom".into()).status_class(), 500);
    }

    #[test]
    fn bad_json_is_an_upstream_failure() {
        let err: ChatError = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err().into();
        assert!(matches!(err, ChatError::UpstreamModelFailure(_)));
    }
}
