//! Maps core errors to `{ "error": ... }` responses. Details stay in the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use maya_core::ChatError;

/// Which endpoint family the error is reported from; each has its own wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Surface {
    Chat,
    Persona,
}

#[derive(Debug)]
pub(crate) struct ApiError {
    status: StatusCode,
    message: &'static str,
}

impl ApiError {
    pub(crate) fn new(surface: Surface, err: &ChatError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let message = match (surface, err) {
            (Surface::Chat, ChatError::MissingInput(_)) => "Message is required",
            (Surface::Persona, ChatError::MissingInput(_)) => "Missing required parameter",
            (_, ChatError::InvalidMode(_)) => "Invalid mode",
            (_, ChatError::InvalidAction(_)) => "Invalid action",
            (Surface::Persona, ChatError::Config(_)) => "API key is not configured",
            (Surface::Chat, _) => "Failed to get response",
            (Surface::Persona, _) => "Internal server error",
        };

        if status.is_server_error() {
            tracing::error!(target: "maya::chat", ?surface, error = %err, "request failed");
        } else {
            tracing::warn!(target: "maya::chat", ?surface, error = %err, "request rejected");
        }

        Self { status, message }
    }

    pub(crate) fn chat(err: ChatError) -> Self {
        Self::new(Surface::Chat, &err)
    }

    pub(crate) fn persona(err: ChatError) -> Self {
        Self::new(Surface::Persona, &err)
    }

    #[cfg(test)]
    pub(crate) fn status(&self) -> StatusCode {
        self.status
    }

    #[cfg(test)]
    pub(crate) fn message(&self) -> &'static str {
        self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_messages() {
        let e = ApiError::chat(ChatError::MissingInput("message".into()));
        assert_eq!((e.status(), e.message()), (StatusCode::BAD_REQUEST, "Message is required"));
        let e = ApiError::chat(ChatError::InvalidMode("x".into()));
        assert_eq!((e.status(), e.message()), (StatusCode::BAD_REQUEST, "Invalid mode"));
        let e = ApiError::chat(ChatError::UpstreamModelFailure("secret detail".into()));
        assert_eq!(
            (e.status(), e.message()),
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to get response")
        );
    }

    #[test]
    fn persona_messages() {
        let e = ApiError::persona(ChatError::Config("no key".into()));
        assert_eq!(
            (e.status(), e.message()),
            (StatusCode::INTERNAL_SERVER_ERROR, "API key is not configured")
        );
        let e = ApiError::persona(ChatError::InvalidAction("dance".into()));
        assert_eq!((e.status(), e.message()), (StatusCode::BAD_REQUEST, "Invalid action"));
        let e = ApiError::persona(ChatError::InternalError("boom".into()));
        assert_eq!(
            (e.status(), e.message()),
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        );
    }
}
