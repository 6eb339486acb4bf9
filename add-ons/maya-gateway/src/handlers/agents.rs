//! `POST /api/maya` and `POST /api/zoey`: persona agent actions.

use crate::error::ApiError;
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use maya_core::{ChatError, PersonaRequest};

pub(crate) async fn maya(
    State(state): State<AppState>,
    body: Result<Json<PersonaRequest>, JsonRejection>,
) -> Response {
    handle(&state, "maya", body)
}

pub(crate) async fn zoey(
    State(state): State<AppState>,
    body: Result<Json<PersonaRequest>, JsonRejection>,
) -> Response {
    handle(&state, "zoey", body)
}

fn handle(
    state: &AppState,
    agent: &str,
    body: Result<Json<PersonaRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!(target: "maya::agents", agent, "unreadable persona body: {}", rejection);
            return ApiError::persona(ChatError::MissingInput("body".to_string())).into_response();
        }
    };

    let Some(persona) = state.agents.get(agent) else {
        return ApiError::persona(ChatError::InternalError(format!("agent {} not registered", agent)))
            .into_response();
    };

    tracing::info!(
        target: "maya::agents",
        agent,
        action = request.action.as_deref().unwrap_or("<none>"),
        mode = request.mode.as_deref().unwrap_or("<none>"),
        "persona request"
    );

    match persona.handle(&request, state.agent_api_key.as_deref()) {
        Ok(reply) => Json(reply).into_response(),
        Err(err) => ApiError::persona(err).into_response(),
    }
}
