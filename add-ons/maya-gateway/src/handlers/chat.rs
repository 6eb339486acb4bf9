//! `POST /api/chat`: one conversational turn.
//!
//! Canned and workout replies go out as a single text body. Model replies
//! stream: chunked modes as `text/event-stream`, raw modes as plain text.

use crate::error::ApiError;
use crate::AppState;
use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use futures_util::stream::StreamExt;
use maya_core::{ChatError, ChatReply, ChatRequest, Presentation, SegmentStream};

pub(crate) async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let request_id = uuid::Uuid::new_v4();
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!(target: "maya::chat", %request_id, "unreadable chat body: {}", rejection);
            return ApiError::chat(ChatError::MissingInput("body".to_string())).into_response();
        }
    };

    tracing::info!(
        target: "maya::chat",
        %request_id,
        mode = request.mode.as_deref().unwrap_or("<none>"),
        history = request.history.as_ref().map_or(0, Vec::len),
        "chat request received"
    );

    match state.orchestrator.dispatch(request).await {
        Ok(ChatReply::Text(text)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            text,
        )
            .into_response(),
        Ok(ChatReply::Stream {
            presentation,
            segments,
        }) => streaming_response(request_id, presentation, segments),
        Err(err) => ApiError::chat(err).into_response(),
    }
}

fn streaming_response(
    request_id: uuid::Uuid,
    presentation: Presentation,
    segments: SegmentStream,
) -> Response {
    let content_type = match presentation {
        Presentation::Chunked => "text/event-stream",
        Presentation::Raw => "text/plain; charset=utf-8",
    };

    // A failure mid-stream aborts the body; the client sees a truncated response.
    let body_stream = segments.map(move |segment| {
        segment.inspect_err(|err| {
            tracing::error!(target: "maya::chat", %request_id, error = %err, "model stream failed");
        })
    });

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        Body::from_stream(body_stream),
    )
        .into_response()
}
