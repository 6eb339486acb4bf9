//! Decoding of OpenAI-style chat completion payloads.

use maya_core::{ChatError, ChatResult};
use serde::Deserialize;
use serde_json::Value;

/// What one server-sent event contributes to the reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StreamEvent {
    /// `[DONE]`: the reply is complete.
    Done,
    Delta(String),
    /// Role-only, empty or metadata chunk.
    Skip,
}

fn api_error_message(event: &Value) -> Option<String> {
    let error = event.get("error")?;
    if let Some(message) = error.get("message").and_then(Value::as_str) {
        return Some(message.to_string());
    }
    if let Some(message) = error.as_str() {
        return Some(message.to_string());
    }
    Some("An error occurred during streaming".to_string())
}

/// Decodes the `data` field of one streamed event.
pub(crate) fn parse_stream_event(data: &str) -> ChatResult<StreamEvent> {
    let data = data.trim();
    if data == "[DONE]" {
        return Ok(StreamEvent::Done);
    }
    if data.is_empty() {
        return Ok(StreamEvent::Skip);
    }

    let event: Value = serde_json::from_str(data).map_err(|e| {
        ChatError::UpstreamModelFailure(format!("SSE parsing error: {}", e))
    })?;
    if let Some(message) = api_error_message(&event) {
        return Err(ChatError::UpstreamModelFailure(format!("SSE API error: {}", message)));
    }

    match event
        .pointer("/choices/0/delta/content")
        .and_then(Value::as_str)
    {
        Some(text) if !text.is_empty() => Ok(StreamEvent::Delta(text.to_string())),
        _ => Ok(StreamEvent::Skip),
    }
}

#[derive(Debug, Deserialize)]
struct CompletionBody {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// `choices[0].message.content` of a non-streamed completion.
pub(crate) fn completion_content(body: &str) -> ChatResult<String> {
    let body: CompletionBody = serde_json::from_str(body)?;
    body.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ChatError::UpstreamModelFailure("completion had no content".to_string()))
}
