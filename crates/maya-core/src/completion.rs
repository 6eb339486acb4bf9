//! Seam between the core and whatever produces model text.
//!
//! The core never talks HTTP itself: it builds a [`CompletionRequest`] and hands it
//! to a [`CompletionSource`]. `maya-skills::ModelRouter` is the production
//! implementation; tests script their own.

use crate::error::ChatResult;
use crate::modes::ModeConfig;
use crate::shared::Turn;
use futures_util::stream::BoxStream;

/// Sampling temperature for conversational turns.
pub const CHAT_TEMPERATURE: f32 = 0.7;
/// Token budget for conversational turns.
pub const CHAT_MAX_TOKENS: u32 = 500;

const STYLE_INSTRUCTION: &str =
    "Important: Write naturally and conversationally. Use emojis occasionally. Keep responses concise and engaging.";

/// Incremental text deltas from the model. Ends when the upstream closes;
/// an `Err` item means the upstream failed mid-stream.
pub type DeltaStream = BoxStream<'static, ChatResult<String>>;

/// Whether the model should stream free text or return one JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    JsonObject,
}

/// Everything a completion backend needs for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub history: Vec<Turn>,
    pub user_message: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub format: ResponseFormat,
}

impl CompletionRequest {
    /// Streaming chat request for a mode: system prompt augmented with the
    /// personality and the conversational style instruction.
    pub fn chat(mode: &ModeConfig, history: &[Turn], user_message: &str) -> Self {
        Self {
            system_prompt: format!(
                "{}\n\nPersonality traits: {}\n\n{}",
                mode.system_prompt, mode.personality, STYLE_INSTRUCTION
            ),
            history: history.to_vec(),
            user_message: user_message.to_string(),
            temperature: CHAT_TEMPERATURE,
            max_tokens: CHAT_MAX_TOKENS,
            format: ResponseFormat::Text,
        }
    }

    /// Single-document JSON request with no prior history.
    pub fn json(system_prompt: impl Into<String>, user_message: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            history: Vec::new(),
            user_message: user_message.into(),
            temperature: CHAT_TEMPERATURE,
            max_tokens: 1000,
            format: ResponseFormat::JsonObject,
        }
    }

    /// Message list in wire order: system, history, then the new user turn.
    pub fn messages(&self) -> Vec<Turn> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(Turn::system(self.system_prompt.clone()));
        messages.extend(self.history.iter().cloned());
        messages.push(Turn::user(self.user_message.clone()));
        messages
    }
}

/// A backend that turns requests into model output.
#[async_trait::async_trait]
pub trait CompletionSource: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Starts a streaming completion. An `Err` here means the call never started;
    /// failures after the first delta arrive as `Err` items on the stream.
    async fn stream_chat(&self, request: CompletionRequest) -> ChatResult<DeltaStream>;

    /// Runs a JSON-mode completion and returns the raw document text.
    async fn complete_json(&self, request: CompletionRequest) -> ChatResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::{Mode, ModeRegistry};
    use crate::shared::Role;

    #[test]
    fn chat_request_carries_personality_and_limits() {
        let registry = ModeRegistry::default();
        let coach = registry.get(Mode::Coach);
        let history = vec![Turn::user("hi"), Turn::assistant("hey!")];
        let request = CompletionRequest::chat(coach, &history, "motivate me");

        assert!(request.system_prompt.starts_with(coach.system_prompt));
        assert!(request
            .system_prompt
            .contains(&format!("Personality traits: {}", coach.personality)));
        assert!(request.system_prompt.ends_with(STYLE_INSTRUCTION));
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, 500);
        assert_eq!(request.format, ResponseFormat::Text);

        let messages = request.messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[3], Turn::user("motivate me"));
    }
}
