//! Model Router: sends chat turns to a mock generator or a live OpenAI-compatible API.

use crate::sse::{completion_content, parse_stream_event, StreamEvent};
use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use maya_core::{
    ChatError, ChatResult, CompletionRequest, CompletionSource, CoreConfig, DeltaStream, Mode,
    ModeRegistry, ResponseFormat, Turn,
};
use serde::Serialize;
use std::time::Duration;

const ENV_API_KEY: &str = "OPENAI_API_KEY";
const MOCK_WORD_DELAY: Duration = Duration::from_millis(40);

/// Workout plan returned by structured calls in mock mode.
pub const MOCK_PLAN_JSON: &str = r#"{
  "type": "Strength",
  "exercises": [
    {"name": "Goblet Squat", "sets": 3, "reps": "10-12", "rest": "60s"},
    {"name": "Push-up", "sets": 3, "reps": "8-12", "rest": "45s"},
    {"name": "Bent-over Row", "sets": 3, "reps": "10", "rest": "60s"},
    {"name": "Plank", "sets": 3, "reps": "30s hold", "rest": "30s"}
  ],
  "notes": "Move with control and stop a couple of reps before failure."
}"#;

/// Whether to simulate replies or call the real endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LlmMode {
    #[default]
    Mock,
    Live,
}

impl LlmMode {
    fn from_config(config: &CoreConfig) -> Self {
        if config.is_live() {
            LlmMode::Live
        } else {
            LlmMode::Mock
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LlmMode::Mock => "mock",
            LlmMode::Live => "live",
        }
    }
}

#[derive(Serialize)]
struct WireFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: Vec<Turn>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<WireFormat>,
}

/// Completion source used by the gateway.
pub struct ModelRouter {
    mode: LlmMode,
    client: reqwest::Client,
    api_base_url: String,
    model: String,
    api_key: Option<String>,
    word_delay: Duration,
}

impl ModelRouter {
    /// Mode, endpoint and model from `config`; the API key from `OPENAI_API_KEY`.
    pub fn new(config: &CoreConfig) -> Self {
        Self {
            mode: LlmMode::from_config(config),
            client: reqwest::Client::new(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: std::env::var(ENV_API_KEY).ok().filter(|k| !k.trim().is_empty()),
            word_delay: MOCK_WORD_DELAY,
        }
    }

    pub fn with_mode(mode: LlmMode) -> Self {
        let mut router = Self::new(&CoreConfig::default());
        router.mode = mode;
        router
    }

    pub fn with_word_delay(mut self, delay: Duration) -> Self {
        self.word_delay = delay;
        self
    }

    pub fn mode(&self) -> LlmMode {
        self.mode
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base_url)
    }

    fn api_key(&self) -> ChatResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ChatError::Config(format!("{} is not set", ENV_API_KEY)))
    }

    fn wire_request(&self, request: &CompletionRequest, stream: bool) -> WireRequest<'_> {
        WireRequest {
            model: &self.model,
            messages: request.messages(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream,
            response_format: match request.format {
                ResponseFormat::JsonObject => Some(WireFormat { kind: "json_object" }),
                ResponseFormat::Text => None,
            },
        }
    }

    /// Mock reply: a mode-flavoured opener plus an echo of the user message.
    fn mock_reply(&self, request: &CompletionRequest) -> String {
        let registry = ModeRegistry::default();
        let mode = Mode::ALL
            .into_iter()
            .find(|m| request.system_prompt.starts_with(registry.get(*m).system_prompt))
            .unwrap_or(Mode::Regular);
        let opener = match mode {
            Mode::Bff => "Omg hey bestie! 😊",
            Mode::Shopper => "Ooh, let's find you something great!",
            Mode::Coach => "Love the energy! 💪",
            Mode::Manager => "Got it, let's get organized.",
            Mode::Girlfriend => "Aww, I was just thinking about you! 😊",
            Mode::Regular => "Sure thing!",
        };
        let preview: String = request.user_message.chars().take(60).collect();
        let ellipsis = if request.user_message.chars().count() > 60 { "…" } else { "" };
        format!(
            "{} You said \"{}{}\". This is a simulated reply from the mock model, so switch llm_mode to live for real answers.",
            opener, preview, ellipsis
        )
    }

    fn mock_stream(&self, request: &CompletionRequest) -> DeltaStream {
        let reply = self.mock_reply(request);
        let delay = self.word_delay;
        let stream = async_stream::stream! {
            for word in reply.split_inclusive(' ') {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                yield Ok::<_, ChatError>(word.to_string());
            }
        };
        stream.boxed()
    }

    async fn post(&self, body: &WireRequest<'_>) -> ChatResult<reqwest::Response> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(self.api_key()?)
            .json(body)
            .send()
            .await
            .map_err(|e| ChatError::UpstreamModelFailure(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let snippet: String = text.chars().take(300).collect();
            tracing::error!(target: "maya::model", %status, body = %snippet, "completion endpoint returned an error");
            return Err(ChatError::UpstreamModelFailure(format!(
                "completion endpoint returned {}",
                status
            )));
        }
        Ok(response)
    }

    async fn live_stream(&self, request: &CompletionRequest) -> ChatResult<DeltaStream> {
        let body = self.wire_request(request, true);
        let response = self.post(&body).await?;
        let mut events = response.bytes_stream().eventsource();

        let stream = async_stream::try_stream! {
            while let Some(event) = events.next().await {
                let event = event.map_err(|e| {
                    ChatError::UpstreamModelFailure(format!("SSE stream error: {}", e))
                })?;
                match parse_stream_event(&event.data)? {
                    StreamEvent::Done => break,
                    StreamEvent::Delta(text) => {
                        yield text;
                    }
                    StreamEvent::Skip => {}
                }
            }
        };
        Ok(stream.boxed())
    }

    async fn live_json(&self, request: &CompletionRequest) -> ChatResult<String> {
        let body = self.wire_request(request, false);
        let response = self.post(&body).await?;
        let text = response
            .text()
            .await
            .map_err(|e| ChatError::UpstreamModelFailure(format!("reading response: {}", e)))?;
        completion_content(&text)
    }
}

impl Default for ModelRouter {
    fn default() -> Self {
        Self::new(&CoreConfig::default())
    }
}

#[async_trait::async_trait]
impl CompletionSource for ModelRouter {
    fn name(&self) -> &str {
        match self.mode {
            LlmMode::Mock => "mock",
            LlmMode::Live => "openai",
        }
    }

    async fn stream_chat(&self, request: CompletionRequest) -> ChatResult<DeltaStream> {
        tracing::debug!(
            target: "maya::model",
            mode = self.mode.as_str(),
            messages = request.history.len() + 2,
            "stream_chat"
        );
        match self.mode {
            LlmMode::Mock => Ok(self.mock_stream(&request)),
            LlmMode::Live => self.live_stream(&request).await,
        }
    }

    async fn complete_json(&self, request: CompletionRequest) -> ChatResult<String> {
        tracing::debug!(target: "maya::model", mode = self.mode.as_str(), "complete_json");
        match self.mode {
            LlmMode::Mock => Ok(MOCK_PLAN_JSON.to_string()),
            LlmMode::Live => self.live_json(&request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maya_core::{ModeRegistry, WorkoutPlan};

    fn router() -> ModelRouter {
        ModelRouter::with_mode(LlmMode::Mock).with_word_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn mock_stream_is_word_by_word() {
        let registry = ModeRegistry::default();
        let request = CompletionRequest::chat(registry.get(Mode::Bff), &[], "tell me something fun");
        let words: Vec<String> = router()
            .stream_chat(request.clone())
            .await
            .unwrap()
            .map(|w| w.unwrap())
            .collect()
            .await;

        assert!(words.len() > 5);
        let full: String = words.concat();
        assert_eq!(full, router().mock_reply(&request));
        assert!(full.starts_with("Omg hey bestie!"));
        assert!(full.contains("tell me something fun"));
    }

    #[tokio::test(start_paused = true)]
    async fn mock_stream_waits_between_words() {
        let registry = ModeRegistry::default();
        let request = CompletionRequest::chat(registry.get(Mode::Coach), &[], "hi");
        let router = ModelRouter::with_mode(LlmMode::Mock);
        let start = tokio::time::Instant::now();
        let mut stream = router.stream_chat(request).await.unwrap();
        stream.next().await.unwrap().unwrap();
        assert_eq!(start.elapsed(), MOCK_WORD_DELAY);
    }

    #[tokio::test]
    async fn mock_json_is_a_valid_plan() {
        let raw = router()
            .complete_json(CompletionRequest::json("sys", "plan"))
            .await
            .unwrap();
        let plan: WorkoutPlan = serde_json::from_str(&raw).unwrap();
        assert_eq!(plan.exercises.len(), 4);
    }

    #[test]
    fn json_requests_ask_for_json_object() {
        let router = router();
        let body = router.wire_request(&CompletionRequest::json("sys", "plan"), false);
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["response_format"]["type"], "json_object");
        assert_eq!(value["stream"], false);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "plan");

        let registry = ModeRegistry::default();
        let chat = CompletionRequest::chat(registry.get(Mode::Regular), &[], "hi");
        let value = serde_json::to_value(router.wire_request(&chat, true)).unwrap();
        assert!(value.get("response_format").is_none());
        assert_eq!(value["max_tokens"], 500);
    }

    #[tokio::test]
    async fn live_mode_without_key_is_a_config_error() {
        let mut router = ModelRouter::with_mode(LlmMode::Live);
        router.api_key = None;
        let err = router
            .complete_json(CompletionRequest::json("sys", "plan"))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Config(_)));
    }
}
