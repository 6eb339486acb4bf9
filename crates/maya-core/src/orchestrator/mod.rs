//! Turn dispatch: validates a chat request, routes it to the workout flow or a
//! canned reply when an intent matches, and otherwise streams from the model.

use crate::completion::{CompletionRequest, CompletionSource};
use crate::error::{ChatError, ChatResult};
use crate::intent::{self, Intent};
use crate::modes::{ModeRegistry, Presentation};
use crate::segmenter::{segment, ChunkPacer, SegmentStream};
use crate::shared::{CoreConfig, Turn};
use crate::templates;
use crate::workout::{self, WorkoutTurn, RECOVERY_MESSAGE};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub history: Option<Vec<Turn>>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, mode: impl Into<String>, history: Vec<Turn>) -> Self {
        Self {
            message: Some(message.into()),
            mode: Some(mode.into()),
            history: Some(history),
        }
    }
}

/// Outcome of one turn.
pub enum ChatReply {
    /// A complete reply that never touched the streaming model.
    Text(String),
    /// Model output, segmented for the mode's presentation.
    Stream {
        presentation: Presentation,
        segments: SegmentStream,
    },
}

impl fmt::Debug for ChatReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatReply::Text(text) => f.debug_tuple("Text").field(text).finish(),
            ChatReply::Stream { presentation, .. } => f
                .debug_struct("Stream")
                .field("presentation", presentation)
                .finish_non_exhaustive(),
        }
    }
}

/// Dispatches chat turns. Holds no per-conversation state; share it behind `Arc`.
pub struct Orchestrator {
    modes: Arc<ModeRegistry>,
    source: Arc<dyn CompletionSource>,
    min_gap: Duration,
    target_gap: Duration,
}

impl Orchestrator {
    pub fn new(modes: Arc<ModeRegistry>, source: Arc<dyn CompletionSource>) -> Self {
        Self {
            modes,
            source,
            min_gap: ChunkPacer::DEFAULT_MIN_GAP,
            target_gap: ChunkPacer::DEFAULT_TARGET_GAP,
        }
    }

    /// Uses the chunked-mode list and pacing from `config`.
    pub fn from_config(config: &CoreConfig, source: Arc<dyn CompletionSource>) -> ChatResult<Self> {
        let modes = ModeRegistry::new(config.chunked_modes.as_slice())?;
        Ok(Self::new(Arc::new(modes), source)
            .with_pacing(config.min_chunk_gap(), config.target_chunk_gap()))
    }

    pub fn with_pacing(mut self, min_gap: Duration, target_gap: Duration) -> Self {
        self.min_gap = min_gap;
        self.target_gap = target_gap;
        self
    }

    pub fn modes(&self) -> &ModeRegistry {
        &self.modes
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Handles one turn. Validation errors are returned before any model call.
    pub async fn dispatch(&self, request: ChatRequest) -> ChatResult<ChatReply> {
        let message = request
            .message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| ChatError::MissingInput("message".to_string()))?;
        let mode_name = request
            .mode
            .as_deref()
            .ok_or_else(|| ChatError::InvalidMode(String::new()))?;
        let mode = self.modes.resolve(mode_name)?;
        let history = request.history.as_deref().unwrap_or_default();

        match workout::plan_turn(history, message, intent::is_workout_request(message)) {
            WorkoutTurn::NotInFlow => {}
            WorkoutTurn::Finalize(plan) => {
                tracing::info!(target: "maya::chat", mode = %mode.mode, "finalizing workout plan");
                let (_, text) = workout::build_plan(&plan, self.source.as_ref()).await?;
                return Ok(ChatReply::Text(text));
            }
            turn => {
                tracing::info!(target: "maya::chat", mode = %mode.mode, step = ?turn, "workout flow");
                let text = turn.reply_text().unwrap_or(RECOVERY_MESSAGE);
                return Ok(ChatReply::Text(text.to_string()));
            }
        }

        let today = chrono::Local::now().date_naive();
        let canned = intent::classify(message, mode.mode).map(|intent| match intent {
            Intent::Streak => templates::format_streak_message(&templates::mock_streak(today)),
            Intent::Schedule => templates::format_schedule_message(&templates::mock_schedule(today)),
            Intent::Task => templates::format_task_list_message(&templates::mock_task_list(today)),
        });
        if let Some(text) = canned {
            tracing::info!(target: "maya::chat", mode = %mode.mode, "canned reply");
            return Ok(ChatReply::Text(text));
        }

        let presentation = self.modes.presentation(mode.mode);
        tracing::info!(
            target: "maya::chat",
            mode = %mode.mode,
            source = self.source.name(),
            history = history.len(),
            ?presentation,
            "streaming model reply"
        );
        let deltas = self
            .source
            .stream_chat(CompletionRequest::chat(mode, history, message))
            .await?;
        let pacer = ChunkPacer::new(self.min_gap, self.target_gap);
        Ok(ChatReply::Stream {
            presentation,
            segments: segment(deltas, presentation, pacer),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::DeltaStream;
    use crate::segmenter::CHUNK_DELIMITER;
    use crate::workout::{DIFFICULTY_PROMPT, MUSCLE_GROUP_PROMPT};
    use futures_util::stream::{self, StreamExt};
    use std::sync::Mutex;

    /// Streams fixed deltas and records every request it receives.
    struct ScriptedSource {
        deltas: Vec<&'static str>,
        calls: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedSource {
        fn new(deltas: Vec<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                deltas,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<CompletionRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl CompletionSource for ScriptedSource {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn stream_chat(&self, request: CompletionRequest) -> ChatResult<DeltaStream> {
            self.calls.lock().unwrap().push(request);
            let items: Vec<ChatResult<String>> =
                self.deltas.iter().map(|d| Ok(d.to_string())).collect();
            Ok(stream::iter(items).boxed())
        }

        async fn complete_json(&self, request: CompletionRequest) -> ChatResult<String> {
            self.calls.lock().unwrap().push(request);
            Ok(r#"{"type": "Upper", "exercises": [{"name": "Push-up", "sets": 3, "reps": 12}]}"#
                .to_string())
        }
    }

    fn orchestrator(source: Arc<ScriptedSource>) -> Orchestrator {
        Orchestrator::new(Arc::new(ModeRegistry::default()), source)
    }

    async fn stream_text(reply: ChatReply) -> (Presentation, Vec<String>) {
        match reply {
            ChatReply::Stream { presentation, segments } => {
                let items: Vec<String> = segments.map(|s| s.unwrap()).collect().await;
                (presentation, items)
            }
            ChatReply::Text(text) => panic!("expected stream, got text {:?}", text),
        }
    }

    fn text(reply: ChatReply) -> String {
        match reply {
            ChatReply::Text(text) => text,
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_message_and_bad_mode_never_reach_the_model() {
        let source = ScriptedSource::new(vec!["hi"]);
        let orch = orchestrator(source.clone());

        let err = orch
            .dispatch(ChatRequest { mode: Some("bff".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::MissingInput(_)));

        let err = orch
            .dispatch(ChatRequest::new("hello", "not-a-mode", vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::InvalidMode(_)));

        let err = orch
            .dispatch(ChatRequest { message: Some("hello".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::InvalidMode(_)));

        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn regular_mode_passes_deltas_through() {
        let source = ScriptedSource::new(vec!["Hi", "", " there"]);
        let reply = orchestrator(source.clone())
            .dispatch(ChatRequest::new("hello", "regular", vec![]))
            .await
            .unwrap();
        let (presentation, items) = stream_text(reply).await;
        assert_eq!(presentation, Presentation::Raw);
        assert_eq!(items, vec!["Hi".to_string(), " there".to_string()]);

        let calls = source.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].user_message, "hello");
        assert_eq!(calls[0].max_tokens, 500);
    }

    #[tokio::test(start_paused = true)]
    async fn bff_mode_is_chunked() {
        let source = ScriptedSource::new(vec!["Omg hiii bestie! ", "What's new with you?"]);
        let reply = orchestrator(source)
            .dispatch(ChatRequest::new("hey", "bff", vec![Turn::user("earlier")]))
            .await
            .unwrap();
        let (presentation, items) = stream_text(reply).await;
        assert_eq!(presentation, Presentation::Chunked);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|c| c.ends_with(CHUNK_DELIMITER)));
    }

    #[tokio::test]
    async fn workout_request_starts_flow_without_model() {
        let source = ScriptedSource::new(vec![]);
        let orch = orchestrator(source.clone());
        let reply = orch
            .dispatch(ChatRequest::new("Can you create a workout for me?", "coach", vec![]))
            .await
            .unwrap();
        assert_eq!(text(reply), MUSCLE_GROUP_PROMPT);

        let reply = orch
            .dispatch(ChatRequest::new(
                "legs",
                "coach",
                vec![Turn::assistant(MUSCLE_GROUP_PROMPT)],
            ))
            .await
            .unwrap();
        assert_eq!(text(reply), DIFFICULTY_PROMPT);
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn finished_flow_makes_one_structured_call() {
        let source = ScriptedSource::new(vec![]);
        let history = vec![
            Turn::assistant(MUSCLE_GROUP_PROMPT),
            Turn::user("chest"),
            Turn::assistant(DIFFICULTY_PROMPT),
            Turn::user("advanced"),
            Turn::assistant(workout::DURATION_PROMPT),
            Turn::user("45 minutes"),
            Turn::assistant(workout::EQUIPMENT_PROMPT),
        ];
        let reply = orchestrator(source.clone())
            .dispatch(ChatRequest::new("full gym", "bff", history))
            .await
            .unwrap();
        let text = text(reply);
        assert!(text.contains("Push-up"));
        assert!(text.contains(&workout::MuscleClass::Upper.warmup()[0]));

        let calls = source.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].format, crate::completion::ResponseFormat::JsonObject);
    }

    #[tokio::test]
    async fn streak_is_canned_in_any_mode() {
        let source = ScriptedSource::new(vec![]);
        let reply = orchestrator(source.clone())
            .dispatch(ChatRequest::new("what's my streak?", "girlfriend", vec![]))
            .await
            .unwrap();
        assert!(text(reply).starts_with("🔥 YOUR WORKOUT STREAK"));
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn schedule_and_tasks_only_in_manager_mode() {
        let source = ScriptedSource::new(vec!["ok"]);
        let orch = orchestrator(source.clone());

        let reply = orch
            .dispatch(ChatRequest::new("show my schedule", "manager", vec![]))
            .await
            .unwrap();
        assert!(text(reply).starts_with("📅 DAILY SCHEDULE"));

        let reply = orch
            .dispatch(ChatRequest::new("show my tasks", "manager", vec![]))
            .await
            .unwrap();
        assert!(text(reply).starts_with("📋 TASK LIST"));
        assert!(source.calls().is_empty());

        let reply = orch
            .dispatch(ChatRequest::new("show my schedule", "shopper", vec![]))
            .await
            .unwrap();
        assert!(matches!(reply, ChatReply::Stream { .. }));
        assert_eq!(source.calls().len(), 1);
    }
}
