//! maya-core: chat turn handling for the Maya assistant (modes, stream segmentation,
//! intent detection, workout flow, canned replies and persona agents).
//!
//! The gateway and the model router depend only on the re-exports below.

mod agents;
mod completion;
mod error;
mod intent;
mod modes;
mod orchestrator;
mod segmenter;
mod shared;
mod templates;
mod workout;

// Shared types and configuration
pub use error::{ChatError, ChatResult};
pub use shared::{CoreConfig, Role, Turn};

// Modes
pub use modes::{Mode, ModeConfig, ModeRegistry, Presentation};

// Model seam
pub use completion::{
    CompletionRequest, CompletionSource, DeltaStream, ResponseFormat, CHAT_MAX_TOKENS,
    CHAT_TEMPERATURE,
};

// Segmentation
pub use segmenter::{
    is_natural_break, segment, ChunkBuffer, ChunkPacer, SegmentStream, CHUNK_DELIMITER,
};

// Intents and canned replies
pub use intent::{
    classify, is_schedule_request, is_streak_request, is_task_request, is_workout_request, Intent,
};
pub use templates::{
    format_schedule_message, format_streak_message, format_task_list_message, mock_schedule,
    mock_streak, mock_task_list, Schedule, StreakSummary, TaskList,
};

// Workout flow
pub use workout::{
    build_plan, derive_state, format_plan_message, plan_turn, Difficulty, Exercise, FlowState,
    MuscleClass, MuscleGroup, PlanRequest, Slot, Stage, WorkoutPlan, WorkoutSlots, WorkoutTurn,
    DIFFICULTY_PROMPT, DURATION_PROMPT, EQUIPMENT_PROMPT, MUSCLE_GROUP_PROMPT, RECOVERY_MESSAGE,
};

// Persona agents
pub use agents::{AgentRegistry, PersonaAgent, PersonaReply, PersonaRequest, PersonaWorker};

// Orchestrator
pub use orchestrator::{ChatReply, ChatRequest, Orchestrator};
