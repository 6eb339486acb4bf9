//! Completion backends behind `maya_core::CompletionSource`.

pub use maya_core::{CompletionRequest, CompletionSource};

mod model_router;
mod sse;

pub use model_router::{LlmMode, ModelRouter, MOCK_PLAN_JSON};
