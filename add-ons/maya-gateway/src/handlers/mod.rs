//! Request handlers for the chat and persona endpoints.

pub(crate) mod agents;
pub(crate) mod chat;
