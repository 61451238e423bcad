//! Application State

use std::sync::Arc;

use agent_core::{ChatHandler, LlmProvider};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Chat lifecycle over the session store and agent
    pub chat: Arc<ChatHandler>,

    /// Remote model, for health reporting
    pub provider: Arc<dyn LlmProvider>,
}
