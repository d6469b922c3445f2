// src/state.rs
use std::sync::Arc;

use crate::services::runtime_client::AgentRuntime;
use crate::services::session_log::SessionLog;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub sessions: SessionLog,
    pub runtime: Arc<dyn AgentRuntime>,
    pub runtime_arn: Option<String>,
}

impl AppState {
    pub fn new(runtime: Arc<dyn AgentRuntime>, runtime_arn: Option<String>) -> Self {
        Self {
            sessions: SessionLog::new(),
            runtime,
            runtime_arn,
        }
    }
}
