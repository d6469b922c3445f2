// src/services/session_log.rs
use std::{collections::HashMap, fmt::Debug, sync::Arc};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

/// Number of past exchanges a history query shows.
pub const HISTORY_EXCHANGES: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Agent,
}

#[derive(Clone, Debug)]
pub struct Turn {
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
    pub role: Role,
    pub text: String,
}

/// Append-only, in-memory log of turns keyed by session id.
///
/// Nothing is ever removed and nothing survives a restart.
#[derive(Clone, Default)]
pub struct SessionLog {
    inner: Arc<RwLock<HashMap<String, Vec<Turn>>>>,
}

impl Debug for SessionLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLog").finish_non_exhaustive()
    }
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    // Record one exchange: the user turn, then the agent turn. Returns the
    // session's turn count.
    pub async fn record_exchange(&self, session_id: &str, user: &str, agent: &str) -> usize {
        let mut guard = self.inner.write().await;
        let turns = guard.entry(session_id.to_string()).or_default();
        for (role, text) in [(Role::User, user), (Role::Agent, agent)] {
            turns.push(Turn {
                timestamp: Utc::now(),
                session_id: session_id.to_string(),
                role,
                text: text.to_string(),
            });
        }
        turns.len()
    }

    /// The turns of the last `exchanges` exchanges, oldest first.
    pub async fn recent(&self, session_id: &str, exchanges: usize) -> Vec<Turn> {
        let guard = self.inner.read().await;
        let Some(turns) = guard.get(session_id) else {
            return Vec::new();
        };
        let start = turns.len().saturating_sub(exchanges.saturating_mul(2));
        turns[start..].to_vec()
    }
}
