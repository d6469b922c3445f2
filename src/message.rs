// src/message.rs
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Canonical inbound request once the payload has been parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    pub prompt: String,
    pub session_id: String,
}

/// Reply of the local toy agent.
#[derive(Debug, Serialize, Deserialize)]
pub struct AgentReply {
    pub result: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub timestamp: String,
}

/// Reply of the dispatch shim after normalizing the runtime output.
#[derive(Debug, Serialize, Deserialize)]
pub struct DispatchReply {
    pub response: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Transport-level response record, the shape a Lambda proxy integration expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub body: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
}

impl InvocationResponse {
    pub fn json<T: Serialize>(status_code: u16, body: &T) -> Self {
        // Serializing our own plain structs cannot fail.
        let body = serde_json::to_string(body).unwrap_or_default();
        Self { status_code, body, headers: HashMap::new() }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }
}
