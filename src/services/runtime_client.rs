//! Client side of the Bedrock AgentCore runtime.
//!
//! [`AgentRuntime`] is the seam the dispatch shim calls through; the HTTP
//! implementation talks to the AgentCore data plane, tests substitute a
//! recording fake.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use thiserror::Error;

use crate::config::RuntimeConfig;
use crate::services::normalizer::AgentOutput;

pub const SESSION_HEADER: &str = "X-Amzn-Bedrock-AgentCore-Runtime-Session-Id";
const ERROR_TYPE_HEADER: &str = "x-amzn-errortype";

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Fault reported by the service itself, with its code and message.
    #[error("{code}: {message}")]
    Service { code: String, message: String },

    #[error("transport error: {0}")]
    Transport(String),
}

/// One call against a runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInvocation {
    pub runtime_arn: String,
    pub session_id: String,
    /// JSON text forwarded verbatim as the request body.
    pub payload: String,
}

#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// Invoke the runtime once. `Ok(None)` means the runtime answered
    /// without a body.
    async fn invoke(&self, invocation: RuntimeInvocation) -> Result<Option<AgentOutput>, RuntimeError>;
}

/// [`AgentRuntime`] over HTTPS with bearer-token auth.
pub struct HttpAgentRuntime {
    client: reqwest::Client,
    endpoint: String,
    qualifier: String,
    bearer_token: Option<SecretString>,
}

impl HttpAgentRuntime {
    pub fn new(config: &RuntimeConfig) -> Result<Self, RuntimeError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| RuntimeError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.effective_endpoint(),
            qualifier: config.effective_qualifier().to_string(),
            bearer_token: config
                .bearer_token
                .as_ref()
                .map(|t| SecretString::from(t.expose_secret().to_string())),
        })
    }

    pub fn invocation_url(&self, runtime_arn: &str) -> String {
        format!(
            "{}/runtimes/{}/invocations?qualifier={}",
            self.endpoint,
            urlencoding::encode(runtime_arn),
            urlencoding::encode(&self.qualifier)
        )
    }
}

#[async_trait]
impl AgentRuntime for HttpAgentRuntime {
    async fn invoke(&self, invocation: RuntimeInvocation) -> Result<Option<AgentOutput>, RuntimeError> {
        let url = self.invocation_url(&invocation.runtime_arn);
        tracing::debug!(url = %url, session_id = %invocation.session_id, "invoking agent runtime");

        let mut request = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(SESSION_HEADER, &invocation.session_id)
            .body(invocation.payload);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| RuntimeError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let body = response.text().await.unwrap_or_default();
            return Err(service_error(status.as_u16(), &headers, &body));
        }

        if response.content_length() == Some(0) {
            return Ok(None);
        }

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map(|b| b.to_vec()).map_err(std::io::Error::other));
        Ok(Some(AgentOutput::from_stream(stream)))
    }
}

/// Build a [`RuntimeError::Service`] from an AWS-style JSON error reply.
///
/// The code comes from the `x-amzn-ErrorType` header (trimmed at the first
/// `:`), then the body's `__type` or `code`, then the HTTP status.
pub fn service_error(status: u16, headers: &HeaderMap, body: &str) -> RuntimeError {
    let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);

    let code = headers
        .get(ERROR_TYPE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| {
            ["__type", "code"]
                .iter()
                .find_map(|k| parsed.get(*k).and_then(Value::as_str).map(str::to_string))
        })
        .map(|raw| {
            let head = raw.split(':').next().unwrap_or_default();
            head.rsplit('#').next().unwrap_or(head).to_string()
        })
        .unwrap_or_else(|| format!("HTTP{status}"));

    let message = ["message", "Message"]
        .iter()
        .find_map(|k| parsed.get(*k).and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| if body.is_empty() { format!("status {status}") } else { body.to_string() });

    RuntimeError::Service { code, message }
}
