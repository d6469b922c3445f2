// src/services/normalizer.rs
use std::{fmt, pin::Pin};

use futures_util::{Stream, StreamExt};
use serde_json::Value;

use crate::error::AppError;

pub const NO_RESPONSE: &str = "No response from agent";

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, std::io::Error>> + Send>>;

/// The shapes an agent runtime reply body can take.
pub enum AgentOutput {
    Stream(ByteStream),
    List(Vec<OutputPart>),
    Bytes(Vec<u8>),
    Text(String),
    Other(Value),
}

/// One element of a list-shaped reply.
#[derive(Debug, Clone)]
pub enum OutputPart {
    Bytes(Vec<u8>),
    Text(String),
    Other(Value),
}

impl fmt::Debug for AgentOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentOutput::Stream(_) => f.write_str("Stream(..)"),
            AgentOutput::List(parts) => f.debug_tuple("List").field(parts).finish(),
            AgentOutput::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            AgentOutput::Text(t) => f.debug_tuple("Text").field(t).finish(),
            AgentOutput::Other(v) => f.debug_tuple("Other").field(v).finish(),
        }
    }
}

impl AgentOutput {
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Vec<u8>, std::io::Error>> + Send + 'static,
    {
        AgentOutput::Stream(Box::pin(stream))
    }
}

/// Collapse a runtime reply into a single text value.
///
/// An absent or empty reply becomes [`NO_RESPONSE`]. Only a broken stream or
/// bytes that are not UTF-8 fail.
pub async fn normalize(output: Option<AgentOutput>) -> Result<String, AppError> {
    let text = match output {
        None => String::new(),
        Some(AgentOutput::Stream(mut stream)) => {
            let mut buf = Vec::new();
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(|e| AppError::internal("StreamError", e.to_string()))?;
                buf.extend_from_slice(&chunk);
            }
            decode(buf)?
        }
        Some(AgentOutput::List(parts)) => match parts.into_iter().next() {
            Some(OutputPart::Bytes(b)) => decode(b)?,
            Some(OutputPart::Text(t)) => t,
            Some(OutputPart::Other(v)) => v.to_string(),
            None => String::new(),
        },
        Some(AgentOutput::Bytes(b)) => decode(b)?,
        Some(AgentOutput::Text(t)) => t,
        Some(AgentOutput::Other(v)) => match v {
            Value::Null => String::new(),
            v => v.to_string(),
        },
    };

    if text.is_empty() {
        tracing::warn!("no response extracted from agent runtime");
        return Ok(NO_RESPONSE.to_string());
    }
    Ok(text)
}

fn decode(bytes: Vec<u8>) -> Result<String, AppError> {
    String::from_utf8(bytes).map_err(|e| AppError::internal("UnicodeDecodeError", e.to_string()))
}
