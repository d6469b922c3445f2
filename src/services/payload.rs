// src/services/payload.rs
use serde_json::{Map, Value};

use crate::{error::AppError, message::InvocationRequest};

/// Turn a raw inbound value into an [`InvocationRequest`].
///
/// The value may be an object or a string holding JSON (some invokers
/// double-encode the event). `sessionId` is the canonical field name and
/// `session_id` is accepted as an alias; when neither is present the
/// caller-supplied `fallback_session` is used.
pub fn parse_payload(raw: Value, fallback_session: &str) -> Result<InvocationRequest, AppError> {
    let fields = match raw {
        Value::Object(fields) => fields,
        Value::String(text) => match serde_json::from_str(&text) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => return Err(AppError::BadRequest("Request body must be a JSON object".to_string())),
            Err(e) => return Err(AppError::BadRequest(format!("Malformed JSON payload: {e}"))),
        },
        _ => return Err(AppError::BadRequest("Request body must be a JSON object".to_string())),
    };

    let prompt = match fields.get("prompt") {
        Some(Value::String(p)) if !p.is_empty() => p.clone(),
        _ => return Err(AppError::BadRequest("Missing prompt in request".to_string())),
    };

    let session_id = session_field(&fields)?.unwrap_or_else(|| fallback_session.to_string());

    Ok(InvocationRequest { prompt, session_id })
}

/// Parse a raw HTTP body. An unparseable body is a bad request, not a crash.
pub fn parse_body(body: &[u8], fallback_session: &str) -> Result<InvocationRequest, AppError> {
    let raw: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Malformed JSON payload: {e}")))?;
    parse_payload(raw, fallback_session)
}

/// First usable session id, canonical name first. Empty strings and nulls
/// count as absent; any other non-string value is rejected.
fn session_field(fields: &Map<String, Value>) -> Result<Option<String>, AppError> {
    for key in ["sessionId", "session_id"] {
        match fields.get(key) {
            None | Some(Value::Null) => {}
            Some(Value::String(s)) if s.is_empty() => {}
            Some(Value::String(s)) => return Ok(Some(s.clone())),
            Some(_) => return Err(AppError::BadRequest(format!("{key} must be a string"))),
        }
    }
    Ok(None)
}
