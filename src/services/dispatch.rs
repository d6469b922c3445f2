// src/services/dispatch.rs
use serde_json::{Value, json};

use crate::{
    error::AppError,
    message::{DispatchReply, InvocationRequest, InvocationResponse},
    services::{
        normalizer::normalize,
        payload::parse_payload,
        runtime_client::{AgentRuntime, RuntimeInvocation},
    },
};

/// Forward one request to the runtime identified by `runtime_arn`.
///
/// The runtime is called exactly once; there is no retry and no caching.
pub async fn dispatch(
    runtime: &dyn AgentRuntime,
    runtime_arn: Option<&str>,
    request: &InvocationRequest,
) -> Result<DispatchReply, AppError> {
    let runtime_arn = require_target(runtime_arn)?;

    tracing::info!(
        runtime_arn = %runtime_arn,
        session_id = %request.session_id,
        prompt_len = request.prompt.len(),
        "invoking agent runtime"
    );

    let invocation = RuntimeInvocation {
        runtime_arn: runtime_arn.to_string(),
        session_id: request.session_id.clone(),
        payload: json!({ "prompt": request.prompt }).to_string(),
    };

    let output = runtime.invoke(invocation).await?;
    let response = normalize(output).await?;

    tracing::info!(
        session_id = %request.session_id,
        response_len = response.len(),
        "agent response received"
    );

    Ok(DispatchReply { response, session_id: request.session_id.clone() })
}

/// Full event boundary: configuration check, payload parsing, dispatch and
/// error mapping. Always yields exactly one [`InvocationResponse`].
pub async fn handle_event(
    runtime: &dyn AgentRuntime,
    runtime_arn: Option<&str>,
    event: Value,
    request_id: &str,
) -> InvocationResponse {
    match run_event(runtime, runtime_arn, event, request_id).await {
        Ok(reply) => InvocationResponse::json(200, &reply).with_header("Content-Type", "application/json"),
        Err(err) => {
            tracing::error!(error = %err, status = err.status_code().as_u16(), "invocation failed");
            err.into()
        }
    }
}

async fn run_event(
    runtime: &dyn AgentRuntime,
    runtime_arn: Option<&str>,
    event: Value,
    request_id: &str,
) -> Result<DispatchReply, AppError> {
    require_target(runtime_arn)?;
    let request = parse_payload(event, request_id)?;
    dispatch(runtime, runtime_arn, &request).await
}

fn require_target(runtime_arn: Option<&str>) -> Result<&str, AppError> {
    match runtime_arn {
        Some(arn) if !arn.trim().is_empty() => Ok(arn),
        _ => Err(AppError::Configuration("Missing RUNTIME_ARN environment variable".to_string())),
    }
}
