//! AWS Lambda entrypoint for the dispatch shim.
//!
//! Expected event: `{"prompt": "...", "sessionId": "optional"}` (also
//! accepted as a JSON-encoded string). The Lambda request id stands in for
//! a missing session id.

use std::sync::Arc;

use agentcore_shim::{
    config::Config,
    message::InvocationResponse,
    services::{dispatch::handle_event, runtime_client::HttpAgentRuntime},
    telemetry,
};
use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), Error> {
    telemetry::init_lambda_tracing();

    let config = Config::from_env()?;
    let runtime = Arc::new(HttpAgentRuntime::new(&config.runtime)?);
    let runtime_arn = config.runtime.runtime_arn.clone();
    tracing::info!(runtime_arn = ?runtime_arn, "lambda invoker started");

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let runtime = Arc::clone(&runtime);
        let runtime_arn = runtime_arn.clone();
        async move {
            let response: InvocationResponse = handle_event(
                runtime.as_ref(),
                runtime_arn.as_deref(),
                event.payload,
                &event.context.request_id,
            )
            .await;
            Ok::<_, Error>(response)
        }
    }))
    .await
}
