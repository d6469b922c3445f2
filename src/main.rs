use std::sync::Arc;

use agentcore_shim::{
    config::Config,
    routes,
    services::runtime_client::HttpAgentRuntime,
    state::AppState,
    telemetry,
};
use anyhow::Context;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    telemetry::init_tracing();

    let runtime = HttpAgentRuntime::new(&config.runtime)?;
    if config.runtime.runtime_arn.is_none() {
        tracing::warn!("RUNTIME_ARN not set; /runtime/invocations will answer with a configuration error");
    }
    let state = Arc::new(AppState::new(Arc::new(runtime), config.runtime.runtime_arn.clone()));

    let app = routes::create_router()
        .with_state(state)
        .layer(CorsLayer::very_permissive());

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("agent ready at http://{addr}/invocations");
    axum::serve(listener, app).await?;
    Ok(())
}
