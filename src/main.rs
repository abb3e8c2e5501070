use anyhow::Context;
use research_agent::{
    api::routes::create_router,
    utils::{logging, toml_config::ResearchConfig},
    AppState,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ResearchConfig::from_env().context("Failed to load configuration")?;
    logging::init(&config.server).context("Failed to initialize logging")?;

    let api_key = config
        .llm
        .api_key()
        .inspect_err(|e| error!(error = %e, "LLM credential is required"))
        .context("Missing LLM credential")?;

    let state = AppState::from_config(config.clone(), api_key)
        .context("Failed to build research pipeline")?;
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(
        address = %addr,
        model = %config.llm.model,
        search = %config.search.base_url,
        "Research agent listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Research agent stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
