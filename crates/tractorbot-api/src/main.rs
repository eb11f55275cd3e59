use std::net::SocketAddr;

use tractorbot_api::{app, config::Config, telemetry::init_logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();
    
    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    
    init_logging(&config.logging);
    
    tracing::info!("Starting Captain Tractors chat API");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);
    
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = app::build_state(config).await?;
    let _maintenance = app::spawn_maintenance(state.clone());
    
    let router = app::build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    
    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("API docs: http://{}/api-docs/openapi.json", addr);
    
    axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
