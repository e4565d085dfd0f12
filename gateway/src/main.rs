use dashboard_gateway::{AppState, GatewayConfig};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = GatewayConfig::from_env()?;
    let listener = TcpListener::bind(config.addr()).await?;
    tracing::info!(addr = %config.addr(), upstream = %config.upstream.base_url, "gateway listening");
    dashboard_gateway::run(listener, AppState::from_config(&config.upstream)).await?;
    Ok(())
}
