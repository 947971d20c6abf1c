use std::net::SocketAddr;

use promptsheet_server::{build_state, serve, AppConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    let state = build_state(&config)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    serve(addr, state).await?;
    Ok(())
}
