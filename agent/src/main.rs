mod channel;
mod config;

use anyhow::Result;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = config::Config::load_or_default();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.logging.level)),
        )
        .init();

    tracing::info!(orchestrator = %cfg.orchestrator.url, "starting probe agent");

    channel::run(
        &cfg.orchestrator.url,
        Duration::from_secs(cfg.orchestrator.reconnect_delay_secs),
        Duration::from_secs(cfg.limits.tool_timeout_secs),
    )
    .await
}
