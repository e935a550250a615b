//! Form engine bridge
//!
//! Reads form events as JSON lines on stdin and writes UI effects as JSON lines on stdout.

use std::sync::Arc;

use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use persona_form::{bridge, FormConfig, FormSession, HttpBackend};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = FormConfig::from_env()?;

    // Initialize logging; stdout carries the effect stream
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting personnel form bridge");
    tracing::info!("Brigades endpoint: {}", config.brigades_url);
    tracing::info!("Roles endpoint: {}", config.roles_url);
    tracing::info!("Delete endpoint: {}", config.delete_url_template);
    tracing::debug!("List source: {} (locale {})", config.list_url, config.locale_url);

    if config.coordination_team_id.is_empty() {
        tracing::warn!("No coordination team id configured (PERSONA_COORDINATION_TEAM_ID). Rows will never disable brigade and production!");
    }

    let config = Arc::new(config);
    let backend = Arc::new(HttpBackend::new(Arc::clone(&config))?);
    let session = FormSession::new(config);

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    bridge::run(session, backend, stdin, stdout).await?;

    tracing::info!("Input closed, bridge stopped");
    Ok(())
}
