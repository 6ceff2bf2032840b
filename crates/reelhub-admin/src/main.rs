use reelhub_admin::config::{self, AdminConfig};
use reelhub_admin::{build_app, logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let dotenv = config::load_dotenv();
    let config = AdminConfig::from_env()?;
    logging::init(&config);

    if let Err(err) = dotenv {
        tracing::warn!(error = %err, "Ignoring unreadable .env file");
    }

    let addr = config.socket_addr()?.to_string();
    tracing::info!(
        addr = %addr,
        environment = %config.environment,
        secure_cookies = config.environment.is_production(),
        "Starting ReelHub admin API"
    );

    build_app(&config)
        .run_with_shutdown(&addr, shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
