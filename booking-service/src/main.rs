use booking_service::{config::BookingConfig, services::init_metrics, Application};
use service_core::error::AppError;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load configuration - fail fast if the secret or database settings are missing
    let config = BookingConfig::from_env()?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    );

    init_metrics()?;

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        "Starting booking service"
    );

    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}
