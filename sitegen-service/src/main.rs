use service_core::observability::init_tracing;
use sitegen_service::config::SitegenConfig;
use sitegen_service::services::metrics::init_metrics;
use sitegen_service::startup::Application;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = SitegenConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    let otlp_endpoint = std::env::var("OTLP_ENDPOINT").ok();
    init_tracing(
        "sitegen-service",
        &config.common.log_level,
        otlp_endpoint.as_deref(),
    );
    init_metrics();

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    app.run_until_stopped().await
}
