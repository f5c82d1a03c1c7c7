use std::sync::Arc;

use loan_risk_service::{AppState, GroqClient, ServiceConfig, build_router, telemetry};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();

    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    match config.request_timeout {
        Some(timeout) => info!("Completion requests time out after {:?}", timeout),
        None => info!("Completion requests have no timeout"),
    }

    let client = GroqClient::from_config(&config)?;
    let app = build_router(AppState::new(Arc::new(client)));

    let listener = TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    let addr = listener.local_addr()?;

    info!("EV Loan Risk Assessment Service starting on {}", addr);
    info!("Using model {} at {}", config.model, config.api_url);
    info!("Health check endpoint: http://{}/health", addr);
    info!("Assessment endpoint: POST http://{}/assess-loan-risk", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
