//! Training assistant HTTP server.

use std::process::ExitCode;
use std::sync::Arc;

use api::{router, AppState};
use settings::{load_dotenv, Settings};
use signal_sender::build_signal_sender;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use training_agents::{SummaryAgent, TrainingAgent};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = load_dotenv(None) {
        eprintln!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let summary_agent = Arc::new(SummaryAgent::from_settings(&settings)?);
    let chat_agent = Arc::new(TrainingAgent::from_settings(&settings)?);
    let signal_sender = build_signal_sender(&settings)?;

    info!(
        model = %settings.model_name(),
        mcp = %settings.mcp_server_url,
        signal = signal_sender.is_some(),
        "Agents ready"
    );

    let state = AppState::new(summary_agent, chat_agent, signal_sender);
    let app = router(state);

    info!(addr = %settings.api_addr, "Training API listening");
    let listener = tokio::net::TcpListener::bind(settings.api_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
