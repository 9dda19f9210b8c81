//! Terminal chat with the training assistant.

mod repl;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use settings::{load_dotenv, Settings};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;
use training_agents::TrainingAgent;

#[derive(Debug, Parser)]
#[command(name = "training-chat")]
#[command(about = "Chat with the training assistant from the terminal")]
struct Args {
    /// Load environment variables from this file instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Logs go to stderr so stdout only carries the conversation.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let settings = match load_dotenv(args.env_file.as_deref()).and_then(|()| Settings::from_env()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let agent = match TrainingAgent::from_settings(&settings) {
        Ok(agent) => agent,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let input = BufReader::new(tokio::io::stdin());
    match repl::run(&agent, input, io::stdout(), io::stderr()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("I/O error: {}", e);
            ExitCode::FAILURE
        }
    }
}
