//! Bribe the Scale - game server binary.

use anyhow::Result;
use bribe_the_scale::cli::{Cli, Command};
use bribe_the_scale::config::GameConfig;
use bribe_the_scale::engine::TurnStateMachine;
use bribe_the_scale::judge::LlmJudge;
use bribe_the_scale::server;
use clap::Parser;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port, host, config } => {
            let config = match config {
                Some(path) => GameConfig::from_file(path)?,
                None => GameConfig::default(),
            };

            let api_key = config.judge().api_key()?;
            let judge = LlmJudge::new(config.judge().clone(), api_key);
            info!(
                model = %config.judge().model(),
                end_command = %config.end_command(),
                "Starting Bribe the Scale server"
            );

            let engine = Arc::new(Mutex::new(TurnStateMachine::new(config, judge)));
            server::serve(engine, &host, port).await
        }
    }
}
