// src/main.rs

use std::fs::OpenOptions;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// --- Module Declarations ---
mod config;
mod content;
mod error;
mod game_logic;
mod session;
mod ui;

// --- Imports ---
use crate::config::{LoggingConfig, load_settings};
use crate::content::OpenTdbClient;
use crate::error::Result as AppResult;
use crate::session::QuizSessionHandle;
use crate::ui::App;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // Load Configuration
    let app_settings = load_settings()?;

    // The terminal belongs to the UI, so logs go to a file
    init_tracing(&app_settings.logging)?;
    tracing::info!("Configuration loaded: {:?}", app_settings);

    let source = Arc::new(OpenTdbClient::new(&app_settings.provider)?);
    tracing::info!(provider.url = %source.url(), "Starting quiz session");
    let session_handle = QuizSessionHandle::spawn(source, 32);

    let terminal = ratatui::try_init()?;
    let result = App::new(session_handle.clone()).run_ui(terminal).await;
    ratatui::restore();

    session_handle.shutdown().await;
    tracing::info!("Quiz closed");
    result
}

fn init_tracing(logging: &LoggingConfig) -> AppResult<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&logging.file)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| logging.filter.clone().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(log_file)),
        )
        .init();
    Ok(())
}
