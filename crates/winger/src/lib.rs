//! # Winger Arena - Main Entry Point
//!
//! Simulation host for the replicated boss. One authority copy makes every
//! decision; N observer copies replay its directives and field updates over a
//! serialized link and interpolate their own presentation position. The host
//! drives them all at a fixed tick rate.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run with default configuration
//! winger
//!
//! # Specify custom configuration
//! winger --config arena.toml
//!
//! # Reproducible two-minute run with four observers
//! winger --seed 42 --duration 120 --observers 4 --log-level debug
//!
//! # JSON logging
//! winger --json-logs
//! ```
//!
//! ## Configuration
//!
//! The host loads configuration from a TOML file (default: `winger.toml`).
//! If the file doesn't exist, a default configuration will be created.
//!
//! ## Signal Handling
//!
//! The host stops between steps on:
//! - SIGINT (Ctrl+C)
//! - SIGTERM (Unix systems)

use tracing::error;

mod app;
mod arena;
mod cli;
mod config;
mod logging;
mod signals;

use app::Application;
use cli::CliArgs;
use config::AppConfig;

/// Main entry point for the Winger host.
///
/// 1. Command-line argument parsing
/// 2. Configuration loading (for the logging settings)
/// 3. Logging system initialization
/// 4. Application creation and execution
///
/// # Exit Codes
///
/// * **0**: Successful execution and shutdown
/// * **1**: Error during startup, configuration, or runtime
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Load configuration to get logging settings
    let mut config = AppConfig::load_from_file(&args.config_path)
        .await
        .unwrap_or_default();
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }

    // Setup logging before anything else
    if let Err(e) = logging::setup_logging(&config.logging, args.json_logs) {
        eprintln!("❌ Failed to setup logging: {e}");
        std::process::exit(1);
    }

    match Application::new(args).await {
        Ok(app) => {
            if let Err(e) = app.run().await {
                error!("❌ Application error: {:?}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("❌ Failed to start application: {e:?}");
            std::process::exit(1);
        }
    }

    Ok(())
}

// Re-export main types for potential library usage
pub use arena::{Arena, ArenaReport};
pub use config::{LoggingSettings, SimulationSettings};
