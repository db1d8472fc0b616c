//! Main application logic and lifecycle management.
//!
//! This module contains the `Application` struct that loads the configuration,
//! builds the arena and drives it at a fixed tick rate until a shutdown signal
//! arrives or the configured duration has been simulated.

use crate::{
    arena::{Arena, ArenaReport},
    cli::CliArgs,
    config::AppConfig,
    logging::display_banner,
    signals::spawn_signal_watcher,
};
use tracing::{info, warn};
use winger_event_system::{Lifecycle, ShutdownState, StopReason};

/// Main application struct.
///
/// # Architecture
///
/// * **Configuration Management**: Loads and validates configuration from files and CLI
/// * **Arena Orchestration**: Owns the replicated boss and its collaborators
/// * **Status Reporting**: Logs a status line every `status_interval_secs` of simulated time
/// * **Graceful Shutdown**: Stops between steps on a termination signal
pub struct Application {
    /// Loaded application configuration
    config: AppConfig,
    /// Simulated arena
    arena: Arena,
}

impl Application {
    /// Creates a new application instance.
    ///
    /// # Process
    ///
    /// 1. Load configuration from file (creating default if missing)
    /// 2. Apply command-line argument overrides
    /// 3. Validate merged configuration
    /// 4. Display startup banner
    /// 5. Build the arena
    pub async fn new(args: CliArgs) -> Result<Self, Box<dyn std::error::Error>> {
        info!("🔧 Loading configuration from: {}", args.config_path.display());
        let mut config = AppConfig::load_from_file(&args.config_path).await?;

        apply_overrides(&mut config, &args);

        if let Err(e) = config.validate() {
            return Err(format!("Configuration validation failed: {e}").into());
        } else {
            info!("✅ Configuration loaded and validated successfully");
        }

        display_banner();

        let arena = Arena::new(&config)?;

        Ok(Self { config, arena })
    }

    /// Runs the tick loop until shutdown.
    ///
    /// Each step advances the arena by one fixed delta. The loop checks the
    /// shutdown state before starting a step, so a step is never cut short.
    /// Returns the sealed state: why the loop stopped and its last step.
    pub async fn run(mut self) -> Result<ShutdownState, Box<dyn std::error::Error>> {
        info!("🌟 Starting Winger arena");
        self.log_configuration_summary();

        let shutdown_state = ShutdownState::new();
        let signal_watcher = spawn_signal_watcher(shutdown_state.clone());

        self.arena.enter_combat();
        if self.arena.report().lifecycle == Lifecycle::Disabled {
            warn!("⚠️ Boss was disabled on entering combat, the arena will idle");
        }

        let simulation = &self.config.simulation;
        let mut interval =
            tokio::time::interval(tokio::time::Duration::from_millis(simulation.tick_interval_ms));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut next_status_at = simulation.status_interval_secs;

        info!("✅ Arena is now running!");
        info!("🛑 Press Ctrl+C to gracefully shutdown");

        loop {
            interval.tick().await;

            if shutdown_state.should_stop() {
                break;
            }

            self.arena.step();

            if self.arena.clock() >= next_status_at {
                log_status(&self.arena.report());
                next_status_at += simulation.status_interval_secs;
            }

            if let Some(duration) = simulation.duration_secs {
                if self.arena.clock() >= duration {
                    info!("⏱️ Simulated {:.1}s, stopping", duration);
                    shutdown_state.request_stop(StopReason::DurationElapsed);
                }
            }
        }

        shutdown_state.seal(self.arena.session().stats().ticks);
        signal_watcher.abort();

        log_final_statistics(&self.arena.report());
        info!(
            "✅ Winger arena shutdown complete ({})",
            shutdown_state.reason().map_or_else(|| "unknown".to_string(), |r| r.to_string())
        );

        Ok(shutdown_state)
    }

    /// Logs the configuration summary at startup.
    fn log_configuration_summary(&self) {
        let simulation = &self.config.simulation;
        let boss = &self.config.boss;
        info!("📋 Configuration Summary:");
        info!(
            "  ⏱️ Tick: {}ms ({:.0} steps/s)",
            simulation.tick_interval_ms,
            1000.0 / simulation.tick_interval_ms as f64
        );
        info!("  🔗 Observers: {}", simulation.observers);
        info!("  👥 Players: {}", simulation.players);
        match simulation.seed {
            Some(seed) => info!("  🎲 Seed: {}", seed),
            None => info!("  🎲 Seed: entropy"),
        }
        info!(
            "  👹 Boss: {} shots/burst, amplitude {:.1}, max speed {:.1}",
            boss.burst_count, boss.move_amplitude, boss.max_speed
        );
        if let Some(duration) = simulation.duration_secs {
            info!("  ⌛ Duration: {:.1}s", duration);
        }
    }
}

/// Copies CLI overrides onto the loaded configuration.
fn apply_overrides(config: &mut AppConfig, args: &CliArgs) {
    if let Some(log_level) = &args.log_level {
        config.logging.level = log_level.clone();
    }

    if args.json_logs {
        config.logging.json_format = true;
    }

    if let Some(observers) = args.observers {
        config.simulation.observers = observers;
    }

    if let Some(players) = args.players {
        config.simulation.players = players;
    }

    if args.seed.is_some() {
        config.simulation.seed = args.seed;
    }

    if args.duration.is_some() {
        config.simulation.duration_secs = args.duration;
    }
}

fn log_status(report: &ArenaReport) {
    info!(
        "📊 t={:.1}s | {} | {} shots, {} missiles | {} legs | {}/{} directives/fields delivered | drift {:.3}",
        report.clock,
        report.phase,
        report.boss.shots_fired,
        report.boss.missiles_launched,
        report.boss.legs_started,
        report.session.directives_delivered,
        report.session.field_updates_delivered,
        report.max_observer_drift
    );
}

/// Logs final statistics during shutdown.
fn log_final_statistics(report: &ArenaReport) {
    info!("📊 Final Statistics:");
    info!("  - Simulated time: {:.2}s over {} steps", report.clock, report.session.ticks);
    info!("  - Boss lifecycle: {:?}, phase: {}", report.lifecycle, report.phase);
    info!("  - Bursts completed: {}", report.boss.bursts_completed);
    info!("  - Straight shots: {}", report.boss.shots_fired);
    info!(
        "  - Chase missiles: {} launched, {} skipped, {} in flight",
        report.boss.missiles_launched, report.boss.chase_skipped, report.missiles_in_flight
    );
    info!(
        "  - Movement legs: {} ({} bounces)",
        report.boss.legs_started, report.boss.bounces
    );
    info!(
        "  - Replication: {} directives, {} field updates, {} bytes, {} errors, {} dropped",
        report.session.directives_delivered,
        report.session.field_updates_delivered,
        report.session.bytes_sent,
        report.session.delivery_errors,
        report.session.messages_dropped
    );
    info!("  - Alive players: {}", report.alive_players);
}
