//! Configuration management for the Winger arena host.
//!
//! This module handles loading and validation of the host configuration from
//! TOML files. The boss tuning lives in its own `[boss]` section and is owned
//! by the boss plugin; this module only embeds and validates it.

use plugin_boss::BossConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;
use winger_event_system::Vec3;

/// Default tick interval for serde deserialization
fn default_tick_interval() -> u64 {
    50 // 20 ticks per second
}

fn default_observers() -> usize { 2 }
fn default_players() -> usize { 4 }
fn default_status_interval() -> f64 { 10.0 }
fn default_player_ring_radius() -> f64 { 12.0 }
fn default_boss_spawn() -> Vec3 { Vec3::new(0.0, 8.0, 0.0) }

fn default_log_level() -> String { "info".to_string() }

/// Application configuration loaded from TOML file.
///
/// This is the main configuration structure: the simulation loop, the boss
/// tuning and the logging output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Simulation loop and arena settings
    #[serde(default)]
    pub simulation: SimulationSettings,
    /// Boss behavior tuning
    #[serde(default)]
    pub boss: BossConfig,
    /// Logging configuration settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Simulation loop and arena settings.
///
/// Controls the tick rate, how many observer copies replay the authority, and
/// the players standing in the arena.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Tick interval in milliseconds; also the simulated delta per step
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Number of observer roles replaying the authority
    #[serde(default = "default_observers")]
    pub observers: usize,
    /// Players placed in the arena as chase targets
    #[serde(default = "default_players")]
    pub players: usize,
    /// Distance of the player ring from the boss spawn point
    #[serde(default = "default_player_ring_radius")]
    pub player_ring_radius: f64,
    /// Where the boss spawns; the height becomes its ping-pong anchor
    #[serde(default = "default_boss_spawn")]
    pub boss_spawn: Vec3,
    /// Seed for the authority's decisions (entropy when absent)
    #[serde(default)]
    pub seed: Option<u64>,
    /// Simulated seconds to run before stopping (until a signal when absent)
    #[serde(default)]
    pub duration_secs: Option<f64>,
    /// Simulated seconds between status reports
    #[serde(default = "default_status_interval")]
    pub status_interval_secs: f64,
    /// Simulated seconds between scripted player deaths (never when absent)
    #[serde(default)]
    pub player_death_interval_secs: Option<f64>,
}

/// Logging system configuration.
///
/// Controls log output format and level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Whether to output logs in JSON format
    #[serde(default)]
    pub json_format: bool,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            observers: default_observers(),
            players: default_players(),
            player_ring_radius: default_player_ring_radius(),
            boss_spawn: default_boss_spawn(),
            seed: None,
            duration_secs: None,
            status_interval_secs: default_status_interval(),
            player_death_interval_secs: None,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

impl SimulationSettings {
    /// Simulated seconds advanced by one step.
    pub fn delta_secs(&self) -> f64 {
        self.tick_interval_ms as f64 / 1000.0
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// If the file doesn't exist, creates a default configuration file at the specified path
    /// and returns the default configuration.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// The loaded or default configuration, or an error if loading/creation failed.
    pub async fn load_from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path).await?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content).await?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Validates the configuration for consistency and correctness.
    ///
    /// Checks the loop settings and the log level, then hands the boss section
    /// to [`BossConfig::validate`].
    ///
    /// # Returns
    ///
    /// `Ok(())` if the configuration is valid, or an error string describing the issue.
    pub fn validate(&self) -> Result<(), String> {
        let simulation = &self.simulation;

        if simulation.tick_interval_ms == 0 {
            return Err("simulation.tick_interval_ms must be greater than 0".to_string());
        }

        if simulation.observers == 0 {
            return Err("simulation.observers must be at least 1".to_string());
        }

        if !simulation.player_ring_radius.is_finite() || simulation.player_ring_radius < 0.0 {
            return Err(format!(
                "simulation.player_ring_radius must be zero or positive, got {}",
                simulation.player_ring_radius
            ));
        }

        if !simulation.boss_spawn.is_finite() {
            return Err("simulation.boss_spawn must be finite".to_string());
        }

        if !simulation.status_interval_secs.is_finite() || simulation.status_interval_secs <= 0.0 {
            return Err(format!(
                "simulation.status_interval_secs must be positive, got {}",
                simulation.status_interval_secs
            ));
        }

        if let Some(duration) = simulation.duration_secs {
            if !duration.is_finite() || duration <= 0.0 {
                return Err(format!("simulation.duration_secs must be positive, got {duration}"));
            }
        }

        if let Some(interval) = simulation.player_death_interval_secs {
            if !interval.is_finite() || interval <= 0.0 {
                return Err(format!(
                    "simulation.player_death_interval_secs must be positive, got {interval}"
                ));
            }
        }

        // Validate log level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            ));
        }

        self.boss.validate()
    }
}
