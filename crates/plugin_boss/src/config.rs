//! Boss tuning loaded from the `[boss]` and `[boss.missiles]` sections of the
//! host configuration.
//!
//! Every field has a serde default so a partial section still deserializes.
//! [`BossConfig::validate`] is the startup check: a boss with an invalid
//! configuration is disabled instead of failing mid-cycle.

use serde::{Deserialize, Serialize};
use winger_event_system::{Transform, Vec3};

fn default_burst_count() -> u32 { 3 }
fn default_move_amplitude() -> f64 { 10.0 }
fn default_max_speed() -> f64 { 10.0 }
fn default_speed_ramp_seconds() -> f64 { 1.0 }
fn default_smoothing_ceiling_factor() -> f64 { 0.2 }
fn default_action_interval() -> f64 { 1.0 }
fn default_sweep_start() -> f64 { -30.0 }
fn default_sweep_increment() -> f64 { 15.0 }
fn default_sweep_span() -> f64 { 60.0 }

fn default_missile_type_index() -> usize { 0 }
fn default_missile_speed() -> f64 { 12.0 }
fn default_missile_damage() -> u32 { 10 }
fn default_missile_pool_capacity() -> usize { 16 }
fn default_missile_lifetime() -> f64 { 4.0 }

fn default_missile_slots() -> Vec<Transform> {
    vec![
        Transform {
            position: Vec3::new(-1.5, -0.5, 0.0),
            rotation: Vec3::new(0.0, 0.0, -20.0),
        },
        Transform {
            position: Vec3::new(0.0, -0.8, 0.0),
            rotation: Vec3::zero(),
        },
        Transform {
            position: Vec3::new(1.5, -0.5, 0.0),
            rotation: Vec3::new(0.0, 0.0, 20.0),
        },
    ]
}

/// Boss behavior tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossConfig {
    /// Shots per firing burst
    #[serde(default = "default_burst_count")]
    pub burst_count: u32,
    /// Ping-pong amplitude of a movement leg; offsets are ± half of it and
    /// leg lengths fall in `[amplitude, 3 × amplitude]`
    #[serde(default = "default_move_amplitude")]
    pub move_amplitude: f64,
    /// Speed the movement easing ramps toward
    #[serde(default = "default_max_speed")]
    pub max_speed: f64,
    /// Seconds for the easing to go from rest to `max_speed`
    #[serde(default = "default_speed_ramp_seconds")]
    pub speed_ramp_seconds: f64,
    /// Fraction of `max_speed` used as the smoothing speed ceiling
    #[serde(default = "default_smoothing_ceiling_factor")]
    pub smoothing_ceiling_factor: f64,
    /// Seconds that must elapse between two firing actions
    #[serde(default = "default_action_interval")]
    pub action_interval: f64,
    /// Aim sweep angle at the start of a burst (degrees)
    #[serde(default = "default_sweep_start")]
    pub sweep_start: f64,
    /// Aim sweep advance per straight shot (degrees)
    #[serde(default = "default_sweep_increment")]
    pub sweep_increment: f64,
    /// Width of the sweep before it wraps back to `sweep_start` (degrees)
    #[serde(default = "default_sweep_span")]
    pub sweep_span: f64,
    /// Chase missile settings
    #[serde(default)]
    pub missiles: MissileConfig,
}

/// Chase missile settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissileConfig {
    /// Missile type requested from the spawn facade
    #[serde(default = "default_missile_type_index")]
    pub type_index: usize,
    /// Flight speed handed to each missile
    #[serde(default = "default_missile_speed")]
    pub speed: f64,
    /// Damage handed to each missile
    #[serde(default = "default_missile_damage")]
    pub damage: u32,
    /// Instances the host pool may create
    #[serde(default = "default_missile_pool_capacity")]
    pub pool_capacity: usize,
    /// Seconds before the host recycles a launched missile
    #[serde(default = "default_missile_lifetime")]
    pub lifetime: f64,
    /// Spawn points relative to the boss, used back-to-front over a burst
    #[serde(default = "default_missile_slots")]
    pub slots: Vec<Transform>,
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            burst_count: default_burst_count(),
            move_amplitude: default_move_amplitude(),
            max_speed: default_max_speed(),
            speed_ramp_seconds: default_speed_ramp_seconds(),
            smoothing_ceiling_factor: default_smoothing_ceiling_factor(),
            action_interval: default_action_interval(),
            sweep_start: default_sweep_start(),
            sweep_increment: default_sweep_increment(),
            sweep_span: default_sweep_span(),
            missiles: MissileConfig::default(),
        }
    }
}

impl Default for MissileConfig {
    fn default() -> Self {
        Self {
            type_index: default_missile_type_index(),
            speed: default_missile_speed(),
            damage: default_missile_damage(),
            pool_capacity: default_missile_pool_capacity(),
            lifetime: default_missile_lifetime(),
            slots: default_missile_slots(),
        }
    }
}

impl BossConfig {
    /// Speed ceiling handed to the motion smoother.
    pub fn smoothing_ceiling(&self) -> f64 {
        self.max_speed * self.smoothing_ceiling_factor
    }

    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// `Ok(())` if the configuration is valid, or an error string describing the issue.
    pub fn validate(&self) -> Result<(), String> {
        if self.burst_count == 0 {
            return Err("boss.burst_count must be greater than 0".to_string());
        }

        let positive = [
            ("boss.move_amplitude", self.move_amplitude),
            ("boss.max_speed", self.max_speed),
            ("boss.speed_ramp_seconds", self.speed_ramp_seconds),
            ("boss.smoothing_ceiling_factor", self.smoothing_ceiling_factor),
            ("boss.missiles.speed", self.missiles.speed),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{name} must be a positive number, got {value}"));
            }
        }

        let non_negative = [
            ("boss.action_interval", self.action_interval),
            ("boss.sweep_increment", self.sweep_increment),
            ("boss.sweep_span", self.sweep_span),
            ("boss.missiles.lifetime", self.missiles.lifetime),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{name} must be zero or positive, got {value}"));
            }
        }

        if !self.sweep_start.is_finite() {
            return Err("boss.sweep_start must be finite".to_string());
        }

        if self.missiles.slots.len() < self.burst_count as usize {
            return Err(format!(
                "boss.missiles.slots has {} entries but a burst fires {} shots",
                self.missiles.slots.len(),
                self.burst_count
            ));
        }

        if self
            .missiles
            .slots
            .iter()
            .any(|slot| !slot.position.is_finite() || !slot.rotation.is_finite())
        {
            return Err("boss.missiles.slots must only contain finite transforms".to_string());
        }

        if self.missiles.pool_capacity == 0 {
            return Err("boss.missiles.pool_capacity must be greater than 0".to_string());
        }

        Ok(())
    }
}
