//! # Boss State
//!
//! Everything one role knows about the boss.
//!
//! ## Replicated (authority-owned)
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `phase` | [`BattlePhase::Firing`] or [`BattlePhase::Moving`] |
//! | `move_target` | Where the current leg is heading |
//! | `move_start_position` | Anchor of the ping-pong, captured on entering combat |
//! | `move_remaining_distance` | Distance left in the current leg |
//! | `fire_rotation` | Aim sweep of the fire origin (z is the sweep angle) |
//!
//! ## Local (per role)
//!
//! The burst counter, kinematic state and action timer are not transmitted.
//! Every role resets them identically when a directive arrives, so they stay
//! consistent without being sent.

use serde::{Deserialize, Serialize};
use winger_event_system::{FieldUpdate, ReplicationError, Replicated, Vec3};

/// Which branch of the battle cycle runs on a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattlePhase {
    /// Standing still, one action per interval
    Firing,
    /// Travelling a leg toward `move_target`
    Moving,
}

impl std::fmt::Display for BattlePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BattlePhase::Firing => write!(f, "firing"),
            BattlePhase::Moving => write!(f, "moving"),
        }
    }
}

/// Per-role boss state.
#[derive(Debug, Clone)]
pub struct BossState {
    pub phase: Replicated<BattlePhase>,
    pub move_target: Replicated<Vec3>,
    pub move_start_position: Replicated<Vec3>,
    pub move_remaining_distance: Replicated<f64>,
    pub fire_rotation: Replicated<Vec3>,

    /// Actions left in the current burst
    pub fire_remaining: u32,
    /// Eased speed of the current leg
    pub current_speed: f64,
    /// Smoother velocity carried between ticks
    pub velocity: Vec3,
    /// When the current leg (or burst) started
    pub move_start_time: f64,
    /// When the last firing action ran
    pub last_action_at: f64,
    /// Chase missiles instead of straight shots for this burst
    pub special_attack: bool,
}

impl BossState {
    pub fn new() -> Self {
        Self {
            phase: Replicated::new("phase", BattlePhase::Firing),
            move_target: Replicated::new("move_target", Vec3::zero()),
            move_start_position: Replicated::new("move_start_position", Vec3::zero()),
            move_remaining_distance: Replicated::new("move_remaining_distance", 0.0),
            fire_rotation: Replicated::new("fire_rotation", Vec3::zero()),
            fire_remaining: 0,
            current_speed: 0.0,
            velocity: Vec3::zero(),
            move_start_time: 0.0,
            last_action_at: 0.0,
            special_attack: false,
        }
    }

    pub fn phase(&self) -> BattlePhase {
        *self.phase.get()
    }

    /// Collects the pending writes of every replicated field.
    pub fn collect_updates(&mut self) -> Result<Vec<FieldUpdate>, ReplicationError> {
        let mut updates = Vec::new();
        winger_event_system::collect_into(&mut self.phase, &mut updates)?;
        winger_event_system::collect_into(&mut self.move_target, &mut updates)?;
        winger_event_system::collect_into(&mut self.move_start_position, &mut updates)?;
        winger_event_system::collect_into(&mut self.move_remaining_distance, &mut updates)?;
        winger_event_system::collect_into(&mut self.fire_rotation, &mut updates)?;
        Ok(updates)
    }

    /// Routes an authority write to the matching field.
    pub fn apply_update(&mut self, update: &FieldUpdate) -> Result<bool, ReplicationError> {
        match update.field.as_str() {
            "phase" => self.phase.apply_update(update),
            "move_target" => self.move_target.apply_update(update),
            "move_start_position" => self.move_start_position.apply_update(update),
            "move_remaining_distance" => self.move_remaining_distance.apply_update(update),
            "fire_rotation" => self.fire_rotation.apply_update(update),
            other => Err(ReplicationError::UnknownField(other.to_string())),
        }
    }
}

impl Default for BossState {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters kept by one role's boss behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossStats {
    /// Straight shots handed to the weapon
    pub shots_fired: u64,
    /// Chase missiles launched
    pub missiles_launched: u64,
    /// Chase actions skipped (no target, no slot or no missile)
    pub chase_skipped: u64,
    /// Bursts whose last action ran
    pub bursts_completed: u64,
    /// Movement legs started
    pub legs_started: u64,
    /// Ping-pong target changes
    pub bounces: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use winger_event_system::Role;

    #[test]
    fn test_state_updates_route_by_field_name() {
        let mut authority = BossState::new();
        let mut observer = BossState::new();

        authority.phase.set(Role::Authority, BattlePhase::Moving).unwrap();
        authority
            .move_target
            .set(Role::Authority, Vec3::new(0.0, 5.0, 0.0))
            .unwrap();

        let updates = authority.collect_updates().unwrap();
        assert_eq!(updates.len(), 2);
        for update in &updates {
            assert!(observer.apply_update(update).unwrap());
        }

        assert_eq!(observer.phase(), BattlePhase::Moving);
        assert_eq!(*observer.move_target.get(), Vec3::new(0.0, 5.0, 0.0));
        assert!(authority.collect_updates().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_field_is_reported() {
        let mut state = BossState::new();
        let update = FieldUpdate {
            field: "health".to_string(),
            revision: 1,
            value: serde_json::json!(100),
        };
        assert!(matches!(
            state.apply_update(&update),
            Err(ReplicationError::UnknownField(name)) if name == "health"
        ));
    }
}
