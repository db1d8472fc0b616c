//! # Boss Event Data Structures
//!
//! Payloads produced by the boss controller.
//!
//! ## Directives
//!
//! [`BossDirective`] is the set of procedures the authority broadcasts to every
//! observer. Each variant is a phase transition or a presentation change; the
//! body that applies it lives in [`crate::handlers`] and runs identically on
//! every role.
//!
//! | Directive | Arguments | Effect |
//! |-----------|-----------|--------|
//! | `set_battle_move` | `(half_pingpong_height, move_length)` | Firing → Moving, new leg |
//! | `change_battle_move_target` | none | Ping-pong the leg target around the start height |
//! | `set_battle_fire` | none | Moving → Firing, burst reset, special attack toggles |
//! | `rotate_fire_origin` | none | Advance the aim sweep by one increment |
//!
//! ## Outbound records
//!
//! [`Shot`] and [`MissileLaunch`] describe what the authority handed to its
//! weapon and missile collaborators. Observers never produce them.

use serde::{Deserialize, Serialize};
use winger_event_system::{ActorId, PlayerId, ProjectileId, Vec3};

/// State transitions broadcast by the boss authority.
///
/// # Example
///
/// ```rust
/// use plugin_boss::events::BossDirective;
///
/// let directive = BossDirective::SetBattleMove {
///     half_pingpong_height: 5.0,
///     move_length: 20.0,
/// };
/// let json = serde_json::to_value(&directive).unwrap();
/// assert_eq!(json["directive"], "set_battle_move");
/// assert_eq!(directive.name(), "set_battle_move");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "directive", rename_all = "snake_case")]
pub enum BossDirective {
    /// Starts a movement leg
    SetBattleMove {
        /// Signed lateral offset from the start height (always ± amplitude / 2)
        half_pingpong_height: f64,
        /// Total distance to travel before firing again
        move_length: f64,
    },
    /// Flips the leg target to the other side of the start height
    ChangeBattleMoveTarget,
    /// Ends the leg and starts a new burst
    SetBattleFire,
    /// Advances the aim sweep of the fire origin
    RotateFireOrigin,
}

impl BossDirective {
    /// Wire name carried in the directive envelope.
    pub fn name(&self) -> &'static str {
        match self {
            BossDirective::SetBattleMove { .. } => "set_battle_move",
            BossDirective::ChangeBattleMoveTarget => "change_battle_move_target",
            BossDirective::SetBattleFire => "set_battle_fire",
            BossDirective::RotateFireOrigin => "rotate_fire_origin",
        }
    }
}

/// A straight shot handed to the boss weapon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    /// Actor that fired
    pub shooter: ActorId,
    /// Muzzle position
    pub position: Vec3,
    /// Muzzle orientation (Euler degrees, z is the sweep angle)
    pub rotation: Vec3,
    /// Simulation time of the shot
    pub fired_at: f64,
}

/// Everything a chase missile is initialized with at launch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissileLaunch {
    /// Projectile instance handed out by the missile source
    pub missile: ProjectileId,
    /// Player the missile homes onto
    pub target: PlayerId,
    /// Where the target was when the missile launched
    pub target_position: Vec3,
    /// Actor that launched the missile
    pub spawner: ActorId,
    /// Spawn position in world space
    pub position: Vec3,
    /// Spawn orientation (Euler degrees)
    pub rotation: Vec3,
    /// Flight speed
    pub speed: f64,
    /// Damage dealt on hit
    pub damage: u32,
    /// Simulation time of the launch
    pub launched_at: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_directives_roundtrip_by_tag() {
        let json = serde_json::json!({ "directive": "change_battle_move_target" });
        let directive: BossDirective = serde_json::from_value(json).unwrap();
        assert_eq!(directive, BossDirective::ChangeBattleMoveTarget);
    }

    #[test]
    fn test_names_match_serde_tags() {
        let all = [
            BossDirective::SetBattleMove {
                half_pingpong_height: -5.0,
                move_length: 12.0,
            },
            BossDirective::ChangeBattleMoveTarget,
            BossDirective::SetBattleFire,
            BossDirective::RotateFireOrigin,
        ];
        for directive in all {
            let json = serde_json::to_value(directive).unwrap();
            assert_eq!(json["directive"], directive.name());
        }
    }
}
