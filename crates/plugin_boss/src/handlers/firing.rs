//! # Firing Handler
//!
//! The firing branch of the battle cycle. One action runs per
//! `action_interval` of simulation time:
//!
//! 1. While shots remain, the authority fires (a straight shot followed by a
//!    sweep advance, or a chase missile on special bursts) and every role
//!    counts the action down locally.
//! 2. Once the burst is exhausted, the next action is the authority deciding
//!    a movement leg.
//!
//! The sweep wraps back to its start angle once it would leave the configured
//! span, so the aim sawtooths across the same arc every burst.

use crate::boss::BattlePhase;
use crate::events::BossDirective;
use crate::handlers::movement::decide_battle_move;
use crate::BossBehavior;
use tracing::{debug, info};
use winger_event_system::{ActorContext, BehaviorError, Role, Transform};

impl BossBehavior {
    /// Firing branch of the tick.
    pub(crate) fn update_battle_fire(
        &mut self,
        ctx: &mut ActorContext<'_>,
        now: f64,
    ) -> Result<(), BehaviorError> {
        if now - self.state.last_action_at <= self.config.action_interval {
            return Ok(());
        }
        self.state.last_action_at = now;

        if self.state.fire_remaining == 0 {
            if ctx.is_authority() {
                let decision = decide_battle_move(&mut self.rng, self.config.move_amplitude);
                self.issue(
                    ctx,
                    BossDirective::SetBattleMove {
                        half_pingpong_height: decision.half_pingpong_height,
                        move_length: decision.move_length,
                    },
                    now,
                )?;
            }
            return Ok(());
        }

        let chase = self.state.special_attack;
        if ctx.is_authority() {
            if chase {
                self.chase_fire(ctx, now);
            } else {
                self.fire_straight(ctx, now);
            }
        }

        self.state.fire_remaining -= 1;
        if self.state.fire_remaining == 0 {
            self.stats.bursts_completed += 1;
            debug!("Boss {} finished burst #{}", ctx.id(), self.stats.bursts_completed);
        }

        if !chase && ctx.is_authority() {
            self.issue(ctx, BossDirective::RotateFireOrigin, now)?;
        }
        Ok(())
    }

    /// Hands a standard shot to the weapon from the current fire origin.
    fn fire_straight(&mut self, ctx: &ActorContext<'_>, now: f64) {
        let origin = Transform {
            position: ctx.transform.position,
            rotation: *self.state.fire_rotation.get(),
        };
        let shot = self.weapon.fire(ctx.id(), origin, now);
        self.stats.shots_fired += 1;
        debug!(
            "🔫 Boss {} fired at {:.1}° ({} left in burst)",
            ctx.id(),
            shot.rotation.z,
            self.state.fire_remaining.saturating_sub(1)
        );
    }

    /// Directive body: ends the leg and starts a new burst.
    pub(crate) fn set_battle_fire(&mut self, ctx: &mut ActorContext<'_>, now: f64) {
        let role = ctx.role();
        self.state.phase.assign(role, BattlePhase::Firing);
        self.state.move_start_time = now;
        self.state.last_action_at = now;
        self.state.fire_remaining = self.config.burst_count;
        self.reset_sweep(role);
        self.state.special_attack = !self.state.special_attack;

        info!(
            "🔥 Boss {} entering firing phase on {} ({})",
            ctx.id(),
            role,
            if self.state.special_attack { "chase missiles" } else { "straight shots" }
        );
    }

    /// Directive body: advances the aim sweep by one increment.
    pub(crate) fn rotate_fire_origin(&mut self, ctx: &mut ActorContext<'_>) {
        let mut rotation = *self.state.fire_rotation.get();
        rotation.z = next_sweep_angle(
            rotation.z,
            self.config.sweep_start,
            self.config.sweep_increment,
            self.config.sweep_span,
        );
        self.state.fire_rotation.assign(ctx.role(), rotation);
    }

    pub(crate) fn reset_sweep(&mut self, role: Role) {
        let mut rotation = *self.state.fire_rotation.get();
        rotation.z = self.config.sweep_start;
        self.state.fire_rotation.assign(role, rotation);
    }
}

/// Next sweep angle, wrapping to `start` once it would pass `start + span`.
pub fn next_sweep_angle(current: f64, start: f64, increment: f64, span: f64) -> f64 {
    let next = current + increment;
    if next > start + span {
        start
    } else {
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_sawtooths_over_span() {
        let mut angle = -30.0;
        let mut seen = vec![angle];
        for _ in 0..6 {
            angle = next_sweep_angle(angle, -30.0, 15.0, 60.0);
            seen.push(angle);
        }
        assert_eq!(seen, vec![-30.0, -15.0, 0.0, 15.0, 30.0, -30.0, -15.0]);
    }

    #[test]
    fn test_zero_span_pins_the_sweep() {
        assert_eq!(next_sweep_angle(-30.0, -30.0, 15.0, 0.0), -30.0);
    }
}
