//! # Boss Phase Handlers
//!
//! The battle cycle split by concern:
//!
//! - [`firing`] - the firing branch, straight shots, sweep and burst reset
//! - [`movement`] - leg decisions, ping-pong and the moving branch
//! - [`chase_fire`] - chase missile launches for special bursts
//!
//! Directive bodies live next to the logic that issues them. This module ties
//! them together: [`BossBehavior::apply_directive`] runs a body on the local
//! role and [`BossBehavior::issue`] is the authority's apply-then-broadcast.

pub mod chase_fire;
pub mod firing;
pub mod movement;

pub use movement::{decide_battle_move, BattleMove};

use crate::boss::BattlePhase;
use crate::events::BossDirective;
use crate::BossBehavior;
use tracing::info;
use winger_event_system::{ActorContext, BehaviorError};

impl BossBehavior {
    /// Initializes the battle baseline when the actor enters combat.
    ///
    /// Runs on every role. The position at this moment becomes the anchor the
    /// legs ping-pong around.
    pub(crate) fn set_battle_state(&mut self, ctx: &mut ActorContext<'_>, now: f64) {
        let role = ctx.role();
        let position = ctx.transform.position;

        self.state.move_start_position.assign(role, position);
        self.state.move_target.assign(role, position);
        self.state.move_remaining_distance.assign(role, 0.0);
        self.state.phase.assign(role, BattlePhase::Firing);
        self.reset_sweep(role);

        self.state.fire_remaining = self.config.burst_count;
        self.state.current_speed = 0.0;
        self.state.velocity = winger_event_system::Vec3::zero();
        self.state.move_start_time = now;
        self.state.last_action_at = now;
        self.state.special_attack = false;

        info!(
            "👹 Boss {} ready at {:?} ({} shots per burst)",
            ctx.id(),
            position,
            self.config.burst_count
        );
    }

    /// Runs a directive body on this role.
    pub(crate) fn apply_directive(
        &mut self,
        ctx: &mut ActorContext<'_>,
        directive: &BossDirective,
        now: f64,
    ) {
        match *directive {
            BossDirective::SetBattleMove {
                half_pingpong_height,
                move_length,
            } => self.set_battle_move(ctx, half_pingpong_height, move_length, now),
            BossDirective::ChangeBattleMoveTarget => self.change_battle_move_target(ctx),
            BossDirective::SetBattleFire => self.set_battle_fire(ctx, now),
            BossDirective::RotateFireOrigin => self.rotate_fire_origin(ctx),
        }
    }

    /// Applies a directive locally, then broadcasts it to the observers.
    pub(crate) fn issue(
        &mut self,
        ctx: &mut ActorContext<'_>,
        directive: BossDirective,
        now: f64,
    ) -> Result<(), BehaviorError> {
        self.apply_directive(ctx, &directive, now);
        ctx.publish(directive.name(), &directive)?;
        Ok(())
    }
}
