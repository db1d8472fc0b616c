//! # Movement Handler
//!
//! The moving branch of the battle cycle.
//!
//! A leg starts from a [`BattleMove`] decided by the authority: a target half
//! an amplitude above or below the combat anchor, and a total distance to
//! travel. Each tick the speed eases up, the position is smoothed toward the
//! target, and the authority subtracts the distance actually covered. When
//! the boss sits exactly on its target the authority flips the target to the
//! other side of the anchor, so long legs bounce up and down. The leg ends on
//! the first tick its remaining distance reaches zero or below.
//!
//! Observers run the same easing and smoothing for their own presentation
//! position. They never bounce or end a leg on their own, and their remaining
//! distance follows the authority's field updates.

use crate::boss::BattlePhase;
use crate::events::BossDirective;
use crate::BossBehavior;
use rand::Rng;
use tracing::{debug, info};
use winger_event_system::{ActorContext, BehaviorError, Vec3};

/// Parameters of one movement leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BattleMove {
    /// `+amplitude / 2` or `-amplitude / 2`
    pub half_pingpong_height: f64,
    /// Distance to travel, in `[amplitude, 3 × amplitude]`
    pub move_length: f64,
}

/// Draws the next leg: a fair coin for the side and a uniform length.
///
/// `amplitude` must be positive.
pub fn decide_battle_move<R: Rng + ?Sized>(rng: &mut R, amplitude: f64) -> BattleMove {
    let half_pingpong_height = if rng.gen::<f64>() < 0.5 {
        amplitude * 0.5
    } else {
        -amplitude * 0.5
    };
    let move_length = rng.gen_range(amplitude..=amplitude * 3.0);

    BattleMove {
        half_pingpong_height,
        move_length,
    }
}

impl BossBehavior {
    /// Moving branch of the tick.
    pub(crate) fn update_battle_move(
        &mut self,
        ctx: &mut ActorContext<'_>,
        delta: f64,
        now: f64,
    ) -> Result<(), BehaviorError> {
        let elapsed = now - self.state.move_start_time;
        self.state.current_speed =
            self.easing
                .ease(self.state.current_speed, self.config.max_speed, elapsed);

        let old_position = ctx.transform.position;
        let mut target = *self.state.move_target.get();
        let mut distance = old_position.distance(target);

        if distance == 0.0 && ctx.is_authority() {
            self.issue(ctx, BossDirective::ChangeBattleMoveTarget, now)?;
            target = *self.state.move_target.get();
            distance = old_position.distance(target);
        }

        let smooth_time = distance / self.state.current_speed;
        if smooth_time.is_finite() {
            ctx.transform.position = self.smoother.step(
                old_position,
                target,
                &mut self.state.velocity,
                smooth_time,
                self.config.smoothing_ceiling(),
                delta,
            );
        }

        if !ctx.is_authority() {
            return Ok(());
        }

        let traveled = old_position.distance(ctx.transform.position);
        let remaining = *self.state.move_remaining_distance.get() - traveled;
        if traveled > 0.0 {
            self.state.move_remaining_distance.set(ctx.role(), remaining)?;
        }

        if remaining <= 0.0 {
            self.issue(ctx, BossDirective::SetBattleFire, now)?;
        }
        Ok(())
    }

    /// Directive body: starts a movement leg.
    pub(crate) fn set_battle_move(
        &mut self,
        ctx: &mut ActorContext<'_>,
        half_pingpong_height: f64,
        move_length: f64,
        now: f64,
    ) {
        let role = ctx.role();
        let target = *self.state.move_start_position.get() + Vec3::new(0.0, half_pingpong_height, 0.0);

        self.state.phase.assign(role, BattlePhase::Moving);
        self.state.move_target.assign(role, target);
        self.state.move_remaining_distance.assign(role, move_length);
        self.state.current_speed = 0.0;
        self.state.velocity = Vec3::zero();
        self.state.move_start_time = now;
        self.state.last_action_at = now;
        self.stats.legs_started += 1;

        info!(
            "🛫 Boss {} moving on {}: offset {:+.2}, length {:.2}",
            ctx.id(),
            role,
            half_pingpong_height,
            move_length
        );
    }

    /// Directive body: flips the target to the other side of the anchor.
    pub(crate) fn change_battle_move_target(&mut self, ctx: &mut ActorContext<'_>) {
        let anchor = *self.state.move_start_position.get();
        let half = self.config.move_amplitude * 0.5;
        let mut target = *self.state.move_target.get();

        target.y = if target.y > anchor.y {
            anchor.y - half
        } else {
            anchor.y + half
        };
        self.state.move_target.assign(ctx.role(), target);
        self.stats.bounces += 1;

        debug!("↕️ Boss {} bounced toward y = {:.2}", ctx.id(), target.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_decisions_stay_in_bounds_for_many_seeds() {
        let amplitude = 10.0;
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            for _ in 0..10 {
                let decision = decide_battle_move(&mut rng, amplitude);
                assert!(
                    decision.half_pingpong_height == 5.0 || decision.half_pingpong_height == -5.0,
                    "seed {seed} produced offset {}",
                    decision.half_pingpong_height
                );
                assert!((amplitude..=amplitude * 3.0).contains(&decision.move_length));
            }
        }
    }

    #[test]
    fn test_both_sides_are_chosen() {
        let mut rng = StdRng::seed_from_u64(42);
        let ups = (0..400)
            .filter(|_| decide_battle_move(&mut rng, 4.0).half_pingpong_height > 0.0)
            .count();
        assert!(ups > 100 && ups < 300, "{ups} of 400 legs went up");
    }

    #[test]
    fn test_same_seed_same_decisions() {
        let mut a = StdRng::seed_from_u64(9);
        let mut b = StdRng::seed_from_u64(9);
        for _ in 0..5 {
            assert_eq!(decide_battle_move(&mut a, 6.0), decide_battle_move(&mut b, 6.0));
        }
    }
}
