//! # Chase-Fire Handler
//!
//! Special bursts replace straight shots with chase missiles. Each action
//! picks one alive player uniformly at random and launches a missile from the
//! slot matching the shots left in the burst, so a burst walks the slot list
//! back to front.
//!
//! Every failure here is a skipped action, never a fault: no alive players,
//! no slot for this shot, or no missile available. The burst counter still
//! advances in the caller so the cycle never stalls.

use crate::BossBehavior;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};
use winger_event_system::{ActorContext, Transform};

impl BossBehavior {
    /// Launches one chase missile. Authority only.
    pub(crate) fn chase_fire(&mut self, ctx: &ActorContext<'_>, now: f64) {
        let candidates = self.targeting.alive_players();
        let Some(target) = candidates.choose(&mut self.rng) else {
            self.stats.chase_skipped += 1;
            debug!("🎯 Boss {} has no alive players to chase, skipping", ctx.id());
            return;
        };

        let slot_index = (self.state.fire_remaining as usize).saturating_sub(1);
        let Some(slot) = self.config.missiles.slots.get(slot_index).copied() else {
            self.stats.chase_skipped += 1;
            warn!("⚠️ Boss {} has no missile slot #{}", ctx.id(), slot_index);
            return;
        };

        let type_index = self.config.missiles.type_index;
        let Some(mut missile) = self.missiles.spawn(type_index) else {
            self.stats.chase_skipped += 1;
            return;
        };

        let origin = Transform {
            position: ctx.transform.position + slot.position,
            rotation: slot.rotation,
        };
        let target_id = target.id();
        missile.initialize(
            &**target,
            ctx.id(),
            origin,
            self.config.missiles.speed,
            self.config.missiles.damage,
            now,
        );
        let missile_id = missile.id();

        if self.missiles.launch(type_index, missile) {
            self.stats.missiles_launched += 1;
            info!(
                "🚀 Boss {} launched missile {} from slot #{} at player {}",
                ctx.id(),
                missile_id,
                slot_index,
                target_id
            );
        } else {
            self.stats.chase_skipped += 1;
        }
    }
}
