//! # Boss Plugin for the Winger Arena
//!
//! Behavior for the arena boss: a networked actor that loops through a firing
//! burst and a movement leg forever, with the authority making every decision
//! and the observers replaying it.
//!
//! ## Battle Cycle
//!
//! ```text
//!            burst exhausted (authority: set_battle_move)
//!   Firing ────────────────────────────────────────────▶ Moving
//!      ▲                                                   │
//!      └──────── leg finished (authority: set_battle_fire) ┘
//! ```
//!
//! - **Firing**: one action per `action_interval`. A straight shot advances
//!   the aim sweep; every other burst fires chase missiles from fixed slots
//!   instead. After `burst_count` actions the next action starts a leg.
//! - **Moving**: the boss ping-pongs vertically around the height it entered
//!   combat at, easing its speed up and smoothing its position, until it has
//!   travelled the leg length chosen by the authority.
//!
//! ## Authority Model
//!
//! The behavior runs on every role. Decisions (leg offset and length, bounce,
//! end of leg, shots, missiles) are taken only where
//! [`ActorContext::is_authority`] holds and are broadcast as
//! [`events::BossDirective`]s. Observers run the same interpolation locally for
//! presentation and take `move_remaining_distance` from the authority's field
//! updates.
//!
//! ## Collaborators
//!
//! Everything outside the cycle is injected through [`BossBehaviorBuilder`]:
//! the scene query used for targeting, the missile spawn facade, the weapon
//! and the two motion collaborators.
//!
//! ## Example Usage
//!
//! ```rust
//! use plugin_boss::{BossBehavior, BossConfig};
//! use winger_event_system::{Actor, ActorId, Role, Transform};
//!
//! let behavior = BossBehavior::builder(BossConfig::default()).seed(Some(7)).build();
//! let mut boss = Actor::new(ActorId::new(), Role::Authority, Transform::default(), Box::new(behavior));
//! boss.enter_combat(0.0);
//! boss.tick(0.05, 1.05);
//! ```
//!
//! ## Module Organization
//!
//! - [`boss`] - Per-role state and counters
//! - [`config`] - Tuning and validation
//! - [`events`] - Directives and outbound records
//! - [`handlers`] - Phase logic and directive bodies
//! - [`motion`] - Speed easing and position smoothing
//! - [`targeting`] - Alive-player lookup
//! - [`missile`] - Missile spawn facade and pool
//! - [`weapon`] - Standard-shot weapon

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::any::Any;
use tracing::debug;
use winger_event_system::{
    ActorContext, Behavior, BehaviorError, DirectiveEnvelope, FieldUpdate,
};

pub mod boss;
pub mod config;
pub mod events;
pub mod handlers;
pub mod missile;
pub mod motion;
pub mod targeting;
pub mod weapon;

#[cfg(test)]
mod tests;

pub use boss::{BattlePhase, BossState, BossStats};
pub use config::{BossConfig, MissileConfig};
pub use events::{BossDirective, MissileLaunch, Shot};
pub use handlers::{decide_battle_move, BattleMove};
pub use missile::{ChaseMissile, MissilePool, MissileSource, MissileSpawnFacade};
pub use motion::{LinearRamp, MotionSmoother, SmoothDamp, SpeedEasing};
pub use targeting::{PlayerView, SceneQuery, ScenePlayer, SceneRoster, TargetingQuery};
pub use weapon::{ShotLog, Weapon};

/// The boss behavior plugged into an actor on every role.
pub struct BossBehavior {
    pub(crate) config: BossConfig,
    pub(crate) state: BossState,
    pub(crate) stats: BossStats,
    pub(crate) rng: StdRng,
    pub(crate) targeting: TargetingQuery,
    pub(crate) missiles: MissileSpawnFacade,
    pub(crate) weapon: Box<dyn Weapon>,
    pub(crate) easing: Box<dyn SpeedEasing>,
    pub(crate) smoother: Box<dyn MotionSmoother>,
}

impl std::fmt::Debug for BossBehavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BossBehavior")
            .field("state", &self.state)
            .field("stats", &self.stats)
            .field("targeting", &self.targeting)
            .field("missiles", &self.missiles)
            .finish()
    }
}

impl BossBehavior {
    /// Starts building a boss with the given tuning.
    pub fn builder(config: BossConfig) -> BossBehaviorBuilder {
        BossBehaviorBuilder::new(config)
    }

    pub fn config(&self) -> &BossConfig {
        &self.config
    }

    pub fn state(&self) -> &BossState {
        &self.state
    }

    pub fn stats(&self) -> &BossStats {
        &self.stats
    }

    pub fn phase(&self) -> BattlePhase {
        self.state.phase()
    }

    pub fn missiles(&self) -> &MissileSpawnFacade {
        &self.missiles
    }

    pub fn missiles_mut(&mut self) -> &mut MissileSpawnFacade {
        &mut self.missiles
    }

    pub fn weapon(&self) -> &dyn Weapon {
        self.weapon.as_ref()
    }

    pub fn targeting(&self) -> &TargetingQuery {
        &self.targeting
    }
}

impl Behavior for BossBehavior {
    fn name(&self) -> &'static str {
        "boss"
    }

    fn validate(&self) -> Result<(), BehaviorError> {
        self.config.validate().map_err(BehaviorError::Configuration)
    }

    fn on_enter_combat(&mut self, ctx: &mut ActorContext<'_>, now: f64) -> Result<(), BehaviorError> {
        self.set_battle_state(ctx, now);
        Ok(())
    }

    fn on_tick(&mut self, ctx: &mut ActorContext<'_>, delta: f64, now: f64) -> Result<(), BehaviorError> {
        match self.state.phase() {
            BattlePhase::Firing => self.update_battle_fire(ctx, now),
            BattlePhase::Moving => self.update_battle_move(ctx, delta, now),
        }
    }

    fn on_directive(
        &mut self,
        ctx: &mut ActorContext<'_>,
        envelope: &DirectiveEnvelope,
        now: f64,
    ) -> Result<(), BehaviorError> {
        let directive: BossDirective = envelope.decode()?;
        if directive.name() != envelope.name {
            return Err(BehaviorError::UnknownDirective(envelope.name.clone()));
        }
        debug!("📥 Boss {} applying {:?}", ctx.id(), directive);
        self.apply_directive(ctx, &directive, now);
        Ok(())
    }

    fn collect_field_updates(&mut self) -> Result<Vec<FieldUpdate>, BehaviorError> {
        Ok(self.state.collect_updates()?)
    }

    fn apply_field_update(&mut self, update: &FieldUpdate) -> Result<bool, BehaviorError> {
        Ok(self.state.apply_update(update)?)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Builder injecting the boss's collaborators.
///
/// Anything not supplied falls back to an in-process default: an empty scene,
/// no missile sources, a [`ShotLog`] weapon, a [`LinearRamp`] using the
/// configured ramp time, [`SmoothDamp`], and an entropy-seeded generator.
pub struct BossBehaviorBuilder {
    config: BossConfig,
    seed: Option<u64>,
    scene: Option<Box<dyn SceneQuery>>,
    missiles: Option<MissileSpawnFacade>,
    weapon: Option<Box<dyn Weapon>>,
    easing: Option<Box<dyn SpeedEasing>>,
    smoother: Option<Box<dyn MotionSmoother>>,
}

impl BossBehaviorBuilder {
    pub fn new(config: BossConfig) -> Self {
        Self {
            config,
            seed: None,
            scene: None,
            missiles: None,
            weapon: None,
            easing: None,
            smoother: None,
        }
    }

    /// Seeds the decision generator; `None` draws from entropy.
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn scene(mut self, scene: Box<dyn SceneQuery>) -> Self {
        self.scene = Some(scene);
        self
    }

    pub fn missiles(mut self, missiles: MissileSpawnFacade) -> Self {
        self.missiles = Some(missiles);
        self
    }

    pub fn weapon(mut self, weapon: Box<dyn Weapon>) -> Self {
        self.weapon = Some(weapon);
        self
    }

    pub fn easing(mut self, easing: Box<dyn SpeedEasing>) -> Self {
        self.easing = Some(easing);
        self
    }

    pub fn smoother(mut self, smoother: Box<dyn MotionSmoother>) -> Self {
        self.smoother = Some(smoother);
        self
    }

    pub fn build(self) -> BossBehavior {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let ramp_seconds = self.config.speed_ramp_seconds;

        BossBehavior {
            config: self.config,
            state: BossState::new(),
            stats: BossStats::default(),
            rng,
            targeting: TargetingQuery::new(
                self.scene.unwrap_or_else(|| Box::new(SceneRoster::default())),
            ),
            missiles: self.missiles.unwrap_or_default(),
            weapon: self.weapon.unwrap_or_else(|| Box::new(ShotLog::default())),
            easing: self
                .easing
                .unwrap_or_else(|| Box::new(LinearRamp::new(ramp_seconds))),
            smoother: self.smoother.unwrap_or_else(|| Box::new(SmoothDamp)),
        }
    }
}
