//! The simulated arena: one boss replicated to N observers, a ring of players
//! and the simulation clock.
//!
//! The arena owns everything the boss treats as an external collaborator. The
//! authority copy gets the player roster and the missile pool; observer
//! copies get neither, since they never fire. Each [`Arena::step`] advances the
//! clock by one fixed delta, steps the replication session, recycles expired
//! missiles and applies scripted player deaths.

use crate::config::AppConfig;
use plugin_boss::{
    BattlePhase, BossBehavior, BossStats, MissilePool, MissileSpawnFacade,
    PlayerView, ScenePlayer, SceneRoster,
};
use std::f64::consts::TAU;
use std::sync::Arc;
use tracing::{info, warn};
use winger_event_system::{
    Actor, ActorId, Lifecycle, PlayerId, ReplicationSession, Role, SessionStats, Transform, Vec3,
};

/// Snapshot of the arena used for status lines and the final report.
#[derive(Debug, Clone, PartialEq)]
pub struct ArenaReport {
    pub clock: f64,
    pub phase: BattlePhase,
    pub lifecycle: Lifecycle,
    pub boss: BossStats,
    pub session: SessionStats,
    pub alive_players: usize,
    pub missiles_in_flight: usize,
    /// Largest authority/observer position gap
    pub max_observer_drift: f64,
}

pub struct Arena {
    session: ReplicationSession,
    players: Vec<Arc<ScenePlayer>>,
    delta: f64,
    clock: f64,
    death_interval: Option<f64>,
    next_death_at: Option<f64>,
}

impl Arena {
    /// Spawns the boss on every role and places the players.
    pub fn new(config: &AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let simulation = &config.simulation;
        let boss_id = ActorId::new();
        let spawn = Transform::at(simulation.boss_spawn);

        let players = ring_of_players(simulation.players, simulation.boss_spawn, simulation.player_ring_radius);

        let mut missiles = MissileSpawnFacade::new();
        missiles.register(Box::new(MissilePool::new(
            "chase",
            config.boss.missiles.pool_capacity,
            config.boss.missiles.lifetime,
        )));

        let authority_behavior = BossBehavior::builder(config.boss.clone())
            .seed(simulation.seed)
            .scene(Box::new(SceneRoster::new(players.clone())))
            .missiles(missiles)
            .build();
        let authority = Actor::new(boss_id, Role::Authority, spawn, Box::new(authority_behavior));

        let observers = (0..simulation.observers)
            .map(|_| {
                let behavior = BossBehavior::builder(config.boss.clone()).build();
                Actor::new(boss_id, Role::Observer, spawn, Box::new(behavior))
            })
            .collect();

        let session = ReplicationSession::new(authority, observers)?;

        info!(
            "🏟️ Arena ready: boss {} with {} observer(s) and {} player(s)",
            boss_id,
            simulation.observers,
            players.len()
        );

        Ok(Self {
            session,
            players,
            delta: simulation.delta_secs(),
            clock: 0.0,
            death_interval: simulation.player_death_interval_secs,
            next_death_at: simulation.player_death_interval_secs,
        })
    }

    /// Puts every copy of the boss into combat at the current clock.
    pub fn enter_combat(&mut self) {
        self.session.enter_combat(self.clock);
    }

    /// Advances the simulation by one fixed step.
    pub fn step(&mut self) {
        self.clock += self.delta;
        self.session.step(self.delta, self.clock);

        let now = self.clock;
        if let Some(boss) = self.session.authority_mut().behavior_as_mut::<BossBehavior>() {
            boss.missiles_mut().recycle_expired(now);
        }

        self.apply_scripted_deaths();
    }

    fn apply_scripted_deaths(&mut self) {
        let (Some(interval), Some(due)) = (self.death_interval, self.next_death_at) else {
            return;
        };
        if self.clock < due {
            return;
        }
        self.next_death_at = Some(due + interval);

        match self.players.iter().find(|p| p.is_alive()) {
            Some(player) => {
                player.kill();
                info!("💀 Player {} went down at t={:.2}s", player.id(), self.clock);
            }
            None => warn!("⚠️ No players left standing, chase bursts will be skipped"),
        }
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn session(&self) -> &ReplicationSession {
        &self.session
    }

    pub fn players(&self) -> &[Arc<ScenePlayer>] {
        &self.players
    }

    pub fn boss(&self) -> Option<&BossBehavior> {
        self.session.authority().behavior_as::<BossBehavior>()
    }

    /// Collects the current state of the arena.
    pub fn report(&self) -> ArenaReport {
        let authority = self.session.authority();
        let boss = self.boss();
        let position = authority.transform().position;

        let max_observer_drift = self
            .session
            .observers()
            .map(|observer| observer.transform().position.distance(position))
            .fold(0.0, f64::max);

        let missiles_in_flight = boss
            .map(|b| {
                (0..b.missiles().len())
                    .filter_map(|i| b.missiles().source(i))
                    .map(|source| source.in_flight())
                    .sum()
            })
            .unwrap_or(0);

        ArenaReport {
            clock: self.clock,
            phase: boss.map(BossBehavior::phase).unwrap_or(BattlePhase::Firing),
            lifecycle: authority.lifecycle(),
            boss: boss.map(|b| b.stats().clone()).unwrap_or_default(),
            session: self.session.stats().clone(),
            alive_players: self.players.iter().filter(|p| p.is_alive()).count(),
            missiles_in_flight,
            max_observer_drift,
        }
    }
}

/// Places `count` players evenly on a horizontal circle around `center`.
fn ring_of_players(count: usize, center: Vec3, radius: f64) -> Vec<Arc<ScenePlayer>> {
    (0..count)
        .map(|i| {
            let angle = TAU * i as f64 / count as f64;
            let position = Vec3::new(
                center.x + radius * angle.cos(),
                0.0,
                center.z + radius * angle.sin(),
            );
            ScenePlayer::new(PlayerId::new(), position)
        })
        .collect()
}
