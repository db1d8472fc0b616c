//! # Missile Spawn Facade
//!
//! Thin lookup from a missile type index to the [`MissileSource`] that hands
//! out instances of that type. The boss asks the facade for a fresh
//! [`ChaseMissile`], initializes it and hands it back for launch. Homing and
//! collision belong to whoever owns the source.
//!
//! Running out of instances is not an error: [`MissileSpawnFacade::spawn`]
//! returns `None` and the caller skips the launch.

use crate::events::MissileLaunch;
use crate::targeting::PlayerView;
use std::any::Any;
use std::collections::HashMap;
use tracing::{debug, warn};
use winger_event_system::{ActorId, ProjectileId, Transform};

/// A projectile instance handed out by a [`MissileSource`].
///
/// Freshly spawned missiles are unarmed; [`ChaseMissile::initialize`] arms
/// them with a target and launch parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ChaseMissile {
    id: ProjectileId,
    launch: Option<MissileLaunch>,
}

impl ChaseMissile {
    pub fn new(id: ProjectileId) -> Self {
        Self { id, launch: None }
    }

    pub fn id(&self) -> ProjectileId {
        self.id
    }

    /// Arms the missile and returns its launch record.
    pub fn initialize(
        &mut self,
        target: &dyn PlayerView,
        spawner: ActorId,
        origin: Transform,
        speed: f64,
        damage: u32,
        now: f64,
    ) -> &MissileLaunch {
        self.launch.insert(MissileLaunch {
            missile: self.id,
            target: target.id(),
            target_position: target.position(),
            spawner,
            position: origin.position,
            rotation: origin.rotation,
            speed,
            damage,
            launched_at: now,
        })
    }

    /// Launch parameters, once armed.
    pub fn launch(&self) -> Option<&MissileLaunch> {
        self.launch.as_ref()
    }
}

/// Supplier of missile instances of one type.
pub trait MissileSource: Send {
    /// Human-readable name used in logs.
    fn name(&self) -> &str;

    /// Hands out an unarmed instance, or `None` when exhausted.
    fn spawn(&mut self) -> Option<ChaseMissile>;

    /// Takes back an instance after initialization. Returns `false` if the
    /// missile was never armed, in which case it is returned unused.
    fn launch(&mut self, missile: ChaseMissile) -> bool;

    /// Returns a launched instance to the source.
    fn recycle(&mut self, id: ProjectileId) -> bool;

    /// Returns every launched instance older than the source's lifetime.
    fn recycle_expired(&mut self, now: f64) -> usize;

    /// Instances currently in flight.
    fn in_flight(&self) -> usize;

    /// Every launch this source has accepted, oldest first.
    fn launches(&self) -> &[MissileLaunch];

    /// Returns this source as `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// Type index to source lookup.
#[derive(Default)]
pub struct MissileSpawnFacade {
    sources: Vec<Box<dyn MissileSource>>,
}

impl std::fmt::Debug for MissileSpawnFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.sources.iter().map(|source| source.name()))
            .finish()
    }
}

impl MissileSpawnFacade {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a source and returns the type index it answers to.
    pub fn register(&mut self, source: Box<dyn MissileSource>) -> usize {
        debug!("🚀 Registered missile source '{}' as type {}", source.name(), self.sources.len());
        self.sources.push(source);
        self.sources.len() - 1
    }

    /// Requests a fresh instance of the given type.
    ///
    /// Unknown types and exhausted sources both yield `None`.
    pub fn spawn(&mut self, type_index: usize) -> Option<ChaseMissile> {
        let Some(source) = self.sources.get_mut(type_index) else {
            warn!("⚠️ No missile source registered for type {}", type_index);
            return None;
        };

        let missile = source.spawn();
        if missile.is_none() {
            warn!("⚠️ Missile source '{}' is exhausted", source.name());
        }
        missile
    }

    /// Hands an initialized instance back to its source for launch.
    pub fn launch(&mut self, type_index: usize, missile: ChaseMissile) -> bool {
        match self.sources.get_mut(type_index) {
            Some(source) => source.launch(missile),
            None => false,
        }
    }

    /// Recycles expired missiles across every source.
    pub fn recycle_expired(&mut self, now: f64) -> usize {
        self.sources
            .iter_mut()
            .map(|source| source.recycle_expired(now))
            .sum()
    }

    pub fn source(&self, type_index: usize) -> Option<&dyn MissileSource> {
        self.sources.get(type_index).map(|source| source.as_ref())
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Bounded missile source that reuses recycled instances.
#[derive(Debug)]
pub struct MissilePool {
    name: String,
    capacity: usize,
    lifetime: f64,
    created: usize,
    free: Vec<ProjectileId>,
    in_flight: HashMap<ProjectileId, f64>,
    launches: Vec<MissileLaunch>,
}

impl MissilePool {
    /// Creates a pool that will create at most `capacity` instances and
    /// consider launched missiles expired after `lifetime` seconds.
    pub fn new(name: impl Into<String>, capacity: usize, lifetime: f64) -> Self {
        Self {
            name: name.into(),
            capacity,
            lifetime,
            created: 0,
            free: Vec::new(),
            in_flight: HashMap::new(),
            launches: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Instances that could be handed out right now.
    pub fn available(&self) -> usize {
        self.free.len() + (self.capacity - self.created)
    }
}

impl MissileSource for MissilePool {
    fn name(&self) -> &str {
        &self.name
    }

    fn spawn(&mut self) -> Option<ChaseMissile> {
        if let Some(id) = self.free.pop() {
            return Some(ChaseMissile::new(id));
        }
        if self.created < self.capacity {
            self.created += 1;
            return Some(ChaseMissile::new(ProjectileId::new()));
        }
        None
    }

    fn launch(&mut self, missile: ChaseMissile) -> bool {
        match missile.launch {
            Some(launch) => {
                self.in_flight.insert(missile.id, launch.launched_at);
                self.launches.push(launch);
                true
            }
            None => {
                warn!("⚠️ Missile {} returned to '{}' without being armed", missile.id, self.name);
                self.free.push(missile.id);
                false
            }
        }
    }

    fn recycle(&mut self, id: ProjectileId) -> bool {
        if self.in_flight.remove(&id).is_some() {
            self.free.push(id);
            true
        } else {
            false
        }
    }

    fn recycle_expired(&mut self, now: f64) -> usize {
        let expired: Vec<ProjectileId> = self
            .in_flight
            .iter()
            .filter(|(_, launched_at)| now - **launched_at >= self.lifetime)
            .map(|(id, _)| *id)
            .collect();

        for id in &expired {
            self.recycle(*id);
        }
        if !expired.is_empty() {
            debug!("♻️ Recycled {} missile(s) in '{}'", expired.len(), self.name);
        }
        expired.len()
    }

    fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    fn launches(&self) -> &[MissileLaunch] {
        &self.launches
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targeting::ScenePlayer;
    use winger_event_system::{PlayerId, Vec3};

    fn armed(pool: &mut MissilePool, now: f64) -> ChaseMissile {
        let player = ScenePlayer::new(PlayerId::new(), Vec3::new(0.0, -10.0, 0.0));
        let mut missile = pool.spawn().expect("pool has capacity");
        missile.initialize(
            player.as_ref(),
            ActorId::new(),
            Transform::at(Vec3::new(1.0, 2.0, 0.0)),
            12.0,
            10,
            now,
        );
        missile
    }

    #[test]
    fn test_pool_is_bounded_and_reuses_instances() {
        let mut pool = MissilePool::new("chase", 2, 1.0);

        let first = armed(&mut pool, 0.0);
        let first_id = first.id();
        assert!(pool.launch(first));
        let second = armed(&mut pool, 0.0);
        assert!(pool.launch(second));

        assert!(pool.spawn().is_none());
        assert_eq!(pool.available(), 0);

        assert!(pool.recycle(first_id));
        assert!(!pool.recycle(first_id));
        assert_eq!(pool.spawn().map(|m| m.id()), Some(first_id));
    }

    #[test]
    fn test_unarmed_missile_is_not_launched() {
        let mut pool = MissilePool::new("chase", 1, 1.0);
        let missile = pool.spawn().unwrap();
        assert!(!pool.launch(missile));
        assert!(pool.launches().is_empty());
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn test_expired_missiles_are_recycled() {
        let mut pool = MissilePool::new("chase", 4, 2.0);
        let early = armed(&mut pool, 0.0);
        pool.launch(early);
        let late = armed(&mut pool, 1.5);
        pool.launch(late);

        assert_eq!(pool.recycle_expired(2.5), 1);
        assert_eq!(pool.in_flight(), 1);
        assert_eq!(pool.launches().len(), 2);
    }

    #[test]
    fn test_facade_skips_unknown_types() {
        let mut facade = MissileSpawnFacade::new();
        assert!(facade.spawn(0).is_none());

        let index = facade.register(Box::new(MissilePool::new("chase", 1, 1.0)));
        assert_eq!(index, 0);
        assert!(facade.spawn(0).is_some());
        assert!(facade.spawn(0).is_none());
        assert!(facade.spawn(3).is_none());
        assert!(facade.source(0).unwrap().as_any().downcast_ref::<MissilePool>().is_some());
    }
}
