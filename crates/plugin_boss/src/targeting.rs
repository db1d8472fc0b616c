//! # Targeting Query
//!
//! Resolves the players a chase missile may home onto.
//!
//! The scene is scanned once, on the first query, and the roster is cached
//! for the lifetime of the query: players joining after combat starts are not
//! picked up. Every query re-filters the cached roster by the current alive
//! state, so the result shrinks as players die and may be empty. An empty
//! result is an ordinary outcome that callers must handle.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;
use winger_event_system::{PlayerId, Vec3};

/// Read-only view of a player as the boss sees it.
pub trait PlayerView: Send + Sync {
    fn id(&self) -> PlayerId;
    fn is_dead(&self) -> bool;
    fn position(&self) -> Vec3;
}

/// Scene collaborator that enumerates every player instance.
pub trait SceneQuery: Send {
    fn all_players(&self) -> Vec<Arc<dyn PlayerView>>;
}

/// Lazily cached alive-player lookup.
pub struct TargetingQuery {
    scene: Box<dyn SceneQuery>,
    roster: Option<Vec<Arc<dyn PlayerView>>>,
}

impl fmt::Debug for TargetingQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetingQuery")
            .field("cached", &self.roster.as_ref().map(Vec::len))
            .finish()
    }
}

impl TargetingQuery {
    pub fn new(scene: Box<dyn SceneQuery>) -> Self {
        Self { scene, roster: None }
    }

    /// Returns the currently alive players, scanning the scene on first use.
    pub fn alive_players(&mut self) -> Vec<Arc<dyn PlayerView>> {
        let scene = &self.scene;
        let roster = self.roster.get_or_insert_with(|| {
            let players = scene.all_players();
            debug!("🎯 Targeting roster cached with {} player(s)", players.len());
            players
        });

        roster
            .iter()
            .filter(|player| !player.is_dead())
            .cloned()
            .collect()
    }

    /// Size of the cached roster, or `None` before the first query.
    pub fn roster_size(&self) -> Option<usize> {
        self.roster.as_ref().map(Vec::len)
    }
}

/// In-process player with a shared alive flag.
#[derive(Debug)]
pub struct ScenePlayer {
    id: PlayerId,
    position: Vec3,
    alive: AtomicBool,
}

impl ScenePlayer {
    pub fn new(id: PlayerId, position: Vec3) -> Arc<Self> {
        Arc::new(Self {
            id,
            position,
            alive: AtomicBool::new(true),
        })
    }

    pub fn kill(&self) {
        self.alive.store(false, Ordering::Release);
    }

    pub fn revive(&self) {
        self.alive.store(true, Ordering::Release);
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

impl PlayerView for ScenePlayer {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn is_dead(&self) -> bool {
        !self.is_alive()
    }

    fn position(&self) -> Vec3 {
        self.position
    }
}

/// Fixed set of scene players, counting how often it is scanned.
#[derive(Debug, Clone, Default)]
pub struct SceneRoster {
    players: Vec<Arc<ScenePlayer>>,
    scans: Arc<AtomicUsize>,
}

impl SceneRoster {
    pub fn new(players: Vec<Arc<ScenePlayer>>) -> Self {
        Self {
            players,
            scans: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of full scans performed so far, shared between clones.
    pub fn scan_count(&self) -> usize {
        self.scans.load(Ordering::Acquire)
    }

    pub fn players(&self) -> &[Arc<ScenePlayer>] {
        &self.players
    }
}

impl SceneQuery for SceneRoster {
    fn all_players(&self) -> Vec<Arc<dyn PlayerView>> {
        self.scans.fetch_add(1, Ordering::AcqRel);
        self.players
            .iter()
            .map(|player| Arc::clone(player) as Arc<dyn PlayerView>)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(count: usize) -> SceneRoster {
        SceneRoster::new(
            (0..count)
                .map(|i| ScenePlayer::new(PlayerId::new(), Vec3::new(i as f64, -8.0, 0.0)))
                .collect(),
        )
    }

    #[test]
    fn test_scene_is_scanned_once() {
        let scene = roster(3);
        let mut query = TargetingQuery::new(Box::new(scene.clone()));
        assert_eq!(query.roster_size(), None);

        assert_eq!(query.alive_players().len(), 3);
        assert_eq!(query.alive_players().len(), 3);
        assert_eq!(scene.scan_count(), 1);
        assert_eq!(query.roster_size(), Some(3));
    }

    #[test]
    fn test_dead_players_are_filtered_each_call() {
        let scene = roster(2);
        let mut query = TargetingQuery::new(Box::new(scene.clone()));

        scene.players()[0].kill();
        let alive = query.alive_players();
        assert_eq!(alive.len(), 1);
        assert_eq!(alive[0].id(), scene.players()[1].id());

        scene.players()[1].kill();
        assert!(query.alive_players().is_empty());

        scene.players()[0].revive();
        assert_eq!(query.alive_players().len(), 1);
    }

    #[test]
    fn test_empty_scene_yields_no_candidates() {
        let mut query = TargetingQuery::new(Box::new(SceneRoster::default()));
        assert!(query.alive_players().is_empty());
        assert_eq!(query.roster_size(), Some(0));
    }
}
