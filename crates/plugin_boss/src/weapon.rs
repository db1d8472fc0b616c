//! Standard-shot weapon collaborator.
//!
//! The boss only decides *when* and *from where* to fire; a [`Weapon`] turns
//! that into a projectile. [`ShotLog`] is the in-process implementation: it
//! records the most recent shots for inspection.

use crate::events::Shot;
use std::any::Any;
use std::collections::VecDeque;
use winger_event_system::{ActorId, Transform};

/// Emits a standard shot.
pub trait Weapon: Send {
    fn fire(&mut self, shooter: ActorId, origin: Transform, now: f64) -> Shot;

    /// Total shots fired over the weapon's lifetime.
    fn shots_fired(&self) -> u64;

    fn as_any(&self) -> &dyn Any;
}

/// Weapon that keeps the last `capacity` shots.
#[derive(Debug, Clone)]
pub struct ShotLog {
    capacity: usize,
    total: u64,
    recent: VecDeque<Shot>,
}

impl ShotLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            total: 0,
            recent: VecDeque::with_capacity(capacity),
        }
    }

    /// Recorded shots, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &Shot> {
        self.recent.iter()
    }

    pub fn last(&self) -> Option<&Shot> {
        self.recent.back()
    }
}

impl Default for ShotLog {
    fn default() -> Self {
        Self::new(64)
    }
}

impl Weapon for ShotLog {
    fn fire(&mut self, shooter: ActorId, origin: Transform, now: f64) -> Shot {
        let shot = Shot {
            shooter,
            position: origin.position,
            rotation: origin.rotation,
            fired_at: now,
        };
        self.total += 1;
        if self.capacity > 0 {
            if self.recent.len() == self.capacity {
                self.recent.pop_front();
            }
            self.recent.push_back(shot.clone());
        }
        shot
    }

    fn shots_fired(&self) -> u64 {
        self.total
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
