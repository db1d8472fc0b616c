//! # Replication Session
//!
//! In-process host for one actor: the authority copy plus any number of
//! observer copies, each behind a link that carries encoded
//! [`ReplicationMessage`]s.
//!
//! Every [`ReplicationSession::step`] runs the authority first, encodes and
//! queues everything it produced on every connected link, and only then lets
//! each observer drain its link and tick. Directives issued during step N are
//! therefore applied on every role before any role runs step N+1.

use crate::actor::Actor;
use crate::directive::DirectiveEnvelope;
use crate::events::Event;
use crate::replication::FieldBatch;
use crate::types::{ActorId, Role};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// The wire unit between the authority and an observer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "body")]
pub enum ReplicationMessage {
    /// A one-way directive to run on the observer
    Directive(DirectiveEnvelope),
    /// Authority writes of replicated fields
    Fields(FieldBatch),
}

/// Errors raised while assembling a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// An actor was handed to the wrong side of the session
    #[error("Actor {actor} has role {actual}, expected {expected}")]
    RoleMismatch {
        actor: ActorId,
        expected: Role,
        actual: Role,
    },
    /// An observer copies a different actor than the authority
    #[error("Observer copies actor {observer} but the authority owns {authority}")]
    ActorMismatch { authority: ActorId, observer: ActorId },
}

/// Delivery counters for a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Steps executed
    pub ticks: u64,
    /// Directive envelopes applied by observers
    pub directives_delivered: u64,
    /// Individual field updates handed to observers
    pub field_updates_delivered: u64,
    /// Encoded bytes queued on links
    pub bytes_sent: u64,
    /// Messages that failed to encode, decode or apply
    pub delivery_errors: u64,
    /// Messages discarded because the authority was disconnected
    pub messages_dropped: u64,
}

/// One observer copy and its inbound link.
#[derive(Debug)]
struct ObserverLink {
    actor: Actor,
    queue: VecDeque<Vec<u8>>,
}

/// Authority plus observers of a single actor, stepped together.
#[derive(Debug)]
pub struct ReplicationSession {
    authority: Actor,
    observers: Vec<ObserverLink>,
    connected: bool,
    stats: SessionStats,
}

impl ReplicationSession {
    /// Builds a session, checking that roles and actor ids line up.
    pub fn new(authority: Actor, observers: Vec<Actor>) -> Result<Self, SessionError> {
        if authority.role() != Role::Authority {
            return Err(SessionError::RoleMismatch {
                actor: authority.id(),
                expected: Role::Authority,
                actual: authority.role(),
            });
        }

        let mut links = Vec::with_capacity(observers.len());
        for observer in observers {
            if observer.role() != Role::Observer {
                return Err(SessionError::RoleMismatch {
                    actor: observer.id(),
                    expected: Role::Observer,
                    actual: observer.role(),
                });
            }
            if observer.id() != authority.id() {
                return Err(SessionError::ActorMismatch {
                    authority: authority.id(),
                    observer: observer.id(),
                });
            }
            links.push(ObserverLink {
                actor: observer,
                queue: VecDeque::new(),
            });
        }

        info!(
            "🔗 Replication session ready for actor {} with {} observer(s)",
            authority.id(),
            links.len()
        );

        Ok(Self {
            authority,
            observers: links,
            connected: true,
            stats: SessionStats::default(),
        })
    }

    /// Puts every copy of the actor into combat.
    pub fn enter_combat(&mut self, now: f64) {
        self.authority.enter_combat(now);
        for link in &mut self.observers {
            link.actor.enter_combat(now);
        }
    }

    /// Runs one simulation step on every role.
    pub fn step(&mut self, delta: f64, now: f64) {
        self.stats.ticks += 1;

        self.authority.tick(delta, now);
        let outbound = self.authority.drain_outbound();

        if self.connected {
            for message in &outbound {
                match Event::serialize(message) {
                    Ok(bytes) => {
                        for link in &mut self.observers {
                            self.stats.bytes_sent += bytes.len() as u64;
                            link.queue.push_back(bytes.clone());
                        }
                    }
                    Err(e) => {
                        self.stats.delivery_errors += 1;
                        warn!("⚠️ Failed to encode replication message: {}", e);
                    }
                }
            }
        } else if !outbound.is_empty() {
            self.stats.messages_dropped += outbound.len() as u64;
            debug!("📴 Authority disconnected, dropped {} message(s)", outbound.len());
        }

        for link in &mut self.observers {
            while let Some(bytes) = link.queue.pop_front() {
                if let Err(e) = deliver(&mut link.actor, &bytes, now, &mut self.stats) {
                    self.stats.delivery_errors += 1;
                    warn!("⚠️ Observer failed to apply replication message: {}", e);
                }
            }
            link.actor.tick(delta, now);
        }
    }

    /// Severs every link. Observers keep ticking on whatever state they last
    /// received; there is no failover to a new authority.
    pub fn disconnect_authority(&mut self) {
        if self.connected {
            self.connected = false;
            for link in &mut self.observers {
                link.queue.clear();
            }
            warn!("📴 Authority for actor {} disconnected", self.authority.id());
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn authority(&self) -> &Actor {
        &self.authority
    }

    pub fn authority_mut(&mut self) -> &mut Actor {
        &mut self.authority
    }

    pub fn observer(&self, index: usize) -> Option<&Actor> {
        self.observers.get(index).map(|link| &link.actor)
    }

    pub fn observers(&self) -> impl Iterator<Item = &Actor> {
        self.observers.iter().map(|link| &link.actor)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }
}

fn deliver(
    actor: &mut Actor,
    bytes: &[u8],
    now: f64,
    stats: &mut SessionStats,
) -> Result<(), Box<dyn std::error::Error>> {
    let message = <ReplicationMessage as Event>::deserialize(bytes)?;
    actor.receive(&message, now)?;

    match &message {
        ReplicationMessage::Directive(_) => stats.directives_delivered += 1,
        ReplicationMessage::Fields(batch) => {
            stats.field_updates_delivered += batch.updates.len() as u64
        }
    }
    Ok(())
}
