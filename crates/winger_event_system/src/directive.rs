//! # One-Way Directive Channel
//!
//! A directive is a named procedure the authority invokes on every role with a
//! fixed argument payload. The authority runs the body in-line and then
//! publishes an envelope; each observer runs the same body when the envelope is
//! delivered, against its own local state.
//!
//! Ordering is per actor: the [`DirectiveOutbox`] stamps strictly increasing
//! sequence numbers and the [`DirectiveInbox`] accepts them only in order.
//! Replays of an already applied sequence number are dropped silently. A gap
//! means a directive was lost, which the channel reports instead of guessing.

use crate::events::{from_payload, to_payload};
use crate::replication::ReplicationError;
use crate::types::{ActorId, Role};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

/// A directive as it travels from the authority to the observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectiveEnvelope {
    /// Actor the directive targets
    pub actor: ActorId,
    /// Per-actor sequence number, starting at 1
    pub sequence: u64,
    /// Directive name, used for logging and dispatch sanity checks
    pub name: String,
    /// Encoded directive payload
    pub payload: serde_json::Value,
}

impl DirectiveEnvelope {
    /// Decodes the payload into a typed directive.
    pub fn decode<D: DeserializeOwned>(&self) -> Result<D, ReplicationError> {
        Ok(from_payload(&self.payload)?)
    }
}

/// Authority-side sequencer for one actor's directives.
#[derive(Debug)]
pub struct DirectiveOutbox {
    actor: ActorId,
    role: Role,
    next_sequence: u64,
    pending: Vec<DirectiveEnvelope>,
}

impl DirectiveOutbox {
    pub fn new(actor: ActorId, role: Role) -> Self {
        Self {
            actor,
            role,
            next_sequence: 1,
            pending: Vec::new(),
        }
    }

    /// Encodes and enqueues a directive for broadcast.
    ///
    /// Observers never publish; the call is rejected with
    /// [`ReplicationError::NotAuthority`].
    pub fn publish<D: Serialize>(
        &mut self,
        name: &str,
        directive: &D,
    ) -> Result<u64, ReplicationError> {
        if !self.role.is_authority() {
            return Err(ReplicationError::NotAuthority {
                directive: name.to_string(),
            });
        }

        let payload = to_payload(directive)?;
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        debug!("📤 Directive '{}' #{} queued for actor {}", name, sequence, self.actor);
        self.pending.push(DirectiveEnvelope {
            actor: self.actor,
            sequence,
            name: name.to_string(),
            payload,
        });
        Ok(sequence)
    }

    /// Takes every queued envelope in publish order.
    pub fn drain(&mut self) -> Vec<DirectiveEnvelope> {
        std::mem::take(&mut self.pending)
    }

    /// Number of envelopes waiting to be drained.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Sequence number the next publish will receive.
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }
}

/// Outcome of offering an envelope to a [`DirectiveInbox`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The envelope is next in order and must be applied now
    Apply,
    /// The envelope was already applied and is ignored
    Duplicate,
}

/// Observer-side ordering guard for one actor's directives.
#[derive(Debug)]
pub struct DirectiveInbox {
    actor: ActorId,
    expected: u64,
}

impl DirectiveInbox {
    pub fn new(actor: ActorId) -> Self {
        Self { actor, expected: 1 }
    }

    /// Checks whether `envelope` may be applied now.
    ///
    /// On [`Admission::Apply`] the inbox has already advanced, so the caller
    /// must run the directive body exactly once.
    pub fn admit(&mut self, envelope: &DirectiveEnvelope) -> Result<Admission, ReplicationError> {
        if envelope.actor != self.actor {
            return Err(ReplicationError::WrongActor {
                expected: self.actor,
                received: envelope.actor,
            });
        }

        if envelope.sequence < self.expected {
            debug!(
                "🔁 Dropping duplicate directive '{}' #{} for actor {}",
                envelope.name, envelope.sequence, self.actor
            );
            return Ok(Admission::Duplicate);
        }

        if envelope.sequence > self.expected {
            warn!(
                "⚠️ Directive '{}' #{} arrived out of order for actor {} (expected #{})",
                envelope.name, envelope.sequence, self.actor, self.expected
            );
            return Err(ReplicationError::SequenceGap {
                actor: self.actor,
                expected: self.expected,
                received: envelope.sequence,
            });
        }

        self.expected += 1;
        Ok(Admission::Apply)
    }

    /// Sequence number the inbox is waiting for.
    pub fn expected(&self) -> u64 {
        self.expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Bounce {
        half_height: f64,
        length: f64,
    }

    #[test]
    fn test_outbox_sequences_are_strictly_increasing() {
        let actor = ActorId::new();
        let mut outbox = DirectiveOutbox::new(actor, Role::Authority);

        let first = outbox.publish("bounce", &Bounce { half_height: 5.0, length: 20.0 }).unwrap();
        let second = outbox.publish("bounce", &Bounce { half_height: -5.0, length: 12.0 }).unwrap();
        assert_eq!((first, second), (1, 2));

        let drained = outbox.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[1].decode::<Bounce>().unwrap().length, 12.0);
        assert_eq!(outbox.pending(), 0);
        assert_eq!(outbox.next_sequence(), 3);
    }

    #[test]
    fn test_observer_cannot_publish() {
        let mut outbox = DirectiveOutbox::new(ActorId::new(), Role::Observer);
        let result = outbox.publish("bounce", &Bounce { half_height: 1.0, length: 1.0 });
        assert!(matches!(result, Err(ReplicationError::NotAuthority { .. })));
        assert_eq!(outbox.pending(), 0);
    }

    #[test]
    fn test_inbox_applies_in_order_and_drops_duplicates() {
        let actor = ActorId::new();
        let mut outbox = DirectiveOutbox::new(actor, Role::Authority);
        let mut inbox = DirectiveInbox::new(actor);

        outbox.publish("a", &()).unwrap();
        outbox.publish("b", &()).unwrap();
        let envelopes = outbox.drain();

        assert_eq!(inbox.admit(&envelopes[0]).unwrap(), Admission::Apply);
        assert_eq!(inbox.admit(&envelopes[0]).unwrap(), Admission::Duplicate);
        assert_eq!(inbox.admit(&envelopes[1]).unwrap(), Admission::Apply);
        assert_eq!(inbox.expected(), 3);
    }

    #[test]
    fn test_inbox_reports_gaps() {
        let actor = ActorId::new();
        let mut outbox = DirectiveOutbox::new(actor, Role::Authority);
        let mut inbox = DirectiveInbox::new(actor);

        outbox.publish("lost", &()).unwrap();
        outbox.publish("late", &()).unwrap();
        let envelopes = outbox.drain();

        let err = inbox.admit(&envelopes[1]).unwrap_err();
        assert!(matches!(
            err,
            ReplicationError::SequenceGap { expected: 1, received: 2, .. }
        ));
        assert_eq!(inbox.expected(), 1);
    }

    #[test]
    fn test_inbox_rejects_foreign_actor() {
        let mut outbox = DirectiveOutbox::new(ActorId::new(), Role::Authority);
        let mut inbox = DirectiveInbox::new(ActorId::new());
        outbox.publish("a", &()).unwrap();
        let envelope = outbox.drain().remove(0);
        assert!(matches!(inbox.admit(&envelope), Err(ReplicationError::WrongActor { .. })));
    }
}
