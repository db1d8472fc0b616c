//! # Replicated Field Protocol
//!
//! A [`Replicated`] field is state owned by the authority role. Only the
//! authority's writes are transmitted; observers read whatever the authority
//! last pushed. There is no per-field acknowledgement and no multi-field
//! atomicity: each field carries its own revision and observers apply
//! last-write-wins per field.
//!
//! Writes mark the field dirty. The host collects dirty fields after a tick
//! into a [`FieldBatch`]; batching is only an optimization, observers must not
//! rely on seeing any intermediate value.

use crate::events::{from_payload, to_payload, EventError};
use crate::types::{ActorId, Role};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Errors raised by the replication layer.
#[derive(Debug, thiserror::Error)]
pub enum ReplicationError {
    /// An observer tried to write authority-owned state
    #[error("Observer attempted to write replicated field '{field}'")]
    ObserverWrite { field: &'static str },

    /// An observer tried to publish a directive
    #[error("Only the authority may publish directive '{directive}'")]
    NotAuthority { directive: String },

    /// A field update was routed to the wrong field
    #[error("Field update for '{received}' cannot be applied to '{expected}'")]
    FieldMismatch {
        expected: &'static str,
        received: String,
    },

    /// No field with this name exists on the receiving behavior
    #[error("Unknown replicated field: {0}")]
    UnknownField(String),

    /// A directive arrived ahead of the next expected sequence number
    #[error("Directive sequence gap for actor {actor}: expected {expected}, received {received}")]
    SequenceGap {
        actor: ActorId,
        expected: u64,
        received: u64,
    },

    /// A message was routed to the wrong actor
    #[error("Message for actor {received} delivered to actor {expected}")]
    WrongActor { expected: ActorId, received: ActorId },

    /// Payload encoding failed
    #[error(transparent)]
    Codec(#[from] EventError),
}

/// A single authority-side write, ready for transmission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldUpdate {
    /// Name of the replicated field
    pub field: String,
    /// Authority revision of the field at the time of the write
    pub revision: u64,
    /// Encoded value
    pub value: serde_json::Value,
}

/// All dirty fields of one actor collected after a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldBatch {
    /// Actor whose fields changed
    pub actor: ActorId,
    /// Updates in collection order
    pub updates: Vec<FieldUpdate>,
}

impl FieldBatch {
    /// Returns `true` when the batch carries nothing.
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}

/// An authority-owned field mirrored on every observer.
///
/// # Examples
///
/// ```rust
/// use winger_event_system::{Replicated, Role};
///
/// let mut on_server = Replicated::new("remaining", 20.0_f64);
/// let mut on_client = Replicated::new("remaining", 20.0_f64);
///
/// on_server.set(Role::Authority, 17.5).unwrap();
/// let update = on_server.take_update().unwrap().unwrap();
///
/// assert!(on_client.apply_update(&update).unwrap());
/// assert_eq!(*on_client.get(), 17.5);
/// assert!(on_client.set(Role::Observer, 3.0).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Replicated<T> {
    name: &'static str,
    value: T,
    revision: u64,
    dirty: bool,
}

impl<T> Replicated<T>
where
    T: Clone + Serialize + DeserializeOwned,
{
    /// Creates a clean field with revision 0.
    pub fn new(name: &'static str, value: T) -> Self {
        Self {
            name,
            value,
            revision: 0,
            dirty: false,
        }
    }

    /// Field name used on the wire.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Latest value known to this role.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Revision of the latest authoritative write seen by this role.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether a write is waiting to be transmitted.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Authoritative write. Rejected on observers.
    pub fn set(&mut self, role: Role, value: T) -> Result<(), ReplicationError> {
        if !role.is_authority() {
            return Err(ReplicationError::ObserverWrite { field: self.name });
        }
        self.assign(role, value);
        Ok(())
    }

    /// Write performed by a directive body, which runs on every role.
    ///
    /// On the authority this is an authoritative write. On an observer it only
    /// mirrors the authority's decision locally: the revision is untouched and
    /// nothing is queued for transmission.
    pub fn assign(&mut self, role: Role, value: T) {
        self.value = value;
        if role.is_authority() {
            self.revision += 1;
            self.dirty = true;
        }
    }

    /// Takes the pending update, if any, clearing the dirty flag.
    pub fn take_update(&mut self) -> Result<Option<FieldUpdate>, ReplicationError> {
        if !self.dirty {
            return Ok(None);
        }
        let value = to_payload(&self.value)?;
        self.dirty = false;
        Ok(Some(FieldUpdate {
            field: self.name.to_string(),
            revision: self.revision,
            value,
        }))
    }

    /// Applies an authority update on an observer.
    ///
    /// Returns `Ok(false)` when the update is not newer than what this role has
    /// already applied.
    pub fn apply_update(&mut self, update: &FieldUpdate) -> Result<bool, ReplicationError> {
        if update.field != self.name {
            return Err(ReplicationError::FieldMismatch {
                expected: self.name,
                received: update.field.clone(),
            });
        }
        if update.revision <= self.revision {
            return Ok(false);
        }
        self.value = from_payload(&update.value)?;
        self.revision = update.revision;
        self.dirty = false;
        Ok(true)
    }
}

/// Pushes the pending update of `field` into `updates`.
///
/// Small helper so behaviors can collect all their fields in one expression
/// chain without repeating the `Option` plumbing.
pub fn collect_into<T>(
    field: &mut Replicated<T>,
    updates: &mut Vec<FieldUpdate>,
) -> Result<(), ReplicationError>
where
    T: Clone + Serialize + DeserializeOwned,
{
    if let Some(update) = field.take_update()? {
        updates.push(update);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Vec3;

    #[test]
    fn test_observer_write_is_rejected() {
        let mut field = Replicated::new("move_target", Vec3::zero());
        let err = field.set(Role::Observer, Vec3::new(1.0, 1.0, 1.0)).unwrap_err();
        assert!(matches!(err, ReplicationError::ObserverWrite { field: "move_target" }));
        assert_eq!(*field.get(), Vec3::zero());
        assert!(!field.is_dirty());
    }

    #[test]
    fn test_assign_on_observer_mirrors_without_revision() {
        let mut field = Replicated::new("phase", 0u8);
        field.assign(Role::Observer, 1);
        assert_eq!(*field.get(), 1);
        assert_eq!(field.revision(), 0);
        assert!(field.take_update().unwrap().is_none());
    }

    #[test]
    fn test_take_update_clears_dirty_flag() {
        let mut field = Replicated::new("remaining", 2.0_f64);
        field.set(Role::Authority, 1.0).unwrap();
        field.set(Role::Authority, -1.0).unwrap();

        let update = field.take_update().unwrap().expect("dirty field yields an update");
        assert_eq!(update.revision, 2);
        assert_eq!(update.value, serde_json::json!(-1.0));
        assert!(field.take_update().unwrap().is_none());
    }

    #[test]
    fn test_last_write_wins_per_field() {
        let mut authority = Replicated::new("remaining", 10.0_f64);
        let mut observer = Replicated::new("remaining", 10.0_f64);

        authority.set(Role::Authority, 8.0).unwrap();
        let older = authority.take_update().unwrap().unwrap();
        authority.set(Role::Authority, 6.0).unwrap();
        let newer = authority.take_update().unwrap().unwrap();

        assert!(observer.apply_update(&newer).unwrap());
        assert!(!observer.apply_update(&older).unwrap());
        assert_eq!(*observer.get(), 6.0);
    }

    #[test]
    fn test_decimal_values_survive_the_wire_bit_for_bit() {
        let mut authority = Replicated::new("move_remaining_distance", 0.0_f64);
        let mut observer = Replicated::new("move_remaining_distance", 0.0_f64);

        for i in 1..=2_000u32 {
            let value = 15.0 + f64::from(i) * 0.000123456789123;
            authority.set(Role::Authority, value).unwrap();
            let update = authority.take_update().unwrap().unwrap();

            let bytes = serde_json::to_vec(&update).unwrap();
            let received: FieldUpdate = serde_json::from_slice(&bytes).unwrap();
            assert!(observer.apply_update(&received).unwrap());

            assert_eq!(observer.get().to_bits(), value.to_bits(), "value {value} drifted");
        }

        let mut target = Replicated::new("move_target", Vec3::zero());
        let mut mirror = Replicated::new("move_target", Vec3::zero());
        let position = Vec3::new(0.1, 15.893228102515797, -7.3);
        target.set(Role::Authority, position).unwrap();
        let bytes = serde_json::to_vec(&target.take_update().unwrap().unwrap()).unwrap();
        mirror
            .apply_update(&serde_json::from_slice(&bytes).unwrap())
            .unwrap();
        assert_eq!(*mirror.get(), position);
    }

    #[test]
    fn test_field_mismatch_is_reported() {
        let mut field = Replicated::new("fire_rotation", Vec3::zero());
        let update = FieldUpdate {
            field: "move_target".to_string(),
            revision: 1,
            value: serde_json::json!({"x": 0.0, "y": 0.0, "z": 0.0}),
        };
        assert!(matches!(
            field.apply_update(&update),
            Err(ReplicationError::FieldMismatch { .. })
        ));
    }

    #[test]
    fn test_collect_into_skips_clean_fields() {
        let mut a = Replicated::new("a", 1u32);
        let mut b = Replicated::new("b", 2u32);
        b.set(Role::Authority, 3).unwrap();

        let mut updates = Vec::new();
        collect_into(&mut a, &mut updates).unwrap();
        collect_into(&mut b, &mut updates).unwrap();

        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].field, "b");
    }
}
