//! # Actors and Behaviors
//!
//! An [`Actor`] is a networked entity as seen by one role. It owns the local
//! [`Transform`], the directive plumbing for its role and a pluggable
//! [`Behavior`] that supplies the actual game logic. Different enemy kinds are
//! different behaviors plugged into the same actor, not subclasses.
//!
//! ## Lifecycle
//!
//! ```text
//! Spawned ──enter_combat──▶ Combat ──(configuration failure)──▶ Disabled
//!    └────────────(configuration failure)─────────────────────────┘
//! ```
//!
//! A disabled actor stays in the scene but no longer ticks or applies
//! directives. Nothing a behavior returns from a hook is allowed to escape a
//! tick: configuration failures disable the actor, every other failure is
//! logged and the next tick proceeds normally.

use crate::directive::{Admission, DirectiveEnvelope, DirectiveInbox, DirectiveOutbox};
use crate::events::EventError;
use crate::replication::{FieldBatch, FieldUpdate, ReplicationError};
use crate::session::ReplicationMessage;
use crate::types::{ActorId, Role, Transform};
use serde::Serialize;
use std::any::Any;
use tracing::{debug, error, info, warn};

/// Errors a behavior hook can report to its actor.
#[derive(Debug, thiserror::Error)]
pub enum BehaviorError {
    /// The behavior cannot run with its current configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// A replication primitive refused an operation
    #[error(transparent)]
    Replication(#[from] ReplicationError),
    /// Payload encoding failed
    #[error(transparent)]
    Event(#[from] EventError),
    /// The behavior does not know this directive
    #[error("Unknown directive: {0}")]
    UnknownDirective(String),
}

/// Where an actor is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Spawned into the scene, not fighting yet
    Spawned,
    /// Engaged; ticks and directives are processed
    Combat,
    /// Stopped after a configuration failure
    Disabled,
}

/// Per-call view of the actor handed to behavior hooks.
///
/// Gives the behavior its identity, its role, mutable access to its own local
/// transform and, on the authority, a way to broadcast directives.
pub struct ActorContext<'a> {
    id: ActorId,
    role: Role,
    /// Local transform of this role's copy of the actor
    pub transform: &'a mut Transform,
    outbox: &'a mut DirectiveOutbox,
}

impl<'a> ActorContext<'a> {
    pub fn new(
        id: ActorId,
        role: Role,
        transform: &'a mut Transform,
        outbox: &'a mut DirectiveOutbox,
    ) -> Self {
        Self {
            id,
            role,
            transform,
            outbox,
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Role predicate consulted before any state-changing decision.
    pub fn is_authority(&self) -> bool {
        self.role.is_authority()
    }

    /// Broadcasts a directive to every observer.
    ///
    /// The caller is expected to have already applied the directive body
    /// locally; publishing only queues it for the observers.
    pub fn publish<D: Serialize>(&mut self, name: &str, directive: &D) -> Result<u64, ReplicationError> {
        self.outbox.publish(name, directive)
    }
}

/// Game logic plugged into an [`Actor`].
///
/// Hooks run identically on every role; each implementation is responsible
/// for consulting [`ActorContext::is_authority`] before making decisions.
pub trait Behavior: Send {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Checks the behavior's configuration before it enters combat.
    fn validate(&self) -> Result<(), BehaviorError> {
        Ok(())
    }

    /// Called once when the actor enters combat, on every role.
    fn on_enter_combat(&mut self, ctx: &mut ActorContext<'_>, now: f64) -> Result<(), BehaviorError>;

    /// Called once per simulation step, on every role.
    fn on_tick(&mut self, ctx: &mut ActorContext<'_>, delta: f64, now: f64) -> Result<(), BehaviorError>;

    /// Runs a directive body delivered from the authority.
    fn on_directive(
        &mut self,
        ctx: &mut ActorContext<'_>,
        envelope: &DirectiveEnvelope,
        now: f64,
    ) -> Result<(), BehaviorError>;

    /// Collects pending authority writes of every replicated field.
    fn collect_field_updates(&mut self) -> Result<Vec<FieldUpdate>, BehaviorError>;

    /// Applies one authority write on an observer.
    fn apply_field_update(&mut self, update: &FieldUpdate) -> Result<bool, BehaviorError>;

    /// Returns this behavior as `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns this behavior as `&mut dyn Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A networked entity as seen from one role.
pub struct Actor {
    id: ActorId,
    role: Role,
    transform: Transform,
    lifecycle: Lifecycle,
    behavior: Box<dyn Behavior>,
    outbox: DirectiveOutbox,
    inbox: DirectiveInbox,
}

impl std::fmt::Debug for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Actor")
            .field("id", &self.id)
            .field("role", &self.role)
            .field("behavior", &self.behavior.name())
            .field("lifecycle", &self.lifecycle)
            .field("transform", &self.transform)
            .finish()
    }
}

impl Actor {
    /// Spawns the local copy of actor `id` for `role`.
    pub fn new(id: ActorId, role: Role, transform: Transform, behavior: Box<dyn Behavior>) -> Self {
        debug!("🧩 Spawned {} actor {} ({})", behavior.name(), id, role);
        Self {
            id,
            role,
            transform,
            lifecycle: Lifecycle::Spawned,
            behavior,
            outbox: DirectiveOutbox::new(id, role),
            inbox: DirectiveInbox::new(id),
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Borrows the plugged behavior as its concrete type.
    pub fn behavior_as<B: Behavior + 'static>(&self) -> Option<&B> {
        self.behavior.as_any().downcast_ref::<B>()
    }

    /// Mutably borrows the plugged behavior as its concrete type.
    pub fn behavior_as_mut<B: Behavior + 'static>(&mut self) -> Option<&mut B> {
        self.behavior.as_any_mut().downcast_mut::<B>()
    }

    /// Moves the actor into combat.
    ///
    /// Validation runs first; a configuration failure disables the actor
    /// instead of letting it start a cycle it cannot finish.
    pub fn enter_combat(&mut self, now: f64) {
        if self.lifecycle != Lifecycle::Spawned {
            debug!("Actor {} already left the spawned state ({:?})", self.id, self.lifecycle);
            return;
        }

        if let Err(e) = self.behavior.validate() {
            self.disable(&e);
            return;
        }

        let mut ctx = ActorContext::new(self.id, self.role, &mut self.transform, &mut self.outbox);
        match self.behavior.on_enter_combat(&mut ctx, now) {
            Ok(()) => {
                self.lifecycle = Lifecycle::Combat;
                info!("⚔️ {} actor {} entered combat as {}", self.behavior.name(), self.id, self.role);
            }
            Err(e) => self.handle_failure(e, "enter combat"),
        }
    }

    /// Runs one simulation step.
    pub fn tick(&mut self, delta: f64, now: f64) {
        if self.lifecycle != Lifecycle::Combat {
            return;
        }

        let mut ctx = ActorContext::new(self.id, self.role, &mut self.transform, &mut self.outbox);
        if let Err(e) = self.behavior.on_tick(&mut ctx, delta, now) {
            self.handle_failure(e, "tick");
        }
    }

    /// Takes everything this role has to send: directives first, in publish
    /// order, followed by the batch of dirty replicated fields.
    pub fn drain_outbound(&mut self) -> Vec<ReplicationMessage> {
        let mut messages: Vec<ReplicationMessage> = self
            .outbox
            .drain()
            .into_iter()
            .map(ReplicationMessage::Directive)
            .collect();

        if !self.role.is_authority() {
            return messages;
        }

        match self.behavior.collect_field_updates() {
            Ok(updates) if !updates.is_empty() => {
                messages.push(ReplicationMessage::Fields(FieldBatch {
                    actor: self.id,
                    updates,
                }));
            }
            Ok(_) => {}
            Err(e) => warn!("⚠️ Failed to collect field updates for actor {}: {}", self.id, e),
        }

        messages
    }

    /// Applies a message from the authority on an observer.
    pub fn receive(&mut self, message: &ReplicationMessage, now: f64) -> Result<(), BehaviorError> {
        if self.lifecycle == Lifecycle::Disabled {
            return Ok(());
        }

        match message {
            ReplicationMessage::Directive(envelope) => {
                if self.inbox.admit(envelope)? == Admission::Duplicate {
                    return Ok(());
                }
                debug!(
                    "📥 Applying directive '{}' #{} on {} copy of actor {}",
                    envelope.name, envelope.sequence, self.role, self.id
                );
                let mut ctx =
                    ActorContext::new(self.id, self.role, &mut self.transform, &mut self.outbox);
                self.behavior.on_directive(&mut ctx, envelope, now)
            }
            ReplicationMessage::Fields(batch) => {
                if batch.actor != self.id {
                    return Err(ReplicationError::WrongActor {
                        expected: self.id,
                        received: batch.actor,
                    }
                    .into());
                }
                for update in &batch.updates {
                    self.behavior.apply_field_update(update)?;
                }
                Ok(())
            }
        }
    }

    fn handle_failure(&mut self, error: BehaviorError, stage: &str) {
        match error {
            BehaviorError::Configuration(_) => self.disable(&error),
            other => warn!(
                "⚠️ {} actor {} failed during {}: {}",
                self.behavior.name(),
                self.id,
                stage,
                other
            ),
        }
    }

    fn disable(&mut self, error: &BehaviorError) {
        error!(
            "❌ Disabling {} actor {} on {}: {}",
            self.behavior.name(),
            self.id,
            self.role,
            error
        );
        self.lifecycle = Lifecycle::Disabled;
    }
}
