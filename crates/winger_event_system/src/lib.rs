//! # Winger Event System
//!
//! Authority/observer replication primitives for the Winger arena server.
//!
//! One execution context, the **authority**, decides what a networked actor
//! does. Every other context is an **observer** that mirrors those decisions
//! and derives its own presentation state locally. Two mechanisms carry the
//! authority's decisions:
//!
//! - **Replicated fields** ([`Replicated`]): authority-owned values with a
//!   per-field revision. Observers apply last-write-wins per field; there is no
//!   multi-field atomicity.
//! - **Directives** ([`DirectiveOutbox`] / [`DirectiveInbox`]): named
//!   procedures the authority runs in-line and then broadcasts. Observers run
//!   the same body, in order, against their own local state.
//!
//! Game logic plugs into an [`Actor`] as a [`Behavior`]. A
//! [`ReplicationSession`] steps the authority and its observers together and
//! guarantees that directives issued during one step are applied everywhere
//! before the next step begins.
//!
//! ## Quick Start Example
//!
//! ```rust,no_run
//! use winger_event_system::*;
//!
//! fn run(behavior_for: impl Fn() -> Box<dyn Behavior>) -> Result<(), SessionError> {
//!     let id = ActorId::new();
//!     let authority = Actor::new(id, Role::Authority, Transform::default(), behavior_for());
//!     let observer = Actor::new(id, Role::Observer, Transform::default(), behavior_for());
//!
//!     let mut session = ReplicationSession::new(authority, vec![observer])?;
//!     session.enter_combat(0.0);
//!     for tick in 1..=60 {
//!         session.step(1.0 / 60.0, tick as f64 / 60.0);
//!     }
//!     println!("{:?}", session.stats());
//!     Ok(())
//! }
//! ```

pub mod actor;
pub mod directive;
pub mod events;
pub mod replication;
pub mod session;
pub mod shutdown;
pub mod types;

pub use actor::{Actor, ActorContext, Behavior, BehaviorError, Lifecycle};
pub use directive::{Admission, DirectiveEnvelope, DirectiveInbox, DirectiveOutbox};
pub use events::{from_payload, to_payload, Event, EventError};
pub use replication::{collect_into, FieldBatch, FieldUpdate, ReplicationError, Replicated};
pub use session::{ReplicationMessage, ReplicationSession, SessionError, SessionStats};
pub use shutdown::{ShutdownState, StopReason};
pub use types::*;

// External dependencies that behaviors commonly need
pub use serde::{Deserialize, Serialize};
