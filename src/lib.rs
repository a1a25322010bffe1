//! hsm-engine: a hierarchical state machine engine
//!
//! A static tree of states, each with a handler; a dispatcher that offers
//! every event to the current state and then to its ancestors; and a
//! transition engine that fires the exit, entry and initial pseudo-events a
//! state change requires. Dispatch is synchronous, runs to completion and
//! never allocates.
//!
//! # Core Concepts
//!
//! - **State tree**: immutable arena of states rooted at the synthetic `top`
//! - **Handlers**: closures returning `Handled`, `Unhandled` or `Transition`
//! - **Machine**: the running instance holding the current state and the
//!   application context handlers operate on
//!
//! # Example
//!
//! ```rust
//! use hsm_engine::builder::{MachineBuilder, StateTreeBuilder};
//! use hsm_engine::core::{Event, Outcome, StateId, Trigger};
//! use hsm_engine::signals;
//!
//! signals! {
//!     enum Door {
//!         Open,
//!         Close,
//!     }
//! }
//!
//! let mut builder = StateTreeBuilder::<Vec<&'static str>>::new();
//! let closed = builder.state("closed", StateId::ROOT).unwrap();
//! let opened = builder.state("opened", StateId::ROOT).unwrap();
//!
//! builder
//!     .handler(closed, move |_, event: &Event<'_>| match event.trigger::<Door>() {
//!         Trigger::User(Door::Open) => Outcome::Transition(opened),
//!         _ => Outcome::Unhandled,
//!     })
//!     .handler(opened, move |log, event: &Event<'_>| match event.trigger::<Door>() {
//!         Trigger::Entry => {
//!             log.push("creak");
//!             Outcome::Handled
//!         }
//!         Trigger::User(Door::Close) => Outcome::Transition(closed),
//!         _ => Outcome::Unhandled,
//!     });
//!
//! let mut machine = MachineBuilder::new(builder.build().unwrap())
//!     .context(Vec::new())
//!     .initial(closed)
//!     .build()
//!     .unwrap();
//!
//! machine.dispatch_signal(Door::Open).unwrap();
//! assert_eq!(machine.current(), opened);
//! assert_eq!(machine.context(), &vec!["creak"]);
//! ```

pub mod builder;
pub mod core;
pub mod engine;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder, StateTreeBuilder};
pub use crate::core::{Event, Outcome, Signal, StateId, StateTree, Trigger};
pub use engine::{HsmError, Machine, MAX_DEPTH};
