//! Core state tree types.
//!
//! This module contains the passive data the engine operates on:
//! - Signals and events routed through the tree
//! - State descriptors, handlers and handler outcomes
//! - The immutable state tree and its ancestry queries
//! - Optional transition history
//!
//! Nothing in this module mutates state at runtime; the engine lives in
//! [`crate::engine`].

mod event;
mod history;
mod state;
mod tree;

pub use event::{Event, Signal, Trigger, UserSignal};
pub use history::{TransitionHistory, TransitionRecord};
pub use state::{Handler, Outcome, StateDescriptor, StateId};
pub use tree::{Ancestors, StateTree, ROOT_NAME};
