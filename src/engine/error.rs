//! Engine errors.
//!
//! Every error here is a configuration or programming error. None of them is
//! recoverable by retrying the same operation.

use crate::builder::BuildError;
use crate::core::StateId;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum HsmError {
    /// Only reachable through a tree that bypassed build-time validation.
    #[error("Traversal from state '{state}' exceeds the supported nesting depth of {max}")]
    NestingTooDeep { state: String, max: usize },

    /// Only reachable through a tree that bypassed build-time validation.
    #[error("Parent chain of state '{state}' never reaches the root")]
    MalformedTree { state: String },

    #[error("State {id} is not part of this machine's tree")]
    UnknownState { id: StateId },

    #[error("Initial transitions starting at '{state}' did not settle after {max} passes")]
    InitialTransitionLoop { state: String, max: usize },

    #[error(transparent)]
    Build(#[from] BuildError),
}
