//! Build errors for state tree and machine builders.

use crate::builder::validation::TreeViolation;
use crate::core::StateId;
use thiserror::Error;

/// Errors that can occur when building state trees and machines.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Machine context not specified. Call .context(value) before .build()")]
    MissingContext,

    #[error("Parent {parent} of state '{name}' is not part of this tree")]
    UnknownParent { name: String, parent: StateId },

    #[error("State tree cannot hold more than {max} states")]
    TooManyStates { max: usize },

    #[error("State tree failed validation with {} violation(s): {}", .0.len(), summarize(.0))]
    InvalidTree(Vec<TreeViolation>),
}

fn summarize(violations: &[TreeViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
