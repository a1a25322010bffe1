//! Structural validation of state trees.
//!
//! Validation uses Stillwater's `Validation` type so a single build reports
//! every problem with the tree instead of stopping at the first one.

use crate::core::StateId;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A structural problem found while building a state tree.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TreeViolation {
    #[error("State '{state}' has no handler")]
    MissingHandler { state: String },

    #[error("State '{state}' has more than one handler")]
    DuplicateHandler { state: String },

    #[error("State '{state}' sits {depth} levels deep, the engine supports at most {max} levels")]
    NestingTooDeep {
        state: String,
        depth: usize,
        max: usize,
    },

    #[error("Handler registered for {id}, which is not part of this tree")]
    UnknownState { id: StateId },
}

/// What the validator needs to know about one declared state.
#[derive(Clone, Debug)]
pub(crate) struct StateSummary<'a> {
    pub name: &'a str,
    /// Levels on the path from the root to this state, both included.
    pub levels: usize,
    pub handlers: usize,
}

type Check = Validation<(), NonEmptyVec<TreeViolation>>;

fn check_handler(state: &StateSummary<'_>) -> Check {
    match state.handlers {
        1 => Validation::success(()),
        0 => Validation::fail(TreeViolation::MissingHandler {
            state: state.name.to_string(),
        }),
        _ => Validation::fail(TreeViolation::DuplicateHandler {
            state: state.name.to_string(),
        }),
    }
}

fn check_depth(state: &StateSummary<'_>, max: usize) -> Check {
    if state.levels > max {
        Validation::fail(TreeViolation::NestingTooDeep {
            state: state.name.to_string(),
            depth: state.levels,
            max,
        })
    } else {
        Validation::success(())
    }
}

/// Validate every declared state, accumulating ALL violations.
pub(crate) fn validate_tree<'a>(
    states: impl IntoIterator<Item = StateSummary<'a>>,
    strays: &[StateId],
    max_levels: usize,
) -> Check {
    let mut checks: Vec<Check> = Vec::new();

    for state in states {
        checks.push(check_handler(&state));
        checks.push(check_depth(&state, max_levels));
    }

    for id in strays {
        checks.push(Validation::fail(TreeViolation::UnknownState { id: *id }));
    }

    if checks.is_empty() {
        return Validation::success(());
    }

    Validation::all_vec(checks).map(|_| ())
}
