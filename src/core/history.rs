//! Transition history tracking.
//!
//! An optional, serializable trace of every transition pass a machine
//! performs. Recording is opt-in because it is the only part of the engine
//! that allocates.

use super::state::StateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single transition pass.
///
/// A dispatched event that lands in a composite state produces several
/// passes: the requested transition (`pass == 0`) followed by one pass per
/// nested initial transition.
///
/// # Example
///
/// ```rust
/// use hsm_engine::core::{StateId, TransitionRecord};
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     source: StateId::ROOT,
///     target: StateId::ROOT,
///     source_name: "top".to_string(),
///     target_name: "top".to_string(),
///     timestamp: Utc::now(),
///     pass: 0,
/// };
/// assert!(record.is_self_transition());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub source: StateId,
    pub target: StateId,
    pub source_name: String,
    pub target_name: String,
    /// When the pass started
    pub timestamp: DateTime<Utc>,
    /// Position within a chain of nested initial transitions
    pub pass: usize,
}

impl TransitionRecord {
    pub fn is_self_transition(&self) -> bool {
        self.source == self.target
    }

    /// True for passes triggered by an `Init` pseudo-event rather than by a
    /// dispatched event.
    pub fn is_initial(&self) -> bool {
        self.pass > 0
    }
}

/// Ordered history of transition passes.
///
/// History is immutable - `record` returns a new history with the pass
/// added.
///
/// # Example
///
/// ```rust
/// use hsm_engine::core::{StateId, TransitionHistory, TransitionRecord};
/// use chrono::Utc;
///
/// let history = TransitionHistory::new();
/// let history = history.record(TransitionRecord {
///     source: StateId::ROOT,
///     target: StateId::ROOT,
///     source_name: "top".to_string(),
///     target_name: "top".to_string(),
///     timestamp: Utc::now(),
///     pass: 0,
/// });
///
/// assert_eq!(history.transitions().len(), 1);
/// assert_eq!(history.get_path(), vec![StateId::ROOT, StateId::ROOT]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionHistory {
    transitions: Vec<TransitionRecord>,
}

impl TransitionHistory {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a pass, returning a new history.
    pub fn record(&self, record: TransitionRecord) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(record);
        Self { transitions }
    }

    /// Append a pass in place. Used by the engine, which owns its history.
    pub(crate) fn push(&mut self, record: TransitionRecord) {
        self.transitions.push(record);
    }

    /// States the machine settled in: the first source, then the target of
    /// each pass.
    pub fn get_path(&self) -> Vec<StateId> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(first.source);
        }
        path.extend(self.transitions.iter().map(|t| t.target));
        path
    }

    /// Time between the first and last recorded pass.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.first()?, self.transitions.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
