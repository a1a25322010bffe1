//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::core::{StateDescriptor, StateId, StateTree};
use crate::engine::{HsmError, Machine, Observer};
use std::sync::Arc;

/// Builder for constructing running machines with a fluent API.
///
/// `build` performs the initial entry into the chosen state, so the machine
/// it returns is already settled in its leaf-most default state.
pub struct MachineBuilder<C> {
    tree: Arc<StateTree<C>>,
    context: Option<C>,
    initial: Option<StateId>,
    observer: Option<Observer<C>>,
    record_history: bool,
}

impl<C> MachineBuilder<C> {
    /// Create a builder for a machine running over `tree`.
    pub fn new(tree: impl Into<Arc<StateTree<C>>>) -> Self {
        Self {
            tree: tree.into(),
            context: None,
            initial: None,
            observer: None,
            record_history: false,
        }
    }

    /// Set the domain context handed to every handler (required).
    pub fn context(mut self, context: C) -> Self {
        self.context = Some(context);
        self
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: StateId) -> Self {
        self.initial = Some(state);
        self
    }

    /// Observe every transition pass as `(source, target)`.
    ///
    /// The observer is purely diagnostic and cannot influence the machine.
    pub fn on_transition<F>(mut self, observer: F) -> Self
    where
        F: FnMut(&StateDescriptor<C>, &StateDescriptor<C>) + Send + 'static,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Keep a [`TransitionHistory`](crate::core::TransitionHistory) of every
    /// transition pass.
    pub fn record_history(mut self) -> Self {
        self.record_history = true;
        self
    }

    /// Build the machine and enter its initial state.
    pub fn build(self) -> Result<Machine<C>, HsmError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        let context = self.context.ok_or(BuildError::MissingContext)?;

        Machine::start(
            self.tree,
            context,
            initial,
            self.observer,
            self.record_history,
        )
    }
}

impl<C: Default> MachineBuilder<C> {
    /// Use `C::default()` as the context unless one was set.
    pub fn default_context(mut self) -> Self {
        if self.context.is_none() {
            self.context = Some(C::default());
        }
        self
    }
}
