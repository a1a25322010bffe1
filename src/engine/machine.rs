//! Running state machine instances and the event dispatcher.

use crate::core::{Event, Outcome, Signal, StateDescriptor, StateId, StateTree, TransitionHistory};
use crate::engine::error::HsmError;
use crate::engine::transition::{Observer, TransitionEngine};
use std::fmt;
use std::sync::Arc;

/// A running hierarchical state machine.
///
/// A machine owns its domain context and a shared handle to an immutable
/// [`StateTree`]. Machines are created by
/// [`MachineBuilder`](crate::builder::MachineBuilder), which enters the
/// initial state before handing the machine out.
///
/// Dispatch is synchronous and runs to completion. Handlers only ever see the
/// context, so they cannot re-enter the machine.
pub struct Machine<C> {
    tree: Arc<StateTree<C>>,
    current: StateId,
    context: C,
    observer: Option<Observer<C>>,
    history: Option<TransitionHistory>,
}

impl<C> Machine<C> {
    pub(crate) fn start(
        tree: Arc<StateTree<C>>,
        context: C,
        initial: StateId,
        observer: Option<Observer<C>>,
        record_history: bool,
    ) -> Result<Self, HsmError> {
        let mut machine = Self {
            tree,
            current: initial,
            context,
            observer,
            history: record_history.then(TransitionHistory::new),
        };
        machine.engine().enter_initial(initial)?;
        Ok(machine)
    }

    fn engine(&mut self) -> TransitionEngine<'_, C> {
        TransitionEngine {
            tree: &self.tree,
            context: &mut self.context,
            current: &mut self.current,
            observer: self.observer.as_mut(),
            history: self.history.as_mut(),
        }
    }

    /// Route one event through the active state chain.
    ///
    /// The current state's handler sees the event first; unhandled events
    /// bubble to the parent until some state handles them or requests a
    /// transition. The root handles everything, so bubbling always ends.
    /// Passing `None` is a no-op.
    ///
    /// A transition requested by any state in the chain starts from the
    /// current leaf state, not from the state that requested it.
    pub fn dispatch<'e>(&mut self, event: impl Into<Option<Event<'e>>>) -> Result<(), HsmError> {
        let Some(event) = event.into() else {
            return Ok(());
        };

        let tree = Arc::clone(&self.tree);
        let mut id = self.current;
        loop {
            let state = tree.state(id);
            let outcome = state.handle(&mut self.context, &event);
            tracing::trace!(state = state.name(), signal = %event.signal, ?outcome, "dispatch");

            match outcome {
                Outcome::Handled => return Ok(()),
                Outcome::Unhandled => match state.parent() {
                    Some(parent) => id = parent,
                    None => return Ok(()),
                },
                Outcome::Transition(target) => {
                    let source = self.current;
                    return self.engine().run(source, target);
                }
            }
        }
    }

    /// Dispatch a parameterless event carrying `signal`.
    pub fn dispatch_signal(&mut self, signal: impl Into<Signal>) -> Result<(), HsmError> {
        self.dispatch(Event::new(signal))
    }

    pub fn current(&self) -> StateId {
        self.current
    }

    pub fn current_state(&self) -> &StateDescriptor<C> {
        self.tree.state(self.current)
    }

    /// True if `state` is the current state or one of its ancestors.
    pub fn is_in(&self, state: StateId) -> bool {
        self.current == state || self.tree.is_ancestor(state, self.current)
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }

    pub fn tree(&self) -> &Arc<StateTree<C>> {
        &self.tree
    }

    /// Recorded transitions, if the machine was built with
    /// [`record_history`](crate::builder::MachineBuilder::record_history).
    pub fn history(&self) -> Option<&TransitionHistory> {
        self.history.as_ref()
    }
}

impl<C: fmt::Debug> fmt::Debug for Machine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("current", &self.current_state().name())
            .field("context", &self.context)
            .field("observer", &self.observer.is_some())
            .field("history", &self.history.as_ref().map(TransitionHistory::len))
            .finish()
    }
}
