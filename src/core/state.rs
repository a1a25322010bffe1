//! State descriptors and the handlers attached to them.
//!
//! A descriptor is a passive, read-only node of the state tree. It never
//! changes after the tree is built; all runtime state lives in the
//! [`Machine`](crate::engine::Machine).

use super::event::Event;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of a state inside its [`StateTree`](super::StateTree).
///
/// Handles are plain arena indices. They are only meaningful for the tree
/// (or builder) that produced them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(u16);

impl StateId {
    /// The synthetic `top` state every tree is rooted at.
    pub const ROOT: StateId = StateId(0);

    pub(crate) const fn from_index(index: u16) -> Self {
        StateId(index)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn is_root(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateId({})", self.0)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a handler did with an event.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    /// Consumed; stop bubbling.
    Handled,
    /// Not interesting here; offer it to the parent state.
    Unhandled,
    /// Consumed, and the machine should move to the given state.
    Transition(StateId),
}

impl Outcome {
    pub fn is_transition(&self) -> bool {
        matches!(self, Self::Transition(_))
    }
}

/// Reaction of one state to events.
///
/// Handlers receive the machine's domain context and the event. They are the
/// only place where side effects happen; the engine itself never touches the
/// context.
///
/// # Example
///
/// ```rust
/// use hsm_engine::core::{Event, Handler, Outcome, Signal};
///
/// let handler = Handler::new(|count: &mut u32, event: &Event<'_>| match event.signal {
///     Signal::ENTRY => {
///         *count += 1;
///         Outcome::Handled
///     }
///     _ => Outcome::Unhandled,
/// });
///
/// let mut count = 0;
/// assert_eq!(handler.call(&mut count, &Event::entry()), Outcome::Handled);
/// assert_eq!(handler.call(&mut count, &Event::exit()), Outcome::Unhandled);
/// assert_eq!(count, 1);
/// ```
pub struct Handler<C> {
    func: Box<dyn Fn(&mut C, &Event<'_>) -> Outcome + Send + Sync>,
}

impl<C> Handler<C> {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&mut C, &Event<'_>) -> Outcome + Send + Sync + 'static,
    {
        Handler {
            func: Box::new(func),
        }
    }

    /// Handler that consumes every event. Used for the root state.
    pub fn handled() -> Self
    where
        C: 'static,
    {
        Handler::new(|_, _| Outcome::Handled)
    }

    pub fn call(&self, context: &mut C, event: &Event<'_>) -> Outcome {
        (self.func)(context, event)
    }
}

impl<C> fmt::Debug for Handler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler(..)")
    }
}

/// Immutable node of the state tree.
pub struct StateDescriptor<C> {
    pub(crate) id: StateId,
    pub(crate) name: String,
    pub(crate) parent: Option<StateId>,
    pub(crate) depth: usize,
    pub(crate) handler: Handler<C>,
}

impl<C> fmt::Debug for StateDescriptor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("depth", &self.depth)
            .finish()
    }
}

impl<C> StateDescriptor<C> {
    pub fn id(&self) -> StateId {
        self.id
    }

    /// Diagnostic label. Never used for identity.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `None` only for the root.
    pub fn parent(&self) -> Option<StateId> {
        self.parent
    }

    /// Number of edges between this state and the root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn handle(&self, context: &mut C, event: &Event<'_>) -> Outcome {
        self.handler.call(context, event)
    }
}
