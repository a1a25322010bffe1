//! The arena of state descriptors.
//!
//! Every tree starts with the synthetic root state `top` at
//! [`StateId::ROOT`]. Parents are always created before their children, so a
//! parent's index is strictly lower than its child's and every parent walk
//! reaches the root.

use super::state::{StateDescriptor, StateId};

/// Name given to the synthetic root state.
pub const ROOT_NAME: &str = "top";

/// Immutable, fully-built state tree.
///
/// Trees are produced by [`StateTreeBuilder`](crate::builder::StateTreeBuilder)
/// and shared between machines.
#[derive(Debug)]
pub struct StateTree<C> {
    pub(crate) states: Vec<StateDescriptor<C>>,
}

impl<C> StateTree<C> {
    /// Number of states, root included.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// A built tree always holds at least the root.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn contains(&self, id: StateId) -> bool {
        id.index() < self.states.len()
    }

    pub fn get(&self, id: StateId) -> Option<&StateDescriptor<C>> {
        self.states.get(id.index())
    }

    /// Descriptor for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree. Use [`StateTree::get`]
    /// for handles of unknown origin.
    pub fn state(&self, id: StateId) -> &StateDescriptor<C> {
        &self.states[id.index()]
    }

    pub fn root(&self) -> &StateDescriptor<C> {
        self.state(StateId::ROOT)
    }

    pub fn parent(&self, id: StateId) -> Option<StateId> {
        self.get(id).and_then(StateDescriptor::parent)
    }

    pub fn depth(&self, id: StateId) -> Option<usize> {
        self.get(id).map(StateDescriptor::depth)
    }

    pub fn name(&self, id: StateId) -> &str {
        self.get(id).map_or("<unknown>", StateDescriptor::name)
    }

    /// Iterate over the strict ancestors of `id`, nearest first, ending with
    /// the root.
    pub fn ancestors(&self, id: StateId) -> Ancestors<'_, C> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// True iff `candidate` appears on the parent chain of `node`.
    ///
    /// A state is never its own ancestor.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hsm_engine::builder::StateTreeBuilder;
    /// use hsm_engine::core::StateId;
    ///
    /// let mut builder = StateTreeBuilder::<()>::new();
    /// let blinking = builder.state("blinking", StateId::ROOT).unwrap();
    /// let led_on = builder.state("led_on", blinking).unwrap();
    /// builder.handle_all(|_, _| hsm_engine::core::Outcome::Unhandled);
    /// let tree = builder.build().unwrap();
    ///
    /// assert!(tree.is_ancestor(blinking, led_on));
    /// assert!(tree.is_ancestor(StateId::ROOT, led_on));
    /// assert!(!tree.is_ancestor(led_on, blinking));
    /// assert!(!tree.is_ancestor(led_on, led_on));
    /// ```
    pub fn is_ancestor(&self, candidate: StateId, node: StateId) -> bool {
        self.ancestors(node).any(|id| id == candidate)
    }

    /// Lowest common ancestor of `a` and `b`, where a state counts as its
    /// own ancestor. Returns `None` if either handle is foreign.
    pub fn lca(&self, a: StateId, b: StateId) -> Option<StateId> {
        let (mut a, mut b) = (a, b);
        let (mut depth_a, mut depth_b) = (self.depth(a)?, self.depth(b)?);
        while depth_a > depth_b {
            a = self.parent(a)?;
            depth_a -= 1;
        }
        while depth_b > depth_a {
            b = self.parent(b)?;
            depth_b -= 1;
        }
        while a != b {
            a = self.parent(a)?;
            b = self.parent(b)?;
        }
        Some(a)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StateDescriptor<C>> {
        self.states.iter()
    }
}

/// Iterator returned by [`StateTree::ancestors`].
pub struct Ancestors<'t, C> {
    tree: &'t StateTree<C>,
    next: Option<StateId>,
}

impl<C> Iterator for Ancestors<'_, C> {
    type Item = StateId;

    fn next(&mut self) -> Option<StateId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
