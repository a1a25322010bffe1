//! Builder for constructing state trees.

use crate::builder::error::BuildError;
use crate::builder::validation::{validate_tree, StateSummary};
use crate::core::{Event, Handler, Outcome, StateDescriptor, StateId, StateTree, ROOT_NAME};
use crate::engine::MAX_DEPTH;
use stillwater::validation::Validation;

struct DraftState<C> {
    name: String,
    parent: Option<StateId>,
    depth: usize,
    handlers: Vec<Handler<C>>,
}

/// Builder for state trees.
///
/// States are declared first, which hands out their [`StateId`]s; handlers
/// are attached afterwards so they can name any state of the tree as a
/// transition target.
///
/// # Example
///
/// ```rust
/// use hsm_engine::builder::StateTreeBuilder;
/// use hsm_engine::core::{Event, Outcome, Signal, StateId};
///
/// let mut builder = StateTreeBuilder::<u32>::new();
/// let idle = builder.state("idle", StateId::ROOT).unwrap();
/// let busy = builder.state("busy", StateId::ROOT).unwrap();
///
/// builder
///     .handler(idle, move |_, event: &Event<'_>| match event.signal {
///         s if s == Signal::user(0) => Outcome::Transition(busy),
///         _ => Outcome::Unhandled,
///     })
///     .handler(busy, |jobs: &mut u32, event: &Event<'_>| match event.signal {
///         Signal::ENTRY => {
///             *jobs += 1;
///             Outcome::Handled
///         }
///         _ => Outcome::Unhandled,
///     });
///
/// let tree = builder.build().unwrap();
/// assert_eq!(tree.len(), 3);
/// assert_eq!(tree.state(busy).name(), "busy");
/// ```
pub struct StateTreeBuilder<C> {
    states: Vec<DraftState<C>>,
    strays: Vec<StateId>,
}

impl<C: 'static> StateTreeBuilder<C> {
    /// Create a builder holding only the root state.
    pub fn new() -> Self {
        Self {
            states: vec![DraftState {
                name: ROOT_NAME.to_string(),
                parent: None,
                depth: 0,
                handlers: vec![Handler::handled()],
            }],
            strays: Vec::new(),
        }
    }

    /// Declare a state under `parent` and return its handle.
    pub fn state(
        &mut self,
        name: impl Into<String>,
        parent: StateId,
    ) -> Result<StateId, BuildError> {
        let name = name.into();
        let parent_depth = match self.states.get(parent.index()) {
            Some(draft) => draft.depth,
            None => return Err(BuildError::UnknownParent { name, parent }),
        };
        let index = u16::try_from(self.states.len()).map_err(|_| BuildError::TooManyStates {
            max: u16::MAX as usize,
        })?;

        self.states.push(DraftState {
            name,
            parent: Some(parent),
            depth: parent_depth + 1,
            handlers: Vec::new(),
        });
        Ok(StateId::from_index(index))
    }

    /// Attach the handler for `id`.
    ///
    /// Attaching to an unknown state or attaching twice is reported by
    /// [`build`](Self::build). The root's handler is fixed and cannot be
    /// replaced.
    pub fn handler<F>(&mut self, id: StateId, handler: F) -> &mut Self
    where
        F: Fn(&mut C, &Event<'_>) -> Outcome + Send + Sync + 'static,
    {
        match self.states.get_mut(id.index()) {
            Some(draft) => draft.handlers.push(Handler::new(handler)),
            None => self.strays.push(id),
        }
        self
    }

    /// Attach `handler` to every declared state that has none yet.
    pub fn handle_all<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&mut C, &Event<'_>) -> Outcome + Clone + Send + Sync + 'static,
    {
        for draft in self.states.iter_mut().filter(|d| d.handlers.is_empty()) {
            draft.handlers.push(Handler::new(handler.clone()));
        }
        self
    }

    /// Number of declared states, root included.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Validate the tree and freeze it.
    ///
    /// Returns every violation found, not just the first.
    pub fn build(self) -> Result<StateTree<C>, BuildError> {
        let summaries = self.states.iter().map(|draft| StateSummary {
            name: &draft.name,
            levels: draft.depth + 1,
            handlers: draft.handlers.len(),
        });

        if let Validation::Failure(errors) = validate_tree(summaries, &self.strays, MAX_DEPTH) {
            return Err(BuildError::InvalidTree(errors.iter().cloned().collect()));
        }

        let states = self
            .states
            .into_iter()
            .enumerate()
            .filter_map(|(index, mut draft)| {
                let handler = draft.handlers.pop()?;
                Some(StateDescriptor {
                    id: StateId::from_index(index as u16),
                    name: draft.name,
                    parent: draft.parent,
                    depth: draft.depth,
                    handler,
                })
            })
            .collect();

        Ok(StateTree { states })
    }
}

impl<C: 'static> Default for StateTreeBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}
