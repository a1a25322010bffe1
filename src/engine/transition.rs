//! The transition engine.
//!
//! A transition pass runs in two halves. Planning walks the tree to find the
//! lowest common ancestor (LCA) of source and target and collects the exit
//! and entry chains into fixed-capacity buffers. Execution then fires `Exit`
//! innermost-first, `Entry` outermost-first, and finally `Init` on the
//! target, which may request the next pass. Planning never runs a handler,
//! so a failed plan leaves the machine untouched.

use crate::core::{
    Event, Outcome, Signal, StateDescriptor, StateId, StateTree, TransitionHistory,
    TransitionRecord,
};
use crate::engine::error::HsmError;
use crate::engine::path::{PathBuffer, MAX_DEPTH};
use chrono::Utc;

/// Callback invoked with `(source, target)` at the start of each pass.
pub type Observer<C> = Box<dyn FnMut(&StateDescriptor<C>, &StateDescriptor<C>) + Send>;

/// Exit and entry chains of one transition pass.
#[derive(Clone, Debug)]
pub struct TransitionPlan {
    pub source: StateId,
    pub target: StateId,
    /// Lowest state that is neither exited nor entered.
    pub lca: StateId,
    /// States to exit, innermost first.
    pub exits: PathBuffer,
    /// States to enter, innermost first. Executed in reverse.
    pub entries: PathBuffer,
}

impl TransitionPlan {
    /// Compute the exit and entry chains for `source -> target`.
    ///
    /// The exit walk climbs from `source` while the current node is not the
    /// root, not an ancestor of `target` and not `target` itself. A
    /// self-transition therefore plans no exits and no entries, and a
    /// transition to a strict ancestor exits down to that ancestor's child
    /// without re-entering it.
    pub fn compute<C>(
        tree: &StateTree<C>,
        source: StateId,
        target: StateId,
    ) -> Result<TransitionPlan, HsmError> {
        ensure_known(tree, source)?;
        ensure_known(tree, target)?;

        let mut exits = PathBuffer::new();
        let mut lca = source;
        while !lca.is_root() && lca != target && !tree.is_ancestor(lca, target) {
            exits.push(lca).map_err(|_| too_deep(tree, source))?;
            lca = parent_of(tree, lca)?;
        }

        let mut entries = PathBuffer::new();
        let mut node = target;
        while node != lca {
            entries.push(node).map_err(|_| too_deep(tree, target))?;
            node = parent_of(tree, node)?;
        }

        Ok(TransitionPlan {
            source,
            target,
            lca,
            exits,
            entries,
        })
    }
}

pub(crate) fn ensure_known<C>(tree: &StateTree<C>, id: StateId) -> Result<(), HsmError> {
    if tree.contains(id) {
        Ok(())
    } else {
        Err(HsmError::UnknownState { id })
    }
}

fn parent_of<C>(tree: &StateTree<C>, id: StateId) -> Result<StateId, HsmError> {
    tree.parent(id).ok_or_else(|| HsmError::MalformedTree {
        state: tree.name(id).to_string(),
    })
}

fn too_deep<C>(tree: &StateTree<C>, id: StateId) -> HsmError {
    HsmError::NestingTooDeep {
        state: tree.name(id).to_string(),
        max: MAX_DEPTH,
    }
}

/// Borrowed view of a machine while it runs transitions.
///
/// The transient source of a transition is an explicit parameter here
/// rather than a field of the machine.
pub(crate) struct TransitionEngine<'m, C> {
    pub tree: &'m StateTree<C>,
    pub context: &'m mut C,
    pub current: &'m mut StateId,
    pub observer: Option<&'m mut Observer<C>>,
    pub history: Option<&'m mut TransitionHistory>,
}

impl<C> TransitionEngine<'_, C> {
    /// Enter `initial` from scratch: every state from the root down to
    /// `initial` receives `Entry`, then `initial` receives `Init`.
    pub fn enter_initial(&mut self, initial: StateId) -> Result<(), HsmError> {
        ensure_known(self.tree, initial)?;

        let mut chain: PathBuffer = PathBuffer::new();
        let mut node = Some(initial);
        while let Some(id) = node {
            chain.push(id).map_err(|_| too_deep(self.tree, initial))?;
            node = self.tree.parent(id);
        }

        tracing::debug!(state = self.tree.name(initial), "entering initial state");
        while let Some(id) = chain.pop() {
            self.signal(id, Event::entry());
        }
        *self.current = initial;

        match self.signal(initial, Event::init()) {
            Outcome::Transition(next) => self.run_passes(initial, next, 1),
            _ => Ok(()),
        }
    }

    /// Run the transition `source -> target` and every initial transition
    /// it triggers.
    pub fn run(&mut self, source: StateId, target: StateId) -> Result<(), HsmError> {
        self.run_passes(source, target, 0)
    }

    fn run_passes(
        &mut self,
        source: StateId,
        target: StateId,
        first_pass: usize,
    ) -> Result<(), HsmError> {
        let (mut source, mut target) = (source, target);
        let mut pass = first_pass;

        loop {
            let plan = TransitionPlan::compute(self.tree, source, target)?;
            self.notify(&plan, pass);
            self.execute(&plan);

            if plan.entries.is_empty() {
                return Ok(());
            }
            match self.signal(target, Event::init()) {
                Outcome::Transition(next) => {
                    pass += 1;
                    if pass > MAX_DEPTH {
                        return Err(HsmError::InitialTransitionLoop {
                            state: self.tree.name(target).to_string(),
                            max: MAX_DEPTH,
                        });
                    }
                    source = target;
                    target = next;
                }
                _ => return Ok(()),
            }
        }
    }

    fn notify(&mut self, plan: &TransitionPlan, pass: usize) {
        let tree = self.tree;
        let source = tree.state(plan.source);
        let target = tree.state(plan.target);

        tracing::debug!(
            source = source.name(),
            target = target.name(),
            lca = tree.name(plan.lca),
            exits = plan.exits.len(),
            entries = plan.entries.len(),
            pass,
            "transition"
        );

        if let Some(observer) = self.observer.as_mut() {
            observer(source, target);
        }
        if let Some(history) = self.history.as_mut() {
            history.push(TransitionRecord {
                source: plan.source,
                target: plan.target,
                source_name: source.name().to_string(),
                target_name: target.name().to_string(),
                timestamp: Utc::now(),
                pass,
            });
        }
    }

    fn execute(&mut self, plan: &TransitionPlan) {
        for &id in plan.exits.as_slice() {
            self.signal(id, Event::exit());
        }
        for &id in plan.entries.as_slice().iter().rev() {
            self.signal(id, Event::entry());
        }
        *self.current = plan.target;
    }

    /// Deliver a pseudo-event. Only `Init` may request a transition; a
    /// request from `Entry` or `Exit` is dropped.
    fn signal(&mut self, id: StateId, event: Event<'_>) -> Outcome {
        let tree = self.tree;
        let state = tree.state(id);
        let outcome = state.handle(self.context, &event);
        tracing::trace!(state = state.name(), signal = %event.signal, ?outcome, "pseudo-event");

        if outcome.is_transition() && event.signal != Signal::INIT {
            tracing::warn!(
                state = state.name(),
                signal = %event.signal,
                "transition requested from a pseudo-event that cannot transition; ignored"
            );
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::StateTreeBuilder;
    use crate::core::Handler;

    struct Shape {
        tree: StateTree<()>,
        s: StateId,
        s1: StateId,
        s11: StateId,
        s2: StateId,
        s21: StateId,
        t: StateId,
    }

    fn shape() -> Shape {
        let mut b = StateTreeBuilder::new();
        let s = b.state("s", StateId::ROOT).unwrap();
        let s1 = b.state("s1", s).unwrap();
        let s11 = b.state("s11", s1).unwrap();
        let s2 = b.state("s2", s).unwrap();
        let s21 = b.state("s21", s2).unwrap();
        let t = b.state("t", StateId::ROOT).unwrap();
        b.handle_all(|_, _| Outcome::Unhandled);
        Shape {
            tree: b.build().unwrap(),
            s,
            s1,
            s11,
            s2,
            s21,
            t,
        }
    }

    #[test]
    fn plan_between_cousins_meets_at_common_parent() {
        let sh = shape();
        let plan = TransitionPlan::compute(&sh.tree, sh.s11, sh.s21).unwrap();

        assert_eq!(plan.lca, sh.s);
        assert_eq!(plan.exits.as_slice(), &[sh.s11, sh.s1]);
        assert_eq!(plan.entries.as_slice(), &[sh.s21, sh.s2]);
    }

    #[test]
    fn plan_across_top_level_states_meets_at_root() {
        let sh = shape();
        let plan = TransitionPlan::compute(&sh.tree, sh.s11, sh.t).unwrap();

        assert_eq!(plan.lca, StateId::ROOT);
        assert_eq!(plan.exits.as_slice(), &[sh.s11, sh.s1, sh.s]);
        assert_eq!(plan.entries.as_slice(), &[sh.t]);
    }

    #[test]
    fn plan_into_descendant_exits_nothing() {
        let sh = shape();
        let plan = TransitionPlan::compute(&sh.tree, sh.s, sh.s11).unwrap();

        assert_eq!(plan.lca, sh.s);
        assert!(plan.exits.is_empty());
        assert_eq!(plan.entries.as_slice(), &[sh.s11, sh.s1]);
    }

    #[test]
    fn plan_to_strict_ancestor_exits_below_it_only() {
        let sh = shape();
        let plan = TransitionPlan::compute(&sh.tree, sh.s11, sh.s).unwrap();

        assert_eq!(plan.lca, sh.s);
        assert_eq!(plan.exits.as_slice(), &[sh.s11, sh.s1]);
        assert!(plan.entries.is_empty());
    }

    #[test]
    fn self_transition_plans_nothing() {
        let sh = shape();
        let plan = TransitionPlan::compute(&sh.tree, sh.s21, sh.s21).unwrap();

        assert_eq!(plan.lca, sh.s21);
        assert!(plan.exits.is_empty());
        assert!(plan.entries.is_empty());
    }

    /// Chain `top -> s1 -> ... -> s{len}` assembled without the builder's
    /// depth check.
    fn unchecked_chain(len: usize) -> StateTree<()> {
        let states = (0..=len)
            .map(|i| StateDescriptor {
                id: StateId::from_index(i as u16),
                name: format!("s{}", i),
                parent: i.checked_sub(1).map(|p| StateId::from_index(p as u16)),
                depth: i,
                handler: Handler::new(|_: &mut (), _: &Event<'_>| Outcome::Unhandled),
            })
            .collect();
        StateTree { states }
    }

    #[test]
    fn deepest_buildable_path_fits_the_buffers() {
        let tree = unchecked_chain(MAX_DEPTH - 1);
        let leaf = StateId::from_index((MAX_DEPTH - 1) as u16);

        let down = TransitionPlan::compute(&tree, StateId::ROOT, leaf).unwrap();
        let up = TransitionPlan::compute(&tree, leaf, StateId::ROOT).unwrap();

        assert_eq!(down.entries.len(), MAX_DEPTH - 1);
        assert_eq!(up.exits.len(), MAX_DEPTH - 1);
    }

    #[test]
    fn overlong_path_is_reported_not_truncated() {
        let tree = unchecked_chain(MAX_DEPTH + 1);
        let leaf = StateId::from_index((MAX_DEPTH + 1) as u16);

        assert_eq!(
            TransitionPlan::compute(&tree, StateId::ROOT, leaf).unwrap_err(),
            HsmError::NestingTooDeep {
                state: format!("s{}", MAX_DEPTH + 1),
                max: MAX_DEPTH,
            }
        );
        assert_eq!(
            TransitionPlan::compute(&tree, leaf, StateId::ROOT).unwrap_err(),
            HsmError::NestingTooDeep {
                state: format!("s{}", MAX_DEPTH + 1),
                max: MAX_DEPTH,
            }
        );
    }

    #[test]
    fn detached_state_is_a_malformed_tree() {
        let mut tree = unchecked_chain(3);
        tree.states[2].parent = None;
        let leaf = StateId::from_index(3);
        let other = StateId::from_index(1);

        assert_eq!(
            TransitionPlan::compute(&tree, leaf, other).unwrap_err(),
            HsmError::MalformedTree {
                state: "s2".to_string(),
            }
        );
    }

    #[test]
    fn initial_entry_covers_the_deepest_path() {
        let tree = unchecked_chain(MAX_DEPTH - 1);
        let leaf = StateId::from_index((MAX_DEPTH - 1) as u16);
        let mut current = StateId::ROOT;

        let mut engine = TransitionEngine {
            tree: &tree,
            context: &mut (),
            current: &mut current,
            observer: None,
            history: None,
        };
        engine.enter_initial(leaf).unwrap();

        assert_eq!(current, leaf);
    }

    #[test]
    fn plan_rejects_foreign_states() {
        let sh = shape();
        let foreign = StateId::from_index(77);

        assert_eq!(
            TransitionPlan::compute(&sh.tree, sh.s, foreign).unwrap_err(),
            HsmError::UnknownState { id: foreign }
        );
    }
}
