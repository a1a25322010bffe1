//! Fixed-capacity traversal buffers.
//!
//! Exit and entry chains are collected into stack arrays sized by
//! [`MAX_DEPTH`], so dispatching never allocates. Overflow is reported, not
//! truncated.

use crate::core::StateId;

/// Maximum number of states on any root-to-leaf path, root included.
pub const MAX_DEPTH: usize = 10;

/// Returned when a push would exceed the buffer capacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapacityExceeded;

/// Bounded stack of state handles.
///
/// The default `N` does not take part in inference: a local buffer needs an
/// explicit type, as in `let chain: PathBuffer = PathBuffer::new();`.
#[derive(Clone, Debug)]
pub struct PathBuffer<const N: usize = MAX_DEPTH> {
    slots: [StateId; N],
    len: usize,
}

impl<const N: usize> PathBuffer<N> {
    pub const fn new() -> Self {
        Self {
            slots: [StateId::ROOT; N],
            len: 0,
        }
    }

    pub fn push(&mut self, id: StateId) -> Result<(), CapacityExceeded> {
        let slot = self.slots.get_mut(self.len).ok_or(CapacityExceeded)?;
        *slot = id;
        self.len += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Option<StateId> {
        self.len = self.len.checked_sub(1)?;
        Some(self.slots[self.len])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Handles in push order.
    pub fn as_slice(&self) -> &[StateId] {
        &self.slots[..self.len]
    }
}

impl<const N: usize> Default for PathBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
