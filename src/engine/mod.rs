//! The synchronous dispatch core.
//!
//! # Key Concepts
//!
//! - **Dispatcher**: routes an event from the current state up through its
//!   ancestors until a handler consumes it
//! - **Transition engine**: exits to the lowest common ancestor, enters down
//!   to the target, then follows nested initial transitions
//! - **Bounded traversal**: all paths live in stack buffers of
//!   [`MAX_DEPTH`] slots; nothing on the dispatch path allocates

mod error;
mod machine;
mod path;
mod transition;

pub use error::HsmError;
pub use machine::Machine;
pub use path::{CapacityExceeded, PathBuffer, MAX_DEPTH};
pub use transition::{Observer, TransitionPlan};
