//! Builder API for state trees and machines.
//!
//! This module provides fluent builders that validate configuration before
//! anything runs, plus the [`signals!`](crate::signals) macro for declaring
//! application signals.

pub mod error;
pub mod machine;
pub mod macros;
pub mod tree;
pub mod validation;

pub use error::BuildError;
pub use machine::MachineBuilder;
pub use tree::StateTreeBuilder;
pub use validation::TreeViolation;
