//! Signals and events routed through the state tree.
//!
//! The signal space is split in two. Negative values up to and including
//! [`Signal::DEFAULT`] belong to the framework; everything above it is free
//! for application signals.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;

/// Identifier carried by every event.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signal(i32);

impl Signal {
    /// Sent to a state when it becomes active.
    pub const ENTRY: Signal = Signal(-5);
    /// Sent to a state when it stops being active.
    pub const EXIT: Signal = Signal(-4);
    /// Sent to the target of a transition so it can pick a default child.
    pub const INIT: Signal = Signal(-3);
    /// Reserved for periodic events raised by the application.
    /// The engine never sends it.
    pub const CYCLE: Signal = Signal(-2);
    /// Boundary between framework and application signals.
    pub const DEFAULT: Signal = Signal(-1);

    /// Application signal number `index`, counted from the first value
    /// above [`Signal::DEFAULT`].
    pub const fn user(index: u16) -> Signal {
        Signal(Signal::DEFAULT.0 + 1 + index as i32)
    }

    /// Wrap a raw signal value.
    pub const fn from_raw(raw: i32) -> Signal {
        Signal(raw)
    }

    pub const fn raw(self) -> i32 {
        self.0
    }

    /// True for framework signals, including the boundary itself.
    pub const fn is_reserved(self) -> bool {
        self.0 <= Signal::DEFAULT.0
    }

    /// Offset of an application signal above the boundary.
    pub fn user_index(self) -> Option<u16> {
        if self.is_reserved() {
            return None;
        }
        u16::try_from(self.0 - Signal::DEFAULT.0 - 1).ok()
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Signal::ENTRY => f.write_str("ENTRY"),
            Signal::EXIT => f.write_str("EXIT"),
            Signal::INIT => f.write_str("INIT"),
            Signal::CYCLE => f.write_str("CYCLE"),
            Signal::DEFAULT => f.write_str("DEFAULT"),
            Signal(raw) => write!(f, "USER({})", raw),
        }
    }
}

/// Application signal sets, usually generated with [`signals!`](crate::signals).
pub trait UserSignal: Copy + Into<Signal> {
    /// Map a raw signal back to a member of the set.
    fn from_signal(signal: Signal) -> Option<Self>;
}

/// Classified view of an event's signal, for matching inside handlers.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Trigger<S> {
    Entry,
    Exit,
    Init,
    Cycle,
    User(S),
    /// A signal that is neither a pseudo-event nor a member of `S`.
    Unknown(Signal),
}

/// The single message type passed to state handlers.
///
/// Events are plain `Copy` values. Each dispatch takes its own event, so
/// there is no buffer shared between calls.
///
/// # Example
///
/// ```rust
/// use hsm_engine::core::{Event, Signal};
///
/// let level: u8 = 3;
/// let event = Event::with_param(Signal::user(0), &level);
///
/// assert_eq!(event.signal, Signal::user(0));
/// assert_eq!(event.param::<u8>(), Some(&3));
/// assert_eq!(event.param::<u32>(), None);
/// ```
#[derive(Clone, Copy)]
pub struct Event<'a> {
    pub signal: Signal,
    pub param: Option<&'a (dyn Any + Send + Sync)>,
}

impl<'a> Event<'a> {
    pub fn new(signal: impl Into<Signal>) -> Self {
        Self {
            signal: signal.into(),
            param: None,
        }
    }

    pub fn with_param<T: Any + Send + Sync>(signal: impl Into<Signal>, param: &'a T) -> Self {
        Self {
            signal: signal.into(),
            param: Some(param as &'a (dyn Any + Send + Sync)),
        }
    }

    pub fn entry() -> Self {
        Self::new(Signal::ENTRY)
    }

    pub fn exit() -> Self {
        Self::new(Signal::EXIT)
    }

    pub fn init() -> Self {
        Self::new(Signal::INIT)
    }

    /// Downcast the parameter, if any, to `T`.
    pub fn param<T: Any>(&self) -> Option<&'a T> {
        let param: &'a (dyn Any + Send + Sync) = self.param?;
        param.downcast_ref::<T>()
    }

    /// Classify the signal against the application signal set `S`.
    pub fn trigger<S: UserSignal>(&self) -> Trigger<S> {
        match self.signal {
            Signal::ENTRY => Trigger::Entry,
            Signal::EXIT => Trigger::Exit,
            Signal::INIT => Trigger::Init,
            Signal::CYCLE => Trigger::Cycle,
            other => S::from_signal(other).map_or(Trigger::Unknown(other), Trigger::User),
        }
    }

    pub fn is_pseudo(&self) -> bool {
        matches!(self.signal, Signal::ENTRY | Signal::EXIT | Signal::INIT)
    }
}

impl From<Signal> for Event<'_> {
    fn from(signal: Signal) -> Self {
        Event::new(signal)
    }
}

impl fmt::Debug for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("signal", &self.signal)
            .field("has_param", &self.param.is_some())
            .finish()
    }
}
