//! Macros for ergonomic state machine construction.

/// Declare an application signal set.
///
/// Variants are numbered from the first signal above
/// [`Signal::DEFAULT`](crate::core::Signal::DEFAULT), in declaration order.
/// The macro implements `From<Enum> for Signal` and
/// [`UserSignal`](crate::core::UserSignal), so handlers can match on
/// [`Event::trigger`](crate::core::Event::trigger).
///
/// # Example
///
/// ```
/// use hsm_engine::core::{Event, Signal, Trigger};
/// use hsm_engine::signals;
///
/// signals! {
///     pub enum LedSignal {
///         ToggleBlink,
///         Timer,
///         User,
///     }
/// }
///
/// assert_eq!(Signal::from(LedSignal::ToggleBlink), Signal::user(0));
/// assert_eq!(
///     Event::new(LedSignal::Timer).trigger::<LedSignal>(),
///     Trigger::User(LedSignal::Timer)
/// );
/// ```
#[macro_export]
macro_rules! signals {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        #[repr(u16)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl ::core::convert::From<$name> for $crate::core::Signal {
            fn from(signal: $name) -> $crate::core::Signal {
                $crate::core::Signal::user(signal as u16)
            }
        }

        impl $crate::core::UserSignal for $name {
            fn from_signal(signal: $crate::core::Signal) -> ::core::option::Option<Self> {
                $(
                    if signal == $crate::core::Signal::from($name::$variant) {
                        return ::core::option::Option::Some($name::$variant);
                    }
                )*
                ::core::option::Option::None
            }
        }
    };
}
