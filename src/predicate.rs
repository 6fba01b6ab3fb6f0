use crate::{failure::Panic, Failure};
use std::any::Any;

/// Builds the nominal failure-kind check out of a list of concrete types.
macro_rules! failure_kinds {
    ($($ty:ty),* $(,)?) => {
        fn is_failure_kind(value: &dyn Any) -> bool {
            $(value.is::<$ty>())||*
        }
    };
}

failure_kinds![
    Failure,
    Panic,
    anyhow::Error,
    Box<dyn std::error::Error + Send + Sync>,
    Box<dyn std::error::Error>,
    std::io::Error,
    std::fmt::Error,
];

/// Tells whether `value` belongs to the failure-kind family.
///
/// The check is by type identity, never by shape: a struct that merely has a
/// `message` field is not a failure, and neither is a `Result` or an
/// `Option` holding one.
///
/// A block that returns a failure as its genuine success value yields
/// `Ok(failure)`, and this predicate reports `true` for that unwrapped value;
/// the two cases cannot be told apart once the `Outcome` tag is dropped.
///
/// ```rust
/// use tryf::{is_failure, Failure};
///
/// assert!(is_failure(&Failure::msg("x")));
/// assert!(!is_failure(&42));
/// assert!(!is_failure(&None::<Failure>));
/// ```
pub fn is_failure(value: &dyn Any) -> bool {
    is_failure_kind(value)
}

/// Narrows `value` to a `Failure` when it is one.
pub fn failure_of(value: &dyn Any) -> Option<&Failure> {
    value.downcast_ref::<Failure>()
}
