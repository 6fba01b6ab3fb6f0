//! Run a piece of work and get its failure back as a value.
//!
//! The wrapper comes in three call shapes, and the result shape follows the
//! input shape:
//!
//! ```rust
//! use futures::future;
//! use tryf::{is_failure, try_deferred, try_fn, try_fn_async, Failure};
//!
//! // sync in, sync out
//! assert_eq!(try_fn(|| 42).ok(), Some(42));
//! let failure = try_fn(|| -> i32 { panic!("dummy") }).unwrap_err();
//! assert!(is_failure(&failure));
//!
//! // async in, async out
//! let outcome = futures_executor::block_on(try_fn_async(|| future::ok::<_, Failure>(42)));
//! assert_eq!(outcome.ok(), Some(42));
//!
//! let outcome = try_deferred(future::err::<i32, _>(Failure::msg("dummy"))).block();
//! assert_eq!(outcome.unwrap_err().to_string(), "dummy");
//! ```
//!
//! All of them use the default [`Catcher`]; build one to change how panics
//! and log records are handled.

mod catcher;
pub use catcher::Catcher;

mod deferred;
pub use deferred::Deferred;

mod failure;
pub use failure::{Failure, Panic};

mod predicate;
pub use predicate::{failure_of, is_failure};

mod settled;
pub use settled::Settled;

/// Value of the work or the failure it raised.
pub type Outcome<T, E = Failure> = Result<T, E>;

/// Runs a synchronous block and returns its value, or the panic it raised.
pub fn try_fn<F, T>(block: F) -> Outcome<T>
where
    F: FnOnce() -> T,
{
    Catcher::default().try_fn(block)
}

/// Runs a block returning `Result`; its `Err` and any panic become the failure.
pub fn try_result<F, T, E>(block: F) -> Outcome<T>
where
    F: FnOnce() -> Result<T, E>,
    E: Into<Failure>,
{
    Catcher::default().try_result(block)
}

/// Runs a block that starts a deferred computation and settles it.
pub fn try_fn_async<F, D>(block: F) -> Settled<D>
where
    F: FnOnce() -> D,
    D: Deferred,
    D::Error: Into<Failure>,
{
    Catcher::default().try_fn_async(block)
}

/// Settles a deferred computation: the returned future resolves to the value
/// or to the rejection reason, and never fails itself.
pub fn try_deferred<D>(deferred: D) -> Settled<D>
where
    D: Deferred,
    D::Error: Into<Failure>,
{
    Catcher::default().try_deferred(deferred)
}
