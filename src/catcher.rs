use crate::{
    deferred::Deferred,
    failure::Panic,
    settled::{Attempt, Settled},
    Failure, Outcome,
};
use log::{log, Level};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Configured try wrapper.
///
/// Every shape runs the work exactly once and returns failures as values:
///
/// * `try_fn` - a closure returning a plain value, sync in and sync out,
/// * `try_fn_async` - a closure returning a deferred computation,
/// * `try_deferred` - a deferred computation passed directly,
/// * `try_result` - a closure returning `Result`, with `Err` flattened.
///
/// ```rust
/// use log::Level;
/// use tryf::Catcher;
///
/// let catcher = Catcher::new().log_level(Some(Level::Warn));
/// assert_eq!(catcher.try_fn(|| 42).ok(), Some(42));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Catcher {
    /// Whether unwinding panics are turned into `Failure::Panic`.
    /// When disabled, panics propagate to the caller untouched.
    capture_panics: bool,

    /// Level of the record emitted for every captured failure, `None` for no record.
    log_level: Option<Level>,
}

impl Default for Catcher {
    fn default() -> Self {
        Self {
            capture_panics: true,
            log_level: Some(Level::Debug),
        }
    }
}

impl Catcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets capture_panics field.
    pub fn capture_panics(mut self, capture: bool) -> Self {
        self.capture_panics = capture;
        self
    }

    /// Sets log_level field.
    pub fn log_level(mut self, level: Option<Level>) -> Self {
        self.log_level = level;
        self
    }

    pub fn captures_panics(&self) -> bool {
        self.capture_panics
    }

    /// Runs a synchronous block. A panic is returned as `Err(Failure::Panic)`,
    /// anything the block returns is `Ok`.
    pub fn try_fn<F, T>(&self, block: F) -> Outcome<T>
    where
        F: FnOnce() -> T,
    {
        let outcome = self.attempt(block);
        self.record(&outcome);
        outcome
    }

    /// Runs a block returning `Result`: both its `Err` and a panic end up in
    /// the returned failure.
    pub fn try_result<F, T, E>(&self, block: F) -> Outcome<T>
    where
        F: FnOnce() -> Result<T, E>,
        E: Into<Failure>,
    {
        let outcome = self
            .attempt(block)
            .and_then(|result| result.map_err(Into::into));
        self.record(&outcome);
        outcome
    }

    /// Invokes the block right away, on the caller's stack, and settles the
    /// deferred computation it returns. If the block panics before returning
    /// one, the returned future is already resolved with that failure.
    pub fn try_fn_async<F, D>(&self, block: F) -> Settled<D>
    where
        F: FnOnce() -> D,
        D: Deferred,
        D::Error: Into<Failure>,
    {
        let attempt = match self.attempt(block) {
            Ok(deferred) => Attempt::Pending(deferred),
            Err(failure) => Attempt::Settled(Err(failure)),
        };

        Settled::new(attempt, *self)
    }

    /// Settles a deferred computation passed directly.
    pub fn try_deferred<D>(&self, deferred: D) -> Settled<D>
    where
        D: Deferred,
        D::Error: Into<Failure>,
    {
        Settled::new(Attempt::Pending(deferred), *self)
    }

    fn attempt<F, R>(&self, block: F) -> Outcome<R>
    where
        F: FnOnce() -> R,
    {
        if !self.capture_panics {
            return Ok(block());
        }

        catch_unwind(AssertUnwindSafe(block))
            .map_err(|payload| Failure::Panic(Panic::new(payload)))
    }

    pub(crate) fn record<T>(&self, outcome: &Outcome<T>) {
        if let (Some(level), Err(failure)) = (self.log_level, outcome) {
            log!(level, "captured {}: {}", failure.kind(), failure);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let catcher = Catcher::default();

        assert!(catcher.captures_panics());
        assert_eq!(catcher.log_level, Some(Level::Debug));
    }

    #[test]
    fn builder_sets_fields() {
        let catcher = Catcher::new().capture_panics(false).log_level(None);

        assert!(!catcher.captures_panics());
        assert_eq!(catcher.log_level, None);
    }

    #[test]
    fn attempt_captures_panic() {
        let outcome = Catcher::default().attempt(|| -> u8 { panic!("inner") });

        assert_eq!(
            outcome.expect_err("panic captured").panic_message(),
            Some("inner")
        );
    }

    #[test]
    fn try_result_flattens_err() {
        let outcome = Catcher::default().try_result(|| "x".parse::<i32>());

        let failure = outcome.expect_err("parse error captured");
        assert!(failure.downcast_ref::<std::num::ParseIntError>().is_some());
    }

    #[test]
    fn try_result_keeps_ok() {
        let outcome = Catcher::default().try_result(|| "7".parse::<i32>());

        assert_eq!(outcome.ok(), Some(7));
    }
}
