use crate::{catcher::Catcher, deferred::Deferred, failure::Panic, Failure, Outcome};
use futures::future::{MapOkOrElse, TryFuture};
use std::{
    fmt,
    future::Future,
    mem,
    panic::{catch_unwind, AssertUnwindSafe},
    pin::Pin,
    task::{Context, Poll},
};

type Resolve<D> = fn(<D as TryFuture>::Ok) -> Outcome<<D as TryFuture>::Ok>;
type Reject<D> = fn(<D as TryFuture>::Error) -> Outcome<<D as TryFuture>::Ok>;

/// Deferred computation with both continuations attached, each producing an
/// `Outcome`.
type Settling<D> = MapOkOrElse<D, Resolve<D>, Reject<D>>;

/// Result of the work once it was started: either already settled (the block
/// panicked before producing its deferred computation) or still pending.
pub(crate) enum Attempt<T, D> {
    Settled(Outcome<T>),
    Pending(D),
}

enum State<D: TryFuture> {
    Ready(Outcome<D::Ok>),
    Pending(Pin<Box<Settling<D>>>),
    Done,
}

impl<D: TryFuture> State<D> {
    fn name(&self) -> &'static str {
        match self {
            State::Ready(_) => "ready",
            State::Pending(_) => "pending",
            State::Done => "done",
        }
    }
}

/// Future returned by the asynchronous shapes of the try wrapper.
///
/// It resolves exactly once, always with an `Outcome`: success values land in
/// `Ok`, rejection reasons and panics raised while polling land in `Err`.
/// `Settled` never panics on behalf of the computation it wraps, unless the
/// `Catcher` it was built with has panic capturing disabled.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Settled<D: TryFuture> {
    state: State<D>,
    catcher: Catcher,
}

impl<D> Settled<D>
where
    D: Deferred,
    D::Error: Into<Failure>,
{
    pub(crate) fn new(attempt: Attempt<D::Ok, D>, catcher: Catcher) -> Self {
        let state = match attempt {
            Attempt::Settled(outcome) => State::Ready(outcome),
            Attempt::Pending(deferred) => {
                let resolve: Resolve<D> = Ok;
                let reject: Reject<D> = |reason| Err(reason.into());
                State::Pending(Box::pin(deferred.attach(resolve, reject)))
            }
        };

        Self { state, catcher }
    }

    /// Drives the computation to completion on the current thread.
    ///
    /// ```rust
    /// let outcome = tryf::try_deferred(futures::future::ok::<_, tryf::Failure>(42)).block();
    /// assert_eq!(outcome.ok(), Some(42));
    /// ```
    pub fn block(self) -> Outcome<D::Ok> {
        futures_executor::block_on(self)
    }

    /// Whether the outcome is already known without polling the inner
    /// computation.
    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    fn poll_settling(
        &self,
        settling: &mut Pin<Box<Settling<D>>>,
        cx: &mut Context<'_>,
    ) -> Poll<Outcome<D::Ok>> {
        if !self.catcher.captures_panics() {
            return settling.as_mut().poll(cx);
        }

        match catch_unwind(AssertUnwindSafe(|| settling.as_mut().poll(cx))) {
            Ok(poll) => poll,
            Err(payload) => Poll::Ready(Err(Failure::Panic(Panic::new(payload)))),
        }
    }
}

impl<D> Future for Settled<D>
where
    D: Deferred,
    D::Error: Into<Failure>,
{
    type Output = Outcome<D::Ok>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        let outcome = match mem::replace(&mut this.state, State::Done) {
            State::Ready(outcome) => outcome,
            State::Pending(mut settling) => match this.poll_settling(&mut settling, cx) {
                Poll::Ready(outcome) => outcome,
                Poll::Pending => {
                    this.state = State::Pending(settling);
                    return Poll::Pending;
                }
            },
            State::Done => panic!("`Settled` polled after completion"),
        };

        this.catcher.record(&outcome);
        Poll::Ready(outcome)
    }
}

// Never pin-projected: the pending computation lives in its own `Pin<Box<_>>`.
impl<D: TryFuture> Unpin for Settled<D> {}

impl<D: TryFuture> fmt::Debug for Settled<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settled")
            .field("state", &self.state.name())
            .field("catcher", &self.catcher)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{future, FutureExt};

    fn pending<T>(value: Result<T, Failure>) -> Settled<future::Ready<Result<T, Failure>>> {
        Settled::new(Attempt::Pending(future::ready(value)), Catcher::default())
    }

    #[test]
    fn resolves_success_value() {
        assert_eq!(pending(Ok(5)).block().ok(), Some(5));
    }

    #[test]
    fn rejection_becomes_failure() {
        let outcome = pending::<i32>(Err(Failure::msg("rejected"))).block();

        assert_eq!(outcome.map_err(|f| f.to_string()), Err("rejected".to_string()));
    }

    #[test]
    fn settled_attempt_is_ready_without_inner_future() {
        let settled: Settled<future::Ready<Result<i32, Failure>>> = Settled::new(
            Attempt::Settled(Err(Failure::msg("early"))),
            Catcher::default(),
        );

        assert!(settled.is_ready());
        let outcome = settled.now_or_never().expect("resolves on first poll");
        assert!(outcome.is_err());
    }

    #[test]
    fn debug_shows_state() {
        let settled = pending(Ok(1));

        assert!(format!("{:?}", settled).contains(r#"state: "pending""#));
    }
}
