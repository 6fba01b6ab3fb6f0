use futures::{
    future::{MapOkOrElse, TryFuture},
    TryFutureExt,
};

/// Capability of a deferred computation: attaching a success handler and a
/// failure handler, exactly one of which runs, once, when it settles.
///
/// Implemented for every `TryFuture`, i.e. every future resolving to a
/// `Result`. `async` blocks, `futures::future::ok`/`err`, and hand-written
/// futures all qualify without naming this trait.
pub trait Deferred: TryFuture + Sized {
    /// Attaches both continuations. The returned future resolves to the
    /// value produced by whichever handler ran.
    ///
    /// ```rust
    /// use tryf::Deferred;
    ///
    /// let doubled = futures::future::ok::<i32, ()>(21).attach(|v| v * 2, |_| 0);
    /// assert_eq!(futures_executor::block_on(doubled), 42);
    /// ```
    fn attach<U, S, F>(self, on_success: S, on_failure: F) -> MapOkOrElse<Self, S, F>
    where
        S: FnOnce(Self::Ok) -> U,
        F: FnOnce(Self::Error) -> U,
    {
        self.map_ok_or_else(on_failure, on_success)
    }
}

impl<D> Deferred for D where D: TryFuture {}
