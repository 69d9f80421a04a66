//! # Pipeline Behaviors
//!
//! Behaviors are middleware around a request's handler. Each one receives
//! the request, the cancellation token and a [`Next`] continuation standing
//! for "everything inside me": the remaining behaviors and the handler.
//!
//! A behavior decides how often the continuation runs:
//!
//! - **Pass-through**: run `next` once and return its result
//! - **Short-circuit**: return without running `next` (validation, caching)
//! - **Repeat**: run `next` several times (retry)
//!
//! `Next` is cheap to clone and every run starts a fresh invocation of the
//! inner chain.

use crate::{
    cancellation::CancellationToken,
    dispatcher::BoxFuture,
    error::Error,
    message::Request,
};
use std::{
    fmt,
    future::{Future, IntoFuture},
    sync::Arc,
};

type Continuation<'a, T> = dyn Fn() -> BoxFuture<'a, Result<T, Error>> + Send + Sync + 'a;

/// The continuation a behavior receives.
///
/// Running it invokes the inner behaviors and finally the handler. It can be
/// awaited directly (`next.await`) or run several times through
/// [`run`](Next::run).
pub struct Next<'a, T> {
    inner: Arc<Continuation<'a, T>>,
}

impl<'a, T> Next<'a, T> {
    /// Build a continuation from a function returning a fresh future per call.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> BoxFuture<'a, Result<T, Error>> + Send + Sync + 'a,
    {
        Self { inner: Arc::new(f) }
    }

    /// Start one invocation of the inner chain.
    pub fn run(&self) -> BoxFuture<'a, Result<T, Error>> {
        (self.inner)()
    }
}

impl<T> Clone for Next<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Next<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next").finish_non_exhaustive()
    }
}

impl<'a, T> IntoFuture for Next<'a, T> {
    type Output = Result<T, Error>;
    type IntoFuture = BoxFuture<'a, Result<T, Error>>;

    fn into_future(self) -> Self::IntoFuture {
        self.run()
    }
}

/// Middleware wrapping the handler of requests of type `R`.
///
/// # Example
///
/// ```rust,ignore
/// struct Validation;
///
/// impl PipelineBehavior<CreateOrder> for Validation {
///     async fn handle(
///         &self,
///         request: &CreateOrder,
///         next: Next<'_, OrderId>,
///         _token: &CancellationToken,
///     ) -> Result<OrderId, Error> {
///         if request.items.is_empty() {
///             return Err("order has no items".into());
///         }
///         next.await
///     }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `PipelineBehavior<{R}>`",
    label = "missing `PipelineBehavior` implementation",
    note = "Behaviors must implement `handle` for the specific request type `{R}`."
)]
pub trait PipelineBehavior<R: Request>: Send + Sync + 'static {
    /// Run this behavior around `next`.
    fn handle(
        &self,
        request: &R,
        next: Next<'_, R::Response>,
        token: &CancellationToken,
    ) -> impl Future<Output = Result<R::Response, Error>> + Send;
}

/// Dynamic object-safe version of [`PipelineBehavior`].
pub trait DynPipelineBehavior<R: Request>: Send + Sync + 'static {
    /// Run this behavior around `next` (dynamic dispatch version).
    fn handle_dyn<'a>(
        &'a self,
        request: &'a R,
        next: Next<'a, R::Response>,
        token: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<R::Response, Error>>;
}

impl<R: Request, T: PipelineBehavior<R>> DynPipelineBehavior<R> for T {
    fn handle_dyn<'a>(
        &'a self,
        request: &'a R,
        next: Next<'a, R::Response>,
        token: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<R::Response, Error>> {
        Box::pin(self.handle(request, next, token))
    }
}
