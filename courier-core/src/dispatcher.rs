//! Dispatcher core trait.

use crate::{cancellation::CancellationToken, error::Error, message::Request};
use std::{future::Future, pin::Pin};

/// Boxed future used by the object-safe trait variants.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The strongly typed entry point a [`Request`] sends itself to.
///
/// Implementors resolve the handler and behaviors for `R` and run them.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot dispatch requests",
    label = "missing `Dispatcher` implementation",
    note = "Implement `Dispatcher` to resolve and run request handlers."
)]
pub trait Dispatcher: Send + Sync {
    /// Dispatch a request of concrete type `R`.
    fn dispatch<R: Request>(
        &self,
        request: R,
        token: &CancellationToken,
    ) -> impl Future<Output = Result<R::Response, Error>> + Send;
}
