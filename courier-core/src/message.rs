//! Request and notification traits.

use crate::{cancellation::CancellationToken, dispatcher::Dispatcher, error::Error};
use std::future::Future;

/// A typed request with exactly one handler.
///
/// The request sends itself: [`send_to`](Request::send_to) hands the concrete
/// value to the dispatcher's strongly typed entry point, so the handler lookup
/// is resolved by the compiler at the call site.
///
/// # Example
///
/// ```rust,ignore
/// struct CreateOrder { items: Vec<Item> }
///
/// impl Request for CreateOrder {
///     type Response = OrderId;
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Request",
    label = "missing `Request` implementation",
    note = "Requests must declare their `Response` type and be `Send + Sync + 'static`."
)]
pub trait Request: Send + Sync + Sized + 'static {
    /// The value the handler produces for this request.
    type Response: Send + 'static;

    /// Send this request through `dispatcher`.
    fn send_to<D: Dispatcher>(
        self,
        dispatcher: &D,
        token: &CancellationToken,
    ) -> impl Future<Output = Result<Self::Response, Error>> + Send {
        dispatcher.dispatch(self, token)
    }
}

/// A marker trait for broadcast messages.
///
/// Notifications have zero or more independent handlers and no response.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Notification",
    label = "must be `Send + Sync + 'static`",
    note = "All notifications in Courier must be thread-safe and static."
)]
pub trait Notification: Send + Sync + 'static {}

impl Notification for () {}
impl Notification for String {}
impl Notification for &'static str {}
impl<T: Notification> Notification for Box<T> {}
impl<T: Notification> Notification for std::sync::Arc<T> {}
