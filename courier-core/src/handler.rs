//! # Terminal Handlers
//!
//! A [`RequestHandler`] is the one implementation that turns a request into
//! its response. A [`NotificationHandler`] is one of possibly many receivers
//! of a notification.
//!
//! Both receive the message by reference together with the cancellation
//! token of the call. Borrowing lets behaviors run the handler more than once
//! for the same request.
//!
//! # Usage Patterns
//!
//! 1. **Struct implementation**: `impl RequestHandler<CreateOrder> for CreateOrderHandler`
//! 2. **Dynamic storage**: registries keep `Arc<dyn DynRequestHandler<R>>`,
//!    which every `RequestHandler<R>` implements through a blanket impl.

use crate::{
    cancellation::CancellationToken,
    dispatcher::BoxFuture,
    error::Error,
    message::{Notification, Request},
};
use std::future::Future;

/// The unique terminal endpoint for requests of type `R`.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle requests of type `{R}`",
    label = "missing `RequestHandler<{R}>` implementation",
    note = "Handlers must implement the `handle` method for the request type `{R}`."
)]
pub trait RequestHandler<R: Request>: Send + Sync + 'static {
    /// Produce the response for `request`.
    fn handle(
        &self,
        request: &R,
        token: &CancellationToken,
    ) -> impl Future<Output = Result<R::Response, Error>> + Send;
}

/// Dynamic object-safe version of [`RequestHandler`].
pub trait DynRequestHandler<R: Request>: Send + Sync + 'static {
    /// Produce the response for `request` (dynamic dispatch version).
    fn handle_dyn<'a>(
        &'a self,
        request: &'a R,
        token: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<R::Response, Error>>;
}

impl<R: Request, T: RequestHandler<R>> DynRequestHandler<R> for T {
    fn handle_dyn<'a>(
        &'a self,
        request: &'a R,
        token: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<R::Response, Error>> {
        Box::pin(self.handle(request, token))
    }
}

/// One receiver of notifications of type `N`.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle notifications of type `{N}`",
    label = "missing `NotificationHandler<{N}>` implementation",
    note = "Notification handlers must implement `handle` for the notification type `{N}`."
)]
pub trait NotificationHandler<N: Notification>: Send + Sync + 'static {
    /// React to `notification`.
    fn handle(
        &self,
        notification: &N,
        token: &CancellationToken,
    ) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Dynamic object-safe version of [`NotificationHandler`].
pub trait DynNotificationHandler<N: Notification>: Send + Sync + 'static {
    /// React to `notification` (dynamic dispatch version).
    fn handle_dyn<'a>(
        &'a self,
        notification: &'a N,
        token: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<(), Error>>;
}

impl<N: Notification, T: NotificationHandler<N>> DynNotificationHandler<N> for T {
    fn handle_dyn<'a>(
        &'a self,
        notification: &'a N,
        token: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<(), Error>> {
        Box::pin(self.handle(notification, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Add(u32, u32);
    impl Request for Add {
        type Response = u32;
    }

    struct Adder;
    impl RequestHandler<Add> for Adder {
        async fn handle(&self, request: &Add, _token: &CancellationToken) -> Result<u32, Error> {
            Ok(request.0 + request.1)
        }
    }

    struct Audit;
    impl Notification for Audit {}

    struct Refuse;
    impl NotificationHandler<Audit> for Refuse {
        async fn handle(&self, _: &Audit, _token: &CancellationToken) -> Result<(), Error> {
            Err("refused".into())
        }
    }

    #[tokio::test]
    async fn test_dyn_request_handler() {
        let handler: Box<dyn DynRequestHandler<Add>> = Box::new(Adder);
        let token = CancellationToken::new();
        assert_eq!(handler.handle_dyn(&Add(2, 3), &token).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_dyn_notification_handler() {
        let handler: Box<dyn DynNotificationHandler<Audit>> = Box::new(Refuse);
        let token = CancellationToken::new();
        let err = handler.handle_dyn(&Audit, &token).await.unwrap_err();
        assert_eq!(err.to_string(), "refused");
    }
}
