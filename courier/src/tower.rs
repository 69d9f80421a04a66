//! Tower integration for courier.
//!
//! This module provides adapters between the mediator and tower's `Service`
//! trait:
//!
//! - [`MediatorService`]: a `Service<R>` that sends each request through a [`Mediator`]
//! - [`ServiceHandler`]: a `RequestHandler<R>` backed by a tower service
//!
//! # Example
//!
//! ```rust,ignore
//! use courier::tower::MediatorService;
//! use ::tower::ServiceExt;
//!
//! let service = MediatorService::<CreateOrder>::new(mediator);
//! let id = service.oneshot(CreateOrder { items }).await?;
//! ```

use crate::{BoxError, BoxFuture, CancellationToken, Error, Mediator, Request, RequestHandler};
use std::{
    marker::PhantomData,
    task::{Context, Poll},
};
use ::tower::{Service, ServiceExt};

// ============================================================================
// Mediator → Service Adapter
// ============================================================================

/// Exposes [`Mediator::send`] for one request type as a tower `Service`.
///
/// Every call uses the token the service was built with, so cancelling it
/// cancels all in-flight and future calls made through this service.
pub struct MediatorService<R> {
    mediator: Mediator,
    token: CancellationToken,
    _request: PhantomData<fn(R)>,
}

impl<R> MediatorService<R> {
    /// Create a service with a fresh, never-cancelled token.
    pub fn new(mediator: Mediator) -> Self {
        Self::with_token(mediator, CancellationToken::new())
    }

    /// Create a service whose calls observe `token`.
    pub fn with_token(mediator: Mediator, token: CancellationToken) -> Self {
        Self {
            mediator,
            token,
            _request: PhantomData,
        }
    }

    /// Get a reference to the inner mediator.
    pub fn mediator(&self) -> &Mediator {
        &self.mediator
    }

    /// The token passed to every call.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl<R> Clone for MediatorService<R> {
    fn clone(&self) -> Self {
        Self {
            mediator: self.mediator.clone(),
            token: self.token.clone(),
            _request: PhantomData,
        }
    }
}

impl<R: Request> Service<R> for MediatorService<R> {
    type Response = R::Response;
    type Error = Error;
    type Future = BoxFuture<'static, Result<R::Response, Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: R) -> Self::Future {
        let mediator = self.mediator.clone();
        let token = self.token.clone();
        Box::pin(async move { mediator.send(request, &token).await })
    }
}

// ============================================================================
// Service → Handler Adapter
// ============================================================================

/// Uses a tower `Service` as the handler for `R`.
///
/// The service receives a clone of each request and is driven to readiness
/// before every call. Service errors become [`Error::Custom`].
#[derive(Clone)]
pub struct ServiceHandler<S> {
    service: S,
}

impl<S> ServiceHandler<S> {
    /// Create a new `ServiceHandler` wrapping the given service.
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Get a reference to the inner service.
    pub fn inner(&self) -> &S {
        &self.service
    }
}

impl<R, S> RequestHandler<R> for ServiceHandler<S>
where
    R: Request + Clone,
    S: Service<R, Response = R::Response> + Clone + Send + Sync + 'static,
    S::Error: Into<BoxError>,
    S::Future: Send,
{
    async fn handle(&self, request: &R, _token: &CancellationToken) -> Result<R::Response, Error> {
        self.service
            .clone()
            .oneshot(request.clone())
            .await
            .map_err(|err| Error::from(Into::<BoxError>::into(err)))
    }
}
