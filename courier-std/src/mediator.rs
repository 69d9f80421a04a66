//! The mediator facade.
//!
//! [`Mediator`] is the only component callers talk to. `send` routes a
//! request to its single handler through the request's behaviors; `publish`
//! broadcasts a notification to every handler registered for it.
//!
//! # Dispatch path
//!
//! 1. [`Mediator::send`] asks the request to send itself
//!    ([`Request::send_to`]), which lands in [`Dispatcher::dispatch`] with the
//!    concrete request type.
//! 2. The [`WrapperCache`] yields the [`RequestWrapper`] for that type,
//!    building it on first use.
//! 3. The wrapper resolves the handler and behaviors from the [`Registry`]
//!    and runs the composed chain.

use crate::{
    cache::WrapperCache,
    delivery::SequentialDelivery,
    registry::{Registry, RegistryBuilder},
    wrapper::RequestWrapper,
};
use courier_core::{BoxFuture, CancellationToken, Dispatcher, Error, Notification, Request};
use std::{fmt, sync::Arc};

/// In-process mediator between callers and handlers.
///
/// Cloning is cheap; clones share the registry and the wrapper cache.
///
/// # Example
///
/// ```rust,ignore
/// let mediator = Mediator::new(
///     RegistryBuilder::new()
///         .register_handler::<CreateOrder, _>(CreateOrderHandler)
///         .build(),
/// );
///
/// let id = mediator.send(CreateOrder { items }, &CancellationToken::new()).await?;
/// ```
#[derive(Clone)]
pub struct Mediator {
    registry: Arc<Registry>,
    cache: Arc<WrapperCache>,
    delivery: SequentialDelivery,
}

impl Mediator {
    /// Create a mediator over `registry` with a fresh wrapper cache.
    pub fn new(registry: impl Into<Arc<Registry>>) -> Self {
        Self::builder().registry(registry).build()
    }

    /// Start a [`MediatorBuilder`].
    pub fn builder() -> MediatorBuilder {
        MediatorBuilder::new()
    }

    /// Send `request` to its handler through its behaviors.
    ///
    /// Fails with [`Error::HandlerNotFound`] or [`Error::AmbiguousHandler`]
    /// before running anything if `R` does not have exactly one handler.
    /// Any other error is the one raised by a behavior or the handler.
    pub async fn send<R: Request>(
        &self,
        request: R,
        token: &CancellationToken,
    ) -> Result<R::Response, Error> {
        request.send_to(self, token).await
    }

    /// Send a request known only by its response type.
    ///
    /// The boxed request dispatches itself with its concrete type, so the
    /// same handler and behaviors run as for [`send`](Mediator::send).
    pub async fn send_dyn<T: Send + 'static>(
        &self,
        request: Box<dyn DynRequest<T>>,
        token: &CancellationToken,
    ) -> Result<T, Error> {
        request.send_boxed(self, token).await
    }

    /// Deliver `notification` to every handler registered for `N`.
    ///
    /// Handlers run one after another in registration order. The first
    /// failure stops delivery and is returned. Publishing with no handlers
    /// succeeds and does nothing.
    pub async fn publish<N: Notification>(
        &self,
        notification: N,
        token: &CancellationToken,
    ) -> Result<(), Error> {
        let handlers = self.registry.resolve_notification_handlers::<N>()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            notification = std::any::type_name::<N>(),
            handlers = handlers.len(),
            "Publishing notification"
        );

        self.delivery.deliver(&notification, &handlers, token).await
    }

    /// The registry this mediator resolves from.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The wrapper cache this mediator dispatches through.
    pub fn cache(&self) -> &WrapperCache {
        &self.cache
    }
}

impl Dispatcher for Mediator {
    async fn dispatch<R: Request>(
        &self,
        request: R,
        token: &CancellationToken,
    ) -> Result<R::Response, Error> {
        let wrapper = self.cache.get_or_create(RequestWrapper::<R>::new);
        wrapper.handle(request, &self.registry, token).await
    }
}

impl fmt::Debug for Mediator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mediator")
            .field("bindings", &self.registry.len())
            .field("cache", &self.cache)
            .finish()
    }
}

// ============================================================================
// MediatorBuilder
// ============================================================================

/// Builder for [`Mediator`].
///
/// Without a registry the mediator has no bindings; without a cache it gets
/// a fresh one. Pass the same `Arc<WrapperCache>` to several builders to let
/// their mediators share dispatch wrappers.
#[derive(Default)]
pub struct MediatorBuilder {
    registry: Option<Arc<Registry>>,
    cache: Option<Arc<WrapperCache>>,
}

impl MediatorBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the registry.
    pub fn registry(mut self, registry: impl Into<Arc<Registry>>) -> Self {
        self.registry = Some(registry.into());
        self
    }

    /// Build and set the registry from a [`RegistryBuilder`].
    pub fn bindings(self, builder: RegistryBuilder) -> Self {
        self.registry(builder.build())
    }

    /// Use an existing wrapper cache.
    pub fn cache(mut self, cache: Arc<WrapperCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Build the mediator.
    pub fn build(self) -> Mediator {
        Mediator {
            registry: self.registry.unwrap_or_default(),
            cache: self.cache.unwrap_or_default(),
            delivery: SequentialDelivery,
        }
    }
}

// ============================================================================
// DynRequest - requests known only by their response type
// ============================================================================

/// Object-safe view of a [`Request`] producing `T`.
///
/// Every request implements this through a blanket impl, so a
/// `Box<dyn DynRequest<T>>` can hold any request whose response is `T` and
/// still dispatch with its concrete type.
pub trait DynRequest<T>: Send + Sync {
    /// Send the boxed request through `mediator`.
    fn send_boxed<'a>(
        self: Box<Self>,
        mediator: &'a Mediator,
        token: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<T, Error>>;
}

impl<R: Request> DynRequest<R::Response> for R {
    fn send_boxed<'a>(
        self: Box<Self>,
        mediator: &'a Mediator,
        token: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<R::Response, Error>> {
        Box::pin((*self).send_to(mediator, token))
    }
}
