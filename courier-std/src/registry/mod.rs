//! Registry module for capability bindings.
//!
//! This module provides a builder for binding implementations to
//! [`Capability`] keys and a frozen [`Registry`] that the mediator queries
//! during dispatch.
//!
//! Bindings keep their registration order. Multi-bind capabilities
//! (behaviors, notification handlers) resolve to the full ordered list; the
//! request-handler capability must resolve to exactly one implementation.

mod component;

#[cfg(feature = "inventory")]
mod collected;

pub use component::Component;

#[cfg(feature = "inventory")]
pub use collected::Registration;

use courier_core::{
    Capability, DynNotificationHandler, DynPipelineBehavior, DynRequestHandler, Error,
    Notification, NotificationHandler, PipelineBehavior, Request, RequestHandler,
};
use std::{
    any::{Any, type_name},
    collections::HashMap,
    sync::Arc,
};

type Erased = Box<dyn Any + Send + Sync>;

/// How instances of a binding are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// One instance shared by every resolution.
    Singleton,
    /// A fresh instance built by a factory on every resolution.
    Transient,
}

enum Provider {
    Singleton(Erased),
    Transient(Box<dyn Fn() -> Erased + Send + Sync>),
}

impl Provider {
    fn instance<T: Clone + 'static>(&self) -> Option<T> {
        match self {
            Provider::Singleton(value) => value.downcast_ref::<T>().cloned(),
            Provider::Transient(factory) => factory().downcast::<T>().ok().map(|boxed| *boxed),
        }
    }

    fn lifetime(&self) -> Lifetime {
        match self {
            Provider::Singleton(_) => Lifetime::Singleton,
            Provider::Transient(_) => Lifetime::Transient,
        }
    }
}

struct Binding {
    provider: Provider,
    implementation: &'static str,
}

impl Binding {
    fn instance<T>(&self, capability: &Capability) -> Result<Arc<T>, Error>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.provider.instance::<Arc<T>>().ok_or_else(|| {
            #[cfg(feature = "tracing")]
            tracing::warn!(%capability, implementation = self.implementation, "Binding holds a different handle type");
            Error::BindingMismatch {
                capability: *capability,
                implementation: self.implementation,
                expected: type_name::<T>(),
            }
        })
    }
}

/// Description of one binding, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationInfo {
    /// Type name of the bound implementation.
    pub implementation: &'static str,
    /// How instances are produced.
    pub lifetime: Lifetime,
}

// ============================================================================
// RegistryBuilder - for constructing registries
// ============================================================================

/// Builder for constructing a Registry.
///
/// Use this to bind handlers, behaviors and notification handlers, then call
/// `.build()` to create an immutable, thread-safe [`Registry`].
///
/// # Example
/// ```ignore
/// let registry = RegistryBuilder::new()
///     .register_handler::<CreateOrder, _>(CreateOrderHandler)
///     .register_behavior::<CreateOrder, _>(LoggingBehavior)
///     .register_behavior::<CreateOrder, _>(Validation)
///     .register_notification_handler_factory::<OrderPlaced, _, _>(SendReceipt::default)
///     .build();
/// ```
#[derive(Default)]
pub struct RegistryBuilder {
    bindings: HashMap<Capability, Vec<Binding>>,
}

impl RegistryBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a shared request handler for `R`.
    pub fn register_handler<R, H>(mut self, handler: H) -> Self
    where
        R: Request,
        H: RequestHandler<R>,
    {
        self.register_handler_mut::<R, H>(handler);
        self
    }

    /// Bind a shared request handler for `R` (mutable version).
    pub fn register_handler_mut<R, H>(&mut self, handler: H)
    where
        R: Request,
        H: RequestHandler<R>,
    {
        let instance: Arc<dyn DynRequestHandler<R>> = Arc::new(handler);
        self.bind_singleton(Capability::request_handler::<R>(), type_name::<H>(), instance);
    }

    /// Bind a request handler for `R` built fresh on every resolution.
    pub fn register_handler_factory<R, H, F>(mut self, factory: F) -> Self
    where
        R: Request,
        H: RequestHandler<R>,
        F: Fn() -> H + Send + Sync + 'static,
    {
        self.register_handler_factory_mut::<R, H, F>(factory);
        self
    }

    /// Bind a transient request handler for `R` (mutable version).
    pub fn register_handler_factory_mut<R, H, F>(&mut self, factory: F)
    where
        R: Request,
        H: RequestHandler<R>,
        F: Fn() -> H + Send + Sync + 'static,
    {
        self.bind_transient(Capability::request_handler::<R>(), type_name::<H>(), move || {
            Arc::new(factory()) as Arc<dyn DynRequestHandler<R>>
        });
    }

    /// Append a shared behavior to the pipeline of `R`.
    pub fn register_behavior<R, B>(mut self, behavior: B) -> Self
    where
        R: Request,
        B: PipelineBehavior<R>,
    {
        self.register_behavior_mut::<R, B>(behavior);
        self
    }

    /// Append a shared behavior to the pipeline of `R` (mutable version).
    pub fn register_behavior_mut<R, B>(&mut self, behavior: B)
    where
        R: Request,
        B: PipelineBehavior<R>,
    {
        let instance: Arc<dyn DynPipelineBehavior<R>> = Arc::new(behavior);
        self.bind_singleton(Capability::pipeline_behavior::<R>(), type_name::<B>(), instance);
    }

    /// Append a behavior to the pipeline of `R`, built fresh on every resolution.
    pub fn register_behavior_factory<R, B, F>(mut self, factory: F) -> Self
    where
        R: Request,
        B: PipelineBehavior<R>,
        F: Fn() -> B + Send + Sync + 'static,
    {
        self.register_behavior_factory_mut::<R, B, F>(factory);
        self
    }

    /// Append a transient behavior to the pipeline of `R` (mutable version).
    pub fn register_behavior_factory_mut<R, B, F>(&mut self, factory: F)
    where
        R: Request,
        B: PipelineBehavior<R>,
        F: Fn() -> B + Send + Sync + 'static,
    {
        self.bind_transient(Capability::pipeline_behavior::<R>(), type_name::<B>(), move || {
            Arc::new(factory()) as Arc<dyn DynPipelineBehavior<R>>
        });
    }

    /// Add a shared handler for notifications of type `N`.
    pub fn register_notification_handler<N, H>(mut self, handler: H) -> Self
    where
        N: Notification,
        H: NotificationHandler<N>,
    {
        self.register_notification_handler_mut::<N, H>(handler);
        self
    }

    /// Add a shared handler for notifications of type `N` (mutable version).
    pub fn register_notification_handler_mut<N, H>(&mut self, handler: H)
    where
        N: Notification,
        H: NotificationHandler<N>,
    {
        let instance: Arc<dyn DynNotificationHandler<N>> = Arc::new(handler);
        self.bind_singleton(
            Capability::notification_handler::<N>(),
            type_name::<H>(),
            instance,
        );
    }

    /// Add a handler for notifications of type `N`, built fresh on every resolution.
    pub fn register_notification_handler_factory<N, H, F>(mut self, factory: F) -> Self
    where
        N: Notification,
        H: NotificationHandler<N>,
        F: Fn() -> H + Send + Sync + 'static,
    {
        self.register_notification_handler_factory_mut::<N, H, F>(factory);
        self
    }

    /// Add a transient handler for notifications of type `N` (mutable version).
    pub fn register_notification_handler_factory_mut<N, H, F>(&mut self, factory: F)
    where
        N: Notification,
        H: NotificationHandler<N>,
        F: Fn() -> H + Send + Sync + 'static,
    {
        self.bind_transient(
            Capability::notification_handler::<N>(),
            type_name::<H>(),
            move || Arc::new(factory()) as Arc<dyn DynNotificationHandler<N>>,
        );
    }

    /// Register every candidate under all the capabilities it provides.
    ///
    /// Candidates are visited in iteration order, so behaviors contributed by
    /// earlier candidates run outside those of later ones.
    pub fn scan<I>(mut self, candidates: I) -> Self
    where
        I: IntoIterator,
        I::Item: Component,
    {
        for candidate in candidates {
            candidate.register(&mut self);
        }
        self
    }

    /// Build the immutable Registry.
    pub fn build(self) -> Registry {
        Registry {
            bindings: self.bindings,
        }
    }

    /// Get the number of bindings across all capabilities.
    pub fn len(&self) -> usize {
        self.bindings.values().map(Vec::len).sum()
    }

    /// Check if the builder has no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn bind_singleton<T>(&mut self, capability: Capability, implementation: &'static str, value: T)
    where
        T: Send + Sync + 'static,
    {
        self.bind(capability, implementation, Provider::Singleton(Box::new(value)));
    }

    fn bind_transient<T, F>(&mut self, capability: Capability, implementation: &'static str, f: F)
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let factory = move || Box::new(f()) as Erased;
        self.bind(capability, implementation, Provider::Transient(Box::new(factory)));
    }

    fn bind(&mut self, capability: Capability, implementation: &'static str, provider: Provider) {
        #[cfg(feature = "tracing")]
        tracing::trace!(%capability, implementation, "Binding capability");

        self.bindings.entry(capability).or_default().push(Binding {
            provider,
            implementation,
        });
    }
}

// ============================================================================
// Registry - immutable, thread-safe capability storage
// ============================================================================

/// An immutable, thread-safe set of capability bindings.
///
/// Created by calling [`RegistryBuilder::build`]. The registry never changes
/// after construction and is typically shared through an `Arc`.
pub struct Registry {
    bindings: HashMap<Capability, Vec<Binding>>,
}

impl Registry {
    /// Start a new [`RegistryBuilder`].
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Resolve the single request handler for `R`.
    pub fn resolve_handler<R: Request>(&self) -> Result<Arc<dyn DynRequestHandler<R>>, Error> {
        self.resolve_single(&Capability::request_handler::<R>())
    }

    /// Resolve the behaviors of `R` in registration order.
    pub fn resolve_behaviors<R: Request>(
        &self,
    ) -> Result<Vec<Arc<dyn DynPipelineBehavior<R>>>, Error> {
        self.resolve_all(&Capability::pipeline_behavior::<R>())
    }

    /// Resolve the handlers of `N` in registration order.
    pub fn resolve_notification_handlers<N: Notification>(
        &self,
    ) -> Result<Vec<Arc<dyn DynNotificationHandler<N>>>, Error> {
        self.resolve_all(&Capability::notification_handler::<N>())
    }

    /// Resolve exactly one instance bound to `capability`.
    ///
    /// `T` is the stored handle type, e.g. `dyn DynRequestHandler<R>`. Only
    /// single-bind capabilities can be resolved this way; anything else fails
    /// with [`Error::NotSingleBind`] without looking at the bindings.
    pub fn resolve_single<T>(&self, capability: &Capability) -> Result<Arc<T>, Error>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        if !capability.kind().is_single_bind() {
            #[cfg(feature = "tracing")]
            tracing::warn!(%capability, "Single resolution of a multi-bind capability");
            return Err(Error::NotSingleBind {
                capability: *capability,
            });
        }

        let bindings = self.bindings_for(capability);
        match bindings {
            [] => {
                #[cfg(feature = "tracing")]
                tracing::warn!(%capability, "No handler registered");
                Err(Error::HandlerNotFound {
                    capability: *capability,
                })
            }
            [binding] => binding.instance::<T>(capability),
            _ => {
                #[cfg(feature = "tracing")]
                tracing::warn!(%capability, count = bindings.len(), "Ambiguous handler registration");
                Err(Error::AmbiguousHandler {
                    capability: *capability,
                    count: bindings.len(),
                })
            }
        }
    }

    /// Resolve every instance bound to `capability`, in registration order.
    ///
    /// Fails with [`Error::BindingMismatch`] if any binding does not hold a
    /// `T`; a partial list is never returned.
    pub fn resolve_all<T>(&self, capability: &Capability) -> Result<Vec<Arc<T>>, Error>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.bindings_for(capability)
            .iter()
            .map(|binding| binding.instance::<T>(capability))
            .collect()
    }

    /// Check whether anything is bound to `capability`.
    pub fn contains(&self, capability: &Capability) -> bool {
        !self.bindings_for(capability).is_empty()
    }

    /// Get the number of bindings for `capability`.
    pub fn count(&self, capability: &Capability) -> usize {
        self.bindings_for(capability).len()
    }

    /// Describe the bindings for `capability`, in registration order.
    pub fn registrations<'a>(
        &'a self,
        capability: &Capability,
    ) -> impl Iterator<Item = RegistrationInfo> + 'a {
        self.bindings_for(capability)
            .iter()
            .map(|binding| RegistrationInfo {
                implementation: binding.implementation,
                lifetime: binding.provider.lifetime(),
            })
    }

    /// Iterate over every capability that has at least one binding.
    pub fn capabilities(&self) -> impl Iterator<Item = &Capability> {
        self.bindings.keys()
    }

    /// Get the number of bindings across all capabilities.
    pub fn len(&self) -> usize {
        self.bindings.values().map(Vec::len).sum()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn bindings_for(&self, capability: &Capability) -> &[Binding] {
        self.bindings
            .get(capability)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl Default for Registry {
    fn default() -> Self {
        RegistryBuilder::new().build()
    }
}
