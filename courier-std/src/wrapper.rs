//! Per-shape dispatch wrapper.
//!
//! A [`RequestWrapper<R>`] is what the [`WrapperCache`](crate::cache::WrapperCache)
//! stores for request type `R`. It carries everything about `R` that does not
//! depend on a registry (capability keys and type names) and runs one
//! dispatch against whatever registry it is given.
//!
//! The handler and the behavior list are resolved from the registry on every
//! call, so transient registrations yield fresh instances per dispatch and a
//! wrapper can be shared by mediators over different registries.

use crate::{pipeline::compose, registry::Registry};
use courier_core::{
    CancellationToken, Capability, DynPipelineBehavior, DynRequestHandler, Error, Request,
};
use std::{any::type_name, fmt, marker::PhantomData};

/// Dispatch entry for requests of type `R`.
pub struct RequestWrapper<R> {
    handler: Capability,
    behaviors: Capability,
    response_name: &'static str,
    _request: PhantomData<fn(R)>,
}

impl<R: Request> RequestWrapper<R> {
    /// Build the wrapper for `R`.
    pub fn new() -> Self {
        Self {
            handler: Capability::request_handler::<R>(),
            behaviors: Capability::pipeline_behavior::<R>(),
            response_name: type_name::<R::Response>(),
            _request: PhantomData,
        }
    }

    /// Resolve the handler and behaviors of `R` from `registry` and run them.
    ///
    /// Resolution errors are returned before any handler or behavior runs.
    /// Everything else is whatever the chain itself returned.
    pub async fn handle(
        &self,
        request: R,
        registry: &Registry,
        token: &CancellationToken,
    ) -> Result<R::Response, Error> {
        let handler = registry.resolve_single::<dyn DynRequestHandler<R>>(&self.handler)?;
        let behaviors = registry.resolve_all::<dyn DynPipelineBehavior<R>>(&self.behaviors)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            request = self.handler.message_name(),
            response = self.response_name,
            behaviors = behaviors.len(),
            "Dispatching request"
        );

        let next = compose(&request, handler.as_ref(), &behaviors, token);
        let result = next.await;

        #[cfg(feature = "tracing")]
        match &result {
            Ok(_) => tracing::debug!(request = self.handler.message_name(), "Request handled"),
            Err(error) => {
                tracing::debug!(request = self.handler.message_name(), %error, "Request failed")
            }
        }

        result
    }
}

impl<R: Request> Default for RequestWrapper<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for RequestWrapper<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestWrapper")
            .field("request", &self.handler.message_name())
            .field("response", &self.response_name)
            .finish()
    }
}
