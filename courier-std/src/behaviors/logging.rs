//! Logging Behavior - Observability for request handling.

use courier_core::{CancellationToken, Error, Next, PipelineBehavior, Request};

/// A behavior that logs requests and their outcome.
///
/// Logs the request type before running the rest of the chain, then the
/// elapsed time and whether the chain succeeded. The outcome is logged on
/// both paths, so registered first it brackets every other behavior.
///
/// # Example
///
/// ```rust,ignore
/// let registry = RegistryBuilder::new()
///     .register_behavior::<CreateOrder, _>(LoggingBehavior::named("orders"))
///     .register_handler::<CreateOrder, _>(CreateOrderHandler)
///     .build();
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LoggingBehavior {
    name: &'static str,
}

impl LoggingBehavior {
    /// Create a new `LoggingBehavior` with a default name.
    pub fn new() -> Self {
        Self { name: "request" }
    }

    /// Create a new `LoggingBehavior` with a custom name.
    ///
    /// The name is used in log messages to identify the pipeline.
    pub fn named(name: &'static str) -> Self {
        Self { name }
    }

    /// The name used in log messages.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Default for LoggingBehavior {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Request> PipelineBehavior<R> for LoggingBehavior {
    async fn handle(
        &self,
        _request: &R,
        next: Next<'_, R::Response>,
        _token: &CancellationToken,
    ) -> Result<R::Response, Error> {
        #[cfg(feature = "tracing")]
        let started = std::time::Instant::now();
        #[cfg(feature = "tracing")]
        tracing::info!(
            name = %self.name,
            request = std::any::type_name::<R>(),
            "Handling request"
        );

        let result = next.await;

        #[cfg(feature = "tracing")]
        match &result {
            Ok(_) => tracing::info!(
                name = %self.name,
                request = std::any::type_name::<R>(),
                elapsed = ?started.elapsed(),
                "Request handled"
            ),
            Err(error) => tracing::warn!(
                name = %self.name,
                request = std::any::type_name::<R>(),
                elapsed = ?started.elapsed(),
                %error,
                "Request failed"
            ),
        }

        result
    }
}
