//! Tracing Behavior - Spans around request handling.

use courier_core::{CancellationToken, Error, Next, PipelineBehavior, Request};
use std::fmt::Debug;

/// Trait for requests that carry distributed tracing context.
///
/// Implementing this trait allows [`TracingBehavior`] to link its span to a
/// parent span propagated with the request (e.g., from HTTP headers).
pub trait Traceable {
    /// Return the Trace ID if available (e.g. "4bf92f3577b34da6a3ce929d0e0e4736").
    fn trace_id(&self) -> Option<&str> {
        None
    }

    /// Return the Span ID of the parent span if available.
    fn span_id(&self) -> Option<&str> {
        None
    }
}

/// A behavior that instruments the rest of the chain with a `tracing` span.
///
/// Every inner behavior and the handler run inside an `info` span named
/// `request_process`, tagged with this behavior's name, the request and,
/// when the request carries one, its trace id.
#[derive(Debug, Clone, Copy)]
pub struct TracingBehavior {
    name: &'static str,
}

impl TracingBehavior {
    /// Create a new `TracingBehavior` with the given span label.
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }
}

#[cfg(feature = "tracing")]
use tracing::Instrument;

impl<R> PipelineBehavior<R> for TracingBehavior
where
    R: Request + Debug + Traceable,
{
    #[cfg(feature = "tracing")]
    async fn handle(
        &self,
        request: &R,
        next: Next<'_, R::Response>,
        _token: &CancellationToken,
    ) -> Result<R::Response, Error> {
        let span = if let Some(trace_id) = request.trace_id() {
            tracing::info_span!(
                "request_process",
                behavior = %self.name,
                trace_id = %trace_id,
                span_id = %request.span_id().unwrap_or(""),
                request = ?request
            )
        } else {
            tracing::info_span!(
                "request_process",
                behavior = %self.name,
                request = ?request
            )
        };

        next.into_future().instrument(span).await
    }

    #[cfg(not(feature = "tracing"))]
    async fn handle(
        &self,
        _request: &R,
        next: Next<'_, R::Response>,
        _token: &CancellationToken,
    ) -> Result<R::Response, Error> {
        let _ = self.name;
        next.await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Lookup {
        trace_id: Option<String>,
    }

    impl Request for Lookup {
        type Response = &'static str;
    }

    impl Traceable for Lookup {
        fn trace_id(&self) -> Option<&str> {
            self.trace_id.as_deref()
        }
    }

    #[tokio::test]
    async fn test_tracing_behavior_passthrough() {
        let behavior = TracingBehavior::new("lookup");
        let token = CancellationToken::new();

        for trace_id in [Some("trace_123".to_string()), None] {
            let request = Lookup { trace_id };
            let result = behavior
                .handle(&request, Next::new(|| Box::pin(async { Ok("found") })), &token)
                .await;
            assert_eq!(result.unwrap(), "found");
        }
    }
}
