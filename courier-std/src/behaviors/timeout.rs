//! Timeout behavior for time-limited handling.

use courier_core::{CancellationToken, Error, Next, PipelineBehavior, Request};
use std::time::Duration;
use tokio::time::timeout;

/// A behavior that bounds the rest of the chain by a deadline.
///
/// If the inner behaviors and handler do not finish within `duration`, the
/// chain is dropped and [`Error::Timeout`] is returned.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutBehavior {
    duration: Duration,
}

impl TimeoutBehavior {
    /// Create a new timeout behavior.
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// Deadline in whole seconds.
    pub fn secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    /// Deadline in milliseconds.
    pub fn millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    /// The configured deadline.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl<R: Request> PipelineBehavior<R> for TimeoutBehavior {
    async fn handle(
        &self,
        _request: &R,
        next: Next<'_, R::Response>,
        _token: &CancellationToken,
    ) -> Result<R::Response, Error> {
        match timeout(self.duration, next.run()).await {
            Ok(result) => result,
            Err(_) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    request = std::any::type_name::<R>(),
                    timeout = ?self.duration,
                    "Request timed out"
                );
                Err(Error::Timeout(self.duration))
            }
        }
    }
}
