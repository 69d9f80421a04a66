//! Notification delivery.

use courier_core::{CancellationToken, DynNotificationHandler, Error, Notification};
use std::sync::Arc;

/// A sequential delivery strategy.
///
/// Awaits each handler to completion before starting the next, in
/// registration order. Stops at the first failure and returns it unchanged;
/// later handlers are not invoked. No handlers means nothing to do.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialDelivery;

impl SequentialDelivery {
    /// Deliver `notification` to `handlers`.
    pub async fn deliver<N: Notification>(
        &self,
        notification: &N,
        handlers: &[Arc<dyn DynNotificationHandler<N>>],
        token: &CancellationToken,
    ) -> Result<(), Error> {
        for (index, handler) in handlers.iter().enumerate() {
            handler
                .handle_dyn(notification, token)
                .await
                .inspect_err(|error| report_failure::<N>(index, handlers.len(), error))?;
        }
        Ok(())
    }
}

#[cfg(feature = "tracing")]
fn report_failure<N: Notification>(index: usize, total: usize, error: &Error) {
    tracing::warn!(
        notification = std::any::type_name::<N>(),
        handler = index,
        remaining = total - index - 1,
        %error,
        "Notification handler failed"
    );
}

#[cfg(not(feature = "tracing"))]
fn report_failure<N: Notification>(_index: usize, _total: usize, _error: &Error) {}
