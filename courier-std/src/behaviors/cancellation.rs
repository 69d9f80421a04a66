//! Cancellation Behavior - Stop work once the caller gives up.

use courier_core::{CancellationToken, Error, Next, PipelineBehavior, Request, ensure_active};
use futures::future::{Either, select};
use std::pin::pin;

/// A behavior that turns a cancelled token into [`Error::Canceled`].
///
/// Fails immediately if the token is already cancelled, without running the
/// rest of the chain. Otherwise races the chain against the token; if the
/// token fires first the inner future is dropped at its current await point.
///
/// Handlers that must not be interrupted midway should check the token
/// themselves instead of relying on this behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct CancellationBehavior;

impl<R: Request> PipelineBehavior<R> for CancellationBehavior {
    async fn handle(
        &self,
        _request: &R,
        next: Next<'_, R::Response>,
        token: &CancellationToken,
    ) -> Result<R::Response, Error> {
        ensure_active(token)?;

        let cancelled = pin!(token.cancelled());
        match select(next.run(), cancelled).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => Err(Error::Canceled),
        }
    }
}
