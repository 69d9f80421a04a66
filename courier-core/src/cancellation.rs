//! Cancellation signal shared by every level of a dispatch.

use crate::error::Error;

pub use tokio_util::sync::CancellationToken;

/// Fail with [`Error::Canceled`] if `token` has been cancelled.
///
/// Handlers and behaviors call this at the points where they are willing to
/// stop.
pub fn ensure_active(token: &CancellationToken) -> Result<(), Error> {
    if token.is_cancelled() {
        Err(Error::Canceled)
    } else {
        Ok(())
    }
}
