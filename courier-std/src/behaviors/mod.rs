//! Standard pipeline behaviors.
//!
//! - [`LoggingBehavior`]: logs each request and its outcome
//! - [`TracingBehavior`]: runs the inner chain inside a `tracing` span
//! - [`CancellationBehavior`]: fails with `Canceled` once the token fires
//! - [`TimeoutBehavior`]: fails with `Timeout` when the chain is too slow (feature `timeout`)

pub mod cancellation;
pub mod logging;
#[cfg(feature = "timeout")]
pub mod timeout;
pub mod tracing;

pub use cancellation::CancellationBehavior;
pub use logging::LoggingBehavior;
#[cfg(feature = "timeout")]
pub use timeout::TimeoutBehavior;
pub use self::tracing::{Traceable, TracingBehavior};
