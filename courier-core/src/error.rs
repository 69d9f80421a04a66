//! Error types for Courier.
//!
//! The mediator itself only raises resolution errors
//! ([`Error::HandlerNotFound`], [`Error::AmbiguousHandler`] and the two
//! registry misuse variants). Everything a
//! handler or behavior returns travels through unchanged, usually as
//! [`Error::Custom`].

use crate::capability::Capability;
use std::time::Duration;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for all Courier operations.
#[derive(Error, Debug)]
pub enum Error {
    /// No implementation was registered for a single-bind capability.
    #[error("no handler registered for {capability}")]
    HandlerNotFound {
        /// The capability that was looked up.
        capability: Capability,
    },

    /// More than one implementation was registered for a single-bind capability.
    #[error("{count} handlers registered for {capability}, expected exactly one")]
    AmbiguousHandler {
        /// The capability that was looked up.
        capability: Capability,
        /// How many implementations were found.
        count: usize,
    },

    /// A single implementation was requested for a capability that allows
    /// any number of bindings.
    #[error("{capability} allows many bindings and cannot resolve to exactly one")]
    NotSingleBind {
        /// The capability that was looked up.
        capability: Capability,
    },

    /// A binding exists for the capability but does not hold the requested
    /// handle type.
    #[error("{implementation} is bound to {capability} but is not a `{expected}`")]
    BindingMismatch {
        /// The capability that was looked up.
        capability: Capability,
        /// Type name of the bound implementation.
        implementation: &'static str,
        /// Type name of the handle the caller asked for.
        expected: &'static str,
    },

    /// The cancellation token was observed as cancelled.
    #[error("operation was canceled")]
    Canceled,

    /// A time-limited step did not complete in time.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// A failure raised by a handler, behavior or notification handler.
    #[error(transparent)]
    Custom(BoxError),
}

impl Error {
    /// Wrap any error raised by user code.
    pub fn custom<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Custom(Box::new(err))
    }

    /// Returns `true` if this error is [`Error::Canceled`].
    pub fn is_canceled(&self) -> bool {
        matches!(self, Error::Canceled)
    }

    /// Returns `true` for errors raised while resolving a handler, before any
    /// handler or behavior code ran.
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            Error::HandlerNotFound { .. }
                | Error::AmbiguousHandler { .. }
                | Error::NotSingleBind { .. }
                | Error::BindingMismatch { .. }
        )
    }

    /// Borrow the original user error if it has type `E`.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            Error::Custom(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}

impl From<BoxError> for Error {
    fn from(err: BoxError) -> Self {
        Error::Custom(err)
    }
}

impl From<&str> for Error {
    fn from(message: &str) -> Self {
        Error::Custom(message.into())
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Error::Custom(message.into())
    }
}
