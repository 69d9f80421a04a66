//! Testing utilities for Courier.
//!
//! This module provides small building blocks for asserting what ran, in
//! which order, and how often.
//!
//! # Features
//!
//! - [`CallLog`]: A shared, ordered log of labels
//! - [`RecordingBehavior`]: A behavior that logs before and after the rest of the chain
//! - [`RecordingNotificationHandler`]: A notification handler that logs and can be told to fail
//! - [`CountingHandler`]: A request handler that counts invocations
//! - [`FailingHandler`]: A request handler that always fails

use courier_core::{
    CancellationToken, Error, Next, Notification, NotificationHandler, PipelineBehavior, Request,
    RequestHandler,
};
use parking_lot::Mutex;
use std::{
    marker::PhantomData,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

// ============================================================================
// Call Log
// ============================================================================

/// A shared, ordered record of labels.
///
/// Clones share the same underlying log.
///
/// # Example
///
/// ```rust,ignore
/// let log = CallLog::new();
/// let registry = RegistryBuilder::new()
///     .register_behavior::<CreateOrder, _>(RecordingBehavior::new("outer", &log))
///     .register_behavior::<CreateOrder, _>(RecordingBehavior::new("inner", &log))
///     .register_handler::<CreateOrder, _>(handler)
///     .build();
///
/// mediator.send(request, &token).await?;
/// assert_eq!(log.entries(), ["outer:before", "inner:before", "inner:after", "outer:after"]);
/// ```
#[derive(Clone, Default, Debug)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    /// Create a new empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    /// Get a copy of the entries in insertion order.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if nothing has been logged.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

// ============================================================================
// Recording Behavior
// ============================================================================

/// A behavior that records `"<label>:before"` and `"<label>:after"`.
///
/// The `after` entry is written whether or not the rest of the chain
/// succeeded, and the chain's result is passed through unchanged.
#[derive(Clone, Debug)]
pub struct RecordingBehavior {
    label: &'static str,
    log: CallLog,
}

impl RecordingBehavior {
    /// Create a recording behavior writing to `log`.
    pub fn new(label: &'static str, log: &CallLog) -> Self {
        Self {
            label,
            log: log.clone(),
        }
    }
}

impl<R: Request> PipelineBehavior<R> for RecordingBehavior {
    async fn handle(
        &self,
        _request: &R,
        next: Next<'_, R::Response>,
        _token: &CancellationToken,
    ) -> Result<R::Response, Error> {
        self.log.push(format!("{}:before", self.label));
        let result = next.await;
        self.log.push(format!("{}:after", self.label));
        result
    }
}

// ============================================================================
// Recording Notification Handler
// ============================================================================

/// A notification handler that records its label and optionally fails.
#[derive(Clone, Debug)]
pub struct RecordingNotificationHandler {
    label: &'static str,
    log: CallLog,
    fail: bool,
}

impl RecordingNotificationHandler {
    /// Create a handler that records `label` and succeeds.
    pub fn new(label: &'static str, log: &CallLog) -> Self {
        Self {
            label,
            log: log.clone(),
            fail: false,
        }
    }

    /// Create a handler that records `label` and then fails with an error
    /// whose message is `"<label> failed"`.
    pub fn failing(label: &'static str, log: &CallLog) -> Self {
        Self {
            fail: true,
            ..Self::new(label, log)
        }
    }
}

impl<N: Notification> NotificationHandler<N> for RecordingNotificationHandler {
    async fn handle(&self, _notification: &N, _token: &CancellationToken) -> Result<(), Error> {
        self.log.push(self.label);
        if self.fail {
            Err(Error::from(format!("{} failed", self.label)))
        } else {
            Ok(())
        }
    }
}

// ============================================================================
// Counting Handler
// ============================================================================

/// A request handler that counts invocations and returns a fixed response.
///
/// Clones share the same counter.
pub struct CountingHandler<T> {
    count: Arc<AtomicUsize>,
    response: T,
}

impl<T: Clone> CountingHandler<T> {
    /// Create a counting handler answering with `response`.
    pub fn new(response: T) -> Self {
        Self {
            count: Arc::new(AtomicUsize::new(0)),
            response,
        }
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl<T: Clone> Clone for CountingHandler<T> {
    fn clone(&self) -> Self {
        Self {
            count: self.count.clone(),
            response: self.response.clone(),
        }
    }
}

impl<R> RequestHandler<R> for CountingHandler<R::Response>
where
    R: Request,
    R::Response: Clone + Sync,
{
    async fn handle(&self, _request: &R, _token: &CancellationToken) -> Result<R::Response, Error> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

// ============================================================================
// Failing Handler
// ============================================================================

/// A request handler that always fails with the same message.
pub struct FailingHandler<R> {
    message: &'static str,
    _request: PhantomData<fn(R)>,
}

impl<R> FailingHandler<R> {
    /// Create a handler failing with `message`.
    pub fn new(message: &'static str) -> Self {
        Self {
            message,
            _request: PhantomData,
        }
    }
}

impl<R: Request> RequestHandler<R> for FailingHandler<R> {
    async fn handle(&self, _request: &R, _token: &CancellationToken) -> Result<R::Response, Error> {
        Err(Error::from(self.message))
    }
}
