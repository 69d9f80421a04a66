//! # courier-core
//!
//! Core traits for the Courier in-process mediator.
//!
//! This crate has minimal dependencies and is meant to be imported by crates
//! that only declare requests, notifications and their handlers, without
//! pulling in the registry or the mediator itself from `courier-std`.
//!
//! # Capabilities
//!
//! Everything the mediator can resolve is described by a [`Capability`]:
//!
//! ## Request handling ([`RequestHandler`])
//!
//! The single terminal implementation for a [`Request`] type. Exactly one
//! handler must be registered per request type; zero or several is a
//! resolution error.
//!
//! ## Behaviors ([`PipelineBehavior`])
//!
//! Middleware around a request's handler. Behaviors receive a [`Next`]
//! continuation and may run it zero, one or many times. They are bound in
//! registration order, first registered outermost.
//!
//! ## Notifications ([`NotificationHandler`])
//!
//! Broadcast messages with zero or more independent handlers.
//!
//! # Self-dispatch
//!
//! A request sends itself through [`Request::send_to`], which calls the
//! strongly typed [`Dispatcher::dispatch`] entry point with the concrete
//! request type. No type-erased invocation happens on the dispatch path.
//!
//! # Static vs Dynamic Dispatch
//!
//! Every capability trait uses native `async fn` and has an object-safe
//! `Dyn*` twin ([`DynRequestHandler`], [`DynPipelineBehavior`],
//! [`DynNotificationHandler`]) with a blanket implementation, so registries
//! can store trait objects while implementors only ever write the static form.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod behavior;
mod cancellation;
mod capability;
mod dispatcher;
mod error;
mod handler;
mod message;

// Re-exports
pub use behavior::{DynPipelineBehavior, Next, PipelineBehavior};
pub use cancellation::{CancellationToken, ensure_active};
pub use capability::{Capability, CapabilityKind};
pub use dispatcher::{BoxFuture, Dispatcher};
pub use error::{BoxError, Error};
pub use handler::{DynNotificationHandler, DynRequestHandler, NotificationHandler, RequestHandler};
pub use message::{Notification, Request};
