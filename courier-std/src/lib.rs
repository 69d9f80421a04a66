//! # courier-std
//!
//! Standard implementations for the Courier in-process mediator.
//!
//! This crate provides:
//! - **Registry**: [`RegistryBuilder`] and the frozen [`Registry`] of capability bindings
//! - **Dispatch**: [`Mediator`], the per-request-type [`RequestWrapper`] and its [`WrapperCache`]
//! - **Pipelines**: the [`compose`](pipeline::compose) function that chains behaviors around a handler
//! - **Standard behaviors**: Logging, Tracing, Cancellation, Timeout
//! - **Notification delivery**: [`SequentialDelivery`]
//! - **Testing helpers**: see [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use courier_core;

// Modules
pub mod behaviors;
pub mod cache;
pub mod delivery;
pub mod mediator;
pub mod pipeline;
pub mod registry;
pub mod testing;
pub mod wrapper;

pub use cache::{ShapeKey, WrapperCache};
pub use delivery::SequentialDelivery;
pub use mediator::{DynRequest, Mediator, MediatorBuilder};
#[cfg(feature = "inventory")]
pub use registry::Registration;
pub use registry::{Component, Lifetime, Registry, RegistryBuilder, RegistrationInfo};
pub use wrapper::RequestWrapper;

#[cfg(feature = "inventory")]
pub use inventory;
