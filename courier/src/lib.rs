//! # courier - In-process mediator
//!
//! `courier` decouples the code that issues a request or announces an event
//! from the code that handles it.
//!
//! - **Requests** go to exactly one [`RequestHandler`], wrapped by the
//!   [`PipelineBehavior`]s registered for the request type, first registered
//!   outermost.
//! - **Notifications** are broadcast to every [`NotificationHandler`]
//!   registered for the type, one after another, stopping at the first failure.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use courier::prelude::*;
//!
//! #[derive(Debug, courier::Request)]
//! #[request(response = u64)]
//! struct CreateOrder {
//!     items: Vec<String>,
//! }
//!
//! struct CreateOrderHandler;
//!
//! impl RequestHandler<CreateOrder> for CreateOrderHandler {
//!     async fn handle(&self, request: &CreateOrder, _: &CancellationToken) -> Result<u64, Error> {
//!         Ok(request.items.len() as u64)
//!     }
//! }
//!
//! let mediator = Mediator::new(
//!     Registry::builder()
//!         .register_behavior::<CreateOrder, _>(LoggingBehavior::named("orders"))
//!         .register_handler::<CreateOrder, _>(CreateOrderHandler)
//!         .build(),
//! );
//!
//! let id = mediator.send(CreateOrder { items }, &CancellationToken::new()).await?;
//! ```
//!
//! ## Discovery
//!
//! With the `macros` feature, `#[courier::register]` on a handler or behavior
//! impl submits it for [`RegistryBuilder::scan_collected`], so a registry can
//! be assembled from everything linked into the binary.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use courier_core::{
    // Cancellation
    CancellationToken,
    // Capabilities
    Capability,
    CapabilityKind,
    // Dispatch
    BoxFuture,
    Dispatcher,
    // Behaviors
    DynPipelineBehavior,
    Next,
    PipelineBehavior,
    // Handlers
    DynNotificationHandler,
    DynRequestHandler,
    NotificationHandler,
    RequestHandler,
    // Errors
    BoxError,
    Error,
    // Messages
    Notification,
    Request,
    ensure_active,
};

pub use courier_std::{
    Component, DynRequest, Lifetime, Mediator, MediatorBuilder, Registry, RegistryBuilder,
    RegistrationInfo, SequentialDelivery, WrapperCache,
};

#[cfg(feature = "inventory")]
pub use courier_std::Registration;

/// Request dispatch internals: pipeline composition and the wrapper cache.
pub mod dispatch {
    pub use courier_std::{
        cache::{ShapeKey, WrapperCache},
        pipeline::compose,
        wrapper::RequestWrapper,
    };
}

/// Standard behavior implementations.
pub mod behaviors {
    #![allow(clippy::wildcard_imports)]
    pub use courier_std::behaviors::*;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use courier_std::testing::*;
}

#[cfg(feature = "tower")]
pub mod tower;

/// Prelude module - common imports for Courier.
///
/// # Usage
///
/// ```rust,ignore
/// use courier::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Cancellation
        CancellationToken,
        // Errors
        Error,
        // Mediator
        Mediator,
        // Capability traits
        Next,
        Notification,
        NotificationHandler,
        PipelineBehavior,
        // Registration
        Registry,
        RegistryBuilder,
        Request,
        RequestHandler,
        behaviors::LoggingBehavior,
    };
}

#[cfg(feature = "macros")]
pub use courier_macros::{Notification, Request, register};

#[cfg(feature = "inventory")]
pub use inventory;
