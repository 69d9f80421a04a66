//! Procedural macros for Courier.
//!
//! - `#[derive(Request)]` with an optional `#[request(response = T)]`
//! - `#[derive(Notification)]`
//! - `#[register]` on handler, behavior and notification handler impls
//!
//! Generated code refers to the `courier` facade crate by absolute path.

use proc_macro::TokenStream;

mod message;
mod register;

/// Derive macro for implementing `Request`.
///
/// The response type defaults to `()` and is set with
/// `#[request(response = Type)]`.
///
/// ```rust,ignore
/// #[derive(courier::Request)]
/// #[request(response = OrderId)]
/// struct CreateOrder {
///     items: Vec<Item>,
/// }
/// ```
#[proc_macro_derive(Request, attributes(request))]
pub fn derive_request(input: TokenStream) -> TokenStream {
    message::derive_request_impl(input)
}

/// Derive macro for implementing `Notification`.
#[proc_macro_derive(Notification)]
pub fn derive_notification(input: TokenStream) -> TokenStream {
    message::derive_notification_impl(input)
}

/// Submit an impl block for discovery by `RegistryBuilder::scan_collected`.
///
/// Accepts impls of `RequestHandler<R>`, `PipelineBehavior<R>` and
/// `NotificationHandler<N>` for a non-generic type implementing `Default`.
/// The type is registered as transient: each resolution builds a fresh
/// instance through `Default::default`.
///
/// `#[register(order = N)]` sets the ordering key; lower values register
/// first, which makes behaviors with lower keys run outside higher ones.
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct Validation;
///
/// #[courier::register(order = 10)]
/// impl PipelineBehavior<CreateOrder> for Validation {
///     async fn handle(/* ... */) -> Result<OrderId, Error> { /* ... */ }
/// }
/// ```
#[proc_macro_attribute]
pub fn register(attr: TokenStream, item: TokenStream) -> TokenStream {
    register::register_impl(attr, item)
}
