//! Bulk registration candidates.

use super::RegistryBuilder;

/// A registration candidate that knows which capabilities it provides.
///
/// [`RegistryBuilder::scan`] visits each candidate once and lets it bind
/// itself under every capability it implements. A single type may be a
/// behavior for one request and the handler of another.
///
/// # Example
///
/// ```rust,ignore
/// struct Orders;
///
/// impl Component for Orders {
///     fn register(&self, builder: &mut RegistryBuilder) {
///         builder.register_handler_mut::<CreateOrder, _>(CreateOrderHandler);
///         builder.register_notification_handler_mut::<OrderPlaced, _>(SendReceipt);
///     }
/// }
///
/// let registry = RegistryBuilder::new().scan([Orders]).build();
/// ```
///
/// Plain registration functions are components too, which makes mixed
/// candidate lists easy to write:
///
/// ```rust,ignore
/// let registry = RegistryBuilder::new()
///     .scan([orders::register as fn(&mut RegistryBuilder), billing::register])
///     .build();
/// ```
pub trait Component {
    /// Bind this candidate into `builder`.
    fn register(&self, builder: &mut RegistryBuilder);
}

impl<F> Component for F
where
    F: Fn(&mut RegistryBuilder),
{
    fn register(&self, builder: &mut RegistryBuilder) {
        self(builder)
    }
}
