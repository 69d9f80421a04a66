use super::{Component, RegistryBuilder};

/// A registration function submitted to a distributed collection.
///
/// `#[courier::register]` emits one of these per annotated impl block, so
/// [`RegistryBuilder::scan_collected`] can discover every handler, behavior
/// and notification handler linked into the binary without listing them.
pub struct Registration {
    /// Name for debugging, usually the implementing type's path.
    pub name: &'static str,
    /// Ordering key; lower values register first.
    pub order: i32,
    /// Binds the implementation into a builder.
    pub register: fn(&mut RegistryBuilder),
}

impl Registration {
    /// Create a new registration entry.
    pub const fn new(name: &'static str, order: i32, register: fn(&mut RegistryBuilder)) -> Self {
        Self {
            name,
            order,
            register,
        }
    }
}

impl Component for Registration {
    fn register(&self, builder: &mut RegistryBuilder) {
        (self.register)(builder)
    }
}

inventory::collect!(Registration);

impl RegistryBuilder {
    /// Register every [`Registration`] submitted through `inventory`.
    ///
    /// Link order is unspecified, so entries are sorted by `order` and then
    /// by `name` to keep behavior order stable between builds.
    pub fn scan_collected(mut self) -> Self {
        let mut entries: Vec<&Registration> = inventory::iter::<Registration>.into_iter().collect();
        entries.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(b.name)));

        for entry in entries {
            #[cfg(feature = "tracing")]
            tracing::debug!(name = entry.name, order = entry.order, "Registering collected component");

            entry.register(&mut self);
        }
        self
    }
}
