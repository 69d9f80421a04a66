//! Wrapper cache for per-shape dispatch entries.
//!
//! The mediator builds one dispatch wrapper per concrete request type and
//! keeps it for the lifetime of the cache. Entries are never evicted: the
//! number of request shapes is bounded by the registered handlers, not by
//! request volume.

use parking_lot::RwLock;
use std::{
    any::{Any, TypeId, type_name},
    collections::HashMap,
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

/// Identity of a cached entry: the entry's concrete type.
#[derive(Clone, Copy)]
pub struct ShapeKey {
    id: TypeId,
    name: &'static str,
}

impl ShapeKey {
    /// The key for values of type `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// The type name, for diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ShapeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ShapeKey {}

impl Hash for ShapeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ShapeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ShapeKey").field(&self.name).finish()
    }
}

/// A concurrency-safe, append-only map from shape to shared entry.
///
/// Each entry type is its own key (`RequestWrapper<R>` for request shape
/// `R`), so a lookup can never return a value of the wrong type.
#[derive(Default)]
pub struct WrapperCache {
    entries: RwLock<HashMap<ShapeKey, Arc<dyn Any + Send + Sync>>>,
}

impl WrapperCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the entry of type `W`, building it with `factory` on first use.
    ///
    /// The factory runs at most once per entry type, even when several
    /// callers race on the first use; the losers wait for the write lock and
    /// then see the finished entry. `factory` runs while the lock is held, so
    /// it must not touch this cache.
    pub fn get_or_create<W, F>(&self, factory: F) -> Arc<W>
    where
        W: Send + Sync + 'static,
        F: FnOnce() -> W,
    {
        let key = ShapeKey::of::<W>();

        if let Some(entry) = self.lookup::<W>(&self.entries.read(), &key) {
            return entry;
        }

        let mut entries = self.entries.write();
        if let Some(entry) = self.lookup::<W>(&entries, &key) {
            return entry;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(shape = key.name(), "Creating dispatch wrapper");

        let created = Arc::new(factory());
        entries.insert(key, created.clone());
        created
    }

    /// Check whether an entry of type `W` exists.
    pub fn contains<W: 'static>(&self) -> bool {
        self.entries.read().contains_key(&ShapeKey::of::<W>())
    }

    /// Get the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// List the keys of all cached entries.
    pub fn shapes(&self) -> Vec<ShapeKey> {
        self.entries.read().keys().copied().collect()
    }

    fn lookup<W>(
        &self,
        entries: &HashMap<ShapeKey, Arc<dyn Any + Send + Sync>>,
        key: &ShapeKey,
    ) -> Option<Arc<W>>
    where
        W: Send + Sync + 'static,
    {
        entries
            .get(key)
            .cloned()
            .and_then(|entry| entry.downcast::<W>().ok())
    }
}

impl fmt::Debug for WrapperCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrapperCache")
            .field("shapes", &self.shapes())
            .finish()
    }
}
