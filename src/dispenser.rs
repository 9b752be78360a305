//! Memoizing key/value factories.
//!
//! A [`Dispenser`] hands out the value stored for a key, running a factory to produce
//! it the first time the key is seen. The factory runs without any lock held, so two
//! threads racing on the same unseen key may both compute a value. Only the first one
//! to be inserted is kept, and every racer returns that stored value, so the table
//! converges to a single entry per key. Failed factory runs are never stored.
use dashmap::DashMap;
use std::{
    borrow::Borrow,
    convert::Infallible,
    fmt::{Debug, Formatter},
    hash::Hash,
    sync::atomic::{AtomicU64, Ordering},
};
use tracing::trace;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispenserStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl std::ops::Add for DispenserStats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            entries: self.entries + rhs.entries,
            hits: self.hits + rhs.hits,
            misses: self.misses + rhs.misses,
        }
    }
}

pub struct Dispenser<K: Eq + Hash, V> {
    entries: DashMap<K, V>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K: Eq + Hash, V: Clone> Dispenser<K, V> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns the value stored for `key`, running `factory` to produce and store it
    /// if there is none yet. An `Err` from the factory is returned as-is and leaves
    /// the table untouched.
    pub fn get_or_try_add<Q, E>(
        &self,
        key: &Q,
        factory: impl FnOnce(&Q) -> Result<V, E>,
    ) -> Result<V, E>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        if let Some(existing) = self.get(key) {
            return Ok(existing);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        trace!("dispenser miss, populating entry");

        // the map guard must not be held here: the factory may be slow or re-enter
        let value = factory(key)?;

        let stored = self.entries.entry(key.to_owned()).or_insert(value);
        Ok(stored.value().clone())
    }

    pub fn get_or_add<Q>(&self, key: &Q, factory: impl FnOnce(&Q) -> V) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        match self.get_or_try_add(key, |k| Ok::<_, Infallible>(factory(k))) {
            Ok(v) => v,
            Err(never) => match never {},
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let found = self.entries.get(key).map(|e| e.value().clone());
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.remove(key).map(|(_, v)| v)
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> DispenserStats {
        DispenserStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl<K: Eq + Hash, V: Clone> Default for Dispenser<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V: Clone> Debug for Dispenser<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispenser")
            .field("stats", &self.stats())
            .finish()
    }
}
