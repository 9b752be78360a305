//! One member cache per queried type, reclaimed by generation.
use crate::{
    cache::{DeclaredMemberCache, MemberEnumerator, MemberKind},
    config::ReflectionConfig,
    dispenser::{Dispenser, DispenserStats},
    error::ReflectionError,
    types::{members::DeclaredMember, runtime::RuntimeTypeInfo},
};
use parking_lot::Mutex;
use std::{
    hash::Hash,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};
use tracing::debug;

pub type TypeMemberCache = DeclaredMemberCache<RuntimeTypeInfo>;

/// Hands out the [`DeclaredMemberCache`] for a type, building it on first request.
///
/// Once `cache_limit` caches are held, the next new type clears the registry and
/// starts a new generation. Callers still holding an `Arc` from an older generation
/// keep a working cache; it is simply no longer shared.
pub struct MemberCacheRegistry<T = RuntimeTypeInfo>
where
    T: MemberEnumerator + Clone + Eq + Hash,
{
    caches: Dispenser<T, Arc<DeclaredMemberCache<T>>>,
    cache_limit: usize,
    generation: AtomicU64,
    reclaim_lock: Mutex<()>,
}

impl<T: MemberEnumerator + Clone + Eq + Hash> MemberCacheRegistry<T> {
    pub fn new(config: &ReflectionConfig) -> Self {
        Self {
            caches: Dispenser::new(),
            cache_limit: config.cache_limit,
            generation: AtomicU64::new(0),
            reclaim_lock: Mutex::new(()),
        }
    }

    pub fn cache_for(&self, ty: &T) -> Arc<DeclaredMemberCache<T>> {
        if self.cache_limit == 0 {
            return Arc::new(DeclaredMemberCache::new(ty.clone()));
        }
        if !self.caches.contains_key(ty) && self.caches.len() >= self.cache_limit {
            self.reclaim();
        }
        self.caches
            .get_or_add(ty, |ty| Arc::new(DeclaredMemberCache::new(ty.clone())))
    }

    fn reclaim(&self) {
        let _guard = self.reclaim_lock.lock();
        let held = self.caches.len();
        // another thread may have reclaimed while we waited
        if held < self.cache_limit {
            return;
        }
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(generation, held, "reclaiming declared-member caches");
        self.caches.clear();
    }

    pub fn evict(&self, ty: &T) -> bool {
        self.caches.remove(ty).is_some()
    }

    pub fn clear(&self) {
        let _guard = self.reclaim_lock.lock();
        self.generation.fetch_add(1, Ordering::Relaxed);
        self.caches.clear();
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.caches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }

    pub fn stats(&self) -> DispenserStats {
        self.caches.stats()
    }

    pub fn get_declared_method(
        &self,
        ty: &T,
        name: &str,
    ) -> Result<Option<T::Method>, ReflectionError> {
        self.cache_for(ty).get_declared_method(name)
    }

    pub fn get_declared_field(
        &self,
        ty: &T,
        name: &str,
    ) -> Result<Option<T::Field>, ReflectionError> {
        self.cache_for(ty).get_declared_field(name)
    }

    pub fn get_declared_property(
        &self,
        ty: &T,
        name: &str,
    ) -> Result<Option<T::Property>, ReflectionError> {
        self.cache_for(ty).get_declared_property(name)
    }

    pub fn get_declared_event(
        &self,
        ty: &T,
        name: &str,
    ) -> Result<Option<T::Event>, ReflectionError> {
        self.cache_for(ty).get_declared_event(name)
    }
}

impl TypeMemberCache {
    /// Looks up a member of any kind, for callers that pick the kind at runtime.
    pub fn get_declared_member(
        &self,
        kind: MemberKind,
        name: &str,
    ) -> Result<Option<DeclaredMember>, ReflectionError> {
        Ok(match kind {
            MemberKind::Method => self.get_declared_method(name)?.map(Into::into),
            MemberKind::Field => self.get_declared_field(name)?.map(Into::into),
            MemberKind::Property => self.get_declared_property(name)?.map(Into::into),
            MemberKind::Event => self.get_declared_event(name)?.map(Into::into),
        })
    }
}

impl MemberCacheRegistry<RuntimeTypeInfo> {
    pub fn get_declared_member(
        &self,
        ty: &RuntimeTypeInfo,
        kind: MemberKind,
        name: &str,
    ) -> Result<Option<DeclaredMember>, ReflectionError> {
        self.cache_for(ty).get_declared_member(kind, name)
    }
}

impl<T: MemberEnumerator + Clone + Eq + Hash> Default for MemberCacheRegistry<T> {
    fn default() -> Self {
        Self::new(ReflectionConfig::global())
    }
}
