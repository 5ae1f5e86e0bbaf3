use crate::key::{CacheKey, ObjectKey, Primitive};
use cached::{Cached, UnboundCache};
use std::fmt;

/// Unbounded store for memoized results.
///
/// Primitive keys live in a value-keyed store and object keys in an
/// identity-keyed one; the key's category picks the store on every access.
pub(crate) struct KeyedCache<V> {
    values: UnboundCache<Primitive, V>,
    objects: UnboundCache<ObjectKey, V>,
}

/// Counters describing how a memoized function's cache has been used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl<V> KeyedCache<V> {
    pub fn new() -> Self {
        KeyedCache {
            values: UnboundCache::new(),
            objects: UnboundCache::new(),
        }
    }

    /// Has-entry lookup: a stored value is returned whatever it is.
    pub fn get(&mut self, key: &CacheKey) -> Option<&V> {
        match key {
            CacheKey::Primitive(p) => self.values.cache_get(p),
            CacheKey::Object(o) => self.objects.cache_get(o),
        }
    }

    pub fn insert(&mut self, key: CacheKey, value: V) {
        match key {
            CacheKey::Primitive(p) => {
                self.values.cache_set(p, value);
            }
            CacheKey::Object(o) => {
                self.objects.cache_set(o, value);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.values.cache_size() + self.objects.cache_size()
    }

    pub fn stats(&self) -> CacheStats {
        let count = |hits: Option<u64>| hits.unwrap_or(0);
        CacheStats {
            hits: count(self.values.cache_hits()) + count(self.objects.cache_hits()),
            misses: count(self.values.cache_misses()) + count(self.objects.cache_misses()),
            entries: self.len(),
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} entries, {} hits, {} misses",
            self.entries, self.hits, self.misses
        )
    }
}
