//! ChainedHashMap: public map over `ChainTable` with caller-supplied hashing
//! and equality, load-factor driven doubling, and explicit teardown.

use crate::chain_table::{ChainTable, Iter as TableIter};
use crate::error::TableError;
use crate::key_ops::{BuildHasherKeys, KeyEquals, KeyHasher, PartialEqKeys};
use core::hash::Hash;
use log::{debug, trace, warn};

/// Number of buckets every table starts with. Growth doubles it.
pub const INITIAL_CAPACITY: usize = 64;

/// A hash map resolving collisions by chaining, parameterized by a hashing
/// strategy `H` and an equality strategy `E`.
///
/// The table owns its bucket array and entries. Keys and values are stored
/// as given; to keep payloads owned by the caller, use references for `K`
/// and `V` and the borrow checker will hold the payloads alive for as long
/// as the table.
pub struct ChainedHashMap<K, V, H = BuildHasherKeys, E = PartialEqKeys> {
    table: ChainTable<K, V>,
    max_load: f64,
    hasher: H,
    equals: E,
    // Largest bucket array `grow` may request; lets tests force a failure.
    #[cfg(test)]
    bucket_limit: Option<usize>,
}

/// Twice `capacity`, or `CapacityOverflow` if that does not fit a `usize`.
fn doubled_capacity(capacity: usize) -> Result<usize, TableError> {
    capacity
        .checked_mul(2)
        .ok_or(TableError::CapacityOverflow { capacity })
}

impl<K, V> ChainedHashMap<K, V>
where
    K: Hash + Eq,
{
    /// Table over keys with their own `Hash`/`Eq`, hashed with hashbrown's
    /// default hasher.
    pub fn new(max_load: f64) -> Result<Self, TableError> {
        Self::initialize(max_load, BuildHasherKeys::default(), PartialEqKeys)
    }
}

/// Iterator over `(&K, &V)` in bucket-index order, then chain order.
pub struct Iter<'a, K, V> {
    inner: TableIter<'a, K, V>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V, H, E> ChainedHashMap<K, V, H, E>
where
    H: KeyHasher<K>,
    E: KeyEquals<K>,
{
    /// Allocate an empty table of `INITIAL_CAPACITY` buckets.
    ///
    /// `max_load` is the `size / capacity` ratio beyond which an insert
    /// doubles the bucket array; it must be positive. Pass `f64::MAX` for a
    /// table that never resizes.
    pub fn initialize(max_load: f64, hasher: H, equals: E) -> Result<Self, TableError> {
        debug_assert!(max_load > 0.0, "max_load must be positive");
        let table = ChainTable::with_buckets(INITIAL_CAPACITY).map_err(|e| {
            warn!("hash table initialization failed: {e}");
            e
        })?;
        debug!("initialized hash table: capacity={INITIAL_CAPACITY} max_load={max_load}");
        Ok(Self {
            table,
            max_load,
            hasher,
            equals,
            #[cfg(test)]
            bucket_limit: None,
        })
    }

    /// Release every entry and the bucket array. Whatever the keys and values
    /// refer to is left alone.
    pub fn finish(self) {
        let capacity = self.table.capacity();
        let released = self.table.release();
        debug!("finished hash table: released {released} entries and {capacity} buckets");
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
    /// Current number of buckets.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }
    pub fn max_load(&self) -> f64 {
        self.max_load
    }
    /// `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    pub fn contains(&self, key: &K) -> bool {
        let hash = self.hasher.hash(key);
        self.table
            .find(hash, |k| self.equals.equals(k, key))
            .is_some()
    }

    /// Value mapped by `key`, or `None` if there is no mapping.
    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = self.hasher.hash(key);
        let handle = self.table.find(hash, |k| self.equals.equals(k, key))?;
        handle.value(&self.table)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.hasher.hash(key);
        let equals = &self.equals;
        let handle = self.table.find(hash, |k| equals.equals(k, key))?;
        handle.value_mut(&mut self.table)
    }

    /// Map `key` to `value`.
    ///
    /// If an equal key is present its value is overwritten in place and the
    /// old value returned; the stored key is kept. Otherwise a new entry is
    /// linked in, doubling the bucket array first when the insert would
    /// push the load factor above `max_load`. If reserving the entry or
    /// doubling fails the error is returned and the table is unchanged.
    pub fn put(&mut self, key: K, value: V) -> Result<Option<V>, TableError> {
        let hash = self.hasher.hash(&key);
        let equals = &self.equals;
        if let Some(handle) = self.table.find(hash, |k| equals.equals(k, &key)) {
            if let Some(slot) = handle.value_mut(&mut self.table) {
                let old = core::mem::replace(slot, value);
                trace!("overwrote value in place (size={})", self.table.len());
                return Ok(Some(old));
            }
        }

        self.table.reserve_entry()?;
        if self.exceeds_max_load(self.len() + 1) {
            self.grow()?;
        }
        self.table.insert_front(hash, key, value);
        Ok(None)
    }

    /// Remove the mapping for `key`, returning the stored key and value.
    /// Capacity never shrinks.
    pub fn remove(&mut self, key: &K) -> Option<(K, V)> {
        let hash = self.hasher.hash(key);
        let equals = &self.equals;
        let removed = self.table.remove(hash, |k| equals.equals(k, key));
        if removed.is_some() {
            trace!("removed entry (size={})", self.table.len());
        }
        removed
    }

    /// Every key, in the same order as `values()`.
    pub fn keys(&self) -> Vec<&K> {
        self.iter().map(|(k, _)| k).collect()
    }

    /// Every value, in the same order as `keys()`.
    pub fn values(&self) -> Vec<&V> {
        self.iter().map(|(_, v)| v).collect()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    fn exceeds_max_load(&self, size: usize) -> bool {
        size as f64 / self.capacity() as f64 > self.max_load
    }

    fn grow(&mut self) -> Result<(), TableError> {
        let capacity = self.capacity();
        let result = doubled_capacity(capacity).and_then(|new_capacity| {
            #[cfg(test)]
            let new_capacity = match self.bucket_limit {
                Some(limit) if new_capacity > limit => usize::MAX,
                _ => new_capacity,
            };
            self.table.grow(new_capacity)
        });
        match &result {
            Ok(()) => debug!(
                "resized hash table: {capacity} -> {} buckets (size={})",
                self.capacity(),
                self.len()
            ),
            Err(e) => warn!("hash table resize failed, keeping {capacity} buckets: {e}"),
        }
        result
    }
}

impl<'a, K, V, H, E> IntoIterator for &'a ChainedHashMap<K, V, H, E>
where
    H: KeyHasher<K>,
    E: KeyEquals<K>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, H, E> core::fmt::Debug for ChainedHashMap<K, V, H, E>
where
    K: core::fmt::Debug,
    V: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChainedHashMap")
            .field("entries", &self.table)
            .field("capacity", &self.table.capacity())
            .field("max_load", &self.max_load)
            .finish()
    }
}
