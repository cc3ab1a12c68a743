//! ChainTable: structural layer. A bucket array of chain heads over an entry
//! arena, addressed by precomputed hashes.
//!
//! Entries live in a `SlotMap`; each bucket holds the key of the first entry
//! of its chain and every entry holds the key of the next one. The table
//! never hashes keys itself: callers pass the `u64` hash and an equality
//! closure, and the hash is stored alongside the entry so that growth can
//! relink chains without running caller code.

use crate::error::TableError;
use crate::reentrancy::DebugReentrancy;
use slotmap::{DefaultKey, SlotMap};

/// Stable reference to one live entry. Becomes stale once the entry is
/// removed; a stale handle never resolves to a later entry.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle(DefaultKey);

impl Handle {
    #[cfg(test)]
    pub fn key<'a, K, V>(&self, table: &'a ChainTable<K, V>) -> Option<&'a K> {
        table.handle_key(*self)
    }

    pub fn value<'a, K, V>(&self, table: &'a ChainTable<K, V>) -> Option<&'a V> {
        table.handle_value(*self)
    }

    pub fn value_mut<'a, K, V>(&self, table: &'a mut ChainTable<K, V>) -> Option<&'a mut V> {
        table.handle_value_mut(*self)
    }
}

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    hash: u64,
    next: Option<DefaultKey>,
}

/// Slot `i` of the bucket array for `hash` under `capacity` buckets.
///
/// Hashes are unsigned, so a single remainder already lands in
/// `[0, capacity)`.
#[inline]
pub(crate) fn bucket_index(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    (hash % capacity as u64) as usize
}

/// Allocate `capacity` empty chain heads, reporting allocation failure
/// instead of aborting.
fn empty_buckets(capacity: usize) -> Result<Vec<Option<DefaultKey>>, TableError> {
    let mut buckets = Vec::new();
    buckets
        .try_reserve_exact(capacity)
        .map_err(|source| TableError::AllocationFailure { capacity, source })?;
    buckets.resize(capacity, None);
    Ok(buckets)
}

pub struct ChainTable<K, V> {
    buckets: Vec<Option<DefaultKey>>,
    slots: SlotMap<DefaultKey, Entry<K, V>>, // entry arena; chains link through it
    reentrancy: DebugReentrancy,
}

/// Walks one chain front to back.
struct Chain<'a, K, V> {
    slots: &'a SlotMap<DefaultKey, Entry<K, V>>,
    cur: Option<DefaultKey>,
}

impl<'a, K, V> Iterator for Chain<'a, K, V> {
    type Item = (DefaultKey, &'a Entry<K, V>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cur?;
        let entry = self.slots.get(k)?;
        self.cur = entry.next;
        Some((k, entry))
    }
}

/// Iterator over live entries in bucket-index order, then chain order.
pub struct Iter<'a, K, V> {
    buckets: core::slice::Iter<'a, Option<DefaultKey>>,
    chain: Chain<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (Handle, &'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((k, e)) = self.chain.next() {
                self.remaining = self.remaining.saturating_sub(1);
                return Some((Handle(k), &e.key, &e.value));
            }
            self.chain.cur = *self.buckets.next()?;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> ChainTable<K, V> {
    /// Create a table with `capacity` empty buckets.
    pub fn with_buckets(capacity: usize) -> Result<Self, TableError> {
        debug_assert!(capacity > 0, "a chain table needs at least one bucket");
        Ok(Self {
            buckets: empty_buckets(capacity)?,
            slots: SlotMap::with_key(),
            reentrancy: DebugReentrancy::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
    /// Number of buckets (chain heads).
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    fn chain(&self, index: usize) -> Chain<'_, K, V> {
        Chain {
            slots: &self.slots,
            cur: self.buckets.get(index).copied().flatten(),
        }
    }

    /// First entry in `hash`'s chain whose key satisfies `eq`.
    pub fn find<F>(&self, hash: u64, mut eq: F) -> Option<Handle>
    where
        F: FnMut(&K) -> bool,
    {
        let _g = self.reentrancy.enter("find");
        let index = bucket_index(hash, self.capacity());
        self.chain(index)
            .find(|(_, e)| e.hash == hash && eq(&e.key))
            .map(|(k, _)| Handle(k))
    }

    /// Make room in the entry arena for one more entry, so the next
    /// `insert_front` does not allocate. On error nothing changes.
    pub fn reserve_entry(&mut self) -> Result<(), TableError> {
        let _g = self.reentrancy.enter("reserve_entry");
        let len = self.slots.len();
        self.slots
            .try_reserve(1)
            .map_err(|source| TableError::EntryAllocationFailure { len, source })
    }

    /// Link a new entry at the front of `hash`'s chain. The caller is
    /// responsible for having checked that no equal key is present.
    pub fn insert_front(&mut self, hash: u64, key: K, value: V) -> Handle {
        let _g = self.reentrancy.enter("insert_front");
        let index = bucket_index(hash, self.buckets.len());
        let next = self.buckets[index];
        let k = self.slots.insert(Entry {
            key,
            value,
            hash,
            next,
        });
        self.buckets[index] = Some(k);
        Handle(k)
    }

    /// Unlink and return the first entry in `hash`'s chain whose key
    /// satisfies `eq`.
    pub fn remove<F>(&mut self, hash: u64, mut eq: F) -> Option<(K, V)>
    where
        F: FnMut(&K) -> bool,
    {
        let _g = self.reentrancy.enter("remove");
        let index = bucket_index(hash, self.buckets.len());

        // Locate the match and the entry linking to it (None: bucket head).
        let mut parent: Option<DefaultKey> = None;
        let mut found: Option<(DefaultKey, Option<DefaultKey>)> = None;
        let mut cur = self.buckets[index];
        while let Some(k) = cur {
            let entry = self.slots.get(k)?;
            if entry.hash == hash && eq(&entry.key) {
                found = Some((k, entry.next));
                break;
            }
            parent = Some(k);
            cur = entry.next;
        }
        let (k, next) = found?;

        // Caller code is done; the structure is consistent again after the
        // relink below, before K/V leave the table.
        match parent {
            None => self.buckets[index] = next,
            Some(p) => {
                if let Some(pe) = self.slots.get_mut(p) {
                    pe.next = next;
                }
            }
        }
        self.slots.remove(k).map(|e| (e.key, e.value))
    }

    /// Replace the bucket array with one of `new_capacity` buckets and
    /// relink every entry under it.
    ///
    /// Old buckets are visited in index order and each chain front to back;
    /// every entry is prepended to its new chain. The new array is allocated
    /// before anything is relinked, so on error the table is untouched.
    pub fn grow(&mut self, new_capacity: usize) -> Result<(), TableError> {
        let _g = self.reentrancy.enter("grow");
        let mut new_buckets = empty_buckets(new_capacity)?;

        for head in self.buckets.iter() {
            let mut cur = *head;
            while let Some(k) = cur {
                let Some(entry) = self.slots.get_mut(k) else {
                    break;
                };
                cur = entry.next;
                let index = bucket_index(entry.hash, new_capacity);
                entry.next = new_buckets[index];
                new_buckets[index] = Some(k);
            }
        }

        self.buckets = new_buckets;
        Ok(())
    }

    /// Drop every entry and the bucket array, consuming the table. Returns
    /// how many entries were released.
    pub fn release(self) -> usize {
        let ChainTable { buckets, slots, .. } = self;
        let released = slots.len();
        drop(slots);
        drop(buckets);
        released
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut buckets = self.buckets.iter();
        let first = buckets.next().copied().flatten();
        Iter {
            buckets,
            chain: Chain {
                slots: &self.slots,
                cur: first,
            },
            remaining: self.slots.len(),
        }
    }

    #[cfg(test)]
    pub(crate) fn handle_key(&self, h: Handle) -> Option<&K> {
        let _g = self.reentrancy.enter("handle_key");
        self.slots.get(h.0).map(|e| &e.key)
    }

    pub(crate) fn handle_value(&self, h: Handle) -> Option<&V> {
        let _g = self.reentrancy.enter("handle_value");
        self.slots.get(h.0).map(|e| &e.value)
    }

    pub(crate) fn handle_value_mut(&mut self, h: Handle) -> Option<&mut V> {
        let _g = self.reentrancy.enter("handle_value_mut");
        self.slots.get_mut(h.0).map(|e| &mut e.value)
    }

    /// Panics unless the structural invariants hold: every linked entry sits
    /// in its hash's bucket, is reachable exactly once, and the number of
    /// reachable entries equals `len()`.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let capacity = self.capacity();
        let mut seen = std::collections::HashSet::new();
        for index in 0..capacity {
            for (k, e) in self.chain(index) {
                assert_eq!(
                    bucket_index(e.hash, capacity),
                    index,
                    "entry linked into the wrong bucket"
                );
                assert!(seen.insert(k), "entry reachable twice");
            }
        }
        assert_eq!(seen.len(), self.slots.len(), "unreachable entries in arena");
    }
}

impl<K: core::fmt::Debug, V: core::fmt::Debug> core::fmt::Debug for ChainTable<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(_, k, v)| (k, v)))
            .finish()
    }
}
