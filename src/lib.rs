//! chained-hashmap: a single-threaded hash map that resolves collisions by
//! chaining and takes its hash and equality functions from the caller.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a table with no built-in notion of its key type. Each instance
//!   is given a hashing strategy and an equality strategy at construction,
//!   so one process can hold tables over arbitrary key types side by side.
//! - Layers:
//!   - ChainTable<K, V>: structural layer. A bucket array of chain heads
//!     over a slotmap entry arena; every operation takes a precomputed
//!     `u64` hash and an equality closure. Owns growth (relinking) and
//!     teardown. Guards its entry points with a debug-only reentrancy
//!     check.
//!   - ChainedHashMap<K, V, H, E>: public API. Runs the caller's strategies,
//!     decides when to grow from the configured maximum load factor, and
//!     exposes initialize/finish/contains/get/put/remove/keys/values.
//!
//! Constraints
//! - Single-threaded: `!Send`/`!Sync` by design (no locking).
//! - The bucket array starts at `INITIAL_CAPACITY` and only ever doubles;
//!   removal never shrinks it.
//! - At most one entry per key, where "same key" is whatever the equality
//!   strategy says. Duplicate detection only scans the target bucket.
//! - Growth is all-or-nothing: the new bucket array is allocated before any
//!   entry moves, so a failed allocation leaves the table as it was.
//!
//! Ownership
//! - The table exclusively owns its bucket array and entries. Keys and
//!   values are stored as given. Caller-owned payloads are expressed by
//!   making `K`/`V` references; the table never frees what they point to,
//!   and the borrow checker keeps them alive at least as long as the table.
//!
//! Hash and rehash invariants
//! - Each entry stores the hash computed when it was inserted. Growth and
//!   lookups index with the stored hash, so the hash strategy runs exactly
//!   once per public call and never while chains are being relinked.
//! - `bucket = hash % capacity`; hashes are unsigned, so the index is
//!   always within `[0, capacity)`.
//!
//! Reentrancy
//! - Equality strategies run while `ChainTable` walks a chain. Calling back
//!   into the same table from inside one panics in debug builds; release
//!   builds do not check.
//!
//! Ordering
//! - `keys()`, `values()` and `iter()` visit buckets in index order and each
//!   chain front to back. New entries are prepended to their chain. Both
//!   `keys()` and `values()` use the same traversal, so index `i` of one
//!   pairs with index `i` of the other.

#[cfg(feature = "bench_internal")]
pub mod chain_table;
#[cfg(not(feature = "bench_internal"))]
mod chain_table;
mod chain_table_proptest;
mod error;
mod hash_map;
pub mod key_ops;
mod reentrancy;

// Public surface
pub use error::TableError;
pub use hash_map::{ChainedHashMap, Iter, INITIAL_CAPACITY};
pub use key_ops::{BuildHasherKeys, KeyEquals, KeyHasher, PartialEqKeys};
