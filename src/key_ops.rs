//! Hashing and equality strategies supplied per table.
//!
//! A `ChainedHashMap` has no built-in notion of its key type: it asks a
//! `KeyHasher` for a hash and a `KeyEquals` for equality. Plain functions
//! and closures implement both traits, so
//!
//! ```
//! use chained_hashmap::ChainedHashMap;
//!
//! fn len_hash(key: &&str) -> u64 {
//!     key.len() as u64
//! }
//! fn ignore_case(a: &&str, b: &&str) -> bool {
//!     a.eq_ignore_ascii_case(b)
//! }
//!
//! let mut m = ChainedHashMap::initialize(0.75, len_hash, ignore_case).unwrap();
//! m.put("Key", 1).unwrap();
//! assert_eq!(m.get(&"KEY"), Some(&1));
//! ```
//!
//! Keys that already implement `Hash + Eq` can use `BuildHasherKeys` and
//! `PartialEqKeys`, which are the defaults behind `ChainedHashMap::new`.
//!
//! The two strategies must agree: keys that are equal must hash equally.

use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

/// Maps a key to an unsigned hash.
pub trait KeyHasher<K: ?Sized> {
    fn hash(&self, key: &K) -> u64;
}

/// Decides whether two keys name the same mapping.
pub trait KeyEquals<K: ?Sized> {
    fn equals(&self, left: &K, right: &K) -> bool;
}

impl<K: ?Sized, F> KeyHasher<K> for F
where
    F: Fn(&K) -> u64,
{
    #[inline]
    fn hash(&self, key: &K) -> u64 {
        self(key)
    }
}

impl<K: ?Sized, F> KeyEquals<K> for F
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn equals(&self, left: &K, right: &K) -> bool {
        self(left, right)
    }
}

/// Hashes keys through any `BuildHasher`.
#[derive(Clone, Debug, Default)]
pub struct BuildHasherKeys<S = DefaultHashBuilder> {
    build_hasher: S,
}

impl<S> BuildHasherKeys<S> {
    pub fn new(build_hasher: S) -> Self {
        Self { build_hasher }
    }

    pub fn build_hasher(&self) -> &S {
        &self.build_hasher
    }
}

impl<K, S> KeyHasher<K> for BuildHasherKeys<S>
where
    K: ?Sized + Hash,
    S: BuildHasher,
{
    #[inline]
    fn hash(&self, key: &K) -> u64 {
        self.build_hasher.hash_one(key)
    }
}

/// Compares keys with their own `PartialEq`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PartialEqKeys;

impl<K> KeyEquals<K> for PartialEqKeys
where
    K: ?Sized + PartialEq,
{
    #[inline]
    fn equals(&self, left: &K, right: &K) -> bool {
        left == right
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::hash::Hasher;

    #[test]
    fn functions_act_as_strategies() {
        fn h(k: &u32) -> u64 {
            u64::from(*k) * 3
        }
        fn eq(a: &u32, b: &u32) -> bool {
            a % 10 == b % 10
        }
        assert_eq!(KeyHasher::hash(&h, &7), 21);
        assert!(KeyEquals::equals(&eq, &3, &13));
        assert!(!KeyEquals::equals(&eq, &3, &4));
    }

    #[test]
    fn closures_act_as_strategies() {
        let salt = 5u64;
        let h = move |k: &u64| k ^ salt;
        assert_eq!(KeyHasher::hash(&h, &1), 4);
    }

    #[test]
    fn build_hasher_keys_is_deterministic_per_instance() {
        let keys = BuildHasherKeys::<DefaultHashBuilder>::default();
        let a = KeyHasher::<str>::hash(&keys, "alpha");
        let b = KeyHasher::<str>::hash(&keys, "alpha");
        assert_eq!(a, b);
    }

    #[test]
    fn build_hasher_keys_uses_supplied_builder() {
        #[derive(Clone, Default)]
        struct ConstBuildHasher;
        struct ConstHasher;
        impl BuildHasher for ConstBuildHasher {
            type Hasher = ConstHasher;
            fn build_hasher(&self) -> Self::Hasher {
                ConstHasher
            }
        }
        impl Hasher for ConstHasher {
            fn write(&mut self, _bytes: &[u8]) {}
            fn finish(&self) -> u64 {
                42
            }
        }
        let keys = BuildHasherKeys::new(ConstBuildHasher);
        assert_eq!(KeyHasher::<String>::hash(&keys, &"x".to_string()), 42);
    }

    #[test]
    fn partial_eq_keys_compares_values() {
        assert!(KeyEquals::<String>::equals(
            &PartialEqKeys,
            &"a".to_string(),
            &"a".to_string()
        ));
        assert!(!KeyEquals::<i32>::equals(&PartialEqKeys, &1, &2));
    }
}
