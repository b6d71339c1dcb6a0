//! An insertion-ordered map over a vector of pairs, used as the backing
//! collection of [map nodes][`crate::Node::Map`].
//!
//! Entries keep the order they were first inserted in, which is also the
//! order they are written to the wire in. Equality, however, is
//! order-insensitive: two maps are equal when they hold the same entries,
//! regardless of insertion history.
//!
//! # Example
//!
//! ```
//! use bintag::{Node, VecMap};
//!
//! let mut map = VecMap::new();
//! map.insert("a".to_string(), Node::Int(5));
//! map.insert("b".to_string(), Node::from("x"));
//!
//! // replacement keeps the original slot
//! map.insert("a".to_string(), Node::Int(6));
//! let keys: Vec<&str> = map.keys().map(|k| k.as_str()).collect();
//! assert_eq!(keys, ["a", "b"]);
//! ```

use std::{
    borrow::Borrow,
    iter::FromIterator,
    slice::{Iter, IterMut},
    vec::IntoIter,
};

/// A map implemented as a [`Vec`] of pairs in insertion order.
///
/// Lookups are linear scans; map nodes in this format are small enough that
/// this beats hashing in practice, and it keeps the wire order stable.
///
/// See also: [module level documentation](`crate::vecmap`).
#[derive(Clone, Debug, Default)]
pub struct VecMap<K, V>(Vec<(K, V)>);

impl<K: Eq, V> VecMap<K, V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        VecMap(Vec::new())
    }

    /// Creates an empty map with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        VecMap(Vec::with_capacity(capacity))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Indicates whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Inserts an entry, returning the displaced value if the key was
    /// already present. Replacement keeps the key's original position.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => Some(std::mem::replace(v, value)),
            None => {
                self.0.push((key, value));
                None
            }
        }
    }

    /// Looks up a value by key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.0
            .iter()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    /// Looks up a value by key, mutably.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.0
            .iter_mut()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    /// Indicates whether the key is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Removes an entry by key, returning its value. Later entries shift
    /// down, preserving their relative order.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let at = self.0.iter().position(|(k, _)| k.borrow() == key)?;
        Some(self.0.remove(at).1)
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.0.clear()
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> Iter<(K, V)> {
        self.0.iter()
    }

    /// Iterates over entries in insertion order, with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<(K, V)> {
        self.0.iter_mut()
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.0.iter().map(|(k, _)| k)
    }

    /// Iterates over values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.0.iter().map(|(_, v)| v)
    }
}

/// Order-insensitive: maps are equal when every entry of one is an entry
/// of the other. Keys are unique, so equal lengths make the relation
/// symmetric.
impl<K: Eq, V: PartialEq> PartialEq for VecMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self.0.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: Eq, V> From<Vec<(K, V)>> for VecMap<K, V> {
    /// Builds a map from pairs in order; on duplicate keys the last
    /// value wins.
    fn from(v: Vec<(K, V)>) -> Self {
        let mut out = VecMap::with_capacity(v.len());
        for (k, val) in v {
            out.insert(k, val);
        }
        out
    }
}

impl<K: Eq, V> IntoIterator for VecMap<K, V> {
    type IntoIter = IntoIter<(K, V)>;
    type Item = (K, V);

    fn into_iter(self) -> IntoIter<(K, V)> {
        self.0.into_iter()
    }
}

impl<'a, K: Eq, V> IntoIterator for &'a VecMap<K, V> {
    type IntoIter = Iter<'a, (K, V)>;
    type Item = &'a (K, V);

    fn into_iter(self) -> Iter<'a, (K, V)> {
        self.0.iter()
    }
}

impl<K: Eq, V> FromIterator<(K, V)> for VecMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> VecMap<K, V> {
        let mut out = VecMap::new();
        for (k, v) in iter {
            out.insert(k, v);
        }
        out
    }
}

impl<K: Eq, V> Extend<(K, V)> for VecMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_order_is_kept() {
        let mut map = VecMap::new();
        map.insert("c", 3);
        map.insert("a", 1);
        map.insert("b", 2);
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, ["c", "a", "b"]);
    }

    #[test]
    fn replacement_keeps_slot() {
        let mut map = VecMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        assert_eq!(map.insert("a", 10), Some(1));
        assert_eq!(map.len(), 2);
        let entries: Vec<_> = map.iter().cloned().collect();
        assert_eq!(entries, [("a", 10), ("b", 2)]);
    }

    #[test]
    fn equality_ignores_order() {
        let left: VecMap<_, _> = vec![("a", 1), ("b", 2)].into();
        let right: VecMap<_, _> = vec![("b", 2), ("a", 1)].into();
        assert_eq!(left, right);

        let different: VecMap<_, _> = vec![("a", 1), ("b", 3)].into();
        assert_ne!(left, different);
        let shorter: VecMap<_, _> = vec![("a", 1)].into();
        assert_ne!(left, shorter);
    }

    #[test]
    fn from_vec_last_write_wins() {
        let map: VecMap<_, _> = vec![("a", 1), ("b", 2), ("a", 3)].into();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some(&3));
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn remove_shifts_down() {
        let mut map: VecMap<_, _> = vec![("a", 1), ("b", 2), ("c", 3)].into();
        assert_eq!(map.remove("b"), Some(2));
        assert_eq!(map.remove("b"), None);
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, ["a", "c"]);
    }
}
