//! Read-only views over sequence and mapping snapshots.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::hash::BuildHasher;

use indexmap::IndexMap;
use serde::Serialize;

/// An ordered sequence of elements (list, stack, queue).
///
/// Element 0 is the list head, the queue front and the stack bottom.
pub trait Sequence {
    /// Element type.
    type Item: Serialize + fmt::Display;

    /// Elements in order.
    fn items(&self) -> Vec<&Self::Item>;
}

impl<T: Serialize + fmt::Display> Sequence for Vec<T> {
    type Item = T;

    fn items(&self) -> Vec<&T> {
        self.iter().collect()
    }
}

impl<T: Serialize + fmt::Display> Sequence for VecDeque<T> {
    type Item = T;

    fn items(&self) -> Vec<&T> {
        self.iter().collect()
    }
}

/// A key/value mapping.
pub trait Mapping {
    /// Key type.
    type Key: Serialize + fmt::Display;
    /// Value type.
    type Value: Serialize + fmt::Display;

    /// Entries in the mapping's iteration order.
    fn entries(&self) -> Vec<(&Self::Key, &Self::Value)>;
}

impl<K, V> Mapping for IndexMap<K, V>
where
    K: Serialize + fmt::Display,
    V: Serialize + fmt::Display,
{
    type Key = K;
    type Value = V;

    fn entries(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }
}

impl<K, V> Mapping for BTreeMap<K, V>
where
    K: Serialize + fmt::Display,
    V: Serialize + fmt::Display,
{
    type Key = K;
    type Value = V;

    fn entries(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }
}

/// Iteration order follows the hasher and is not stable across runs.
impl<K, V, S> Mapping for HashMap<K, V, S>
where
    K: Serialize + fmt::Display,
    V: Serialize + fmt::Display,
    S: BuildHasher,
{
    type Key = K;
    type Value = V;

    fn entries(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }
}
