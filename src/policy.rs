//! Per-table behavior: hashing, equality, disposal and growth.
//!
//! Every table carries its own `Policy`; nothing here is process-wide.

use core::fmt;
use core::hash::{BuildHasher, Hash, Hasher};
use std::collections::hash_map::DefaultHasher;

use crate::entry::Stored;

/// Hash function over stored keys.
pub type HashFn<K> = Box<dyn Fn(&K) -> u64>;

/// Equality function over stored keys. Returns `true` when both keys are equal.
pub type CompareFn<K> = Box<dyn Fn(&K, &K) -> bool>;

pub(crate) const DEFAULT_LOAD_FACTOR: f32 = 0.75;

/// What happens to a key or value when it leaves the table through
/// overwrite, `remove`, `clear` or drop.
pub enum Disposal<T> {
    /// Run the value's destructor.
    Drop,
    /// Skip destruction entirely. Resources owning heap memory are leaked,
    /// which is what a table holding borrowed or externally managed data wants.
    Forget,
    /// Hand the value to a callback.
    With(Box<dyn FnMut(T)>),
}

impl<T> Disposal<T> {
    /// Convenience constructor for `Disposal::With`.
    pub fn with<F>(f: F) -> Self
    where
        F: FnMut(T) + 'static,
    {
        Disposal::With(Box::new(f))
    }

    #[inline]
    pub(crate) fn dispose(&mut self, item: T) {
        match self {
            Disposal::Drop => drop(item),
            Disposal::Forget => core::mem::forget(item),
            Disposal::With(f) => f(item),
        }
    }
}

// Written out so that `T` needs no `Default` bound.
impl<T> Default for Disposal<T> {
    fn default() -> Self {
        Disposal::Drop
    }
}

impl<T> fmt::Debug for Disposal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disposal::Drop => f.write_str("Drop"),
            Disposal::Forget => f.write_str("Forget"),
            Disposal::With(_) => f.write_str("With(..)"),
        }
    }
}

/// Rule for computing the next bucket-array size once the load threshold is reached.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GrowthPolicy {
    /// `capacity * factor`, truncated.
    Multiply(f32),
    /// `capacity + amount`, truncated.
    Add(f32),
    /// Never resize; chains keep growing.
    Disabled,
}

impl GrowthPolicy {
    /// Next capacity, or `None` when no resize should happen.
    pub fn next_capacity(&self, capacity: usize) -> Option<usize> {
        let target = match *self {
            GrowthPolicy::Multiply(factor) => (capacity as f64 * factor as f64) as usize,
            GrowthPolicy::Add(amount) => (capacity as f64 + amount as f64) as usize,
            GrowthPolicy::Disabled => 0,
        };
        (target > 0).then_some(target)
    }

    pub(crate) fn amount(&self) -> Option<f32> {
        match *self {
            GrowthPolicy::Multiply(x) | GrowthPolicy::Add(x) => Some(x),
            GrowthPolicy::Disabled => None,
        }
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        GrowthPolicy::Multiply(2.0)
    }
}

/// Signed growth offset: positive multiplies, negative adds its magnitude,
/// zero (or NaN) disables growth.
impl From<f32> for GrowthPolicy {
    fn from(offset: f32) -> Self {
        if offset > 0.0 {
            GrowthPolicy::Multiply(offset)
        } else if offset < 0.0 {
            GrowthPolicy::Add(-offset)
        } else {
            GrowthPolicy::Disabled
        }
    }
}

pub(crate) fn threshold_for(capacity: usize, load_factor: f32) -> usize {
    (capacity as f32 * load_factor) as usize
}

/// Unseeded SipHash over `K: Hash`; identical keys hash identically across runs.
pub(crate) fn default_hash_fn<K: Hash>() -> HashFn<K> {
    Box::new(|key: &K| {
        let mut state = DefaultHasher::new();
        key.hash(&mut state);
        state.finish()
    })
}

pub(crate) fn default_compare_fn<K: Eq>() -> CompareFn<K> {
    Box::new(|a: &K, b: &K| a == b)
}

pub(crate) fn hash_fn_from<K, S>(hasher: S) -> HashFn<K>
where
    K: Hash,
    S: BuildHasher + 'static,
{
    Box::new(move |key: &K| hasher.hash_one(key))
}

pub(crate) struct Policy<K, V> {
    pub(crate) hash: HashFn<K>,
    pub(crate) compare: CompareFn<K>,
    pub(crate) key_disposal: Disposal<K>,
    pub(crate) value_disposal: Disposal<V>,
    pub(crate) load_factor: f32,
    pub(crate) growth: GrowthPolicy,
}

impl<K, V> Policy<K, V> {
    pub(crate) fn new(hash: HashFn<K>, compare: CompareFn<K>) -> Self {
        Self {
            hash,
            compare,
            key_disposal: Disposal::Drop,
            value_disposal: Disposal::Drop,
            load_factor: DEFAULT_LOAD_FACTOR,
            growth: GrowthPolicy::default(),
        }
    }

    #[inline]
    pub(crate) fn hash(&self, key: &K) -> u64 {
        (self.hash)(key)
    }

    /// Dispose a key and the value stored beside it. An aliased value is the
    /// key itself, so only the key disposal runs for it.
    pub(crate) fn dispose(&mut self, key: K, value: Stored<K, V>) {
        self.key_disposal.dispose(key);
        if let Stored::Owned(v) = value {
            self.value_disposal.dispose(v);
        }
    }
}
