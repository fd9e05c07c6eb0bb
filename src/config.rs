//! Validated construction of a `ChainedHashMap`.

use core::hash::{BuildHasher, Hash};

use crate::chained_hash_map::{ChainedHashMap, DEFAULT_CAPACITY};
use crate::error::ConfigError;
use crate::policy::{self, CompareFn, Disposal, GrowthPolicy, HashFn, Policy};

/// Builder for `ChainedHashMap`.
///
/// ```
/// use chained_hashmap::{ChainedHashMap, GrowthPolicy};
///
/// let map: ChainedHashMap<String, u32> = ChainedHashMap::builder()
///     .capacity(4)
///     .load_factor(0.5)
///     .growth_policy(GrowthPolicy::Add(8.0))
///     .build()
///     .unwrap();
/// assert_eq!(map.capacity(), 4);
/// assert_eq!(map.threshold(), 2);
/// ```
pub struct Builder<K, V> {
    capacity: usize,
    hash: Option<HashFn<K>>,
    compare: Option<CompareFn<K>>,
    key_disposal: Disposal<K>,
    value_disposal: Disposal<V>,
    load_factor: f32,
    growth: GrowthPolicy,
}

impl<K, V> Builder<K, V>
where
    K: Eq + Hash,
{
    /// Builder with the default hash and compare functions installed.
    pub fn new() -> Self {
        Self {
            hash: Some(policy::default_hash_fn()),
            compare: Some(policy::default_compare_fn()),
            ..Self::bare()
        }
    }

    /// Hash keys through a `BuildHasher`.
    pub fn build_hasher<S>(mut self, hasher: S) -> Self
    where
        S: BuildHasher + 'static,
    {
        self.hash = Some(policy::hash_fn_from(hasher));
        self
    }
}

impl<K, V> Default for Builder<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Builder<K, V> {
    /// Builder without hash or compare functions; both must be supplied
    /// before `build`.
    pub fn bare() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            hash: None,
            compare: None,
            key_disposal: Disposal::Drop,
            value_disposal: Disposal::Drop,
            load_factor: policy::DEFAULT_LOAD_FACTOR,
            growth: GrowthPolicy::default(),
        }
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn hash_fn<F>(mut self, hash: F) -> Self
    where
        F: Fn(&K) -> u64 + 'static,
    {
        self.hash = Some(Box::new(hash));
        self
    }

    pub fn compare_fn<F>(mut self, compare: F) -> Self
    where
        F: Fn(&K, &K) -> bool + 'static,
    {
        self.compare = Some(Box::new(compare));
        self
    }

    pub fn key_disposal(mut self, disposal: Disposal<K>) -> Self {
        self.key_disposal = disposal;
        self
    }

    pub fn value_disposal(mut self, disposal: Disposal<V>) -> Self {
        self.value_disposal = disposal;
        self
    }

    pub fn load_factor(mut self, load_factor: f32) -> Self {
        self.load_factor = load_factor;
        self
    }

    pub fn growth_policy(mut self, growth: impl Into<GrowthPolicy>) -> Self {
        self.growth = growth.into();
        self
    }

    pub fn build(self) -> Result<ChainedHashMap<K, V>, ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !self.load_factor.is_finite() || self.load_factor <= 0.0 {
            return Err(ConfigError::InvalidLoadFactor(self.load_factor));
        }
        if let Some(amount) = self.growth.amount() {
            if !amount.is_finite() {
                return Err(ConfigError::InvalidGrowth(amount));
            }
        }
        let hash = self.hash.ok_or(ConfigError::MissingHashFn)?;
        let compare = self.compare.ok_or(ConfigError::MissingCompareFn)?;

        let mut policy = Policy::new(hash, compare);
        policy.key_disposal = self.key_disposal;
        policy.value_disposal = self.value_disposal;
        policy.load_factor = self.load_factor;
        policy.growth = self.growth;
        Ok(ChainedHashMap::from_policy(self.capacity, policy))
    }
}
