//! ChainedHashMap: separate-chaining table with per-instance policies.

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::mem;
use core::ops::ControlFlow;

use log::{debug, trace};
use slotmap::DefaultKey;

use crate::buckets::Buckets;
use crate::config::Builder;
use crate::entry::Stored;
use crate::iter::{Iter, Keys, Values};
use crate::policy::{self, CompareFn, Disposal, GrowthPolicy, HashFn, Policy};

pub(crate) const DEFAULT_CAPACITY: usize = 16;

/// Outcome of a `put*` call.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PutResult {
    /// The key was absent; a new entry was created.
    Inserted,
    /// The key was present; its entry was updated in place.
    Updated,
}

impl PutResult {
    /// `true` when the key already existed.
    #[inline]
    pub fn existed(self) -> bool {
        matches!(self, PutResult::Updated)
    }
}

/// Hash table with separate chaining.
///
/// Keys and values are owned by the table. Whatever leaves the table through
/// overwrite, removal, `clear` or drop is handed to the configured
/// [`Disposal`] for its kind.
pub struct ChainedHashMap<K, V> {
    buckets: Buckets<K, V>,
    threshold: usize,
    policy: Policy<K, V>,
}

impl<K, V> ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Table with `capacity` buckets and the default hash/compare functions.
    pub fn with_capacity(capacity: usize) -> Self {
        let policy = Policy::new(policy::default_hash_fn(), policy::default_compare_fn());
        Self::from_policy(capacity, policy)
    }

    /// Table hashing keys through `hasher`.
    pub fn with_hasher<S>(capacity: usize, hasher: S) -> Self
    where
        S: BuildHasher + 'static,
    {
        let policy = Policy::new(policy::hash_fn_from(hasher), policy::default_compare_fn());
        Self::from_policy(capacity, policy)
    }

    pub fn builder() -> Builder<K, V> {
        Builder::new()
    }
}

impl<K, V> Default for ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> ChainedHashMap<K, V> {
    /// Table with `capacity` buckets and explicit hash/compare functions.
    /// A capacity of 0 is raised to 1.
    pub fn with_functions<H, C>(capacity: usize, hash: H, compare: C) -> Self
    where
        H: Fn(&K) -> u64 + 'static,
        C: Fn(&K, &K) -> bool + 'static,
    {
        Self::from_policy(capacity, Policy::new(Box::new(hash), Box::new(compare)))
    }

    pub(crate) fn from_policy(capacity: usize, policy: Policy<K, V>) -> Self {
        let capacity = capacity.max(1);
        Self {
            buckets: Buckets::with_capacity(capacity),
            threshold: policy::threshold_for(capacity, policy.load_factor),
            policy,
        }
    }

    /// Number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Same as `len`.
    #[inline]
    pub fn size(&self) -> usize {
        self.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current bucket-array length.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buckets.capacity()
    }

    /// Entry count at which the next insert of a new key resizes.
    #[inline]
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn load_factor(&self) -> f32 {
        self.policy.load_factor
    }

    pub fn growth_policy(&self) -> GrowthPolicy {
        self.policy.growth
    }

    fn find_entry(&self, key: &K) -> Option<DefaultKey> {
        let hash = self.policy.hash(key);
        self.buckets.find(hash, key, &*self.policy.compare)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let slot = self.find_entry(key)?;
        Some(self.buckets.entry(slot).value())
    }

    pub fn contains(&self, key: &K) -> bool {
        self.find_entry(key).is_some()
    }

    /// Insert `key`/`value`, taking ownership of both.
    ///
    /// If the key is present the entry is updated: the stored key and value
    /// are replaced by the given ones and the old key and value are disposed.
    pub fn put_noalloc(&mut self, key: K, value: V) -> PutResult {
        self.put_stored(key, Stored::Owned(value))
    }

    /// Insert `key` as both key and value. The resource is disposed once,
    /// through the key disposal, when the entry leaves the table.
    pub fn put_noalloc_aliased(&mut self, key: K) -> PutResult
    where
        K: Borrow<V>,
    {
        self.put_stored(key, Stored::Key(<K as Borrow<V>>::borrow))
    }

    fn put_stored(&mut self, key: K, value: Stored<K, V>) -> PutResult {
        let hash = self.policy.hash(&key);
        match self.buckets.find(hash, &key, &*self.policy.compare) {
            Some(slot) => {
                let entry = self.buckets.entry_mut(slot);
                let old_key = mem::replace(&mut entry.key, key);
                let old_value = mem::replace(&mut entry.value, value);
                self.policy.dispose(old_key, old_value);
                PutResult::Updated
            }
            None => {
                self.new_entry(hash, key, value);
                PutResult::Inserted
            }
        }
    }

    /// Insert copies of `key`/`value`.
    ///
    /// If the key is present only the value is replaced: the old value is
    /// disposed and a copy of `value` installed, the stored key is kept.
    pub fn put(&mut self, key: &K, value: &V) -> PutResult
    where
        K: Clone,
        V: Clone,
    {
        let hash = self.policy.hash(key);
        match self.buckets.find(hash, key, &*self.policy.compare) {
            Some(slot) => {
                let entry = self.buckets.entry_mut(slot);
                let old = mem::replace(&mut entry.value, Stored::Owned(value.clone()));
                if let Some(v) = old.into_owned() {
                    self.policy.value_disposal.dispose(v);
                }
                PutResult::Updated
            }
            None => {
                self.new_entry(hash, key.clone(), Stored::Owned(value.clone()));
                PutResult::Inserted
            }
        }
    }

    fn new_entry(&mut self, hash: u64, key: K, value: Stored<K, V>) {
        self.buckets.push_front(hash, key, value);
        if self.buckets.len() >= self.threshold {
            self.grow();
        }
    }

    fn grow(&mut self) {
        let capacity = self.buckets.capacity();
        match self.policy.growth.next_capacity(capacity) {
            Some(new_capacity) => {
                debug!(
                    "resizing from {} to {} buckets ({} entries)",
                    capacity,
                    new_capacity,
                    self.buckets.len()
                );
                self.buckets.rehash(new_capacity);
                self.threshold = policy::threshold_for(new_capacity, self.policy.load_factor);
            }
            None => trace!(
                "threshold {} reached at {} buckets, growth disabled by {:?}",
                self.threshold,
                capacity,
                self.policy.growth
            ),
        }
    }

    /// Remove `key`, disposing its key and value.
    pub fn remove(&mut self, key: &K) -> bool {
        let hash = self.policy.hash(key);
        match self.buckets.unlink(hash, key, &*self.policy.compare) {
            Some(entry) => {
                self.policy.dispose(entry.key, entry.value);
                true
            }
            None => false,
        }
    }

    /// Remove `key` without disposing anything; the stored key and value are
    /// returned to the caller. The value is `None` for an aliased entry,
    /// whose value is the returned key.
    pub fn remove_nofree(&mut self, key: &K) -> Option<(K, Option<V>)> {
        let hash = self.policy.hash(key);
        let entry = self.buckets.unlink(hash, key, &*self.policy.compare)?;
        Some((entry.key, entry.value.into_owned()))
    }

    /// Dispose every entry. The bucket-array length is kept.
    pub fn clear(&mut self) {
        let Self { buckets, policy, .. } = self;
        for entry in buckets.drain() {
            policy.dispose(entry.key, entry.value);
        }
    }

    /// Clear and release the table behind `handle`, leaving `None` behind.
    pub fn free(handle: &mut Option<Self>) {
        if let Some(mut table) = handle.take() {
            table.clear();
        }
    }

    /// Visit every entry until `f` breaks; the first `Break` is returned.
    ///
    /// ```
    /// use chained_hashmap::ChainedHashMap;
    /// use std::ops::ControlFlow;
    ///
    /// let mut m = ChainedHashMap::new();
    /// m.put_noalloc("a", 1);
    /// m.put_noalloc("b", 2);
    /// let found = m.browse(|_, v| if *v == 2 { ControlFlow::Break(*v) } else { ControlFlow::Continue(()) });
    /// assert_eq!(found, ControlFlow::Break(2));
    /// ```
    pub fn browse<B, F>(&self, mut f: F) -> ControlFlow<B>
    where
        F: FnMut(&K, &V) -> ControlFlow<B>,
    {
        self.iter().try_for_each(|(k, v)| f(k, v))
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.buckets)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    pub fn set_compare_fn<F>(&mut self, compare: F)
    where
        F: Fn(&K, &K) -> bool + 'static,
    {
        self.policy.compare = Box::new(compare) as CompareFn<K>;
    }

    /// Replace the hash function and re-bucket every entry under it. The
    /// bucket-array length is unchanged.
    ///
    /// If `hash` panics, the previous function stays installed and the table
    /// is unchanged.
    pub fn set_hash_fn<F>(&mut self, hash: F)
    where
        F: Fn(&K) -> u64 + 'static,
    {
        let hash = Box::new(hash) as HashFn<K>;
        trace!(
            "rehashing {} entries under a new hash function",
            self.buckets.len()
        );
        self.buckets.rehash_under(&*hash);
        self.policy.hash = hash;
    }

    pub fn set_key_disposal(&mut self, disposal: Disposal<K>) {
        self.policy.key_disposal = disposal;
    }

    pub fn set_value_disposal(&mut self, disposal: Disposal<V>) {
        self.policy.value_disposal = disposal;
    }

    /// Takes effect on the next insert of a new key. Values that are not
    /// finite and positive are ignored, as `Builder::build` rejects them.
    pub fn set_load_factor(&mut self, load_factor: f32) {
        if !(load_factor.is_finite() && load_factor > 0.0) {
            trace!("ignoring load factor {}", load_factor);
            return;
        }
        self.policy.load_factor = load_factor;
        self.threshold = policy::threshold_for(self.buckets.capacity(), load_factor);
    }

    pub fn set_growth_policy(&mut self, growth: impl Into<GrowthPolicy>) {
        self.policy.growth = growth.into();
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let capacity = self.buckets.capacity();
        let mut seen = 0;
        for (i, head) in self.buckets.heads.iter().enumerate() {
            let mut cursor = *head;
            while let Some(slot) = cursor {
                let e = self.buckets.entry(slot);
                assert_eq!(e.hash, self.policy.hash(&e.key), "stale cached hash");
                assert_eq!((e.hash % capacity as u64) as usize, i, "entry in wrong bucket");
                seen += 1;
                cursor = e.next;
            }
        }
        assert_eq!(seen, self.len(), "chain lengths must sum to len");
        assert_eq!(
            self.threshold,
            policy::threshold_for(capacity, self.policy.load_factor)
        );
    }
}

impl<K, V> Drop for ChainedHashMap<K, V> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K, V> fmt::Debug for ChainedHashMap<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V> IntoIterator for &'a ChainedHashMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> Extend<(K, V)> for ChainedHashMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put_noalloc(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}
