//! Borrowing iterators. Order is bucket order, then chain order; it is not
//! part of the contract and changes with every resize.

use crate::buckets::Buckets;
use core::iter::FusedIterator;
use slotmap::DefaultKey;

/// Iterator over `(&K, &V)` pairs of a `ChainedHashMap`.
pub struct Iter<'a, K, V> {
    buckets: &'a Buckets<K, V>,
    bucket: usize,
    cursor: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(buckets: &'a Buckets<K, V>) -> Self {
        Self {
            buckets,
            bucket: 0,
            cursor: None,
            remaining: buckets.len(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let buckets = self.buckets;
        loop {
            if let Some(slot) = self.cursor {
                let entry = buckets.entry(slot);
                self.cursor = entry.next;
                self.remaining -= 1;
                return Some((&entry.key, entry.value()));
            }
            // Every remaining bucket is empty once all entries were seen.
            if self.remaining == 0 || self.bucket >= buckets.heads.len() {
                return None;
            }
            self.cursor = buckets.heads[self.bucket];
            self.bucket += 1;
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets,
            bucket: self.bucket,
            cursor: self.cursor,
            remaining: self.remaining,
        }
    }
}

/// Iterator over the keys of a `ChainedHashMap`.
pub struct Keys<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Iterator over the values of a `ChainedHashMap`.
pub struct Values<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Stored;

    #[test]
    fn visits_bucket_then_chain_order() {
        let mut b: Buckets<u64, u64> = Buckets::with_capacity(3);
        for k in [0u64, 3, 1, 4, 2] {
            b.push_front(k, k, Stored::Owned(k));
        }
        let order: Vec<u64> = Iter::new(&b).map(|(k, _)| *k).collect();
        // bucket 0: 3 -> 0, bucket 1: 4 -> 1, bucket 2: 2
        assert_eq!(order, vec![3, 0, 4, 1, 2]);
    }

    #[test]
    fn exact_size_counts_down() {
        let mut b: Buckets<u64, u64> = Buckets::with_capacity(8);
        for k in 0..5u64 {
            b.push_front(k, k, Stored::Owned(k));
        }
        let mut it = Iter::new(&b);
        assert_eq!(it.len(), 5);
        it.next();
        it.next();
        assert_eq!(it.len(), 3);
        assert_eq!(it.clone().count(), 3);
        assert_eq!(it.by_ref().count(), 3);
        assert!(it.next().is_none());
    }

    #[test]
    fn keys_and_values_clone_and_fuse() {
        let mut b: Buckets<u64, u64> = Buckets::with_capacity(4);
        for k in 0..3u64 {
            b.push_front(k, k, Stored::Owned(k + 10));
        }
        let mut keys = Keys { inner: Iter::new(&b) };
        keys.next();
        let mut rest: Vec<u64> = keys.clone().copied().collect();
        rest.sort_unstable();
        assert_eq!(rest.len(), 2);
        assert_eq!(keys.by_ref().count(), 2);
        assert!(keys.next().is_none());

        let values = Values { inner: Iter::new(&b) };
        let mut all: Vec<u64> = values.clone().copied().collect();
        all.sort_unstable();
        assert_eq!(all, vec![10, 11, 12]);
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn empty_table_yields_nothing() {
        let b: Buckets<u64, u64> = Buckets::with_capacity(16);
        assert!(Iter::new(&b).next().is_none());
    }
}
