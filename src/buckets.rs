//! Bucket array and chain storage.
//!
//! Every entry lives in a generational arena; each bucket holds the arena key
//! of its chain head and entries link to their successor. Relinking during a
//! rehash therefore moves arena keys only, never keys or values.

use crate::entry::{Entry, Stored};
use slotmap::{DefaultKey, SlotMap};

pub(crate) struct Buckets<K, V> {
    pub(crate) heads: Vec<Option<DefaultKey>>,
    pub(crate) slots: SlotMap<DefaultKey, Entry<K, V>>,
}

impl<K, V> Buckets<K, V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            heads: vec![None; capacity],
            slots: SlotMap::with_key(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.heads.len()
    }

    #[inline]
    fn index(&self, hash: u64) -> usize {
        (hash % self.heads.len() as u64) as usize
    }

    pub(crate) fn find(
        &self,
        hash: u64,
        key: &K,
        compare: &dyn Fn(&K, &K) -> bool,
    ) -> Option<DefaultKey> {
        let mut cursor = self.heads[self.index(hash)];
        while let Some(slot) = cursor {
            let entry = &self.slots[slot];
            if entry.matches(hash, key, compare) {
                return Some(slot);
            }
            cursor = entry.next;
        }
        None
    }

    #[inline]
    pub(crate) fn entry(&self, slot: DefaultKey) -> &Entry<K, V> {
        &self.slots[slot]
    }

    #[inline]
    pub(crate) fn entry_mut(&mut self, slot: DefaultKey) -> &mut Entry<K, V> {
        &mut self.slots[slot]
    }

    /// Link a new entry at the head of its chain.
    pub(crate) fn push_front(&mut self, hash: u64, key: K, value: Stored<K, V>) -> DefaultKey {
        let pos = self.index(hash);
        let next = self.heads[pos];
        let slot = self.slots.insert(Entry {
            key,
            value,
            hash,
            next,
        });
        self.heads[pos] = Some(slot);
        slot
    }

    /// Unlink the matching entry from its chain and release its node.
    pub(crate) fn unlink(
        &mut self,
        hash: u64,
        key: &K,
        compare: &dyn Fn(&K, &K) -> bool,
    ) -> Option<Entry<K, V>> {
        let pos = self.index(hash);
        let mut prev: Option<DefaultKey> = None;
        let mut cursor = self.heads[pos];
        while let Some(slot) = cursor {
            let entry = &self.slots[slot];
            let next = entry.next;
            if entry.matches(hash, key, compare) {
                match prev {
                    Some(p) => self.slots[p].next = next,
                    None => self.heads[pos] = next,
                }
                return self.slots.remove(slot);
            }
            prev = Some(slot);
            cursor = next;
        }
        None
    }

    /// Move every entry into a fresh bucket array of `new_capacity` slots,
    /// placing each by its cached hash.
    pub(crate) fn rehash(&mut self, new_capacity: usize) {
        debug_assert!(new_capacity > 0);
        let mut heads: Vec<Option<DefaultKey>> = vec![None; new_capacity];
        for head in self.heads.iter_mut() {
            let mut cursor = head.take();
            while let Some(slot) = cursor {
                let entry = &mut self.slots[slot];
                cursor = entry.next;
                let pos = (entry.hash % new_capacity as u64) as usize;
                entry.next = heads[pos];
                heads[pos] = Some(slot);
            }
        }
        self.heads = heads;
    }

    /// Recompute every cached hash with `hash`, then re-bucket at the current
    /// capacity. `hash` runs before any link or cached hash is touched, so a
    /// panic inside it leaves the table as it was.
    pub(crate) fn rehash_under(&mut self, hash: &dyn Fn(&K) -> u64) {
        let hashes: Vec<(DefaultKey, u64)> = self
            .slots
            .iter()
            .map(|(slot, entry)| (slot, hash(&entry.key)))
            .collect();
        for (slot, h) in hashes {
            self.slots[slot].hash = h;
        }
        let capacity = self.capacity();
        self.rehash(capacity);
    }

    /// Empty every bucket and yield the released entries.
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = Entry<K, V>> + '_ {
        self.heads.fill(None);
        self.slots.drain().map(|(_, e)| e)
    }

    #[cfg(test)]
    pub(crate) fn chain_len(&self, bucket: usize) -> usize {
        let mut n = 0;
        let mut cursor = self.heads[bucket];
        while let Some(slot) = cursor {
            n += 1;
            cursor = self.slots[slot].next;
        }
        n
    }
}
