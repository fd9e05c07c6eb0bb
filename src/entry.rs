//! Chain nodes.

use slotmap::DefaultKey;

/// Value slot of an entry.
pub(crate) enum Stored<K, V> {
    /// Independently owned value.
    Owned(V),
    /// The value is the entry's own key, viewed as `V`. Only the key is
    /// ever disposed for such an entry.
    Key(fn(&K) -> &V),
}

impl<K, V> Stored<K, V> {
    pub(crate) fn into_owned(self) -> Option<V> {
        match self {
            Stored::Owned(v) => Some(v),
            Stored::Key(_) => None,
        }
    }
}

pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: Stored<K, V>,
    pub(crate) hash: u64,
    pub(crate) next: Option<DefaultKey>,
}

impl<K, V> Entry<K, V> {
    #[inline]
    pub(crate) fn value(&self) -> &V {
        match &self.value {
            Stored::Owned(v) => v,
            Stored::Key(project) => project(&self.key),
        }
    }

    /// Cached hash first, then identity, then the compare function.
    #[inline]
    pub(crate) fn matches(&self, hash: u64, key: &K, compare: &dyn Fn(&K, &K) -> bool) -> bool {
        self.hash == hash && (core::ptr::eq(key, &self.key) || compare(key, &self.key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::borrow::Borrow;
    use std::cell::Cell;

    fn entry(key: &str, value: Stored<String, String>, hash: u64) -> Entry<String, String> {
        Entry {
            key: key.to_string(),
            value,
            hash,
            next: None,
        }
    }

    #[test]
    fn aliased_value_reads_through_key() {
        let e = entry("k", Stored::Key(<String as Borrow<String>>::borrow), 1);
        assert_eq!(e.value(), "k");
        assert!(core::ptr::eq(e.value(), &e.key));
        assert!(e.value.into_owned().is_none());
    }

    /// Invariant: the compare function only runs when the cached hashes agree
    /// and the keys are not the same object.
    #[test]
    fn matches_checks_hash_then_identity_then_compare() {
        let calls = Cell::new(0);
        let cmp = |a: &String, b: &String| {
            calls.set(calls.get() + 1);
            a == b
        };
        let e = entry("k", Stored::Owned("v".to_string()), 7);

        assert!(!e.matches(8, &"k".to_string(), &cmp));
        assert_eq!(calls.get(), 0);

        assert!(e.matches(7, &e.key, &cmp));
        assert_eq!(calls.get(), 0);

        assert!(e.matches(7, &"k".to_string(), &cmp));
        assert!(!e.matches(7, &"other".to_string(), &cmp));
        assert_eq!(calls.get(), 2);
    }
}
