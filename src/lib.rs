//! chained-hashmap: a single-threaded hash table using separate chaining,
//! with hashing, equality and disposal chosen per table instance.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: an embeddable key/value store with O(1) amortized insert,
//!   lookup and removal whose behavior is configured per instance rather
//!   than through `K: Hash + Eq` alone.
//! - Layers:
//!   - `Buckets<K, V>`: a `Vec` of chain heads over a generational arena of
//!     entry nodes. Chains link arena keys; rehashing relinks nodes without
//!     touching keys or values.
//!   - `Policy<K, V>`: hash function, compare function, key and value
//!     disposal, load factor and growth policy.
//!   - `ChainedHashMap<K, V>`: public API; owns both of the above plus the
//!     resize threshold.
//!
//! Constraints
//! - Single-threaded: policies are boxed `dyn Fn`, so the table is
//!   `!Send`/`!Sync`.
//! - Bucket index is always `cached_hash % capacity`. The cached hash is
//!   only recomputed when the hash function is replaced.
//! - Lookup matches on cached hash, then key identity, then the compare
//!   function.
//!
//! Ownership
//! - `put_noalloc` moves the given key and value into the table. On update
//!   the stored key and value are replaced and the old ones disposed.
//! - `put` stores clones. On update only the value is replaced.
//! - `put_noalloc_aliased` stores a key that doubles as its own value. The
//!   value slot records the alias, so the resource is disposed exactly
//!   once, through the key disposal.
//! - `remove_nofree` hands key and value back instead of disposing them.
//!
//! Growth
//! - After a new entry is linked and `len >= threshold`, the growth policy
//!   picks the next capacity (`Multiply`, `Add`, or `Disabled`). A computed
//!   capacity of 0 skips the resize and chains keep growing.
//! - `threshold = floor(capacity * load_factor)`.
//!
//! Notes and non-goals
//! - No ordered iteration; order follows bucket then chain and changes on
//!   resize.
//! - No randomized seeding. The default hash function is unseeded SipHash.
//! - Allocation failure aborts, as with any std collection.
//! - Mutating during `browse` is rejected by the borrow checker.

mod buckets;
mod chained_hash_map;
mod chained_hash_map_proptest;
mod config;
mod entry;
mod error;
mod iter;
mod policy;

// Public surface
pub use chained_hash_map::{ChainedHashMap, PutResult};
pub use config::Builder;
pub use error::ConfigError;
pub use iter::{Iter, Keys, Values};
pub use policy::{CompareFn, Disposal, GrowthPolicy, HashFn};
