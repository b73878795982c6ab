//! chained-hashmap: a string-keyed hash map with separate chaining and
//! caller-driven growth.
//!
//! Internal Design:
//!
//! Summary
//! - A fixed array of buckets; bucket `i` holds the chain of every entry
//!   whose `hash(key) % capacity == i`.
//! - Entries are owned by a `SlotMap` arena. Buckets store the arena key of
//!   their chain head and each entry stores the arena key of its successor,
//!   so unlinking is a key rewrite and never leaves a dangling link.
//! - Hashing goes through the [`KeyHasher`] seam: the built-in SipHash
//!   default (stable within a toolchain), DJB2 (stable across releases),
//!   any std `BuildHasher`, or a plain closure.
//!
//! Constraints
//! - Single-threaded, no internal synchronization. Mutating calls take
//!   `&mut self`; share across threads only behind an external lock.
//! - Keys are unique per map. Updating a key keeps its chain position; new
//!   keys append to their chain's tail.
//! - Bucket indices are recomputed on every operation and never cached.
//!
//! Growth
//! - No load-factor monitoring. [`ChainedHashMap::resize`] doubles capacity
//!   when the caller asks, visiting old buckets in index order and each
//!   chain head to tail. Same-bucket relative order therefore survives a
//!   resize; cross-bucket order carries no meaning.
//! - Resize hashes every key and allocates every buffer before relinking;
//!   an error leaves the old layout authoritative.
//!
//! Notes and non-goals
//! - No shrinking on delete, no persistence, no hash-flooding resistance.
//! - `remove` reports misses as [`Removal::EmptyBucket`] or
//!   [`Removal::NotFound`] and logs a warning through `log`.

pub mod chained_hash_map;
mod chained_hash_map_proptest;
pub mod config;
pub mod error;
pub mod key_hash;
mod test_logger;

// Public surface
pub use chained_hash_map::{ChainedHashMap, Removal};
pub use config::MapConfig;
pub use error::MapError;
pub use key_hash::{DefaultKeyHasher, Djb2, FromBuildHasher, HashStrategy, KeyHasher};
