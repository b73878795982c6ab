//! ChainedHashMap: bucket array with separate chaining over an entry arena.

use crate::error::MapError;
use crate::key_hash::{HashStrategy, KeyHasher};
use core::fmt;
use log::{debug, trace, warn};
use slotmap::{DefaultKey, SlotMap};

#[derive(Debug)]
struct Entry<V> {
    key: String,
    value: V,
    next: Option<DefaultKey>,
}

/// Outcome of [`ChainedHashMap::remove`]. The two no-op outcomes are
/// notices, not failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal<V> {
    Removed(V),
    /// The key's bucket holds no chain at all.
    EmptyBucket,
    /// The bucket's chain was scanned without a match.
    NotFound,
}

impl<V> Removal<V> {
    /// True when an entry was actually unlinked.
    pub fn is_removed(&self) -> bool {
        matches!(self, Removal::Removed(_))
    }

    /// The removed value, or `None` for either no-op outcome.
    pub fn into_value(self) -> Option<V> {
        match self {
            Removal::Removed(v) => Some(v),
            Removal::EmptyBucket | Removal::NotFound => None,
        }
    }
}

enum Probe {
    Found {
        prev: Option<DefaultKey>,
        at: DefaultKey,
    },
    Vacant {
        tail: Option<DefaultKey>,
    },
}

#[inline]
fn index_for(hash: u64, capacity: usize) -> usize {
    (hash % capacity as u64) as usize
}

fn alloc_buckets(capacity: usize) -> Result<Vec<Option<DefaultKey>>, MapError> {
    let mut buckets = Vec::new();
    buckets
        .try_reserve_exact(capacity)
        .map_err(|_| MapError::AllocationFailed(capacity))?;
    buckets.resize(capacity, None);
    Ok(buckets)
}

/// String-keyed map with a fixed number of buckets, each a singly linked
/// chain of entries. Growth happens only through [`resize`](Self::resize).
///
/// Entries live in a `SlotMap`; a bucket stores the key of its chain head
/// and every entry stores the key of its successor.
pub struct ChainedHashMap<V, H = HashStrategy> {
    hasher: H,
    buckets: Vec<Option<DefaultKey>>,
    entries: SlotMap<DefaultKey, Entry<V>>,
}

impl<V> ChainedHashMap<V> {
    /// Creates `capacity` empty buckets hashed with [`HashStrategy::Default`].
    pub fn new(capacity: usize) -> Result<Self, MapError> {
        Self::with_hasher(capacity, HashStrategy::Default)
    }
}

impl<V, H: KeyHasher> ChainedHashMap<V, H> {
    pub fn with_hasher(capacity: usize, hasher: H) -> Result<Self, MapError> {
        if capacity == 0 {
            return Err(MapError::InvalidCapacity);
        }
        let buckets = alloc_buckets(capacity)?;
        debug!("created chained hash map with {} buckets", capacity);
        Ok(Self {
            hasher,
            buckets,
            entries: SlotMap::with_key(),
        })
    }

    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries per bucket. Informational only; nothing resizes on it.
    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub fn hash_key(&self, key: &str) -> u64 {
        self.hasher.hash_key(key)
    }

    /// Bucket the key maps to under the current capacity.
    pub fn bucket_index(&self, key: &str) -> usize {
        index_for(self.hash_key(key), self.capacity())
    }

    // Chain links always point at live slots, so indexing cannot panic.
    fn probe(&self, idx: usize, key: &str) -> Probe {
        let mut prev = None;
        let mut cursor = self.buckets[idx];
        while let Some(at) = cursor {
            let entry = &self.entries[at];
            if entry.key == key {
                return Probe::Found { prev, at };
            }
            prev = Some(at);
            cursor = entry.next;
        }
        Probe::Vacant { tail: prev }
    }

    fn find(&self, key: &str) -> Option<DefaultKey> {
        match self.probe(self.bucket_index(key), key) {
            Probe::Found { at, .. } => Some(at),
            Probe::Vacant { .. } => None,
        }
    }

    /// Stores `value` under `key`.
    ///
    /// An existing key keeps its chain position and gets the new value; the
    /// old value is returned. A new key is appended at the tail of its chain.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        let idx = self.bucket_index(&key);
        match self.probe(idx, &key) {
            Probe::Found { at, .. } => {
                trace!("updating `{}` in bucket {}", key, idx);
                Some(core::mem::replace(&mut self.entries[at].value, value))
            }
            Probe::Vacant { tail } => {
                trace!("appending `{}` to bucket {}", key, idx);
                let new = self.entries.insert(Entry {
                    key,
                    value,
                    next: None,
                });
                match tail {
                    Some(t) => self.entries[t].next = Some(new),
                    None => self.buckets[idx] = Some(new),
                }
                None
            }
        }
    }

    /// Unlinks the entry for `key` wherever it sits in its chain.
    ///
    /// Missing keys leave the map untouched and log a warning.
    pub fn remove(&mut self, key: &str) -> Removal<V> {
        let idx = self.bucket_index(key);
        if self.buckets[idx].is_none() {
            warn!("nothing stored at bucket {} for key `{}`", idx, key);
            return Removal::EmptyBucket;
        }
        match self.probe(idx, key) {
            Probe::Found { prev, at } => {
                let next = self.entries[at].next;
                match prev {
                    Some(p) => self.entries[p].next = next,
                    None => self.buckets[idx] = next,
                }
                self.entries
                    .remove(at)
                    .map_or(Removal::NotFound, |e| Removal::Removed(e.value))
            }
            Probe::Vacant { .. } => {
                warn!("key `{}` not found in bucket {}", key, idx);
                Removal::NotFound
            }
        }
    }

    pub fn retrieve(&self, key: &str) -> Option<&V> {
        let at = self.find(key)?;
        self.entries.get(at).map(|e| &e.value)
    }

    pub fn retrieve_mut(&mut self, key: &str) -> Option<&mut V> {
        let at = self.find(key)?;
        self.entries.get_mut(at).map(|e| &mut e.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Doubles the bucket count and rehashes every entry.
    ///
    /// Entries are visited in bucket order, then chain order, and appended to
    /// their new chains, so same-bucket insertion order survives. All hashing
    /// and allocation happens before any link is rewritten; on error the map
    /// is unchanged.
    pub fn resize(&mut self) -> Result<(), MapError> {
        let old_capacity = self.capacity();
        let new_capacity = old_capacity
            .checked_mul(2)
            .ok_or(MapError::CapacityOverflow(old_capacity))?;

        let mut plan: Vec<(DefaultKey, usize)> = Vec::new();
        plan.try_reserve_exact(self.len())
            .map_err(|_| MapError::AllocationFailed(new_capacity))?;
        for head in &self.buckets {
            let mut cursor = *head;
            while let Some(at) = cursor {
                let entry = &self.entries[at];
                plan.push((at, index_for(self.hasher.hash_key(&entry.key), new_capacity)));
                cursor = entry.next;
            }
        }
        let mut buckets = alloc_buckets(new_capacity)?;
        let mut tails = alloc_buckets(new_capacity)?;

        for (at, idx) in plan {
            self.entries[at].next = None;
            match tails[idx] {
                Some(t) => self.entries[t].next = Some(at),
                None => buckets[idx] = Some(at),
            }
            tails[idx] = Some(at);
        }
        self.buckets = buckets;
        debug!(
            "resized from {} to {} buckets ({} entries rehashed)",
            old_capacity,
            new_capacity,
            self.len()
        );
        Ok(())
    }

    /// Iterates one bucket's chain from head to tail. Out-of-range indices
    /// yield nothing.
    pub fn bucket(&self, index: usize) -> ChainIter<'_, V> {
        ChainIter {
            entries: &self.entries,
            cursor: self.buckets.get(index).copied().flatten(),
        }
    }

    /// Iterates every entry in bucket order, then chain order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: self.buckets.iter(),
            chain: ChainIter {
                entries: &self.entries,
                cursor: None,
            },
        }
    }

    /// Structural audit used by the test suites.
    #[cfg(test)]
    pub(crate) fn audit(&self) -> Result<(), String> {
        let mut seen = std::collections::HashSet::new();
        for (idx, head) in self.buckets.iter().enumerate() {
            let mut cursor = *head;
            while let Some(at) = cursor {
                if seen.len() > self.entries.len() {
                    return Err(format!("cycle detected in bucket {}", idx));
                }
                let entry = self
                    .entries
                    .get(at)
                    .ok_or_else(|| format!("dangling link in bucket {}", idx))?;
                if self.bucket_index(&entry.key) != idx {
                    return Err(format!("`{}` found in bucket {}", entry.key, idx));
                }
                if !seen.insert(entry.key.clone()) {
                    return Err(format!("duplicate key `{}`", entry.key));
                }
                cursor = entry.next;
            }
        }
        if seen.len() != self.entries.len() {
            return Err(format!(
                "{} entries reachable, {} stored",
                seen.len(),
                self.entries.len()
            ));
        }
        Ok(())
    }
}

impl<V: fmt::Debug, H: KeyHasher> fmt::Debug for ChainedHashMap<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, V, H: KeyHasher> IntoIterator for &'a ChainedHashMap<V, H> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a single bucket's chain.
pub struct ChainIter<'a, V> {
    entries: &'a SlotMap<DefaultKey, Entry<V>>,
    cursor: Option<DefaultKey>,
}

impl<'a, V> Iterator for ChainIter<'a, V> {
    type Item = (&'a str, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries.get(self.cursor?)?;
        self.cursor = entry.next;
        Some((entry.key.as_str(), &entry.value))
    }
}

/// Iterator over all entries of a `ChainedHashMap`.
pub struct Iter<'a, V> {
    buckets: core::slice::Iter<'a, Option<DefaultKey>>,
    chain: ChainIter<'a, V>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.chain.next() {
                return Some(item);
            }
            self.chain.cursor = *self.buckets.next()?;
        }
    }
}
