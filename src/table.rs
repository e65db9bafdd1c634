//! ProbeMap: open-addressing string map with linear probing and 3/4 growth.

use crate::error::{Result, TableError};
use crate::probe::{self, Probe};
use core::fmt;
use core::hash::BuildHasher;
use slotmap::{DefaultKey, SlotMap};
use std::collections::hash_map::RandomState;

/// Capacity used by `ProbeMap::default()`.
pub const DEFAULT_CAPACITY: usize = 16;

#[derive(Debug)]
struct Entry {
    key: Box<str>,
    value: String,
    hash: u64,
}

/// Open-addressing map from non-empty string keys to string values.
///
/// Slots hold handles into an entry arena; the slot array is what gets
/// probed and reallocated on growth, while entries themselves never move.
/// Each entry keeps the digest computed when it was first inserted, so
/// rehashing never calls the hasher again.
///
/// The hasher `S` is the table's seed. It is built once per table and kept
/// unchanged for the table's lifetime, including across growth.
pub struct ProbeMap<S = RandomState> {
    hasher: S,
    slots: Vec<Option<DefaultKey>>,
    entries: SlotMap<DefaultKey, Entry>,
    max_load: usize,
}

impl ProbeMap {
    /// Create a map with `capacity` slots and a freshly seeded `RandomState`.
    ///
    /// Fails with `InvalidSize` unless `capacity` is a power of two (so `0`
    /// is rejected too).
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }

    pub fn new() -> Self {
        Self::from_parts(DEFAULT_CAPACITY, RandomState::new())
    }
}

impl<S> Default for ProbeMap<S>
where
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::from_parts(DEFAULT_CAPACITY, S::default())
    }
}

/// Iterator over `(key, value)` pairs in unspecified order.
pub struct Iter<'a> {
    it: slotmap::basic::Iter<'a, DefaultKey, Entry>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, e)| (&*e.key, e.value.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<S> ProbeMap<S>
where
    S: BuildHasher,
{
    /// Create a map with `capacity` slots hashing through `hasher`.
    ///
    /// Passing a fixed-key hasher makes slot placement reproducible.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Result<Self> {
        if !capacity.is_power_of_two() {
            return Err(TableError::InvalidSize {
                requested: capacity,
            });
        }
        Ok(Self::from_parts(capacity, hasher))
    }

    fn from_parts(capacity: usize, hasher: S) -> Self {
        debug_assert!(capacity.is_power_of_two());
        Self {
            hasher,
            slots: vec![None; capacity],
            entries: SlotMap::with_capacity(probe::max_load(capacity)),
            max_load: probe::max_load(capacity),
        }
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of slots. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Occupancy at which the next `put` grows the table first.
    pub fn max_load(&self) -> usize {
        self.max_load
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Insert `key` or overwrite its value.
    ///
    /// Growth is checked before probing: once `len() >= max_load()` the
    /// next `put` doubles the table, even if it turns out to be an update.
    pub fn put(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        check_key(key)?;
        if self.entries.len() >= self.max_load {
            self.grow();
        }

        let hash = self.hasher.hash_one(key);
        for i in Probe::new(hash, self.slots.len()) {
            let slot = self.slots[i];
            match slot {
                None => {
                    let k = self.entries.insert(Entry {
                        key: key.into(),
                        value: value.into(),
                        hash,
                    });
                    self.slots[i] = Some(k);
                    return Ok(());
                }
                Some(k) => {
                    let e = &mut self.entries[k];
                    if e.hash == hash && &*e.key == key {
                        e.value = value.into();
                        return Ok(());
                    }
                }
            }
        }

        panic!(
            "probe cycle exhausted: {} of {} slots occupied with max load {}",
            self.entries.len(),
            self.slots.len(),
            self.max_load
        );
    }

    /// Look up `key`. `Ok(None)` means the key was never inserted.
    pub fn get(&self, key: &str) -> Result<Option<&str>> {
        check_key(key)?;
        Ok(self.find(key).map(|e| e.value.as_str()))
    }

    pub fn contains_key(&self, key: &str) -> Result<bool> {
        check_key(key)?;
        Ok(self.find(key).is_some())
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            it: self.entries.iter(),
        }
    }

    #[cfg(test)]
    pub(crate) fn slot_key(&self, i: usize) -> Option<&str> {
        self.slots[i].map(|k| &*self.entries[k].key)
    }

    fn find(&self, key: &str) -> Option<&Entry> {
        let hash = self.hasher.hash_one(key);
        for i in Probe::new(hash, self.slots.len()) {
            // An empty slot ends the chain: nothing is ever removed.
            let k = self.slots[i]?;
            let e = &self.entries[k];
            if e.hash == hash && &*e.key == key {
                return Some(e);
            }
        }
        None
    }

    /// Double the slot array and re-place every live entry by its stored hash.
    #[cold]
    fn grow(&mut self) {
        let from = self.slots.len();
        let to = match from.checked_mul(2) {
            Some(n) => n,
            None => panic!("capacity overflow"),
        };

        let old = core::mem::replace(&mut self.slots, vec![None; to]);
        let mut placed = 0usize;
        for k in old.into_iter().flatten() {
            place(&mut self.slots, self.entries[k].hash, k);
            placed += 1;
        }
        debug_assert_eq!(placed, self.entries.len());
        self.max_load = probe::max_load(to);

        tracing::debug!(from, to, entries = placed, "probe map grew");
    }
}

impl<'a, S> IntoIterator for &'a ProbeMap<S>
where
    S: BuildHasher,
{
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl<S> fmt::Debug for ProbeMap<S>
where
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Put `k` in the first empty slot of its probe sequence. Keys placed
/// here are already unique, so no equality check is needed.
fn place(slots: &mut [Option<DefaultKey>], hash: u64, k: DefaultKey) {
    for i in Probe::new(hash, slots.len()) {
        if slots[i].is_none() {
            slots[i] = Some(k);
            return;
        }
    }
    panic!("probe cycle exhausted while rehashing into {} slots", slots.len());
}

#[inline]
fn check_key(key: &str) -> Result<()> {
    if key.is_empty() {
        tracing::trace!("rejected empty key");
        return Err(TableError::InvalidKey);
    }
    Ok(())
}
