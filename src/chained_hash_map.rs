//! ChainedHashMap: fixed bucket table with separate chaining and a tracked
//! key order.
//!
//! Entries live in a generational `SlotMap`; each bucket holds the key of
//! the first entry in its chain and entries link to the next one. New
//! entries go to the tail of their chain. Alongside the table, a `DynArray`
//! of entry keys records every live entry once, in insertion order; this
//! array drives iteration and is the only thing the sort operations touch.
//!
//! The bucket count is fixed at construction. There is no rehashing, so
//! long chains are the caller's cost of choosing too few buckets.

use crate::dyn_array::{self, DynArray};
use crate::key::{compare_keys, Key, KeyRef};
use core::cmp::Ordering;
use core::fmt;
use slotmap::{DefaultKey, SlotMap};

/// Bucket count used by `ChainedHashMap::new`.
pub const DEFAULT_BUCKETS: usize = 1_000_000;

/// Stable reference to one entry. Re-derive its key and value with an
/// explicit lookup against the map that returned it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct KeyHandle(DefaultKey);

impl KeyHandle {
    pub fn key<'a, V, S>(&self, map: &'a ChainedHashMap<V, S>) -> Option<&'a Key<S>>
    where
        S: AsRef<str>,
    {
        map.handle_key(*self)
    }

    pub fn value<'a, V, S>(&self, map: &'a ChainedHashMap<V, S>) -> Option<&'a V>
    where
        S: AsRef<str>,
    {
        map.handle_value(*self)
    }

    pub fn value_mut<'a, V, S>(&self, map: &'a mut ChainedHashMap<V, S>) -> Option<&'a mut V>
    where
        S: AsRef<str>,
    {
        map.handle_value_mut(*self)
    }
}

#[derive(Debug)]
struct Entry<V, S> {
    key: Key<S>,
    value: V,
    next: Option<DefaultKey>,
}

pub struct ChainedHashMap<V, S = String> {
    buckets: Box<[Option<DefaultKey>]>,
    entries: SlotMap<DefaultKey, Entry<V, S>>,
    // Every live entry exactly once; iteration order.
    tracked: DynArray<DefaultKey>,
}

// Result of walking one bucket chain.
enum Probe {
    Found {
        slot: DefaultKey,
        prev: Option<DefaultKey>,
    },
    Missing {
        tail: Option<DefaultKey>,
    },
}

impl<V, S> ChainedHashMap<V, S>
where
    S: AsRef<str>,
{
    pub fn new() -> Self {
        Self::with_buckets(DEFAULT_BUCKETS)
    }

    /// Create a map with a fixed table of `buckets` chains.
    ///
    /// Panics if `buckets` is zero.
    pub fn with_buckets(buckets: usize) -> Self {
        assert!(buckets > 0, "ChainedHashMap needs at least one bucket");
        Self {
            buckets: vec![None; buckets].into_boxed_slice(),
            entries: SlotMap::with_key(),
            tracked: DynArray::new(),
        }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn probe(&self, bucket: usize, q: KeyRef<'_>) -> Probe {
        let mut prev = None;
        let mut cur = self.buckets[bucket];
        while let Some(slot) = cur {
            let e = &self.entries[slot];
            if q.matches(&e.key) {
                return Probe::Found { slot, prev };
            }
            prev = Some(slot);
            cur = e.next;
        }
        Probe::Missing { tail: prev }
    }

    fn lookup(&self, q: KeyRef<'_>) -> Option<DefaultKey> {
        match self.probe(q.bucket(self.buckets.len()), q) {
            Probe::Found { slot, .. } => Some(slot),
            Probe::Missing { .. } => None,
        }
    }

    /// Associate `key` with `value`.
    ///
    /// If the key is already present its value is replaced in place and the
    /// previous value returned; the entry, its tracked position and its
    /// stored key are kept, and the `key` argument is dropped.
    pub fn insert(&mut self, key: Key<S>, value: V) -> Option<V> {
        let q = key.as_key_ref();
        let bucket = q.bucket(self.buckets.len());
        let tail = match self.probe(bucket, q) {
            Probe::Found { slot, .. } => {
                return Some(core::mem::replace(&mut self.entries[slot].value, value));
            }
            Probe::Missing { tail } => tail,
        };
        let slot = self.entries.insert(Entry {
            key,
            value,
            next: None,
        });
        match tail {
            None => self.buckets[bucket] = Some(slot),
            Some(t) => self.entries[t].next = Some(slot),
        }
        self.tracked.push(slot);
        None
    }

    pub fn put_str(&mut self, key: S, value: V) -> Option<V> {
        self.insert(Key::Str(key), value)
    }

    pub fn put_int(&mut self, key: i32, value: V) -> Option<V> {
        self.insert(Key::Int(key), value)
    }

    pub fn find<'q>(&self, key: impl Into<KeyRef<'q>>) -> Option<KeyHandle> {
        self.lookup(key.into()).map(KeyHandle)
    }

    pub fn contains_key<'q>(&self, key: impl Into<KeyRef<'q>>) -> bool {
        self.lookup(key.into()).is_some()
    }

    pub fn get<'q>(&self, key: impl Into<KeyRef<'q>>) -> Option<&V> {
        self.lookup(key.into()).map(|slot| &self.entries[slot].value)
    }

    pub fn get_mut<'q>(&mut self, key: impl Into<KeyRef<'q>>) -> Option<&mut V> {
        let slot = self.lookup(key.into())?;
        self.entries.get_mut(slot).map(|e| &mut e.value)
    }

    pub fn get_str(&self, key: &str) -> Option<&V> {
        self.get(KeyRef::Str(key))
    }

    pub fn get_int(&self, key: i32) -> Option<&V> {
        self.get(KeyRef::Int(key))
    }

    /// Remove an entry, handing back its stored key and value. The caller
    /// decides whether either is released. Missing keys are a no-op.
    pub fn remove<'q>(&mut self, key: impl Into<KeyRef<'q>>) -> Option<(Key<S>, V)> {
        let q = key.into();
        let bucket = q.bucket(self.buckets.len());
        match self.probe(bucket, q) {
            Probe::Found { slot, prev } => self.unlink(bucket, slot, prev),
            Probe::Missing { .. } => None,
        }
    }

    pub fn remove_str(&mut self, key: &str) -> Option<(Key<S>, V)> {
        self.remove(KeyRef::Str(key))
    }

    pub fn remove_int(&mut self, key: i32) -> Option<(Key<S>, V)> {
        self.remove(KeyRef::Int(key))
    }

    /// Remove the entry a handle refers to. Stale handles are a no-op.
    pub fn remove_handle(&mut self, handle: KeyHandle) -> Option<(Key<S>, V)> {
        let target = handle.0;
        let bucket = self
            .entries
            .get(target)?
            .key
            .as_key_ref()
            .bucket(self.buckets.len());
        let mut prev = None;
        let mut cur = self.buckets[bucket];
        while let Some(slot) = cur {
            if slot == target {
                return self.unlink(bucket, slot, prev);
            }
            prev = Some(slot);
            cur = self.entries[slot].next;
        }
        None
    }

    fn unlink(
        &mut self,
        bucket: usize,
        slot: DefaultKey,
        prev: Option<DefaultKey>,
    ) -> Option<(Key<S>, V)> {
        let entry = self.entries.remove(slot)?;
        match prev {
            None => self.buckets[bucket] = entry.next,
            Some(p) => self.entries[p].next = entry.next,
        }
        if let Some(i) = self.tracked.position(|&t| t == slot) {
            self.tracked.remove(i);
        }
        debug_assert_eq!(self.tracked.len(), self.entries.len());
        Some((entry.key, entry.value))
    }

    pub(crate) fn handle_key(&self, h: KeyHandle) -> Option<&Key<S>> {
        self.entries.get(h.0).map(|e| &e.key)
    }

    pub(crate) fn handle_value(&self, h: KeyHandle) -> Option<&V> {
        self.entries.get(h.0).map(|e| &e.value)
    }

    pub(crate) fn handle_value_mut(&mut self, h: KeyHandle) -> Option<&mut V> {
        self.entries.get_mut(h.0).map(|e| &mut e.value)
    }

    /// Entries in tracked order.
    pub fn iter(&self) -> Iter<'_, V, S> {
        Iter {
            tracked: self.tracked.iter(),
            entries: &self.entries,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key<S>> + '_ {
        self.iter().map(|(_, k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, _, v)| v)
    }

    pub fn handles(&self) -> impl Iterator<Item = KeyHandle> + '_ {
        self.tracked.iter().map(|&slot| KeyHandle(slot))
    }

    /// Call `f` on every entry in tracked order, with mutable access to the value.
    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&Key<S>, &mut V),
    {
        for &slot in self.tracked.iter() {
            if let Some(e) = self.entries.get_mut(slot) {
                f(&e.key, &mut e.value);
            }
        }
    }

    /// Reorder iteration by the default textual key ordering
    /// (see `key::compare_keys`). Lookups are unaffected.
    pub fn sort_keys(&mut self) {
        let entries = &self.entries;
        self.tracked.sort_by(|a, b| {
            compare_keys(entries[*a].key.as_key_ref(), entries[*b].key.as_key_ref())
        });
    }

    /// Reorder iteration with a comparator over `(key, value)` pairs.
    /// Lookups are unaffected.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut((&Key<S>, &V), (&Key<S>, &V)) -> Ordering,
    {
        let entries = &self.entries;
        self.tracked.sort_by(|a, b| {
            let (ea, eb) = (&entries[*a], &entries[*b]);
            compare((&ea.key, &ea.value), (&eb.key, &eb.value))
        });
    }

    /// Write each key on its own line, in tracked order.
    pub fn write_keys<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        for (_, k, _) in self.iter() {
            writeln!(out, "{k}")?;
        }
        Ok(())
    }

    /// Write `(key, value)` lines in tracked order, rendering values with
    /// `to_string`.
    pub fn write_keyvals<W, F, D>(&self, out: &mut W, mut to_string: F) -> fmt::Result
    where
        W: fmt::Write,
        F: FnMut(&V) -> D,
        D: fmt::Display,
    {
        for (_, k, v) in self.iter() {
            writeln!(out, "({k}, {})", to_string(v))?;
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(|b| *b = None);
        self.entries.clear();
        self.tracked.clear();
    }

    /// Give up the map and hand every key/value pair back in tracked order.
    pub fn into_entries(mut self) -> Vec<(Key<S>, V)> {
        let mut out = Vec::with_capacity(self.len());
        for slot in core::mem::take(&mut self.tracked) {
            if let Some(e) = self.entries.remove(slot) {
                out.push((e.key, e.value));
            }
        }
        out
    }
}

impl<V, S> Default for ChainedHashMap<V, S>
where
    S: AsRef<str>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, S> fmt::Debug for ChainedHashMap<V, S>
where
    V: fmt::Debug,
    S: AsRef<str>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(_, k, v)| (k.as_key_ref(), v)))
            .finish()
    }
}

/// Iterator over entries in tracked order.
pub struct Iter<'a, V, S> {
    tracked: dyn_array::Iter<'a, DefaultKey>,
    entries: &'a SlotMap<DefaultKey, Entry<V, S>>,
}

impl<'a, V, S> Iterator for Iter<'a, V, S> {
    type Item = (KeyHandle, &'a Key<S>, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let slot = *self.tracked.next()?;
        let e = self.entries.get(slot)?;
        Some((KeyHandle(slot), &e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.tracked.size_hint()
    }
}

impl<'a, V, S> IntoIterator for &'a ChainedHashMap<V, S>
where
    S: AsRef<str>,
{
    type Item = (KeyHandle, &'a Key<S>, &'a V);
    type IntoIter = Iter<'a, V, S>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
