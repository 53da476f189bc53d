//! DynArray: contiguous, growable sequence with explicit capacity policy.
//!
//! Capacity is tracked separately from the backing `Vec` so growth follows a
//! fixed 1.5x schedule regardless of what the allocator hands back. The array
//! never shrinks. Out-of-range accesses are defined no-ops or `None`, never
//! panics (except through `Index`, which mirrors slice indexing).

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Index, IndexMut};

/// Starting capacity used by `DynArray::new`.
pub const BASE_CAPACITY: usize = 10;

/// Iterator over shared references, in index order.
pub type Iter<'a, T> = core::slice::Iter<'a, T>;

pub struct DynArray<T> {
    items: Vec<T>,
    // Logical capacity; `items.capacity()` may be larger.
    capacity: usize,
}

impl<T> DynArray<T> {
    pub fn new() -> Self {
        Self::with_capacity(BASE_CAPACITY)
    }

    /// Create an empty array with room for `capacity` elements. The array
    /// still grows past this when full.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn grow_if_full(&mut self) {
        if self.items.len() < self.capacity {
            return;
        }
        let grown = (self.capacity * 3 / 2).max(self.capacity + 1);
        self.items.reserve_exact(grown - self.items.len());
        self.capacity = grown;
    }

    pub fn push(&mut self, value: T) {
        self.grow_if_full();
        self.items.push(value);
    }

    /// Insert `value` at `index`, shifting the tail right by one.
    ///
    /// `index == len()` appends. An index past the end is ignored and
    /// `value` is dropped.
    pub fn insert(&mut self, index: usize, value: T) {
        if index > self.items.len() {
            return;
        }
        self.grow_if_full();
        self.items.insert(index, value);
    }

    /// Remove and return the element at `index`, shifting the tail left.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.items.len() {
            return None;
        }
        Some(self.items.remove(index))
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Replace the element at `index`, returning the previous one. Out of
    /// range leaves the array untouched and drops `value`.
    pub fn set(&mut self, index: usize, value: T) -> Option<T> {
        self.items
            .get_mut(index)
            .map(|slot| core::mem::replace(slot, value))
    }

    /// Swap two elements. Ignored if either index is out of range.
    pub fn swap(&mut self, i: usize, j: usize) {
        if i < self.items.len() && j < self.items.len() {
            self.items.swap(i, j);
        }
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    /// Index of the first element for which `compare(needle, element)`
    /// returns `Ordering::Equal`.
    pub fn find<Q, F>(&self, needle: &Q, mut compare: F) -> Option<usize>
    where
        Q: ?Sized,
        F: FnMut(&Q, &T) -> Ordering,
    {
        self.items
            .iter()
            .position(|e| compare(needle, e) == Ordering::Equal)
    }

    /// Index of the first element matching `pred`.
    pub fn position<F>(&self, pred: F) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.items.iter().position(pred)
    }

    /// Call `f` on every element in index order.
    pub fn for_each<F>(&self, f: F)
    where
        F: FnMut(&T),
    {
        self.items.iter().for_each(f)
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Give up the array structure and hand every element back in order.
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    /// Sort in place with a three-way comparator.
    ///
    /// Quicksort with the midpoint of each sub-range as pivot and Lomuto
    /// partitioning. Not stable. Only the smaller partition is recursed
    /// into, so stack depth stays logarithmic even on adversarial input.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        quicksort(&mut self.items[..], &mut compare);
    }

    pub fn sort(&mut self)
    where
        T: Ord,
    {
        self.sort_by(Ord::cmp);
    }
}

fn quicksort<T, F>(mut v: &mut [T], compare: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    while v.len() > 1 {
        let p = partition(v, compare);
        let (left, right) = core::mem::take(&mut v).split_at_mut(p);
        let right = &mut right[1..];
        if left.len() < right.len() {
            quicksort(left, compare);
            v = right;
        } else {
            quicksort(right, compare);
            v = left;
        }
    }
}

// Lomuto partition around the midpoint element; returns its final index.
fn partition<T, F>(v: &mut [T], compare: &mut F) -> usize
where
    F: FnMut(&T, &T) -> Ordering,
{
    let last = v.len() - 1;
    v.swap(last / 2, last);
    let mut store = 0;
    for i in 0..last {
        if compare(&v[i], &v[last]) == Ordering::Less {
            v.swap(i, store);
            store += 1;
        }
    }
    v.swap(store, last);
    store
}

impl<T> Default for DynArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Structural copy: same elements, independent storage, same capacity.
impl<T: Clone> Clone for DynArray<T> {
    fn clone(&self) -> Self {
        let mut items = Vec::with_capacity(self.capacity);
        items.extend(self.items.iter().cloned());
        Self {
            items,
            capacity: self.capacity,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for DynArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for DynArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Eq> Eq for DynArray<T> {}

impl<T> Index<usize> for DynArray<T> {
    type Output = T;
    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for DynArray<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<T> Extend<T> for DynArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for v in iter {
            self.push(v);
        }
    }
}

impl<T> FromIterator<T> for DynArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut a = DynArray::new();
        a.extend(iter);
        a
    }
}

impl<T> IntoIterator for DynArray<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;
    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a DynArray<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
