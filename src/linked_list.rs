//! LinkedList: doubly linked list over a generational node arena.
//!
//! Nodes live in a `SlotMap` and link to each other by key, so the list has
//! no raw pointers and a removed node's `NodeHandle` never resolves to a
//! node inserted later. Insert and unlink at a known handle are O(1).
//!
//! Structural invariant, kept across every mutation: `first` and `last` are
//! both `None` (empty) or both `Some`; walking `next` from `first` reaches
//! `last` in `len()` steps, and walking `prev` from `last` reaches `first`.

use crate::error::ListError;
use core::cmp::Ordering;
use core::fmt;
use slotmap::{DefaultKey, SlotMap};

/// Stable reference to one node of a `LinkedList`.
///
/// A handle is only meaningful for the list that returned it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeHandle(DefaultKey);

impl NodeHandle {
    pub fn value<'a, T>(&self, list: &'a LinkedList<T>) -> Option<&'a T> {
        list.get(*self)
    }

    pub fn value_mut<'a, T>(&self, list: &'a mut LinkedList<T>) -> Option<&'a mut T> {
        list.get_mut(*self)
    }
}

#[derive(Debug)]
struct Node<T> {
    data: T,
    prev: Option<DefaultKey>,
    next: Option<DefaultKey>,
}

type Nodes<T> = SlotMap<DefaultKey, Node<T>>;

pub struct LinkedList<T> {
    nodes: Nodes<T>,
    first: Option<DefaultKey>,
    last: Option<DefaultKey>,
}

impl<T> LinkedList<T> {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            first: None,
            last: None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn first(&self) -> Option<NodeHandle> {
        self.first.map(NodeHandle)
    }

    pub fn last(&self) -> Option<NodeHandle> {
        self.last.map(NodeHandle)
    }

    pub fn next(&self, h: NodeHandle) -> Option<NodeHandle> {
        self.nodes.get(h.0).and_then(|n| n.next).map(NodeHandle)
    }

    pub fn prev(&self, h: NodeHandle) -> Option<NodeHandle> {
        self.nodes.get(h.0).and_then(|n| n.prev).map(NodeHandle)
    }

    pub fn contains(&self, h: NodeHandle) -> bool {
        self.nodes.contains_key(h.0)
    }

    pub fn get(&self, h: NodeHandle) -> Option<&T> {
        self.nodes.get(h.0).map(|n| &n.data)
    }

    pub fn get_mut(&mut self, h: NodeHandle) -> Option<&mut T> {
        self.nodes.get_mut(h.0).map(|n| &mut n.data)
    }

    pub fn front(&self) -> Option<&T> {
        self.first.and_then(|k| self.nodes.get(k)).map(|n| &n.data)
    }

    pub fn back(&self) -> Option<&T> {
        self.last.and_then(|k| self.nodes.get(k)).map(|n| &n.data)
    }

    /// Insert `data` in a new node right after `after`; `None` inserts at
    /// the front.
    pub fn insert_after(
        &mut self,
        after: Option<NodeHandle>,
        data: T,
    ) -> Result<NodeHandle, ListError> {
        if let Some(h) = after {
            if !self.nodes.contains_key(h.0) {
                return Err(ListError::StaleHandle);
            }
        }
        Ok(NodeHandle(self.link_after(after.map(|h| h.0), data)))
    }

    pub fn push_front(&mut self, data: T) -> NodeHandle {
        NodeHandle(self.link_after(None, data))
    }

    pub fn push_back(&mut self, data: T) -> NodeHandle {
        let last = self.last;
        NodeHandle(self.link_after(last, data))
    }

    // `after` must be live.
    fn link_after(&mut self, after: Option<DefaultKey>, data: T) -> DefaultKey {
        debug_assert_eq!(self.first.is_some(), self.last.is_some());
        let next = match after {
            None => self.first,
            Some(a) => self.nodes[a].next,
        };
        let k = self.nodes.insert(Node {
            data,
            prev: after,
            next,
        });
        match after {
            None => self.first = Some(k),
            Some(a) => self.nodes[a].next = Some(k),
        }
        match next {
            None => self.last = Some(k),
            Some(n) => self.nodes[n].prev = Some(k),
        }
        k
    }

    fn unlink(&mut self, k: DefaultKey) -> Option<T> {
        let node = self.nodes.remove(k)?;
        match node.prev {
            None => self.first = node.next,
            Some(p) => self.nodes[p].next = node.next,
        }
        match node.next {
            None => self.last = node.prev,
            Some(n) => self.nodes[n].prev = node.prev,
        }
        debug_assert_eq!(self.first.is_some(), self.last.is_some());
        Some(node.data)
    }

    /// Detach a node and hand its data back to the caller.
    pub fn remove(&mut self, h: NodeHandle) -> Option<T> {
        self.unlink(h.0)
    }

    /// Detach a node and drop its data. Returns whether a node was removed.
    pub fn destroy(&mut self, h: NodeHandle) -> bool {
        self.unlink(h.0).is_some()
    }

    pub fn pop_front(&mut self) -> Option<T> {
        self.first.and_then(|k| self.unlink(k))
    }

    pub fn pop_back(&mut self) -> Option<T> {
        self.last.and_then(|k| self.unlink(k))
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.first = None;
        self.last = None;
    }

    /// Call `f` on every element, front to back.
    pub fn for_each<F>(&self, f: F)
    where
        F: FnMut(&T),
    {
        self.iter().for_each(f)
    }

    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut T),
    {
        let mut cur = self.first;
        while let Some(k) = cur {
            let node = &mut self.nodes[k];
            f(&mut node.data);
            cur = node.next;
        }
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            front: self.first,
            back: self.last,
            remaining: self.nodes.len(),
        }
    }

    /// Handles of every node, front to back.
    pub fn handles(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        core::iter::successors(self.first(), move |h| self.next(*h))
    }

    /// Give up the list structure and hand every element back in order.
    pub fn into_vec(mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len());
        while let Some(v) = self.pop_front() {
            out.push(v);
        }
        out
    }

    /// Sort in place with a three-way comparator.
    ///
    /// Merge sort on the `next` chain: split at the midpoint with a
    /// slow/fast walk, sort each half, then merge. Split recursion is
    /// ⌈log2 n⌉ deep and the merge is iterative. Ties keep the left run's
    /// element first, so the sort is stable. Backward links and the
    /// `first`/`last` ends are repaired in one pass afterwards.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let head = merge_sort(&mut self.nodes, self.first, &mut compare);
        self.first = head;
        let mut prev = None;
        let mut cur = head;
        while let Some(k) = cur {
            let node = &mut self.nodes[k];
            node.prev = prev;
            prev = Some(k);
            cur = node.next;
        }
        self.last = prev;
    }

    pub fn sort(&mut self)
    where
        T: Ord,
    {
        self.sort_by(Ord::cmp);
    }
}

fn merge_sort<T, F>(
    nodes: &mut Nodes<T>,
    head: Option<DefaultKey>,
    compare: &mut F,
) -> Option<DefaultKey>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let head = head?;
    if nodes[head].next.is_none() {
        return Some(head);
    }

    let mut slow = head;
    let mut fast = nodes[head].next;
    while let Some(f) = fast {
        let Some(f2) = nodes[f].next else { break };
        match nodes[slow].next {
            Some(s) => slow = s,
            None => break,
        }
        fast = nodes[f2].next;
    }
    let right = nodes[slow].next.take();

    let left = merge_sort(nodes, Some(head), compare);
    let right = merge_sort(nodes, right, compare);
    merge(nodes, left, right, compare)
}

fn merge<T, F>(
    nodes: &mut Nodes<T>,
    mut a: Option<DefaultKey>,
    mut b: Option<DefaultKey>,
    compare: &mut F,
) -> Option<DefaultKey>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut head = None;
    let mut tail: Option<DefaultKey> = None;
    loop {
        let take = match (a, b) {
            (Some(x), Some(y)) => {
                if compare(&nodes[y].data, &nodes[x].data) == Ordering::Less {
                    b = nodes[y].next;
                    y
                } else {
                    a = nodes[x].next;
                    x
                }
            }
            (Some(rest), None) | (None, Some(rest)) => {
                // The remaining run is already chained.
                match tail {
                    None => head = Some(rest),
                    Some(t) => nodes[t].next = Some(rest),
                }
                break;
            }
            (None, None) => break,
        };
        match tail {
            None => head = Some(take),
            Some(t) => nodes[t].next = Some(take),
        }
        tail = Some(take);
    }
    head
}

/// Iterator over list elements, front to back (or back to front).
pub struct Iter<'a, T> {
    nodes: &'a Nodes<T>,
    front: Option<DefaultKey>,
    back: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.nodes.get(self.front?)?;
        self.front = node.next;
        self.remaining -= 1;
        Some(&node.data)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.nodes.get(self.back?)?;
        self.back = node.prev;
        self.remaining -= 1;
        Some(&node.data)
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

/// Owning iterator, front to back.
pub struct IntoIter<T> {
    list: LinkedList<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;
    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.list.pop_back()
    }
}

impl<T> IntoIterator for LinkedList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;
    fn into_iter(self) -> IntoIter<T> {
        IntoIter { list: self }
    }
}

impl<'a, T> IntoIterator for &'a LinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Structural copy: new nodes holding clones of the same element
/// references, in the same order.
impl<T: Clone> Clone for LinkedList<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T> Extend<T> for LinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for v in iter {
            self.push_back(v);
        }
    }
}

impl<T> FromIterator<T> for LinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut l = LinkedList::new();
        l.extend(iter);
        l
    }
}

impl<T: PartialEq> PartialEq for LinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for LinkedList<T> {}

impl<T: fmt::Debug> fmt::Debug for LinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Walk both directions and check the first/last/length invariant.
    fn assert_consistent<T>(l: &LinkedList<T>) {
        assert_eq!(l.first.is_some(), l.last.is_some());
        let mut steps = 0;
        let mut prev = None;
        let mut cur = l.first;
        while let Some(k) = cur {
            assert_eq!(l.nodes[k].prev, prev);
            prev = Some(k);
            cur = l.nodes[k].next;
            steps += 1;
        }
        assert_eq!(prev, l.last);
        assert_eq!(steps, l.len());

        let mut back_steps = 0;
        let mut cur = l.last;
        while let Some(k) = cur {
            cur = l.nodes[k].prev;
            back_steps += 1;
        }
        assert_eq!(back_steps, l.len());
    }

    fn contents<T: Clone>(l: &LinkedList<T>) -> Vec<T> {
        l.iter().cloned().collect()
    }

    /// Invariant: insert after `None` prepends; after a handle places the new node next to it.
    #[test]
    fn insert_positions() {
        let mut l = LinkedList::new();
        let b = l.push_back("b");
        l.push_front("a");
        let d = l.push_back("d");
        l.insert_after(Some(b), "c").unwrap();
        l.insert_after(Some(d), "e").unwrap();
        l.insert_after(None, "_").unwrap();
        assert_eq!(contents(&l), vec!["_", "a", "b", "c", "d", "e"]);
        assert_eq!(l.back(), Some(&"e"));
        assert_consistent(&l);
    }

    /// Invariant: removing first, middle, last and only nodes keeps both ends consistent.
    #[test]
    fn remove_positions() {
        let mut l = LinkedList::new();
        let hs: Vec<_> = (0..5).map(|i| l.push_back(i)).collect();
        assert_eq!(l.remove(hs[0]), Some(0));
        assert_consistent(&l);
        assert_eq!(l.remove(hs[2]), Some(2));
        assert_consistent(&l);
        assert_eq!(l.remove(hs[4]), Some(4));
        assert_consistent(&l);
        assert_eq!(contents(&l), vec![1, 3]);
        assert!(l.destroy(hs[1]));
        assert!(l.destroy(hs[3]));
        assert!(l.is_empty());
        assert!(l.first().is_none() && l.last().is_none());
        assert_consistent(&l);
    }

    /// Invariant: a removed node's handle is stale; it neither resolves nor accepts inserts.
    #[test]
    fn stale_handle_rejected() {
        let mut l = LinkedList::new();
        let h = l.push_back(1);
        assert_eq!(l.remove(h), Some(1));
        assert_eq!(l.remove(h), None);
        assert!(!l.destroy(h));
        assert_eq!(h.value(&l), None);
        assert_eq!(l.insert_after(Some(h), 2), Err(ListError::StaleHandle));
        let h2 = l.push_back(3);
        assert_ne!(h, h2);
        assert_eq!(h2.value(&l), Some(&3));
    }

    /// Invariant: removing a node and reinserting its data after its old successor moves it.
    #[test]
    fn move_node_after_successor() {
        let mut l: LinkedList<&str> = ["springsteen", "andrew", "plato", "kaitlyn", "cauchy"]
            .into_iter()
            .collect();
        let h = l.handles().find(|h| h.value(&l) == Some(&"andrew")).unwrap();
        let next = l.next(h);
        let name = l.remove(h).unwrap();
        l.insert_after(next, name).unwrap();
        assert_eq!(
            contents(&l),
            vec!["springsteen", "plato", "andrew", "kaitlyn", "cauchy"]
        );
        assert_consistent(&l);
    }

    #[test]
    fn navigation() {
        let mut l = LinkedList::new();
        let a = l.push_back('a');
        let b = l.push_back('b');
        assert_eq!(l.next(a), Some(b));
        assert_eq!(l.prev(b), Some(a));
        assert_eq!(l.prev(a), None);
        assert_eq!(l.next(b), None);
        *b.value_mut(&mut l).unwrap() = 'B';
        assert_eq!(l.iter().rev().copied().collect::<String>(), "Ba");
    }

    /// Invariant: a copy has its own nodes; mutating it leaves the original intact.
    #[test]
    fn clone_is_structural() {
        let names = [String::from("x"), String::from("y"), String::from("z")];
        let mut l: LinkedList<&String> = names.iter().collect();
        let c = l.clone();
        assert_consistent(&c);
        l.pop_front();
        l.push_back(&names[0]);
        assert_eq!(c.len(), 3);
        assert!(core::ptr::eq(*c.front().unwrap(), &names[0]));
        assert!(core::ptr::eq(*c.back().unwrap(), &names[2]));
    }

    #[test]
    fn for_each_in_order() {
        let mut l: LinkedList<i32> = (1..=4).collect();
        let mut seen = Vec::new();
        l.for_each(|v| seen.push(*v));
        assert_eq!(seen, vec![1, 2, 3, 4]);
        l.for_each_mut(|v| *v *= 10);
        assert_eq!(l.into_vec(), vec![10, 20, 30, 40]);
    }

    #[test]
    fn sort_small_cases() {
        let mut e: LinkedList<i32> = LinkedList::new();
        e.sort();
        assert!(e.is_empty());
        assert_consistent(&e);

        let mut one: LinkedList<i32> = core::iter::once(5).collect();
        one.sort();
        assert_eq!(contents(&one), vec![5]);
        assert_consistent(&one);

        let mut l: LinkedList<i32> = [4, 1, 3, 1, 0, 9, 2].into_iter().collect();
        l.sort();
        assert_eq!(contents(&l), vec![0, 1, 1, 2, 3, 4, 9]);
        assert_consistent(&l);
    }

    /// Invariant: equal elements keep their relative order after sorting.
    #[test]
    fn sort_is_stable() {
        let mut l: LinkedList<(u8, char)> =
            [(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd'), (0, 'e'), (2, 'f')]
                .into_iter()
                .collect();
        l.sort_by(|x, y| x.0.cmp(&y.0));
        let tags: String = l.iter().map(|p| p.1).collect();
        assert_eq!(tags, "ebdacf");
        assert_consistent(&l);
    }

    /// Invariant: handles stay valid across a sort and still point at the same data.
    #[test]
    fn handles_survive_sort() {
        let mut l = LinkedList::new();
        let h9 = l.push_back(9);
        let h1 = l.push_back(1);
        l.push_back(5);
        l.sort();
        assert_eq!(l.first(), Some(h1));
        assert_eq!(l.last(), Some(h9));
        assert_eq!(h9.value(&l), Some(&9));
    }

    /// Invariant: long lists sort without deep recursion.
    #[test]
    fn sort_long_list() {
        let mut l: LinkedList<u32> = (0..100_000u32).rev().collect();
        l.sort();
        assert!(l.iter().zip(l.iter().skip(1)).all(|(a, b)| a <= b));
        assert_eq!(l.len(), 100_000);
        assert_consistent(&l);
    }
}
