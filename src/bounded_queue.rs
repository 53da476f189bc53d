//! BoundedQueue: blocking, fixed-capacity FIFO for any number of producer
//! and consumer threads.
//!
//! A single mutex guards the ring buffer, its head position, the buffered
//! length and the closed flag. One condition variable is broadcast after
//! every push, every pop and on close; waiters re-check state in a loop.
//!
//! States:
//! - open: `push` and `pop` both accepted.
//! - closed: `push` panics; `pop` drains what is still buffered.
//! - closed and empty: `pop` returns `None` immediately, forever.
//!
//! A queue is normally shared through an `Arc`. Close it once every producer
//! is done; consumers then pop until `None`.

use crate::error::{TryPopError, TryPushError};
use core::fmt;
use parking_lot::{Condvar, Mutex};

struct Ring<T> {
    buf: Box<[Option<T>]>,
    head: usize,
    len: usize,
    closed: bool,
}

impl<T> Ring<T> {
    fn is_full(&self) -> bool {
        self.len == self.buf.len()
    }

    fn push_back(&mut self, item: T) {
        debug_assert!(!self.is_full());
        let tail = (self.head + self.len) % self.buf.len();
        self.buf[tail] = Some(item);
        self.len += 1;
    }

    fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let item = self.buf[self.head].take();
        self.head = (self.head + 1) % self.buf.len();
        self.len -= 1;
        item
    }
}

pub struct BoundedQueue<T> {
    ring: Mutex<Ring<T>>,
    changed: Condvar,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Create an open queue holding at most `capacity` items.
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "BoundedQueue capacity must be non-zero");
        Self {
            ring: Mutex::new(Ring {
                buf: (0..capacity).map(|_| None).collect(),
                head: 0,
                len: 0,
                closed: false,
            }),
            changed: Condvar::new(),
            capacity,
        }
    }

    /// Append `item`, blocking while the queue is full.
    ///
    /// Panics if the queue is closed, including when it is closed while
    /// this call is waiting for space.
    pub fn push(&self, item: T) {
        let mut ring = self.ring.lock();
        loop {
            assert!(!ring.closed, "push on a closed BoundedQueue");
            if !ring.is_full() {
                break;
            }
            self.changed.wait(&mut ring);
        }
        ring.push_back(item);
        drop(ring);
        self.changed.notify_all();
    }

    /// Remove the oldest item, blocking while the queue is empty and open.
    ///
    /// Returns `None` once the queue is closed and drained; that call never
    /// blocks.
    pub fn pop(&self) -> Option<T> {
        let mut ring = self.ring.lock();
        loop {
            if ring.len > 0 {
                let item = ring.pop_front();
                drop(ring);
                self.changed.notify_all();
                return item;
            }
            if ring.closed {
                return None;
            }
            self.changed.wait(&mut ring);
        }
    }

    /// Append without blocking. The item is handed back if the queue is
    /// full or closed.
    pub fn try_push(&self, item: T) -> Result<(), TryPushError<T>> {
        let mut ring = self.ring.lock();
        if ring.closed {
            return Err(TryPushError::Closed(item));
        }
        if ring.is_full() {
            return Err(TryPushError::Full(item));
        }
        ring.push_back(item);
        drop(ring);
        self.changed.notify_all();
        Ok(())
    }

    /// Remove the oldest item without blocking.
    pub fn try_pop(&self) -> Result<T, TryPopError> {
        let mut ring = self.ring.lock();
        match ring.pop_front() {
            Some(item) => {
                drop(ring);
                self.changed.notify_all();
                Ok(item)
            }
            None if ring.closed => Err(TryPopError::Closed),
            None => Err(TryPopError::Empty),
        }
    }

    /// Close the queue and wake every blocked caller. Closing twice is
    /// harmless.
    pub fn close(&self) {
        let mut ring = self.ring.lock();
        ring.closed = true;
        drop(ring);
        self.changed.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.ring.lock().closed
    }

    /// Number of buffered items at this instant.
    pub fn len(&self) -> usize {
        self.ring.lock().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Blocking iterator that pops until the queue is closed and drained.
    pub fn drain(&self) -> Drain<'_, T> {
        Drain { queue: self }
    }
}

impl<T> fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ring = self.ring.lock();
        f.debug_struct("BoundedQueue")
            .field("len", &ring.len)
            .field("capacity", &self.capacity)
            .field("closed", &ring.closed)
            .finish()
    }
}

/// Iterator returned by `BoundedQueue::drain`.
pub struct Drain<'a, T> {
    queue: &'a BoundedQueue<T>,
}

impl<'a, T> Iterator for Drain<'a, T> {
    type Item = T;
    fn next(&mut self) -> Option<T> {
        self.queue.pop()
    }
}
