//! ds-collections: general-purpose building blocks. A growable array, a
//! doubly linked list, a chained hash map with ordered keys, and a bounded
//! blocking queue.
//!
//! Internal Design:
//!
//! Summary
//! - Four independent containers; the only composition is the hash map's
//!   use of `DynArray` to track its keys in iteration order.
//!   - DynArray<T>: contiguous storage with a fixed 1.5x growth schedule
//!     and an in-place quicksort.
//!   - LinkedList<T>: nodes in a generational arena, addressed by
//!     `NodeHandle`; O(1) insert/unlink at a handle; in-place merge sort.
//!   - ChainedHashMap<V, S>: integer or string keys, fixed bucket table,
//!     separate chaining, tracked-key order for iteration and sorting.
//!   - BoundedQueue<T>: mutex + condition variable ring buffer with an
//!     explicit, one-way close.
//!
//! Element ownership
//! - Containers are generic over the element type and never inspect it.
//!   Whether the container "owns" the data is decided by that type: store
//!   `&T`, `Rc<T>` or `Arc<T>` to keep ownership with the caller, or an owned
//!   type to have the container release it on drop.
//! - Every operation that detaches an element hands it back (`remove`,
//!   `pop`, replacing `insert`), so the caller chooses whether it is released.
//!   `into_vec`/`into_entries` give back everything at teardown.
//!
//! Handles
//! - `NodeHandle` and `KeyHandle` wrap `slotmap` keys. They are plain
//!   values with no back-pointer; resolving one is an explicit call taking
//!   the container (`h.value(&list)`, `h.value(&map)`). A handle whose
//!   entry was removed never resolves again, even if the slot is reused.
//!
//! Failure classes
//! - Contract violations panic: pushing into a closed queue, a
//!   zero-capacity queue, a map with zero buckets. Allocation failure aborts,
//!   as everywhere in `std`.
//! - Expected conditions are values: out-of-range indices, missing keys,
//!   stale handles and a drained closed queue return `None` or an error from
//!   `error`.
//!
//! Concurrency
//! - Only `BoundedQueue` synchronizes. It is `Send + Sync` for `T: Send`
//!   and is shared through `Arc`. The other containers need external
//!   locking to be shared across threads.
//!
//! Notes and non-goals
//! - The hash map never resizes; its bucket count is fixed at
//!   construction (`DEFAULT_BUCKETS` unless `with_buckets` is used).
//! - Removing a map entry scans the tracked-key array, so removal is
//!   linear in the number of entries.
//! - No lock-free paths, timeouts or cancellation on the queue.

pub mod bounded_queue;
pub mod chained_hash_map;
mod chained_hash_map_proptest;
pub mod dyn_array;
pub mod error;
pub mod key;
pub mod linked_list;

// Public surface
pub use bounded_queue::BoundedQueue;
pub use chained_hash_map::{ChainedHashMap, KeyHandle, DEFAULT_BUCKETS};
pub use dyn_array::DynArray;
pub use error::{ListError, TryPopError, TryPushError};
pub use key::{compare_keys, Key, KeyRef};
pub use linked_list::{LinkedList, NodeHandle};
