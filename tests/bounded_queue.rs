// BoundedQueue multi-threaded test suite.
//
// Each test documents the behavior verified. Core invariants exercised:
// - FIFO: items leave in the order they entered.
// - Capacity: a push into a full queue waits for a pop.
// - Close: blocked poppers wake and see "no more data" once drained;
//   blocked pushers wake and fail.
// - Conservation: under many producers and consumers every item is
//   popped exactly once.
use ds_collections::{BoundedQueue, TryPopError};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

// Test: one producer thread, one consumer thread.
// Verifies: 1, 2, 3 arrive as 1, 2, 3, then None after close.
#[test]
#[cfg_attr(miri, ignore)]
fn fifo_across_threads() {
    let q = Arc::new(BoundedQueue::new(2));
    let producer = {
        let q = q.clone();
        thread::spawn(move || {
            for i in 1..=3 {
                q.push(i);
            }
            q.close();
        })
    };
    let got: Vec<i32> = q.drain().collect();
    producer.join().unwrap();
    assert_eq!(got, vec![1, 2, 3]);
}

// Test: capacity blocking.
// Assumes: a capacity-2 queue holding two items is full.
// Verifies: a third push stays suspended until one pop, then completes.
#[test]
#[cfg_attr(miri, ignore)]
fn push_blocks_until_pop() {
    let q = Arc::new(BoundedQueue::new(2));
    q.push('a');
    q.push('b');

    let done = Arc::new(AtomicBool::new(false));
    let pusher = {
        let (q, done) = (q.clone(), done.clone());
        thread::spawn(move || {
            q.push('c');
            done.store(true, Ordering::SeqCst);
        })
    };

    thread::sleep(Duration::from_millis(100));
    assert!(!done.load(Ordering::SeqCst), "push must wait while full");
    assert_eq!(q.len(), 2);

    assert_eq!(q.pop(), Some('a'));
    pusher.join().unwrap();
    assert!(done.load(Ordering::SeqCst));
    assert_eq!(q.pop(), Some('b'));
    assert_eq!(q.pop(), Some('c'));
}

// Test: pop waits on an empty open queue.
// Verifies: the consumer receives an item pushed later.
#[test]
#[cfg_attr(miri, ignore)]
fn pop_blocks_until_push() {
    let q = Arc::new(BoundedQueue::new(1));
    let consumer = {
        let q = q.clone();
        thread::spawn(move || q.pop())
    };
    thread::sleep(Duration::from_millis(50));
    q.push(42u64);
    assert_eq!(consumer.join().unwrap(), Some(42));
}

// Test: close wakes blocked consumers.
// Verifies: every waiting pop returns None without any push.
#[test]
#[cfg_attr(miri, ignore)]
fn close_wakes_waiting_consumers() {
    let q: Arc<BoundedQueue<u8>> = Arc::new(BoundedQueue::new(4));
    let waiters: Vec<_> = (0..3)
        .map(|_| {
            let q = q.clone();
            thread::spawn(move || q.pop())
        })
        .collect();
    thread::sleep(Duration::from_millis(50));
    q.close();
    for w in waiters {
        assert_eq!(w.join().unwrap(), None);
    }
    assert_eq!(q.try_pop(), Err(TryPopError::Closed));
}

// Test: close wakes blocked producers.
// Verifies: a push waiting for space observes the close and panics; the
// queue stays usable for draining.
#[test]
#[cfg_attr(miri, ignore)]
fn close_fails_waiting_producer() {
    let q = Arc::new(BoundedQueue::new(1));
    q.push(1);
    let pusher = {
        let q = q.clone();
        thread::spawn(move || q.push(2))
    };
    thread::sleep(Duration::from_millis(50));
    q.close();
    assert!(pusher.join().is_err(), "push into a closed queue must panic");
    assert_eq!(q.pop(), Some(1));
    assert_eq!(q.pop(), None);
}

// Test: conservation under contention.
// Assumes: producers finish before close; consumers pop until None.
// Verifies: P x M items are popped exactly once each, and each producer's
// items keep their relative order.
#[test]
#[cfg_attr(miri, ignore)]
fn stress_many_producers_many_consumers() {
    const PRODUCERS: usize = 4;
    const CONSUMERS: usize = 4;
    const PER_PRODUCER: usize = 5_000;

    let q = Arc::new(BoundedQueue::new(8));
    let producers: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let q = q.clone();
            thread::spawn(move || {
                for i in 0..PER_PRODUCER {
                    q.push((p, i));
                }
            })
        })
        .collect();
    let consumers: Vec<_> = (0..CONSUMERS)
        .map(|_| {
            let q = q.clone();
            thread::spawn(move || {
                let mut got = Vec::new();
                while let Some(item) = q.pop() {
                    got.push(item);
                }
                got
            })
        })
        .collect();

    for p in producers {
        p.join().unwrap();
    }
    q.close();

    let mut all = BTreeSet::new();
    let mut total = 0;
    for c in consumers {
        let got = c.join().unwrap();
        // Within one consumer, items from the same producer stay ordered.
        for p in 0..PRODUCERS {
            let seq: Vec<usize> = got.iter().filter(|x| x.0 == p).map(|x| x.1).collect();
            assert!(seq.windows(2).all(|w| w[0] < w[1]));
        }
        total += got.len();
        all.extend(got);
    }
    assert_eq!(total, PRODUCERS * PER_PRODUCER);
    assert_eq!(all.len(), PRODUCERS * PER_PRODUCER);
}

// Test: two-stage pipeline.
// Assumes: the job queue is closed after producers join and the results
// queue after consumers join.
// Verifies: the sum of per-consumer counts equals the number of jobs.
#[test]
#[cfg_attr(miri, ignore)]
fn pipeline_counts_match() {
    const JOBS: usize = 2_000;
    const WORKERS: usize = 3;

    let jobs = Arc::new(BoundedQueue::new(10));
    let results = Arc::new(BoundedQueue::new(WORKERS));
    let produced = Arc::new(AtomicUsize::new(0));

    let producer = {
        let (jobs, produced) = (jobs.clone(), produced.clone());
        thread::spawn(move || {
            for j in 0..JOBS {
                jobs.push(Box::new(j));
                produced.fetch_add(1, Ordering::Relaxed);
            }
        })
    };
    let workers: Vec<_> = (0..WORKERS)
        .map(|_| {
            let (jobs, results) = (jobs.clone(), results.clone());
            thread::spawn(move || {
                let count = jobs.drain().count();
                results.push(count);
            })
        })
        .collect();

    producer.join().unwrap();
    jobs.close();
    for w in workers {
        w.join().unwrap();
    }
    results.close();

    let consumed: usize = results.drain().sum();
    assert_eq!(produced.load(Ordering::Relaxed), JOBS);
    assert_eq!(consumed, JOBS);
}

#[test]
fn queue_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BoundedQueue<String>>();
    assert_send_sync::<Arc<BoundedQueue<Box<u32>>>>();
}
