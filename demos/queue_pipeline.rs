//! Producer/consumer pipeline over two bounded queues.
//!
//! Producers send jobs into `jobs`; one consumer per CPU counts primes for
//! each job and reports how many jobs it handled on `results`. Each queue is
//! closed once everything feeding it has been joined, and the main thread
//! sums what is left in `results`.
//!
//! Run with `cargo run --release --example queue_pipeline`.

use ds_collections::BoundedQueue;
use std::sync::Arc;
use std::thread;

const JOBS: usize = 100_000;
const BUFFER: usize = 10;
const PRODUCERS: usize = 1;

fn count_primes(limit: u32) -> u32 {
    (2..=limit)
        .filter(|&n| (2..n).take_while(|d| d * d <= n).all(|d| n % d != 0))
        .count() as u32
}

fn main() {
    let consumers = thread::available_parallelism().map_or(1, |n| n.get());

    let jobs = Arc::new(BoundedQueue::new(BUFFER));
    // Every consumer can report without blocking.
    let results = Arc::new(BoundedQueue::new(consumers));

    let producer_threads: Vec<_> = (0..PRODUCERS)
        .map(|id| {
            let jobs = jobs.clone();
            thread::spawn(move || {
                let n = JOBS / PRODUCERS;
                for job in 0..n {
                    jobs.push(Box::new(job));
                }
                println!("Thread {id} produced {n} items.");
            })
        })
        .collect();

    let consumer_threads: Vec<_> = (0..consumers)
        .map(|id| {
            let (jobs, results) = (jobs.clone(), results.clone());
            thread::spawn(move || {
                let mut count = 0usize;
                let mut primes = 0u32;
                for _job in jobs.drain() {
                    count += 1;
                    primes = primes.wrapping_add(count_primes(1000));
                }
                println!("Thread {id} consumed {count} items ({primes} primes).");
                results.push(count);
            })
        })
        .collect();

    for t in producer_threads {
        if t.join().is_err() {
            eprintln!("producer thread panicked");
        }
    }
    jobs.close();

    for t in consumer_threads {
        if t.join().is_err() {
            eprintln!("consumer thread panicked");
        }
    }
    results.close();

    let consumed: usize = results.drain().sum();
    println!("Total produced: {}", (JOBS / PRODUCERS) * PRODUCERS);
    println!("Total consumed: {consumed}");
}
