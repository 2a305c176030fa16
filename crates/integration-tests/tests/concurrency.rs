//! Concurrency and Race Condition Tests
//!
//! Many producers and consumers sharing one queue

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};
use tether_core::{ConcurrentQueue, QueueConfig};

fn fast_queue<T>(capacity: Option<usize>) -> Arc<ConcurrentQueue<T>> {
    let config = QueueConfig::from_capacity(capacity)
        .unwrap()
        .with_poll_interval(Duration::from_millis(10))
        .unwrap();
    Arc::new(ConcurrentQueue::with_config(config))
}

/// No loss, no duplication: N producers x 1 item, N consumers x 1 pop
#[test]
fn test_each_item_delivered_exactly_once() {
    const N: usize = 16;
    let queue: Arc<ConcurrentQueue<usize>> = fast_queue(None);
    let barrier = Arc::new(Barrier::new(2 * N));

    let consumers: Vec<_> = (0..N)
        .map(|_| {
            let queue = Arc::clone(&queue);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                queue.pop()
            })
        })
        .collect();

    let producers: Vec<_> = (0..N)
        .map(|i| {
            let queue = Arc::clone(&queue);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                assert!(queue.push(i));
            })
        })
        .collect();

    for producer in producers {
        producer.join().unwrap();
    }
    let received: Vec<usize> = consumers
        .into_iter()
        .map(|c| c.join().unwrap().expect("consumer got nothing"))
        .collect();

    let unique: HashSet<usize> = received.iter().copied().collect();
    assert_eq!(received.len(), N);
    assert_eq!(unique, (0..N).collect::<HashSet<_>>());
    assert_eq!(queue.size(), 0);
}

/// Per-producer FIFO survives interleaving with other producers
#[test]
fn test_per_producer_order_preserved() {
    const PRODUCERS: usize = 4;
    const PER_PRODUCER: u32 = 500;
    let queue: Arc<ConcurrentQueue<(usize, u32)>> = fast_queue(None);

    let handles: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for seq in 0..PER_PRODUCER {
                    queue.push((p, seq));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let mut last_seen = vec![None; PRODUCERS];
    while let Some((p, seq)) = queue.try_pop() {
        if let Some(prev) = last_seen[p] {
            assert!(seq > prev, "producer {} out of order: {} after {}", p, seq, prev);
        }
        last_seen[p] = Some(seq);
    }
    assert!(last_seen.iter().all(|s| *s == Some(PER_PRODUCER - 1)));
}

/// Bounded queue under concurrent pushes never exceeds its capacity
#[test]
fn test_capacity_holds_under_contention() {
    const CAPACITY: usize = 8;
    let queue: Arc<ConcurrentQueue<u64>> = fast_queue(Some(CAPACITY));

    let producers: Vec<_> = (0..4)
        .map(|p| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for i in 0..1000u64 {
                    queue.push(p * 10_000 + i);
                    assert!(queue.size() <= CAPACITY);
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }

    let stats = queue.stats();
    assert_eq!(queue.size(), CAPACITY);
    assert_eq!(stats.pushed, 4000);
    assert_eq!(stats.evicted, 4000 - CAPACITY as u64);
}

/// stop() wakes every blocked consumer within a poll interval or so
#[test]
fn test_stop_wakes_all_blocked_consumers() {
    const CONSUMERS: usize = 8;
    let queue: Arc<ConcurrentQueue<i32>> = fast_queue(None);

    let consumers: Vec<_> = (0..CONSUMERS)
        .map(|i| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                if i % 2 == 0 {
                    queue.pop()
                } else {
                    queue.pop_timed(Duration::from_secs(30))
                }
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(50));
    let stopped_at = Instant::now();
    queue.stop();

    for consumer in consumers {
        assert_eq!(consumer.join().unwrap(), None);
    }
    assert!(stopped_at.elapsed() < Duration::from_secs(2));
    assert!(!queue.running());
}

/// Producers racing a stop: every accepted item is either popped or discarded
#[test]
fn test_accounting_across_stop() {
    let queue: Arc<ConcurrentQueue<u32>> = fast_queue(Some(64));
    let consumer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            let mut popped = 0u64;
            while queue.pop().is_some() {
                popped += 1;
            }
            popped
        })
    };
    let producers: Vec<_> = (0..3)
        .map(|_| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                let mut accepted = 0u64;
                let mut i = 0u32;
                while queue.push(i) {
                    accepted += 1;
                    i = i.wrapping_add(1);
                    if i % 64 == 0 {
                        thread::yield_now();
                    }
                }
                accepted
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(100));
    queue.stop();

    let accepted: u64 = producers.into_iter().map(|p| p.join().unwrap()).sum();
    let popped = consumer.join().unwrap();
    let stats = queue.stats();

    assert_eq!(stats.pushed, accepted);
    assert_eq!(stats.popped, popped);
    assert_eq!(accepted, stats.popped + stats.evicted + stats.discarded_on_stop);
}
