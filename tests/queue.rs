//! Contention tests for the blocking message queue.

use std::{
    collections::HashSet,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

use netframe::MessageQueue;

const PRODUCERS: u64 = 4;
const PER_PRODUCER: u64 = 1_000;

#[test]
fn no_items_are_lost_or_duplicated_under_contention() {
    let queue = Arc::new(MessageQueue::new());
    let collected = Arc::new(Mutex::new(Vec::new()));
    let producers_done = Arc::new(AtomicBool::new(false));

    let consumers: Vec<_> = (0..4)
        .map(|_| {
            let queue = Arc::clone(&queue);
            let collected = Arc::clone(&collected);
            let producers_done = Arc::clone(&producers_done);
            thread::spawn(move || loop {
                match queue.pop_front() {
                    Some(item) => collected.lock().expect("collector lock").push(item),
                    None => {
                        if producers_done.load(Ordering::Acquire) && queue.is_empty() {
                            break;
                        }
                        queue.wait_timeout(Duration::from_millis(20));
                    }
                }
            })
        })
        .collect();

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for i in 0..PER_PRODUCER {
                    queue.push_back(p * PER_PRODUCER + i);
                }
            })
        })
        .collect();

    for producer in producers {
        producer.join().expect("producer panicked");
    }
    producers_done.store(true, Ordering::Release);
    for consumer in consumers {
        consumer.join().expect("consumer panicked");
    }

    let collected = collected.lock().expect("collector lock");
    assert_eq!(collected.len() as u64, PRODUCERS * PER_PRODUCER);
    let unique: HashSet<_> = collected.iter().copied().collect();
    assert_eq!(
        unique.len() as u64,
        PRODUCERS * PER_PRODUCER,
        "every pushed item must be popped exactly once"
    );
}

#[test]
fn pops_preserve_per_producer_order() {
    let queue = Arc::new(MessageQueue::new());

    let producers: Vec<_> = (0..2u64)
        .map(|p| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for i in 0..PER_PRODUCER {
                    queue.push_back((p, i));
                    if i % 64 == 0 {
                        thread::yield_now();
                    }
                }
            })
        })
        .collect();

    // Single consumer popping concurrently with the producers.
    let mut last_seen = [None::<u64>; 2];
    let mut popped = 0u64;
    while popped < 2 * PER_PRODUCER {
        if let Some((producer, seq)) = queue.pop_front() {
            let slot = &mut last_seen[producer as usize];
            assert!(
                slot.is_none_or(|previous| previous < seq),
                "items from one producer must come out in push order"
            );
            *slot = Some(seq);
            popped += 1;
        } else {
            queue.wait_timeout(Duration::from_millis(20));
        }
    }

    for producer in producers {
        producer.join().expect("producer panicked");
    }
    assert!(queue.is_empty());
}
