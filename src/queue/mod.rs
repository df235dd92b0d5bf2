//! Blocking, thread-safe message queue.
//!
//! A [`MessageQueue`] is the hand-off point between the runtime thread that
//! drives socket completions and the application thread that consumes
//! messages. A single lock guards all mutation and the condition variable
//! waits under that same lock, so a [`wait`](MessageQueue::wait) can never
//! miss a concurrent push.

use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use parking_lot::{Condvar, Mutex};

/// Ordered queue of items shared between threads.
///
/// Pushes never block and never fail. Pops are non-blocking and return
/// `None` when the queue is empty; [`wait`](MessageQueue::wait) is the sole
/// blocking entry point for consumers.
#[derive(Debug)]
pub struct MessageQueue<E> {
    items: Mutex<VecDeque<E>>,
    available: Condvar,
}

impl<E> Default for MessageQueue<E> {
    fn default() -> Self { Self::new() }
}

impl<E> MessageQueue<E> {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
        }
    }

    /// Append an item to the tail, waking one blocked waiter.
    pub fn push_back(&self, item: E) {
        let mut items = self.items.lock();
        items.push_back(item);
        self.available.notify_one();
    }

    /// Insert an item at the head, ahead of everything queued so far. Used to
    /// re-queue an item with priority. Wakes one blocked waiter.
    pub fn push_front(&self, item: E) {
        let mut items = self.items.lock();
        items.push_front(item);
        self.available.notify_one();
    }

    /// Remove and return the head item, or `None` if the queue is empty.
    pub fn pop_front(&self) -> Option<E> { self.items.lock().pop_front() }

    /// Remove and return the tail item, or `None` if the queue is empty.
    pub fn pop_back(&self) -> Option<E> { self.items.lock().pop_back() }

    /// Block the calling thread until the queue is non-empty.
    ///
    /// Returns immediately if an item is already queued. A wakeup does not
    /// reserve the item: another consumer may pop it first, so callers should
    /// treat a subsequent [`pop_front`](Self::pop_front) as fallible.
    pub fn wait(&self) {
        let mut items = self.items.lock();
        while items.is_empty() {
            self.available.wait(&mut items);
        }
    }

    /// Block until the queue is non-empty or `timeout` elapses.
    ///
    /// Returns `true` if the queue was observed non-empty before the deadline.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut items = self.items.lock();
        while items.is_empty() {
            if self.available.wait_until(&mut items, deadline).timed_out() {
                return !items.is_empty();
            }
        }
        true
    }

    /// Discard all queued items.
    pub fn clear(&self) { self.items.lock().clear(); }

    /// Number of queued items.
    #[must_use]
    pub fn len(&self) -> usize { self.items.lock().len() }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.items.lock().is_empty() }
}
