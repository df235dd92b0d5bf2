//! Shared utilities for integration tests.
//!
//! Provides a test frame-kind enum, raw wire-encoding helpers for stub
//! peers, and polling helpers for draining the inbound queue.

// Items in this shared module may not be used by all test binaries that import it.
#![allow(
    dead_code,
    reason = "shared test utilities are not used by all test binaries"
)]

use std::time::Duration;

use netframe::{Envelope, FrameKind, MessageQueue};
use tokio::time::{sleep, timeout};

pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Frame kinds used by the stub peers in these tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Ping,
    ServerPing,
    Note,
}

impl FrameKind for Kind {
    fn to_wire(self) -> u32 {
        match self {
            Self::Ping => 0,
            Self::ServerPing => 1,
            Self::Note => 2,
        }
    }

    fn from_wire(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Ping),
            1 => Some(Self::ServerPing),
            2 => Some(Self::Note),
            _ => None,
        }
    }
}

/// Raw wire encoding of one frame, for stub peers that write bytes directly.
pub fn frame_bytes(kind: u32, body: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(8 + body.len());
    bytes.extend_from_slice(&kind.to_le_bytes());
    bytes.extend_from_slice(&u32::try_from(body.len()).expect("test body fits u32").to_le_bytes());
    bytes.extend_from_slice(body);
    bytes
}

/// Poll the queue from async context until an envelope arrives.
///
/// The blocking `wait()` cannot be used on a runtime thread, so tests on a
/// Tokio runtime poll with a short sleep instead.
pub async fn recv_envelope<T: FrameKind>(queue: &MessageQueue<Envelope<T>>) -> Envelope<T> {
    timeout(Duration::from_secs(5), async {
        loop {
            if let Some(envelope) = queue.pop_front() {
                return envelope;
            }
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("timed out waiting for an envelope")
}

/// Poll until `condition` holds or the deadline passes.
pub async fn eventually(condition: impl Fn() -> bool) -> bool {
    timeout(Duration::from_secs(5), async {
        while !condition() {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .is_ok()
}

/// Blocking counterpart of [`eventually`] for tests that drive a [`Client`]
/// from an ordinary thread.
///
/// [`Client`]: netframe::Client
pub fn poll_until(deadline: Duration, condition: impl Fn() -> bool) -> bool {
    let start = std::time::Instant::now();
    while start.elapsed() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    condition()
}
