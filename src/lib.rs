//! Public API for the `netframe` library.
//!
//! This crate provides a minimal point-to-point framed-messaging transport
//! over TCP: a typed [`Frame`] value with a fixed-width header, the blocking
//! [`MessageQueue`] shared between the I/O runtime and the application
//! thread, the [`Connection`] receive/send machinery, and a [`Client`]
//! endpoint that owns its driving runtime.
//!
//! The wire format is documented in the [`frame`] module. Both peers must be
//! built against the same header layout; the format is not self-describing
//! across versions.

pub mod client;
pub mod connection;
pub mod frame;
pub mod queue;

pub use client::{Client, ClientError, SocketOptions};
pub use connection::{Connection, ConnectionError, Envelope, Role};
pub use frame::{Frame, FrameError, FrameKind, HEADER_LEN, WireValue};
pub use queue::MessageQueue;
