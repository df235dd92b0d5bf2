//! Error types for client endpoint operations.

use std::io;

use crate::connection::ConnectionError;

/// Errors emitted by [`crate::Client`].
///
/// All of these are setup failures, reported synchronously before any frame
/// traffic begins. Mid-stream I/O failures are never surfaced here; the
/// application observes them via `is_connected()` turning false.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Host name resolution failed.
    #[error("failed to resolve peer address: {0}")]
    Resolve(#[source] io::Error),
    /// Resolution succeeded but produced no usable addresses.
    #[error("no addresses resolved for {host}:{port}")]
    NoAddresses { host: String, port: u16 },
    /// The background runtime could not be built.
    #[error("failed to build the I/O runtime: {0}")]
    Runtime(#[source] io::Error),
    /// The connection could not be established.
    #[error(transparent)]
    Connect(#[from] ConnectionError),
}
