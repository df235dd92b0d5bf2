//! Client endpoint owning the driving runtime for one connection.
//!
//! A [`Client`] bundles the three things the application needs: a background
//! Tokio runtime whose single worker thread drives every read and write
//! completion, the client-owned [`Connection`], and the shared inbound
//! [`MessageQueue`] the application drains. The application thread's only
//! suspension point is [`MessageQueue::wait`] on that queue.

mod config;
mod error;

use std::{
    fmt,
    net::{SocketAddr, ToSocketAddrs},
    sync::Arc,
};

use log::{debug, error};
use tokio::runtime::{Builder, Runtime};

pub use self::{config::SocketOptions, error::ClientError};
use crate::{
    connection::{Connection, Envelope, Role},
    frame::{Frame, FrameKind},
    queue::MessageQueue,
};

/// Client endpoint for a framed TCP channel.
///
/// # Examples
///
/// ```no_run
/// use netframe::{Client, Frame};
///
/// # fn main() -> Result<(), netframe::ClientError> {
/// let mut client: Client<u32> = Client::new();
/// client.connect("127.0.0.1", 52000)?;
///
/// let mut ping = Frame::new(1u32);
/// ping.push(42u64);
/// client.send(ping);
///
/// client.incoming().wait();
/// if let Some(envelope) = client.incoming().pop_front() {
///     println!("got frame kind {}", envelope.frame.kind());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Client<T: FrameKind> {
    runtime: Option<Runtime>,
    connection: Option<Arc<Connection<T>>>,
    incoming: Arc<MessageQueue<Envelope<T>>>,
    options: SocketOptions,
}

impl<T: FrameKind> fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("connected", &self.is_connected())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<T: FrameKind> Default for Client<T> {
    fn default() -> Self { Self::new() }
}

impl<T: FrameKind> Client<T> {
    /// Create an endpoint with no connection and an empty inbound queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            runtime: None,
            connection: None,
            incoming: Arc::new(MessageQueue::new()),
            options: SocketOptions::default(),
        }
    }

    /// Replace the socket options applied at the next connect.
    #[must_use]
    pub fn socket_options(mut self, options: SocketOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve `host:port` and establish the connection.
    ///
    /// Builds the background runtime whose single worker thread drives every
    /// completion for this endpoint, then blocks until the connect attempt
    /// resolves. On failure the runtime is torn down before returning, so a
    /// failed connect leaves no background thread behind. Connecting while
    /// already connected tears the previous connection down first.
    ///
    /// Must not be called from inside an async runtime; it blocks the
    /// calling thread.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if resolution, runtime construction, or the
    /// connect attempt fails.
    pub fn connect(&mut self, host: &str, port: u16) -> Result<(), ClientError> {
        self.teardown();

        let addrs: Vec<SocketAddr> = (host, port)
            .to_socket_addrs()
            .map_err(|e| {
                error!("failed to resolve {host}:{port}: {e}");
                ClientError::Resolve(e)
            })?
            .collect();
        if addrs.is_empty() {
            return Err(ClientError::NoAddresses {
                host: host.to_owned(),
                port,
            });
        }

        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("netframe-io")
            .enable_io()
            .enable_time()
            .build()
            .map_err(ClientError::Runtime)?;

        let connection = Connection::new(
            Role::Client,
            runtime.handle().clone(),
            Arc::clone(&self.incoming),
        );
        match runtime.block_on(connection.connect_to_server(&addrs, &self.options)) {
            Ok(()) => {
                self.runtime = Some(runtime);
                self.connection = Some(connection);
                Ok(())
            }
            Err(e) => {
                error!("client connect to {host}:{port} failed: {e}");
                drop(runtime);
                Err(e.into())
            }
        }
    }

    /// Forward a frame to the peer if currently connected.
    ///
    /// When not connected the frame is silently dropped; there is no
    /// buffering and no delivery guarantee.
    pub fn send(&self, frame: Frame<T>) {
        match &self.connection {
            Some(connection) if connection.is_connected() => {
                if !connection.send(frame) {
                    debug!("dropping outbound frame: connection is shutting down");
                }
            }
            _ => debug!("dropping outbound frame: not connected"),
        }
    }

    /// Whether the endpoint currently holds an open connection.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connection
            .as_ref()
            .is_some_and(|connection| connection.is_connected())
    }

    /// The shared inbound queue for the application to drain.
    #[must_use]
    pub fn incoming(&self) -> &MessageQueue<Envelope<T>> { &self.incoming }

    /// Request closure of the current connection, if any.
    ///
    /// The close happens asynchronously on the driving runtime; poll
    /// [`is_connected`](Self::is_connected) to observe it.
    pub fn disconnect(&mut self) {
        if let Some(connection) = &self.connection {
            connection.disconnect();
        }
    }

    /// Disconnect and join the driving runtime.
    fn teardown(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.disconnect();
        }
        if let Some(runtime) = self.runtime.take() {
            // Dropping the runtime joins the driving thread.
            drop(runtime);
        }
    }
}

impl<T: FrameKind> Drop for Client<T> {
    fn drop(&mut self) { self.teardown(); }
}

#[cfg(test)]
mod tests;
