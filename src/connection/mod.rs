//! Point-to-point connection machinery.
//!
//! A [`Connection`] owns one TCP socket and runs two tasks on its driving
//! runtime: a reader that reassembles frames through a two-phase
//! header-then-body cycle, and a writer that drains the per-connection
//! outbound channel so partial writes never interleave. Completed frames are
//! wrapped in an [`Envelope`] and pushed into the owner's shared
//! [`MessageQueue`].
//!
//! The socket and the in-flight receive buffer are only ever touched by the
//! driving runtime; the rest of the process interacts with a connection
//! through [`send`](Connection::send), [`disconnect`](Connection::disconnect),
//! and the queue, all of which are safe from any thread.
//!
//! The client endpoint drives its runtime with exactly one worker thread. A
//! server deployment may hand connections a runtime with more workers; each
//! connection's reads stay serialized regardless, because one reader task
//! owns the read half of the socket.

mod recv;
mod send;

use std::{
    fmt, io,
    net::SocketAddr,
    sync::{
        Arc, Weak,
        atomic::{AtomicBool, AtomicU32, Ordering},
    },
};

use log::warn;
use parking_lot::Mutex;
use tokio::{net::TcpStream, runtime::Handle, sync::mpsc};
use tokio_util::sync::CancellationToken;

use crate::{
    client::SocketOptions,
    frame::{Frame, FrameKind},
    queue::MessageQueue,
};

/// Which side of the transport owns a connection, fixed at construction.
///
/// The role decides which connect entry point is legal and whether inbound
/// envelopes carry an origin back-reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Owned by the listening side; created from an accepted socket.
    Server,
    /// Owned by the connecting side; a client has at most one peer.
    Client,
}

/// A fully reassembled inbound frame as stored in the shared queue.
///
/// Ownership is exclusive: an envelope is created by the connection that
/// reassembled it and moved out of the queue on pop.
#[derive(Debug)]
pub struct Envelope<T: FrameKind> {
    /// Weak back-reference to the producing connection. Populated on
    /// server-owned connections so the application can tell peers apart;
    /// `None` on client-owned connections. Holding it weak means stale
    /// envelopes never keep a dead connection alive.
    pub origin: Option<Weak<Connection<T>>>,
    /// The reassembled message.
    pub frame: Frame<T>,
}

impl<T: FrameKind> Envelope<T> {
    /// Identity of the producing connection, if it is still alive.
    #[must_use]
    pub fn origin_id(&self) -> Option<u32> {
        self.origin.as_ref().and_then(Weak::upgrade).map(|c| c.id())
    }
}

/// Errors emitted by [`Connection`] setup operations.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// A client-only operation was called on a server-owned connection, or
    /// vice versa.
    #[error("operation is not legal for a {role:?}-owned connection")]
    WrongRole { role: Role },
    /// The connect attempt or socket configuration failed.
    #[error("transport error: {0}")]
    Io(#[from] io::Error),
}

/// One end of a framed TCP channel.
///
/// Connections are reference counted; completions hold strong handles while
/// the tasks run, and envelopes hold weak ones. Create with
/// [`Connection::new`], then start the receive cycle with the role-matching
/// connect operation.
pub struct Connection<T: FrameKind> {
    role: Role,
    /// Assigned by the server side at accept time; 0 until then. Not used by
    /// the client role.
    id: AtomicU32,
    handle: Handle,
    incoming: Arc<MessageQueue<Envelope<T>>>,
    connected: AtomicBool,
    outbound: Mutex<Option<mpsc::UnboundedSender<Frame<T>>>>,
    shutdown: CancellationToken,
    weak_self: Weak<Self>,
}

impl<T: FrameKind> fmt::Debug for Connection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("role", &self.role)
            .field("id", &self.id())
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}

impl<T: FrameKind> Connection<T> {
    /// Create an unconnected connection bound to a driving runtime and the
    /// owner's shared inbound queue.
    #[must_use]
    pub fn new(role: Role, handle: Handle, incoming: Arc<MessageQueue<Envelope<T>>>) -> Arc<Self> {
        Arc::new_cyclic(|weak_self| Self {
            role,
            id: AtomicU32::new(0),
            handle,
            incoming,
            connected: AtomicBool::new(false),
            outbound: Mutex::new(None),
            shutdown: CancellationToken::new(),
            weak_self: weak_self.clone(),
        })
    }

    /// Connect to a server and start the receive cycle.
    ///
    /// Legal only for client-owned connections. Each resolved address is
    /// tried in turn; on success the socket options are applied and the
    /// header read is armed. On failure the connection stays unconnected.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::WrongRole`] for a server-owned connection,
    /// or the underlying I/O error if no address accepted the connection.
    pub async fn connect_to_server(
        &self,
        addrs: &[SocketAddr],
        options: &SocketOptions,
    ) -> Result<(), ConnectionError> {
        if self.role != Role::Client {
            warn!("connect_to_server called on a {:?}-owned connection", self.role);
            return Err(ConnectionError::WrongRole { role: self.role });
        }
        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect(addr).await {
                Ok(stream) => {
                    options.apply(&stream)?;
                    self.start(stream);
                    return Ok(());
                }
                Err(e) => last_err = Some(e),
            }
        }
        Err(ConnectionError::Io(last_err.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::AddrNotAvailable, "no addresses to connect to")
        })))
    }

    /// Adopt an accepted socket, assign the server-side identity, and start
    /// the receive cycle.
    ///
    /// Legal only for server-owned connections; the accepting listener is
    /// external to this crate.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::WrongRole`] for a client-owned connection.
    pub fn connect_to_client(&self, id: u32, stream: TcpStream) -> Result<(), ConnectionError> {
        if self.role != Role::Server {
            warn!("connect_to_client called on a {:?}-owned connection", self.role);
            return Err(ConnectionError::WrongRole { role: self.role });
        }
        self.id.store(id, Ordering::Relaxed);
        self.start(stream);
        Ok(())
    }

    /// Queue a frame for transmission.
    ///
    /// The frame is marshalled onto the driving runtime and written by the
    /// connection's writer task, so this is safe from any thread and writes
    /// are serialized per connection. Returns `false` if the connection is
    /// not open; the frame is dropped in that case.
    pub fn send(&self, frame: Frame<T>) -> bool {
        let outbound = self.outbound.lock();
        match outbound.as_ref() {
            Some(tx) => tx.send(frame).is_ok(),
            None => false,
        }
    }

    /// Request closure of the connection.
    ///
    /// The request is scheduled, not executed in-line: the reader and writer
    /// tasks observe the cancellation on the driving runtime and close the
    /// socket there, so this never races an in-flight read completion.
    /// Callers poll [`is_connected`](Self::is_connected) to observe the
    /// effect.
    pub fn disconnect(&self) {
        if self.is_connected() {
            self.shutdown.cancel();
        }
    }

    /// Whether the socket is currently open. A `true` result does not imply
    /// a receive is pending; the connection may be mid-teardown.
    #[must_use]
    pub fn is_connected(&self) -> bool { self.connected.load(Ordering::Acquire) }

    /// System-wide identity assigned by the server side; 0 until assigned.
    #[must_use]
    pub fn id(&self) -> u32 { self.id.load(Ordering::Relaxed) }

    /// The side that owns this connection.
    #[must_use]
    pub fn role(&self) -> Role { self.role }

    /// Split the socket and spawn the reader and writer tasks on the driving
    /// runtime.
    fn start(&self, stream: TcpStream) {
        let Some(conn) = self.weak_self.upgrade() else {
            return;
        };
        let (reader, writer) = stream.into_split();
        let (tx, rx) = mpsc::unbounded_channel();
        *self.outbound.lock() = Some(tx);
        self.connected.store(true, Ordering::Release);
        self.handle.spawn(Arc::clone(&conn).recv_loop(reader));
        self.handle.spawn(conn.send_loop(writer, rx));
    }

    /// Record teardown and stop the sibling task. Idempotent.
    fn mark_closed(&self) {
        self.connected.store(false, Ordering::Release);
        self.shutdown.cancel();
        self.outbound.lock().take();
    }
}
