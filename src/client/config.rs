//! Socket options for netframe clients.

use std::io;

use tokio::net::TcpStream;

/// Socket options applied to a freshly connected client stream.
///
/// # Examples
///
/// ```
/// use netframe::SocketOptions;
///
/// let options = SocketOptions::default().nodelay(true).ttl(64);
/// let expected = SocketOptions::default().nodelay(true).ttl(64);
/// assert_eq!(options, expected);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SocketOptions {
    nodelay: Option<bool>,
    ttl: Option<u32>,
}

impl SocketOptions {
    /// Configure `TCP_NODELAY` behaviour on the socket.
    #[must_use]
    pub fn nodelay(mut self, enabled: bool) -> Self {
        self.nodelay = Some(enabled);
        self
    }

    /// Configure the IP time-to-live for outgoing packets.
    #[must_use]
    pub fn ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub(crate) fn apply(&self, stream: &TcpStream) -> io::Result<()> {
        if let Some(enabled) = self.nodelay {
            stream.set_nodelay(enabled)?;
        }
        if let Some(ttl) = self.ttl {
            stream.set_ttl(ttl)?;
        }
        Ok(())
    }
}
