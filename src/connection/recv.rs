//! Inbound half of a connection: the header/body receive cycle.

use std::{io, sync::Arc};

use bytes::BytesMut;
use log::{debug, warn};
use tokio::{io::AsyncReadExt, net::tcp::OwnedReadHalf};

use super::{Connection, Envelope, Role};
use crate::frame::{self, Frame, FrameKind, HEADER_LEN};

impl<T: FrameKind> Connection<T> {
    pub(super) async fn recv_loop(self: Arc<Self>, mut reader: OwnedReadHalf) {
        let outcome = tokio::select! {
            () = self.shutdown.cancelled() => Ok(()),
            res = self.receive_cycle(&mut reader) => res,
        };
        // Any failure on a pending read is an unrecoverable disconnect for
        // this connection: close, stop reading, discard the torn frame.
        if let Err(e) = outcome {
            warn!("[{}] read failed: {e}", self.id());
        }
        self.mark_closed();
    }

    /// One iteration per frame: read exactly the fixed-width header, then --
    /// only when the declared length is non-zero -- exactly that many body
    /// bytes into a pre-sized buffer. Each read is awaited from the
    /// completion of the previous one, so at most one read is ever
    /// outstanding and the next header read is armed immediately after an
    /// enqueue, including on the zero-body fast path.
    async fn receive_cycle(&self, reader: &mut OwnedReadHalf) -> io::Result<()> {
        loop {
            let mut header = [0u8; HEADER_LEN];
            reader.read_exact(&mut header).await?;
            let (raw_kind, len) = frame::decode_header(&header);
            let kind = T::from_wire(raw_kind).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("unknown frame kind {raw_kind:#x}"),
                )
            })?;
            let body = if len > 0 {
                let mut body = BytesMut::zeroed(len as usize);
                reader.read_exact(&mut body[..]).await?;
                body
            } else {
                BytesMut::new()
            };
            self.enqueue(Frame::from_parts(kind, body));
        }
    }

    /// Wrap a completed frame and push it to the owner's queue. Server-owned
    /// connections tag the envelope with a weak back-reference so dispatch
    /// can tell peers apart without owning the connection.
    fn enqueue(&self, frame: Frame<T>) {
        debug!(
            "[{}] frame received: kind={:?}, len={}",
            self.id(),
            frame.kind(),
            frame.len()
        );
        let origin = match self.role {
            Role::Server => Some(self.weak_self.clone()),
            Role::Client => None,
        };
        self.incoming.push_back(Envelope { origin, frame });
    }
}
