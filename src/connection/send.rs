//! Outbound half of a connection: the serialized frame writer.

use std::{io, sync::Arc};

use bytes::BytesMut;
use log::warn;
use tokio::{io::AsyncWriteExt, net::tcp::OwnedWriteHalf, sync::mpsc};

use super::Connection;
use crate::frame::{Frame, FrameKind};

impl<T: FrameKind> Connection<T> {
    pub(super) async fn send_loop(
        self: Arc<Self>,
        mut writer: OwnedWriteHalf,
        mut pending: mpsc::UnboundedReceiver<Frame<T>>,
    ) {
        let outcome = tokio::select! {
            () = self.shutdown.cancelled() => Ok(()),
            res = Self::write_cycle(&mut writer, &mut pending) => res,
        };
        if let Err(e) = outcome {
            warn!("[{}] write failed: {e}", self.id());
        }
        let _ = writer.shutdown().await;
        self.mark_closed();
    }

    /// Drain queued frames one at a time so partial writes from different
    /// frames can never interleave on the socket.
    async fn write_cycle(
        writer: &mut OwnedWriteHalf,
        pending: &mut mpsc::UnboundedReceiver<Frame<T>>,
    ) -> io::Result<()> {
        let mut buf = BytesMut::new();
        while let Some(frame) = pending.recv().await {
            buf.clear();
            frame
                .encode_into(&mut buf)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            writer.write_all(&buf).await?;
        }
        Ok(())
    }
}
