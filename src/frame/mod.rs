//! Framed message value type and wire header codec.
//!
//! Every frame travels as an 8-byte fixed-width header followed by exactly
//! `len` body bytes:
//!
//! | offset | width | field                                 |
//! |--------|-------|---------------------------------------|
//! | 0      | 4     | message kind tag, `u32` little-endian |
//! | 4      | 4     | body length, `u32` little-endian      |
//!
//! There is no delimiter, checksum, or version byte; the fixed-size header is
//! what lets the receiver issue a body read of a known length without any
//! escaping scheme. The layout is identical on both ends by construction.
//!
//! Typed fields are appended to and extracted from the *tail* of the body, so
//! the body behaves as a stack: values must be popped in the exact reverse of
//! the order they were pushed. The wire format carries no type tags, and the
//! transport does not validate field order.

mod value;

use std::fmt;

use bytes::BytesMut;

pub use self::value::WireValue;

/// Width in bytes of the fixed frame header.
pub const HEADER_LEN: usize = 8;

/// Enumerated tag identifying the semantic meaning of a frame.
///
/// The transport carries the tag opaquely; only the application interprets
/// it. A tag the receiving side cannot decode is treated as a mid-stream
/// protocol error and closes the connection.
pub trait FrameKind: Copy + Eq + fmt::Debug + Send + 'static {
    /// Encode the tag for transmission.
    fn to_wire(self) -> u32;

    /// Decode a received tag, or `None` if the value is not a known kind.
    fn from_wire(raw: u32) -> Option<Self>;
}

/// Raw `u32` tags pass through unchanged.
impl FrameKind for u32 {
    fn to_wire(self) -> u32 { self }

    fn from_wire(raw: u32) -> Option<Self> { Some(raw) }
}

/// Errors emitted by [`Frame`] body operations.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A typed pop asked for more bytes than the body holds.
    #[error("frame body too short: need {needed} bytes, have {available}")]
    BodyTooShort { needed: usize, available: usize },
    /// The body grew beyond what the 4-byte length field can describe.
    #[error("frame body exceeds the wire size limit ({len} bytes)")]
    BodyTooLarge { len: usize },
}

/// A single framed message: a kind tag plus an opaque byte body.
///
/// The header's length field is represented by `body.len()` itself, so the
/// "header size equals body length" invariant holds structurally through
/// every mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame<T: FrameKind> {
    kind: T,
    body: BytesMut,
}

impl<T: FrameKind> Frame<T> {
    /// Create an empty frame with the given kind tag.
    #[must_use]
    pub fn new(kind: T) -> Self {
        Self {
            kind,
            body: BytesMut::new(),
        }
    }

    /// Assemble a frame from a received kind tag and body buffer.
    #[must_use]
    pub fn from_parts(kind: T, body: BytesMut) -> Self { Self { kind, body } }

    /// The frame's kind tag.
    #[must_use]
    pub fn kind(&self) -> T { self.kind }

    /// Current body length in bytes; this is what the header's length field
    /// carries on the wire.
    #[must_use]
    pub fn len(&self) -> usize { self.body.len() }

    /// Whether the body is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.body.is_empty() }

    /// The raw body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] { &self.body }

    /// Consume the frame, yielding its body buffer.
    #[must_use]
    pub fn into_body(self) -> BytesMut { self.body }

    /// Append a fixed-width value to the tail of the body.
    ///
    /// # Examples
    ///
    /// ```
    /// use netframe::Frame;
    ///
    /// let mut frame = Frame::new(1u32);
    /// frame.push(0xDEAD_BEEFu32);
    /// assert_eq!(frame.len(), 4);
    /// ```
    pub fn push<V: WireValue>(&mut self, value: V) { value.write_to(&mut self.body); }

    /// Remove the most recently appended value from the tail of the body.
    ///
    /// Extraction is last-in-first-out: values must be popped in the exact
    /// reverse of the order they were pushed. The body carries no type tags,
    /// so popping a different type than was pushed silently misreads bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::BodyTooShort`] if fewer than `V::WIDTH` bytes
    /// remain.
    ///
    /// # Examples
    ///
    /// ```
    /// use netframe::Frame;
    ///
    /// let mut frame = Frame::new(1u32);
    /// frame.push(7u16);
    /// frame.push(9u8);
    /// assert_eq!(frame.pop::<u8>().unwrap(), 9);
    /// assert_eq!(frame.pop::<u16>().unwrap(), 7);
    /// assert!(frame.is_empty());
    /// ```
    pub fn pop<V: WireValue>(&mut self) -> Result<V, FrameError> {
        let available = self.body.len();
        if available < V::WIDTH {
            return Err(FrameError::BodyTooShort {
                needed: V::WIDTH,
                available,
            });
        }
        let start = available - V::WIDTH;
        let value = V::read_from(&self.body[start..]);
        self.body.truncate(start);
        Ok(value)
    }

    /// Append the frame's wire encoding (header then body) to `dst`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::BodyTooLarge`] if the body length does not fit
    /// the 4-byte length field.
    pub fn encode_into(&self, dst: &mut BytesMut) -> Result<(), FrameError> {
        let len = u32::try_from(self.body.len()).map_err(|_| FrameError::BodyTooLarge {
            len: self.body.len(),
        })?;
        dst.reserve(HEADER_LEN + self.body.len());
        dst.extend_from_slice(&self.kind.to_wire().to_le_bytes());
        dst.extend_from_slice(&len.to_le_bytes());
        dst.extend_from_slice(&self.body);
        Ok(())
    }
}

/// Decode a received header into its raw kind tag and body length.
#[must_use]
pub fn decode_header(header: &[u8; HEADER_LEN]) -> (u32, u32) {
    let kind = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    let len = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
    (kind, len)
}
