//! Fixed-width value encodings for typed frame bodies.

use bytes::BytesMut;

/// A value with a fixed little-endian wire encoding, usable with
/// [`Frame::push`](super::Frame::push) and [`Frame::pop`](super::Frame::pop).
///
/// Implementations exist for the primitive integer and floating-point types
/// and `bool`. All multi-byte values are encoded little-endian, matching the
/// frame header.
pub trait WireValue: Sized {
    /// Encoded width in bytes.
    const WIDTH: usize;

    /// Append the value's encoding to `dst`.
    fn write_to(&self, dst: &mut BytesMut);

    /// Decode a value from `src`, which holds exactly [`Self::WIDTH`] bytes.
    fn read_from(src: &[u8]) -> Self;
}

macro_rules! impl_wire_value {
    ($($ty:ty),+ $(,)?) => {$(
        impl WireValue for $ty {
            const WIDTH: usize = size_of::<$ty>();

            fn write_to(&self, dst: &mut BytesMut) {
                dst.extend_from_slice(&self.to_le_bytes());
            }

            fn read_from(src: &[u8]) -> Self {
                let mut buf = [0u8; size_of::<$ty>()];
                buf.copy_from_slice(src);
                Self::from_le_bytes(buf)
            }
        }
    )+};
}

impl_wire_value!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128, f32, f64);

impl WireValue for bool {
    const WIDTH: usize = 1;

    fn write_to(&self, dst: &mut BytesMut) { dst.extend_from_slice(&[u8::from(*self)]); }

    fn read_from(src: &[u8]) -> Self { src[0] != 0 }
}
