//! Variable-length integer encoding for size and length prefixes.
//!
//! Implements the protocol-buffers LEB128 scheme: seven value bits per byte,
//! most-significant bit set while more bytes follow. Only `u64` is supported;
//! prefix values are counts or byte lengths and never need signed encoding.

use crate::Error;
use bytes::{Buf, BufMut};

const DATA_BITS: u32 = 7;
const DATA_MASK: u8 = 0x7F;
const CONTINUATION: u8 = 0x80;

/// Maximum number of bytes a `u64` varint can occupy.
pub const MAX_LEN: usize = 10;

/// Encodes `value` as a varint.
pub fn write(mut value: u64, buf: &mut impl BufMut) {
    while value >= u64::from(CONTINUATION) {
        buf.put_u8(value as u8 | CONTINUATION);
        value >>= DATA_BITS;
    }
    buf.put_u8(value as u8);
}

/// Decodes a varint, rejecting encodings that overflow 64 bits.
pub fn read(buf: &mut impl Buf) -> Result<u64, Error> {
    let mut result = 0u64;
    let mut shift = 0u32;
    loop {
        if !buf.has_remaining() {
            return Err(Error::NotEnoughData);
        }
        let byte = buf.get_u8();

        // The tenth byte carries the single remaining bit, so anything other
        // than 0x00 or 0x01 (including a continuation bit) overflows.
        if shift == 63 && byte > 1 {
            return Err(Error::InvalidData("overlong varint".into()));
        }

        result |= u64::from(byte & DATA_MASK) << shift;
        if byte & CONTINUATION == 0 {
            return Ok(result);
        }
        shift += DATA_BITS;
    }
}

/// Number of bytes [`write`] produces for `value`.
pub fn size(value: u64) -> usize {
    let bits = (64 - value.leading_zeros() as usize).max(1);
    bits.div_ceil(DATA_BITS as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_roundtrip() {
        let cases = [
            0u64,
            1,
            127,
            128,
            129,
            0xFF,
            0x3FFF,
            0x4000,
            0xFFFF_FFFF,
            u64::MAX,
        ];
        for &value in &cases {
            let mut buf = Vec::new();
            write(value, &mut buf);
            assert_eq!(buf.len(), size(value));

            let mut read_buf = &buf[..];
            assert_eq!(read(&mut read_buf).unwrap(), value);
            assert_eq!(read_buf.len(), 0);
        }
    }

    #[test]
    fn test_insufficient_buffer() {
        let mut buf = Bytes::from_static(&[0x80]);
        assert!(matches!(read(&mut buf), Err(Error::NotEnoughData)));
    }

    #[test]
    fn test_overlong() {
        let mut buf =
            Bytes::from_static(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x02]);
        assert!(matches!(read(&mut buf), Err(Error::InvalidData(_))));
    }
}
