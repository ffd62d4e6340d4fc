//! The universal field contract and the raw scalar implementations.

use crate::Error;
use bytes::{Buf, BufMut};
use paste::paste;

/// A configured, typed unit of serializable state.
///
/// Every field supports the same operations regardless of which options are
/// active: deserialize (`read`, replacing the current value), serialize
/// (`write`, not mutating), exact and static length queries, validity,
/// refresh of derived state, and version propagation.
///
/// Raw fixed-width scalars (`u8`..`u64`, `i8`..`i64`, big-endian) implement
/// the contract directly; composite fields implement it by delegating to
/// their members. [`crate::SequenceField`] implements it for ordered
/// collections of any other field.
pub trait Field: Clone + Default + PartialEq + std::fmt::Debug {
    /// True exactly for raw fixed-width scalars. Drives the fast paths that
    /// skip per-element iteration (refresh, validity, version propagation).
    const RAW: bool = false;

    /// Reads a value from the buffer, replacing the current value.
    ///
    /// `buf.remaining()` is the number of bytes available. On failure the
    /// buffer may have been partially consumed.
    fn read(&mut self, buf: &mut impl Buf) -> Result<(), Error>;

    /// Writes the current value to the buffer.
    ///
    /// `buf.remaining_mut()` is the byte budget; an insufficient budget is
    /// reported as [`Error::BufferOverflow`], never a panic.
    fn write(&self, buf: &mut impl BufMut) -> Result<(), Error>;

    /// Exact number of bytes [`Field::write`] will produce for the current
    /// value.
    fn length(&self) -> usize;

    /// Value-independent lower bound on the serialized length.
    fn min_length(&self) -> usize;

    /// Value-independent upper bound on the serialized length, or `None`
    /// when the configuration places no bound.
    fn max_length(&self) -> Option<usize>;

    /// Whether the current value satisfies the field's own constraints.
    fn valid(&self) -> bool {
        true
    }

    /// Recomputes derived state; returns whether anything changed.
    fn refresh(&mut self) -> bool {
        false
    }

    /// Whether this field reacts to [`Field::set_version`].
    fn is_version_dependent(&self) -> bool {
        false
    }

    /// Propagates a schema version; returns whether any content changed.
    fn set_version(&mut self, _version: u64) -> bool {
        false
    }

    /// Reads without reporting a status.
    ///
    /// The caller must guarantee sufficient, well-formed input; the result
    /// is unspecified otherwise.
    fn read_unchecked(&mut self, buf: &mut impl Buf) {
        let _ = self.read(buf);
    }

    /// Writes without the byte-budget pre-check.
    ///
    /// The caller must guarantee sufficient output capacity.
    fn write_unchecked(&self, buf: &mut impl BufMut) {
        let _ = self.write(buf);
    }
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            paste! {
                impl Field for $ty {
                    const RAW: bool = true;

                    fn read(&mut self, buf: &mut impl Buf) -> Result<(), Error> {
                        if buf.remaining() < std::mem::size_of::<$ty>() {
                            return Err(Error::NotEnoughData);
                        }
                        *self = buf.[<get_ $ty>]();
                        Ok(())
                    }

                    fn write(&self, buf: &mut impl BufMut) -> Result<(), Error> {
                        if buf.remaining_mut() < std::mem::size_of::<$ty>() {
                            return Err(Error::BufferOverflow);
                        }
                        buf.[<put_ $ty>](*self);
                        Ok(())
                    }

                    fn length(&self) -> usize {
                        std::mem::size_of::<$ty>()
                    }

                    fn min_length(&self) -> usize {
                        std::mem::size_of::<$ty>()
                    }

                    fn max_length(&self) -> Option<usize> {
                        Some(std::mem::size_of::<$ty>())
                    }

                    fn read_unchecked(&mut self, buf: &mut impl Buf) {
                        *self = buf.[<get_ $ty>]();
                    }

                    fn write_unchecked(&self, buf: &mut impl BufMut) {
                        buf.[<put_ $ty>](*self);
                    }
                }
            }
        )*
    };
}

impl_scalar!(u8, u16, u32, u64, i8, i16, i32, i64);

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::{Bytes, BytesMut};

    #[test]
    fn test_scalar_roundtrip() {
        let value = 0x0102_0304u32;
        let mut buf = BytesMut::new();
        value.write(&mut buf).unwrap();
        assert_eq!(&buf[..], &[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(buf.len(), value.length());

        let mut decoded = 0u32;
        let mut input = buf.freeze();
        decoded.read(&mut input).unwrap();
        assert_eq!(decoded, value);
        assert_eq!(input.remaining(), 0);
    }

    #[test]
    fn test_scalar_not_enough_data() {
        let mut input = Bytes::from_static(&[0x01, 0x02]);
        let mut value = 0u32;
        assert!(matches!(value.read(&mut input), Err(Error::NotEnoughData)));
    }

    #[test]
    fn test_scalar_overflow() {
        let mut out = [0u8; 2];
        let mut slice = &mut out[..];
        assert!(matches!(
            0u32.write(&mut slice),
            Err(Error::BufferOverflow)
        ));
    }

    #[test]
    fn test_scalar_defaults() {
        let mut value = 7u8;
        assert!(value.valid());
        assert!(!value.refresh());
        assert!(!value.is_version_dependent());
        assert!(!value.set_version(3));
        assert_eq!(value.min_length(), 1);
        assert_eq!(value.max_length(), Some(1));
    }
}
