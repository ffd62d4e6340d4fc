//! The declarative option set resolved once per field configuration.

use crate::{varint, Error};
use bytes::{Buf, BufMut, Bytes};

/// Byte order of a fixed-width prefix integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endian {
    Big,
    Little,
}

/// Wire encoding of a size or length prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrefixFormat {
    /// Fixed-width unsigned integer of `width` bytes (1..=8).
    Fixed { width: usize, endian: Endian },
    /// LEB128 varint (see [`crate::varint`]).
    Varint,
}

impl PrefixFormat {
    /// Fixed-width big-endian prefix of `width` bytes.
    pub const fn big(width: usize) -> Self {
        Self::Fixed {
            width,
            endian: Endian::Big,
        }
    }

    /// Fixed-width little-endian prefix of `width` bytes.
    pub const fn little(width: usize) -> Self {
        Self::Fixed {
            width,
            endian: Endian::Little,
        }
    }

    pub(crate) fn read_value(&self, buf: &mut impl Buf) -> Result<u64, Error> {
        match *self {
            Self::Fixed { width, endian } => {
                if buf.remaining() < width {
                    return Err(Error::NotEnoughData);
                }
                Ok(match endian {
                    Endian::Big => buf.get_uint(width),
                    Endian::Little => buf.get_uint_le(width),
                })
            }
            Self::Varint => varint::read(buf),
        }
    }

    pub(crate) fn write_value(&self, value: u64, buf: &mut impl BufMut) -> Result<(), Error> {
        match *self {
            Self::Fixed { width, endian } => {
                if width < 8 && value >> (8 * width as u32) != 0 {
                    return Err(Error::InvalidData(format!(
                        "prefix value {value} does not fit in {width} bytes"
                    )));
                }
                match endian {
                    Endian::Big => buf.put_uint(value, width),
                    Endian::Little => buf.put_uint_le(value, width),
                }
                Ok(())
            }
            Self::Varint => {
                varint::write(value, buf);
                Ok(())
            }
        }
    }

    pub(crate) fn encoded_size(&self, value: u64) -> usize {
        match *self {
            Self::Fixed { width, .. } => width,
            Self::Varint => varint::size(value),
        }
    }

    pub(crate) fn min_size(&self) -> usize {
        match *self {
            Self::Fixed { width, .. } => width,
            Self::Varint => 1,
        }
    }

    pub(crate) fn max_size(&self) -> usize {
        match *self {
            Self::Fixed { width, .. } => width,
            Self::Varint => varint::MAX_LEN,
        }
    }
}

/// Requested storage representation. The actual strategy is resolved from
/// the full option set; see [`crate::storage::resolve_storage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StorageOpt {
    /// No explicit request; the resolver decides.
    #[default]
    Default,
    /// Bounded-capacity storage with the given maximum element count.
    FixedCapacity(usize),
    /// Zero-copy view over the input buffer (one-byte scalar elements only).
    View,
    /// Caller-supplied container implementing [`crate::Storage`].
    Custom,
}

/// Physical units annotation, consumed by numeric field kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Units {
    Seconds,
    Milliseconds,
    Meters,
    Millimeters,
    Volts,
    Hertz,
}

/// The closed collection of configuration options for a field.
///
/// Built once, by value, and handed to the field constructor which resolves
/// it into an immutable configuration. The set is shared across field kinds;
/// options a given kind cannot honor are rejected at construction time with
/// a [`crate::ConfigError`] naming the option.
///
/// # Examples
///
/// ```
/// use wirefield::{FieldOptions, PrefixFormat};
///
/// let opts = FieldOptions::new()
///     .size_prefix(PrefixFormat::Varint)
///     .version_storage();
/// ```
#[derive(Clone, Debug, Default)]
pub struct FieldOptions {
    pub(crate) storage: StorageOpt,
    pub(crate) size_prefix: Option<PrefixFormat>,
    pub(crate) length_prefix: Option<PrefixFormat>,
    pub(crate) fixed_count: Option<usize>,
    pub(crate) fixed_count_storage: bool,
    pub(crate) elem_fixed_length: Option<usize>,
    pub(crate) terminator: Option<u8>,
    pub(crate) trailing: Option<Bytes>,
    pub(crate) count_forcing: bool,
    pub(crate) length_forcing: bool,
    pub(crate) elem_length_forcing: bool,
    pub(crate) version_storage: bool,

    // Options consumed by other field kinds; a sequence rejects them.
    pub(crate) ser_offset: Option<i64>,
    pub(crate) fixed_length: Option<usize>,
    pub(crate) fixed_bit_length: Option<usize>,
    pub(crate) var_length: Option<(usize, usize)>,
    pub(crate) available_length_limit: Option<usize>,
    pub(crate) scaling: Option<(i64, i64)>,
    pub(crate) units: Option<Units>,
    pub(crate) valid_ranges: Vec<(i64, i64)>,
    pub(crate) versions_range: Option<(u64, u64)>,
    pub(crate) invalid_by_default: bool,
    pub(crate) missing_on_read_fail: bool,
    pub(crate) missing_on_invalid: bool,
}

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix the sequence with its element count.
    pub fn size_prefix(mut self, format: PrefixFormat) -> Self {
        self.size_prefix = Some(format);
        self
    }

    /// Prefix the sequence with its serialized body length in bytes.
    pub fn length_prefix(mut self, format: PrefixFormat) -> Self {
        self.length_prefix = Some(format);
        self
    }

    /// Always read and write exactly `count` elements, padding shorter
    /// values with default-constructed elements on write.
    pub fn fixed_count(mut self, count: usize) -> Self {
        self.fixed_count = Some(count);
        self
    }

    /// Use bounded storage sized to the fixed element count.
    pub fn fixed_count_storage(mut self) -> Self {
        self.fixed_count_storage = true;
        self
    }

    /// Use bounded storage with the given maximum capacity.
    pub fn fixed_capacity(mut self, capacity: usize) -> Self {
        self.storage = StorageOpt::FixedCapacity(capacity);
        self
    }

    /// Use a zero-copy view over the input buffer as storage.
    pub fn zero_copy_view(mut self) -> Self {
        self.storage = StorageOpt::View;
        self
    }

    /// Use a caller-supplied storage container.
    pub fn custom_storage(mut self) -> Self {
        self.storage = StorageOpt::Custom;
        self
    }

    /// Serialize every element in exactly `length` bytes, zero-padding
    /// short elements and rejecting longer ones.
    pub fn elem_fixed_length(mut self, length: usize) -> Self {
        self.elem_fixed_length = Some(length);
        self
    }

    /// Reserve `byte` as an end-of-sequence marker recognized during read
    /// and emitted after the body on write.
    pub fn terminator(mut self, byte: u8) -> Self {
        self.terminator = Some(byte);
        self
    }

    /// Consume and emit a fixed trailing suffix after the body, validating
    /// it against the given pattern on read.
    pub fn trailing(mut self, suffix: impl Into<Bytes>) -> Self {
        self.trailing = Some(suffix.into());
        self
    }

    /// Enable the read element-count forcing override.
    pub fn count_forcing(mut self) -> Self {
        self.count_forcing = true;
        self
    }

    /// Enable the read byte-length forcing override.
    pub fn length_forcing(mut self) -> Self {
        self.length_forcing = true;
        self
    }

    /// Enable the per-element serialized-length forcing override.
    pub fn elem_length_forcing(mut self) -> Self {
        self.elem_length_forcing = true;
        self
    }

    /// Store the schema version passed to `set_version` and expose it via
    /// `version`.
    pub fn version_storage(mut self) -> Self {
        self.version_storage = true;
        self
    }

    /// Add `offset` to the numeric value before serialization.
    pub fn ser_offset(mut self, offset: i64) -> Self {
        self.ser_offset = Some(offset);
        self
    }

    /// Limit the total serialized length to exactly `bytes`.
    pub fn fixed_length(mut self, bytes: usize) -> Self {
        self.fixed_length = Some(bytes);
        self
    }

    /// Limit the serialized length to exactly `bits`.
    pub fn fixed_bit_length(mut self, bits: usize) -> Self {
        self.fixed_bit_length = Some(bits);
        self
    }

    /// Serialize with a variable length between `min` and `max` bytes.
    pub fn var_length(mut self, min: usize, max: usize) -> Self {
        self.var_length = Some((min, max));
        self
    }

    /// Limit the serialized length to the available buffer space.
    pub fn available_length_limit(mut self, bytes: usize) -> Self {
        self.available_length_limit = Some(bytes);
        self
    }

    /// Scale the numeric value by `num / den` when converting to physical
    /// units.
    pub fn scaling(mut self, num: i64, den: i64) -> Self {
        self.scaling = Some((num, den));
        self
    }

    /// Annotate the numeric value with physical units.
    pub fn units(mut self, units: Units) -> Self {
        self.units = Some(units);
        self
    }

    /// Add a valid numeric range; may be called multiple times.
    pub fn valid_range(mut self, min: i64, max: i64) -> Self {
        self.valid_ranges.push((min, max));
        self
    }

    /// Mark the field as existing only between the given schema versions.
    pub fn exists_between_versions(mut self, from: u64, until: u64) -> Self {
        self.versions_range = Some((from, until));
        self
    }

    /// Treat a default-constructed value as invalid.
    pub fn invalid_by_default(mut self) -> Self {
        self.invalid_by_default = true;
        self
    }

    /// Treat a failed read as a missing optional field.
    pub fn missing_on_read_fail(mut self) -> Self {
        self.missing_on_read_fail = true;
        self
    }

    /// Treat an invalid value as a missing optional field.
    pub fn missing_on_invalid(mut self) -> Self {
        self.missing_on_invalid = true;
        self
    }
}
