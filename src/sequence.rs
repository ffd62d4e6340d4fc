//! The sequence field: a variable-length collection of elements.

use crate::{
    config::SequenceConfig,
    error::ConfigError,
    field::Field,
    options::FieldOptions,
    storage::{Growable, Storage, StorageKind},
    Error,
};
use bytes::{Buf, BufMut};
use std::{cmp::Ordering, marker::PhantomData};

/// Field representing an ordered collection of elements.
///
/// `E` is the element type: a raw scalar or any other [`Field`]. `S` is the
/// storage strategy backing the value, resolved from the option set at
/// construction; the default is the growable buffer.
///
/// By default a read consumes all the data available. Size-limiting options
/// (a size or length prefix, a fixed element count, a terminator, or one of
/// the forcing overrides) change that, and a write emits whatever prefix and
/// suffix the configuration calls for around the element payload.
///
/// # Examples
///
/// ```
/// use bytes::BytesMut;
/// use wirefield::{Field, FieldOptions, PrefixFormat, SequenceField};
///
/// let opts = FieldOptions::new().size_prefix(PrefixFormat::Varint);
/// let mut field = SequenceField::<u16>::new(&opts).unwrap();
/// field.set_value(vec![0x0102u16, 0x0304]);
/// assert_eq!(field.length(), 1 + 4);
///
/// let mut out = BytesMut::new();
/// field.write(&mut out).unwrap();
/// assert_eq!(&out[..], &[0x02, 0x01, 0x02, 0x03, 0x04]);
///
/// let mut decoded = SequenceField::<u16>::new(&opts).unwrap();
/// let mut input = out.freeze();
/// decoded.read(&mut input).unwrap();
/// assert_eq!(decoded, field);
/// ```
#[derive(Clone, Debug)]
pub struct SequenceField<E: Field, S: Storage<E> = Growable<E>> {
    cfg: SequenceConfig,
    value: S,
    forced_count: Option<usize>,
    forced_length: Option<usize>,
    forced_elem_length: Option<usize>,
    version: u64,
    _elem: PhantomData<E>,
}

impl<E: Field, S: Storage<E>> SequenceField<E, S> {
    /// Resolves `options` and constructs the field with a default value.
    ///
    /// Fails if the option set is invalid for a sequence of `E`, or if the
    /// resolved storage strategy does not match `S`.
    pub fn new(options: &FieldOptions) -> Result<Self, ConfigError> {
        let cfg = SequenceConfig::resolve::<E>(options)?;
        if S::KIND != cfg.storage_kind {
            return Err(ConfigError::StorageMismatch {
                expected: cfg.storage_kind,
                actual: S::KIND,
            });
        }
        if let (Some(expected), Some(actual)) = (cfg.storage_capacity, S::capacity()) {
            if actual != expected {
                return Err(ConfigError::CapacityMismatch { expected, actual });
            }
        }
        Ok(Self::from_config(cfg, S::default()))
    }

    /// Resolves `options` and constructs the field with the given value.
    pub fn with_value(options: &FieldOptions, value: S) -> Result<Self, ConfigError> {
        let mut field = Self::new(options)?;
        field.value = value;
        Ok(field)
    }

    fn from_config(cfg: SequenceConfig, value: S) -> Self {
        Self {
            cfg,
            value,
            forced_count: None,
            forced_length: None,
            forced_elem_length: None,
            version: 0,
            _elem: PhantomData,
        }
    }

    pub fn value(&self) -> &S {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut S {
        &mut self.value
    }

    pub fn set_value(&mut self, value: impl Into<S>) {
        self.value = value.into();
    }

    /// The elements as a slice, whatever the storage strategy.
    pub fn elements(&self) -> &[E] {
        self.value.as_slice()
    }

    /// Forces the number of elements the next read consumes, superseding
    /// any configured policy until [`Self::clear_read_elem_count`].
    ///
    /// # Panics
    ///
    /// If the count-forcing option was not configured.
    pub fn force_read_elem_count(&mut self, count: usize) {
        assert!(
            self.cfg.count_forcing,
            "count forcing option is not configured for this field"
        );
        self.forced_count = Some(count);
    }

    /// # Panics
    ///
    /// If the count-forcing option was not configured.
    pub fn clear_read_elem_count(&mut self) {
        assert!(
            self.cfg.count_forcing,
            "count forcing option is not configured for this field"
        );
        self.forced_count = None;
    }

    /// Forces the number of bytes available to the next read; the
    /// configured policy then applies within that window. Persists until
    /// [`Self::clear_read_length`].
    ///
    /// # Panics
    ///
    /// If the length-forcing option was not configured.
    pub fn force_read_length(&mut self, len: usize) {
        assert!(
            self.cfg.length_forcing,
            "length forcing option is not configured for this field"
        );
        self.forced_length = Some(len);
    }

    /// # Panics
    ///
    /// If the length-forcing option was not configured.
    pub fn clear_read_length(&mut self) {
        assert!(
            self.cfg.length_forcing,
            "length forcing option is not configured for this field"
        );
        self.forced_length = None;
    }

    /// Forces the serialized length of each element for subsequent reads,
    /// until [`Self::clear_read_elem_length`].
    ///
    /// # Panics
    ///
    /// If the element-length-forcing option was not configured, or if
    /// `len` is zero.
    pub fn force_read_elem_length(&mut self, len: usize) {
        assert!(
            self.cfg.elem_length_forcing,
            "element length forcing option is not configured for this field"
        );
        assert!(len != 0, "forced element length must be non-zero");
        self.forced_elem_length = Some(len);
    }

    /// # Panics
    ///
    /// If the element-length-forcing option was not configured.
    pub fn clear_read_elem_length(&mut self) {
        assert!(
            self.cfg.elem_length_forcing,
            "element length forcing option is not configured for this field"
        );
        self.forced_elem_length = None;
    }

    /// The stored schema version.
    ///
    /// # Panics
    ///
    /// If the version-storage option was not configured.
    pub fn version(&self) -> u64 {
        assert!(
            self.cfg.version_storage,
            "version storage option is not configured for this field"
        );
        self.version
    }

    fn push_elem(&mut self, elem: E) -> Result<(), Error> {
        if S::capacity().is_some_and(|cap| self.value.len() >= cap) {
            return Err(Error::InvalidData(
                "sequence exceeds storage capacity".into(),
            ));
        }
        self.value.push(elem);
        Ok(())
    }

    /// Reads one element from a window of exactly `len` bytes, skipping
    /// whatever the element leaves unconsumed.
    fn read_windowed_element(&mut self, buf: &mut impl Buf, len: usize) -> Result<(), Error> {
        if buf.remaining() < len {
            return Err(Error::NotEnoughData);
        }
        let mut window = buf.take(len);
        let mut elem = E::default();
        elem.read(&mut window)?;
        let leftover = window.remaining();
        if leftover > 0 {
            window.advance(leftover);
        }
        self.push_elem(elem)
    }

    fn read_elements_counted(&mut self, buf: &mut impl Buf, count: usize) -> Result<(), Error> {
        if S::capacity().is_some_and(|cap| count > cap) {
            return Err(Error::InvalidData(format!(
                "element count {count} exceeds storage capacity"
            )));
        }
        if let Some(len) = self.forced_elem_length.or(self.cfg.elem_length) {
            for _ in 0..count {
                self.read_windowed_element(buf, len)?;
            }
            return Ok(());
        }
        if E::RAW {
            let width = E::default().length();
            let need = count
                .checked_mul(width)
                .ok_or_else(|| Error::InvalidData("element count overflow".into()))?;
            if buf.remaining() < need {
                return Err(Error::NotEnoughData);
            }
            return self.value.read_payload(buf, need);
        }
        for _ in 0..count {
            let mut elem = E::default();
            elem.read(buf)?;
            self.push_elem(elem)?;
        }
        Ok(())
    }

    /// Reads elements until `window` is exhausted (or a terminator is hit).
    fn read_elements_window(&mut self, window: &mut impl Buf) -> Result<(), Error> {
        if let Some(term) = self.cfg.terminator {
            let elem_length = self.forced_elem_length.or(self.cfg.elem_length);
            loop {
                if !window.has_remaining() {
                    return Err(Error::NotEnoughData);
                }
                if window.chunk()[0] == term {
                    window.advance(1);
                    return Ok(());
                }
                match elem_length {
                    Some(len) => self.read_windowed_element(window, len)?,
                    None => {
                        let mut elem = E::default();
                        elem.read(window)?;
                        self.push_elem(elem)?;
                    }
                }
            }
        }
        if let Some(len) = self.forced_elem_length.or(self.cfg.elem_length) {
            while window.has_remaining() {
                self.read_windowed_element(window, len)?;
            }
            return Ok(());
        }
        let len = window.remaining();
        self.value.read_payload(window, len)
    }

    fn read_trailing(&self, buf: &mut impl Buf) -> Result<(), Error> {
        if let Some(expected) = &self.cfg.trailing {
            if buf.remaining() < expected.len() {
                return Err(Error::NotEnoughData);
            }
            let got = buf.copy_to_bytes(expected.len());
            if got != *expected {
                return Err(Error::InvalidData("trailing suffix mismatch".into()));
            }
        }
        Ok(())
    }

    /// The configured read policy: consume prefixes, then elements, then
    /// the trailing suffix. Forcing overrides are handled by the caller.
    fn read_with_policy(&mut self, buf: &mut impl Buf) -> Result<(), Error> {
        let size_value = match self.cfg.size_prefix {
            Some(format) => Some(format.read_value(buf)?),
            None => None,
        };
        let length_value = match self.cfg.length_prefix {
            Some(format) => Some(format.read_value(buf)?),
            None => None,
        };

        if let Some(count) = self.cfg.fixed_count {
            self.read_elements_counted(buf, count)?;
        } else if let Some(value) = size_value {
            let count = usize::try_from(value)
                .map_err(|_| Error::InvalidData(format!("element count {value} too large")))?;
            self.read_elements_counted(buf, count)?;
        } else if let Some(value) = length_value {
            let len = usize::try_from(value)
                .map_err(|_| Error::InvalidData(format!("body length {value} too large")))?;
            if buf.remaining() < len {
                return Err(Error::NotEnoughData);
            }
            let mut window = (&mut *buf).take(len);
            self.read_elements_window(&mut window)?;
            // The declared body length owns the whole window even if a
            // terminator ended the element run early.
            let leftover = window.remaining();
            if leftover > 0 {
                window.advance(leftover);
            }
        } else if self.cfg.terminator.is_some() {
            self.read_elements_window(buf)?;
        } else {
            let trailing_len = self.cfg.trailing.as_ref().map_or(0, bytes::Bytes::len);
            let avail = buf
                .remaining()
                .checked_sub(trailing_len)
                .ok_or(Error::NotEnoughData)?;
            let mut window = (&mut *buf).take(avail);
            self.read_elements_window(&mut window)?;
        }

        self.read_trailing(buf)
    }

    fn padded_count(&self) -> usize {
        let count = self.value.len();
        self.cfg.fixed_count.map_or(count, |n| n.max(count))
    }

    fn body_length(&self) -> usize {
        let count = self.value.len();
        let padded = self.padded_count();
        if let Some(len) = self.cfg.elem_length {
            return len * padded;
        }
        let mut sum: usize = self.value.as_slice().iter().map(Field::length).sum();
        if padded > count {
            sum += (padded - count) * E::default().length();
        }
        sum
    }

    /// Byte count a length prefix declares: the element payload plus the
    /// terminator byte when one is configured, so the declared window
    /// covers everything up to and including the end-of-body marker.
    fn framed_body_length(&self) -> usize {
        self.body_length() + usize::from(self.cfg.terminator.is_some())
    }

    fn write_parts(&self, buf: &mut impl BufMut) -> Result<(), Error> {
        let count = self.value.len();
        let padded = self.padded_count();
        if let Some(n) = self.cfg.fixed_count {
            if count > n {
                return Err(Error::InvalidData(format!(
                    "value has {count} elements, fixed count is {n}"
                )));
            }
        }
        let pad = E::default();
        if let Some(len) = self.cfg.elem_length {
            for elem in self.value.as_slice() {
                if elem.length() > len {
                    return Err(Error::InvalidData(format!(
                        "element length {} exceeds fixed serialized length {len}",
                        elem.length()
                    )));
                }
            }
            if padded > count && pad.length() > len {
                return Err(Error::InvalidData(format!(
                    "default element length {} exceeds fixed serialized length {len}",
                    pad.length()
                )));
            }
        }

        if let Some(format) = self.cfg.size_prefix {
            format.write_value(padded as u64, buf)?;
        }
        if let Some(format) = self.cfg.length_prefix {
            format.write_value(self.framed_body_length() as u64, buf)?;
        }

        match self.cfg.elem_length {
            Some(len) => {
                for elem in self.value.as_slice() {
                    elem.write(buf)?;
                    buf.put_bytes(0, len.saturating_sub(elem.length()));
                }
                for _ in count..padded {
                    pad.write(buf)?;
                    buf.put_bytes(0, len.saturating_sub(pad.length()));
                }
            }
            None => {
                self.value.write_payload(buf)?;
                for _ in count..padded {
                    pad.write(buf)?;
                }
            }
        }

        if let Some(term) = self.cfg.terminator {
            buf.put_u8(term);
        }
        if let Some(trailing) = &self.cfg.trailing {
            buf.put_slice(trailing);
        }
        Ok(())
    }
}

impl<E: Field> SequenceField<E, Growable<E>> {
    /// A growable sequence with no options; reads consume all available
    /// data and writes emit the bare element payload.
    pub fn plain() -> Self {
        Self::from_config(
            SequenceConfig::for_storage(StorageKind::Growable, None),
            Growable::default(),
        )
    }
}

impl<E: Field, S: Storage<E>> Default for SequenceField<E, S> {
    fn default() -> Self {
        Self::from_config(
            SequenceConfig::for_storage(S::KIND, S::capacity()),
            S::default(),
        )
    }
}

impl<E: Field, S: Storage<E>> Field for SequenceField<E, S> {
    fn read(&mut self, buf: &mut impl Buf) -> Result<(), Error> {
        self.value.clear();
        if let Some(count) = self.forced_count {
            self.read_elements_counted(buf, count)?;
            return self.read_trailing(buf);
        }
        if let Some(len) = self.forced_length {
            if buf.remaining() < len {
                return Err(Error::NotEnoughData);
            }
            let mut window = (&mut *buf).take(len);
            return self.read_with_policy(&mut window);
        }
        self.read_with_policy(buf)
    }

    fn write(&self, buf: &mut impl BufMut) -> Result<(), Error> {
        if buf.remaining_mut() < self.length() {
            return Err(Error::BufferOverflow);
        }
        self.write_parts(buf)
    }

    fn write_unchecked(&self, buf: &mut impl BufMut) {
        let _ = self.write_parts(buf);
    }

    fn length(&self) -> usize {
        let body = self.body_length();
        let mut total = body;
        if let Some(format) = self.cfg.size_prefix {
            total += format.encoded_size(self.padded_count() as u64);
        }
        if let Some(format) = self.cfg.length_prefix {
            total += format.encoded_size(self.framed_body_length() as u64);
        }
        if self.cfg.terminator.is_some() {
            total += 1;
        }
        if let Some(trailing) = &self.cfg.trailing {
            total += trailing.len();
        }
        total
    }

    fn min_length(&self) -> usize {
        let mut min = 0;
        if let Some(format) = self.cfg.size_prefix {
            min += format.min_size();
        }
        if let Some(format) = self.cfg.length_prefix {
            min += format.min_size();
        }
        if let Some(count) = self.cfg.fixed_count {
            let elem_min = self
                .cfg
                .elem_length
                .unwrap_or_else(|| E::default().min_length());
            min += count * elem_min;
        }
        if self.cfg.terminator.is_some() {
            min += 1;
        }
        if let Some(trailing) = &self.cfg.trailing {
            min += trailing.len();
        }
        min
    }

    fn max_length(&self) -> Option<usize> {
        let bound = self.cfg.fixed_count.or(self.cfg.storage_capacity)?;
        let elem_max = match self.cfg.elem_length {
            Some(len) => len,
            None => E::default().max_length()?,
        };
        let mut max = bound * elem_max;
        if let Some(format) = self.cfg.size_prefix {
            max += format.max_size();
        }
        if let Some(format) = self.cfg.length_prefix {
            max += format.max_size();
        }
        if self.cfg.terminator.is_some() {
            max += 1;
        }
        if let Some(trailing) = &self.cfg.trailing {
            max += trailing.len();
        }
        Some(max)
    }

    fn valid(&self) -> bool {
        E::RAW || self.value.as_slice().iter().all(Field::valid)
    }

    fn refresh(&mut self) -> bool {
        if E::RAW {
            return false;
        }
        let mut changed = false;
        for elem in self.value.as_mut_slice() {
            if elem.refresh() {
                changed = true;
            }
        }
        changed
    }

    fn is_version_dependent(&self) -> bool {
        self.cfg.version_storage || (!E::RAW && E::default().is_version_dependent())
    }

    fn set_version(&mut self, version: u64) -> bool {
        let mut changed = false;
        if self.cfg.version_storage && self.version != version {
            self.version = version;
            changed = true;
        }
        if !E::RAW {
            for elem in self.value.as_mut_slice() {
                if elem.set_version(version) {
                    changed = true;
                }
            }
        }
        changed
    }
}

impl<E: Field, S1: Storage<E>, S2: Storage<E>> PartialEq<SequenceField<E, S2>>
    for SequenceField<E, S1>
{
    fn eq(&self, other: &SequenceField<E, S2>) -> bool {
        self.value.as_slice() == other.value.as_slice()
    }
}

impl<E: Field + PartialOrd, S1: Storage<E>, S2: Storage<E>> PartialOrd<SequenceField<E, S2>>
    for SequenceField<E, S1>
{
    fn partial_cmp(&self, other: &SequenceField<E, S2>) -> Option<Ordering> {
        self.value.as_slice().partial_cmp(other.value.as_slice())
    }
}

impl<E: Field + Eq, S: Storage<E>> Eq for SequenceField<E, S> {}

impl<E: Field + Ord, S: Storage<E>> Ord for SequenceField<E, S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.as_slice().cmp(other.value.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        options::PrefixFormat,
        storage::{Bounded, ByteView},
    };
    use bytes::{Bytes, BytesMut};

    fn write_to_vec<E: Field, S: Storage<E>>(field: &SequenceField<E, S>) -> Bytes {
        let mut out = BytesMut::new();
        field.write(&mut out).unwrap();
        assert_eq!(out.len(), field.length());
        out.freeze()
    }

    #[test]
    fn test_plain_bytes_roundtrip() {
        // Element type is a 1-byte scalar with no options: reading
        // [0x01, 0x02, 0x03] yields [1, 2, 3] and writes back the same.
        let mut field = SequenceField::<u8>::plain();
        let mut input = Bytes::from_static(&[0x01, 0x02, 0x03]);
        field.read(&mut input).unwrap();
        assert_eq!(field.elements(), &[1, 2, 3]);
        assert_eq!(field.length(), 3);
        assert_eq!(&write_to_vec(&field)[..], &[0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_size_prefix_leaves_trailing_input() {
        // 1-byte count prefix: [0x02, 0xAA, 0xBB, 0xFF] consumes 3 bytes
        // and leaves 0xFF unconsumed.
        let opts = FieldOptions::new().size_prefix(PrefixFormat::big(1));
        let mut field = SequenceField::<u8>::new(&opts).unwrap();
        let mut input = Bytes::from_static(&[0x02, 0xAA, 0xBB, 0xFF]);
        field.read(&mut input).unwrap();
        assert_eq!(field.elements(), &[0xAA, 0xBB]);
        assert_eq!(input.remaining(), 1);
    }

    #[test]
    fn test_length_prefix_roundtrip() {
        let opts = FieldOptions::new().length_prefix(PrefixFormat::Varint);
        let mut field = SequenceField::<u16>::new(&opts).unwrap();
        field.set_value(vec![0x0102u16, 0x0304]);
        let encoded = write_to_vec(&field);
        assert_eq!(&encoded[..], &[0x04, 0x01, 0x02, 0x03, 0x04]);

        let mut decoded = SequenceField::<u16>::new(&opts).unwrap();
        let mut input = encoded;
        decoded.read(&mut input).unwrap();
        assert_eq!(decoded, field);
    }

    #[test]
    fn test_length_prefix_truncated() {
        let opts = FieldOptions::new().length_prefix(PrefixFormat::big(1));
        let mut field = SequenceField::<u8>::new(&opts).unwrap();
        let mut input = Bytes::from_static(&[0x04, 0xAA, 0xBB]);
        assert!(matches!(field.read(&mut input), Err(Error::NotEnoughData)));
    }

    #[test]
    fn test_fixed_count_padding() {
        let opts = FieldOptions::new().fixed_count(4);
        let mut field = SequenceField::<u8>::new(&opts).unwrap();
        field.set_value(vec![7u8, 8]);
        assert_eq!(field.length(), 4);
        assert_eq!(&write_to_vec(&field)[..], &[7, 8, 0, 0]);
        assert_eq!(field.min_length(), 4);
        assert_eq!(field.max_length(), Some(4));

        // An over-long value is the caller's error, reported not truncated.
        field.set_value(vec![1u8, 2, 3, 4, 5]);
        let mut out = BytesMut::new();
        assert!(matches!(
            field.write(&mut out),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_fixed_count_read() {
        let opts = FieldOptions::new().fixed_count(2);
        let mut field = SequenceField::<u8>::new(&opts).unwrap();
        let mut input = Bytes::from_static(&[0x0A, 0x0B, 0x0C]);
        field.read(&mut input).unwrap();
        assert_eq!(field.elements(), &[0x0A, 0x0B]);
        assert_eq!(input.remaining(), 1);
    }

    #[test]
    fn test_elem_fixed_length() {
        // Each 1-byte element occupies 2 bytes on the wire.
        let opts = FieldOptions::new().elem_fixed_length(2);
        let mut field = SequenceField::<u8>::new(&opts).unwrap();
        let mut input = Bytes::from_static(&[0x01, 0xFF, 0x02, 0xEE]);
        field.read(&mut input).unwrap();
        assert_eq!(field.elements(), &[1, 2]);

        assert_eq!(field.length(), 4);
        assert_eq!(&write_to_vec(&field)[..], &[0x01, 0x00, 0x02, 0x00]);
    }

    #[test]
    fn test_elem_fixed_length_too_small_for_element() {
        let opts = FieldOptions::new().elem_fixed_length(1);
        let mut field = SequenceField::<u16>::new(&opts).unwrap();
        field.set_value(vec![0x0102u16]);
        let mut out = BytesMut::new();
        assert!(matches!(
            field.write(&mut out),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_terminator() {
        let opts = FieldOptions::new().terminator(0x00);
        let mut field = SequenceField::<u8>::new(&opts).unwrap();
        let mut input = Bytes::from_static(&[0x41, 0x42, 0x00, 0x43]);
        field.read(&mut input).unwrap();
        assert_eq!(field.elements(), &[0x41, 0x42]);
        assert_eq!(input.remaining(), 1);

        assert_eq!(field.length(), 3);
        assert_eq!(&write_to_vec(&field)[..], &[0x41, 0x42, 0x00]);
    }

    #[test]
    fn test_terminator_with_elem_fixed_length() {
        // Padded elements must not be mistaken for extra elements when a
        // terminator ends the body.
        let opts = FieldOptions::new().terminator(0xFF).elem_fixed_length(2);
        let mut field = SequenceField::<u8>::new(&opts).unwrap();
        field.set_value(vec![1u8]);
        let encoded = write_to_vec(&field);
        assert_eq!(&encoded[..], &[0x01, 0x00, 0xFF]);

        let mut decoded = SequenceField::<u8>::new(&opts).unwrap();
        let mut input = encoded;
        decoded.read(&mut input).unwrap();
        assert_eq!(decoded.elements(), &[1]);
    }

    #[test]
    fn test_terminator_with_forced_elem_length() {
        let opts = FieldOptions::new().terminator(0xFF).elem_length_forcing();
        let mut field = SequenceField::<u8>::new(&opts).unwrap();
        field.force_read_elem_length(2);
        let mut input = Bytes::from_static(&[0x01, 0x02, 0xFF]);
        field.read(&mut input).unwrap();
        assert_eq!(field.elements(), &[1]);
        assert_eq!(input.remaining(), 0);
    }

    #[test]
    fn test_length_prefix_with_terminator_roundtrip() {
        // The declared length covers the terminator byte, so the field can
        // decode its own encoding.
        let opts = FieldOptions::new()
            .length_prefix(PrefixFormat::big(1))
            .terminator(0x00);
        let mut field = SequenceField::<u8>::new(&opts).unwrap();
        field.set_value(vec![0x41u8]);
        let encoded = write_to_vec(&field);
        assert_eq!(&encoded[..], &[0x02, 0x41, 0x00]);

        let mut decoded = SequenceField::<u8>::new(&opts).unwrap();
        let mut input = encoded;
        decoded.read(&mut input).unwrap();
        assert_eq!(decoded, field);
        assert_eq!(input.remaining(), 0);
    }

    #[test]
    fn test_terminator_missing() {
        let opts = FieldOptions::new().terminator(0x00);
        let mut field = SequenceField::<u8>::new(&opts).unwrap();
        let mut input = Bytes::from_static(&[0x41, 0x42]);
        assert!(matches!(field.read(&mut input), Err(Error::NotEnoughData)));
    }

    #[test]
    fn test_trailing_suffix() {
        let opts = FieldOptions::new().trailing(&b"\r\n"[..]);
        let mut field = SequenceField::<u8>::new(&opts).unwrap();
        let mut input = Bytes::from_static(&[0x41, 0x42, 0x0D, 0x0A]);
        field.read(&mut input).unwrap();
        assert_eq!(field.elements(), &[0x41, 0x42]);
        assert_eq!(input.remaining(), 0);
        assert_eq!(&write_to_vec(&field)[..], &[0x41, 0x42, 0x0D, 0x0A]);
    }

    #[test]
    fn test_trailing_suffix_mismatch() {
        let opts = FieldOptions::new().trailing(&b"\r\n"[..]);
        let mut field = SequenceField::<u8>::new(&opts).unwrap();
        let mut input = Bytes::from_static(&[0x41, 0x42, 0x0D, 0x0B]);
        assert!(matches!(
            field.read(&mut input),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_write_overflow() {
        let mut field = SequenceField::<u8>::plain();
        field.set_value(vec![1u8, 2, 3, 4]);
        let mut out = [0u8; 2];
        let mut slice = &mut out[..];
        assert!(matches!(
            field.write(&mut slice),
            Err(Error::BufferOverflow)
        ));
    }

    #[test]
    fn test_bounded_storage_rejects_long_input() {
        let opts = FieldOptions::new().fixed_capacity(2);
        let mut field = SequenceField::<u8, Bounded<u8, 2>>::new(&opts).unwrap();
        let mut input = Bytes::from_static(&[1, 2, 3]);
        assert!(matches!(
            field.read(&mut input),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_byte_view_roundtrip() {
        let opts = FieldOptions::new().zero_copy_view();
        let mut field = SequenceField::<u8, ByteView>::new(&opts).unwrap();
        let mut input = Bytes::from_static(&[1, 2, 3]);
        field.read(&mut input).unwrap();
        assert_eq!(field.elements(), &[1, 2, 3]);
        assert_eq!(&write_to_vec(&field)[..], &[1, 2, 3]);

        // Equal to a growable field holding the same elements.
        let mut growable = SequenceField::<u8>::plain();
        growable.set_value(vec![1u8, 2, 3]);
        assert_eq!(field, growable);
    }

    #[test]
    fn test_storage_mismatch() {
        let err = SequenceField::<u8, Bounded<u8, 4>>::new(&FieldOptions::new()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::StorageMismatch {
                expected: StorageKind::Growable,
                actual: StorageKind::Bounded,
            }
        );

        let err =
            SequenceField::<u8, Bounded<u8, 4>>::new(&FieldOptions::new().fixed_capacity(8))
                .unwrap_err();
        assert_eq!(
            err,
            ConfigError::CapacityMismatch {
                expected: 8,
                actual: 4,
            }
        );
    }

    #[test]
    fn test_max_length_unbounded() {
        let field = SequenceField::<u8>::plain();
        assert_eq!(field.max_length(), None);
        assert_eq!(field.min_length(), 0);
    }

    #[test]
    #[should_panic(expected = "count forcing option is not configured")]
    fn test_forcing_without_option_panics() {
        let mut field = SequenceField::<u8>::plain();
        field.force_read_elem_count(3);
    }

    #[test]
    #[should_panic(expected = "version storage option is not configured")]
    fn test_version_without_option_panics() {
        let field = SequenceField::<u8>::plain();
        let _ = field.version();
    }

    #[test]
    fn test_version_storage() {
        let opts = FieldOptions::new().version_storage();
        let mut field = SequenceField::<u8>::new(&opts).unwrap();
        assert!(field.is_version_dependent());
        assert!(field.set_version(5));
        assert_eq!(field.version(), 5);
        assert!(!field.set_version(5));
    }

    #[test]
    fn test_raw_sequence_never_refreshes() {
        let mut field = SequenceField::<u8>::plain();
        field.set_value(vec![1u8, 2, 3]);
        assert!(!field.refresh());
        assert!(field.valid());
        assert!(!field.is_version_dependent());
    }

    #[test]
    fn test_write_unchecked() {
        let mut field = SequenceField::<u8>::plain();
        field.set_value(vec![9u8, 8]);
        let mut out = BytesMut::new();
        field.write_unchecked(&mut out);
        assert_eq!(&out[..], &[9, 8]);
    }
}
