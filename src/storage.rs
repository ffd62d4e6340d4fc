//! Storage strategies backing a sequence field's value.
//!
//! Four interchangeable backends share one capability: an ordered,
//! contiguous container of elements. Which backend a field uses is resolved
//! once from its option set by [`resolve_storage`] and fixed for the field's
//! lifetime; switching strategies means re-declaring the field type.

use crate::{
    error::ConfigError,
    field::Field,
    options::{FieldOptions, StorageOpt},
    Error,
};
use bytes::{Buf, BufMut, Bytes};

/// The storage representation resolved from an option set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageKind {
    /// Unbounded growable buffer owning all elements.
    Growable,
    /// Bounded buffer with a fixed maximum capacity.
    Bounded,
    /// Zero-copy view aliasing the input buffer.
    View,
    /// Caller-supplied container.
    Custom,
}

/// Output of [`resolve_storage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedStorage {
    pub kind: StorageKind,
    /// Maximum element count, for [`StorageKind::Bounded`].
    pub capacity: Option<usize>,
}

/// Resolves the storage strategy for an option set.
///
/// Pure and deterministic; first match wins:
/// 1. explicit custom storage request;
/// 2. explicit fixed-capacity request;
/// 3. fixed element count combined with the fixed-count-storage option;
/// 4. zero-copy view request for a one-byte scalar element;
/// 5. growable buffer.
///
/// A view request for anything but a one-byte scalar element is a
/// configuration error regardless of which rule would have matched.
pub fn resolve_storage(
    options: &FieldOptions,
    elem_is_byte: bool,
) -> Result<ResolvedStorage, ConfigError> {
    if options.storage == StorageOpt::View && !elem_is_byte {
        return Err(ConfigError::ViewRequiresByteElement);
    }
    if options.fixed_count_storage && options.fixed_count.is_none() {
        return Err(ConfigError::FixedCountStorageWithoutFixedCount);
    }

    let resolved = match options.storage {
        StorageOpt::Custom => ResolvedStorage {
            kind: StorageKind::Custom,
            capacity: None,
        },
        StorageOpt::FixedCapacity(capacity) => ResolvedStorage {
            kind: StorageKind::Bounded,
            capacity: Some(capacity),
        },
        StorageOpt::View | StorageOpt::Default => match options.fixed_count {
            Some(count) if options.fixed_count_storage => ResolvedStorage {
                kind: StorageKind::Bounded,
                capacity: Some(count),
            },
            _ if options.storage == StorageOpt::View => ResolvedStorage {
                kind: StorageKind::View,
                capacity: None,
            },
            _ => ResolvedStorage {
                kind: StorageKind::Growable,
                capacity: None,
            },
        },
    };
    Ok(resolved)
}

/// The capability every storage backend presents to the sequence codec.
///
/// Implementors expose their elements as a contiguous slice; the codec never
/// inspects anything beyond this interface. A caller-supplied container
/// implements this trait with [`StorageKind::Custom`].
pub trait Storage<E: Field>: Clone + Default + PartialEq + std::fmt::Debug {
    const KIND: StorageKind;

    /// Maximum element count, if the backend is bounded.
    fn capacity() -> Option<usize> {
        None
    }

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);

    /// Appends an element. Exceeding a bounded backend's capacity is a
    /// logic error and panics; the codec pre-checks capacity on every read
    /// path so wire data can never trigger it.
    fn push(&mut self, elem: E);

    fn as_slice(&self) -> &[E];

    fn as_mut_slice(&mut self) -> &mut [E];

    /// Reads exactly `len` bytes of element payload, appending elements.
    ///
    /// The caller guarantees `buf.remaining() >= len`. The default decodes
    /// element-wise; the zero-copy view overrides it with a bulk slice.
    fn read_payload(&mut self, buf: &mut impl Buf, len: usize) -> Result<(), Error> {
        let mut window = buf.take(len);
        while window.has_remaining() {
            if Self::capacity().is_some_and(|cap| self.len() >= cap) {
                return Err(Error::InvalidData(
                    "sequence exceeds storage capacity".into(),
                ));
            }
            let mut elem = E::default();
            elem.read(&mut window)?;
            self.push(elem);
        }
        Ok(())
    }

    /// Writes every element's payload in order. The caller has already
    /// verified the byte budget.
    fn write_payload(&self, buf: &mut impl BufMut) -> Result<(), Error> {
        for elem in self.as_slice() {
            elem.write(buf)?;
        }
        Ok(())
    }
}

/// Unbounded growable storage; the default strategy.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Growable<E>(Vec<E>);

impl<E> Growable<E> {
    pub fn into_vec(self) -> Vec<E> {
        self.0
    }
}

impl<E> From<Vec<E>> for Growable<E> {
    fn from(items: Vec<E>) -> Self {
        Self(items)
    }
}

impl<E> FromIterator<E> for Growable<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<E: Field> Storage<E> for Growable<E> {
    const KIND: StorageKind = StorageKind::Growable;

    fn len(&self) -> usize {
        self.0.len()
    }

    fn clear(&mut self) {
        self.0.clear();
    }

    fn push(&mut self, elem: E) {
        self.0.push(elem);
    }

    fn as_slice(&self) -> &[E] {
        &self.0
    }

    fn as_mut_slice(&mut self) -> &mut [E] {
        &mut self.0
    }
}

/// Bounded storage with a compile-time maximum capacity.
#[derive(Clone, Debug, PartialEq)]
pub struct Bounded<E, const N: usize>(Vec<E>);

impl<E, const N: usize> Default for Bounded<E, N> {
    fn default() -> Self {
        Self(Vec::with_capacity(N))
    }
}

impl<E, const N: usize> From<Vec<E>> for Bounded<E, N> {
    fn from(items: Vec<E>) -> Self {
        assert!(items.len() <= N, "bounded storage capacity {N} exceeded");
        Self(items)
    }
}

impl<E: Field, const N: usize> Storage<E> for Bounded<E, N> {
    const KIND: StorageKind = StorageKind::Bounded;

    fn capacity() -> Option<usize> {
        Some(N)
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn clear(&mut self) {
        self.0.clear();
    }

    fn push(&mut self, elem: E) {
        assert!(self.0.len() < N, "bounded storage capacity {N} exceeded");
        self.0.push(elem);
    }

    fn as_slice(&self) -> &[E] {
        &self.0
    }

    fn as_mut_slice(&mut self) -> &mut [E] {
        &mut self.0
    }
}

/// Zero-copy view storage for one-byte scalar elements.
///
/// Does not own its bytes: reading from a [`Bytes`]-backed cursor aliases
/// the input buffer via refcount instead of copying. Element mutation is
/// not provided; replace the whole value instead.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ByteView(Bytes);

impl ByteView {
    pub fn as_bytes(&self) -> &Bytes {
        &self.0
    }
}

impl From<Bytes> for ByteView {
    fn from(bytes: Bytes) -> Self {
        Self(bytes)
    }
}

impl Storage<u8> for ByteView {
    const KIND: StorageKind = StorageKind::View;

    fn len(&self) -> usize {
        self.0.len()
    }

    fn clear(&mut self) {
        self.0.clear();
    }

    fn push(&mut self, _elem: u8) {
        panic!("zero-copy view storage cannot append elements");
    }

    fn as_slice(&self) -> &[u8] {
        &self.0
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut []
    }

    fn read_payload(&mut self, buf: &mut impl Buf, len: usize) -> Result<(), Error> {
        self.0 = buf.copy_to_bytes(len);
        Ok(())
    }

    fn write_payload(&self, buf: &mut impl BufMut) -> Result<(), Error> {
        buf.put_slice(&self.0);
        Ok(())
    }
}
