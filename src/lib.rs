//! Composable binary-protocol field codecs.
//!
//! A field pairs a typed value with a wire policy: how the value is framed,
//! counted, padded, and terminated on the wire. Policies are declared as a
//! [`FieldOptions`] set and resolved once at construction; contradictory or
//! inapplicable options are rejected there with a [`ConfigError`] naming the
//! offender, so a field that exists is a field that can be read and written.
//!
//! The [`Field`] trait is the universal contract: raw fixed-width scalars
//! implement it directly, and [`SequenceField`] implements it for ordered
//! collections of any element field, so sequences nest. Storage behind a
//! sequence is pluggable through the [`Storage`] trait, with growable,
//! bounded, and zero-copy-view backends provided.
//!
//! # Example
//!
//! ```rust
//! use bytes::{Bytes, BytesMut};
//! use wirefield::{Field, FieldOptions, PrefixFormat, SequenceField};
//!
//! // A sequence of u16 values, count-prefixed with a varint.
//! let opts = FieldOptions::new().size_prefix(PrefixFormat::Varint);
//! let mut field = SequenceField::<u16>::new(&opts).unwrap();
//! field.set_value(vec![0xCAFEu16, 0xBEEF]);
//!
//! let mut encoded = BytesMut::new();
//! field.write(&mut encoded).unwrap();
//! assert_eq!(encoded.len(), field.length());
//!
//! let mut decoded = SequenceField::<u16>::new(&opts).unwrap();
//! let mut input = encoded.freeze();
//! decoded.read(&mut input).unwrap();
//! assert_eq!(decoded, field);
//! ```

pub mod config;
pub mod error;
pub mod field;
pub mod options;
pub mod sequence;
pub mod storage;
pub mod varint;

pub use config::SequenceConfig;
pub use error::{ConfigError, Error};
pub use field::Field;
pub use options::{Endian, FieldOptions, PrefixFormat, StorageOpt, Units};
pub use sequence::SequenceField;
pub use storage::{
    resolve_storage, Bounded, ByteView, Growable, ResolvedStorage, Storage, StorageKind,
};
