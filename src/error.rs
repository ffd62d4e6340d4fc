//! Error types for field codec operations.

use crate::storage::StorageKind;
use thiserror::Error;

/// Outcome of a read or write attempt.
///
/// Returned as the `Err` half of every codec operation; a successful
/// operation is `Ok(())`. Malformed or truncated wire data never panics.
#[derive(Error, Debug)]
pub enum Error {
    #[error("not enough data in input buffer")]
    NotEnoughData,
    #[error("output buffer overflow")]
    BufferOverflow,
    #[error("invalid message data: {0}")]
    InvalidData(String),
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Configuration-time rejection of an option set.
///
/// Returned from field construction, before any read or write can occur.
/// Each variant names the option (or conflict) that made the configuration
/// invalid for a sequence field.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("serialization offset option is not applicable to sequence fields")]
    SerOffset,
    #[error("fixed length limit option is not applicable to sequence fields")]
    FixedLength,
    #[error("fixed bit length limit option is not applicable to sequence fields")]
    FixedBitLength,
    #[error("variable length limit option is not applicable to sequence fields")]
    VarLength,
    #[error("available length limit option is not applicable to sequence fields")]
    AvailableLengthLimit,
    #[error("scaling ratio option is not applicable to sequence fields")]
    ScalingRatio,
    #[error("units option is not applicable to sequence fields")]
    Units,
    #[error("numeric range validation option is not applicable to sequence fields")]
    RangeValidation,
    #[error("version range option is not applicable to sequence fields")]
    VersionsRange,
    #[error("invalid-by-default option is not applicable to sequence fields")]
    InvalidByDefault,
    #[error("missing-on-read-fail option is not applicable to sequence fields")]
    MissingOnReadFail,
    #[error("missing-on-invalid option is not applicable to sequence fields")]
    MissingOnInvalid,
    #[error("zero-copy view storage requires a one-byte scalar element")]
    ViewRequiresByteElement,
    #[error("zero-copy view storage cannot be combined with terminator or per-element length options")]
    ViewIncompatibleOption,
    #[error("size prefix and length prefix cannot both be configured")]
    ConflictingPrefixes,
    #[error("terminator cannot be combined with a count-driven read policy")]
    TerminatorWithCount,
    #[error("fixed-count storage option requires a fixed element count")]
    FixedCountStorageWithoutFixedCount,
    #[error("prefix width must be between 1 and 8 bytes, got {0}")]
    InvalidPrefixWidth(usize),
    #[error("per-element fixed length must be non-zero")]
    ZeroElemLength,
    #[error("storage type {actual:?} does not match resolved strategy {expected:?}")]
    StorageMismatch {
        expected: StorageKind,
        actual: StorageKind,
    },
    #[error("bounded storage capacity {actual} does not match resolved capacity {expected}")]
    CapacityMismatch { expected: usize, actual: usize },
}
