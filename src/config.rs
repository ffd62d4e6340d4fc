//! Resolution of an option set into an immutable sequence configuration.

use crate::{
    error::ConfigError,
    field::Field,
    options::{FieldOptions, PrefixFormat},
    storage::{resolve_storage, StorageKind},
};
use bytes::Bytes;

/// The frozen wire policy of a sequence field.
///
/// Produced once by [`SequenceConfig::resolve`] and never mutated; every
/// contradiction in the option set has been rejected by the time a value of
/// this type exists.
#[derive(Clone, Debug)]
pub struct SequenceConfig {
    pub(crate) storage_kind: StorageKind,
    pub(crate) storage_capacity: Option<usize>,
    pub(crate) size_prefix: Option<PrefixFormat>,
    pub(crate) length_prefix: Option<PrefixFormat>,
    pub(crate) fixed_count: Option<usize>,
    pub(crate) elem_length: Option<usize>,
    pub(crate) terminator: Option<u8>,
    pub(crate) trailing: Option<Bytes>,
    pub(crate) count_forcing: bool,
    pub(crate) length_forcing: bool,
    pub(crate) elem_length_forcing: bool,
    pub(crate) version_storage: bool,
}

impl SequenceConfig {
    /// Validates the option set for a sequence of `E` and freezes it.
    ///
    /// The check is exhaustive: every option a sequence field cannot honor
    /// is rejected here with the [`ConfigError`] variant naming it, and
    /// contradictory combinations of applicable options are rejected before
    /// any read or write can occur.
    pub fn resolve<E: Field>(options: &FieldOptions) -> Result<Self, ConfigError> {
        // Options consumed by other field kinds.
        if options.ser_offset.is_some() {
            return Err(ConfigError::SerOffset);
        }
        if options.fixed_length.is_some() {
            return Err(ConfigError::FixedLength);
        }
        if options.fixed_bit_length.is_some() {
            return Err(ConfigError::FixedBitLength);
        }
        if options.var_length.is_some() {
            return Err(ConfigError::VarLength);
        }
        if options.available_length_limit.is_some() {
            return Err(ConfigError::AvailableLengthLimit);
        }
        if options.scaling.is_some() {
            return Err(ConfigError::ScalingRatio);
        }
        if options.units.is_some() {
            return Err(ConfigError::Units);
        }
        if !options.valid_ranges.is_empty() {
            return Err(ConfigError::RangeValidation);
        }
        if options.versions_range.is_some() {
            return Err(ConfigError::VersionsRange);
        }
        if options.invalid_by_default {
            return Err(ConfigError::InvalidByDefault);
        }
        if options.missing_on_read_fail {
            return Err(ConfigError::MissingOnReadFail);
        }
        if options.missing_on_invalid {
            return Err(ConfigError::MissingOnInvalid);
        }

        // Prefix checks.
        if options.size_prefix.is_some() && options.length_prefix.is_some() {
            return Err(ConfigError::ConflictingPrefixes);
        }
        for prefix in [options.size_prefix, options.length_prefix]
            .into_iter()
            .flatten()
        {
            if let PrefixFormat::Fixed { width, .. } = prefix {
                if width == 0 || width > 8 {
                    return Err(ConfigError::InvalidPrefixWidth(width));
                }
            }
        }
        if options.elem_fixed_length == Some(0) {
            return Err(ConfigError::ZeroElemLength);
        }

        // A terminator determines the element count on its own; pairing it
        // with a count-driven policy would leave write and read disagreeing
        // on the source of truth.
        if options.terminator.is_some()
            && (options.fixed_count.is_some()
                || options.size_prefix.is_some()
                || options.count_forcing)
        {
            return Err(ConfigError::TerminatorWithCount);
        }

        let elem_is_byte = E::RAW && E::default().length() == 1;
        let resolved = resolve_storage(options, elem_is_byte)?;

        // The view backend fills itself with one bulk slice; policies that
        // force element-wise decoding cannot target it.
        if resolved.kind == StorageKind::View
            && (options.terminator.is_some()
                || options.elem_fixed_length.is_some()
                || options.elem_length_forcing)
        {
            return Err(ConfigError::ViewIncompatibleOption);
        }

        Ok(Self {
            storage_kind: resolved.kind,
            storage_capacity: resolved.capacity,
            size_prefix: options.size_prefix,
            length_prefix: options.length_prefix,
            fixed_count: options.fixed_count,
            elem_length: options.elem_fixed_length,
            terminator: options.terminator,
            trailing: options.trailing.clone(),
            count_forcing: options.count_forcing,
            length_forcing: options.length_forcing,
            elem_length_forcing: options.elem_length_forcing,
            version_storage: options.version_storage,
        })
    }

    /// Default wire policy for a field constructed without options, with
    /// the storage fields matching the chosen backend.
    pub(crate) fn for_storage(kind: StorageKind, capacity: Option<usize>) -> Self {
        Self {
            storage_kind: kind,
            storage_capacity: capacity,
            size_prefix: None,
            length_prefix: None,
            fixed_count: None,
            elem_length: None,
            terminator: None,
            trailing: None,
            count_forcing: false,
            length_forcing: false,
            elem_length_forcing: false,
            version_storage: false,
        }
    }
}
