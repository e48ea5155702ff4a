//! Error types

use thiserror::Error;

/// Errors raised while reading or writing account data
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum LayoutError {
    /// The buffer ends before the value being decoded
    #[error("Truncated input: {needed} bytes needed at offset {offset}, {available} available")]
    TruncatedInput {
        /// Offset the read started at
        offset: usize,
        /// Bytes the read required
        needed: usize,
        /// Bytes left in the buffer from `offset`
        available: usize,
    },
    /// The destination buffer has no room for the value being encoded
    #[error("Buffer too small: {needed} bytes needed at offset {offset}, {available} available")]
    BufferTooSmall {
        /// Offset the write started at
        offset: usize,
        /// Bytes the write required
        needed: usize,
        /// Bytes left in the buffer from `offset`
        available: usize,
    },
    /// A tag byte (option, bool or enum) is outside of its domain
    #[error("Invalid discriminator {value} for {field}")]
    InvalidDiscriminator {
        /// Name of the field being decoded
        field: &'static str,
        /// Offending byte
        value: u8,
    },
    /// A value has no representation in its layout
    #[error("Value of {field} cannot be encoded")]
    UnencodableValue {
        /// Name of the field being encoded
        field: &'static str,
    },
}

/// Errors raised while planning a stake withdrawal
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum WithdrawError {
    /// The validator list is missing or holds no validators
    #[error("No staked funds available for delayed unstake, use instant unstake instead")]
    NoStakeAvailable,
    /// Not enough stake can be withdrawn to cover the request
    #[error(
        "Not enough staked funds for delayed unstake: requested {requested} pool tokens, \
         only {available} available"
    )]
    InsufficientFunds {
        /// Pool tokens requested
        requested: u64,
        /// Pool tokens that could be covered by delayed unstake
        available: u64,
    },
    /// Checked math overflowed
    #[error("Calculation failure")]
    CalculationFailure,
    /// The validator list could not be decoded
    #[error(transparent)]
    Layout(#[from] LayoutError),
}
