//! Error types for membership filters.

use crate::varint::DecodeError;
use thiserror::Error;

/// Errors that can occur when deriving indices or inserting into a membership filter.
///
/// None of these errors leave a filter partially modified: an operation that fails does not
/// touch the bit vector.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// The value is longer than the single byte a filter accepts.
    #[error("value must be at most one byte long, got {len} bytes")]
    ValueLength {
        /// Length of the rejected value in bytes.
        len: usize,
    },

    /// The digest output does not start with a valid varint.
    #[error("failed to decode digest as a varint: {0}")]
    Decode(#[from] DecodeError),

    /// Growing the filter to hold `index` would exceed the configured maximum length.
    #[error("index {index} does not fit in a filter of at most {max_len} bits")]
    CapacityExceeded {
        /// The normalized index that was rejected.
        index: u64,
        /// The largest number of bits the filter may hold.
        max_len: usize,
    },

    /// A checked query was made past the end of the filter.
    #[error("index out of bounds: the len is {len} but the index is {index}")]
    OutOfBounds {
        /// The queried index.
        index: usize,
        /// The length of the filter at the time of the query.
        len: usize,
    },

    /// The filter configuration is inconsistent.
    #[error("invalid filter configuration: {0}")]
    InvalidConfig(String),
}

/// A specialized `Result` type for membership filter operations.
pub type Result<T> = std::result::Result<T, Error>;
