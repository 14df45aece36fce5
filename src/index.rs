//! Derivation of bit vector indices from digests.

use crate::error::{Error, Result};
use crate::varint;
use digest::Digest;
use tracing::debug;

/// The largest value, in bytes, that can be turned into an index.
pub const MAX_VALUE_LEN: usize = 1;

/// Maps a signed index candidate to a non-negative index by taking its absolute value.
///
/// `n` and `-n` map to the same index.
///
/// # Examples
///
/// ```
/// use membership_filter::index::normalize;
///
/// assert_eq!(normalize(5), 5);
/// assert_eq!(normalize(-5), 5);
/// assert_eq!(normalize(i64::min_value()), 1 << 63);
/// ```
pub fn normalize(index: i64) -> u64 {
    index.unsigned_abs()
}

/// Absorbs `value` into `digest` and derives a non-negative index from the digest output.
///
/// The digest output is read without resetting `digest`, so the caller's instance keeps every
/// byte it has absorbed; reusing an instance across calls derives indices from the concatenation
/// of all values passed so far. The leading bytes of the output are decoded as a zigzag varint
/// and [normalized](normalize).
///
/// Values longer than [`MAX_VALUE_LEN`] are rejected before anything is absorbed. An empty value
/// is accepted and yields the index of the digest of whatever the instance has absorbed so far.
///
/// # Errors
///
/// Returns [`Error::ValueLength`] if `value` is longer than one byte, and [`Error::Decode`] if
/// the digest output does not start with a valid varint.
///
/// # Examples
///
/// ```
/// use membership_filter::index::derive_index;
/// use sha2::{Digest, Sha256};
///
/// assert_eq!(derive_index(&mut Sha256::new(), b"a"), Ok(18_884_069));
/// assert!(derive_index(&mut Sha256::new(), b"ab").is_err());
/// ```
pub fn derive_index<D>(digest: &mut D, value: &[u8]) -> Result<u64>
where
    D: Digest + Clone,
{
    if value.len() > MAX_VALUE_LEN {
        debug!(len = value.len(), "rejecting value longer than one byte");
        return Err(Error::ValueLength { len: value.len() });
    }

    Digest::update(digest, value);
    let output = digest.clone().finalize();
    let (index, _) = varint::read_varint(&output).map_err(|err| {
        debug!(error = %err, "digest output is not a valid varint");
        err
    })?;
    Ok(normalize(index))
}
