//! Single-hash membership filter backed by a growable bit vector.

use crate::bit_vec::{BitVec, Ones};
use crate::error::{Error, Result};
use crate::index;
use digest::Digest;
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};
use std::convert::TryFrom;
use tracing::{debug, trace};

/// Configuration for a [`MembershipFilter`].
///
/// The default configuration places no bound on the length of the filter and reserves no
/// storage up front.
///
/// # Examples
///
/// ```
/// use membership_filter::FilterConfig;
///
/// let config = FilterConfig::default()
///     .with_max_len(1 << 20)
///     .with_initial_capacity(1024);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(crate = "serde_crate")
)]
pub struct FilterConfig {
    /// The largest number of bits the filter may grow to. `None` means unbounded.
    pub max_len: Option<usize>,
    /// The number of bits to reserve storage for when the filter is created.
    pub initial_capacity: usize,
}

impl FilterConfig {
    /// Sets the largest number of bits the filter may grow to.
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    /// Sets the number of bits to reserve storage for up front.
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Checks that the configuration is consistent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `initial_capacity` is greater than `max_len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use membership_filter::FilterConfig;
    ///
    /// let config = FilterConfig::default()
    ///     .with_max_len(8)
    ///     .with_initial_capacity(16);
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        match self.max_len {
            Some(max_len) if self.initial_capacity > max_len => Err(Error::InvalidConfig(format!(
                "initial capacity {} exceeds max len {}",
                self.initial_capacity, max_len
            ))),
            _ => Ok(()),
        }
    }
}

/// A probabilistic data structure to test for membership in a set, using a single hash function.
///
/// Values are absorbed by a caller-supplied [`Digest`] and the leading bytes of the digest output
/// are decoded as a zigzag varint. The decoded integer is normalized to its absolute value and
/// used directly as an offset into a bit vector, which grows to `index + 1` bits whenever an
/// offset past its end is inserted. Bits are never cleared.
///
/// Because indices are taken as absolute values, `n` and `-n` share a bit; this collision is the
/// only source of false positives. There are no false negatives.
///
/// Growing copies the existing bits, so inserting strictly increasing indices costs quadratic time
/// in the largest index. Indices derived from real digests can be very large, so long-lived filters
/// should set [`FilterConfig::max_len`].
///
/// A filter is a plain owned value: mutation requires `&mut self`, and callers that share a
/// filter between threads wrap it in their own lock.
///
/// # Examples
///
/// ```
/// use membership_filter::MembershipFilter;
/// use sha2::{Digest, Sha256};
///
/// let mut filter = MembershipFilter::new();
///
/// let index = filter.insert_value(&mut Sha256::new(), "b").unwrap();
/// assert_eq!(index, 31);
/// assert!(filter.contains(index));
///
/// filter.insert(-5).unwrap();
/// assert!(filter.contains(5));
/// assert!(!filter.contains(6));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(crate = "serde_crate")
)]
pub struct MembershipFilter {
    bit_vec: BitVec,
    config: FilterConfig,
}

impl MembershipFilter {
    /// Constructs a new, empty `MembershipFilter` with the default configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use membership_filter::MembershipFilter;
    ///
    /// let filter = MembershipFilter::new();
    /// assert!(filter.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a new, empty `MembershipFilter` with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the configuration does not
    /// [validate](FilterConfig::validate).
    ///
    /// # Examples
    ///
    /// ```
    /// use membership_filter::{FilterConfig, MembershipFilter};
    ///
    /// let filter = MembershipFilter::with_config(FilterConfig::default().with_max_len(64)).unwrap();
    /// assert_eq!(filter.config().max_len, Some(64));
    /// assert_eq!(filter.len(), 0);
    /// ```
    pub fn with_config(config: FilterConfig) -> Result<Self> {
        config.validate()?;
        Ok(MembershipFilter {
            bit_vec: BitVec::with_capacity(config.initial_capacity),
            config,
        })
    }

    fn max_len(&self) -> usize {
        self.config.max_len.unwrap_or_else(usize::max_value)
    }

    // Grows the bit vector so that `index` is in bounds.
    fn ensure_capacity(&mut self, index: u64) -> Result<usize> {
        let max_len = self.max_len();
        let offset = usize::try_from(index)
            .ok()
            .filter(|offset| *offset < max_len)
            .ok_or_else(|| {
                debug!(index, max_len, "index exceeds the maximum filter length");
                Error::CapacityExceeded { index, max_len }
            })?;

        if offset >= self.bit_vec.len() {
            trace!(from = self.bit_vec.len(), to = offset + 1, "growing filter");
            self.bit_vec.grow(offset + 1);
        }
        Ok(offset)
    }

    fn insert_normalized(&mut self, index: u64) -> Result<usize> {
        let offset = self.ensure_capacity(index)?;
        self.bit_vec.insert(offset);
        Ok(offset)
    }

    /// Inserts an index into the filter and returns the offset of the bit that was set.
    ///
    /// Negative indices are normalized to their absolute value first. The filter grows to
    /// `index + 1` bits if needed, keeping every bit that was already set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if the filter would have to grow past
    /// [`FilterConfig::max_len`], or past what `usize` can address. The filter is left unchanged.
    /// With the default configuration on a 64-bit target this never fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use membership_filter::MembershipFilter;
    ///
    /// let mut filter = MembershipFilter::new();
    ///
    /// assert_eq!(filter.insert(-5).unwrap(), 5);
    /// assert_eq!(filter.len(), 6);
    /// assert!(filter.contains(5));
    /// ```
    pub fn insert(&mut self, index: i64) -> Result<usize> {
        self.insert_normalized(index::normalize(index))
    }

    /// Absorbs `value` into `digest`, derives an index from the digest output, and inserts it.
    /// Returns the offset of the bit that was set.
    ///
    /// See [`derive_index`](crate::index::derive_index) for how the index is derived and how
    /// `digest` is affected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValueLength`] if `value` is longer than one byte, [`Error::Decode`] if the
    /// digest output is not a valid varint, and [`Error::CapacityExceeded`] as for
    /// [`insert`](MembershipFilter::insert). The filter is left unchanged on error.
    ///
    /// # Examples
    ///
    /// ```
    /// use membership_filter::{Error, MembershipFilter};
    /// use sha2::{Digest, Sha256};
    ///
    /// let mut filter = MembershipFilter::new();
    ///
    /// assert_eq!(filter.insert_value(&mut Sha256::new(), "z"), Ok(45));
    /// assert_eq!(
    ///     filter.insert_value(&mut Sha256::new(), "zz"),
    ///     Err(Error::ValueLength { len: 2 }),
    /// );
    /// assert_eq!(filter.count_ones(), 1);
    /// ```
    pub fn insert_value<D, V>(&mut self, digest: &mut D, value: V) -> Result<usize>
    where
        D: Digest + Clone,
        V: AsRef<[u8]>,
    {
        let index = index::derive_index(digest, value.as_ref())?;
        self.insert_normalized(index)
    }

    /// Checks if the bit at `index` is set.
    ///
    /// This is an unchecked query: the caller must ensure `index < self.len()`. Use
    /// [`try_contains`](MembershipFilter::try_contains) for a checked query.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use membership_filter::MembershipFilter;
    ///
    /// let mut filter = MembershipFilter::new();
    /// filter.insert(3).unwrap();
    ///
    /// assert!(filter.contains(3));
    /// assert!(!filter.contains(2));
    /// ```
    pub fn contains(&self, index: usize) -> bool {
        self.bit_vec[index]
    }

    /// Checks if the bit at `index` is set, failing if `index` is out of bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `index >= self.len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use membership_filter::{Error, MembershipFilter};
    ///
    /// let mut filter = MembershipFilter::new();
    /// filter.insert(3).unwrap();
    ///
    /// assert_eq!(filter.try_contains(3), Ok(true));
    /// assert_eq!(filter.try_contains(4), Err(Error::OutOfBounds { index: 4, len: 4 }));
    /// ```
    pub fn try_contains(&self, index: usize) -> Result<bool> {
        self.bit_vec.get(index).ok_or(Error::OutOfBounds {
            index,
            len: self.bit_vec.len(),
        })
    }

    /// Absorbs `value` into `digest` and checks if the derived index is possibly in the filter.
    /// Indices past the end of the filter were never inserted and report `false`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValueLength`] or [`Error::Decode`] as for
    /// [`insert_value`](MembershipFilter::insert_value).
    ///
    /// # Examples
    ///
    /// ```
    /// use membership_filter::MembershipFilter;
    /// use sha2::{Digest, Sha256};
    ///
    /// let mut filter = MembershipFilter::new();
    /// filter.insert_value(&mut Sha256::new(), "b").unwrap();
    ///
    /// assert_eq!(filter.contains_value(&mut Sha256::new(), "b"), Ok(true));
    /// assert_eq!(filter.contains_value(&mut Sha256::new(), "a"), Ok(false));
    /// ```
    pub fn contains_value<D, V>(&self, digest: &mut D, value: V) -> Result<bool>
    where
        D: Digest + Clone,
        V: AsRef<[u8]>,
    {
        let index = index::derive_index(digest, value.as_ref())?;
        Ok(usize::try_from(index)
            .ok()
            .and_then(|offset| self.bit_vec.get(offset))
            .unwrap_or(false))
    }

    /// Adds every index set in `other` to `self`, growing `self` to the longer of the two lengths.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if `other` is longer than `self`'s
    /// [`FilterConfig::max_len`]. `self` is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use membership_filter::MembershipFilter;
    ///
    /// let mut filter1 = MembershipFilter::new();
    /// filter1.insert(1).unwrap();
    ///
    /// let mut filter2 = MembershipFilter::new();
    /// filter2.insert(9).unwrap();
    ///
    /// filter1.union(&filter2).unwrap();
    /// assert_eq!(filter1.indices().collect::<Vec<usize>>(), vec![1, 9]);
    /// ```
    pub fn union(&mut self, other: &MembershipFilter) -> Result<()> {
        if other.is_empty() {
            return Ok(());
        }
        self.ensure_capacity(other.len() as u64 - 1)?;

        if other.len() == self.len() {
            self.bit_vec.union(&other.bit_vec);
        } else {
            let mut other_bit_vec = other.bit_vec.clone();
            other_bit_vec.grow(self.len());
            self.bit_vec.union(&other_bit_vec);
        }
        Ok(())
    }

    /// Returns an iterator over the set indices of the filter in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use membership_filter::MembershipFilter;
    ///
    /// let mut filter = MembershipFilter::new();
    /// filter.insert(7).unwrap();
    /// filter.insert(-2).unwrap();
    ///
    /// assert_eq!(filter.indices().collect::<Vec<usize>>(), vec![2, 7]);
    /// ```
    pub fn indices(&self) -> Ones<'_> {
        self.bit_vec.ones()
    }

    /// Returns the number of bits in the filter.
    pub fn len(&self) -> usize {
        self.bit_vec.len()
    }

    /// Returns the number of bits the filter can grow to without reallocating.
    ///
    /// # Examples
    ///
    /// ```
    /// use membership_filter::{FilterConfig, MembershipFilter};
    ///
    /// let config = FilterConfig::default().with_initial_capacity(64);
    /// let filter = MembershipFilter::with_config(config).unwrap();
    ///
    /// assert_eq!(filter.len(), 0);
    /// assert!(filter.capacity() >= 64);
    /// ```
    pub fn capacity(&self) -> usize {
        self.bit_vec.capacity()
    }

    /// Returns `true` if the filter has no bits.
    pub fn is_empty(&self) -> bool {
        self.bit_vec.is_empty()
    }

    /// Returns the number of set bits in the filter.
    pub fn count_ones(&self) -> usize {
        self.bit_vec.count_ones()
    }

    /// Returns the number of unset bits in the filter.
    pub fn count_zeros(&self) -> usize {
        self.bit_vec.count_zeros()
    }

    /// Returns the configuration of the filter.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }
}
