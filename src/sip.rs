use byteorder::{ByteOrder, LittleEndian};
use digest::consts::U8;
use digest::{FixedOutput, FixedOutputReset, HashMarker, Output, OutputSizeUser, Reset, Update};
use rand::Rng;
use siphasher::sip::SipHasher;
use std::hash::Hasher;
use std::{cmp, fmt};

/// A keyed, non-cryptographic digest algorithm built on SipHash-2-4.
///
/// `SipDigest` implements the [`digest::Digest`] family of traits, so it can be used anywhere a
/// cryptographic digest such as SHA-256 is accepted. Its output is the 64-bit SipHash of the
/// absorbed bytes, encoded as 8 little-endian bytes.
///
/// The default instance is keyed with `(0, 0)`, which makes indices derived from it
/// reproducible across runs.
///
/// # Examples
///
/// ```
/// use digest::Digest;
/// use membership_filter::SipDigest;
///
/// let mut digest = SipDigest::from_seed(0, 0);
/// digest.update(b"a");
/// assert_eq!(digest.finalize().len(), 8);
/// ```
#[derive(Clone)]
pub struct SipDigest {
    k0: u64,
    k1: u64,
    hasher: SipHasher,
}

impl SipDigest {
    /// Constructs a new `SipDigest` that uses the thread-local RNG to seed itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use membership_filter::SipDigest;
    ///
    /// let digest = SipDigest::from_entropy();
    /// ```
    pub fn from_entropy() -> Self {
        let mut rng = rand::thread_rng();
        Self::from_seed(rng.gen(), rng.gen())
    }

    /// Constructs a new `SipDigest` that is seeded with the given keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use membership_filter::SipDigest;
    ///
    /// let digest = SipDigest::from_seed(0, 0);
    /// assert_eq!(digest.keys(), (0, 0));
    /// ```
    pub fn from_seed(k0: u64, k1: u64) -> Self {
        SipDigest {
            k0,
            k1,
            hasher: SipHasher::new_with_keys(k0, k1),
        }
    }

    /// Returns the keys the digest was seeded with.
    pub fn keys(&self) -> (u64, u64) {
        (self.k0, self.k1)
    }
}

impl Default for SipDigest {
    fn default() -> Self {
        Self::from_seed(0, 0)
    }
}

impl fmt::Debug for SipDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SipDigest")
            .field("k0", &self.k0)
            .field("k1", &self.k1)
            .finish()
    }
}

impl cmp::PartialEq for SipDigest {
    fn eq(&self, other: &SipDigest) -> bool {
        self.k0 == other.k0 && self.k1 == other.k1
    }
}

impl HashMarker for SipDigest {}

impl OutputSizeUser for SipDigest {
    type OutputSize = U8;
}

impl Update for SipDigest {
    fn update(&mut self, data: &[u8]) {
        self.hasher.write(data);
    }
}

impl FixedOutput for SipDigest {
    fn finalize_into(self, out: &mut Output<Self>) {
        LittleEndian::write_u64(out.as_mut_slice(), self.hasher.finish());
    }
}

impl Reset for SipDigest {
    fn reset(&mut self) {
        self.hasher = SipHasher::new_with_keys(self.k0, self.k1);
    }
}

impl FixedOutputReset for SipDigest {
    fn finalize_into_reset(&mut self, out: &mut Output<Self>) {
        LittleEndian::write_u64(out.as_mut_slice(), self.hasher.finish());
        Reset::reset(self);
    }
}
