//! Growable, accumulate-only list of bits.

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};
use std::mem;
use std::ops::{Index, Range};

/// A growable list of bits implemented using a `Vec<u8>`.
///
/// Bits can only be set, never cleared, and the list only grows through
/// [`grow`](BitVec::grow).
///
/// # Examples
///
/// ```
/// use membership_filter::bit_vec::BitVec;
///
/// let mut bv = BitVec::new(3);
/// bv.insert(1);
///
/// bv.grow(5);
/// bv.insert(4);
/// assert_eq!(bv.len(), 5);
/// assert_eq!(bv.ones().collect::<Vec<usize>>(), vec![1, 4]);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(crate = "serde_crate")
)]
pub struct BitVec {
    blocks: Vec<u8>,
    len: usize,
    one_count: usize,
}

const BLOCK_BIT_COUNT: usize = mem::size_of::<u8>() * 8;

impl BitVec {
    fn get_block_count(len: usize) -> usize {
        (len + BLOCK_BIT_COUNT - 1) / BLOCK_BIT_COUNT
    }

    /// Constructs a new `BitVec` with `len` unset bits.
    ///
    /// # Examples
    ///
    /// ```
    /// use membership_filter::bit_vec::BitVec;
    ///
    /// let bv = BitVec::new(5);
    /// assert_eq!(bv.len(), 5);
    /// assert_eq!(bv.count_zeros(), 5);
    /// ```
    pub fn new(len: usize) -> Self {
        BitVec {
            blocks: vec![0; Self::get_block_count(len)],
            len,
            one_count: 0,
        }
    }

    /// Constructs a new, empty `BitVec` with storage for at least `len` bits, so growing up to
    /// `len` bits does not reallocate.
    pub fn with_capacity(len: usize) -> Self {
        BitVec {
            blocks: Vec::with_capacity(Self::get_block_count(len)),
            len: 0,
            one_count: 0,
        }
    }

    /// Sets the bit at `index`. Returns `true` if the bit was previously unset.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use membership_filter::bit_vec::BitVec;
    ///
    /// let mut bv = BitVec::new(5);
    ///
    /// assert!(bv.insert(1));
    /// assert!(!bv.insert(1));
    /// assert_eq!(bv.get(1), Some(true));
    /// ```
    pub fn insert(&mut self, index: usize) -> bool {
        assert!(
            index < self.len,
            "index out of bounds: the len is {} but the index is {}",
            self.len,
            index
        );
        let mask = 1 << (index % BLOCK_BIT_COUNT);
        let block = &mut self.blocks[index / BLOCK_BIT_COUNT];
        let newly_set = *block & mask == 0;
        if newly_set {
            *block |= mask;
            self.one_count += 1;
        }
        newly_set
    }

    /// Returns the value at index `index`, or `None` if index is out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use membership_filter::bit_vec::BitVec;
    ///
    /// let mut bv = BitVec::new(5);
    /// bv.insert(1);
    ///
    /// assert_eq!(bv.get(0), Some(false));
    /// assert_eq!(bv.get(1), Some(true));
    /// assert_eq!(bv.get(5), None);
    /// ```
    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            None
        } else {
            let block_index = index / BLOCK_BIT_COUNT;
            let bit_index = index % BLOCK_BIT_COUNT;
            self.blocks
                .get(block_index)
                .map(|block| ((block >> bit_index) & 1) != 0)
        }
    }

    /// Grows the `BitVec` to `len` bits. Existing bits keep their positions and the new bits are
    /// unset. Does nothing if `len` is not greater than the current length.
    ///
    /// # Examples
    ///
    /// ```
    /// use membership_filter::bit_vec::BitVec;
    ///
    /// let mut bv = BitVec::new(2);
    /// bv.insert(0);
    ///
    /// bv.grow(10);
    /// assert_eq!(bv.len(), 10);
    /// assert_eq!(bv.get(0), Some(true));
    /// assert_eq!(bv.get(9), Some(false));
    ///
    /// bv.grow(4);
    /// assert_eq!(bv.len(), 10);
    /// ```
    pub fn grow(&mut self, len: usize) {
        if len > self.len {
            // Bits past `self.len` in the last block are always zero, so they can be exposed
            // as-is.
            self.blocks.resize(Self::get_block_count(len), 0);
            self.len = len;
        }
    }

    /// Sets every bit in `self` that is set in `other`.
    ///
    /// # Panics
    ///
    /// Panics if the two `BitVec` are of different lengths.
    ///
    /// # Examples
    ///
    /// ```
    /// use membership_filter::bit_vec::BitVec;
    ///
    /// let mut bv1 = BitVec::new(4);
    /// bv1.insert(0);
    ///
    /// let mut bv2 = BitVec::new(4);
    /// bv2.insert(2);
    ///
    /// bv1.union(&bv2);
    /// assert_eq!(bv1.ones().collect::<Vec<usize>>(), vec![0, 2]);
    /// ```
    pub fn union(&mut self, other: &Self) {
        assert_eq!(self.len(), other.len());
        for (x, y) in self.blocks.iter_mut().zip(&other.blocks) {
            *x |= *y;
        }
        self.one_count = self
            .blocks
            .iter()
            .map(|block| block.count_ones() as usize)
            .sum();
    }

    /// Returns an iterator over the indices of the set bits in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use membership_filter::bit_vec::BitVec;
    ///
    /// let mut bv = BitVec::new(12);
    /// bv.insert(11);
    /// bv.insert(3);
    ///
    /// assert_eq!(bv.ones().collect::<Vec<usize>>(), vec![3, 11]);
    /// ```
    pub fn ones(&self) -> Ones<'_> {
        Ones {
            bit_vec: self,
            range: 0..self.len,
        }
    }

    /// Returns `true` if the `BitVec` has no bits.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of bits in the `BitVec`.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of bits the `BitVec` can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.blocks.capacity() * BLOCK_BIT_COUNT
    }

    /// Returns the number of set bits in the `BitVec`.
    pub fn count_ones(&self) -> usize {
        self.one_count
    }

    /// Returns the number of unset bits in the `BitVec`.
    pub fn count_zeros(&self) -> usize {
        self.len - self.one_count
    }
}

/// An iterator over the indices of the set bits of a `BitVec`.
///
/// This iterator yields indices in ascending order.
pub struct Ones<'a> {
    bit_vec: &'a BitVec,
    range: Range<usize>,
}

impl<'a> Iterator for Ones<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let bit_vec = self.bit_vec;
        self.range
            .by_ref()
            .find(|&index| bit_vec.get(index) == Some(true))
    }
}

static TRUE: bool = true;
static FALSE: bool = false;

impl Index<usize> for BitVec {
    type Output = bool;

    fn index(&self, index: usize) -> &bool {
        match self.get(index) {
            Some(true) => &TRUE,
            Some(false) => &FALSE,
            None => panic!(
                "index out of bounds: the len is {} but the index is {}",
                self.len, index
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BitVec;

    #[test]
    fn test_new() {
        let bv = BitVec::new(5);

        assert_eq!(bv.len(), 5);
        assert_eq!(bv.ones().next(), None);
        assert_eq!(bv.count_ones(), 0);
        assert_eq!(bv.count_zeros(), 5);
    }

    #[test]
    fn test_default_is_empty() {
        let bv = BitVec::default();

        assert!(bv.is_empty());
        assert_eq!(bv.get(0), None);
    }

    #[test]
    fn test_with_capacity() {
        let mut bv = BitVec::with_capacity(10);

        assert!(bv.is_empty());
        assert_eq!(bv.capacity(), 16);

        bv.grow(16);
        assert_eq!(bv.capacity(), 16);
    }

    #[test]
    fn test_insert_get() {
        let mut bv = BitVec::new(2);

        assert!(bv.insert(0));
        assert_eq!(bv[0], true);
        assert_eq!(bv[1], false);
        assert_eq!(bv.get(2), None);
        assert_eq!(bv.count_ones(), 1);
        assert_eq!(bv.count_zeros(), 1);
    }

    #[test]
    fn test_insert_twice_counts_once() {
        let mut bv = BitVec::new(3);

        assert!(bv.insert(2));
        assert!(!bv.insert(2));
        assert_eq!(bv.get(2), Some(true));
        assert_eq!(bv.count_ones(), 1);
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_insert_out_of_bounds() {
        let mut bv = BitVec::new(2);
        bv.insert(2);
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_index_out_of_bounds() {
        let bv = BitVec::new(2);
        let _ = bv[2];
    }

    #[test]
    fn test_grow_preserves_bits() {
        let mut bv = BitVec::new(0);

        bv.grow(3);
        bv.insert(2);
        bv.grow(9);
        bv.insert(8);
        bv.grow(100);

        assert_eq!(bv.len(), 100);
        assert_eq!(bv.ones().collect::<Vec<usize>>(), vec![2, 8]);
        assert_eq!(bv.count_ones(), 2);
        assert_eq!(bv.count_zeros(), 98);
    }

    #[test]
    fn test_grow_never_shrinks() {
        let mut bv = BitVec::new(20);
        bv.insert(19);

        bv.grow(5);
        assert_eq!(bv.len(), 20);
        assert_eq!(bv.get(19), Some(true));
    }

    #[test]
    fn test_grow_within_block() {
        let mut bv = BitVec::new(3);
        bv.insert(0);

        bv.grow(7);
        assert_eq!(bv.ones().collect::<Vec<usize>>(), vec![0]);
        assert_eq!(bv.get(6), Some(false));
        assert_eq!(bv.count_zeros(), 6);
    }

    #[test]
    fn test_union() {
        let mut bv1 = BitVec::new(10);
        bv1.insert(0);
        bv1.insert(1);

        let mut bv2 = BitVec::new(10);
        bv2.insert(0);
        bv2.insert(9);

        bv1.union(&bv2);
        assert_eq!(bv1.ones().collect::<Vec<usize>>(), vec![0, 1, 9]);
        assert_eq!(bv1.count_ones(), 3);
        assert_eq!(bv1.count_zeros(), 7);
    }

    #[test]
    #[should_panic]
    fn test_union_different_lengths() {
        let mut bv1 = BitVec::new(4);
        let bv2 = BitVec::new(5);
        bv1.union(&bv2);
    }

    #[test]
    fn test_ones_across_blocks() {
        let mut bv = BitVec::new(17);
        bv.insert(16);
        bv.insert(7);
        bv.insert(8);

        assert_eq!(bv.ones().collect::<Vec<usize>>(), vec![7, 8, 16]);
    }
}
