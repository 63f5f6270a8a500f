use crate::util::ceil_div_usize;
use core::fmt::{Debug, Formatter};
use core::mem;

const WORD_BITS: usize = u64::BITS as usize;

/// A packed array of candidate flags, one bit per candidate.
///
/// Every bit starts set, meaning "possibly prime", and can only ever be cleared. The sieve never
/// grows after construction.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct BitSieve {
    words: Vec<u64>,
    len: usize,
}

impl BitSieve {
    #[must_use]
    pub fn new(len: usize) -> Self {
        let mut words = vec![u64::MAX; ceil_div_usize(len, WORD_BITS)];
        // Padding bits past `len` stay clear, so counts and scans never see them.
        let tail = len % WORD_BITS;
        if tail != 0 {
            if let Some(last) = words.last_mut() {
                *last = (1 << tail) - 1;
            }
        }
        Self { words, len }
    }

    #[inline]
    pub fn clear(&mut self, i: usize) {
        assert!(i < self.len, "bit {} out of range for sieve of {} bits", i, self.len);
        self.words[i / WORD_BITS] &= !(1 << (i % WORD_BITS));
    }

    #[must_use]
    #[inline]
    pub fn get(&self, i: usize) -> bool {
        assert!(i < self.len, "bit {} out of range for sieve of {} bits", i, self.len);
        self.words[i / WORD_BITS] & (1 << (i % WORD_BITS)) != 0
    }

    #[must_use]
    #[inline]
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|word| word.count_ones()).sum::<u32>() as usize
    }

    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates over the indices of all bits that are still set, in ascending order.
    #[must_use]
    pub fn iter_ones(&self) -> Ones<'_> {
        Ones {
            words: &self.words,
            word_index: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }

    #[must_use]
    pub fn as_mut_slice(&mut self) -> BitSliceMut<'_> {
        BitSliceMut {
            words: &mut self.words,
            len: self.len,
        }
    }

    /// Splits the sieve into consecutive, disjoint mutable views with the given lengths.
    ///
    /// The lengths must sum to `self.len()`, and every length but the last must be a multiple of
    /// 64 so that no two views share a word.
    #[must_use]
    pub fn split_mut(&mut self, lens: &[usize]) -> Vec<BitSliceMut<'_>> {
        assert_eq!(
            lens.iter().sum::<usize>(),
            self.len,
            "view lengths must cover the sieve exactly"
        );

        let mut rest: &mut [u64] = &mut self.words;
        let mut views = Vec::with_capacity(lens.len());
        for (i, &len) in lens.iter().enumerate() {
            let is_last = i + 1 == lens.len();
            assert!(
                is_last || len % WORD_BITS == 0,
                "view {} has length {}, which is not word aligned",
                i,
                len
            );
            let (words, tail) = mem::take(&mut rest).split_at_mut(ceil_div_usize(len, WORD_BITS));
            views.push(BitSliceMut { words, len });
            rest = tail;
        }
        views
    }
}

impl Debug for BitSieve {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        for i in 0..self.len {
            write!(f, "{}", self.get(i) as u8)?;
        }
        Ok(())
    }
}

/// A mutable window onto part of a [`BitSieve`], indexed from its own start.
pub struct BitSliceMut<'a> {
    words: &'a mut [u64],
    len: usize,
}

impl<'a> BitSliceMut<'a> {
    #[inline]
    pub fn clear(&mut self, i: usize) {
        assert!(i < self.len, "bit {} out of range for view of {} bits", i, self.len);
        self.words[i / WORD_BITS] &= !(1 << (i % WORD_BITS));
    }

    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

pub struct Ones<'a> {
    words: &'a [u64],
    word_index: usize,
    current: u64,
}

impl<'a> Iterator for Ones<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.current == 0 {
            self.word_index += 1;
            self.current = *self.words.get(self.word_index)?;
        }
        let bit = self.current.trailing_zeros() as usize;
        // Drop the lowest set bit.
        self.current &= self.current - 1;
        Some(self.word_index * WORD_BITS + bit)
    }
}

#[cfg(test)]
mod tests {
    use crate::bit_sieve::BitSieve;

    #[test]
    fn test_new_all_set() {
        for len in [0, 1, 7, 63, 64, 65, 130] {
            let sieve = BitSieve::new(len);
            assert_eq!(sieve.len(), len);
            assert_eq!(sieve.count_ones(), len);
            assert!((0..len).all(|i| sieve.get(i)));
        }
        assert!(BitSieve::new(0).is_empty());
    }

    #[test]
    fn test_clear() {
        let mut sieve = BitSieve::new(100);
        sieve.clear(0);
        sieve.clear(64);
        sieve.clear(99);
        sieve.clear(99);
        assert!(!sieve.get(0));
        assert!(sieve.get(1));
        assert!(!sieve.get(64));
        assert!(!sieve.get(99));
        assert_eq!(sieve.count_ones(), 97);
    }

    #[test]
    #[should_panic]
    fn test_clear_out_of_range() {
        BitSieve::new(10).clear(10);
    }

    #[test]
    #[should_panic]
    fn test_get_out_of_range() {
        let _ = BitSieve::new(64).get(64);
    }

    #[test]
    fn test_iter_ones() {
        let mut sieve = BitSieve::new(70);
        for i in 0..70 {
            if i % 3 != 0 {
                sieve.clear(i);
            }
        }
        let expected: Vec<usize> = (0..70).step_by(3).collect();
        assert_eq!(sieve.iter_ones().collect::<Vec<_>>(), expected);
        assert_eq!(BitSieve::new(0).iter_ones().next(), None);
    }

    #[test]
    fn test_iter_ones_skips_empty_words() {
        let mut sieve = BitSieve::new(200);
        for i in 0..199 {
            sieve.clear(i);
        }
        assert_eq!(sieve.iter_ones().collect::<Vec<_>>(), vec![199]);
    }

    #[test]
    fn test_split_mut() {
        let mut sieve = BitSieve::new(150);
        {
            let mut views = sieve.split_mut(&[64, 64, 22]);
            assert_eq!(views.len(), 3);
            assert_eq!(views[2].len(), 22);
            views[0].clear(3);
            views[1].clear(0);
            views[2].clear(21);
        }
        assert_eq!(
            sieve.iter_ones().filter(|&i| i == 3 || i == 64 || i == 149).count(),
            0
        );
        assert!(sieve.get(65));
        assert_eq!(sieve.count_ones(), 147);
    }

    #[test]
    #[should_panic]
    fn test_split_mut_unaligned() {
        let _ = BitSieve::new(100).split_mut(&[50, 50]);
    }

    #[test]
    fn test_debug() {
        let mut sieve = BitSieve::new(4);
        sieve.clear(1);
        assert_eq!(format!("{:?}", sieve), "1011");
    }
}
