//! Bitset over board cells, used for the available/occupied partition

/// Set of cell indices backed by `u64` words.
///
/// Iteration is always in ascending index order (row-major), which keeps
/// move enumeration reproducible under a fixed seed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellSet {
    bits: Vec<u64>,
    cells: usize,
}

impl CellSet {
    /// Create an empty set able to hold `cells` indices
    pub fn empty(cells: usize) -> Self {
        Self {
            bits: vec![0; cells.div_ceil(64)],
            cells,
        }
    }

    /// Create a set containing every index in `0..cells`
    pub fn full(cells: usize) -> Self {
        let mut set = Self::empty(cells);
        for word in set.bits.iter_mut() {
            *word = u64::MAX;
        }
        let tail = cells % 64;
        if tail != 0 {
            if let Some(last) = set.bits.last_mut() {
                *last = (1u64 << tail) - 1;
            }
        }
        set
    }

    /// Insert an index
    #[inline]
    pub fn insert(&mut self, idx: usize) {
        debug_assert!(idx < self.cells);
        self.bits[idx / 64] |= 1u64 << (idx % 64);
    }

    /// Remove an index
    #[inline]
    pub fn remove(&mut self, idx: usize) {
        debug_assert!(idx < self.cells);
        self.bits[idx / 64] &= !(1u64 << (idx % 64));
    }

    /// Check membership
    #[inline]
    pub fn contains(&self, idx: usize) -> bool {
        idx < self.cells && (self.bits[idx / 64] >> (idx % 64)) & 1 == 1
    }

    /// Count members (popcount)
    #[inline]
    pub fn count(&self) -> usize {
        self.bits.iter().map(|b| b.count_ones() as usize).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&b| b == 0)
    }

    /// True if no index is in both sets
    pub fn is_disjoint(&self, other: &CellSet) -> bool {
        self.bits.iter().zip(&other.bits).all(|(a, b)| a & b == 0)
    }

    /// Members of either set
    pub fn union(&self, other: &CellSet) -> CellSet {
        CellSet {
            bits: self.bits.iter().zip(&other.bits).map(|(a, b)| a | b).collect(),
            cells: self.cells.max(other.cells),
        }
    }

    /// The `n`-th member in ascending order
    pub fn nth(&self, mut n: usize) -> Option<usize> {
        for (word_idx, &word) in self.bits.iter().enumerate() {
            let ones = word.count_ones() as usize;
            if n >= ones {
                n -= ones;
                continue;
            }
            let mut w = word;
            for _ in 0..n {
                w &= w - 1;
            }
            return Some(word_idx * 64 + w.trailing_zeros() as usize);
        }
        None
    }

    /// Iterate over members in ascending order
    pub fn iter_ones(&self) -> CellSetIter<'_> {
        CellSetIter {
            bits: &self.bits,
            word_idx: 0,
            current_word: self.bits.first().copied().unwrap_or(0),
        }
    }
}

/// Iterator over members of a [`CellSet`]
pub struct CellSetIter<'a> {
    bits: &'a [u64],
    word_idx: usize,
    current_word: u64,
}

impl Iterator for CellSetIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        while self.current_word == 0 {
            self.word_idx += 1;
            if self.word_idx >= self.bits.len() {
                return None;
            }
            self.current_word = self.bits[self.word_idx];
        }

        let bit_pos = self.current_word.trailing_zeros() as usize;
        self.current_word &= self.current_word - 1;
        Some(self.word_idx * 64 + bit_pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_set_masks_tail() {
        let set = CellSet::full(70);
        assert_eq!(set.count(), 70);
        assert!(set.contains(69));
        assert!(!set.contains(70));
    }

    #[test]
    fn test_insert_remove() {
        let mut set = CellSet::empty(100);
        set.insert(3);
        set.insert(64);
        set.insert(99);
        assert_eq!(set.count(), 3);
        set.remove(64);
        assert!(!set.contains(64));
        assert_eq!(set.iter_ones().collect::<Vec<_>>(), vec![3, 99]);
    }

    #[test]
    fn test_nth_crosses_words() {
        let mut set = CellSet::empty(130);
        for idx in [1, 5, 63, 64, 128] {
            set.insert(idx);
        }
        assert_eq!(set.nth(0), Some(1));
        assert_eq!(set.nth(2), Some(63));
        assert_eq!(set.nth(3), Some(64));
        assert_eq!(set.nth(4), Some(128));
        assert_eq!(set.nth(5), None);
    }

    #[test]
    fn test_disjoint_union() {
        let mut a = CellSet::empty(10);
        let mut b = CellSet::empty(10);
        a.insert(1);
        b.insert(2);
        assert!(a.is_disjoint(&b));
        assert_eq!(a.union(&b).count(), 2);
        b.insert(1);
        assert!(!a.is_disjoint(&b));
    }

    #[test]
    fn test_empty_capacity() {
        let set = CellSet::empty(0);
        assert!(set.is_empty());
        assert_eq!(set.iter_ones().next(), None);
        assert_eq!(set.nth(0), None);
    }
}
