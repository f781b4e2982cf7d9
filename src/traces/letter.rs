const BLOCK_BITS: usize = u64::BITS as usize;

/// A letter, that is a total boolean valuation of the symbols of a vocabulary.
///
/// Letters are stored as bit vectors; the value of the symbol with index `i` is the bit `i`.
/// Equality, hashing and ordering only depend on the valuation and its width.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Letter {
    width: usize,
    blocks: Vec<u64>,
}

impl Letter {
    /// Builds the letter of the given width in which all the symbols are false.
    pub fn new_all_false(width: usize) -> Self {
        Self {
            width,
            blocks: vec![0; (width + BLOCK_BITS - 1) / BLOCK_BITS],
        }
    }

    /// Builds a letter from the values of the symbols, in vocabulary order.
    ///
    /// # Example
    ///
    /// ```
    /// # use limeltl::traces::Letter;
    /// let letter = Letter::new_with_values(&[true, false, true]);
    /// assert_eq!(3, letter.width());
    /// assert_eq!(vec![0, 2], letter.true_indices().collect::<Vec<usize>>());
    /// ```
    pub fn new_with_values(values: &[bool]) -> Self {
        let mut letter = Self::new_all_false(values.len());
        values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v)
            .for_each(|(i, _)| letter.set(i, true));
        letter
    }

    /// Sets the value of the symbol with the given index.
    ///
    /// # Panics
    ///
    /// Panics if the index is not lower than the width of the letter.
    pub fn set(&mut self, index: usize, value: bool) {
        assert!(index < self.width, "symbol index out of bounds");
        let mask = 1 << (index % BLOCK_BITS);
        if value {
            self.blocks[index / BLOCK_BITS] |= mask;
        } else {
            self.blocks[index / BLOCK_BITS] &= !mask;
        }
    }

    /// Returns the value of the symbol with the given index.
    ///
    /// # Panics
    ///
    /// Panics if the index is not lower than the width of the letter.
    pub fn value(&self, index: usize) -> bool {
        assert!(index < self.width, "symbol index out of bounds");
        self.blocks[index / BLOCK_BITS] & (1 << (index % BLOCK_BITS)) != 0
    }

    /// Returns the number of symbols this letter gives a value to.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Iterates over the indices of the symbols set to `true`, in increasing order.
    pub fn true_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.width).filter(|i| self.value(*i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_false() {
        let letter = Letter::new_all_false(3);
        assert_eq!(3, letter.width());
        assert!((0..3).all(|i| !letter.value(i)));
        assert_eq!(0, letter.true_indices().count());
    }

    #[test]
    fn test_set_unset() {
        let mut letter = Letter::new_all_false(2);
        letter.set(1, true);
        assert!(letter.value(1));
        assert!(!letter.value(0));
        letter.set(1, false);
        assert_eq!(Letter::new_all_false(2), letter);
    }

    #[test]
    fn test_wide_letter() {
        let mut values = vec![false; 130];
        values[0] = true;
        values[64] = true;
        values[129] = true;
        let letter = Letter::new_with_values(&values);
        assert_eq!(vec![0, 64, 129], letter.true_indices().collect::<Vec<usize>>());
    }

    #[test]
    fn test_equality_is_by_valuation() {
        let l1 = Letter::new_with_values(&[true, false]);
        let mut l2 = Letter::new_all_false(2);
        l2.set(0, true);
        assert_eq!(l1, l2);
        let set = [l1, l2].into_iter().collect::<HashSet<Letter>>();
        assert_eq!(1, set.len());
        assert_ne!(Letter::new_all_false(1), Letter::new_all_false(2));
    }

    #[test]
    fn test_empty_width() {
        let letter = Letter::new_all_false(0);
        assert_eq!(0, letter.width());
        assert_eq!(Letter::new_with_values(&[]), letter);
    }

    #[test]
    #[should_panic]
    fn test_out_of_bounds() {
        Letter::new_all_false(2).value(2);
    }
}
