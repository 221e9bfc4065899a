//! Multi-index counter driving the dimension product.

/// One cursor per dimension; the last cursor turns fastest and carries into
/// the one before it.
///
/// With radices `[2, 3]` the combinations come out as
/// `[0,0] [0,1] [0,2] [1,0] [1,1] [1,2]`. No radices means exactly one empty
/// combination; any zero radix means none at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Odometer {
    radices: Vec<usize>,
    cursor: Vec<usize>,
    exhausted: bool,
}

impl Odometer {
    pub fn new(radices: Vec<usize>) -> Self {
        let exhausted = radices.iter().any(|&r| r == 0);
        Self {
            cursor: vec![0; radices.len()],
            radices,
            exhausted,
        }
    }

    /// Current combination, or `None` once every combination was passed.
    pub fn current(&self) -> Option<&[usize]> {
        if self.exhausted {
            None
        } else {
            Some(&self.cursor)
        }
    }

    /// Move to the next combination.
    pub fn advance(&mut self) {
        if self.exhausted {
            return;
        }
        for (digit, &radix) in self.cursor.iter_mut().zip(&self.radices).rev() {
            *digit += 1;
            if *digit < radix {
                return;
            }
            *digit = 0;
        }
        self.exhausted = true;
    }

    /// Stop early; later calls to [`Odometer::current`] return `None`.
    pub fn stop(&mut self) {
        self.exhausted = true;
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Total number of combinations, `None` on overflow.
    pub fn len(&self) -> Option<usize> {
        self.radices
            .iter()
            .try_fold(1usize, |acc, &r| acc.checked_mul(r))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }
}

impl Iterator for Odometer {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let combination = self.current()?.to_vec();
        self.advance();
        Some(combination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_digit_fastest() {
        let combos: Vec<Vec<usize>> = Odometer::new(vec![2, 3]).collect();
        assert_eq!(
            combos,
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 1],
                vec![1, 2],
            ]
        );
    }

    #[test]
    fn test_no_radices_yields_one_empty_combination() {
        let combos: Vec<Vec<usize>> = Odometer::new(vec![]).collect();
        assert_eq!(combos, vec![Vec::<usize>::new()]);
    }

    #[test]
    fn test_zero_radix_yields_nothing() {
        let mut odometer = Odometer::new(vec![3, 0, 2]);
        assert!(odometer.is_exhausted());
        assert!(odometer.is_empty());
        assert!(odometer.next().is_none());
    }

    #[test]
    fn test_len_matches_count() {
        let odometer = Odometer::new(vec![2, 3, 4]);
        assert_eq!(odometer.len(), Some(24));
        assert_eq!(odometer.count(), 24);
    }

    #[test]
    fn test_len_overflow() {
        assert_eq!(Odometer::new(vec![usize::MAX, 2]).len(), None);
    }

    #[test]
    fn test_stop() {
        let mut odometer = Odometer::new(vec![5]);
        odometer.advance();
        assert_eq!(odometer.current(), Some(&[1][..]));
        odometer.stop();
        assert!(odometer.current().is_none());
    }
}
