//! Dense substitution matrix, e.g., BLOSUM62 including a gap column.

use std::fmt::{Display, Formatter};

use crate::errors::GuideTreeError;
use super::SubstitutionModel;

const NO_RANK: u8 = u8::MAX;

/// Substitution costs for a small alphabet.
///
/// Every symbol is mapped to a dense rank once, and costs are stored in a flat table indexed by
/// rank pair. Cells can be absent (e.g., a table with fewer rows than columns), in which case
/// looking them up yields [`GuideTreeError::MissingScoreEntry`].
#[derive(Clone, Debug)]
pub struct ScoringMatrix {
    alphabet: Vec<u8>,
    ranks: [u8; 256],
    costs: Vec<Option<i32>>,
    gap_symbol: u8,
}

impl ScoringMatrix {
    /// Create an empty matrix over the given alphabet. The gap symbol is added to the alphabet if
    /// it isn't part of it already. At most 255 distinct symbols are supported.
    pub fn new(alphabet: &[u8], gap_symbol: u8) -> Result<Self, GuideTreeError> {
        let mut ranks = [NO_RANK; 256];
        let mut symbols = Vec::with_capacity(alphabet.len() + 1);

        for &symbol in alphabet.iter().chain(std::iter::once(&gap_symbol)) {
            if ranks[symbol as usize] == NO_RANK {
                if symbols.len() == NO_RANK as usize {
                    return Err(GuideTreeError::AlphabetTooLarge { max: NO_RANK as usize });
                }

                ranks[symbol as usize] = symbols.len() as u8;
                symbols.push(symbol);
            }
        }

        let size = symbols.len();
        Ok(Self {
            alphabet: symbols,
            ranks,
            costs: vec![None; size * size],
            gap_symbol,
        })
    }

    pub fn alphabet(&self) -> &[u8] {
        &self.alphabet
    }

    pub fn contains(&self, symbol: u8) -> bool {
        self.ranks[symbol as usize] != NO_RANK
    }

    /// Set the cost of aligning `row` against `col`. Returns `false` if either symbol is not
    /// part of the alphabet.
    pub fn set(&mut self, row: u8, col: u8, cost: i32) -> bool {
        match self.cell(row, col) {
            Some(ix) => {
                self.costs[ix] = Some(cost);
                true
            },
            None => false
        }
    }

    pub fn get(&self, row: u8, col: u8) -> Option<i32> {
        self.cell(row, col).and_then(|ix| self.costs[ix])
    }

    #[inline]
    fn cell(&self, row: u8, col: u8) -> Option<usize> {
        let r = self.ranks[row as usize];
        let c = self.ranks[col as usize];

        if r == NO_RANK || c == NO_RANK {
            None
        } else {
            Some(r as usize * self.alphabet.len() + c as usize)
        }
    }
}

impl SubstitutionModel for ScoringMatrix {
    #[inline]
    fn gap_symbol(&self) -> u8 {
        self.gap_symbol
    }

    #[inline]
    fn cost(&self, row: u8, col: u8) -> Result<i32, GuideTreeError> {
        self.get(row, col)
            .ok_or(GuideTreeError::MissingScoreEntry { row, col })
    }
}

impl Display for ScoringMatrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, " ")?;
        for &col in &self.alphabet {
            write!(f, " {:>4}", char::from(col))?;
        }
        writeln!(f)?;

        for &row in &self.alphabet {
            write!(f, "{}", char::from(row))?;
            for &col in &self.alphabet {
                match self.get(row, col) {
                    Some(cost) => write!(f, " {:>4}", cost)?,
                    None => write!(f, " {:>4}", ".")?,
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::GuideTreeError;
    use crate::scoring::SubstitutionModel;
    use super::ScoringMatrix;

    #[test]
    fn test_dense_lookup() {
        let mut matrix = ScoringMatrix::new(b"AT", b'*').unwrap();
        assert_eq!(matrix.alphabet(), b"AT*");
        assert!(matrix.contains(b'*'));
        assert!(!matrix.contains(b'G'));

        assert!(matrix.set(b'A', b'T', -1));
        assert!(matrix.set(b'T', b'A', -3));
        assert!(!matrix.set(b'A', b'G', 1));

        assert_eq!(matrix.cost(b'A', b'T').unwrap(), -1);
        assert_eq!(matrix.cost(b'T', b'A').unwrap(), -3);
    }

    #[test]
    fn test_missing_entries() {
        let mut matrix = ScoringMatrix::new(b"AT*", b'*').unwrap();
        matrix.set(b'A', b'A', 1);

        assert!(matches!(
            matrix.cost(b'A', b'T'),
            Err(GuideTreeError::MissingScoreEntry { row: b'A', col: b'T' })
        ));
        assert!(matches!(
            matrix.cost(b'G', b'A'),
            Err(GuideTreeError::MissingScoreEntry { row: b'G', col: b'A' })
        ));
    }

    #[test]
    fn test_alphabet_too_large() {
        let symbols: Vec<u8> = (0..=u8::MAX).collect();
        assert!(matches!(
            ScoringMatrix::new(&symbols, b'*'),
            Err(GuideTreeError::AlphabetTooLarge { max: 255 })
        ));

        let matrix = ScoringMatrix::new(&symbols[..254], 254).unwrap();
        assert_eq!(matrix.alphabet().len(), 255);
    }

    #[test]
    fn test_display() {
        let mut matrix = ScoringMatrix::new(b"AT", b'*').unwrap();
        matrix.set(b'A', b'A', 1);
        matrix.set(b'A', b'T', -1);
        matrix.set(b'T', b'*', -2);

        let expected = concat!(
            "     A    T    *\n",
            "A    1   -1    .\n",
            "T    .    .   -2\n",
            "*    .    .    .\n",
        );
        assert_eq!(matrix.to_string(), expected);
    }
}
