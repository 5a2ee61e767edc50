use std::fmt::{Display, Formatter};

use crate::scoring::Score;

/// Full DP table of a global alignment, rows indexed by the first sequence.
#[derive(Clone, Debug)]
pub struct AlignmentMatrix {
    seq1: Vec<u8>,
    seq2: Vec<u8>,
    cells: Vec<Score>,
}

impl AlignmentMatrix {
    pub(crate) fn new(seq1: &[u8], seq2: &[u8]) -> Self {
        Self {
            seq1: seq1.to_vec(),
            seq2: seq2.to_vec(),
            cells: vec![0; (seq1.len() + 1) * (seq2.len() + 1)],
        }
    }

    pub fn rows(&self) -> usize {
        self.seq1.len() + 1
    }

    pub fn cols(&self) -> usize {
        self.seq2.len() + 1
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Score {
        self.cells[i * self.cols() + j]
    }

    #[inline]
    pub(crate) fn set(&mut self, i: usize, j: usize, value: Score) {
        let cols = self.cols();
        self.cells[i * cols + j] = value;
    }

    /// The optimal global alignment score, i.e., the bottom-right cell
    pub fn score(&self) -> Score {
        self.get(self.rows() - 1, self.cols() - 1)
    }
}

impl Display for AlignmentMatrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>9}", "")?;
        for &sym in &self.seq2 {
            write!(f, " {:>4}", char::from(sym))?;
        }
        writeln!(f)?;

        for i in 0..self.rows() {
            let label = if i == 0 { ' ' } else { char::from(self.seq1[i - 1]) };
            write!(f, "{:>4}", label)?;

            for j in 0..self.cols() {
                write!(f, " {:>4}", self.get(i, j))?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::aligner::GlobalAligner;
    use crate::scoring::UniformCosts;

    #[test]
    fn test_table_layout() {
        let costs = UniformCosts::new(1, -1, -2);
        let matrix = GlobalAligner::new(&costs)
            .alignment_matrix(b"AC", b"A")
            .unwrap();

        assert_eq!(matrix.get(0, 0), 0);
        assert_eq!(matrix.get(0, 1), -2);
        assert_eq!(matrix.get(1, 0), -2);
        assert_eq!(matrix.get(2, 0), -4);
        assert_eq!(matrix.get(1, 1), 1);
        assert_eq!(matrix.get(2, 1), -1);
        assert_eq!(matrix.score(), -1);

        let rendered = matrix.to_string();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "   A   -2    1");
    }
}
