use ndarray::{Array1, Array2};
use thiserror::Error;

/// Errors that can occur when building a [`LinearSystem`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum SystemError {
    #[error("matrix is empty")]
    Empty,

    #[error("matrix is not square: row {row} has {len} entries, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("right-hand side has {found} entries, expected {expected}")]
    RhsLength { expected: usize, found: usize },

    #[error("matrix entry ({row}, {col}) is not finite")]
    NonFiniteMatrix { row: usize, col: usize },

    #[error("right-hand side entry {index} is not finite")]
    NonFiniteRhs { index: usize },

    #[error("diagonal entry {row} is too close to zero ({value})")]
    ZeroDiagonal { row: usize, value: f64 },
}

/// A validated square system `A x = b` with a usable diagonal.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystem {
    a: Array2<f64>,
    b: Array1<f64>,
}

impl LinearSystem {
    /// Diagonal entries at or below this magnitude are rejected.
    pub const DIAGONAL_FLOOR: f64 = 1e-12;

    /// Builds a system from row-major coefficients and a right-hand side.
    ///
    /// # Errors
    ///
    /// Returns an error if the matrix is empty or not square, if `b` has the
    /// wrong length, if any entry is non-finite, or if a diagonal entry is
    /// not larger than [`LinearSystem::DIAGONAL_FLOOR`] in magnitude.
    pub fn new(a: Vec<Vec<f64>>, b: Vec<f64>) -> Result<Self, SystemError> {
        let n = a.len();
        if n == 0 {
            return Err(SystemError::Empty);
        }
        if let Some((row, entries)) = a.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(SystemError::NotSquare {
                row,
                len: entries.len(),
                expected: n,
            });
        }
        if b.len() != n {
            return Err(SystemError::RhsLength {
                expected: n,
                found: b.len(),
            });
        }
        for (row, entries) in a.iter().enumerate() {
            if let Some(col) = entries.iter().position(|v| !v.is_finite()) {
                return Err(SystemError::NonFiniteMatrix { row, col });
            }
        }
        if let Some(index) = b.iter().position(|v| !v.is_finite()) {
            return Err(SystemError::NonFiniteRhs { index });
        }
        for (row, entries) in a.iter().enumerate() {
            let value = entries[row];
            if value.abs() <= Self::DIAGONAL_FLOOR {
                return Err(SystemError::ZeroDiagonal { row, value });
            }
        }

        Ok(Self {
            a: Array2::from_shape_fn((n, n), |(i, j)| a[i][j]),
            b: Array1::from(b),
        })
    }

    /// Returns the number of unknowns.
    #[must_use]
    pub fn size(&self) -> usize {
        self.b.len()
    }

    /// Returns the coefficient matrix.
    #[must_use]
    pub fn a(&self) -> &Array2<f64> {
        &self.a
    }

    /// Returns the right-hand side.
    #[must_use]
    pub fn b(&self) -> &Array1<f64> {
        &self.b
    }

    /// Returns true if `|a_ii| >= sum of |a_ij|` over `j != i` for every row.
    #[must_use]
    pub fn is_diagonally_dominant(&self) -> bool {
        self.a.rows().into_iter().enumerate().all(|(i, row)| {
            let off_diagonal: f64 = row
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, v)| v.abs())
                .sum();
            row[i].abs() >= off_diagonal
        })
    }

    /// Returns `b_i - sum of a_ij * x_j` over `j != i`, divided by `a_ii`.
    ///
    /// This is the update both stationary methods apply to entry `i`.
    pub(super) fn update(&self, i: usize, x: &Array1<f64>) -> f64 {
        let row = self.a.row(i);
        let off_diagonal: f64 = row
            .iter()
            .zip(x.iter())
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, (a, x))| a * x)
            .sum();
        (self.b[i] - off_diagonal) / row[i]
    }

    /// Returns the Euclidean norm of `A x - b`.
    #[must_use]
    pub fn residual_norm(&self, x: &[f64]) -> f64 {
        let x = Array1::from(x.to_vec());
        (self.a.dot(&x) - &self.b)
            .iter()
            .map(|r| r * r)
            .sum::<f64>()
            .sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn builds_square_system() {
        let system = LinearSystem::new(vec![vec![4.0, 1.0], vec![2.0, 3.0]], vec![1.0, 2.0])
            .expect("valid system");

        assert_eq!(system.size(), 2);
        assert_eq!(system.a(), &array![[4.0, 1.0], [2.0, 3.0]]);
        assert_eq!(system.b(), &array![1.0, 2.0]);
        assert!(system.is_diagonally_dominant());
    }

    #[test]
    fn rejects_bad_shapes() {
        assert_eq!(LinearSystem::new(vec![], vec![]), Err(SystemError::Empty));
        assert_eq!(
            LinearSystem::new(vec![vec![1.0, 2.0], vec![3.0]], vec![1.0, 2.0]),
            Err(SystemError::NotSquare {
                row: 1,
                len: 1,
                expected: 2
            })
        );
        assert_eq!(
            LinearSystem::new(vec![vec![1.0]], vec![1.0, 2.0]),
            Err(SystemError::RhsLength {
                expected: 1,
                found: 2
            })
        );
    }

    #[test]
    fn rejects_non_finite_entries() {
        assert_eq!(
            LinearSystem::new(vec![vec![1.0, f64::NAN], vec![0.0, 1.0]], vec![1.0, 1.0]),
            Err(SystemError::NonFiniteMatrix { row: 0, col: 1 })
        );
        assert_eq!(
            LinearSystem::new(vec![vec![1.0]], vec![f64::INFINITY]),
            Err(SystemError::NonFiniteRhs { index: 0 })
        );
    }

    #[test]
    fn rejects_zero_diagonal() {
        assert_eq!(
            LinearSystem::new(vec![vec![1.0, 2.0], vec![3.0, 0.0]], vec![1.0, 1.0]),
            Err(SystemError::ZeroDiagonal { row: 1, value: 0.0 })
        );
    }

    #[test]
    fn detects_lack_of_dominance() {
        let system = LinearSystem::new(vec![vec![1.0, 2.0], vec![3.0, 1.0]], vec![1.0, 1.0])
            .expect("valid system");
        assert!(!system.is_diagonally_dominant());
    }

    #[test]
    fn update_solves_row_for_its_diagonal_unknown() {
        let system = LinearSystem::new(vec![vec![4.0, 1.0], vec![2.0, 3.0]], vec![1.0, 2.0])
            .expect("valid system");
        let x = array![1.0, 1.0];

        assert_relative_eq!(system.update(0, &x), 0.0);
        assert_relative_eq!(system.update(1, &x), 0.0);
        assert_relative_eq!(system.residual_norm(&[0.1, 0.6]), 0.0, epsilon = 1e-12);
    }
}
