use nalgebra::linalg::LU;
use nalgebra::{DMatrix, DVector, Dyn};

use crate::error::{NurbsError, Result};
use crate::misc::FloatingPoint;

/// Square linear system `A x = b` factorized once with LU decomposition (partial pivoting)
/// so that several right-hand sides can be solved against the same matrix.
#[derive(Clone, Debug)]
pub struct InterpolationSystem<T: FloatingPoint> {
    lu: LU<T, Dyn, Dyn>,
    size: usize,
}

impl<T: FloatingPoint> InterpolationSystem<T> {
    /// Factorize the square `matrix`
    /// # Failures
    /// - if the matrix is not square
    /// - if a pivot of the factorization has a magnitude at or below `pivot_tolerance`
    pub fn try_factorize(matrix: DMatrix<T>, pivot_tolerance: T) -> Result<Self> {
        let size = matrix.nrows();
        if matrix.ncols() != size {
            return Err(NurbsError::InvalidInput(format!(
                "interpolation matrix must be square, got {}x{}",
                size,
                matrix.ncols()
            )));
        }

        let lu = matrix.lu();
        let u = lu.u();
        if let Some((index, pivot)) = u
            .diagonal()
            .iter()
            .enumerate()
            .find(|(_, pivot)| !(pivot.abs() > pivot_tolerance))
        {
            #[cfg(feature = "log")]
            log::warn!(
                "Singular {}x{} interpolation matrix, pivot {} is {}",
                size,
                size,
                index,
                pivot
            );
            return Err(NurbsError::SingularSystem {
                size,
                reason: format!(
                    "pivot {} has magnitude {} (tolerance {})",
                    index,
                    pivot.abs(),
                    pivot_tolerance
                ),
            });
        }

        Ok(Self { lu, size })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Solve for one right-hand side with forward and back substitution
    pub fn solve(&self, rhs: &DVector<T>) -> Result<DVector<T>> {
        if rhs.len() != self.size {
            return Err(NurbsError::InvalidInput(format!(
                "right-hand side has {} rows, expected {}",
                rhs.len(),
                self.size
            )));
        }

        self.lu.solve(rhs).ok_or_else(|| NurbsError::SingularSystem {
            size: self.size,
            reason: "back substitution failed".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::{DMatrix, DVector};

    use super::InterpolationSystem;
    use crate::error::NurbsError;

    #[test]
    fn solves_several_right_hand_sides() {
        // first pivot is zero without row exchange
        let matrix = DMatrix::from_row_slice(3, 3, &[0., 2., 1., 1., 1., 0., 3., 0., 1.]);
        let system = InterpolationSystem::try_factorize(matrix.clone(), 1e-12).unwrap();
        assert_eq!(system.size(), 3);

        for x in [
            DVector::from_vec(vec![1., 2., 3.]),
            DVector::from_vec(vec![-4., 0.5, 7.]),
        ] {
            let b = &matrix * &x;
            let solved = system.solve(&b).unwrap();
            assert_relative_eq!(solved, x, epsilon = 1e-12);
        }
    }

    #[test]
    fn singular_matrix() {
        let matrix = DMatrix::from_row_slice(3, 3, &[1., 2., 3., 2., 4., 6., 0., 1., 1.]);
        let err = InterpolationSystem::try_factorize(matrix, 1e-12).unwrap_err();
        assert!(matches!(err, NurbsError::SingularSystem { size: 3, .. }));
    }

    #[test]
    fn non_square_matrix() {
        let matrix = DMatrix::<f64>::zeros(2, 3);
        let err = InterpolationSystem::try_factorize(matrix, 1e-12).unwrap_err();
        assert!(matches!(err, NurbsError::InvalidInput(_)));
    }

    #[test]
    fn mismatched_right_hand_side() {
        let system = InterpolationSystem::try_factorize(DMatrix::<f64>::identity(2, 2), 1e-12)
            .unwrap();
        let err = system.solve(&DVector::from_vec(vec![1., 2., 3.])).unwrap_err();
        assert!(matches!(err, NurbsError::InvalidInput(_)));
    }
}
