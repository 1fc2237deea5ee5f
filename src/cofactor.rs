use tracing::{debug, instrument};

use crate::matrix::{Matrix, MatrixError};

impl Matrix {
    /// Build the submatrix obtained by deleting row `row` and column `col`.
    ///
    /// The caller guarantees that the matrix is square with at least two
    /// rows.
    fn minor(&self, row: u32, col: u32) -> Matrix {
        let mut data =
            Vec::with_capacity((self.nrows as usize - 1) * (self.ncols as usize - 1));
        for i in 0..self.nrows {
            if i == row {
                continue;
            }
            for j in 0..self.ncols {
                if j == col {
                    continue;
                }
                data.push(self[(i, j)]);
            }
        }

        Matrix {
            data,
            nrows: self.nrows - 1,
            ncols: self.ncols - 1,
        }
    }

    /// Expand the determinant along the first row.
    fn laplace_det(&self) -> f64 {
        match self.nrows {
            1 => self[(0, 0)],
            2 => self[(0, 0)] * self[(1, 1)] - self[(0, 1)] * self[(1, 0)],
            _ => {
                let mut det = 0.0;
                let mut sign = 1.0;
                for j in 0..self.ncols {
                    det += sign * self[(0, j)] * self.minor(0, j).laplace_det();
                    sign = -sign;
                }
                det
            }
        }
    }

    /// Compute the determinant of the matrix by cofactor expansion along the
    /// first row.
    pub fn det(&self) -> Result<f64, MatrixError> {
        if !self.is_valid() {
            return Err(MatrixError::Invalid);
        }
        if self.nrows != self.ncols {
            return Err(MatrixError::NotSquare);
        }

        Ok(self.laplace_det())
    }

    /// Compute the matrix of cofactors: entry `(i, j)` is the determinant of
    /// the minor at `(i, j)`, signed by `(-1)^(i + j)`.
    ///
    /// The cofactor matrix of a 1x1 matrix is the matrix itself.
    pub fn cofactor_matrix(&self) -> Result<Matrix, MatrixError> {
        if !self.is_valid() {
            return Err(MatrixError::Invalid);
        }
        if self.nrows != self.ncols {
            return Err(MatrixError::NotSquare);
        }

        let mut m = Matrix::new(self.nrows, self.ncols)?;
        if self.nrows == 1 {
            m[(0, 0)] = self[(0, 0)];
            return Ok(m);
        }

        for i in 0..self.nrows {
            for j in 0..self.ncols {
                let sign = if (i + j) % 2 == 0 { 1.0 } else { -1.0 };
                m[(i, j)] = sign * self.minor(i, j).laplace_det();
            }
        }
        Ok(m)
    }

    /// Compute the adjugate, the transpose of the cofactor matrix.
    pub fn adjugate(&self) -> Result<Matrix, MatrixError> {
        Ok(self.cofactor_matrix()?.into_transposed())
    }

    /// Compute the inverse of a square matrix as the adjugate divided by the
    /// determinant.
    ///
    /// A determinant smaller in magnitude than [`Matrix::TOLERANCE`] is
    /// treated as zero and reported as [`MatrixError::Singular`].
    #[instrument(level = "trace", skip(self), fields(n = self.nrows))]
    pub fn inv(&self) -> Result<Matrix, MatrixError> {
        let d = self.det()?;
        if d.abs() < Matrix::TOLERANCE {
            debug!("Rejecting inversion: |det| = {:e} is below tolerance", d.abs());
            return Err(MatrixError::Singular);
        }

        self.adjugate()?.mul_scalar(1.0 / d)
    }
}
