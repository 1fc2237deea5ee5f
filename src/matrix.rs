use std::{
    fmt::{self, Display},
    ops::{Add, AddAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign},
    slice::Chunks,
};

/// A dense matrix of double-precision numbers, stored in row-major order.
///
/// A matrix is created with positive dimensions and stays well-formed until
/// [`clear`](Matrix::clear) releases its storage. Every fallible operation
/// checks its inputs first and reports problems through [`MatrixError`]
/// instead of touching any element.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawMatrix", into = "RawMatrix"))]
pub struct Matrix {
    pub(crate) data: Vec<f64>,
    pub(crate) nrows: u32,
    pub(crate) ncols: u32,
}

impl Matrix {
    /// Absolute tolerance used by [`approx_eq`](Matrix::approx_eq) and by the
    /// singularity test in [`inv`](Matrix::inv).
    pub const TOLERANCE: f64 = 1e-7;

    /// Create a zero-filled matrix with `nrows` rows and `ncols` columns.
    pub fn new(nrows: u32, ncols: u32) -> Result<Matrix, MatrixError> {
        if nrows == 0 || ncols == 0 {
            return Err(MatrixError::Invalid);
        }

        Ok(Matrix {
            data: vec![0.0; nrows as usize * ncols as usize],
            nrows,
            ncols,
        })
    }

    /// Create a new square matrix with ones on the main diagonal and zeroes
    /// elsewhere.
    pub fn identity(n: u32) -> Result<Matrix, MatrixError> {
        let mut m = Matrix::new(n, n)?;
        for i in 0..n {
            m[(i, i)] = 1.0;
        }
        Ok(m)
    }

    /// Create a new matrix with the scalars `diag` on the main diagonal and
    /// zeroes elsewhere.
    pub fn eye(diag: &[f64]) -> Result<Matrix, MatrixError> {
        let mut m = Matrix::new(diag.len() as u32, diag.len() as u32)?;
        for (i, e) in diag.iter().enumerate() {
            m[(i as u32, i as u32)] = *e;
        }
        Ok(m)
    }

    /// Convert a row-major linear representation of a matrix to a [Matrix].
    pub fn from_linear(data: Vec<f64>, nrows: u32, ncols: u32) -> Result<Matrix, MatrixError> {
        if nrows == 0 || ncols == 0 {
            return Err(MatrixError::Invalid);
        }
        if data.len() != nrows as usize * ncols as usize {
            return Err(MatrixError::ShapeMismatch);
        }

        Ok(Matrix { data, nrows, ncols })
    }

    /// Create a matrix from a vector of rows.
    pub fn from_nested_vec(matrix: Vec<Vec<f64>>) -> Result<Matrix, MatrixError> {
        let ncols = matrix.first().map(|r| r.len()).unwrap_or(0);
        if matrix.is_empty() || ncols == 0 {
            return Err(MatrixError::Invalid);
        }

        let nrows = matrix.len();
        let mut data = Vec::with_capacity(nrows * ncols);
        for row in matrix {
            if row.len() != ncols {
                return Err(MatrixError::ShapeMismatch);
            }
            data.extend(row);
        }

        Ok(Matrix {
            data,
            nrows: nrows as u32,
            ncols: ncols as u32,
        })
    }

    /// Return the number of rows.
    pub fn nrows(&self) -> usize {
        self.nrows as usize
    }

    /// Return the number of columns.
    pub fn ncols(&self) -> usize {
        self.ncols as usize
    }

    /// Return true iff the matrix handle is well-formed: both dimensions are
    /// positive and the storage holds exactly `nrows * ncols` entries.
    ///
    /// Freshly constructed matrices are always valid; [`clear`](Matrix::clear)
    /// produces the canonical invalid handle.
    pub fn is_valid(&self) -> bool {
        self.nrows > 0
            && self.ncols > 0
            && self.data.len() == self.nrows as usize * self.ncols as usize
    }

    /// Release the storage and reset the handle to the empty state.
    ///
    /// Every fallible operation rejects a cleared matrix with
    /// [`MatrixError::Invalid`]. Clearing an already cleared matrix is a
    /// no-op.
    pub fn clear(&mut self) {
        self.data = Vec::new();
        self.nrows = 0;
        self.ncols = 0;
    }

    /// Return an iterator over the rows of the matrix.
    pub fn row_iter(&self) -> Chunks<'_, f64> {
        // the chunk size must stay nonzero for cleared matrices
        self.data.chunks(self.ncols.max(1) as usize)
    }

    /// Return true iff all entries are zero.
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|e| *e == 0.0)
    }

    /// Return true iff every entry off the main diagonal is zero.
    pub fn is_diagonal(&self) -> bool {
        self.data
            .iter()
            .enumerate()
            .all(|(i, e)| i as u32 % self.ncols == i as u32 / self.ncols || *e == 0.0)
    }

    /// Compare two matrices entry-wise with absolute tolerance
    /// [`Matrix::TOLERANCE`].
    ///
    /// Returns false when either matrix is invalid or the dimensions differ;
    /// the comparison itself never fails.
    pub fn approx_eq(&self, rhs: &Matrix) -> bool {
        if !self.is_valid() || !rhs.is_valid() {
            return false;
        }
        if self.nrows != rhs.nrows || self.ncols != rhs.ncols {
            return false;
        }

        self.data
            .iter()
            .zip(&rhs.data)
            .all(|(a, b)| (a - b).abs() < Matrix::TOLERANCE)
    }

    /// Apply `f` to every entry, producing a new matrix of the same shape.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Matrix {
        Matrix {
            data: self.data.iter().map(|e| f(*e)).collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }

    /// Get the squared Frobenius norm of the matrix.
    pub fn norm_squared(&self) -> f64 {
        self.data.iter().map(|e| e * e).sum()
    }

    /// Add two matrices entry-wise into a new matrix.
    pub fn try_add(&self, rhs: &Matrix) -> Result<Matrix, MatrixError> {
        if !self.is_valid() || !rhs.is_valid() {
            return Err(MatrixError::Invalid);
        }
        if self.nrows != rhs.nrows || self.ncols != rhs.ncols {
            return Err(MatrixError::ShapeMismatch);
        }

        let mut m = Matrix::new(self.nrows, self.ncols)?;
        for (c, (a, b)) in m.data.iter_mut().zip(self.data.iter().zip(&rhs.data)) {
            *c = a + b;
        }
        Ok(m)
    }

    /// Subtract `rhs` from `self` entry-wise into a new matrix.
    pub fn try_sub(&self, rhs: &Matrix) -> Result<Matrix, MatrixError> {
        if !self.is_valid() || !rhs.is_valid() {
            return Err(MatrixError::Invalid);
        }
        if self.nrows != rhs.nrows || self.ncols != rhs.ncols {
            return Err(MatrixError::ShapeMismatch);
        }

        let mut m = Matrix::new(self.nrows, self.ncols)?;
        for (c, (a, b)) in m.data.iter_mut().zip(self.data.iter().zip(&rhs.data)) {
            *c = a - b;
        }
        Ok(m)
    }

    /// Multiply the scalar `k` into each entry of the matrix.
    pub fn mul_scalar(&self, k: f64) -> Result<Matrix, MatrixError> {
        if !self.is_valid() {
            return Err(MatrixError::Invalid);
        }

        Ok(Matrix {
            data: self.data.iter().map(|e| e * k).collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        })
    }

    /// Multiply two matrices into a new `self.nrows` by `rhs.ncols` matrix.
    pub fn try_mul(&self, rhs: &Matrix) -> Result<Matrix, MatrixError> {
        if !self.is_valid() || !rhs.is_valid() {
            return Err(MatrixError::Invalid);
        }
        if self.ncols != rhs.nrows {
            return Err(MatrixError::ShapeMismatch);
        }

        let mut m = Matrix::new(self.nrows, rhs.ncols)?;
        for i in 0..self.nrows {
            for j in 0..rhs.ncols {
                let sum = &mut m[(i, j)];
                for k in 0..self.ncols {
                    *sum += self[(i, k)] * rhs[(k, j)];
                }
            }
        }
        Ok(m)
    }

    /// Return the transpose as a new `ncols` by `nrows` matrix.
    pub fn transpose(&self) -> Result<Matrix, MatrixError> {
        if !self.is_valid() {
            return Err(MatrixError::Invalid);
        }

        let mut m = Matrix::new(self.ncols, self.nrows)?;
        for i in 0..self.nrows {
            for j in 0..self.ncols {
                m[(j, i)] = self[(i, j)];
            }
        }
        Ok(m)
    }

    /// Transpose the matrix, swapping in place when it is square.
    pub fn into_transposed(mut self) -> Matrix {
        if self.nrows == self.ncols {
            for i in 0..self.nrows {
                for j in 0..i {
                    self.data
                        .swap((i * self.ncols + j) as usize, (j * self.ncols + i) as usize);
                }
            }
            self
        } else {
            let mut m = Matrix {
                data: vec![0.0; self.data.len()],
                nrows: self.ncols,
                ncols: self.nrows,
            };
            for i in 0..self.nrows {
                for j in 0..self.ncols {
                    m[(j, i)] = self[(i, j)];
                }
            }
            m
        }
    }
}

impl Index<u32> for Matrix {
    type Output = [f64];

    /// Get the `index`th row as a slice.
    #[inline]
    fn index(&self, index: u32) -> &Self::Output {
        let start = index as usize * self.ncols as usize;
        &self.data[start..start + self.ncols as usize]
    }
}

impl Index<(u32, u32)> for Matrix {
    type Output = f64;

    /// Get the entry at row `i` and column `j`, where `index=(i,j)`.
    #[inline]
    fn index(&self, index: (u32, u32)) -> &Self::Output {
        &self.data[(index.0 * self.ncols + index.1) as usize]
    }
}

impl IndexMut<(u32, u32)> for Matrix {
    /// Get the entry at row `i` and column `j`, where `index=(i,j)`.
    #[inline]
    fn index_mut(&mut self, index: (u32, u32)) -> &mut f64 {
        &mut self.data[(index.0 * self.ncols + index.1) as usize]
    }
}

impl Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, row) in self.row_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{{")?;
            for (j, e) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", e)?;
            }
            write!(f, "}}")?;
        }
        write!(f, "}}")
    }
}

impl Add<&Matrix> for &Matrix {
    type Output = Matrix;

    /// Add two matrices. Panics when an operand is rejected; use
    /// [`Matrix::try_add`] to handle the error instead.
    fn add(self, rhs: &Matrix) -> Self::Output {
        match self.try_add(rhs) {
            Ok(m) => m,
            Err(e) => panic!(
                "Cannot add a {}x{} and a {}x{} matrix: {}",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols, e
            ),
        }
    }
}

impl AddAssign<&Matrix> for Matrix {
    /// Add two matrices in place. Panics when an operand is rejected.
    fn add_assign(&mut self, rhs: &Matrix) {
        if !self.is_valid()
            || !rhs.is_valid()
            || self.nrows != rhs.nrows
            || self.ncols != rhs.ncols
        {
            panic!(
                "Cannot add a {}x{} and a {}x{} matrix in place",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols
            );
        }

        for (a, b) in self.data.iter_mut().zip(&rhs.data) {
            *a += b;
        }
    }
}

impl Sub<&Matrix> for &Matrix {
    type Output = Matrix;

    /// Subtract two matrices. Panics when an operand is rejected; use
    /// [`Matrix::try_sub`] to handle the error instead.
    fn sub(self, rhs: &Matrix) -> Self::Output {
        match self.try_sub(rhs) {
            Ok(m) => m,
            Err(e) => panic!(
                "Cannot subtract a {}x{} from a {}x{} matrix: {}",
                rhs.nrows, rhs.ncols, self.nrows, self.ncols, e
            ),
        }
    }
}

impl SubAssign<&Matrix> for Matrix {
    /// Subtract two matrices in place. Panics when an operand is rejected.
    fn sub_assign(&mut self, rhs: &Matrix) {
        if !self.is_valid()
            || !rhs.is_valid()
            || self.nrows != rhs.nrows
            || self.ncols != rhs.ncols
        {
            panic!(
                "Cannot subtract a {}x{} from a {}x{} matrix in place",
                rhs.nrows, rhs.ncols, self.nrows, self.ncols
            );
        }

        for (a, b) in self.data.iter_mut().zip(&rhs.data) {
            *a -= b;
        }
    }
}

impl Mul<&Matrix> for &Matrix {
    type Output = Matrix;

    /// Multiply two matrices. Panics when an operand is rejected; use
    /// [`Matrix::try_mul`] to handle the error instead.
    fn mul(self, rhs: &Matrix) -> Self::Output {
        match self.try_mul(rhs) {
            Ok(m) => m,
            Err(e) => panic!(
                "Cannot multiply a {}x{} and a {}x{} matrix: {}",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols, e
            ),
        }
    }
}

impl MulAssign<&Matrix> for Matrix {
    /// Multiply two matrices in place. Panics when an operand is rejected.
    fn mul_assign(&mut self, rhs: &Matrix) {
        *self = &*self * rhs;
    }
}

impl Mul<f64> for &Matrix {
    type Output = Matrix;

    /// Multiply the scalar `rhs` into each entry of the matrix. Panics when
    /// the matrix is invalid; use [`Matrix::mul_scalar`] to handle the error
    /// instead.
    fn mul(self, rhs: f64) -> Self::Output {
        match self.mul_scalar(rhs) {
            Ok(m) => m,
            Err(e) => panic!("Cannot scale a {}x{} matrix: {}", self.nrows, self.ncols, e),
        }
    }
}

impl Neg for Matrix {
    type Output = Matrix;

    /// Negate every entry of the matrix.
    fn neg(mut self) -> Self::Output {
        for e in &mut self.data {
            *e = -*e;
        }
        self
    }
}

/// Errors reported by matrix operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatrixError {
    /// The matrix handle is malformed: a dimension is zero or the storage
    /// does not match the dimensions. Cleared matrices fall in this class.
    Invalid,
    /// The shapes of the operands are not compatible with the operation.
    ShapeMismatch,
    /// The operation is only defined for square matrices.
    NotSquare,
    /// The matrix is numerically singular and cannot be inverted.
    Singular,
}

impl Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixError::Invalid => write!(f, "The matrix is invalid"),
            MatrixError::ShapeMismatch => {
                write!(f, "The shapes of the matrices are not compatible")
            }
            MatrixError::NotSquare => write!(f, "The matrix is not square"),
            MatrixError::Singular => write!(f, "The matrix is singular"),
        }
    }
}

/// Serialized form of a [Matrix]; deserialization re-validates the shape.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawMatrix {
    nrows: u32,
    ncols: u32,
    data: Vec<f64>,
}

#[cfg(feature = "serde")]
impl From<Matrix> for RawMatrix {
    fn from(m: Matrix) -> RawMatrix {
        RawMatrix {
            nrows: m.nrows,
            ncols: m.ncols,
            data: m.data,
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<RawMatrix> for Matrix {
    type Error = MatrixError;

    fn try_from(raw: RawMatrix) -> Result<Matrix, MatrixError> {
        Matrix::from_linear(raw.data, raw.nrows, raw.ncols)
    }
}
