//! Row-sparse matrix: one [`SparseVector`] per row, all of the same length.
//!
//! Every kernel walks only stored entries. Multiplication folds `A`'s sparsity
//! into row-scaled accumulation (`C.row(i) += a · B.row(k)` for each stored
//! `(k, a)` of `A.row(i)`), transpose costs O(nnz), and the `*_par` variants
//! hand one exclusive output row to each unit of an [`Executor`].
//!
//! Multiply and transpose-multiply *accumulate* into their target; zero it
//! first for exact products.
//!
//! LU and QR are not provided for this representation; convert with
//! [`SparseMatrix::to_dense`] and factor the dense matrix instead.

use crate::core::traits::{
    MatShape, MatTransVec, MatVec, ParRowsMut, RowView, RowViewMut, Vector, VectorMut,
};
use crate::error::MatError;
use crate::matrix::vector::SparseVector;
use crate::matrix::{can_multiply, same_dimensions, shape};
use crate::parallel::Executor;
use faer::Mat;
use log::debug;
use num_traits::Float;

#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix<T> {
    rows: Vec<SparseVector<T>>,
    ncols: usize,
}

impl<T: Float> SparseMatrix<T> {
    /// Empty `nrows × ncols` matrix.
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self::with_row_capacity(nrows, ncols, 0)
    }

    /// Empty matrix whose rows reserve room for `row_capacity` nonzeros each.
    pub fn with_row_capacity(nrows: usize, ncols: usize, row_capacity: usize) -> Self {
        Self {
            rows: (0..nrows)
                .map(|_| SparseVector::with_capacity(ncols, row_capacity))
                .collect(),
            ncols,
        }
    }

    /// Build from `(row, col, value)` triplets; duplicates are summed.
    pub fn from_triplets(
        nrows: usize,
        ncols: usize,
        triplets: &[(usize, usize, T)],
    ) -> Result<Self, MatError> {
        let mut m = Self::new(nrows, ncols);
        for &(i, j, v) in triplets {
            m.increment(i, j, v)?;
        }
        Ok(m)
    }

    /// Copy the nonzeros of a dense matrix.
    pub fn from_dense(a: &Mat<T>) -> Self {
        let mut m = Self::new(a.nrows(), a.ncols());
        for (i, row) in m.rows.iter_mut().enumerate() {
            for j in 0..a.ncols() {
                row.push_back(j, a[(i, j)]);
            }
        }
        m
    }

    /// Dense copy, e.g. for handing to a dense factorization.
    pub fn to_dense(&self) -> Mat<T> {
        let mut m = Mat::from_fn(self.nrows(), self.ncols, |_, _| T::zero());
        for (i, j, v) in self.iter() {
            m[(i, j)] = v;
        }
        m
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Total number of stored entries.
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(|r| r.nnz()).sum()
    }

    pub fn is_square(&self) -> bool {
        self.nrows() == self.ncols
    }

    pub fn is_sparse(&self) -> bool {
        true
    }

    /// Read-only view of row `i`.
    ///
    /// # Panics
    /// Panics if `i >= nrows()`.
    pub fn row(&self, i: usize) -> &SparseVector<T> {
        &self.rows[i]
    }

    /// Exclusive view of row `i`. Writes go straight into this matrix.
    ///
    /// # Panics
    /// Panics if `i >= nrows()`.
    pub fn row_mut(&mut self, i: usize) -> &mut SparseVector<T> {
        &mut self.rows[i]
    }

    /// Stored `(row, col, value)` triplets in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(i, row)| row.iter_nonzero().map(move |(j, v)| (i, j, v)))
    }

    pub fn get(&self, i: usize, j: usize) -> Result<T, MatError> {
        self.rows
            .as_slice()
            .get(i)
            .ok_or_else(|| self.out_of_bounds(i, j))?
            .try_get(j)
            .map_err(|_| self.out_of_bounds(i, j))
    }

    pub fn set(&mut self, i: usize, j: usize, value: T) -> Result<(), MatError> {
        let err = self.out_of_bounds(i, j);
        self.rows
            .get_mut(i)
            .ok_or_else(|| err.clone())?
            .try_set(j, value)
            .map_err(|_| err)
    }

    pub fn increment(&mut self, i: usize, j: usize, delta: T) -> Result<(), MatError> {
        let err = self.out_of_bounds(i, j);
        self.rows
            .get_mut(i)
            .ok_or_else(|| err.clone())?
            .try_increment(j, delta)
            .map_err(|_| err)
    }

    /// Exchange two rows without touching their entries.
    pub fn swap_rows(&mut self, r1: usize, r2: usize) -> Result<(), MatError> {
        let n = self.nrows();
        for r in [r1, r2] {
            if r >= n {
                return Err(self.out_of_bounds(r, 0));
            }
        }
        self.rows.swap(r1, r2);
        Ok(())
    }

    /// Clear every row; afterwards `nnz() == 0`.
    pub fn zero_out(&mut self) {
        self.rows.iter_mut().for_each(|r| r.zero_out());
    }

    /// self ← self + c · B.
    pub fn mutable_add<B>(&mut self, c: T, b: &B) -> Result<(), MatError>
    where
        B: RowView<T> + ?Sized,
    {
        self.check_same_shape("mutable_add", b)?;
        debug!("mutable_add: {}x{} (nnz {})", self.nrows(), self.ncols, self.nnz());
        for (i, row) in self.rows.iter_mut().enumerate() {
            row.add_scaled(c, &b.row(i));
        }
        Ok(())
    }

    /// Adds `c` to every stored entry. Implicit zeros are left alone, unlike
    /// a dense matrix's scalar add.
    pub fn mutable_add_scalar(&mut self, c: T) {
        self.rows.iter_mut().for_each(|r| r.add_scalar(c));
    }

    /// Scale every stored entry by `c`; `c == 0` empties the matrix.
    pub fn mutable_multiply(&mut self, c: T) {
        self.rows.iter_mut().for_each(|r| r.scale(c));
    }

    /// c ← c + z · A b.
    pub fn multiply_vec<B, C>(&self, b: &B, z: T, c: &mut C) -> Result<(), MatError>
    where
        B: Vector<T> + ?Sized,
        C: VectorMut<T> + ?Sized,
    {
        self.check_vec_operands("multiply_vec", self.ncols, b.len(), self.nrows(), c.len())?;
        for (i, row) in self.rows.iter().enumerate() {
            c.increment(i, z * row.dot(b));
        }
        Ok(())
    }

    /// C ← C + A · B.
    pub fn multiply<B, C>(&self, b: &B, c: &mut C) -> Result<(), MatError>
    where
        B: RowView<T> + ?Sized,
        C: RowViewMut<T> + ?Sized,
    {
        self.check_multiply("multiply", b, c)?;
        debug!(
            "multiply: {}x{} (nnz {}) * {}x{}",
            self.nrows(),
            self.ncols,
            self.nnz(),
            b.nrows(),
            b.ncols()
        );
        for (i, arow) in self.rows.iter().enumerate() {
            let mut crow = c.row_mut(i);
            for (k, a) in arow.iter_nonzero() {
                crow.add_scaled(a, &b.row(k));
            }
        }
        Ok(())
    }

    /// Transpose in place. Only square matrices can be transposed in place.
    pub fn mutable_transpose(&mut self) -> Result<(), MatError> {
        if !self.is_square() {
            return Err(MatError::dims(
                "mutable_transpose",
                (self.nrows(), self.nrows()),
                shape(self),
            ));
        }
        self.rows = self.transposed().rows;
        Ok(())
    }

    /// Allocating transpose, O(nnz).
    pub fn transposed(&self) -> SparseMatrix<T> {
        let mut counts = vec![0usize; self.ncols];
        for row in &self.rows {
            for &j in row.indices() {
                counts[j] += 1;
            }
        }
        let mut t = SparseMatrix {
            rows: counts
                .into_iter()
                .map(|n| SparseVector::with_capacity(self.nrows(), n))
                .collect(),
            ncols: self.nrows(),
        };
        // rows are visited in increasing order, so each target row is appended
        // to in increasing column order
        for (i, j, v) in self.iter() {
            t.rows[j].push_back(i, v);
        }
        t
    }

    /// C ← Aᵀ. `C` is zeroed first.
    pub fn transpose<C>(&self, c: &mut C) -> Result<(), MatError>
    where
        C: RowViewMut<T> + ?Sized,
    {
        let expected = (self.ncols, self.nrows());
        if shape(c) != expected {
            return Err(MatError::dims("transpose", expected, shape(c)));
        }
        c.zero_rows();
        for (i, j, v) in self.iter() {
            c.set_entry(j, i, v);
        }
        Ok(())
    }

    /// C ← C + Aᵀ · B.
    pub fn transpose_multiply<B, C>(&self, b: &B, c: &mut C) -> Result<(), MatError>
    where
        B: RowView<T> + ?Sized,
        C: RowViewMut<T> + ?Sized,
    {
        self.check_transpose_multiply("transpose_multiply", b, c)?;
        debug!(
            "transpose_multiply: {}x{} (nnz {})ᵀ * {}x{}",
            self.nrows(),
            self.ncols,
            self.nnz(),
            b.nrows(),
            b.ncols()
        );
        for (k, arow) in self.rows.iter().enumerate() {
            let brow = b.row(k);
            for (i, a) in arow.iter_nonzero() {
                c.row_mut(i).add_scaled(a, &brow);
            }
        }
        Ok(())
    }

    /// x ← x + c · Aᵀ b, visiting only the stored entries of `b`.
    pub fn transpose_multiply_vec<B, X>(&self, c: T, b: &B, x: &mut X) -> Result<(), MatError>
    where
        B: Vector<T> + ?Sized,
        X: VectorMut<T> + ?Sized,
    {
        self.check_vec_operands(
            "transpose_multiply_vec",
            self.nrows(),
            b.len(),
            self.ncols,
            x.len(),
        )?;
        for (k, bv) in b.iter_nonzero() {
            x.add_scaled(c * bv, &self.rows[k]);
        }
        Ok(())
    }

    pub fn lup(&self) -> Result<[SparseMatrix<T>; 3], MatError> {
        Err(MatError::Unsupported("LU decomposition of a sparse matrix"))
    }

    pub fn qr(&self) -> Result<[SparseMatrix<T>; 2], MatError> {
        Err(MatError::Unsupported("QR decomposition of a sparse matrix"))
    }

    fn out_of_bounds(&self, row: usize, col: usize) -> MatError {
        MatError::IndexOutOfBounds { row, col, nrows: self.nrows(), ncols: self.ncols }
    }

    fn check_same_shape<B: MatShape + ?Sized>(&self, op: &'static str, b: &B) -> Result<(), MatError> {
        if same_dimensions(self, b) {
            Ok(())
        } else {
            Err(MatError::dims(op, shape(self), shape(b)))
        }
    }

    fn check_multiply<B, C>(&self, op: &'static str, b: &B, c: &C) -> Result<(), MatError>
    where
        B: MatShape + ?Sized,
        C: MatShape + ?Sized,
    {
        if !can_multiply(self, b) {
            return Err(MatError::dims(op, (self.ncols, b.ncols()), shape(b)));
        }
        let expected = (self.nrows(), b.ncols());
        if shape(c) != expected {
            return Err(MatError::dims(op, expected, shape(c)));
        }
        Ok(())
    }

    fn check_transpose_multiply<B, C>(&self, op: &'static str, b: &B, c: &C) -> Result<(), MatError>
    where
        B: MatShape + ?Sized,
        C: MatShape + ?Sized,
    {
        if self.nrows() != b.nrows() {
            return Err(MatError::dims(op, (self.nrows(), b.ncols()), shape(b)));
        }
        let expected = (self.ncols, b.ncols());
        if shape(c) != expected {
            return Err(MatError::dims(op, expected, shape(c)));
        }
        Ok(())
    }

    /// Operand lengths for the vector kernels, reported as column vectors.
    fn check_vec_operands(
        &self,
        op: &'static str,
        want_in: usize,
        got_in: usize,
        want_out: usize,
        got_out: usize,
    ) -> Result<(), MatError> {
        if want_in != got_in {
            return Err(MatError::dims(op, (want_in, 1), (got_in, 1)));
        }
        if want_out != got_out {
            return Err(MatError::dims(op, (want_out, 1), (got_out, 1)));
        }
        Ok(())
    }
}

impl<T: Float + Send + Sync> SparseMatrix<T> {
    /// Parallel [`mutable_add`](Self::mutable_add): one unit per row.
    pub fn mutable_add_par<B, E>(&mut self, c: T, b: &B, exec: &E) -> Result<(), MatError>
    where
        B: RowView<T> + Sync + ?Sized,
        E: Executor,
    {
        self.check_same_shape("mutable_add_par", b)?;
        debug!("mutable_add_par: {} rows on {} workers", self.nrows(), exec.size());
        exec.fan_out(self.rows.iter_mut().collect(), |i, row: &mut SparseVector<T>| {
            row.add_scaled(c, &b.row(i));
            Ok(())
        })
    }

    /// Parallel [`mutable_add_scalar`](Self::mutable_add_scalar): one unit per row.
    pub fn mutable_add_scalar_par<E: Executor>(&mut self, c: T, exec: &E) -> Result<(), MatError> {
        debug!("mutable_add_scalar_par: {} rows on {} workers", self.nrows(), exec.size());
        exec.fan_out(self.rows.iter_mut().collect(), |_, row: &mut SparseVector<T>| {
            row.add_scalar(c);
            Ok(())
        })
    }

    /// Parallel [`mutable_multiply`](Self::mutable_multiply): one unit per row.
    pub fn mutable_multiply_par<E: Executor>(&mut self, c: T, exec: &E) -> Result<(), MatError> {
        debug!("mutable_multiply_par: {} rows on {} workers", self.nrows(), exec.size());
        exec.fan_out(self.rows.iter_mut().collect(), |_, row: &mut SparseVector<T>| {
            row.scale(c);
            Ok(())
        })
    }

    /// Parallel [`multiply_vec`](Self::multiply_vec): one unit per entry of `c`.
    pub fn multiply_vec_par<B, E>(&self, b: &B, z: T, c: &mut [T], exec: &E) -> Result<(), MatError>
    where
        B: Vector<T> + Sync + ?Sized,
        E: Executor,
    {
        self.check_vec_operands("multiply_vec_par", self.ncols, b.len(), self.nrows(), c.len())?;
        let rows = &self.rows;
        exec.fan_out(c.iter_mut().collect(), |i, ci: &mut T| {
            *ci = *ci + z * rows[i].dot(b);
            Ok(())
        })
    }

    /// Parallel [`multiply`](Self::multiply). Each unit owns one row of `C`
    /// and only reads `A` and `B`.
    pub fn multiply_par<B, C, E>(&self, b: &B, c: &mut C, exec: &E) -> Result<(), MatError>
    where
        B: RowView<T> + Sync + ?Sized,
        C: ParRowsMut<T> + ?Sized,
        E: Executor,
    {
        self.check_multiply("multiply_par", b, c)?;
        debug!(
            "multiply_par: {}x{} (nnz {}) * {}x{} on {} workers",
            self.nrows(),
            self.ncols,
            self.nnz(),
            b.nrows(),
            b.ncols(),
            exec.size()
        );
        let rows = &self.rows;
        exec.fan_out(c.split_rows_mut(), |i, mut crow| {
            for (k, a) in rows[i].iter_nonzero() {
                crow.add_scaled(a, &b.row(k));
            }
            Ok(())
        })
    }

    /// Parallel [`transpose_multiply`](Self::transpose_multiply).
    ///
    /// Materializes Aᵀ in O(nnz) and runs [`multiply_par`](Self::multiply_par)
    /// on it, so every unit owns one output row. Each row of `C` receives its
    /// contributions in the same order as in the sequential kernel.
    pub fn transpose_multiply_par<B, C, E>(&self, b: &B, c: &mut C, exec: &E) -> Result<(), MatError>
    where
        B: RowView<T> + Sync + ?Sized,
        C: ParRowsMut<T> + ?Sized,
        E: Executor,
    {
        self.check_transpose_multiply("transpose_multiply_par", b, c)?;
        self.transposed().multiply_par(b, c, exec)
    }

    pub fn lup_par<E: Executor>(&self, _exec: &E) -> Result<[SparseMatrix<T>; 3], MatError> {
        self.lup()
    }

    pub fn qr_par<E: Executor>(&self, _exec: &E) -> Result<[SparseMatrix<T>; 2], MatError> {
        self.qr()
    }
}

impl<T> MatShape for SparseMatrix<T> {
    fn nrows(&self) -> usize {
        self.rows.len()
    }
    fn ncols(&self) -> usize {
        self.ncols
    }
}

impl<T: Float> RowView<T> for SparseMatrix<T> {
    type Row<'a>
        = &'a SparseVector<T>
    where
        Self: 'a;

    fn row(&self, i: usize) -> &SparseVector<T> {
        &self.rows[i]
    }
}

impl<T: Float> RowViewMut<T> for SparseMatrix<T> {
    type RowMut<'a>
        = &'a mut SparseVector<T>
    where
        Self: 'a;

    fn row_mut(&mut self, i: usize) -> &mut SparseVector<T> {
        &mut self.rows[i]
    }

    fn zero_rows(&mut self) {
        self.rows.iter_mut().for_each(|r| r.zero_out());
    }
}

impl<T: Float + Send> ParRowsMut<T> for SparseMatrix<T> {
    type RowPart<'a>
        = &'a mut SparseVector<T>
    where
        Self: 'a;

    fn split_rows_mut(&mut self) -> Vec<&mut SparseVector<T>> {
        self.rows.iter_mut().collect()
    }
}

/// y = A x, overwriting `y`.
impl<T: Float> MatVec<Vec<T>> for SparseMatrix<T> {
    fn matvec(&self, x: &Vec<T>, y: &mut Vec<T>) {
        assert_eq!(self.nrows(), y.len(), "Output vector y has incorrect length");
        assert_eq!(self.ncols, x.len(), "Input vector x has incorrect length");
        for (yi, row) in y.iter_mut().zip(&self.rows) {
            *yi = row.dot(x);
        }
    }
}

/// y = Aᵀ x, overwriting `y`.
impl<T: Float> MatTransVec<Vec<T>> for SparseMatrix<T> {
    fn mattransvec(&self, x: &Vec<T>, y: &mut Vec<T>) {
        assert_eq!(self.ncols, y.len(), "Output vector y has incorrect length");
        assert_eq!(self.nrows(), x.len(), "Input vector x has incorrect length");
        y.iter_mut().for_each(|v| *v = T::zero());
        for (row, &xk) in self.rows.iter().zip(x) {
            if !xk.is_zero() {
                y.add_scaled(xk, row);
            }
        }
    }
}
