//! Dense matrices as row-access targets.
//!
//! `faer::Mat<T>` gets read and write row views so it can be used as the `B`
//! or `C` operand of the sparse kernels. Its column-major rows are strided, so
//! the parallel kernels instead target [`RowMajorMatrix`], whose rows are
//! contiguous slices that split into disjoint `&mut [T]` handles.

use crate::core::traits::{MatShape, ParRowsMut, RowView, RowViewMut, Vector, VectorMut};
use faer::Mat;
use num_traits::Float;

impl<T> MatShape for Mat<T> {
    fn nrows(&self) -> usize {
        self.nrows()
    }
    fn ncols(&self) -> usize {
        self.ncols()
    }
}

/// Read-only view of one row of a `faer::Mat`.
pub struct MatRowRef<'a, T> {
    mat: &'a Mat<T>,
    row: usize,
}

/// Exclusive view of one row of a `faer::Mat`.
pub struct MatRowMut<'a, T> {
    mat: &'a mut Mat<T>,
    row: usize,
}

fn strided_nonzero<T: Float>(mat: &Mat<T>, row: usize) -> impl Iterator<Item = (usize, T)> + '_ {
    (0..mat.ncols())
        .map(move |j| (j, mat[(row, j)]))
        .filter(|(_, v)| !v.is_zero())
}

impl<T: Float> Vector<T> for MatRowRef<'_, T> {
    fn len(&self) -> usize {
        self.mat.ncols()
    }
    fn get(&self, j: usize) -> T {
        self.mat[(self.row, j)]
    }
    fn nnz(&self) -> usize {
        strided_nonzero(self.mat, self.row).count()
    }
    fn iter_nonzero(&self) -> impl Iterator<Item = (usize, T)> + '_ {
        strided_nonzero(self.mat, self.row)
    }
}

impl<T: Float> Vector<T> for MatRowMut<'_, T> {
    fn len(&self) -> usize {
        self.mat.ncols()
    }
    fn get(&self, j: usize) -> T {
        self.mat[(self.row, j)]
    }
    fn nnz(&self) -> usize {
        strided_nonzero(&*self.mat, self.row).count()
    }
    fn iter_nonzero(&self) -> impl Iterator<Item = (usize, T)> + '_ {
        strided_nonzero(&*self.mat, self.row)
    }
}

impl<T: Float> VectorMut<T> for MatRowMut<'_, T> {
    fn set(&mut self, j: usize, value: T) {
        self.mat[(self.row, j)] = value;
    }
    fn increment(&mut self, j: usize, delta: T) {
        let v = self.mat[(self.row, j)];
        self.mat[(self.row, j)] = v + delta;
    }
    fn add_scalar(&mut self, c: T) {
        for j in 0..self.mat.ncols() {
            self.increment(j, c);
        }
    }
    fn scale(&mut self, c: T) {
        for j in 0..self.mat.ncols() {
            let v = self.mat[(self.row, j)];
            self.mat[(self.row, j)] = v * c;
        }
    }
    fn zero_out(&mut self) {
        for j in 0..self.mat.ncols() {
            self.mat[(self.row, j)] = T::zero();
        }
    }
}

impl<T: Float> RowView<T> for Mat<T> {
    type Row<'a>
        = MatRowRef<'a, T>
    where
        Self: 'a;

    fn row(&self, i: usize) -> MatRowRef<'_, T> {
        assert!(i < self.nrows(), "row {} out of bounds for {} rows", i, self.nrows());
        MatRowRef { mat: self, row: i }
    }
}

impl<T: Float> RowViewMut<T> for Mat<T> {
    type RowMut<'a>
        = MatRowMut<'a, T>
    where
        Self: 'a;

    fn row_mut(&mut self, i: usize) -> MatRowMut<'_, T> {
        assert!(i < self.nrows(), "row {} out of bounds for {} rows", i, self.nrows());
        MatRowMut { mat: self, row: i }
    }

    fn set_entry(&mut self, i: usize, j: usize, value: T) {
        self[(i, j)] = value;
    }
}

/// Dense matrix stored row by row in one contiguous buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct RowMajorMatrix<T> {
    nrows: usize,
    ncols: usize,
    data: Vec<T>,
}

impl<T: Float> RowMajorMatrix<T> {
    /// All-zero `nrows × ncols` matrix.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self { nrows, ncols, data: vec![T::zero(); nrows * ncols] }
    }

    /// Construct from raw row-major storage.
    ///
    /// # Panics
    /// Panics if `data.len() != nrows * ncols`.
    pub fn from_raw(nrows: usize, ncols: usize, data: Vec<T>) -> Self {
        assert_eq!(data.len(), nrows * ncols, "row-major buffer has the wrong length");
        Self { nrows, ncols, data }
    }

    pub fn from_fn(nrows: usize, ncols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(nrows * ncols);
        for i in 0..nrows {
            for j in 0..ncols {
                data.push(f(i, j));
            }
        }
        Self { nrows, ncols, data }
    }

    pub fn from_faer(a: &Mat<T>) -> Self {
        Self::from_fn(a.nrows(), a.ncols(), |i, j| a[(i, j)])
    }

    pub fn to_faer(&self) -> Mat<T> {
        Mat::from_fn(self.nrows, self.ncols, |i, j| self.data[i * self.ncols + j])
    }

    pub fn get(&self, i: usize, j: usize) -> T {
        assert!(i < self.nrows && j < self.ncols, "index ({}, {}) out of bounds", i, j);
        self.data[i * self.ncols + j]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl<T> MatShape for RowMajorMatrix<T> {
    fn nrows(&self) -> usize {
        self.nrows
    }
    fn ncols(&self) -> usize {
        self.ncols
    }
}

impl<T: Float> RowView<T> for RowMajorMatrix<T> {
    type Row<'a>
        = &'a [T]
    where
        Self: 'a;

    fn row(&self, i: usize) -> &[T] {
        assert!(i < self.nrows, "row {} out of bounds for {} rows", i, self.nrows);
        &self.data[i * self.ncols..(i + 1) * self.ncols]
    }
}

impl<T: Float> RowViewMut<T> for RowMajorMatrix<T> {
    type RowMut<'a>
        = &'a mut [T]
    where
        Self: 'a;

    fn row_mut(&mut self, i: usize) -> &mut [T] {
        assert!(i < self.nrows, "row {} out of bounds for {} rows", i, self.nrows);
        &mut self.data[i * self.ncols..(i + 1) * self.ncols]
    }

    fn zero_rows(&mut self) {
        self.data.iter_mut().for_each(|x| *x = T::zero());
    }
}

impl<T: Float + Send> ParRowsMut<T> for RowMajorMatrix<T> {
    type RowPart<'a>
        = &'a mut [T]
    where
        Self: 'a;

    fn split_rows_mut(&mut self) -> Vec<&mut [T]> {
        if self.ncols == 0 {
            return (0..self.nrows).map(|_| <&mut [T]>::default()).collect();
        }
        self.data.chunks_mut(self.ncols).collect()
    }
}
