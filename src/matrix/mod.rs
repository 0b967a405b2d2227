//! Matrix module: sparse rows, the row-sparse matrix and dense row adapters.

pub mod dense;
pub use dense::{MatRowMut, MatRowRef, RowMajorMatrix};
pub mod sparse;
pub use sparse::SparseMatrix;
pub mod vector;
pub use vector::SparseVector;

use crate::core::traits::MatShape;

/// `(rows, cols)` of any shaped matrix.
pub fn shape<A: MatShape + ?Sized>(a: &A) -> (usize, usize) {
    (a.nrows(), a.ncols())
}

/// True when `a` and `b` have the same number of rows and columns.
pub fn same_dimensions<A, B>(a: &A, b: &B) -> bool
where
    A: MatShape + ?Sized,
    B: MatShape + ?Sized,
{
    shape(a) == shape(b)
}

/// True when `a · b` is defined.
pub fn can_multiply<A, B>(a: &A, b: &B) -> bool
where
    A: MatShape + ?Sized,
    B: MatShape + ?Sized,
{
    a.ncols() == b.nrows()
}
