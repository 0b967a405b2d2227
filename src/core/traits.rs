//! Core linear-algebra traits for rowsparse.
//!
//! Vectors are split into a read capability ([`Vector`]) and a write
//! capability ([`VectorMut`]); matrices expose their rows the same way through
//! [`RowView`] and [`RowViewMut`]. Kernels only ever hold one writer per row.

use num_traits::Float;

/// Read access to a dense or sparse vector.
pub trait Vector<T: Float> {
    /// Logical length.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `j` (zero when nothing is stored there).
    ///
    /// # Panics
    /// Panics if `j >= len()`.
    fn get(&self, j: usize) -> T;

    /// Number of stored (nonzero) entries.
    fn nnz(&self) -> usize;

    /// Stored `(index, value)` pairs in ascending index order.
    fn iter_nonzero(&self) -> impl Iterator<Item = (usize, T)> + '_;

    /// Compute dot(self, other), visiting only the stored entries of `self`.
    ///
    /// # Panics
    /// Panics if the lengths differ.
    fn dot<V: Vector<T> + ?Sized>(&self, other: &V) -> T {
        assert_eq!(self.len(), other.len(), "Vectors must have the same length");
        self.iter_nonzero()
            .fold(T::zero(), |acc, (j, v)| acc + v * other.get(j))
    }
}

/// Write access to a dense or sparse vector.
pub trait VectorMut<T: Float>: Vector<T> {
    /// Overwrite entry `j`.
    ///
    /// # Panics
    /// Panics if `j >= len()`.
    fn set(&mut self, j: usize, value: T);

    /// Add `delta` to entry `j`.
    fn increment(&mut self, j: usize, delta: T) {
        let v = self.get(j);
        self.set(j, v + delta);
    }

    /// self ← self + c · other. Only the stored entries of `other` are visited.
    ///
    /// # Panics
    /// Panics if the lengths differ, before anything is written.
    fn add_scaled<V: Vector<T> + ?Sized>(&mut self, c: T, other: &V) {
        assert_eq!(self.len(), other.len(), "Vectors must have the same length");
        if c.is_zero() {
            return;
        }
        for (j, v) in other.iter_nonzero() {
            self.increment(j, c * v);
        }
    }

    /// Add `c` to the entries this vector stores.
    fn add_scalar(&mut self, c: T);

    /// Multiply every stored entry by `c`.
    fn scale(&mut self, c: T);

    /// Reset every entry to zero.
    fn zero_out(&mut self);
}

/// Matrix dimensions.
pub trait MatShape {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
}

/// Read-only access to the rows of a matrix.
pub trait RowView<T: Float>: MatShape {
    type Row<'a>: Vector<T>
    where
        Self: 'a;

    /// Read-only view of row `i`.
    fn row(&self, i: usize) -> Self::Row<'_>;
}

/// Exclusive (single writer) access to the rows of a matrix.
pub trait RowViewMut<T: Float>: RowView<T> {
    type RowMut<'a>: VectorMut<T>
    where
        Self: 'a;

    /// Mutable view of row `i`; the borrow of `self` keeps it unique.
    fn row_mut(&mut self, i: usize) -> Self::RowMut<'_>;

    fn set_entry(&mut self, i: usize, j: usize, value: T) {
        self.row_mut(i).set(j, value);
    }

    fn zero_rows(&mut self) {
        for i in 0..self.nrows() {
            self.row_mut(i).zero_out();
        }
    }
}

/// Matrices whose rows can be handed to different threads at once.
pub trait ParRowsMut<T: Float>: RowViewMut<T> {
    type RowPart<'a>: VectorMut<T> + Send
    where
        Self: 'a;

    /// One disjoint mutable handle per row, in row order.
    fn split_rows_mut(&mut self) -> Vec<Self::RowPart<'_>>;
}

/// Matrix–vector product: y ← A x.
pub trait MatVec<V> {
    /// Compute y = A · x.
    fn matvec(&self, x: &V, y: &mut V);
}

/// Matrix-transpose–vector product: y ← Aᵀ x.
pub trait MatTransVec<V> {
    /// Compute y = Aᵀ · x.
    fn mattransvec(&self, x: &V, y: &mut V);
}
