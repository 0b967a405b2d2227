//! Sparse row vector: sorted `(index, value)` storage with a fixed logical length.
//!
//! Explicit zeros are never stored. Writing zero removes the entry, and any
//! arithmetic whose result is exactly zero drops it, so `nnz()` always counts
//! genuinely nonzero values.

use crate::core::traits::{Vector, VectorMut};
use crate::error::MatError;
use num_traits::Float;

#[derive(Debug, Clone, PartialEq)]
pub struct SparseVector<T> {
    len: usize,
    indices: Vec<usize>,
    values: Vec<T>,
}

impl<T: Float> SparseVector<T> {
    /// Empty vector of logical length `len`.
    pub fn new(len: usize) -> Self {
        Self::with_capacity(len, 0)
    }

    /// Empty vector with room for `capacity` stored entries.
    pub fn with_capacity(len: usize, capacity: usize) -> Self {
        Self {
            len,
            indices: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Build from `(index, value)` pairs in any order; duplicates are summed.
    pub fn from_pairs<I>(len: usize, pairs: I) -> Result<Self, MatError>
    where
        I: IntoIterator<Item = (usize, T)>,
    {
        let mut v = Self::new(len);
        for (j, x) in pairs {
            v.try_increment(j, x)?;
        }
        Ok(v)
    }

    /// Stored indices, strictly increasing.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Stored values, aligned with [`indices`](Self::indices).
    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn try_get(&self, j: usize) -> Result<T, MatError> {
        self.check(j)?;
        Ok(self.lookup(j))
    }

    pub fn try_set(&mut self, j: usize, value: T) -> Result<(), MatError> {
        self.check(j)?;
        self.store(j, value);
        Ok(())
    }

    pub fn try_increment(&mut self, j: usize, delta: T) -> Result<(), MatError> {
        self.check(j)?;
        self.bump(j, delta);
        Ok(())
    }

    /// Append an entry past the current last index.
    pub(crate) fn push_back(&mut self, j: usize, value: T) {
        debug_assert!(j < self.len);
        debug_assert!(self.indices.last().is_none_or(|&last| last < j));
        if !value.is_zero() {
            self.indices.push(j);
            self.values.push(value);
        }
    }

    fn check(&self, j: usize) -> Result<(), MatError> {
        if j < self.len {
            Ok(())
        } else {
            Err(MatError::VectorIndexOutOfBounds { index: j, len: self.len })
        }
    }

    fn lookup(&self, j: usize) -> T {
        match self.indices.binary_search(&j) {
            Ok(p) => self.values[p],
            Err(_) => T::zero(),
        }
    }

    fn store(&mut self, j: usize, value: T) {
        match self.indices.binary_search(&j) {
            Ok(p) if value.is_zero() => {
                self.indices.remove(p);
                self.values.remove(p);
            }
            Ok(p) => self.values[p] = value,
            Err(_) if value.is_zero() => {}
            Err(p) => {
                self.indices.insert(p, j);
                self.values.insert(p, value);
            }
        }
    }

    fn bump(&mut self, j: usize, delta: T) {
        if delta.is_zero() {
            return;
        }
        match self.indices.binary_search(&j) {
            Ok(p) => {
                let v = self.values[p] + delta;
                if v.is_zero() {
                    self.indices.remove(p);
                    self.values.remove(p);
                } else {
                    self.values[p] = v;
                }
            }
            Err(p) => {
                self.indices.insert(p, j);
                self.values.insert(p, delta);
            }
        }
    }

    fn drop_zeros(&mut self) {
        let mut keep = 0;
        for p in 0..self.values.len() {
            if !self.values[p].is_zero() {
                self.indices[keep] = self.indices[p];
                self.values[keep] = self.values[p];
                keep += 1;
            }
        }
        self.indices.truncate(keep);
        self.values.truncate(keep);
    }
}

impl<T: Float> Vector<T> for SparseVector<T> {
    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, j: usize) -> T {
        assert!(j < self.len, "index {} out of bounds for vector of length {}", j, self.len);
        self.lookup(j)
    }

    fn nnz(&self) -> usize {
        self.indices.len()
    }

    fn iter_nonzero(&self) -> impl Iterator<Item = (usize, T)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }
}

impl<T: Float> VectorMut<T> for SparseVector<T> {
    fn set(&mut self, j: usize, value: T) {
        assert!(j < self.len, "index {} out of bounds for vector of length {}", j, self.len);
        self.store(j, value);
    }

    fn increment(&mut self, j: usize, delta: T) {
        assert!(j < self.len, "index {} out of bounds for vector of length {}", j, self.len);
        self.bump(j, delta);
    }

    /// Merge `c · other` into the stored entries in one pass over both
    /// index sequences.
    fn add_scaled<V: Vector<T> + ?Sized>(&mut self, c: T, other: &V) {
        assert_eq!(self.len, other.len(), "Vectors must have the same length");
        if c.is_zero() {
            return;
        }
        let hint = self.indices.len() + other.nnz();
        let mut indices = Vec::with_capacity(hint);
        let mut values = Vec::with_capacity(hint);
        let mut mine = self
            .indices
            .iter()
            .copied()
            .zip(self.values.iter().copied())
            .peekable();

        for (j, x) in other.iter_nonzero() {
            while let Some((i, a)) = mine.next_if(|&(i, _)| i < j) {
                indices.push(i);
                values.push(a);
            }
            let sum = match mine.next_if(|&(i, _)| i == j) {
                Some((_, a)) => a + c * x,
                None => c * x,
            };
            if !sum.is_zero() {
                indices.push(j);
                values.push(sum);
            }
        }
        for (i, a) in mine {
            indices.push(i);
            values.push(a);
        }

        self.indices = indices;
        self.values = values;
    }

    /// Adds `c` to stored entries only; positions holding an implicit zero
    /// stay empty.
    fn add_scalar(&mut self, c: T) {
        if c.is_zero() {
            return;
        }
        self.values.iter_mut().for_each(|v| *v = *v + c);
        self.drop_zeros();
    }

    fn scale(&mut self, c: T) {
        if c.is_zero() {
            self.zero_out();
            return;
        }
        self.values.iter_mut().for_each(|v| *v = *v * c);
        self.drop_zeros();
    }

    fn zero_out(&mut self) {
        self.indices.clear();
        self.values.clear();
    }
}
