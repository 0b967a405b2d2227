//! Wrappers implementing the vector traits for plain Rust storage.
//!
//! Dense slices and `Vec<T>` act as dense vectors: every position is an entry,
//! and `iter_nonzero` skips the zeros. References forward to the referenced
//! vector so row views such as `&SparseVector<T>` or `&mut [T]` can be passed
//! wherever a vector is expected.
//!
//! # Usage
//! These impls let dense right-hand sides and targets (`Vec<f64>`, `&mut [f64]`)
//! be mixed freely with sparse rows in the matrix kernels.

use crate::core::traits::{Vector, VectorMut};
use num_traits::Float;

/// Dense slice as a vector.
impl<T: Float> Vector<T> for [T] {
    fn len(&self) -> usize {
        <[T]>::len(self)
    }
    fn get(&self, j: usize) -> T {
        self[j]
    }
    fn nnz(&self) -> usize {
        self.iter().filter(|v| !v.is_zero()).count()
    }
    fn iter_nonzero(&self) -> impl Iterator<Item = (usize, T)> + '_ {
        self.iter()
            .copied()
            .enumerate()
            .filter(|(_, v)| !v.is_zero())
    }
}

/// Dense slice as a mutable vector. Scalar add touches every entry.
impl<T: Float> VectorMut<T> for [T] {
    fn set(&mut self, j: usize, value: T) {
        self[j] = value;
    }
    fn increment(&mut self, j: usize, delta: T) {
        self[j] = self[j] + delta;
    }
    fn add_scalar(&mut self, c: T) {
        self.iter_mut().for_each(|x| *x = *x + c);
    }
    fn scale(&mut self, c: T) {
        self.iter_mut().for_each(|x| *x = *x * c);
    }
    fn zero_out(&mut self) {
        self.iter_mut().for_each(|x| *x = T::zero());
    }
}

impl<T: Float> Vector<T> for Vec<T> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }
    fn get(&self, j: usize) -> T {
        self[j]
    }
    fn nnz(&self) -> usize {
        Vector::nnz(self.as_slice())
    }
    fn iter_nonzero(&self) -> impl Iterator<Item = (usize, T)> + '_ {
        Vector::iter_nonzero(self.as_slice())
    }
}

impl<T: Float> VectorMut<T> for Vec<T> {
    fn set(&mut self, j: usize, value: T) {
        self[j] = value;
    }
    fn increment(&mut self, j: usize, delta: T) {
        self[j] = self[j] + delta;
    }
    fn add_scalar(&mut self, c: T) {
        VectorMut::add_scalar(self.as_mut_slice(), c);
    }
    fn scale(&mut self, c: T) {
        VectorMut::scale(self.as_mut_slice(), c);
    }
    fn zero_out(&mut self) {
        VectorMut::zero_out(self.as_mut_slice());
    }
}

impl<T: Float, V: Vector<T> + ?Sized> Vector<T> for &V {
    fn len(&self) -> usize {
        (**self).len()
    }
    fn get(&self, j: usize) -> T {
        (**self).get(j)
    }
    fn nnz(&self) -> usize {
        (**self).nnz()
    }
    fn iter_nonzero(&self) -> impl Iterator<Item = (usize, T)> + '_ {
        (**self).iter_nonzero()
    }
    fn dot<W: Vector<T> + ?Sized>(&self, other: &W) -> T {
        (**self).dot(other)
    }
}

impl<T: Float, V: Vector<T> + ?Sized> Vector<T> for &mut V {
    fn len(&self) -> usize {
        (**self).len()
    }
    fn get(&self, j: usize) -> T {
        (**self).get(j)
    }
    fn nnz(&self) -> usize {
        (**self).nnz()
    }
    fn iter_nonzero(&self) -> impl Iterator<Item = (usize, T)> + '_ {
        (**self).iter_nonzero()
    }
    fn dot<W: Vector<T> + ?Sized>(&self, other: &W) -> T {
        (**self).dot(other)
    }
}

impl<T: Float, V: VectorMut<T> + ?Sized> VectorMut<T> for &mut V {
    fn set(&mut self, j: usize, value: T) {
        (**self).set(j, value)
    }
    fn increment(&mut self, j: usize, delta: T) {
        (**self).increment(j, delta)
    }
    fn add_scaled<W: Vector<T> + ?Sized>(&mut self, c: T, other: &W) {
        (**self).add_scaled(c, other)
    }
    fn add_scalar(&mut self, c: T) {
        (**self).add_scalar(c)
    }
    fn scale(&mut self, c: T) {
        (**self).scale(c)
    }
    fn zero_out(&mut self) {
        (**self).zero_out()
    }
}
