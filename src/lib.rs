//! rowsparse: row-sparse matrices with sparsity-aware kernels
//!
//! This crate provides a row-sparse matrix type whose multiply, transpose and
//! scaled-add kernels only touch stored entries, with parallel variants that
//! fan per-row work out over a worker pool and join before returning.

pub mod parallel;

pub mod config;
pub mod core;
pub mod error;
pub mod matrix;

// Re-exports for convenience
pub use crate::config::ExecOptions;
pub use crate::core::traits::{
    MatShape, MatTransVec, MatVec, ParRowsMut, RowView, RowViewMut, Vector, VectorMut,
};
pub use crate::error::MatError;
pub use crate::matrix::{MatRowMut, MatRowRef, RowMajorMatrix, SparseMatrix, SparseVector};
pub use crate::parallel::{Executor, Sequential, UniverseExecutor};

#[cfg(feature = "rayon")]
pub use crate::parallel::RayonPool;
