use thiserror::Error;

// Unified error type for rowsparse

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatError {
    #[error("dimension mismatch in {op}: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        op: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("index ({row}, {col}) out of bounds for {nrows}x{ncols} matrix")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        nrows: usize,
        ncols: usize,
    },
    #[error("index {index} out of bounds for vector of length {len}")]
    VectorIndexOutOfBounds { index: usize, len: usize },
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
    #[error("parallel fan-out interrupted: {0}")]
    Interrupted(String),
    #[error("executor error: {0}")]
    Executor(String),
}

impl MatError {
    /// Shorthand for a shape mismatch where both sides are `(rows, cols)`.
    pub(crate) fn dims(op: &'static str, expected: (usize, usize), found: (usize, usize)) -> Self {
        MatError::DimensionMismatch { op, expected, found }
    }
}
