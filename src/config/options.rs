//! Options for the parallel execution layer.
//!
//! This module provides the `ExecOptions` struct, used when building the
//! worker pool that the `*_par` kernels fan their per-row work out to.

/// Worker pool parameters.
#[derive(Debug, Clone)]
pub struct ExecOptions {
    /// Number of worker threads (`None` uses one per logical CPU)
    pub num_threads: Option<usize>,

    /// Prefix for worker thread names
    pub thread_name: String,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            num_threads: None,
            thread_name: "rowsparse-worker".to_string(),
        }
    }
}

impl ExecOptions {
    /// Default options with a fixed thread count.
    pub fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads: Some(num_threads),
            ..Self::default()
        }
    }
}
