// rayon-based fan-out executor

use std::panic::{self, AssertUnwindSafe};

use log::{trace, warn};
use rayon::prelude::*;

use super::{Executor, panic_message};
use crate::config::ExecOptions;
use crate::error::MatError;

/// Owns a dedicated rayon thread pool; units run through `install`.
pub struct RayonPool {
    pool: rayon::ThreadPool,
}

impl RayonPool {
    /// Pool with one worker per logical CPU.
    pub fn new() -> Result<Self, MatError> {
        Self::with_options(&ExecOptions::default())
    }

    pub fn with_options(opts: &ExecOptions) -> Result<Self, MatError> {
        let threads = opts.num_threads.unwrap_or_else(num_cpus::get).max(1);
        let prefix = opts.thread_name.clone();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(move |i| format!("{prefix}-{i}"))
            .build()
            .map_err(|e| MatError::Executor(e.to_string()))?;
        trace!("built rayon pool with {} threads", threads);
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: rayon::ThreadPool) -> Self {
        Self { pool }
    }
}

impl Executor for RayonPool {
    fn size(&self) -> usize {
        self.pool.current_num_threads()
    }

    fn fan_out<I, F>(&self, items: Vec<I>, task: F) -> Result<(), MatError>
    where
        I: Send,
        F: Fn(usize, I) -> Result<(), MatError> + Send + Sync,
    {
        let units = items.len();
        trace!("rayon fan_out: {} units on {} threads", units, self.size());
        // install() blocks until every unit is done and re-raises a worker
        // panic on this thread; catch it here so the join reports it.
        let joined = panic::catch_unwind(AssertUnwindSafe(|| {
            self.pool.install(|| {
                items
                    .into_par_iter()
                    .enumerate()
                    .try_for_each(|(i, item)| task(i, item))
            })
        }));
        match joined {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                warn!("fan_out over {} units failed: {}", units, e);
                Err(e)
            }
            Err(payload) => {
                let msg = panic_message(payload.as_ref());
                warn!("fan_out over {} units interrupted: {}", units, msg);
                Err(MatError::Interrupted(msg))
            }
        }
    }
}
