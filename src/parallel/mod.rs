//! Fan-out/join execution for per-row parallel kernels.
//!
//! An [`Executor`] receives one independent unit of work per item (normally a
//! disjoint mutable row handle) and blocks the caller until every unit has
//! completed. No kernel spawns threads of its own.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::config::ExecOptions;
use crate::error::MatError;
use log::{trace, warn};

pub trait Executor {
    /// Number of workers units are spread over.
    fn size(&self) -> usize;

    /// Run `task(i, item)` for every item and return once all units finished.
    ///
    /// The first error reported by a unit is returned. A unit that panics
    /// surfaces as [`MatError::Interrupted`]. Units that already ran keep
    /// their effects.
    fn fan_out<I, F>(&self, items: Vec<I>, task: F) -> Result<(), MatError>
    where
        I: Send,
        F: Fn(usize, I) -> Result<(), MatError> + Send + Sync;
}

/// Runs every unit inline on the calling thread, in index order.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sequential;

impl Executor for Sequential {
    fn size(&self) -> usize {
        1
    }

    fn fan_out<I, F>(&self, items: Vec<I>, task: F) -> Result<(), MatError>
    where
        I: Send,
        F: Fn(usize, I) -> Result<(), MatError> + Send + Sync,
    {
        let units = items.len();
        trace!("sequential fan_out: {} units", units);
        let joined = panic::catch_unwind(AssertUnwindSafe(|| {
            items
                .into_iter()
                .enumerate()
                .try_for_each(|(i, item)| task(i, item))
        }));
        match joined {
            Ok(res) => res,
            Err(payload) => {
                let msg = panic_message(payload.as_ref());
                warn!("fan_out over {} units interrupted: {}", units, msg);
                Err(MatError::Interrupted(msg))
            }
        }
    }
}

/// Text of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

#[cfg(feature = "rayon")]
pub mod rayon_pool;
#[cfg(feature = "rayon")]
pub use rayon_pool::RayonPool;

/// Executor picked from the enabled features.
pub enum UniverseExecutor {
    #[cfg(feature = "rayon")]
    Rayon(RayonPool),
    Serial(Sequential),
}

impl UniverseExecutor {
    /// Rayon pool when the `rayon` feature is on, inline execution otherwise.
    pub fn from_options(opts: &ExecOptions) -> Result<Self, MatError> {
        #[cfg(feature = "rayon")]
        {
            RayonPool::with_options(opts).map(UniverseExecutor::Rayon)
        }
        #[cfg(not(feature = "rayon"))]
        {
            let _ = opts;
            Ok(UniverseExecutor::Serial(Sequential))
        }
    }
}

impl Executor for UniverseExecutor {
    fn size(&self) -> usize {
        match self {
            #[cfg(feature = "rayon")]
            UniverseExecutor::Rayon(pool) => pool.size(),
            UniverseExecutor::Serial(seq) => seq.size(),
        }
    }

    fn fan_out<I, F>(&self, items: Vec<I>, task: F) -> Result<(), MatError>
    where
        I: Send,
        F: Fn(usize, I) -> Result<(), MatError> + Send + Sync,
    {
        match self {
            #[cfg(feature = "rayon")]
            UniverseExecutor::Rayon(pool) => pool.fan_out(items, task),
            UniverseExecutor::Serial(seq) => seq.fan_out(items, task),
        }
    }
}
