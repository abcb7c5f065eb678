// src/threading/thread_pool.rs
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::terrain::error::ConfigResult;

/// Rayon pool used to build the tiles that are missing from the window in
/// one tick.
pub struct TileBuildPool {
    pool: rayon::ThreadPool,
    num_threads: usize,
}

impl TileBuildPool {
    // If size is 0, it will use num_cpus::get() to determine the thread count
    pub fn new(size: usize) -> ConfigResult<TileBuildPool> {
        let num_threads = if size > 0 { size } else { num_cpus::get() };

        let pool = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|index| format!("tile-build-{index}"))
            .build()?;

        log::debug!("TileBuildPool: created with {} threads", num_threads);

        Ok(TileBuildPool { pool, num_threads })
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Maps `f` over `items` on the pool. The output order matches `items`.
    pub fn build_all<T, F, R>(&self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        F: Fn(&T) -> R + Send + Sync,
        R: Send,
    {
        self.pool.install(|| items.par_iter().map(f).collect())
    }
}

impl std::fmt::Debug for TileBuildPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileBuildPool")
            .field("num_threads", &self.num_threads)
            .finish()
    }
}
