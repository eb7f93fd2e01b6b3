//! Fork-join helpers over amplitude index ranges
//!
//! [`Parallelism`] turns a [`ThreadCount`] into something that can run a
//! parallel-for or a parallel reduction over `0..len`. Fixed worker counts get
//! a dedicated rayon pool, created on first use and cached for the life of
//! the process; the platform default runs on rayon's global pool.
//!
//! Every call is a bounded parallel section: it returns only after all
//! workers are done. Ranges shorter than [`PARALLEL_THRESHOLD`] are handled
//! on the calling thread.

use crate::error::QuantumError;
use crate::threads::{ThreadCount, Workers};
use crate::Result;
use ahash::AHashMap;
use parking_lot::Mutex;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::{Arc, OnceLock};

/// Minimum range length worth splitting across workers
pub const PARALLEL_THRESHOLD: usize = 1 << 12;

/// Smallest contiguous chunk handed to a single worker
const MIN_CHUNK: usize = 1 << 10;

static POOLS: OnceLock<Mutex<AHashMap<usize, Arc<ThreadPool>>>> = OnceLock::new();

fn pool_for(workers: usize) -> Result<Arc<ThreadPool>> {
    let pools = POOLS.get_or_init(|| Mutex::new(AHashMap::new()));
    let mut pools = pools.lock();

    if let Some(pool) = pools.get(&workers) {
        return Ok(Arc::clone(pool));
    }

    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("qreg-worker-{i}"))
        .build()
        .map_err(|e| QuantumError::ThreadPool(e.to_string()))?;
    tracing::debug!(workers, "created worker pool");

    let pool = Arc::new(pool);
    pools.insert(workers, Arc::clone(&pool));
    Ok(pool)
}

/// Resolved worker configuration for one operation
#[derive(Clone)]
pub struct Parallelism {
    /// Dedicated pool; `None` means the global pool (or inline when single)
    pool: Option<Arc<ThreadPool>>,
    workers: usize,
}

impl Parallelism {
    /// Resolve `threads` (consulting the environment if asked to)
    ///
    /// A fixed count above one runs on a dedicated pool. Pools are kept per
    /// distinct count for the life of the process and are never torn down, so
    /// every count requested keeps that many OS threads alive. Callers that
    /// sweep many counts should prefer [`ThreadCount::Platform`].
    ///
    /// # Errors
    /// Returns an error if the environment holds an invalid count or the
    /// pool cannot be built.
    pub fn new(threads: ThreadCount) -> Result<Self> {
        match threads.resolve()? {
            Workers::Platform => Ok(Self {
                pool: None,
                workers: rayon::current_num_threads(),
            }),
            Workers::Fixed(n) if n.get() == 1 => Ok(Self::sequential()),
            Workers::Fixed(n) => Ok(Self {
                pool: Some(pool_for(n.get())?),
                workers: n.get(),
            }),
        }
    }

    /// Run everything on the calling thread
    pub fn sequential() -> Self {
        Self {
            pool: None,
            workers: 1,
        }
    }

    /// Number of workers this configuration runs on
    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    #[inline]
    fn splits(&self, len: usize) -> bool {
        self.workers > 1 && len >= PARALLEL_THRESHOLD
    }

    fn install<R, OP>(&self, op: OP) -> R
    where
        R: Send,
        OP: FnOnce() -> R + Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    /// Set `out[i] = f(i)` for every index
    ///
    /// Each worker writes a disjoint contiguous range of `out`.
    pub fn fill<T, F>(&self, out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        if self.splits(out.len()) {
            self.install(|| {
                out.par_iter_mut()
                    .enumerate()
                    .with_min_len(MIN_CHUNK)
                    .for_each(|(i, slot)| *slot = f(i));
            });
        } else {
            for (i, slot) in out.iter_mut().enumerate() {
                *slot = f(i);
            }
        }
    }

    /// Reduce `map(i)` over `0..len` with an associative `reduce`
    ///
    /// The grouping of partial results depends on the number of workers, so
    /// floating point results agree across worker counts only up to rounding.
    pub fn map_reduce<T, M, R>(&self, len: usize, identity: T, map: M, reduce: R) -> T
    where
        T: Copy + Send + Sync,
        M: Fn(usize) -> T + Sync + Send,
        R: Fn(T, T) -> T + Sync + Send,
    {
        if self.splits(len) {
            self.install(|| {
                (0..len)
                    .into_par_iter()
                    .with_min_len(MIN_CHUNK)
                    .map(&map)
                    .reduce(move || identity, &reduce)
            })
        } else {
            (0..len).map(map).fold(identity, reduce)
        }
    }

    /// Sum `map(i)` over `0..len`
    pub fn sum<M>(&self, len: usize, map: M) -> f64
    where
        M: Fn(usize) -> f64 + Sync + Send,
    {
        self.map_reduce(len, 0.0, map, |a, b| a + b)
    }
}

impl std::fmt::Debug for Parallelism {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parallelism")
            .field("workers", &self.workers)
            .field("dedicated_pool", &self.pool.is_some())
            .finish()
    }
}
