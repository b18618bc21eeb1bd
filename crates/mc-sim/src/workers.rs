//! The worker pool the parallel passes run on.

use crate::SimResult;

/// Runs closures on a dedicated rayon pool when the `parallel` feature is
/// on, or inline otherwise.
pub(crate) struct Workers {
    #[cfg(feature = "parallel")]
    pool: Option<rayon::ThreadPool>,
}

impl Workers {
    /// `None` uses rayon's global pool (one thread per logical core).
    #[cfg(feature = "parallel")]
    pub(crate) fn new(num_threads: Option<usize>) -> SimResult<Self> {
        let pool = match num_threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|i| format!("mc-worker-{i}"))
                    .build()
                    .map_err(|e| crate::SimError::ThreadPool(e.to_string()))?,
            ),
            None => None,
        };
        Ok(Self { pool })
    }

    #[cfg(not(feature = "parallel"))]
    pub(crate) fn new(num_threads: Option<usize>) -> SimResult<Self> {
        if num_threads.is_some_and(|n| n > 1) {
            tracing::debug!("num_threads ignored: built without the `parallel` feature");
        }
        Ok(Self {})
    }

    #[cfg(feature = "parallel")]
    pub(crate) fn install<R: Send>(&self, f: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }

    #[cfg(not(feature = "parallel"))]
    #[inline]
    pub(crate) fn install<R>(&self, f: impl FnOnce() -> R) -> R {
        f()
    }

    pub(crate) fn threads(&self) -> usize {
        #[cfg(feature = "parallel")]
        {
            self.pool
                .as_ref()
                .map_or_else(rayon::current_num_threads, |p| p.current_num_threads())
        }

        #[cfg(not(feature = "parallel"))]
        {
            1
        }
    }
}
