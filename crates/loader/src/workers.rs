//! The worker-pool boundary.

/// Fire-and-forget job accepted by a pool.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// External pool of decode workers.
///
/// The loader only hands a pool fire-and-forget jobs; scheduling, sizing,
/// and shutdown stay with the implementation. Jobs never unwind out of
/// themselves: the loader wraps its decode work in a panic guard before
/// enqueueing.
pub trait WorkerPool: Send + Sync {
    /// Run `job` on some worker at some future time.
    fn enqueue(&self, job: Job);
}

/// rayon's pool is the usual choice in-engine.
impl WorkerPool for rayon::ThreadPool {
    fn enqueue(&self, job: Job) {
        self.spawn(job);
    }
}

/// Runs every job immediately on the calling thread. Deterministic;
/// useful for tests and single-threaded tools, at the price of `enqueue`
/// blocking for the whole decode.
#[derive(Debug, Default)]
pub struct InlineWorkers;

impl WorkerPool for InlineWorkers {
    fn enqueue(&self, job: Job) {
        job();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn inline_workers_run_on_the_spot() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        InlineWorkers.enqueue(Box::new(move || flag.store(true, Ordering::SeqCst)));
        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn rayon_pool_runs_enqueued_jobs() {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build()
            .expect("build pool");
        let (tx, rx) = mpsc::channel();
        let pool: &dyn WorkerPool = &pool;
        pool.enqueue(Box::new(move || tx.send(7).expect("receiver alive")));
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok(7));
    }
}
