//! Fixed-size worker pool.
//!
//! Each worker is a long-lived OS thread draining its own job queue, one job
//! at a time. Jobs are routed to a uniformly random worker and report back
//! through a one-shot channel, so callers simply await a [`JobHandle`].

use crate::error::{panic_message, EngineError};
use parking_lot::Mutex;
use rand::Rng;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

type Job = Box<dyn FnOnce() + Send + 'static>;

struct Worker {
    id: usize,
    sender: mpsc::Sender<Job>,
    handle: JoinHandle<()>,
}

impl Worker {
    fn spawn(id: usize) -> Result<Self, EngineError> {
        let (sender, receiver) = mpsc::channel::<Job>();
        let handle = thread::Builder::new()
            .name(format!("newsbrief-worker-{}", id))
            .spawn(move || {
                while let Ok(job) = receiver.recv() {
                    job();
                }
                debug!(worker = id, "Worker stopped");
            })
            .map_err(|e| {
                EngineError::Summarization(format!("failed to start worker {}: {}", id, e))
            })?;

        Ok(Self { id, sender, handle })
    }
}

/// `available_parallelism - 1`, at least one.
pub fn default_pool_size() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .saturating_sub(1)
        .max(1)
}

pub struct WorkerPool {
    workers: Mutex<Vec<Worker>>,
    size: usize,
}

impl WorkerPool {
    /// Start `size` workers; zero is treated as one.
    pub fn new(size: usize) -> Result<Self, EngineError> {
        let size = size.max(1);
        let workers = (0..size)
            .map(Worker::spawn)
            .collect::<Result<Vec<_>, _>>()?;
        info!(workers = size, "Worker pool started");

        Ok(Self {
            workers: Mutex::new(workers),
            size,
        })
    }

    /// Number of workers the pool was started with
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_shut_down(&self) -> bool {
        self.workers.lock().is_empty()
    }

    /// Queue `task` on a random worker.
    ///
    /// A panic inside `task` resolves its handle to an
    /// [`EngineError::Extraction`]; the worker keeps serving other jobs.
    pub fn submit<F, T>(&self, task: F) -> Result<JobHandle<T>, EngineError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let job: Job = Box::new(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(task))
                .map_err(|payload| EngineError::Extraction(panic_message(payload.as_ref())));
            // The caller may have stopped waiting.
            let _ = tx.send(result);
        });

        let workers = self.workers.lock();
        if workers.is_empty() {
            return Err(EngineError::Summarization(
                "worker pool has been shut down".to_string(),
            ));
        }
        let worker = &workers[rand::rng().random_range(0..workers.len())];
        worker.sender.send(job).map_err(|_| {
            EngineError::Summarization(format!("worker {} is not accepting jobs", worker.id))
        })?;

        Ok(JobHandle { rx })
    }

    /// Stop every worker after its queued jobs finish. Later calls are no-ops.
    pub fn shutdown(&self) {
        let workers = std::mem::take(&mut *self.workers.lock());
        if workers.is_empty() {
            return;
        }

        let count = workers.len();
        for Worker { id, sender, handle } in workers {
            drop(sender);
            if handle.join().is_err() {
                warn!(worker = id, "Worker thread panicked during shutdown");
            }
        }
        info!(workers = count, "Worker pool shut down");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if !self.workers.get_mut().is_empty() {
            warn!("Worker pool dropped without shutdown");
            self.shutdown();
        }
    }
}

/// Handle returned to await a job's result.
pub struct JobHandle<T> {
    rx: oneshot::Receiver<Result<T, EngineError>>,
}

impl<T> JobHandle<T> {
    /// Awaits the job's result.
    pub async fn outcome(self) -> Result<T, EngineError> {
        self.rx
            .await
            .map_err(|_| EngineError::Extraction("worker dropped the job".to_string()))?
    }
}
