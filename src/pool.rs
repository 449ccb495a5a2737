//! Bounded worker pool for metadata probes.
//!
//! A fixed set of threads pulls jobs from one bounded crossbeam channel.
//! `submit` blocks while the queue is full, so at most
//! `workers + queue_capacity` jobs exist at any time. Every submission gets
//! its own [`Task`] handle carrying the result back, which lets the caller
//! pair results with the entry that produced them regardless of completion
//! order.
//!
//! ```text
//! coordinator ──submit──▶ [ bounded job queue ] ──▶ probe-0 ┐
//!      ▲                                        ──▶ probe-1 ├─▶ per-task result
//!      └────────────────── Task::wait ◀─────────────────────┘
//! ```

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};
use thiserror::Error;
use tracing::trace;

use crate::error::LsError;

/// Hard upper bound on worker threads.
pub const MAX_WORKERS: usize = 64;

type Job = Box<dyn FnOnce() + Send + 'static>;

// ---------------------------------------------------------------------------
// PoolConfig
// ---------------------------------------------------------------------------

/// Sizing for a [`WorkerPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub workers:        usize,
    pub queue_capacity: usize,
}

impl PoolConfig {
    /// `workers` threads with a queue twice as deep.
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers,
            queue_capacity: workers * 2,
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::with_workers(default_workers())
    }
}

/// Four workers per logical core, capped at [`MAX_WORKERS`].
pub fn default_workers() -> usize {
    let cores = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);
    (cores * 4).min(MAX_WORKERS)
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("worker task panicked: {0}")]
    Panicked(String),

    #[error("worker task dropped before completion")]
    Dropped,
}

/// Handle to the eventual result of one submitted job.
pub struct Task<T> {
    result: Receiver<thread::Result<T>>,
}

impl<T> Task<T> {
    /// Block until the job has run and return its output.
    ///
    /// A panic inside the job is reported here as [`TaskError::Panicked`]
    /// and does not affect any other task.
    pub fn wait(self) -> Result<T, TaskError> {
        match self.result.recv() {
            Ok(Ok(value))    => Ok(value),
            Ok(Err(payload)) => Err(TaskError::Panicked(panic_message(payload))),
            Err(_)           => Err(TaskError::Dropped),
        }
    }
}

// ---------------------------------------------------------------------------
// WorkerPool
// ---------------------------------------------------------------------------

pub struct WorkerPool {
    sender:  Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn the worker threads.
    ///
    /// # Errors
    ///
    /// `InvalidThreadCount` for zero workers, `ThreadPool` if a thread
    /// cannot be spawned (already-started workers are drained and joined).
    pub fn new(config: PoolConfig) -> Result<Self, LsError> {
        if config.workers == 0 {
            return Err(LsError::InvalidThreadCount(0));
        }

        let (sender, receiver) = bounded::<Job>(config.queue_capacity);
        let mut pool = Self {
            sender:  Some(sender),
            workers: Vec::with_capacity(config.workers),
        };

        for id in 0..config.workers {
            let receiver = receiver.clone();
            let handle = thread::Builder::new()
                .name(format!("probe-{}", id))
                .spawn(move || worker_loop(receiver))
                .map_err(|e| LsError::ThreadPool(e.to_string()))?;
            pool.workers.push(handle);
        }

        trace!(workers = config.workers, queue = config.queue_capacity, "worker pool started");
        Ok(pool)
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.workers.len()
    }

    /// Queue `job` for execution, blocking while the queue is full.
    ///
    /// Every accepted job runs exactly once, even if the returned [`Task`]
    /// is dropped unread.
    pub fn submit<T, F>(&self, job: F) -> Result<Task<T>, LsError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| LsError::ThreadPool("pool is shut down".into()))?;

        let (tx, rx) = bounded(1);
        let wrapped: Job = Box::new(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(job));
            // The caller may have stopped listening; the job still ran.
            let _ = tx.send(outcome);
        });

        sender
            .send(wrapped)
            .map_err(|_| LsError::ThreadPool("all workers have exited".into()))?;
        Ok(Task { result: rx })
    }

    /// Stop accepting work, let the workers drain the queue, and join them.
    pub fn shutdown(mut self) {
        self.drain();
    }

    fn drain(&mut self) {
        // Closing the only sender ends each worker's loop once the queue is empty.
        self.sender.take();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
        trace!("worker pool stopped");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if self.sender.is_some() || !self.workers.is_empty() {
            self.drain();
        }
    }
}

fn worker_loop(jobs: Receiver<Job>) {
    for job in jobs.iter() {
        job();
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".into()
    }
}
