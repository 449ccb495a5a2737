use std::path::PathBuf;

use tracing::warn;

use crate::engine::{run, EngineOptions};
use crate::error::LsError;
use crate::options::ListOptions;
use crate::pool::{default_workers, PoolConfig, WorkerPool, MAX_WORKERS};
use crate::reader::DEFAULT_BATCH_SIZE;
use crate::results::Report;
use crate::traits::SectionSink;

// ---------------------------------------------------------------------------
// ListBuilder
// ---------------------------------------------------------------------------

/// Entry point for configuring and executing a listing.
///
/// Created via [`parls::list()`](crate::list). Configure with chained
/// builder methods, then call [`run()`](ListBuilder::run) to execute.
///
/// # Example
///
/// ```rust,ignore
/// let mut sections: Vec<parls::Section> = Vec::new();
/// let report = parls::list()
///     .options(ListOptions { recursive: true, ..Default::default() })
///     .threads(8)
///     .run(&[PathBuf::from(".")], &mut sections)?;
/// ```
pub struct ListBuilder {
    options:        ListOptions,
    threads:        usize,
    queue_capacity: Option<usize>,
    batch_size:     usize,
}

impl Default for ListBuilder {
    fn default() -> Self {
        Self {
            options:        ListOptions::default(),
            threads:        default_workers(),
            queue_capacity: None,
            batch_size:     DEFAULT_BATCH_SIZE,
        }
    }
}

impl ListBuilder {
    // ── Policy ────────────────────────────────────────────────────────────

    /// Set the filter, sort and traversal flags.
    pub fn options(mut self, options: ListOptions) -> Self {
        self.options = options;
        self
    }

    // ── Resources ─────────────────────────────────────────────────────────

    /// Number of probe worker threads.
    ///
    /// Defaults to four per logical core. Values above 64 are clamped.
    pub fn threads(mut self, n: usize) -> Self {
        self.threads = n;
        self
    }

    /// Probes that may wait in the queue beyond those running.
    /// Defaults to twice the thread count.
    pub fn queue_capacity(mut self, n: usize) -> Self {
        self.queue_capacity = Some(n);
        self
    }

    /// Directory entries read and probed per batch. Default 1000.
    pub fn batch_size(mut self, n: usize) -> Self {
        self.batch_size = n.max(1);
        self
    }

    // ── Execute ───────────────────────────────────────────────────────────

    /// List `roots` (the current directory when empty) into `sink`.
    ///
    /// Blocks until every section has been emitted and the worker pool
    /// has drained.
    ///
    /// # Errors
    ///
    /// Returns `Err` for fatal failures: a zero thread count, a worker pool
    /// that cannot start, or a sink write error. Failures on individual
    /// paths are collected into [`Report::errors`] instead.
    pub fn run(self, roots: &[PathBuf], sink: &mut dyn SectionSink) -> Result<Report, LsError> {
        if self.threads == 0 {
            return Err(LsError::InvalidThreadCount(0));
        }
        let workers = if self.threads > MAX_WORKERS {
            warn!(requested = self.threads, max = MAX_WORKERS, "clamping thread count");
            MAX_WORKERS
        } else {
            self.threads
        };

        let pool = WorkerPool::new(PoolConfig {
            workers,
            queue_capacity: self.queue_capacity.unwrap_or(workers * 2),
        })?;

        let default_root = [PathBuf::from(".")];
        let roots = if roots.is_empty() { &default_root[..] } else { roots };

        let opts = EngineOptions {
            options:    self.options,
            batch_size: self.batch_size,
        };

        let report = run(roots, &opts, &pool, sink)?;
        pool.shutdown();
        Ok(report)
    }
}
