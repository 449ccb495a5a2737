use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::entry::EntryRecord;
use crate::error::LsError;
use crate::pool::{Task, WorkerPool};
use crate::probe::{probe, FollowLinks};

/// Entries read per batch before their probes are awaited.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Everything learned from reading one directory.
#[derive(Debug, Default)]
pub struct DirListing {
    /// Successfully probed children, in no particular order.
    pub entries: Vec<EntryRecord>,

    /// Children whose probe failed. They are absent from `entries`.
    pub errors: Vec<LsError>,
}

/// Reads directories, probing every child on a shared [`WorkerPool`].
///
/// Names are pulled from the OS in batches of `batch_size`; each batch is
/// probed in parallel and fully collected before the next is read, which
/// caps in-flight work for very large directories.
pub struct DirectoryReader<'p> {
    pool:       &'p WorkerPool,
    batch_size: usize,
}

impl<'p> DirectoryReader<'p> {
    pub fn new(pool: &'p WorkerPool, batch_size: usize) -> Self {
        Self {
            pool,
            batch_size: batch_size.max(1),
        }
    }

    /// Read every child of `dir`.
    ///
    /// # Errors
    ///
    /// Failing to open or enumerate `dir` fails the whole read. A child
    /// that fails to probe is recorded in [`DirListing::errors`] instead.
    pub fn read(&self, dir: &Path) -> Result<DirListing, LsError> {
        let mut names = fs::read_dir(dir).map_err(|e| LsError::from_io(dir, e))?;
        let mut listing = DirListing::default();
        let mut batch: Vec<PathBuf> = Vec::with_capacity(self.batch_size);

        loop {
            for item in names.by_ref().take(self.batch_size) {
                let item = item.map_err(|e| LsError::from_io(dir, e))?;
                batch.push(item.path());
            }
            if batch.is_empty() {
                break;
            }

            debug!(dir = %dir.display(), batch = batch.len(), "probing batch");
            self.probe_batch(&mut batch, &mut listing)?;
        }

        Ok(listing)
    }

    /// Submit one probe per path, then wait for all of them.
    fn probe_batch(&self, batch: &mut Vec<PathBuf>, listing: &mut DirListing) -> Result<(), LsError> {
        let mut pending: Vec<(PathBuf, Task<Result<EntryRecord, LsError>>)> =
            Vec::with_capacity(batch.len());

        for path in batch.drain(..) {
            let job_path = path.clone();
            let task = self.pool.submit(move || probe(&job_path, FollowLinks::Never))?;
            pending.push((path, task));
        }

        for (path, task) in pending {
            match task.wait() {
                Ok(Ok(record)) => listing.entries.push(record),
                Ok(Err(err)) => {
                    debug!(error = %err, "probe failed");
                    listing.errors.push(err);
                }
                Err(source) => {
                    let err = LsError::Task { path, source };
                    debug!(error = %err, "probe task failed");
                    listing.errors.push(err);
                }
            }
        }
        Ok(())
    }
}
