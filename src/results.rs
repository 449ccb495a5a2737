use std::time::Duration;

use crate::entry::EntryRecord;
use crate::error::LsError;

/// One display unit: a filtered, ordered listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Directory path as it should be printed, `None` for the bucket of
    /// non-directory arguments.
    pub label: Option<String>,

    /// Whether a `label:` header precedes the entries.
    pub show_header: bool,

    /// Entries in final display order.
    pub entries: Vec<EntryRecord>,
}

impl Section {
    /// Whether this section lists a directory's contents.
    pub fn is_directory(&self) -> bool {
        self.label.is_some()
    }
}

/// The outcome of a completed listing.
pub struct Report {
    /// Every per-path failure, in the order it was reported.
    /// Use [`LsError::path`] to attribute them.
    pub errors: Vec<LsError>,

    pub stats: ScanStats,
}

impl Report {
    /// True when every requested path was listed.
    pub fn succeeded(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Counters for a completed listing.
pub struct ScanStats {
    /// Sections handed to the sink.
    pub sections: usize,

    /// Entries across all emitted sections.
    pub entries: usize,

    /// Directories successfully read.
    pub dirs: usize,

    /// Probe worker threads the listing ran with.
    pub workers: usize,

    /// Wall-clock time from start to pool shutdown.
    pub duration: Duration,

    /// Emitted entries per second, 0 on zero-duration runs.
    pub entries_per_sec: usize,
}

impl ScanStats {
    pub(crate) fn compute(
        sections: usize,
        entries: usize,
        dirs: usize,
        workers: usize,
        duration: Duration,
    ) -> Self {
        let eps = if duration.as_secs_f64() > 0.0 {
            (entries as f64 / duration.as_secs_f64()) as usize
        } else {
            0
        };
        Self {
            sections,
            entries,
            dirs,
            workers,
            duration,
            entries_per_sec: eps,
        }
    }
}
