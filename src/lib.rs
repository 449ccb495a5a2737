//! # parls
//!
//! Directory listing with parallel metadata collection.
//!
//! parls owns the listing pipeline: probing paths, reading directories with
//! a bounded pool of probe workers, filtering hidden names, ordering
//! entries, and walking roots and subdirectories in `ls` order. It does
//! **not** own output formatting; sections are handed to a
//! [`SectionSink`] supplied by the caller.
//!
//! # Quick Start
//!
//! ```rust
//! use std::path::PathBuf;
//! use parls::{ListOptions, Section};
//!
//! let dir = std::env::temp_dir();
//! let mut sections: Vec<Section> = Vec::new();
//!
//! let report = parls::list()
//!     .options(ListOptions { almost_all: true, ..Default::default() })
//!     .threads(4)
//!     .run(&[dir], &mut sections)
//!     .unwrap();
//!
//! assert_eq!(sections.len(), 1);
//! println!("{} entries in {:.3}s",
//!     report.stats.entries,
//!     report.stats.duration.as_secs_f64()
//! );
//! ```
//!
//! # Building blocks
//!
//! The stages are usable on their own:
//!
//! ```rust
//! use parls::{probe, FollowLinks, EntryKind};
//!
//! let record = probe(std::path::Path::new("/"), FollowLinks::Never).unwrap();
//! assert_eq!(record.kind, EntryKind::Directory);
//! ```

#![forbid(unsafe_code)]

pub mod pool;

mod builder;
mod engine;
mod entry;
mod error;
mod filter;
mod options;
mod probe;
mod reader;
mod results;
mod sort;
mod traits;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::ListBuilder;
pub use entry::{EntryKind, EntryRecord, S_ISGID, S_ISUID, S_ISVTX};
pub use error::LsError;
pub use filter::{include, Visibility};
pub use options::ListOptions;
pub use pool::{PoolConfig, Task, TaskError, WorkerPool};
pub use probe::{probe, split_device, FollowLinks};
pub use reader::{DirListing, DirectoryReader, DEFAULT_BATCH_SIZE};
pub use results::{Report, ScanStats, Section};
pub use sort::{order, SortCriterion, TimeSource};
pub use traits::SectionSink;

// ── Entry point ───────────────────────────────────────────────────────────────

/// Create a new [`ListBuilder`] to configure and run a listing.
///
/// # Example
///
/// ```rust
/// use parls::{ListOptions, Section};
///
/// let mut sections: Vec<Section> = Vec::new();
/// let report = parls::list()
///     .options(ListOptions { directory: true, ..Default::default() })
///     .run(&[".".into()], &mut sections)
///     .unwrap();
///
/// assert!(report.succeeded());
/// assert_eq!(sections[0].entries[0].name, ".");
/// ```
pub fn list() -> ListBuilder {
    ListBuilder::default()
}
