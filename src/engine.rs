use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::debug;

use crate::entry::EntryRecord;
use crate::error::LsError;
use crate::options::ListOptions;
use crate::pool::WorkerPool;
use crate::probe::probe;
use crate::reader::DirectoryReader;
use crate::results::{Report, ScanStats, Section};
use crate::sort::{order, order_by};
use crate::traits::SectionSink;

// ---------------------------------------------------------------------------
// Engine options
// ---------------------------------------------------------------------------

/// Internal options passed from the builder to `run()`.
pub(crate) struct EngineOptions {
    pub options:    ListOptions,
    pub batch_size: usize,
}

/// A root argument together with its probe.
struct Root {
    arg:    PathBuf,
    record: EntryRecord,
}

/// A directory waiting to be listed.
struct PendingDir {
    path:  PathBuf,
    label: String,
}

// ---------------------------------------------------------------------------
// run()
// ---------------------------------------------------------------------------

/// List `roots` into `sink`.
///
/// Phases, in order:
/// 1. probe every root and split directories from everything else
///    (`-d` puts directories with everything else);
/// 2. emit the non-directory bucket once, sorted;
/// 3. list directory roots in sorted order from an explicit stack; with
///    recursion, each listed directory pushes its visible subdirectories
///    so they are visited depth-first in display order.
///
/// Per-path failures go to `sink.error()` and the report; only pool and
/// output failures end the run early.
pub(crate) fn run(
    roots: &[PathBuf],
    opts: &EngineOptions,
    pool: &WorkerPool,
    sink: &mut dyn SectionSink,
) -> Result<Report, LsError> {
    let start = Instant::now();
    let options = &opts.options;
    let criterion = options.sort_criterion();
    let visibility = options.visibility();

    let mut out = Emitter::new(sink);

    // ClassifyRoots
    let (files, dirs) = classify_roots(roots, options, pool, &mut out)?;

    // EmitNonDirectories
    if !files.is_empty() {
        let files = order_by(files, |root| &root.record, criterion, options.reverse);
        out.emit(Section {
            label:       None,
            show_header: false,
            entries:     files.into_iter().map(|root| root.record).collect(),
        })?;
    }

    // EmitDirectory / RecurseChildren
    let show_header = roots.len() > 1 || options.recursive;
    let reader = DirectoryReader::new(pool, opts.batch_size);

    let dirs = order_by(dirs, |root| &root.record, criterion, options.reverse);
    let mut stack: Vec<PendingDir> = dirs
        .into_iter()
        .rev()
        .map(|root| PendingDir {
            label: root.arg.display().to_string(),
            path:  root.arg,
        })
        .collect();

    while let Some(dir) = stack.pop() {
        let listing = match reader.read(&dir.path) {
            Ok(listing) => listing,
            Err(err) => {
                out.fail(err)?;
                continue;
            }
        };
        out.dirs += 1;

        for err in listing.errors {
            out.fail(err)?;
        }

        let visible = listing
            .entries
            .into_iter()
            .filter(|entry| visibility.include(&entry.name))
            .collect();
        let entries = order(visible, criterion, options.reverse);

        if options.recursive {
            let children: Vec<PendingDir> = entries
                .iter()
                .filter(|entry| entry.is_dir() && visibility.descends(&entry.name))
                .map(|entry| PendingDir {
                    path:  dir.path.join(&entry.name),
                    label: child_label(&dir.label, &entry.name),
                })
                .collect();
            stack.extend(children.into_iter().rev());
        }

        out.emit(Section {
            label: Some(dir.label),
            show_header,
            entries,
        })?;
    }

    let duration = start.elapsed();
    debug!(
        sections = out.sections,
        entries = out.entries,
        dirs = out.dirs,
        workers = pool.workers(),
        errors = out.errors.len(),
        ms = duration.as_millis() as u64,
        "listing complete"
    );

    Ok(Report {
        stats:  ScanStats::compute(out.sections, out.entries, out.dirs, pool.workers(), duration),
        errors: out.errors,
    })
}

/// Probe all roots on the pool and bucket them.
fn classify_roots(
    roots: &[PathBuf],
    options: &ListOptions,
    pool: &WorkerPool,
    out: &mut Emitter<'_>,
) -> Result<(Vec<Root>, Vec<Root>), LsError> {
    let follow = options.follow_links();
    debug!(roots = roots.len(), ?follow, "classifying roots");

    let mut pending = Vec::with_capacity(roots.len());
    for arg in roots {
        let path = arg.clone();
        let task = pool.submit(move || probe(&path, follow))?;
        pending.push((arg.clone(), task));
    }

    let mut files = Vec::new();
    let mut dirs = Vec::new();
    for (arg, task) in pending {
        match task.wait() {
            Ok(Ok(record)) => {
                let root = Root { arg, record };
                if root.record.is_dir() && !options.directory {
                    dirs.push(root);
                } else {
                    files.push(root);
                }
            }
            Ok(Err(err))   => out.fail(err)?,
            Err(source)    => out.fail(LsError::Task { path: arg, source })?,
        }
    }
    Ok((files, dirs))
}

fn child_label(parent: &str, name: &str) -> String {
    Path::new(parent).join(name).display().to_string()
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Sink wrapper that keeps the counters and the error log.
struct Emitter<'s> {
    sink:     &'s mut dyn SectionSink,
    errors:   Vec<LsError>,
    sections: usize,
    entries:  usize,
    dirs:     usize,
}

impl<'s> Emitter<'s> {
    fn new(sink: &'s mut dyn SectionSink) -> Self {
        Self {
            sink,
            errors:   Vec::new(),
            sections: 0,
            entries:  0,
            dirs:     0,
        }
    }

    fn emit(&mut self, section: Section) -> Result<(), LsError> {
        self.sections += 1;
        self.entries += section.entries.len();
        self.sink.section(section).map_err(LsError::Output)
    }

    /// Report a per-path failure, or hand back one that must end the run.
    fn fail(&mut self, err: LsError) -> Result<(), LsError> {
        if !err.is_recoverable() {
            return Err(err);
        }
        debug!(error = %err, "path skipped");
        self.sink.error(&err);
        self.errors.push(err);
        Ok(())
    }
}
