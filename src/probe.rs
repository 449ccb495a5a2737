use std::borrow::Cow;
use std::fs::{self, Metadata};
use std::os::unix::fs::{FileTypeExt, MetadataExt};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::entry::{EntryKind, EntryRecord};
use crate::error::LsError;

/// Whether a probe reports a symlink's own attributes or its target's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FollowLinks {
    /// `lstat`: the link itself.
    #[default]
    Never,
    /// `stat`: whatever the link resolves to.
    Always,
}

/// Gather the metadata of `path` into an [`EntryRecord`].
///
/// One attribute query is issued, plus `readlink` and a resolving `stat`
/// for symlinks. A dangling or unreadable link still probes successfully
/// with `symlink_target` left empty.
///
/// Side-effect free and safe to call concurrently on any paths.
pub fn probe(path: &Path, follow: FollowLinks) -> Result<EntryRecord, LsError> {
    let meta = match follow {
        FollowLinks::Never  => fs::symlink_metadata(path),
        FollowLinks::Always => fs::metadata(path),
    }
    .map_err(|e| LsError::from_io(path, e))?;

    let kind = classify(&meta);
    let symlink_target = if kind.is_symlink() {
        match read_target(path) {
            Ok(target) => Some(target),
            Err(err) => {
                debug!(error = %err, "symlink target unavailable");
                None
            }
        }
    } else {
        None
    };

    Ok(EntryRecord {
        name: entry_name(path).into_owned(),
        kind,
        size: meta.size(),
        mode: meta.mode() & 0o7777,
        modified: timestamp(meta.mtime(), meta.mtime_nsec()),
        accessed: timestamp(meta.atime(), meta.atime_nsec()),
        changed:  timestamp(meta.ctime(), meta.ctime_nsec()),
        inode:  meta.ino(),
        blocks: meta.blocks(),
        links:  meta.nlink(),
        uid:    meta.uid(),
        gid:    meta.gid(),
        symlink_target,
        flags: platform_flags(&meta),
    })
}

/// Split a raw device id with the 8-bit major/minor layout listings expect.
pub fn split_device(rdev: u64) -> (u32, u32) {
    ((rdev >> 8) as u32, (rdev & 0xff) as u32)
}

fn classify(meta: &Metadata) -> EntryKind {
    let ft = meta.file_type();
    if ft.is_dir() {
        EntryKind::Directory
    } else if ft.is_symlink() {
        EntryKind::Symlink
    } else if ft.is_char_device() {
        let (major, minor) = split_device(meta.rdev());
        EntryKind::CharDevice { major, minor }
    } else if ft.is_block_device() {
        let (major, minor) = split_device(meta.rdev());
        EntryKind::BlockDevice { major, minor }
    } else if ft.is_fifo() {
        EntryKind::Fifo
    } else if ft.is_socket() {
        EntryKind::Socket
    } else {
        EntryKind::Regular
    }
}

/// The link text, provided the link also resolves to an existing object.
fn read_target(path: &Path) -> Result<PathBuf, LsError> {
    let unresolved = |source| LsError::LinkUnresolved {
        path: path.to_path_buf(),
        source,
    };
    let target = fs::read_link(path).map_err(unresolved)?;
    fs::metadata(path).map_err(unresolved)?;
    Ok(target)
}

/// Last component of `path`, including `.`, `..` and `/`.
fn entry_name(path: &Path) -> Cow<'_, str> {
    match path.components().next_back() {
        Some(last) => last.as_os_str().to_string_lossy(),
        None       => path.as_os_str().to_string_lossy(),
    }
}

fn timestamp(secs: i64, nsecs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, nsecs.clamp(0, 999_999_999) as u32).unwrap_or_default()
}

#[cfg(target_os = "macos")]
fn platform_flags(meta: &Metadata) -> u32 {
    std::os::macos::fs::MetadataExt::st_flags(meta)
}

#[cfg(target_os = "freebsd")]
fn platform_flags(meta: &Metadata) -> u32 {
    std::os::freebsd::fs::MetadataExt::st_flags(meta)
}

#[cfg(not(any(target_os = "macos", target_os = "freebsd")))]
fn platform_flags(_meta: &Metadata) -> u32 {
    0
}
