use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::sort::TimeSource;

/// Metadata for one filesystem object, as gathered by a single probe.
///
/// Records are built once by [`probe`](crate::probe::probe) and then moved
/// through the pipeline (reader, filter, sort, sink) without being shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord {
    /// Final path component. Never empty and never a full path.
    pub name: String,

    /// What kind of object this is. Device numbers live on the device variants.
    pub kind: EntryKind,

    /// Size in bytes.
    pub size: u64,

    /// Permission bits plus setuid/setgid/sticky (`mode & 0o7777`).
    pub mode: u32,

    pub modified: DateTime<Utc>,
    pub accessed: DateTime<Utc>,
    pub changed:  DateTime<Utc>,

    pub inode:  u64,
    /// Allocated 512-byte blocks.
    pub blocks: u64,
    pub links:  u64,
    pub uid:    u32,
    pub gid:    u32,

    /// Link target, present only for symlinks whose target could be read.
    pub symlink_target: Option<PathBuf>,

    /// Platform file flags (BSD `st_flags`), zero where unsupported.
    pub flags: u32,
}

/// The kind of a probed entry.
///
/// Exactly one variant holds per record. Device numbers are only carried by
/// the device variants, so they cannot be set on anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Regular,
    Directory,
    Symlink,
    CharDevice { major: u32, minor: u32 },
    BlockDevice { major: u32, minor: u32 },
    Fifo,
    Socket,
}

pub const S_ISUID: u32 = 0o4000;
pub const S_ISGID: u32 = 0o2000;
pub const S_ISVTX: u32 = 0o1000;

impl EntryKind {
    /// `(major, minor)` for device kinds.
    pub fn device(&self) -> Option<(u32, u32)> {
        match *self {
            Self::CharDevice { major, minor } | Self::BlockDevice { major, minor } => {
                Some((major, minor))
            }
            _ => None,
        }
    }

    pub fn major(&self) -> u32 {
        self.device().map(|(major, _)| major).unwrap_or(0)
    }

    pub fn minor(&self) -> u32 {
        self.device().map(|(_, minor)| minor).unwrap_or(0)
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Directory)
    }

    pub fn is_symlink(&self) -> bool {
        matches!(self, Self::Symlink)
    }
}

impl EntryRecord {
    /// The timestamp selected by `source`.
    pub fn timestamp(&self, source: TimeSource) -> DateTime<Utc> {
        match source {
            TimeSource::Modified => self.modified,
            TimeSource::Accessed => self.accessed,
            TimeSource::Changed  => self.changed,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }
}
