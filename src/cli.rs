//! Command-line flags.
//!
//! Every option is a single character and they combine (`-laR`). `-h`
//! selects human-readable sizes, so help is only reachable as `--help`.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use parls::ListOptions;

use crate::render::{DisplayOptions, Layout};

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "parls",
    version,
    about = "List directory contents",
    long_about = "Lists files and directories. Metadata for directory entries is \
                  gathered in parallel by a bounded pool of worker threads.",
    after_help = "EXAMPLES:\n    \
        parls -l\n    \
        parls -a\n    \
        parls -S\n    \
        parls -lh /var/log",
    disable_help_flag = true,
    disable_version_flag = true,
    args_override_self = true
)]
pub struct CliArgs {
    /// Force output to be one entry per line
    #[arg(short = '1')]
    pub one: bool,

    /// List all entries except for '.' and '..'
    #[arg(short = 'A')]
    pub almost_all: bool,

    /// Include directory entries whose names begin with a dot
    #[arg(short = 'a')]
    pub all: bool,

    /// Force multi-column output, sorted down the columns
    #[arg(short = 'C')]
    pub columns: bool,

    /// Use the time of last status change instead of modification
    #[arg(short = 'c')]
    pub change_time: bool,

    /// List directories as plain files (do not search them)
    #[arg(short = 'd')]
    pub directory: bool,

    /// Display an indicator after each name (*/=@|)
    #[arg(short = 'F')]
    pub classify: bool,

    /// Output is not sorted; implies -a
    #[arg(short = 'f')]
    pub no_sort: bool,

    /// Long format without the owner
    #[arg(short = 'g')]
    pub group_format: bool,

    /// Accepted for compatibility; no effect
    #[arg(short = 'H')]
    pub no_follow: bool,

    /// Human-readable sizes in long format
    #[arg(short = 'h')]
    pub human: bool,

    /// Print each file's inode number
    #[arg(short = 'i')]
    pub inode: bool,

    /// With -s, report sizes in kilobytes
    #[arg(short = 'k')]
    pub kilobytes: bool,

    /// Follow symbolic links given on the command line
    #[arg(short = 'L')]
    pub follow: bool,

    /// Long format
    #[arg(short = 'l')]
    pub long: bool,

    /// Stream format: names separated by commas
    #[arg(short = 'm')]
    pub stream: bool,

    /// Long format with numeric user and group ids
    #[arg(short = 'n')]
    pub numeric: bool,

    /// Include file flags in long format
    #[arg(short = 'o')]
    pub flags: bool,

    /// Append '/' to directory names
    #[arg(short = 'p')]
    pub slash: bool,

    /// Print non-graphic characters as '?'
    #[arg(short = 'q')]
    pub quote: bool,

    /// Recursively list subdirectories
    #[arg(short = 'R')]
    pub recursive: bool,

    /// Reverse the sort order
    #[arg(short = 'r')]
    pub reverse: bool,

    /// Sort by size, largest first
    #[arg(short = 'S')]
    pub size_sort: bool,

    /// Print allocated blocks for each file
    #[arg(short = 's')]
    pub blocks: bool,

    /// Show complete time information
    #[arg(short = 'T')]
    pub full_time: bool,

    /// Sort by time, newest first
    #[arg(short = 't')]
    pub time_sort: bool,

    /// Use the time of last access instead of modification
    #[arg(short = 'u')]
    pub access_time: bool,

    /// Multi-column output, sorted across the rows
    #[arg(short = 'x')]
    pub across: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,

    /// Files and directories to list (default: .)
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

impl CliArgs {
    /// The flags the listing core acts on.
    pub fn list_options(&self) -> ListOptions {
        ListOptions {
            all:         self.all || self.no_sort,
            almost_all:  self.almost_all,
            no_sort:     self.no_sort,
            reverse:     self.reverse,
            size_sort:   self.size_sort,
            time_sort:   self.time_sort,
            access_time: self.access_time,
            change_time: self.change_time,
            directory:   self.directory,
            recursive:   self.recursive,
            follow:      self.follow,
        }
    }

    /// The flags the renderer acts on.
    pub fn display_options(&self) -> DisplayOptions {
        let long = self.long || self.group_format || self.numeric;
        let layout = if long {
            Layout::Long
        } else if self.stream {
            Layout::Stream
        } else if self.columns && !self.one {
            Layout::Down
        } else if self.across && !self.one {
            Layout::Across
        } else {
            Layout::Simple
        };

        DisplayOptions {
            layout,
            hide_owner: self.group_format,
            numeric:    self.numeric,
            flags:      self.flags,
            inode:      self.inode,
            blocks:     self.blocks,
            kilobytes:  self.kilobytes,
            human:      self.human,
            full_time:  self.full_time,
            classify:   self.classify,
            slash:      self.slash,
            quote:      self.quote,
            time_source: self.list_options().time_source(),
        }
    }
}
