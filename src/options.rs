use crate::filter::Visibility;
use crate::probe::FollowLinks;
use crate::sort::{SortCriterion, TimeSource};

/// The flat option set the listing core consumes.
///
/// Fields map one-to-one to command-line flags; the methods below resolve
/// combinations of them into the single policy each stage needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// `-a`
    pub all:         bool,
    /// `-A`
    pub almost_all:  bool,
    /// `-f`: no sorting, implies `-a`.
    pub no_sort:     bool,
    /// `-r`
    pub reverse:     bool,
    /// `-S`
    pub size_sort:   bool,
    /// `-t`
    pub time_sort:   bool,
    /// `-u`
    pub access_time: bool,
    /// `-c`
    pub change_time: bool,
    /// `-d`: directories are listed as plain entries.
    pub directory:   bool,
    /// `-R`
    pub recursive:   bool,
    /// `-L`: follow symlinks given as arguments.
    pub follow:      bool,
}

impl ListOptions {
    pub fn visibility(&self) -> Visibility {
        if self.all || self.no_sort {
            Visibility::All
        } else if self.almost_all {
            Visibility::AlmostAll
        } else {
            Visibility::Default
        }
    }

    pub fn time_source(&self) -> TimeSource {
        if self.access_time {
            TimeSource::Accessed
        } else if self.change_time {
            TimeSource::Changed
        } else {
            TimeSource::Modified
        }
    }

    pub fn sort_criterion(&self) -> SortCriterion {
        SortCriterion::resolve(self.no_sort, self.size_sort, self.time_sort, self.time_source())
    }

    /// Link policy for root arguments. Directory children are never followed.
    pub fn follow_links(&self) -> FollowLinks {
        if self.follow {
            FollowLinks::Always
        } else {
            FollowLinks::Never
        }
    }
}
