use std::cmp::Ordering;

use crate::entry::EntryRecord;

/// Which timestamp a time sort (and long listing) uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeSource {
    #[default]
    Modified,
    Accessed,
    Changed,
}

/// The single ordering applied to a set of entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortCriterion {
    /// Keep enumeration order; no sorting step runs at all.
    Unsorted,
    /// Largest first.
    Size,
    /// Newest first.
    Time(TimeSource),
    /// Case-insensitive ascending.
    #[default]
    Name,
}

impl SortCriterion {
    /// Pick one criterion from the requested ones.
    ///
    /// Precedence is unsorted, then size, then time, then name.
    pub fn resolve(unsorted: bool, by_size: bool, by_time: bool, source: TimeSource) -> Self {
        if unsorted {
            Self::Unsorted
        } else if by_size {
            Self::Size
        } else if by_time {
            Self::Time(source)
        } else {
            Self::Name
        }
    }

    fn compare(self, a: &EntryRecord, b: &EntryRecord) -> Ordering {
        match self {
            Self::Unsorted     => Ordering::Equal,
            Self::Size         => b.size.cmp(&a.size),
            Self::Time(source) => b.timestamp(source).cmp(&a.timestamp(source)),
            Self::Name         => compare_names(&a.name, &b.name),
        }
    }
}

/// Order a complete entry set.
///
/// The sort is stable, so equal keys keep their input order, and `reverse`
/// flips the comparator rather than the output. `Unsorted` returns the
/// input untouched, `reverse` included.
pub fn order(entries: Vec<EntryRecord>, criterion: SortCriterion, reverse: bool) -> Vec<EntryRecord> {
    order_by(entries, |entry| entry, criterion, reverse)
}

/// [`order`] for items that carry a record, such as root arguments.
pub(crate) fn order_by<T, F>(mut items: Vec<T>, record: F, criterion: SortCriterion, reverse: bool) -> Vec<T>
where
    F: Fn(&T) -> &EntryRecord,
{
    if criterion == SortCriterion::Unsorted {
        return items;
    }

    items.sort_by(|a, b| {
        let ord = criterion.compare(record(a), record(b));
        if reverse { ord.reverse() } else { ord }
    });
    items
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}
