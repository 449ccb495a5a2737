use chrono::{DateTime, TimeZone, Utc};

use parls::{include, order, EntryKind, EntryRecord, ListOptions, SortCriterion, TimeSource, Visibility};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

fn entry(name: &str, size: u64, mtime: i64) -> EntryRecord {
    EntryRecord {
        name: name.into(),
        kind: EntryKind::Regular,
        size,
        mode: 0o644,
        modified: at(mtime),
        accessed: at(mtime + 5),
        changed:  at(1_000 - mtime),
        inode:  0,
        blocks: 0,
        links:  1,
        uid:    0,
        gid:    0,
        symlink_target: None,
        flags: 0,
    }
}

fn names(entries: &[EntryRecord]) -> Vec<&str> {
    entries.iter().map(|e| e.name.as_str()).collect()
}

/// Several size and time ties, in a deliberately unsorted input order.
fn sample() -> Vec<EntryRecord> {
    vec![
        entry("delta", 10, 300),
        entry("Alpha", 30, 100),
        entry("charlie", 10, 300),
        entry("bravo", 20, 200),
        entry("echo", 10, 100),
    ]
}

const CRITERIA: [SortCriterion; 6] = [
    SortCriterion::Unsorted,
    SortCriterion::Size,
    SortCriterion::Time(TimeSource::Modified),
    SortCriterion::Time(TimeSource::Accessed),
    SortCriterion::Time(TimeSource::Changed),
    SortCriterion::Name,
];

// ---------------------------------------------------------------------------
// Sort policy
// ---------------------------------------------------------------------------

#[test]
fn name_order_ignores_case() {
    let sorted = order(sample(), SortCriterion::Name, false);
    assert_eq!(names(&sorted), ["Alpha", "bravo", "charlie", "delta", "echo"]);
}

#[test]
fn reverse_applies_to_default_name_order() {
    let sorted = order(sample(), SortCriterion::Name, true);
    assert_eq!(names(&sorted), ["echo", "delta", "charlie", "bravo", "Alpha"]);
}

#[test]
fn size_ties_keep_input_order() {
    let sorted = order(sample(), SortCriterion::Size, false);
    assert_eq!(names(&sorted), ["Alpha", "bravo", "delta", "charlie", "echo"]);
}

#[test]
fn reversed_ties_still_keep_input_order() {
    let sorted = order(sample(), SortCriterion::Size, true);
    assert_eq!(names(&sorted), ["delta", "charlie", "echo", "bravo", "Alpha"]);
}

#[test]
fn time_sources_select_different_timestamps() {
    let modified = order(sample(), SortCriterion::Time(TimeSource::Modified), false);
    assert_eq!(names(&modified), ["delta", "charlie", "bravo", "Alpha", "echo"]);

    // Change times run opposite to modification times in the sample.
    let changed = order(sample(), SortCriterion::Time(TimeSource::Changed), false);
    assert_eq!(names(&changed), ["Alpha", "echo", "bravo", "delta", "charlie"]);
}

#[test]
fn unsorted_is_untouched_even_when_reversed() {
    let input = sample();
    let expected = names(&input).iter().map(|s| s.to_string()).collect::<Vec<_>>();
    let out = order(input, SortCriterion::Unsorted, true);
    assert_eq!(names(&out), expected);
}

#[test]
fn ordering_is_idempotent() {
    for criterion in CRITERIA {
        for reverse in [false, true] {
            let once = order(sample(), criterion, reverse);
            let twice = order(once.clone(), criterion, reverse);
            assert_eq!(once, twice, "{:?} reverse={}", criterion, reverse);
        }
    }
}

#[test]
fn reversing_twice_restores_order() {
    for criterion in CRITERIA {
        let forward = order(sample(), criterion, false);
        let back = order(order(forward.clone(), criterion, true), criterion, false);
        assert_eq!(forward, back, "{:?}", criterion);
    }
}

#[test]
fn criterion_precedence() {
    let src = TimeSource::Accessed;
    assert_eq!(SortCriterion::resolve(true, true, true, src), SortCriterion::Unsorted);
    assert_eq!(SortCriterion::resolve(false, true, true, src), SortCriterion::Size);
    assert_eq!(SortCriterion::resolve(false, false, true, src), SortCriterion::Time(src));
    assert_eq!(SortCriterion::resolve(false, false, false, src), SortCriterion::Name);
}

#[test]
fn options_resolve_time_source() {
    let both = ListOptions { access_time: true, change_time: true, ..Default::default() };
    assert_eq!(both.time_source(), TimeSource::Accessed);

    let change = ListOptions { change_time: true, time_sort: true, ..Default::default() };
    assert_eq!(change.sort_criterion(), SortCriterion::Time(TimeSource::Changed));

    assert_eq!(ListOptions::default().sort_criterion(), SortCriterion::Name);
}

// ---------------------------------------------------------------------------
// Filter policy
// ---------------------------------------------------------------------------

#[test]
fn default_filter_hides_dot_names() {
    let opts = ListOptions::default();
    assert!(!include(".", &opts));
    assert!(!include("..", &opts));
    assert!(!include(".hidden", &opts));
    assert!(include("visible", &opts));
}

#[test]
fn almost_all_hides_only_dot_links() {
    let opts = ListOptions { almost_all: true, ..Default::default() };
    assert!(!include(".", &opts));
    assert!(!include("..", &opts));
    assert!(include(".hidden", &opts));
    assert!(include("...", &opts));
}

#[test]
fn all_includes_everything() {
    let opts = ListOptions { all: true, almost_all: true, ..Default::default() };
    assert!(include(".", &opts));
    assert!(include("..", &opts));
    assert!(include(".hidden", &opts));
}

#[test]
fn no_sort_forces_all() {
    let opts = ListOptions { no_sort: true, ..Default::default() };
    assert_eq!(opts.visibility(), Visibility::All);
    assert!(include(".hidden", &opts));
    assert!(include("..", &opts));
}

#[test]
fn descent_skips_dot_links_and_hidden_unless_all() {
    assert!(!Visibility::All.descends("."));
    assert!(!Visibility::All.descends(".."));
    assert!(Visibility::All.descends(".git"));
    assert!(!Visibility::AlmostAll.descends(".git"));
    assert!(Visibility::Default.descends("src"));
}
