//! Text rendering of listing sections.

use std::io::{self, Write};

use chrono::{DateTime, Duration, Local, Utc};
use parls::{EntryKind, EntryRecord, LsError, Section, SectionSink, TimeSource, S_ISGID, S_ISUID, S_ISVTX};

use crate::names::NameCache;

const BLOCK_SIZE: u64 = 512;
const COLUMNS: usize = 4;
const COLUMN_WIDTH: usize = 20;

/// Output shape, one per listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// One name per line.
    #[default]
    Simple,
    /// `-l`
    Long,
    /// `-m`
    Stream,
    /// `-C`: fixed-width columns, filled top to bottom.
    Down,
    /// `-x`: fixed-width columns, filled left to right.
    Across,
}

#[derive(Debug, Clone, Default)]
pub struct DisplayOptions {
    pub layout:      Layout,
    pub hide_owner:  bool,
    pub numeric:     bool,
    pub flags:       bool,
    pub inode:       bool,
    pub blocks:      bool,
    pub kilobytes:   bool,
    pub human:       bool,
    pub full_time:   bool,
    pub classify:    bool,
    pub slash:       bool,
    pub quote:       bool,
    pub time_source: TimeSource,
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Writes sections as `ls` text to `out` and failures to `err`.
pub struct Renderer<W: Write, E: Write> {
    out:     W,
    err:     E,
    opts:    DisplayOptions,
    names:   NameCache,
    now:     DateTime<Utc>,
    printed: bool,
}

impl<W: Write, E: Write> Renderer<W, E> {
    pub fn new(out: W, err: E, opts: DisplayOptions, names: NameCache) -> Self {
        Self {
            out,
            err,
            opts,
            names,
            now: Utc::now(),
            printed: false,
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn write_section(&mut self, section: &Section) -> io::Result<()> {
        if section.show_header {
            if let Some(label) = &section.label {
                if self.printed {
                    writeln!(self.out)?;
                }
                writeln!(self.out, "{}:", label)?;
            }
        }

        match self.opts.layout {
            Layout::Long   => self.write_long(section)?,
            Layout::Stream => self.write_stream(&section.entries)?,
            Layout::Down   => self.write_columns(&section.entries, false)?,
            Layout::Across => self.write_columns(&section.entries, true)?,
            Layout::Simple => self.write_simple(&section.entries)?,
        }
        self.printed = true;
        Ok(())
    }

    fn write_long(&mut self, section: &Section) -> io::Result<()> {
        if section.is_directory() && !section.entries.is_empty() {
            let total: u64 = section.entries.iter().map(|e| e.blocks).sum();
            writeln!(self.out, "total {}", self.scale_blocks(total))?;
        }
        for entry in &section.entries {
            let line = self.long_line(entry);
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }

    fn long_line(&self, entry: &EntryRecord) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(10);
        let opts = &self.opts;

        if opts.inode {
            parts.push(format!("{:8}", entry.inode));
        }
        if opts.blocks {
            parts.push(format!("{:6}", self.scale_blocks(entry.blocks)));
        }
        parts.push(mode_string(entry));
        parts.push(format!("{:3}", entry.links));

        if !opts.hide_owner {
            if opts.numeric {
                parts.push(format!("{:<8}", entry.uid));
            } else {
                parts.push(format!("{:<8}", self.names.user(entry.uid)));
            }
        }
        if opts.numeric {
            parts.push(format!("{:<8}", entry.gid));
        } else {
            parts.push(format!("{:<8}", self.names.group(entry.gid)));
        }

        if opts.flags {
            parts.push(flags_string(entry.flags));
        }

        match entry.kind.device() {
            Some((major, minor)) => parts.push(format!("{:3}, {:3}", major, minor)),
            None => parts.push(format!("{:>8}", size_string(entry.size, opts.human))),
        }

        parts.push(time_string(entry.timestamp(opts.time_source), self.now, opts.full_time));

        let mut name = self.display_name(entry);
        if let Some(target) = &entry.symlink_target {
            name.push_str(" -> ");
            name.push_str(&target.to_string_lossy());
        }
        parts.push(name);

        parts.join(" ")
    }

    fn write_stream(&mut self, entries: &[EntryRecord]) -> io::Result<()> {
        let names: Vec<String> = entries
            .iter()
            .map(|e| {
                let mut name = e.name.clone();
                if self.opts.classify {
                    name.push_str(classify_suffix(e));
                }
                name
            })
            .collect();
        writeln!(self.out, "{}", names.join(", "))
    }

    fn write_columns(&mut self, entries: &[EntryRecord], across: bool) -> io::Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let cells: Vec<String> = entries.iter().map(|e| self.column_cell(e)).collect();
        let rows = cells.len().div_ceil(COLUMNS);

        for row in 0..rows {
            let mut line = String::new();
            for col in 0..COLUMNS {
                let idx = if across { row * COLUMNS + col } else { col * rows + row };
                if let Some(cell) = cells.get(idx) {
                    line.push_str(&format!("{:<width$}", cell, width = COLUMN_WIDTH));
                }
            }
            writeln!(self.out, "{}", line.trim_end())?;
        }
        Ok(())
    }

    fn column_cell(&self, entry: &EntryRecord) -> String {
        let mut cell = entry.name.clone();
        if self.opts.classify {
            cell.push_str(classify_suffix(entry));
        }
        if self.opts.inode {
            cell = format!("{:8} {}", entry.inode, cell);
        }
        if self.opts.blocks {
            cell = format!("{:6} {}", self.scale_blocks(entry.blocks), cell);
        }
        cell
    }

    fn write_simple(&mut self, entries: &[EntryRecord]) -> io::Result<()> {
        for entry in entries {
            let mut line = String::new();
            if self.opts.inode {
                line.push_str(&format!("{:8} ", entry.inode));
            }
            if self.opts.blocks {
                line.push_str(&format!("{:6} ", self.scale_blocks(entry.blocks)));
            }
            line.push_str(&self.display_name(entry));
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }

    /// Name with `-q` quoting and the `-F` / `-p` suffix.
    fn display_name(&self, entry: &EntryRecord) -> String {
        let mut name = if self.opts.quote {
            quote_name(&entry.name)
        } else {
            entry.name.clone()
        };
        if self.opts.classify {
            name.push_str(classify_suffix(entry));
        } else if self.opts.slash && entry.is_dir() {
            name.push('/');
        }
        name
    }

    fn scale_blocks(&self, blocks: u64) -> u64 {
        if self.opts.kilobytes {
            blocks * BLOCK_SIZE / 1024
        } else {
            blocks
        }
    }
}

impl<W: Write, E: Write> SectionSink for Renderer<W, E> {
    fn section(&mut self, section: Section) -> io::Result<()> {
        self.write_section(&section)
    }

    fn error(&mut self, error: &LsError) {
        // Keep stdout and stderr in order when both go to one terminal.
        let _ = self.out.flush();
        let _ = writeln!(self.err, "parls: {}", error);
    }
}

// ---------------------------------------------------------------------------
// Field formatting
// ---------------------------------------------------------------------------

fn mode_string(entry: &EntryRecord) -> String {
    let kind = match entry.kind {
        EntryKind::Directory          => 'd',
        EntryKind::Symlink            => 'l',
        EntryKind::Fifo               => 'p',
        EntryKind::Socket             => 's',
        EntryKind::BlockDevice { .. } => 'b',
        EntryKind::CharDevice { .. }  => 'c',
        EntryKind::Regular            => '-',
    };
    let m = entry.mode;
    let bit = |mask: u32, c: char| if m & mask != 0 { c } else { '-' };
    let exec = |mask: u32, special: u32, set: char, unset: char| {
        match (m & mask != 0, m & special != 0) {
            (true, true)   => set,
            (true, false)  => 'x',
            (false, true)  => unset,
            (false, false) => '-',
        }
    };

    [
        kind,
        bit(0o400, 'r'),
        bit(0o200, 'w'),
        exec(0o100, S_ISUID, 's', 'S'),
        bit(0o040, 'r'),
        bit(0o020, 'w'),
        exec(0o010, S_ISGID, 's', 'S'),
        bit(0o004, 'r'),
        bit(0o002, 'w'),
        exec(0o001, S_ISVTX, 't', 'T'),
    ]
    .iter()
    .collect()
}

fn size_string(size: u64, human: bool) -> String {
    const UNITS: [(u64, char); 6] = [
        (1 << 60, 'E'),
        (1 << 50, 'P'),
        (1 << 40, 'T'),
        (1 << 30, 'G'),
        (1 << 20, 'M'),
        (1 << 10, 'K'),
    ];
    if human {
        for (scale, suffix) in UNITS {
            if size >= scale {
                return format!("{:.1}{}", size as f64 / scale as f64, suffix);
            }
        }
    }
    size.to_string()
}

fn time_string(t: DateTime<Utc>, now: DateTime<Utc>, full: bool) -> String {
    let local = t.with_timezone(&Local);
    if full {
        return local.format("%b %e %H:%M:%S %Y").to_string();
    }
    if now.signed_duration_since(t) < Duration::days(6 * 30) {
        local.format("%b %e %H:%M").to_string()
    } else {
        local.format("%b %e  %Y").to_string()
    }
}

fn classify_suffix(entry: &EntryRecord) -> &'static str {
    match entry.kind {
        EntryKind::Directory => "/",
        EntryKind::Symlink => "@",
        _ if entry.mode & 0o111 != 0 => "*",
        EntryKind::Fifo => "|",
        EntryKind::Socket => "=",
        _ => "",
    }
}

fn flags_string(flags: u32) -> String {
    const NAMES: [(u32, &str); 6] = [
        (0x0002_0000, "nodump"),
        (0x0000_0020, "arch"),
        (0x0000_0002, "uappnd"),
        (0x0000_0004, "uchg"),
        (0x0000_0010, "sappnd"),
        (0x0000_0008, "schg"),
    ];
    let set: Vec<&str> = NAMES
        .iter()
        .filter(|(mask, _)| flags & mask != 0)
        .map(|(_, name)| *name)
        .collect();
    if set.is_empty() {
        "-".into()
    } else {
        set.join(",")
    }
}

fn quote_name(name: &str) -> String {
    name.chars()
        .map(|c| if (' '..='~').contains(&c) { c } else { '?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, kind: EntryKind, mode: u32) -> EntryRecord {
        EntryRecord {
            name: name.into(),
            kind,
            size: 0,
            mode,
            modified: DateTime::default(),
            accessed: DateTime::default(),
            changed:  DateTime::default(),
            inode:  1,
            blocks: 8,
            links:  1,
            uid:    0,
            gid:    0,
            symlink_target: None,
            flags: 0,
        }
    }

    fn render(opts: DisplayOptions, sections: Vec<Section>) -> String {
        let mut out = Vec::new();
        {
            let mut r = Renderer::new(&mut out, io::sink(), opts, NameCache::new());
            for s in sections {
                r.section(s).unwrap();
            }
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn mode_string_renders_special_bits() {
        assert_eq!(mode_string(&record("f", EntryKind::Regular, 0o644)), "-rw-r--r--");
        assert_eq!(mode_string(&record("f", EntryKind::Regular, 0o4755)), "-rwsr-xr-x");
        assert_eq!(mode_string(&record("f", EntryKind::Regular, 0o2644)), "-rw-r-Sr--");
        assert_eq!(mode_string(&record("d", EntryKind::Directory, 0o1777)), "drwxrwxrwt");
        assert_eq!(mode_string(&record("d", EntryKind::Directory, 0o1770)), "drwxrwx--T");
        assert_eq!(
            mode_string(&record("tty", EntryKind::CharDevice { major: 4, minor: 1 }, 0o620)),
            "crw--w----"
        );
    }

    #[test]
    fn human_sizes_use_binary_units() {
        assert_eq!(size_string(512, true), "512");
        assert_eq!(size_string(1536, true), "1.5K");
        assert_eq!(size_string(5 * 1024 * 1024, true), "5.0M");
        assert_eq!(size_string(1536, false), "1536");
    }

    #[test]
    fn classify_prefers_kind_then_exec_bit() {
        assert_eq!(classify_suffix(&record("d", EntryKind::Directory, 0o755)), "/");
        assert_eq!(classify_suffix(&record("l", EntryKind::Symlink, 0o777)), "@");
        assert_eq!(classify_suffix(&record("x", EntryKind::Regular, 0o755)), "*");
        assert_eq!(classify_suffix(&record("p", EntryKind::Fifo, 0o644)), "|");
        assert_eq!(classify_suffix(&record("s", EntryKind::Socket, 0o644)), "=");
        assert_eq!(classify_suffix(&record("f", EntryKind::Regular, 0o644)), "");
    }

    #[test]
    fn flags_and_quoting() {
        assert_eq!(flags_string(0), "-");
        assert_eq!(flags_string(0x0002_0000 | 0x0000_0004), "nodump,uchg");
        assert_eq!(quote_name("a\tb\u{e9}"), "a?b?");
    }

    #[test]
    fn headers_are_separated_by_blank_lines() {
        let files = Section {
            label: None,
            show_header: false,
            entries: vec![record("f", EntryKind::Regular, 0o644)],
        };
        let dir = Section {
            label: Some("d".into()),
            show_header: true,
            entries: vec![record("x", EntryKind::Regular, 0o644)],
        };
        assert_eq!(render(DisplayOptions::default(), vec![files, dir]), "f\n\nd:\nx\n");
    }

    #[test]
    fn first_header_has_no_leading_blank_line() {
        let dir = Section {
            label: Some("d".into()),
            show_header: true,
            entries: vec![],
        };
        assert_eq!(render(DisplayOptions::default(), vec![dir]), "d:\n");
    }

    #[test]
    fn stream_and_across_layouts() {
        let entries: Vec<EntryRecord> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|n| record(n, EntryKind::Regular, 0o644))
            .collect();
        let section = |entries: Vec<EntryRecord>| Section { label: None, show_header: false, entries };

        let stream = DisplayOptions { layout: Layout::Stream, ..Default::default() };
        assert_eq!(render(stream, vec![section(entries.clone())]), "a, b, c, d, e\n");

        let across = DisplayOptions { layout: Layout::Across, ..Default::default() };
        let text = render(across, vec![section(entries.clone())]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("a "));
        assert_eq!(lines[1], "e");

        let down = DisplayOptions { layout: Layout::Down, ..Default::default() };
        let text = render(down, vec![section(entries)]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0].split_whitespace().collect::<Vec<_>>(), ["a", "c", "e"]);
        assert_eq!(lines[1].split_whitespace().collect::<Vec<_>>(), ["b", "d"]);
    }

    #[test]
    fn long_listing_of_directory_starts_with_total() {
        let mut link = record("l", EntryKind::Symlink, 0o777);
        link.symlink_target = Some("target".into());
        let section = Section {
            label: Some(".".into()),
            show_header: false,
            entries: vec![record("f", EntryKind::Regular, 0o644), link],
        };
        let long = DisplayOptions { layout: Layout::Long, numeric: true, ..Default::default() };
        let text = render(long, vec![section]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "total 16");
        assert!(lines[1].starts_with("-rw-r--r--   1 0        0        "));
        assert!(lines[2].ends_with("l -> target"));
    }
}
