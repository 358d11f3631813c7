use std::fmt::Display;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ParseError;

/// A status line is a 1-2 character code, a run of whitespace, then the path.
static STATUS_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<code>\S+)\s+(?P<path>.+)$").unwrap());

// -----------------------------------------------------------------------------
// Types

/// The category a changed path falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Untracked,
    Modified,
    Deleted,
    Added,
    Renamed,
    Copied,
    Unmerged,
}

/// One changed path, as reported by `git status --porcelain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    /// The status line this record was parsed from, trimmed.
    pub raw: String,
    pub path: String,
    pub kind: ChangeKind,
}

/// Change records grouped by kind.
///
/// Kinds are kept in the order they were first encountered, and records within
/// a kind keep the order of the status output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    groups: Vec<(ChangeKind, Vec<ChangeRecord>)>,
}

// -----------------------------------------------------------------------------
// ChangeKind impl

impl ChangeKind {
    /// Look up the kind for the primary status code character.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            '?' => Some(Self::Untracked),
            'M' => Some(Self::Modified),
            'D' => Some(Self::Deleted),
            'A' => Some(Self::Added),
            'R' => Some(Self::Renamed),
            'C' => Some(Self::Copied),
            'U' => Some(Self::Unmerged),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Untracked => "untracked",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
            Self::Added => "added",
            Self::Renamed => "renamed",
            Self::Copied => "copied",
            Self::Unmerged => "unmerged",
        }
    }
}

impl Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// -----------------------------------------------------------------------------
// ChangeSet impl

impl ChangeSet {
    fn push(&mut self, record: ChangeRecord) {
        match self.groups.iter_mut().find(|(kind, _)| *kind == record.kind) {
            Some((_, records)) => records.push(record),
            None => self.groups.push((record.kind, vec![record])),
        }
    }

    /// Records of one kind, in status output order.
    pub fn get(&self, kind: ChangeKind) -> &[ChangeRecord] {
        self.groups
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, records)| records.as_slice())
            .unwrap_or(&[])
    }

    /// Kinds present, in first-encountered order.
    pub fn kinds(&self) -> impl Iterator<Item = ChangeKind> + '_ {
        self.groups.iter().map(|(kind, _)| *kind)
    }

    /// Groups of records, in first-encountered order.
    pub fn iter(&self) -> impl Iterator<Item = (ChangeKind, &[ChangeRecord])> {
        self.groups
            .iter()
            .map(|(kind, records)| (*kind, records.as_slice()))
    }

    /// Total number of records across all kinds.
    pub fn total(&self) -> usize {
        self.groups.iter().map(|(_, records)| records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

// -----------------------------------------------------------------------------
// Parsing

/// Parse `git status --porcelain` output into a change set.
///
/// Only the first character of the status code is significant. Everything
/// after the first whitespace run is the path, so `old -> new` rename entries
/// are kept as a single opaque path.
pub fn parse(output: &str) -> Result<ChangeSet, ParseError> {
    let mut changes = ChangeSet::default();

    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        changes.push(parse_line(line)?);
    }

    Ok(changes)
}

fn parse_line(line: &str) -> Result<ChangeRecord, ParseError> {
    let malformed = || ParseError::MalformedLine {
        line: line.to_string(),
    };

    let captures = STATUS_LINE_RE.captures(line).ok_or_else(malformed)?;
    let code = &captures["code"];
    if code.chars().count() > 2 {
        return Err(malformed());
    }

    let primary = code.chars().next().ok_or_else(malformed)?;
    let kind = ChangeKind::from_code(primary).ok_or_else(|| ParseError::UnknownCode {
        code: primary,
        line: line.to_string(),
    })?;

    Ok(ChangeRecord {
        raw: line.to_string(),
        path: captures["path"].to_string(),
        kind,
    })
}
