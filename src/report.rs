use chrono::DateTime;
use chrono::FixedOffset;
use chrono::Local;

use crate::repository::RepositoryDescriptor;
use crate::repository::RepositorySummary;
use crate::status::ChangeSet;

/// Column width the message body is wrapped to.
pub const WRAP_WIDTH: usize = 70;

/// Marker prefixed to subjects and summary lines of dirty repositories.
pub const WARNING_MARKER: &str = "⚠";

// -----------------------------------------------------------------------------
// Types

/// Everything gathered about one dirty repository during a run.
pub struct RunRecord<'a> {
    pub repository: &'a RepositoryDescriptor,
    pub changes: ChangeSet,
    pub summary: RepositorySummary,
    pub recent_log: String,
    pub raw_status: String,
    /// Number of change records across all kinds.
    pub total_changes: usize,
}

/// A rendered notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub subject: String,
    pub body: String,
}

/// Renders run records into notification text.
pub struct ReportBuilder {
    sender_host: String,
}

// -----------------------------------------------------------------------------
// RunRecord impl

impl<'a> RunRecord<'a> {
    pub fn new(
        repository: &'a RepositoryDescriptor,
        changes: ChangeSet,
        summary: RepositorySummary,
        recent_log: String,
        raw_status: String,
    ) -> Self {
        let total_changes = changes.total();
        Self {
            repository,
            changes,
            summary,
            recent_log,
            raw_status,
            total_changes,
        }
    }
}

// -----------------------------------------------------------------------------
// ReportBuilder impl

impl ReportBuilder {
    pub fn new(sender_host: impl Into<String>) -> Self {
        Self {
            sender_host: sender_host.into(),
        }
    }

    /// Render a report stamped with the current local time.
    ///
    /// Never called for clean repositories.
    pub fn build(&self, record: &RunRecord<'_>) -> Report {
        self.build_at(record, Local::now().fixed_offset())
    }

    pub fn build_at(&self, record: &RunRecord<'_>, now: DateTime<FixedOffset>) -> Report {
        Report {
            subject: subject(&record.repository.name, &record.changes),
            body: wrap(&self.body(record, now), WRAP_WIDTH),
        }
    }

    fn body(&self, record: &RunRecord<'_>, now: DateTime<FixedOffset>) -> String {
        let mut body = format!(
            "Hey! I found {} uncommitted change(s) in git status of {}.\n\n",
            record.total_changes, record.repository.name
        );

        body.push_str("SUMMARY:\n");
        body.push_str(&format!("  Branch: {}\n", record.summary.branch));
        body.push_str(&format!("  Hash: {}\n", record.summary.commit_hash));
        body.push_str(&format!("  Current time: {}\n\n", now.to_rfc2822()));

        for (kind, records) in record.changes.iter() {
            body.push_str(&format!("{}:\n", kind.as_str().to_uppercase()));
            for change in records {
                body.push_str(&format!("  {}\n", change.path));
            }
            body.push('\n');
        }

        body.push_str(&format!("LAST COMMITS:\n{}\n\n", record.recent_log));

        body.push_str("Raw git status output (quoted):\n");
        body.push_str(&quote(&record.raw_status));
        body.push('\n');

        body.push_str(&format!("Yours,\nWatchman\n{}\n", self.sender_host));
        body
    }
}

/// Subject line: marker, name, total count and the kinds involved.
///
/// e.g. `⚠ my-repo: 3 modified, added file(s)`
pub fn subject(name: &str, changes: &ChangeSet) -> String {
    let kinds = changes
        .kinds()
        .map(|kind| kind.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{} {}: {} {} file(s)",
        WARNING_MARKER,
        name,
        changes.total(),
        kinds
    )
}

/// Prefix every non-empty line with `> `.
fn quote(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                "\n".to_string()
            } else {
                format!("> {}\n", line)
            }
        })
        .collect()
}

/// Wrap each line at spaces so it fits in `width` characters.
///
/// Words longer than `width` are left intact on a line of their own. Leading
/// indentation is kept on the first segment of a line.
pub fn wrap(text: &str, width: usize) -> String {
    text.split('\n')
        .map(|line| wrap_line(line, width))
        .collect::<Vec<_>>()
        .join("\n")
}

fn wrap_line(line: &str, width: usize) -> String {
    if line.chars().count() <= width {
        return line.to_string();
    }

    let mut lines: Vec<String> = vec![];
    let mut current: Option<String> = None;
    for word in line.split(' ') {
        current = Some(match current {
            None => word.to_string(),
            Some(mut segment) => {
                if segment.chars().count() + 1 + word.chars().count() <= width {
                    segment.push(' ');
                    segment.push_str(word);
                    segment
                } else {
                    lines.push(segment);
                    word.to_string()
                }
            }
        });
    }
    lines.extend(current);
    lines.join("\n")
}
