//! Structured scan report.
//!
//! The report is an append-only sequence of tagged lines. The flat text
//! blob consumed by front ends is one serialization of it; the structured
//! form is available via serde and the tagged accessors.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of a report line.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum LineKind {
    /// Progress announcement (root being scanned, scan complete).
    Info,
    /// A whitelisted path whose subtree was not evaluated.
    Skip,
    /// A file matching the threat list.
    Finding,
    /// An entry that could not be accessed.
    Error,
}

/// One tagged line of the scan report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLine {
    pub kind: LineKind,
    /// The path this line refers to, when there is one.
    pub path: Option<PathBuf>,
    /// Free-form detail; for errors, the underlying failure text.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub detail: String,
}

impl ReportLine {
    /// Info line announcing a root directory being scanned.
    pub fn scanning(dir: impl Into<PathBuf>) -> Self {
        Self {
            kind: LineKind::Info,
            path: Some(dir.into()),
            detail: String::new(),
        }
    }

    /// The trailing info line of a completed scan.
    pub fn complete() -> Self {
        Self {
            kind: LineKind::Info,
            path: None,
            detail: "Scan complete.".to_string(),
        }
    }

    /// Skip notice for a whitelisted path.
    pub fn skip(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: LineKind::Skip,
            path: Some(path.into()),
            detail: String::new(),
        }
    }

    /// Finding for a threat-list match.
    pub fn finding(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: LineKind::Finding,
            path: Some(path.into()),
            detail: String::new(),
        }
    }

    /// Access error for a path that could not be stat'd or enumerated.
    pub fn access_error(path: impl Into<PathBuf>, detail: impl fmt::Display) -> Self {
        Self {
            kind: LineKind::Error,
            path: Some(path.into()),
            detail: detail.to_string(),
        }
    }
}

impl fmt::Display for ReportLine {
    /// Renders the reference scanner's exact line formats.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.path.as_deref()) {
            (LineKind::Info, Some(dir)) => write!(f, "Scanning directory: {}", dir.display()),
            (LineKind::Skip, Some(path)) => {
                write!(f, "Skipping whitelisted path: {}", path.display())
            }
            (LineKind::Finding, Some(path)) => write!(f, "Adware found: {}", path.display()),
            (LineKind::Error, Some(path)) => {
                write!(f, "Error accessing path \"{}\": {}", path.display(), self.detail)
            }
            _ => f.write_str(&self.detail),
        }
    }
}

/// Counters accumulated while walking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Directories visited.
    pub dirs_seen: u64,
    /// Files visited.
    pub files_seen: u64,
    /// Threat-list matches reported.
    pub findings: u64,
    /// Whitelisted subtrees skipped.
    pub skips: u64,
    /// Access errors recorded.
    pub errors: u64,
}

impl ScanStats {
    /// Fold another stats block into this one.
    pub fn merge(&mut self, other: &ScanStats) {
        self.dirs_seen += other.dirs_seen;
        self.files_seen += other.files_seen;
        self.findings += other.findings;
        self.skips += other.skips;
        self.errors += other.errors;
    }
}

/// Whether the scan ran to completion.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ScanStatus {
    #[default]
    Completed,
    /// The scan was cancelled; the report covers what was walked so far.
    Cancelled,
}

/// Complete result of a scan: ordered tagged lines plus counters and
/// timing. Owned exclusively by the walker while being built, then handed
/// to the caller by value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Report lines, in traversal order.
    pub lines: Vec<ReportLine>,

    /// Counters accumulated during the walk.
    pub stats: ScanStats,

    /// Completion status.
    pub status: ScanStatus,

    /// When the scan started.
    pub started_at: DateTime<Utc>,

    /// When the scan finished, if it has.
    pub finished_at: Option<DateTime<Utc>>,
}

impl ScanReport {
    /// Create an empty report starting now.
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            stats: ScanStats::default(),
            status: ScanStatus::Completed,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Append one line, updating the category counters.
    pub fn push(&mut self, line: ReportLine) {
        match line.kind {
            LineKind::Finding => self.stats.findings += 1,
            LineKind::Skip => self.stats.skips += 1,
            LineKind::Error => self.stats.errors += 1,
            LineKind::Info => {}
        }
        self.lines.push(line);
    }

    /// Append a partial report in order, merging its counters. A
    /// cancelled partial marks the whole report cancelled.
    pub fn append(&mut self, other: ScanReport) {
        self.stats.merge(&other.stats);
        if other.status == ScanStatus::Cancelled {
            self.status = ScanStatus::Cancelled;
        }
        self.lines.extend(other.lines);
    }

    /// Stamp the finish time.
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// All finding lines, in order.
    pub fn findings(&self) -> impl Iterator<Item = &ReportLine> {
        self.lines.iter().filter(|l| l.kind == LineKind::Finding)
    }

    /// All error lines, in order.
    pub fn errors(&self) -> impl Iterator<Item = &ReportLine> {
        self.lines.iter().filter(|l| l.kind == LineKind::Error)
    }

    /// All skip notices, in order.
    pub fn skips(&self) -> impl Iterator<Item = &ReportLine> {
        self.lines.iter().filter(|l| l.kind == LineKind::Skip)
    }

    /// Whether any line refers to the given path.
    pub fn mentions(&self, path: &Path) -> bool {
        self.lines.iter().any(|l| l.path.as_deref() == Some(path))
    }

    pub fn is_complete(&self) -> bool {
        self.status == ScanStatus::Completed
    }

    /// The flat newline-terminated text blob, the sole output contract
    /// of the reference scanner.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.to_string());
            out.push('\n');
        }
        out
    }
}

impl Default for ScanReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_formats() {
        assert_eq!(
            ReportLine::scanning("/opt/apps").to_string(),
            "Scanning directory: /opt/apps"
        );
        assert_eq!(ReportLine::complete().to_string(), "Scan complete.");
        assert_eq!(
            ReportLine::skip("/usr/lib").to_string(),
            "Skipping whitelisted path: /usr/lib"
        );
        assert_eq!(
            ReportLine::finding("/tmp/adwarefile1.exe").to_string(),
            "Adware found: /tmp/adwarefile1.exe"
        );
        assert_eq!(
            ReportLine::access_error("/tmp/gone", "permission denied").to_string(),
            "Error accessing path \"/tmp/gone\": permission denied"
        );
    }

    #[test]
    fn test_push_updates_stats() {
        let mut report = ScanReport::new();
        report.push(ReportLine::finding("/a"));
        report.push(ReportLine::skip("/b"));
        report.push(ReportLine::access_error("/c", "gone"));
        report.push(ReportLine::complete());

        assert_eq!(report.stats.findings, 1);
        assert_eq!(report.stats.skips, 1);
        assert_eq!(report.stats.errors, 1);
        assert_eq!(report.lines.len(), 4);
        assert_eq!(report.findings().count(), 1);
        assert_eq!(report.errors().count(), 1);
        assert_eq!(report.skips().count(), 1);
    }

    #[test]
    fn test_append_merges_and_propagates_cancellation() {
        let mut outer = ScanReport::new();
        outer.push(ReportLine::scanning("/root1"));

        let mut partial = ScanReport::new();
        partial.push(ReportLine::finding("/root1/evil.exe"));
        partial.status = ScanStatus::Cancelled;

        outer.append(partial);

        assert_eq!(outer.lines.len(), 2);
        assert_eq!(outer.stats.findings, 1);
        assert!(!outer.is_complete());
    }

    #[test]
    fn test_to_text_newline_terminated() {
        let mut report = ScanReport::new();
        report.push(ReportLine::scanning("/r"));
        report.push(ReportLine::complete());

        assert_eq!(report.to_text(), "Scanning directory: /r\nScan complete.\n");
    }

    #[test]
    fn test_report_serde_round_trip() {
        let mut report = ScanReport::new();
        report.push(ReportLine::finding("/r/evil.exe"));
        report.finish();

        let json = serde_json::to_string(&report).unwrap();
        let back: ScanReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.lines, report.lines);
        assert_eq!(back.stats, report.stats);
        assert_eq!(back.status, report.status);
    }
}
