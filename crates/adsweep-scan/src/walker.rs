//! JWalk-based directory walker with whitelist pruning.

use std::path::Path;
use std::sync::Arc;

use jwalk::{Parallelism, WalkDir};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use adsweep_core::{FileEntry, ReportLine, ScanReport, ScanRequest, ScanStatus};
use adsweep_detect::{HiddenFileDetector, ThreatMatcher, WhitelistMatcher};

use crate::progress::ScanProgress;

/// Entries between progress broadcasts.
const PROGRESS_INTERVAL: u64 = 256;

/// Walks one root directory, applying the classification predicates to
/// every entry in deterministic (sorted) pre-order.
///
/// A walk never fails: all access errors are captured as `Error` lines
/// in the returned report and siblings keep being processed.
pub struct Walker {
    threats: Arc<ThreatMatcher>,
    whitelist: Arc<WhitelistMatcher>,
    hidden: Arc<dyn HiddenFileDetector>,
    only_hidden: bool,
    threads: usize,
    follow_symlinks: bool,
    max_depth: Option<u32>,
    cancel: CancellationToken,
    progress_tx: broadcast::Sender<ScanProgress>,
}

impl Walker {
    pub fn new(
        threats: Arc<ThreatMatcher>,
        whitelist: Arc<WhitelistMatcher>,
        hidden: Arc<dyn HiddenFileDetector>,
        request: &ScanRequest,
        cancel: CancellationToken,
        progress_tx: broadcast::Sender<ScanProgress>,
    ) -> Self {
        Self {
            threats,
            whitelist,
            hidden,
            only_hidden: request.only_hidden,
            threads: request.threads,
            follow_symlinks: request.follow_symlinks,
            max_depth: request.max_depth,
            cancel,
            progress_tx,
        }
    }

    /// Walk `root` and return its portion of the scan report.
    pub fn walk(&self, root: &Path) -> ScanReport {
        let mut report = ScanReport::new();

        if self.cancel.is_cancelled() {
            report.status = ScanStatus::Cancelled;
            return report;
        }

        // A whitelisted root contributes its skip notice and nothing else.
        if self.whitelist.is_whitelisted(root) {
            report.push(ReportLine::skip(root));
            return report;
        }

        let parallelism = match self.threads {
            0 => Parallelism::Serial,
            n => Parallelism::RayonNewPool(n),
        };

        let whitelist = Arc::clone(&self.whitelist);
        let cancel = self.cancel.clone();
        let walker = WalkDir::new(root)
            .parallelism(parallelism)
            .sort(true)
            .skip_hidden(false)
            .follow_links(self.follow_symlinks)
            .max_depth(self.max_depth.map(|d| d as usize).unwrap_or(usize::MAX))
            .process_read_dir(move |_depth, _path, _state, children| {
                if cancel.is_cancelled() {
                    children.clear();
                    return;
                }
                // Whitelisted directories still yield once (for the skip
                // notice) but their subtrees are never read.
                for child in children.iter_mut().flatten() {
                    if child.file_type.is_dir() && whitelist.is_whitelisted(&child.path()) {
                        child.read_children_path = None;
                    }
                }
            });

        let mut seen: u64 = 0;
        for entry_result in walker {
            if self.cancel.is_cancelled() {
                report.status = ScanStatus::Cancelled;
                break;
            }

            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let path = err
                        .path()
                        .map(|p| p.to_path_buf())
                        .unwrap_or_else(|| root.to_path_buf());
                    tracing::debug!("read error at {}: {err}", path.display());
                    report.push(ReportLine::access_error(path, &err));
                    continue;
                }
            };

            let path = entry.path();
            let is_dir = entry.file_type().is_dir();
            if is_dir {
                report.stats.dirs_seen += 1;
            } else {
                report.stats.files_seen += 1;
            }

            seen += 1;
            if seen % PROGRESS_INTERVAL == 0 {
                let _ = self.progress_tx.send(ScanProgress {
                    dirs_seen: report.stats.dirs_seen,
                    files_seen: report.stats.files_seen,
                    findings: report.stats.findings,
                    errors: report.stats.errors,
                    current_path: path.clone(),
                });
            }

            if self.whitelist.is_whitelisted(&path) {
                report.push(ReportLine::skip(&path));
                continue;
            }

            // jwalk swallows read_dir failures below the root: a directory
            // that cannot be opened yields Ok here and an empty child list,
            // so probe enumerability ourselves before descending.
            let descends = self
                .max_depth
                .map(|d| entry.depth() < d as usize)
                .unwrap_or(true);
            if is_dir && descends {
                if let Err(err) = std::fs::read_dir(&path) {
                    report.push(ReportLine::access_error(&path, &err));
                }
            }

            if self.only_hidden {
                let metadata = match entry.metadata() {
                    Ok(m) => Some(m),
                    Err(err) => {
                        // Hidden degrades to false; the failure is recorded.
                        report.push(ReportLine::access_error(&path, &err));
                        None
                    }
                };
                let file_entry = FileEntry::new(&path, is_dir, metadata.as_ref());
                if !self.hidden.is_hidden(&file_entry) {
                    // Filters leaf evaluation only; directories are still
                    // descended regardless of their own hidden status.
                    continue;
                }
            }

            if !is_dir && self.threats.is_known_threat(path.to_string_lossy()) {
                report.push(ReportLine::finding(&path));
            }
        }

        // Final snapshot so subscribers always observe the walk.
        let _ = self.progress_tx.send(ScanProgress {
            dirs_seen: report.stats.dirs_seen,
            files_seen: report.stats.files_seen,
            findings: report.stats.findings,
            errors: report.stats.errors,
            current_path: root.to_path_buf(),
        });

        report
    }
}
