//! Multi-root scan orchestration.

use std::sync::Arc;

use compact_str::CompactString;
use rayon::prelude::*;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use adsweep_core::{
    ConfigError, ReportLine, ScanError, ScanReport, ScanRequest, ScanStatus, ThreatList,
    Whitelist, resolve_placeholders,
};
use adsweep_detect::{HiddenFileDetector, ThreatMatcher, WhitelistMatcher, platform_detector};

use crate::progress::ScanProgress;
use crate::walker::Walker;

/// Runs the configured scan over a set of root directories and
/// concatenates the per-root reports in request order.
///
/// The scanner owns immutable matchers and a platform hidden-file
/// detector, so it is cheap to clone and safe to share across tasks.
#[derive(Clone)]
pub struct Scanner {
    threats: Arc<ThreatMatcher>,
    whitelist: Arc<WhitelistMatcher>,
    hidden: Arc<dyn HiddenFileDetector>,
    progress_tx: broadcast::Sender<ScanProgress>,
    cancel: CancellationToken,
}

impl Scanner {
    /// Create a scanner using the hidden-file detector for the target OS.
    pub fn new(threats: ThreatList, whitelist: Whitelist) -> Self {
        Self::with_detector(threats, whitelist, platform_detector())
    }

    /// Create a scanner with an injected hidden-file detector.
    pub fn with_detector(
        threats: ThreatList,
        whitelist: Whitelist,
        detector: Box<dyn HiddenFileDetector>,
    ) -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self {
            threats: Arc::new(ThreatMatcher::new(threats)),
            whitelist: Arc::new(WhitelistMatcher::new(whitelist)),
            hidden: Arc::from(detector),
            progress_tx,
            cancel: CancellationToken::new(),
        }
    }

    /// Subscribe to scan progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Token observed by walkers at every entry boundary.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Request cooperative cancellation of the running scan.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// The configured threat basenames.
    pub fn known_threats(&self) -> &[CompactString] {
        self.threats.known_threats()
    }

    /// The configured whitelist prefixes.
    pub fn whitelist(&self) -> &[String] {
        self.whitelist.whitelist()
    }

    /// Run the scan synchronously, blocking until the report is ready.
    ///
    /// Configuration problems (unresolved placeholder, empty root set)
    /// surface as `Err` before any walking; access failures during the
    /// walk are report lines, never errors.
    pub fn run(&self, request: &ScanRequest) -> Result<ScanReport, ScanError> {
        if request.roots.is_empty() {
            return Err(ConfigError::NoRoots.into());
        }
        let roots = resolve_placeholders(&request.roots)?;

        tracing::debug!("scanning {} root(s)", roots.len());
        let walker = Walker::new(
            Arc::clone(&self.threats),
            Arc::clone(&self.whitelist),
            Arc::clone(&self.hidden),
            request,
            self.cancel.clone(),
            self.progress_tx.clone(),
        );

        let mut report = ScanReport::new();

        if request.parallel_roots {
            // Per-root buffers concatenated in request order keep the
            // output identical to a sequential run.
            let partials: Vec<ScanReport> =
                roots.par_iter().map(|root| walker.walk(root)).collect();
            for (root, partial) in roots.iter().zip(partials) {
                report.push(ReportLine::scanning(root));
                report.append(partial);
            }
        } else {
            for root in &roots {
                if self.cancel.is_cancelled() {
                    report.status = ScanStatus::Cancelled;
                    break;
                }
                report.push(ReportLine::scanning(root));
                report.append(walker.walk(root));
                if !report.is_complete() {
                    break;
                }
            }
        }

        if report.is_complete() {
            report.push(ReportLine::complete());
        }
        report.finish();
        tracing::debug!(
            findings = report.stats.findings,
            errors = report.stats.errors,
            "scan finished"
        );
        Ok(report)
    }

    /// Run the scan on a blocking task so an async front end stays
    /// responsive. Pair with [`Scanner::subscribe`] for progress and
    /// [`Scanner::cancel`] to abort.
    pub fn spawn(&self, request: ScanRequest) -> JoinHandle<Result<ScanReport, ScanError>> {
        let scanner = self.clone();
        tokio::task::spawn_blocking(move || scanner.run(&request))
    }
}
