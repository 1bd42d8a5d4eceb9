//! Directory walking and scan orchestration for adsweep.
//!
//! # Overview
//!
//! `adsweep-scan` walks directory trees and classifies every entry
//! against the configured threat list and whitelist. Key behaviors:
//!
//! - **Deterministic traversal** via jwalk with sorted sibling order
//! - **Whitelist pruning** - a whitelisted subtree yields one skip notice
//!   and is never descended
//! - **Hidden-only filtering** of candidate findings, without pruning
//!   directory traversal
//! - **Error resilience** - access failures become report lines, never
//!   aborted walks
//! - **Cooperative cancellation** checked at every entry boundary
//!
//! # Example
//!
//! ```rust,no_run
//! use adsweep_core::{ScanRequest, ThreatList, Whitelist};
//! use adsweep_scan::Scanner;
//!
//! let scanner = Scanner::new(ThreatList::default(), Whitelist::default());
//! let report = scanner.run(&ScanRequest::default()).unwrap();
//! print!("{}", report.to_text());
//! ```
//!
//! # Progress Monitoring
//!
//! Subscribe to progress updates while a scan runs on a blocking task:
//!
//! ```rust,no_run
//! use adsweep_core::{ScanRequest, ThreatList, Whitelist};
//! use adsweep_scan::Scanner;
//!
//! # async fn demo() {
//! let scanner = Scanner::new(ThreatList::default(), Whitelist::default());
//! let mut progress_rx = scanner.subscribe();
//!
//! tokio::spawn(async move {
//!     while let Ok(progress) = progress_rx.recv().await {
//!         eprintln!("Visited {} entries", progress.total_items());
//!     }
//! });
//!
//! let report = scanner.spawn(ScanRequest::default()).await.unwrap().unwrap();
//! # }
//! ```

mod orchestrator;
mod progress;
mod walker;

pub use orchestrator::Scanner;
pub use progress::ScanProgress;
pub use walker::Walker;

// Re-export core types for convenience
pub use adsweep_core::{
    ConfigError, LineKind, PrefixMode, ReportLine, ScanError, ScanReport, ScanRequest, ScanStats,
    ScanStatus, ThreatList, Whitelist,
};
