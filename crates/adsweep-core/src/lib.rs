//! Core types and traits for adsweep.
//!
//! This crate provides the fundamental data structures shared by the
//! adsweep ecosystem: the threat list and whitelist configuration, the
//! scan request, the structured scan report, and the error taxonomy.

mod config;
mod entry;
mod error;
mod report;

pub use config::{
    PrefixMode, ScanRequest, ScanRequestBuilder, ScanRequestBuilderError, ThreatList,
    USERNAME_PLACEHOLDER, Whitelist, default_roots, resolve_placeholders,
};
pub use entry::FileEntry;
pub use error::{ConfigError, ScanError};
pub use report::{LineKind, ReportLine, ScanReport, ScanStats, ScanStatus};
