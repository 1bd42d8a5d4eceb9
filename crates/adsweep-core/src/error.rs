//! Error taxonomy for scanning operations.
//!
//! Access failures during a walk are never errors in the `Result` sense:
//! they become `Error`-kind report lines and the walk continues. Only
//! configuration problems surface before scanning begins.

use std::path::PathBuf;

use thiserror::Error;

/// A problem with the scan configuration, detected before any walking.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configured root still contains an unresolved placeholder.
    #[error("Unresolved placeholder in root path: {path}")]
    UnresolvedPlaceholder { path: PathBuf },

    /// A threat list entry is empty.
    #[error("Threat list entry {index} is empty")]
    EmptyThreatEntry { index: usize },

    /// A threat list entry contains a path separator.
    #[error("Threat list entry is not a bare filename: {entry}")]
    NotABasename { entry: String },

    /// A whitelist entry is empty.
    #[error("Whitelist entry {index} is empty")]
    EmptyWhitelistEntry { index: usize },

    /// No root directories were configured.
    #[error("No root directories configured")]
    NoRoots,

    /// Other configuration problem.
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

/// Errors that can abort a scan as a whole.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The configuration was rejected before walking began.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A background scan task failed to complete.
    #[error("Scan task failed: {message}")]
    Task { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::UnresolvedPlaceholder {
            path: PathBuf::from(r"C:\Users\<username>\AppData\Local"),
        };
        assert!(err.to_string().contains("Unresolved placeholder"));
    }

    #[test]
    fn test_scan_error_from_config() {
        let err: ScanError = ConfigError::NoRoots.into();
        assert!(matches!(err, ScanError::Config(ConfigError::NoRoots)));
    }
}
