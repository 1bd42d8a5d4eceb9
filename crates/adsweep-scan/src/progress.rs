//! Scan progress reporting.

use std::path::PathBuf;

/// Progress information during a scan.
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// Directories visited so far.
    pub dirs_seen: u64,
    /// Files visited so far.
    pub files_seen: u64,
    /// Findings reported so far.
    pub findings: u64,
    /// Access errors recorded so far.
    pub errors: u64,
    /// Path most recently visited.
    pub current_path: PathBuf,
}

impl ScanProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self {
            dirs_seen: 0,
            files_seen: 0,
            findings: 0,
            errors: 0,
            current_path: PathBuf::new(),
        }
    }

    /// Total entries visited (files + directories).
    pub fn total_items(&self) -> u64 {
        self.files_seen + self.dirs_seen
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new()
    }
}
