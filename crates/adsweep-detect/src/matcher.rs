//! Threat-list and whitelist predicates.

use std::path::Path;

use compact_str::CompactString;

use adsweep_core::{PrefixMode, ThreatList, Whitelist};

/// Tests basenames against the configured threat list.
///
/// Matching is exact string equality on the final path component. No
/// wildcards, no substrings, case-sensitive.
#[derive(Debug, Clone)]
pub struct ThreatMatcher {
    list: ThreatList,
}

impl ThreatMatcher {
    pub fn new(list: ThreatList) -> Self {
        Self { list }
    }

    /// True iff the basename of `path` equals a threat list entry.
    pub fn is_known_threat(&self, path: impl AsRef<str>) -> bool {
        let name = basename(path.as_ref());
        self.list.entries().iter().any(|entry| entry.as_str() == name)
    }

    /// The configured threat basenames.
    pub fn known_threats(&self) -> &[CompactString] {
        self.list.entries()
    }
}

/// Tests paths against the configured whitelist prefixes.
#[derive(Debug, Clone)]
pub struct WhitelistMatcher {
    list: Whitelist,
}

impl WhitelistMatcher {
    pub fn new(list: Whitelist) -> Self {
        Self { list }
    }

    /// True iff `path` falls under a whitelist entry per the configured
    /// prefix mode.
    pub fn is_whitelisted(&self, path: &Path) -> bool {
        match self.list.mode() {
            PrefixMode::Segment => self
                .list
                .entries()
                .iter()
                .any(|entry| path.starts_with(Path::new(entry))),
            PrefixMode::Literal => {
                let raw = path.to_string_lossy();
                self.list.entries().iter().any(|entry| raw.starts_with(entry))
            }
        }
    }

    /// The configured whitelist prefixes.
    pub fn whitelist(&self) -> &[String] {
        self.list.entries()
    }

    pub fn mode(&self) -> PrefixMode {
        self.list.mode()
    }
}

/// Final path component. Splits on both separators so Windows-style
/// configured paths behave the same on any host.
fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
