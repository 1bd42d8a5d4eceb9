//! Scan configuration types.

use std::path::PathBuf;

use compact_str::CompactString;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Placeholder in configured root paths that is replaced with the
/// current user's account name before scanning.
pub const USERNAME_PLACEHOLDER: &str = "<username>";

/// Ordered list of known adware basenames, fixed for the duration of a scan.
///
/// Matching is exact and case-sensitive; entries must be bare filenames
/// without path separators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatList {
    entries: Vec<CompactString>,
}

impl ThreatList {
    /// Build a threat list, validating every entry.
    pub fn new<I, S>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        let entries: Vec<CompactString> = entries.into_iter().map(Into::into).collect();
        for (index, entry) in entries.iter().enumerate() {
            if entry.is_empty() {
                return Err(ConfigError::EmptyThreatEntry { index });
            }
            if entry.contains(['/', '\\']) {
                return Err(ConfigError::NotABasename {
                    entry: entry.to_string(),
                });
            }
        }
        Ok(Self { entries })
    }

    /// The configured basenames, in order.
    pub fn entries(&self) -> &[CompactString] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for ThreatList {
    /// The reference list of known adware filenames.
    fn default() -> Self {
        Self {
            entries: vec![
                "adwarefile1.exe".into(),
                "adwarefile2.dll".into(),
                "unwanted_toolbar.exe".into(),
            ],
        }
    }
}

/// How whitelist entries are compared against candidate paths.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum PrefixMode {
    /// Path-component-aware prefix comparison. `C:\Windows2` does not
    /// match a `C:\Windows` entry.
    #[default]
    Segment,
    /// Byte-wise string prefix comparison, reproducing the reference
    /// scanner's behavior including its sibling-prefix false positive.
    Literal,
}

/// Ordered list of path prefixes exempting whole subtrees from findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Whitelist {
    entries: Vec<String>,
    mode: PrefixMode,
}

impl Whitelist {
    /// Build a whitelist, validating every entry.
    pub fn new<I, S>(entries: I, mode: PrefixMode) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<String> = entries.into_iter().map(Into::into).collect();
        for (index, entry) in entries.iter().enumerate() {
            if entry.is_empty() {
                return Err(ConfigError::EmptyWhitelistEntry { index });
            }
        }
        Ok(Self { entries, mode })
    }

    /// The configured path prefixes, in order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn mode(&self) -> PrefixMode {
        self.mode
    }

    /// Same entries, different comparison policy.
    pub fn with_mode(mut self, mode: PrefixMode) -> Self {
        self.mode = mode;
        self
    }
}

impl Default for Whitelist {
    /// The reference whitelist: Windows system directories and critical
    /// executables that must never be reported.
    fn default() -> Self {
        let entries = [
            r"C:\Windows",
            r"C:\Program Files",
            r"C:\Program Files (x86)",
            r"C:\Windows\System32",
            r"C:\Windows\SysWOW64",
            r"C:\Windows\explorer.exe",
            r"C:\Windows\System32\svchost.exe",
            r"C:\Windows\System32\lsass.exe",
            r"C:\Windows\System32\csrss.exe",
            r"C:\Windows\System32\cmd.exe",
            r"C:\Windows\System32\taskmgr.exe",
            r"C:\Windows\System32\dwm.exe",
            r"C:\Windows\System32\services.exe",
            r"C:\Windows\System32\winlogon.exe",
            r"C:\Windows\System32\kernel32.dll",
            r"C:\Windows\System32\user32.dll",
            r"C:\Windows\System32\gdi32.dll",
            r"C:\Windows\System32\ntdll.dll",
            r"C:\Windows\System32\shell32.dll",
            r"C:\Windows\System32\advapi32.dll",
        ];
        Self {
            entries: entries.iter().map(|e| e.to_string()).collect(),
            mode: PrefixMode::default(),
        }
    }
}

/// One scan invocation: the roots to walk and the filtering knobs.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanRequest {
    /// Root directories to scan, in order. Entries may contain the
    /// `<username>` placeholder.
    pub roots: Vec<PathBuf>,

    /// Restrict findings to OS-hidden files.
    #[builder(default)]
    #[serde(default)]
    pub only_hidden: bool,

    /// Threads for within-root traversal (0 = serial).
    #[builder(default = "0")]
    #[serde(default)]
    pub threads: usize,

    /// Walk independent roots in parallel.
    #[builder(default)]
    #[serde(default)]
    pub parallel_roots: bool,

    /// Follow symbolic links.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Maximum depth to traverse (None = unlimited).
    #[builder(default)]
    #[serde(default)]
    pub max_depth: Option<u32>,
}

impl ScanRequestBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.roots {
            Some(ref roots) if roots.is_empty() => Err("At least one root is required".to_string()),
            None => Err("At least one root is required".to_string()),
            _ => Ok(()),
        }
    }
}

impl ScanRequest {
    /// Create a new scan request builder.
    pub fn builder() -> ScanRequestBuilder {
        ScanRequestBuilder::default()
    }

    /// Create a simple request for the given roots.
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            only_hidden: false,
            threads: 0,
            parallel_roots: false,
            follow_symlinks: false,
            max_depth: None,
        }
    }
}

impl Default for ScanRequest {
    /// The reference configuration: default roots, hidden files only.
    fn default() -> Self {
        let mut request = Self::new(default_roots());
        request.only_hidden = true;
        request
    }
}

/// The reference set of scan roots. User-profile entries carry the
/// `<username>` placeholder and must be resolved before walking.
pub fn default_roots() -> Vec<PathBuf> {
    vec![
        PathBuf::from(r"C:\Program Files (x86)"),
        PathBuf::from(r"C:\ProgramData"),
        PathBuf::from(r"C:\Users\<username>\AppData\Local"),
        PathBuf::from(r"C:\Users\<username>\AppData\Roaming"),
    ]
}

/// Replace the `<username>` placeholder in each root with the current
/// user's account name. An unresolvable placeholder is a configuration
/// error, not a scan error.
pub fn resolve_placeholders(roots: &[PathBuf]) -> Result<Vec<PathBuf>, ConfigError> {
    let mut resolved = Vec::with_capacity(roots.len());
    for root in roots {
        let raw = root.to_string_lossy();
        if raw.contains(USERNAME_PLACEHOLDER) {
            let user = whoami::username();
            if user.is_empty() {
                return Err(ConfigError::UnresolvedPlaceholder { path: root.clone() });
            }
            resolved.push(PathBuf::from(raw.replace(USERNAME_PLACEHOLDER, &user)));
        } else {
            resolved.push(root.clone());
        }
    }
    Ok(resolved)
}
