//! Classification predicates for adsweep.
//!
//! This crate provides the pure decision logic applied to every entry
//! during a walk:
//!
//! - **Threat matching** - exact basename equality against the threat list
//! - **Whitelisting** - path-prefix exemption of whole subtrees
//! - **Hidden-file detection** - per-OS hidden-attribute checks behind a trait
//!
//! All predicates are referentially transparent and `Send + Sync`; they
//! own immutable copies of their configured lists and are safe to share
//! across walker threads without synchronization.
//!
//! ```rust
//! use adsweep_core::{ThreatList, Whitelist, PrefixMode};
//! use adsweep_detect::{ThreatMatcher, WhitelistMatcher};
//!
//! let threats = ThreatMatcher::new(ThreatList::default());
//! assert!(threats.is_known_threat(r"C:\x\adwarefile1.exe"));
//! assert!(!threats.is_known_threat("adwarefile1.exe.bak"));
//!
//! let whitelist = WhitelistMatcher::new(Whitelist::default().with_mode(PrefixMode::Literal));
//! assert!(whitelist.is_whitelisted(r"C:\Windows\System32\foo.dll".as_ref()));
//! ```

mod hidden;
mod matcher;

pub use hidden::{DotfileHidden, HiddenFileDetector, platform_detector};
#[cfg(windows)]
pub use hidden::AttributeHidden;
pub use matcher::{ThreatMatcher, WhitelistMatcher};

// Re-export core types for convenience
pub use adsweep_core::{FileEntry, PrefixMode, ThreatList, Whitelist};
