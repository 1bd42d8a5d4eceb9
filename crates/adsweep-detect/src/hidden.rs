//! Hidden-file detection behind a capability trait.
//!
//! The walker never hardcodes one OS convention: it is handed a detector
//! chosen per target platform, and tests inject synthetic detectors so
//! hidden-mode behavior is covered everywhere.

use adsweep_core::FileEntry;

/// Reports whether a file entry is hidden per the platform's convention.
///
/// Purely observational: never modifies file state, never errors for a
/// stat-able entry. When metadata is unavailable the detector degrades to
/// `false`; the walker records the access error separately.
pub trait HiddenFileDetector: Send + Sync {
    fn is_hidden(&self, entry: &FileEntry<'_>) -> bool;
}

/// POSIX convention: a dot-prefixed basename is hidden.
#[derive(Debug, Clone, Copy, Default)]
pub struct DotfileHidden;

impl HiddenFileDetector for DotfileHidden {
    fn is_hidden(&self, entry: &FileEntry<'_>) -> bool {
        entry
            .basename()
            .is_some_and(|name| name.starts_with('.'))
    }
}

/// Windows convention: the hidden bit in the file attributes.
#[cfg(windows)]
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeHidden;

#[cfg(windows)]
impl HiddenFileDetector for AttributeHidden {
    fn is_hidden(&self, entry: &FileEntry<'_>) -> bool {
        use std::os::windows::fs::MetadataExt;

        const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
        entry
            .metadata
            .is_some_and(|m| m.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0)
    }
}

/// The detector matching the target OS.
pub fn platform_detector() -> Box<dyn HiddenFileDetector> {
    #[cfg(windows)]
    {
        Box::new(AttributeHidden)
    }
    #[cfg(not(windows))]
    {
        Box::new(DotfileHidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_dotfile_convention() {
        let detector = DotfileHidden;
        let hidden = FileEntry::new(Path::new("/tmp/.cache"), true, None);
        let visible = FileEntry::new(Path::new("/tmp/cache"), true, None);

        assert!(detector.is_hidden(&hidden));
        assert!(!detector.is_hidden(&visible));
    }

    #[test]
    fn test_degrades_without_metadata() {
        // No basename at all (filesystem root): not hidden.
        let detector = DotfileHidden;
        let root = FileEntry::new(Path::new("/"), true, None);
        assert!(!detector.is_hidden(&root));
    }

    #[test]
    fn test_platform_detector_is_usable() {
        let detector = platform_detector();
        let entry = FileEntry::new(Path::new("/tmp/plain.txt"), false, None);
        // Either convention agrees a plain name without the hidden bit is visible.
        assert!(!detector.is_hidden(&entry));
    }
}
