//! Ephemeral view of one traversal step.

use std::fs::Metadata;
use std::path::Path;

/// A filesystem entry as seen during one traversal step. Borrowed from
/// the walker and never persisted.
#[derive(Debug, Clone, Copy)]
pub struct FileEntry<'a> {
    /// Full path of the entry.
    pub path: &'a Path,
    /// Whether the entry is a directory.
    pub is_dir: bool,
    /// Metadata, when it could be retrieved. None means stat failed and
    /// the walker has already recorded the access error.
    pub metadata: Option<&'a Metadata>,
}

impl<'a> FileEntry<'a> {
    pub fn new(path: &'a Path, is_dir: bool, metadata: Option<&'a Metadata>) -> Self {
        Self {
            path,
            is_dir,
            metadata,
        }
    }

    /// Final path component, lossily converted.
    pub fn basename(&self) -> Option<String> {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_basename() {
        let entry = FileEntry::new(Path::new("/a/b/.hidden"), false, None);
        assert_eq!(entry.basename().as_deref(), Some(".hidden"));

        let root = FileEntry::new(Path::new("/"), true, None);
        assert_eq!(root.basename(), None);
    }
}
