// src/watch/filter.rs

use std::path::{Path, PathBuf};

/// What happened to a path, as far as the pipeline cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Other,
}

/// A raw filesystem notification, already flattened to one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub is_directory: bool,
    pub kind: ChangeKind,
}

/// Decides which filesystem events warrant a rebuild.
///
/// A change qualifies when it is a create/modify of a regular file whose
/// extension is in the recognized set (`.c` / `.h` by default) and whose path
/// is not the generated header itself. The last rule is the self-trigger
/// guard: writing `build.h` is a filesystem modification like any other, and
/// without the exclusion every rebuild would schedule the next one forever.
#[derive(Debug, Clone)]
pub struct ChangeFilter {
    extensions: Vec<String>,
    header_path: PathBuf,
}

impl ChangeFilter {
    /// `header_path` must be the same (absolute) form the watcher reports
    /// event paths in, i.e. resolved against the canonicalized watch root.
    pub fn new(extensions: Vec<String>, header_path: impl Into<PathBuf>) -> Self {
        Self {
            extensions,
            header_path: header_path.into(),
        }
    }

    pub fn is_qualifying(&self, event: &ChangeEvent) -> bool {
        if event.is_directory {
            return false;
        }
        if !matches!(event.kind, ChangeKind::Created | ChangeKind::Modified) {
            return false;
        }
        if !self.has_source_extension(&event.path) {
            return false;
        }
        if event.path == self.header_path {
            return false;
        }
        true
    }

    fn has_source_extension(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extensions.iter().any(|known| known == ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> ChangeFilter {
        ChangeFilter::new(
            vec!["c".to_string(), "h".to_string()],
            "/proj/inc/build.h",
        )
    }

    fn event(path: &str, is_directory: bool, kind: ChangeKind) -> ChangeEvent {
        ChangeEvent {
            path: PathBuf::from(path),
            is_directory,
            kind,
        }
    }

    #[test]
    fn accepts_created_and_modified_sources() {
        let f = filter();
        assert!(f.is_qualifying(&event("/proj/src/main.c", false, ChangeKind::Created)));
        assert!(f.is_qualifying(&event("/proj/inc/util.h", false, ChangeKind::Modified)));
    }

    #[test]
    fn rejects_directories() {
        let f = filter();
        assert!(!f.is_qualifying(&event("/proj/src.c", true, ChangeKind::Created)));
    }

    #[test]
    fn rejects_other_event_kinds() {
        let f = filter();
        assert!(!f.is_qualifying(&event("/proj/src/main.c", false, ChangeKind::Other)));
    }

    #[test]
    fn rejects_unrecognized_extensions() {
        let f = filter();
        assert!(!f.is_qualifying(&event("/proj/README.md", false, ChangeKind::Modified)));
        assert!(!f.is_qualifying(&event("/proj/Makefile", false, ChangeKind::Modified)));
        assert!(!f.is_qualifying(&event("/proj/main.cpp", false, ChangeKind::Modified)));
    }

    #[test]
    fn rejects_the_generated_header_itself() {
        let f = filter();
        assert!(!f.is_qualifying(&event("/proj/inc/build.h", false, ChangeKind::Modified)));
        assert!(!f.is_qualifying(&event("/proj/inc/build.h", false, ChangeKind::Created)));
        // A different build.h elsewhere in the tree is a real header change.
        assert!(f.is_qualifying(&event("/proj/vendor/build.h", false, ChangeKind::Modified)));
    }

    #[test]
    fn custom_extension_set() {
        let f = ChangeFilter::new(vec!["rs".to_string()], "/proj/inc/build.h");
        assert!(f.is_qualifying(&event("/proj/src/lib.rs", false, ChangeKind::Modified)));
        assert!(!f.is_qualifying(&event("/proj/src/main.c", false, ChangeKind::Modified)));
    }
}
