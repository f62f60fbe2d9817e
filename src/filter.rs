//! Ignore-pattern filtering for tree traversal
//!
//! A [`PathFilter`] is built once per run from the configured glob patterns
//! and consulted for every path before any hashing or classification work.
//! A path is excluded when a pattern matches the full relative path or any
//! single path segment, so `.git` excludes a `.git` directory anywhere in
//! the tree, not only at the root. Excluded directories are pruned from the
//! walk entirely.

use crate::error::{BigDiffError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;

/// Names excluded regardless of user patterns, matched as path segments
const DEFAULT_IGNORES: &[&str] = &[".git", "__pycache__", ".DS_Store", "Thumbs.db"];

/// Compiled ignore patterns for one comparison run
#[derive(Debug)]
pub struct PathFilter {
    globs: GlobSet,
}

impl PathFilter {
    /// Compile a filter from user-supplied glob patterns
    ///
    /// A single pattern argument may carry several comma-separated
    /// sub-patterns; empty fragments are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`BigDiffError::InvalidPattern`] if any pattern fails to
    /// compile as a glob.
    pub fn new(patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for raw in patterns {
            for sub in raw.split(',') {
                let pattern = sub.trim();
                if pattern.is_empty() {
                    continue;
                }
                let glob = Glob::new(pattern).map_err(|source| BigDiffError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })?;
                builder.add(glob);
            }
        }
        let globs = builder.build().map_err(|source| BigDiffError::InvalidPattern {
            pattern: patterns.join(","),
            source,
        })?;
        Ok(Self { globs })
    }

    /// Whether a relative path is excluded from the comparison universe
    pub fn is_excluded(&self, rel: &Path) -> bool {
        for component in rel.components() {
            let segment = component.as_os_str().to_string_lossy();
            if DEFAULT_IGNORES.contains(&segment.as_ref()) {
                return true;
            }
            // Segment-level match: "*.log" or ".git" anywhere in the path.
            if self.globs.is_match(Path::new(segment.as_ref())) {
                return true;
            }
        }
        self.globs.is_match(rel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn filter(patterns: &[&str]) -> PathFilter {
        let owned: Vec<String> = patterns.iter().map(|s| s.to_string()).collect();
        PathFilter::new(&owned).unwrap()
    }

    #[test]
    fn test_default_ignores_anywhere() {
        let f = filter(&[]);
        assert!(f.is_excluded(Path::new(".git")));
        assert!(f.is_excluded(&PathBuf::from("sub").join(".git").join("config")));
        assert!(f.is_excluded(&PathBuf::from("pkg").join("__pycache__")));
        assert!(!f.is_excluded(Path::new("src/main.rs")));
    }

    #[test]
    fn test_extension_pattern_matches_any_depth() {
        let f = filter(&["*.log"]);
        assert!(f.is_excluded(Path::new("debug.log")));
        assert!(f.is_excluded(&PathBuf::from("deep").join("nested").join("trace.log")));
        assert!(!f.is_excluded(Path::new("log.txt")));
    }

    #[test]
    fn test_segment_name_pattern() {
        let f = filter(&["node_modules"]);
        assert!(f.is_excluded(&PathBuf::from("node_modules").join("left-pad").join("index.js")));
        assert!(!f.is_excluded(Path::new("src/modules.rs")));
    }

    #[test]
    fn test_comma_separated_patterns() {
        let f = filter(&["*.tmp, *.bak"]);
        assert!(f.is_excluded(Path::new("scratch.tmp")));
        assert!(f.is_excluded(Path::new("old.bak")));
        assert!(!f.is_excluded(Path::new("keep.txt")));
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let err = PathFilter::new(&["[".to_string()]).unwrap_err();
        assert!(matches!(err, BigDiffError::InvalidPattern { .. }));
    }
}
