//! Tree comparison engine
//!
//! The [`TreeComparator`] walks both input roots (ignoring excluded paths),
//! takes the union of relative paths, and assigns every path a
//! [`Verdict`]. Output ordering is lexicographic by relative path, so
//! repeated runs over the same trees produce identical verdict sequences.
//!
//! Subtrees present in only one tree are reduced to their top-most head
//! directories: the head carries a single `New`/`Deleted` verdict and its
//! contents are materialized as a unit, never re-reported per file.

use crate::classify::is_probably_binary;
use crate::diff::compute_edit_script;
use crate::error::{BigDiffError, Result};
use crate::filter::PathFilter;
use crate::hash::hash_file_content;
use crate::options::Options;
use crate::types::{Comparison, EntryKind, PathEntry, SkipReason, Verdict};
use crate::utils::read_text_lossy;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Snapshot of one tree: relative files and directories after filtering
#[derive(Debug)]
pub struct TreeScan {
    /// Absolute root this scan was taken from
    pub root: PathBuf,
    /// Relative file path -> absolute path
    pub files: BTreeMap<PathBuf, PathBuf>,
    /// Relative directory paths (root itself excluded)
    pub dirs: BTreeSet<PathBuf>,
}

/// Walk one root and collect its filtered entries
///
/// Symlinks are not followed. Excluded directories are pruned from the
/// walk, so their children are never visited.
pub fn scan_tree(root: &Path, filter: &PathFilter) -> Result<TreeScan> {
    let mut files = BTreeMap::new();
    let mut dirs = BTreeSet::new();

    let walker = WalkDir::new(root).follow_links(false).into_iter();
    for entry in walker.filter_entry(|e| {
        match e.path().strip_prefix(root) {
            // The root itself has an empty relative path; always keep it.
            Ok(rel) if rel.as_os_str().is_empty() => true,
            Ok(rel) => !filter.is_excluded(rel),
            Err(_) => true,
        }
    }) {
        let entry = entry.map_err(|e| match e.into_io_error() {
            Some(io) => BigDiffError::Io(io),
            None => BigDiffError::Io(std::io::Error::other("walk error")),
        })?;
        let rel = match entry.path().strip_prefix(root) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
            _ => continue,
        };
        if entry.file_type().is_dir() {
            dirs.insert(rel);
        } else if entry.file_type().is_file() {
            files.insert(rel, entry.path().to_path_buf());
        }
        // Symlinks and other special files are ignored.
    }

    trace!(
        root = %root.display(),
        files = files.len(),
        dirs = dirs.len(),
        "scanned tree"
    );
    Ok(TreeScan {
        root: root.to_path_buf(),
        files,
        dirs,
    })
}

/// Validate the three roots before any comparison work
///
/// Both inputs must be existing directories and must differ; the output
/// root must not be equal to or nested inside either input, otherwise the
/// run would read its own output. Fails fast with zero writes.
pub fn validate_roots(base: &Path, target: &Path, output: &Path) -> Result<()> {
    for root in [base, target] {
        if !root.is_dir() {
            return Err(BigDiffError::InputNotADirectory {
                path: root.to_path_buf(),
            });
        }
    }

    let base_abs = fs::canonicalize(base)?;
    let target_abs = fs::canonicalize(target)?;
    if base_abs == target_abs {
        return Err(BigDiffError::SameInputRoots { path: base_abs });
    }

    // The output may not exist yet; resolve it against the current
    // directory without requiring the path to be present.
    let output_abs = absolutize(output)?;
    for input in [&base_abs, &target_abs] {
        if output_abs.starts_with(input) {
            return Err(BigDiffError::OutputInsideInput {
                output: output_abs,
                input: input.clone(),
            });
        }
    }
    Ok(())
}

/// Make a path absolute, resolving `.` and `..` components lexically
///
/// Works for paths that do not exist yet: the nearest existing ancestor is
/// canonicalized so symlinked prefixes compare correctly.
fn absolutize(path: &Path) -> Result<PathBuf> {
    if let Ok(canonical) = fs::canonicalize(path) {
        return Ok(canonical);
    }
    if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
        if let Ok(parent_abs) = fs::canonicalize(parent) {
            return Ok(parent_abs.join(name));
        }
    }
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            std::path::Component::CurDir => {}
            std::path::Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

/// Compares two directory trees and produces the ordered verdict sequence
pub struct TreeComparator<'a> {
    base: PathBuf,
    target: PathBuf,
    options: &'a Options,
}

impl<'a> TreeComparator<'a> {
    /// Create a comparator over two roots
    pub fn new(base: &Path, target: &Path, options: &'a Options) -> Self {
        Self {
            base: base.to_path_buf(),
            target: target.to_path_buf(),
            options,
        }
    }

    /// Run the comparison and return verdicts in lexicographic path order
    pub fn compare(&self) -> Result<Vec<Comparison>> {
        let filter = PathFilter::new(&self.options.ignore_patterns)?;
        let base_scan = scan_tree(&self.base, &filter)?;
        let target_scan = scan_tree(&self.target, &filter)?;

        debug!(
            base_files = base_scan.files.len(),
            target_files = target_scan.files.len(),
            "comparing trees"
        );

        // Whole subtrees present in one tree only, reduced to their
        // top-most heads.
        let deleted_heads = head_dirs(&base_scan.dirs, &target_scan.dirs);
        let new_heads = head_dirs(&target_scan.dirs, &base_scan.dirs);

        let mut comparisons: Vec<Comparison> = Vec::new();

        for head in &deleted_heads {
            comparisons.push(Comparison {
                entry: PathEntry {
                    rel: head.clone(),
                    kind: EntryKind::Directory,
                    in_base: true,
                    in_target: false,
                },
                verdict: Verdict::Deleted,
            });
        }
        for head in &new_heads {
            comparisons.push(Comparison {
                entry: PathEntry {
                    rel: head.clone(),
                    kind: EntryKind::Directory,
                    in_base: false,
                    in_target: true,
                },
                verdict: Verdict::New,
            });
        }

        let all_files: BTreeSet<&PathBuf> = base_scan
            .files
            .keys()
            .chain(target_scan.files.keys())
            .collect();

        for rel in all_files {
            let in_base = base_scan.files.contains_key(rel);
            let in_target = target_scan.files.contains_key(rel);
            // Files inside a one-sided subtree are carried by their head,
            // but only on the side the head belongs to: a base file whose
            // path reappears as a target directory (or vice versa) still
            // gets its own verdict.
            if in_base && !in_target && covered_by(rel, &deleted_heads) {
                continue;
            }
            if in_target && !in_base && covered_by(rel, &new_heads) {
                continue;
            }
            let verdict = match (in_base, in_target) {
                (true, false) => Verdict::Deleted,
                (false, true) => Verdict::New,
                (true, true) => {
                    self.compare_file(&base_scan.files[rel], &target_scan.files[rel])?
                }
                (false, false) => unreachable!("path came from the union of both scans"),
            };
            trace!(path = %rel.display(), verdict = verdict.label(), "classified");
            comparisons.push(Comparison {
                entry: PathEntry {
                    rel: rel.clone(),
                    kind: EntryKind::File,
                    in_base,
                    in_target,
                },
                verdict,
            });
        }

        // Deterministic lexicographic ordering is the traversal contract.
        comparisons.sort_by(|a, b| a.entry.rel.cmp(&b.entry.rel));
        Ok(comparisons)
    }

    /// Classify one file present in both trees
    fn compare_file(&self, base_file: &Path, target_file: &Path) -> Result<Verdict> {
        let base_hash = hash_file_content(base_file, self.options.normalize_eol)?;
        let target_hash = hash_file_content(target_file, self.options.normalize_eol)?;
        if base_hash == target_hash {
            return Ok(Verdict::Unchanged);
        }

        let binary = is_probably_binary(base_file)? || is_probably_binary(target_file)?;
        if binary {
            return Ok(Verdict::Modified {
                binary: true,
                skip: Some(SkipReason::Binary),
                script: None,
            });
        }

        let base_size = fs::metadata(base_file)?.len();
        let target_size = fs::metadata(target_file)?.len();
        if base_size > self.options.max_text_size || target_size > self.options.max_text_size {
            return Ok(Verdict::Modified {
                binary: false,
                skip: Some(SkipReason::Oversized),
                script: None,
            });
        }

        let base_text = read_text_lossy(base_file, self.options.normalize_eol)?;
        let target_text = read_text_lossy(target_file, self.options.normalize_eol)?;
        Ok(Verdict::Modified {
            binary: false,
            skip: None,
            script: Some(compute_edit_script(&base_text, &target_text)),
        })
    }
}

/// Reduce directories present only in `ours` to their top-most heads
fn head_dirs(ours: &BTreeSet<PathBuf>, theirs: &BTreeSet<PathBuf>) -> Vec<PathBuf> {
    let mut heads: Vec<PathBuf> = Vec::new();
    let mut only_ours: Vec<&PathBuf> = ours.difference(theirs).collect();
    // Shallowest first, so ancestors claim their subtrees before descendants.
    only_ours.sort_by_key(|d| d.components().count());
    for dir in only_ours {
        if !heads.iter().any(|head| dir.starts_with(head)) {
            heads.push(dir.clone());
        }
    }
    heads.sort();
    heads
}

/// Whether a relative path falls under any of the given head directories
fn covered_by(rel: &Path, heads: &[PathBuf]) -> bool {
    heads.iter().any(|head| rel.starts_with(head))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn mkfile(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn compare(base: &Path, target: &Path, options: &Options) -> Vec<Comparison> {
        TreeComparator::new(base, target, options).compare().unwrap()
    }

    #[test]
    fn test_unchanged_new_deleted_modified() {
        let base = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        mkfile(base.path(), "same.txt", "identical\n");
        mkfile(target.path(), "same.txt", "identical\n");
        mkfile(base.path(), "gone.txt", "bye\n");
        mkfile(target.path(), "fresh.txt", "hi\n");
        mkfile(base.path(), "changed.py", "print(\"Hello World\")\n");
        mkfile(target.path(), "changed.py", "print(\"New line\")\n");

        let options = Options::default();
        let comparisons = compare(base.path(), target.path(), &options);

        let verdict_of = |name: &str| {
            comparisons
                .iter()
                .find(|c| c.entry.rel == Path::new(name))
                .map(|c| c.verdict.clone())
                .unwrap()
        };
        assert_eq!(verdict_of("same.txt"), Verdict::Unchanged);
        assert_eq!(verdict_of("gone.txt"), Verdict::Deleted);
        assert_eq!(verdict_of("fresh.txt"), Verdict::New);
        match verdict_of("changed.py") {
            Verdict::Modified { binary, skip, script } => {
                assert!(!binary);
                assert!(skip.is_none());
                assert!(script.is_some());
            }
            other => panic!("expected Modified, got {other:?}"),
        }
    }

    #[test]
    fn test_output_is_ordered_by_path() {
        let base = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        mkfile(target.path(), "z.txt", "z\n");
        mkfile(target.path(), "a.txt", "a\n");
        mkfile(target.path(), "m/inner.txt", "m\n");

        let options = Options::default();
        let comparisons = compare(base.path(), target.path(), &options);
        let rels: Vec<_> = comparisons.iter().map(|c| c.entry.rel.clone()).collect();
        let mut sorted = rels.clone();
        sorted.sort();
        assert_eq!(rels, sorted);
    }

    #[test]
    fn test_deleted_subtree_reduced_to_head() {
        let base = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        mkfile(base.path(), "old/a.txt", "a\n");
        mkfile(base.path(), "old/nested/b.txt", "b\n");
        mkfile(base.path(), "kept.txt", "k\n");
        mkfile(target.path(), "kept.txt", "k\n");

        let options = Options::default();
        let comparisons = compare(base.path(), target.path(), &options);

        let deleted: Vec<_> = comparisons
            .iter()
            .filter(|c| c.verdict == Verdict::Deleted)
            .collect();
        // One head directory; the files beneath it are carried implicitly.
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].entry.rel, Path::new("old"));
        assert_eq!(deleted[0].entry.kind, EntryKind::Directory);
    }

    #[test]
    fn test_kind_flip_keeps_both_verdicts() {
        // A base file replaced by a target directory of the same name must
        // yield both the Deleted file verdict and the New head verdict.
        let base = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        mkfile(base.path(), "x", "was a file\n");
        mkfile(target.path(), "x/inner.txt", "now a tree\n");

        let options = Options::default();
        let comparisons = compare(base.path(), target.path(), &options);
        assert_eq!(comparisons.len(), 2);

        let file = comparisons
            .iter()
            .find(|c| c.entry.kind == EntryKind::File)
            .unwrap();
        assert_eq!(file.entry.rel, Path::new("x"));
        assert_eq!(file.verdict, Verdict::Deleted);

        let dir = comparisons
            .iter()
            .find(|c| c.entry.kind == EntryKind::Directory)
            .unwrap();
        assert_eq!(dir.entry.rel, Path::new("x"));
        assert_eq!(dir.verdict, Verdict::New);
    }

    #[test]
    fn test_ignored_paths_never_compared() {
        let base = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        mkfile(base.path(), "debug.log", "old\n");
        mkfile(target.path(), "debug.log", "new\n");
        mkfile(base.path(), "code.rs", "fn main() {}\n");
        mkfile(target.path(), "code.rs", "fn main() {}\n");

        let options = Options::default().ignore_patterns(vec!["*.log".to_string()]);
        let comparisons = compare(base.path(), target.path(), &options);
        assert!(comparisons
            .iter()
            .all(|c| c.entry.rel != Path::new("debug.log")));
        assert_eq!(comparisons.len(), 1);
    }

    #[test]
    fn test_binary_modification_is_skipped() {
        let base = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        fs::write(base.path().join("blob.bin"), b"\x00\x01old").unwrap();
        fs::write(target.path().join("blob.bin"), b"\x00\x01new").unwrap();

        let options = Options::default();
        let comparisons = compare(base.path(), target.path(), &options);
        match &comparisons[0].verdict {
            Verdict::Modified { binary, skip, script } => {
                assert!(*binary);
                assert_eq!(*skip, Some(SkipReason::Binary));
                assert!(script.is_none());
            }
            other => panic!("expected skipped Modified, got {other:?}"),
        }
    }

    #[test]
    fn test_oversized_modification_is_skipped() {
        let base = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        mkfile(base.path(), "big.txt", &"old line\n".repeat(100));
        mkfile(target.path(), "big.txt", &"new line\n".repeat(100));

        let options = Options::default().max_text_size(64);
        let comparisons = compare(base.path(), target.path(), &options);
        match &comparisons[0].verdict {
            Verdict::Modified { skip, .. } => assert_eq!(*skip, Some(SkipReason::Oversized)),
            other => panic!("expected skipped Modified, got {other:?}"),
        }
    }

    #[test]
    fn test_normalize_eol_makes_crlf_unchanged() {
        let base = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        mkfile(base.path(), "a.txt", "one\ntwo\n");
        fs::write(target.path().join("a.txt"), "one\r\ntwo\r\n").unwrap();

        let raw = compare(base.path(), target.path(), &Options::default());
        assert!(matches!(raw[0].verdict, Verdict::Modified { .. }));

        let normalized = compare(
            base.path(),
            target.path(),
            &Options::default().normalize_eol(true),
        );
        assert_eq!(normalized[0].verdict, Verdict::Unchanged);
    }

    #[test]
    fn test_validate_roots() {
        let base = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();

        assert!(validate_roots(base.path(), target.path(), out.path()).is_ok());

        // Output nested inside an input root.
        let nested = base.path().join("out");
        let err = validate_roots(base.path(), target.path(), &nested).unwrap_err();
        assert!(matches!(err, BigDiffError::OutputInsideInput { .. }));

        // Output equal to an input root.
        let err = validate_roots(base.path(), target.path(), target.path()).unwrap_err();
        assert!(matches!(err, BigDiffError::OutputInsideInput { .. }));

        // Same input twice.
        let err = validate_roots(base.path(), base.path(), out.path()).unwrap_err();
        assert!(matches!(err, BigDiffError::SameInputRoots { .. }));

        // Missing input root.
        let missing = base.path().join("nope");
        let err = validate_roots(&missing, target.path(), out.path()).unwrap_err();
        assert!(matches!(err, BigDiffError::InputNotADirectory { .. }));
    }
}
