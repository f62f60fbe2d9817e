//! Output materialization: planning and execution
//!
//! Materialization is split into two halves so dry-run and real runs share
//! one decision path. [`plan_actions`] turns the verdict sequence into a
//! list of [`Action`]s with final destination names already resolved
//! (including collision numbering); [`execute_plan`] then applies the list
//! to disk. A dry run stops after planning.
//!
//! Collision avoidance: destination names are claimed in plan order. When a
//! name is already claimed by this run or exists on disk, a ` (n)` counter
//! is inserted before the final suffix extension (`name (1).modified`,
//! `name (2).modified`, ...) until a free name is found. Plan order is the
//! comparator's lexicographic traversal order, which makes the numbering
//! deterministic across runs.

use crate::comment::CommentProfile;
use crate::diff::annotate;
use crate::error::{BigDiffError, Result};
use crate::types::{Action, ActionKind, Comparison, Counters, EntryKind, SkipReason, Verdict};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Suffix applied to paths present only in the target tree
pub const NEW_SUFFIX: &str = "new";
/// Suffix applied to paths present only in the base tree
pub const DELETED_SUFFIX: &str = "deleted";
/// Suffix applied to paths that differ between the trees
pub const MODIFIED_SUFFIX: &str = "modified";

/// Tracks destination names claimed during one planning pass
#[derive(Debug, Default)]
struct NameClaims {
    claimed: HashSet<PathBuf>,
}

impl NameClaims {
    /// Claim a free variant of `wanted`, numbering on collision
    fn claim(&mut self, wanted: PathBuf) -> PathBuf {
        let mut candidate = wanted.clone();
        let mut n = 0;
        while self.claimed.contains(&candidate) || candidate.exists() {
            n += 1;
            candidate = numbered_variant(&wanted, n);
        }
        self.claimed.insert(candidate.clone());
        candidate
    }
}

/// Insert ` (n)` before the final extension of the file name
///
/// `a.py.modified` becomes `a.py (1).modified`; a name without any dot
/// becomes `name (1)`.
fn numbered_variant(path: &Path, n: u32) -> PathBuf {
    let name = path.file_name().map(|s| s.to_string_lossy()).unwrap_or_default();
    let numbered = match name.rfind('.') {
        Some(idx) => format!("{} ({}).{}", &name[..idx], n, &name[idx + 1..]),
        None => format!("{} ({})", name, n),
    };
    path.with_file_name(numbered)
}

/// Append an artifact suffix to the final path component
fn with_suffix(out_root: &Path, rel: &Path, suffix: &str) -> PathBuf {
    let dest = out_root.join(rel);
    let name = dest.file_name().map(|s| s.to_string_lossy()).unwrap_or_default();
    dest.with_file_name(format!("{name}.{suffix}"))
}

/// NOTE file body for a modified file whose diff was skipped
fn skip_note(reason: SkipReason, base_source: &Path, target_source: &Path, size: u64) -> String {
    format!(
        "Line-level diffing was skipped for this file.\n\
         Reason: {}\n\
         Base source (A): {}\n\
         Target source (B): {}\n\
         Target size: {} bytes\n\
         Strategy: verbatim copy of the target as '.{}'.\n",
        reason.as_str(),
        base_source.display(),
        target_source.display(),
        size,
        MODIFIED_SUFFIX,
    )
}

/// Turn the verdict sequence into a concrete, collision-free action plan
///
/// No writes happen here; the only I/O is reading metadata for NOTE files
/// and checking on-disk name collisions under the output root. The
/// returned counters cover every verdict kind; `bytes_written` stays zero
/// until execution.
pub fn plan_actions(
    comparisons: &[Comparison],
    base_root: &Path,
    target_root: &Path,
    out_root: &Path,
) -> Result<(Vec<Action>, Counters)> {
    let mut actions = Vec::new();
    let mut counters = Counters::default();
    let mut claims = NameClaims::default();

    for comparison in comparisons {
        let rel = &comparison.entry.rel;
        match &comparison.verdict {
            Verdict::Unchanged => {
                counters.unchanged += 1;
            }
            Verdict::New => {
                let dest = claims.claim(with_suffix(out_root, rel, NEW_SUFFIX));
                let kind = match comparison.entry.kind {
                    EntryKind::File => {
                        counters.new_files += 1;
                        ActionKind::CopyFile
                    }
                    EntryKind::Directory => {
                        counters.new_dirs += 1;
                        ActionKind::CopyTree
                    }
                };
                actions.push(Action {
                    kind,
                    source: target_root.join(rel),
                    dest,
                    verdict: comparison.verdict.clone(),
                    rel: rel.clone(),
                });
            }
            Verdict::Deleted => {
                let dest = claims.claim(with_suffix(out_root, rel, DELETED_SUFFIX));
                let kind = match comparison.entry.kind {
                    EntryKind::File => {
                        counters.deleted_files += 1;
                        ActionKind::CopyFile
                    }
                    EntryKind::Directory => {
                        counters.deleted_dirs += 1;
                        ActionKind::CopyTree
                    }
                };
                actions.push(Action {
                    kind,
                    source: base_root.join(rel),
                    dest,
                    verdict: comparison.verdict.clone(),
                    rel: rel.clone(),
                });
            }
            Verdict::Modified { skip, script, .. } => {
                let dest = claims.claim(with_suffix(out_root, rel, MODIFIED_SUFFIX));
                let base_source = base_root.join(rel);
                let target_source = target_root.join(rel);
                let kind = match (skip, script) {
                    (None, Some(script)) => {
                        counters.modified_text += 1;
                        let profile = CommentProfile::for_path(rel);
                        ActionKind::WriteAnnotated {
                            content: annotate(script, &profile),
                        }
                    }
                    (reason, _) => {
                        // Either an explicit skip, or a Modified verdict
                        // constructed without a script; both fall back to
                        // the verbatim-copy-plus-note path.
                        counters.modified_skipped += 1;
                        let reason = (*reason).unwrap_or(SkipReason::Binary);
                        let size = fs::metadata(&target_source)?.len();
                        let mut note_name = dest
                            .file_name()
                            .map(|s| s.to_string_lossy().into_owned())
                            .unwrap_or_default();
                        note_name.push_str(".NOTE.txt");
                        let note_dest = claims.claim(dest.with_file_name(note_name));
                        ActionKind::CopyWithNote {
                            note_dest,
                            note: skip_note(reason, &base_source, &target_source, size),
                        }
                    }
                };
                actions.push(Action {
                    kind,
                    source: target_source,
                    dest,
                    verdict: comparison.verdict.clone(),
                    rel: rel.clone(),
                });
            }
        }
    }

    debug!(
        actions = actions.len(),
        unchanged = counters.unchanged,
        "planned materialization"
    );
    Ok((actions, counters))
}

/// Apply a plan to disk
///
/// Actions run sequentially in plan order. The first I/O failure aborts
/// the run and is propagated to the caller, so partial output is always
/// reported as an error rather than silently returned.
///
/// # Returns
///
/// Total bytes written to the output tree.
pub fn execute_plan(actions: &[Action]) -> Result<u64> {
    let mut bytes_written = 0u64;
    for action in actions {
        trace!(dest = %action.dest.display(), "materializing");
        ensure_parent(&action.dest)?;
        match &action.kind {
            ActionKind::CopyFile => {
                bytes_written += fs::copy(&action.source, &action.dest)?;
            }
            ActionKind::CopyTree => {
                bytes_written += copy_tree(&action.source, &action.dest)?;
            }
            ActionKind::WriteAnnotated { content } => {
                fs::write(&action.dest, content)?;
                bytes_written += content.len() as u64;
            }
            ActionKind::CopyWithNote { note_dest, note } => {
                bytes_written += fs::copy(&action.source, &action.dest)?;
                fs::write(note_dest, note)?;
                bytes_written += note.len() as u64;
            }
        }
    }
    Ok(bytes_written)
}

/// Copy a directory subtree verbatim
///
/// Contents keep their original names beneath the (already suffixed)
/// destination head. Symlinks are skipped, matching the scanner.
fn copy_tree(source: &Path, dest: &Path) -> Result<u64> {
    let mut bytes = 0u64;
    fs::create_dir_all(dest)?;
    for entry in WalkDir::new(source).follow_links(false) {
        let entry = entry.map_err(|e| match e.into_io_error() {
            Some(io) => BigDiffError::Io(io),
            None => BigDiffError::Io(std::io::Error::other("walk error")),
        })?;
        let rel = match entry.path().strip_prefix(source) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel,
            _ => continue,
        };
        let target = dest.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            ensure_parent(&target)?;
            bytes += fs::copy(entry.path(), &target)?;
        }
    }
    Ok(bytes)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_variant() {
        assert_eq!(
            numbered_variant(Path::new("/out/a.py.modified"), 1),
            Path::new("/out/a.py (1).modified")
        );
        assert_eq!(
            numbered_variant(Path::new("/out/a.py.modified"), 2),
            Path::new("/out/a.py (2).modified")
        );
        assert_eq!(
            numbered_variant(Path::new("/out/plain"), 1),
            Path::new("/out/plain (1)")
        );
    }

    #[test]
    fn test_with_suffix() {
        assert_eq!(
            with_suffix(Path::new("/out"), Path::new("dir/a.py"), MODIFIED_SUFFIX),
            Path::new("/out/dir/a.py.modified")
        );
        assert_eq!(
            with_suffix(Path::new("/out"), Path::new("sub"), DELETED_SUFFIX),
            Path::new("/out/sub.deleted")
        );
    }

    #[test]
    fn test_claims_number_in_order() {
        let mut claims = NameClaims::default();
        // Nonexistent path so only in-run claims collide.
        let wanted = PathBuf::from("/nonexistent-bigdiff-test/a.txt.new");
        let first = claims.claim(wanted.clone());
        let second = claims.claim(wanted.clone());
        let third = claims.claim(wanted);
        assert_eq!(first, Path::new("/nonexistent-bigdiff-test/a.txt.new"));
        assert_eq!(second, Path::new("/nonexistent-bigdiff-test/a.txt (1).new"));
        assert_eq!(third, Path::new("/nonexistent-bigdiff-test/a.txt (2).new"));
    }

    #[test]
    fn test_claims_avoid_existing_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let existing = dir.path().join("a.txt.new");
        fs::write(&existing, "occupied").unwrap();

        let mut claims = NameClaims::default();
        let resolved = claims.claim(existing);
        assert_eq!(resolved, dir.path().join("a.txt (1).new"));
    }

    #[test]
    fn test_skip_note_content() {
        let note = skip_note(
            SkipReason::Oversized,
            Path::new("/base/big.dat"),
            Path::new("/target/big.dat"),
            123456,
        );
        assert!(note.contains("Reason: oversized"));
        assert!(note.contains("/base/big.dat"));
        assert!(note.contains("/target/big.dat"));
        assert!(note.contains("123456 bytes"));
    }
}
