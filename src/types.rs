//! Core types for tree comparison and output planning
//!
//! This module defines the data model shared by the comparator and the
//! materializer: path entries, per-path verdicts, line-level edit scripts,
//! planned output actions, and the counters returned to the caller.
//!
//! All types here are plain data. They are created during one comparison
//! run and discarded afterwards; nothing is persisted between runs.

use std::path::PathBuf;

/// Kind of filesystem entry a relative path refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Directory,
}

/// A relative path in the comparison universe
///
/// Paths are relative to the respective tree root, case-preserving, and
/// rendered with `/` separators. An entry exists iff the path is present in
/// at least one tree and is not excluded by the ignore filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    /// Path relative to the tree root
    pub rel: PathBuf,
    /// File or directory
    pub kind: EntryKind,
    /// Present under the base root
    pub in_base: bool,
    /// Present under the target root
    pub in_target: bool,
}

impl PathEntry {
    /// Render the relative path with `/` separators regardless of platform
    pub fn display_rel(&self) -> String {
        self.rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Why line-level diffing was skipped for a modified file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// One side was classified as binary content
    Binary,
    /// One side exceeds the configured maximum text size
    Oversized,
}

impl SkipReason {
    /// Human-readable reason used in NOTE files and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Binary => "binary",
            SkipReason::Oversized => "oversized",
        }
    }
}

/// Tag carried by each line of an edit script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffTag {
    /// Line present in both base and target
    Context,
    /// Line present only in the base file
    Removed,
    /// Line present only in the target file
    Added,
}

/// One line of an edit script
///
/// `content` keeps the original line terminator, so concatenating the
/// `Removed` and `Context` lines in order reproduces the base text exactly,
/// and `Added` plus `Context` reproduces the target text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    /// Classification of this line
    pub tag: DiffTag,
    /// Raw line content including any trailing newline
    pub content: String,
}

/// Ordered line-level edit script between two text contents
pub type EditScript = Vec<DiffLine>;

/// Classification assigned to one path of the comparison universe
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Content-identical in both trees; produces no output
    Unchanged,
    /// Present only in the target tree
    New,
    /// Present only in the base tree
    Deleted,
    /// Present in both trees with differing content digests
    Modified {
        /// Whether either side was classified as binary
        binary: bool,
        /// Set when line-level diffing was skipped
        skip: Option<SkipReason>,
        /// Edit script for non-skipped text files
        script: Option<EditScript>,
    },
}

impl Verdict {
    /// Short label used in logs and dry-run listings
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Unchanged => "UNCHANGED",
            Verdict::New => "NEW",
            Verdict::Deleted => "DELETED",
            Verdict::Modified { .. } => "MODIFIED",
        }
    }
}

/// One comparator result: a path entry plus its verdict
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// The path this verdict applies to
    pub entry: PathEntry,
    /// The verdict assigned to it
    pub verdict: Verdict,
}

/// Concrete output operation planned for one verdict
///
/// Payloads are resolved at planning time so dry-run output and the real
/// run describe exactly the same filesystem operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionKind {
    /// Copy a single file verbatim (`.new` / `.deleted` artifacts)
    CopyFile,
    /// Copy a whole subtree verbatim beneath a suffixed head directory
    CopyTree,
    /// Write an annotated edit script (`.modified` artifact)
    WriteAnnotated {
        /// Fully rendered annotated file body
        content: String,
    },
    /// Copy the target verbatim and write a sibling NOTE file (skipped diff)
    CopyWithNote {
        /// Destination of the sibling NOTE file
        note_dest: PathBuf,
        /// NOTE file body explaining the skip
        note: String,
    },
}

/// A planned materialization step
///
/// Actions are produced in deterministic traversal order with their final
/// destination names already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    /// What to do
    pub kind: ActionKind,
    /// Absolute source path (base tree for deletions, target tree otherwise)
    pub source: PathBuf,
    /// Absolute destination path under the output root
    pub dest: PathBuf,
    /// Verdict that produced this action
    pub verdict: Verdict,
    /// Path relative to the tree roots, for reporting
    pub rel: PathBuf,
}

/// Counts accumulated over one comparison run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counters {
    /// Files identical in both trees (omitted from output)
    pub unchanged: usize,
    /// Files copied with a `.new` suffix
    pub new_files: usize,
    /// Files copied with a `.deleted` suffix
    pub deleted_files: usize,
    /// Modified text files written as annotated diffs
    pub modified_text: usize,
    /// Modified files copied verbatim because diffing was skipped
    pub modified_skipped: usize,
    /// Subtree heads copied with a `.new` suffix
    pub new_dirs: usize,
    /// Subtree heads copied with a `.deleted` suffix
    pub deleted_dirs: usize,
    /// Total bytes written to the output tree
    pub bytes_written: u64,
}

impl Counters {
    /// Total number of artifacts planned or written
    pub fn total_artifacts(&self) -> usize {
        self.new_files
            + self.deleted_files
            + self.modified_text
            + self.modified_skipped
            + self.new_dirs
            + self.deleted_dirs
    }
}

/// Result of one comparison run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Per-verdict counts and bytes written
    pub counters: Counters,
    /// The planned (and, outside dry-run, executed) actions
    pub actions: Vec<Action>,
    /// Whether this run was a dry run (nothing written)
    pub dry_run: bool,
}
