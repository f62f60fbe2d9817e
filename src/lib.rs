//! # BigDiff - Annotated difference trees for directory pairs
//!
//! BigDiff compares two directory trees - a "base" (before) and a "target"
//! (after) - and materializes a third tree containing only the differences,
//! annotated so a human can audit exactly what changed without an external
//! diff viewer.
//!
//! ## Overview
//!
//! Every path under either tree is classified as unchanged, new, deleted,
//! or modified:
//!
//! - **Unchanged** files produce no output at all.
//! - **New** paths are copied with a `.new` suffix on the final component.
//! - **Deleted** paths are copied with a `.deleted` suffix, so removed
//!   content remains inspectable.
//! - **Modified** text files become a single `.modified` file embedding a
//!   line-level diff: removed lines rendered as `DELETED:` comments in the
//!   file's own comment syntax, added lines tagged with a trailing `NEW`
//!   marker, context lines untouched. The annotated file stays parseable
//!   in its original language.
//! - **Modified** binary or oversized files are copied verbatim with a
//!   `.modified` suffix plus a sibling `NOTE.txt` explaining the skip.
//!
//! Directory subtrees present in only one tree are carried as a unit: the
//! head directory gets the suffix and its contents are copied verbatim
//! beneath it. Name collisions in the output are resolved with a
//! deterministic ` (n)` counter.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bigdiff::{bigdiff, Options};
//! use std::path::Path;
//!
//! # fn main() -> bigdiff::Result<()> {
//! let options = Options::new()
//!     .ignore_patterns(vec!["*.log".to_string()])
//!     .normalize_eol(true);
//!
//! let report = bigdiff(
//!     Path::new("./before"),
//!     Path::new("./after"),
//!     Path::new("./differences"),
//!     &options,
//! )?;
//!
//! println!(
//!     "{} new, {} deleted, {} modified",
//!     report.counters.new_files,
//!     report.counters.deleted_files,
//!     report.counters.modified_text + report.counters.modified_skipped,
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Dry Runs
//!
//! With [`Options::dry_run`] set, the full plan is computed - including
//! final collision-free destination names - but nothing is written; the
//! returned [`RunReport`] lists every planned action.
//!
//! ## Guarantees
//!
//! - The input trees are never written to; the tool is read-only with
//!   respect to both inputs.
//! - The output root must not be nested inside either input; the run fails
//!   fast with zero writes otherwise.
//! - Verdicts and destination names are deterministic: identical inputs
//!   yield identical reports across runs.

pub mod classify;
pub mod comment;
pub mod compare;
pub mod diff;
pub mod error;
pub mod filter;
pub mod hash;
pub mod materialize;
pub mod options;
pub mod types;
pub mod utils;

pub use comment::CommentProfile;
pub use compare::{validate_roots, TreeComparator};
pub use error::{BigDiffError, Result};
pub use filter::PathFilter;
pub use materialize::{execute_plan, plan_actions};
pub use options::Options;
pub use types::{
    Action, ActionKind, Comparison, Counters, DiffLine, DiffTag, EditScript, EntryKind,
    PathEntry, RunReport, SkipReason, Verdict,
};

use std::fs;
use std::path::Path;
use tracing::info;

/// Compare two trees and materialize the difference tree
///
/// This is the top-level entry point: it validates the three roots,
/// compares `base` against `target`, plans the output under `output`, and
/// - unless `options.dry_run` is set - writes it.
///
/// # Errors
///
/// - Input validation failures ([`BigDiffError::InputNotADirectory`],
///   [`BigDiffError::SameInputRoots`], [`BigDiffError::OutputInsideInput`])
///   are reported before any filesystem write.
/// - The first I/O error during materialization aborts the run; partial
///   output is never reported as success.
pub fn bigdiff(base: &Path, target: &Path, output: &Path, options: &Options) -> Result<RunReport> {
    validate_roots(base, target, output)?;

    let comparator = TreeComparator::new(base, target, options);
    let comparisons = comparator.compare()?;

    let (actions, mut counters) = plan_actions(&comparisons, base, target, output)?;

    if !options.dry_run {
        fs::create_dir_all(output)?;
        counters.bytes_written = execute_plan(&actions)?;
    }

    info!(
        artifacts = counters.total_artifacts(),
        unchanged = counters.unchanged,
        bytes = counters.bytes_written,
        dry_run = options.dry_run,
        "comparison complete"
    );

    Ok(RunReport {
        counters,
        actions,
        dry_run: options.dry_run,
    })
}
