//! Line-level diff computation and annotation
//!
//! The differ aligns two text contents line by line using a dynamic
//! programming Longest Common Subsequence (LCS), then emits an ordered
//! [`EditScript`] of context/removed/added lines. Lines keep their
//! terminators, so the script round-trips: concatenating removed plus
//! context lines reproduces the base text exactly, and added plus context
//! lines reproduces the target text.
//!
//! The annotation step renders the script into a single file body using a
//! [`CommentProfile`], keeping the result syntactically valid for the
//! file's language: removed lines become `DELETED:` comments, added lines
//! get a trailing `NEW` marker, context lines pass through unchanged.

use crate::comment::CommentProfile;
use crate::types::{DiffLine, DiffTag, EditScript};

/// Compute the edit script between two text contents
///
/// Deterministic: identical inputs always yield the identical script.
/// Empty-to-nonempty yields an all-added script, nonempty-to-empty all
/// removed, and identical content all context.
pub fn compute_edit_script(base: &str, target: &str) -> EditScript {
    let base_lines: Vec<&str> = split_lines(base);
    let target_lines: Vec<&str> = split_lines(target);

    // Degenerate sides short-circuit the DP table entirely.
    if base_lines.is_empty() {
        return target_lines
            .iter()
            .map(|line| DiffLine {
                tag: DiffTag::Added,
                content: (*line).to_string(),
            })
            .collect();
    }
    if target_lines.is_empty() {
        return base_lines
            .iter()
            .map(|line| DiffLine {
                tag: DiffTag::Removed,
                content: (*line).to_string(),
            })
            .collect();
    }

    let lcs = compute_lcs(&base_lines, &target_lines);
    lcs_to_script(&lcs, &base_lines, &target_lines)
}

/// Render an edit script with the given comment profile
pub fn annotate(script: &EditScript, profile: &CommentProfile) -> String {
    let mut out = String::new();
    for line in script {
        match line.tag {
            DiffTag::Context => out.push_str(&line.content),
            DiffTag::Removed => out.push_str(&profile.deleted_line(&line.content)),
            DiffTag::Added => out.push_str(&profile.new_line(&line.content)),
        }
    }
    out
}

/// Split text into lines keeping terminators attached
fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// Compute the longest common subsequence of two line slices
///
/// Classic O(mn) dynamic programming with backtracking. Lines compare by
/// full content including terminators, so a final line that gained a
/// newline counts as changed.
fn compute_lcs(base: &[&str], target: &[&str]) -> Vec<(usize, usize)> {
    let m = base.len();
    let n = target.len();

    let mut dp = vec![vec![0usize; n + 1]; m + 1];
    for i in 1..=m {
        for j in 1..=n {
            if base[i - 1] == target[j - 1] {
                dp[i][j] = dp[i - 1][j - 1] + 1;
            } else {
                dp[i][j] = dp[i - 1][j].max(dp[i][j - 1]);
            }
        }
    }

    let mut lcs = Vec::new();
    let mut i = m;
    let mut j = n;
    while i > 0 && j > 0 {
        if base[i - 1] == target[j - 1] {
            lcs.push((i - 1, j - 1));
            i -= 1;
            j -= 1;
        } else if dp[i - 1][j] > dp[i][j - 1] {
            i -= 1;
        } else {
            j -= 1;
        }
    }

    lcs.reverse();
    lcs
}

/// Expand an LCS into the full ordered edit script
///
/// Between consecutive matches, removals are emitted before additions so
/// the annotated output reads old-then-new at each edit region.
fn lcs_to_script(lcs: &[(usize, usize)], base: &[&str], target: &[&str]) -> EditScript {
    let mut script = Vec::with_capacity(base.len().max(target.len()));
    let mut base_idx = 0;
    let mut target_idx = 0;

    for &(lcs_base, lcs_target) in lcs {
        while base_idx < lcs_base {
            script.push(DiffLine {
                tag: DiffTag::Removed,
                content: base[base_idx].to_string(),
            });
            base_idx += 1;
        }
        while target_idx < lcs_target {
            script.push(DiffLine {
                tag: DiffTag::Added,
                content: target[target_idx].to_string(),
            });
            target_idx += 1;
        }
        script.push(DiffLine {
            tag: DiffTag::Context,
            content: base[base_idx].to_string(),
        });
        base_idx += 1;
        target_idx += 1;
    }

    // Tail past the last match.
    while base_idx < base.len() {
        script.push(DiffLine {
            tag: DiffTag::Removed,
            content: base[base_idx].to_string(),
        });
        base_idx += 1;
    }
    while target_idx < target.len() {
        script.push(DiffLine {
            tag: DiffTag::Added,
            content: target[target_idx].to_string(),
        });
        target_idx += 1;
    }

    script
}
