//! Utility functions shared across the BigDiff pipeline
//!
//! Covers human-readable size parsing and formatting, end-of-line
//! normalization, and best-effort text reading for the differ.

use crate::error::{BigDiffError, Result};
use std::fs;
use std::path::Path;

/// Parse a human-readable size string into a byte count
///
/// Accepts decimal units (`5MB`, `200k`, `3g`), binary units (`10MiB`,
/// `1GiB`), a bare `b` suffix, or a plain number interpreted as raw bytes.
/// Matching is case-insensitive and tolerant of surrounding whitespace.
///
/// # Errors
///
/// Returns [`BigDiffError::InvalidSize`] when the numeric part does not
/// parse or the string is empty.
///
/// # Example
///
/// ```
/// use bigdiff::utils::parse_size;
///
/// assert_eq!(parse_size("5MB").unwrap(), 5_000_000);
/// assert_eq!(parse_size("8MiB").unwrap(), 8 * 1024 * 1024);
/// assert_eq!(parse_size("4096").unwrap(), 4096);
/// ```
pub fn parse_size(s: &str) -> Result<u64> {
    let trimmed = s.trim().to_ascii_lowercase();
    if trimmed.is_empty() {
        return Err(BigDiffError::InvalidSize(s.to_string()));
    }

    // Longest suffixes first so "mib" is not consumed as "b".
    const UNITS: &[(&str, u64)] = &[
        ("kib", 1 << 10),
        ("mib", 1 << 20),
        ("gib", 1 << 30),
        ("kb", 1_000),
        ("mb", 1_000_000),
        ("gb", 1_000_000_000),
        ("k", 1_000),
        ("m", 1_000_000),
        ("g", 1_000_000_000),
        ("b", 1),
    ];

    for (suffix, multiplier) in UNITS {
        if let Some(number) = trimmed.strip_suffix(suffix) {
            let value: f64 = number
                .trim()
                .parse()
                .map_err(|_| BigDiffError::InvalidSize(s.to_string()))?;
            // f64 parsing also accepts "nan" and "inf"; neither is a size.
            if !value.is_finite() || value < 0.0 {
                return Err(BigDiffError::InvalidSize(s.to_string()));
            }
            return Ok((value * *multiplier as f64) as u64);
        }
    }

    trimmed
        .parse::<u64>()
        .map_err(|_| BigDiffError::InvalidSize(s.to_string()))
}

/// Format a byte count for display
///
/// Values below 1024 are shown as whole bytes; larger values get two
/// decimal places and a binary-unit suffix.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", size as u64, UNITS[unit_idx])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

/// Fold `\r\n` and lone `\r` sequences to `\n`
pub fn normalize_eol(text: &str) -> String {
    // Single pass; a bare CR not followed by LF also becomes LF.
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    out
}

/// Read a file as text on a best-effort basis
///
/// Invalid UTF-8 sequences are replaced rather than treated as errors, so
/// mostly-text files with stray bytes can still be diffed. Applies EOL
/// normalization when requested.
pub fn read_text_lossy(path: &Path, normalize: bool) -> Result<String> {
    let bytes = fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes).into_owned();
    if normalize {
        Ok(normalize_eol(&text))
    } else {
        Ok(text)
    }
}
