//! Binary versus text classification
//!
//! Classification reads a bounded chunk from the start of the file and
//! applies a byte-level heuristic: a NUL byte, or a high ratio of control
//! bytes outside the usual whitespace set, marks the file binary. The
//! heuristic is deliberately simple; false positives and negatives are
//! accepted, and the only contract is determinism for identical bytes.

use crate::error::Result;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Bytes sniffed from the start of each file
const SNIFF_LEN: usize = 8192;

/// Fraction of suspicious bytes above which content is treated as binary
const BINARY_RATIO: f64 = 0.30;

/// Check whether a content chunk appears to be binary
///
/// Only the first 8KB is considered. Empty content is text.
pub fn is_binary_content(content: &[u8]) -> bool {
    let chunk = &content[..content.len().min(SNIFF_LEN)];
    if chunk.is_empty() {
        return false;
    }
    if chunk.contains(&0) {
        return true;
    }

    let suspicious = chunk
        .iter()
        .filter(|&&b| b < 0x20 && b != b'\t' && b != b'\n' && b != b'\r')
        .count();
    (suspicious as f64 / chunk.len() as f64) > BINARY_RATIO
}

/// Sniff a file on disk and decide whether it is binary
///
/// Performs a single bounded read; the rest of the file is never touched.
pub fn is_probably_binary(path: &Path) -> Result<bool> {
    let mut file = File::open(path)?;
    let mut buffer = [0u8; SNIFF_LEN];
    let mut filled = 0;
    // read() may return short counts; fill the sniff window until EOF.
    loop {
        let n = file.read(&mut buffer[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
        if filled == SNIFF_LEN {
            break;
        }
    }
    Ok(is_binary_content(&buffer[..filled]))
}
