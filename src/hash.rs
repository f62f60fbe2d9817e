//! Content-identity hashing
//!
//! Two files are considered content-identical iff their SHA-256 digests
//! match; collision probability is treated as cryptographically negligible.
//! When EOL normalization is enabled, `\r\n` and lone `\r` fold to `\n`
//! inside the hash stream, so files differing only in line endings hash
//! equal. Directories are never hashed.

use crate::error::Result;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Hash a file's content using SHA-256
///
/// Streams the file in 8KB chunks so large files never load fully into
/// memory. With `normalize_eol` set, line-ending folding is applied to the
/// stream before hashing; a CR that ends one chunk is resolved against the
/// first byte of the next.
///
/// # Returns
///
/// The digest as a 64-character hexadecimal string.
pub fn hash_file_content(path: &Path, normalize_eol: bool) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    let mut pending_cr = false;

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        let chunk = &buffer[..bytes_read];
        if normalize_eol {
            pending_cr = update_normalized(&mut hasher, chunk, pending_cr);
        } else {
            hasher.update(chunk);
        }
    }
    if pending_cr {
        hasher.update(b"\n");
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Hash arbitrary data using SHA-256
pub fn hash_data(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Feed one chunk into the hasher with CR/CRLF folded to LF
///
/// Returns whether the chunk ended on an unresolved CR.
fn update_normalized(hasher: &mut Sha256, chunk: &[u8], mut pending_cr: bool) -> bool {
    for &byte in chunk {
        if pending_cr {
            // The held-back CR becomes LF; a following LF is swallowed.
            hasher.update(b"\n");
            pending_cr = false;
            if byte == b'\n' {
                continue;
            }
        }
        if byte == b'\r' {
            pending_cr = true;
        } else {
            hasher.update([byte]);
        }
    }
    pending_cr
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_and_hash(dir: &TempDir, name: &str, content: &[u8], normalize: bool) -> String {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        hash_file_content(&path, normalize).unwrap()
    }

    #[test]
    fn test_identical_content_identical_digest() {
        let dir = TempDir::new().unwrap();
        let h1 = write_and_hash(&dir, "a", b"same content\n", false);
        let h2 = write_and_hash(&dir, "b", b"same content\n", false);
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
    }

    #[test]
    fn test_different_content_different_digest() {
        let dir = TempDir::new().unwrap();
        let h1 = write_and_hash(&dir, "a", b"one", false);
        let h2 = write_and_hash(&dir, "b", b"two", false);
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_eol_normalization_folds_crlf() {
        let dir = TempDir::new().unwrap();
        let unix = write_and_hash(&dir, "unix", b"a\nb\nc\n", true);
        let dos = write_and_hash(&dir, "dos", b"a\r\nb\r\nc\r\n", true);
        let mac = write_and_hash(&dir, "mac", b"a\rb\rc\r", true);
        assert_eq!(unix, dos);
        assert_eq!(unix, mac);

        // Without normalization they differ.
        let unix_raw = write_and_hash(&dir, "unix2", b"a\nb\nc\n", false);
        let dos_raw = write_and_hash(&dir, "dos2", b"a\r\nb\r\nc\r\n", false);
        assert_ne!(unix_raw, dos_raw);
    }

    #[test]
    fn test_crlf_split_across_chunks() {
        // 8191 'x' bytes place the CR as the last byte of the first chunk.
        let dir = TempDir::new().unwrap();
        let mut split = vec![b'x'; 8191];
        split.push(b'\r');
        split.push(b'\n');
        split.push(b'y');

        let mut contiguous = vec![b'x'; 8191];
        contiguous.push(b'\n');
        contiguous.push(b'y');

        let h1 = write_and_hash(&dir, "split", &split, true);
        let h2 = write_and_hash(&dir, "contiguous", &contiguous, true);
        assert_eq!(h1, h2);
    }

    #[test]
    fn test_hash_data_matches_file_hash() {
        let dir = TempDir::new().unwrap();
        let file_hash = write_and_hash(&dir, "a", b"payload", false);
        assert_eq!(file_hash, hash_data(b"payload"));
    }
}
