//! BLAKE3 hashing of installed package payloads
//!
//! The manifest records one hash per package directory so `list --verify` can
//! detect payloads edited or truncated after installation.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use blake3::Hasher;
use walkdir::WalkDir;

use crate::error::{Result, fs};

/// Hash prefix for BLAKE3 hashes
pub const HASH_PREFIX: &str = "blake3:";

fn feed_file(hasher: &mut Hasher, path: &Path) -> Result<()> {
    let read_failed =
        |e: std::io::Error| fs::read_failed(path.display().to_string(), e.to_string());

    let mut reader = BufReader::new(File::open(path).map_err(read_failed)?);
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = reader.read(&mut buffer).map_err(read_failed)?;
        if bytes_read == 0 {
            return Ok(());
        }
        hasher.update(&buffer[..bytes_read]);
    }
}

/// Calculate the BLAKE3 hash of a directory's contents
///
/// Files are visited in sorted relative-path order; each contributes its
/// forward-slash relative path and its bytes, so renames change the hash too.
pub fn hash_directory(path: &Path) -> Result<String> {
    if !path.is_dir() {
        return Err(fs::not_found(path.display().to_string()));
    }

    let mut files: Vec<_> = WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();
    files.sort();

    let mut hasher = Hasher::new();
    for file_path in files {
        let relative = file_path
            .strip_prefix(path)
            .unwrap_or(&file_path)
            .to_string_lossy()
            .replace('\\', "/");
        hasher.update(relative.as_bytes());
        hasher.update(b"\0");
        feed_file(&mut hasher, &file_path)?;
        hasher.update(b"\0");
    }

    Ok(format!("{HASH_PREFIX}{}", hasher.finalize().to_hex()))
}

/// Compare hashes, tolerating a missing prefix on either side
pub fn verify_hash(expected: &str, actual: &str) -> bool {
    let strip = |h: &str| h.strip_prefix(HASH_PREFIX).unwrap_or(h).to_string();
    strip(expected) == strip(actual)
}
