use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

const CHUNK_SIZE: usize = 64 * 1024;

/// Compute the SHA-256 hash of a file's contents using streaming I/O.
pub fn compute_sha256(path: &Path) -> std::io::Result<String> {
    let file = std::fs::File::open(path)?;
    let mut reader = std::io::BufReader::with_capacity(CHUNK_SIZE, file);
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; CHUNK_SIZE];

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Digest a model file for reconciliation.
/// I/O failures are logged and yield `None`; the caller drops the file.
pub fn digest_model(path: &Path) -> Option<String> {
    match compute_sha256(path) {
        Ok(digest) => Some(digest),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to hash model file, skipping");
            None
        }
    }
}
