//! Integrity stamping of the source datastore.
//!
//! The digest proves a snapshot corresponds to an unmodified source file.
//! It is computed independently of the extraction queries, over a freshly
//! opened handle, and streamed in fixed-size chunks so multi-gigabyte
//! datastores never load into memory.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::Result;

/// Read granularity for hashing.
pub const DIGEST_CHUNK_SIZE: usize = 8192;

/// Compute the SHA-256 digest of a file's full byte content.
///
/// Opens its own handle: hashing must start at byte zero regardless of what
/// other components have already read from the same file.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; DIGEST_CHUNK_SIZE];

    loop {
        let read = file.read(&mut buf)?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }

    let digest = hex::encode(hasher.finalize());
    debug!("Computed digest {} for {}", digest, path.display());
    Ok(digest)
}

/// Persist a digest next to the snapshot, named after the source file
/// (e.g. `msgstore.db.sha256`).
///
/// The file holds only the bare hexadecimal string, no trailing structure.
pub fn write_digest_file(digest: &str, output_dir: &Path, source: &Path) -> Result<PathBuf> {
    let file_name = source
        .file_name()
        .map_or_else(|| "msgstore.db.sha256".to_string(), |name| {
            format!("{}.sha256", name.to_string_lossy())
        });

    let path = output_dir.join(file_name);
    let mut file = File::create(&path)?;
    file.write_all(digest.as_bytes())?;
    Ok(path)
}
