//! Extraction pipeline orchestration.
//!
//! One run is a short-lived batch job: open the datastore read-only, extract
//! the four collections, release the connection, stamp the source file with
//! its digest and, when anything was extracted, write the snapshot and log
//! aggregates. Everything is synchronous and sequential.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::db::Msgstore;
use crate::digest;
use crate::error::{ExtractError, Result};
use crate::logging::OperationTimer;
use crate::models::Snapshot;
use crate::snapshot::{self, SNAPSHOT_FILE_NAME};
use crate::stats::{self, SnapshotStats};

/// Parameters for one extraction run.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Resolved path to the msgstore.db file
    pub datastore: PathBuf,
    /// Directory the snapshot and digest are written into
    pub output_dir: PathBuf,
    /// Ranking size for the most-active-chats aggregate
    pub top_k: usize,
}

/// What one extraction run produced.
#[derive(Debug)]
pub enum ExportOutcome {
    /// Data was extracted; snapshot and digest are on disk.
    Written {
        /// Path of the written snapshot
        snapshot_path: PathBuf,
        /// Path of the written digest file
        digest_path: PathBuf,
        /// Aggregates computed over the snapshot
        stats: SnapshotStats,
    },
    /// Nothing extractable; the digest is still stamped.
    NoData {
        /// Path of the written digest file
        digest_path: PathBuf,
    },
}

/// Resolve a user-supplied path to the datastore file.
///
/// Accepts either the `com.whatsapp` folder (the file is expected under
/// `databases/msgstore.db` inside it) or a direct path to the file.
pub fn resolve_datastore_path(input: &Path) -> Result<PathBuf> {
    let candidate = if input.is_dir() {
        input.join("databases").join("msgstore.db")
    } else {
        input.to_path_buf()
    };

    if candidate.is_file() {
        Ok(candidate)
    } else {
        Err(ExtractError::open(candidate, "file not found"))
    }
}

/// Run the full extraction pipeline.
///
/// A query failure after a successful open is all-or-nothing: the cause is
/// logged and the run yields empty collections, never partial ones. The
/// digest is computed and written regardless, after the connection has been
/// released.
pub fn run_export(options: &ExportOptions) -> Result<ExportOutcome> {
    let timer = OperationTimer::new("export");

    // Scoped acquisition: the handle drops at the end of this block, before
    // the digest pass re-reads the file.
    let extracted = {
        let store = Msgstore::open(&options.datastore)?;
        match store.extract_all() {
            Ok(snapshot) => snapshot,
            Err(ExtractError::DataAccess(err)) => {
                error!("Datastore query failed, yielding empty collections: {err}");
                Snapshot::default()
            }
            Err(err) => return Err(err),
        }
    };

    std::fs::create_dir_all(&options.output_dir)?;

    let digest = digest::sha256_file(&options.datastore)?;
    let digest_path = digest::write_digest_file(&digest, &options.output_dir, &options.datastore)?;
    info!(
        "Saved datastore digest {} to {}",
        digest,
        digest_path.display()
    );

    if extracted.is_empty() {
        warn!("No data found in {}", options.datastore.display());
        timer.finish();
        return Ok(ExportOutcome::NoData { digest_path });
    }

    let snapshot_path = options.output_dir.join(SNAPSHOT_FILE_NAME);
    snapshot::write_snapshot(&extracted, &snapshot_path)?;

    let stats = stats::aggregate(&extracted, options.top_k);
    info!(
        num_chats = stats.num_chats,
        num_contacts = stats.num_contacts,
        num_messages = stats.num_messages,
        num_revoked = extracted.revoked.len(),
        "Extraction complete"
    );

    timer.finish();
    Ok(ExportOutcome::Written {
        snapshot_path,
        digest_path,
        stats,
    })
}
