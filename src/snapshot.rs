//! JSON snapshot sink and loader.
//!
//! The snapshot is a single JSON object with the four collection keys,
//! pretty-printed for portability. Writes go through a temp sibling and a
//! rename, so a failed serialization never leaves a partial snapshot
//! committed.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::models::Snapshot;

/// Default snapshot file name.
pub const SNAPSHOT_FILE_NAME: &str = "whatsapp_data.json";

/// Serialize the snapshot to `path` atomically.
pub fn write_snapshot(snapshot: &Snapshot, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("json.tmp");
    if let Err(err) = write_pretty(snapshot, &tmp_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }
    fs::rename(&tmp_path, path)?;

    info!("Snapshot written to {}", path.display());
    Ok(())
}

fn write_pretty(snapshot: &Snapshot, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, snapshot)?;
    writer.flush()?;
    Ok(())
}

/// Load a previously written snapshot.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}
