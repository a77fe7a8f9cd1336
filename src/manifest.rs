// Manifest writer: a local JSON snapshot of what a disk folder holds.

use crate::disk::DiskItem;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub file_name: String,
    pub file_size: u64,
}

impl From<DiskItem> for ManifestEntry {
    fn from(item: DiskItem) -> Self {
        ManifestEntry {
            file_name: item.name,
            file_size: item.size,
        }
    }
}

/// Overwrite `path` with `entries` as a pretty-printed JSON array
/// (4-space indent). Entry order is preserved.
pub fn write_manifest(path: &Path, entries: &[ManifestEntry]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create manifest file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut writer, formatter);
    entries
        .serialize(&mut ser)
        .context("Serializing manifest")?;
    writer.flush().context("Writing manifest file")?;
    Ok(())
}
