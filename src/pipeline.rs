// The whole run: image -> folder -> upload (+ wait) -> manifest.
// Strictly sequential; the first error aborts everything after it.

use crate::credentials::Credential;
use crate::disk::DiskClient;
use crate::image::ImageClient;
use crate::manifest::{write_manifest, ManifestEntry};
use crate::transport::Transport;
use anyhow::Result;
use std::path::Path;
use tracing::info;

pub struct Pipeline<T> {
    images: ImageClient<T>,
    disk: DiskClient<T>,
}

impl<T: Transport> Pipeline<T> {
    pub fn new(images: ImageClient<T>, disk: DiskClient<T>) -> Self {
        Pipeline { images, disk }
    }

    /// Run every step for one caption and return what was written to the
    /// manifest.
    pub fn run(
        &self,
        token: &Credential,
        caption: &str,
        folder: &str,
        manifest_path: &Path,
    ) -> Result<Vec<ManifestEntry>> {
        let image = self.images.fetch(caption)?;
        self.disk.ensure_folder(token, folder)?;

        let remote_path = format!("{}/{}", folder, image.filename);
        self.disk
            .upload_from_url(token, &image.filename, &remote_path, &image.url)?;

        let entries: Vec<ManifestEntry> = self
            .disk
            .list_folder(token, folder)?
            .into_iter()
            .map(ManifestEntry::from)
            .collect();
        write_manifest(manifest_path, &entries)?;
        info!("File details saved to {}.", manifest_path.display());
        Ok(entries)
    }
}
