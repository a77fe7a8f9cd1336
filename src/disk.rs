// Cloud disk client. Wraps the resource endpoints of the storage API:
// metadata probe, folder creation, remote-fetch upload and folder listing.

use crate::credentials::Credential;
use crate::poll::{ResourceState, UploadPoller};
use crate::transport::{ApiRequest, ApiResponse, Method, Transport};
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{error, info, warn};

/// One entry of a folder listing.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DiskItem {
    pub name: String,
    pub size: u64,
}

#[derive(Deserialize, Debug)]
struct ResourceListing {
    #[serde(rename = "_embedded", default)]
    embedded: Option<EmbeddedItems>,
}

#[derive(Deserialize, Debug)]
struct EmbeddedItems {
    #[serde(default)]
    items: Vec<DiskItem>,
}

pub struct DiskClient<T> {
    transport: T,
    base_url: String,
    poller: UploadPoller,
    progress: ProgressBar,
}

fn failure(what: &str, res: &ApiResponse) -> anyhow::Error {
    error!("{}: {}, {}", what, res.status.as_u16(), res.body);
    anyhow::anyhow!("{}: {}, {}", what, res.status.as_u16(), res.body)
}

impl<T: Transport> DiskClient<T> {
    pub fn new(transport: T, base_url: impl Into<String>, poller: UploadPoller) -> Self {
        DiskClient {
            transport,
            base_url: base_url.into(),
            poller,
            progress: ProgressBar::hidden(),
        }
    }

    /// Spinner ticked while waiting for an upload to land. Nothing is drawn
    /// until the upload has been accepted; it is cleared however the wait ends.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    fn resources_url(&self) -> String {
        format!("{}/resources", self.base_url)
    }

    fn resource_request(&self, method: Method, token: &Credential, path: &str) -> ApiRequest {
        ApiRequest::new(method, self.resources_url())
            .query("path", path)
            .authorization(token.header_value())
    }

    /// Probe a path: 200 is present, 404 is missing, anything else fails.
    pub fn resource_state(&self, token: &Credential, path: &str) -> Result<ResourceState> {
        let req = self.resource_request(Method::Get, token, path);
        let res = self
            .transport
            .execute(&req)
            .context("Failed to send resource request")?;
        match res.status {
            StatusCode::OK => Ok(ResourceState::Present),
            StatusCode::NOT_FOUND => Ok(ResourceState::Missing),
            _ => Err(failure(&format!("Resource check for '{}' failed", path), &res)),
        }
    }

    /// Make sure `folder` exists, creating it when the probe says 404.
    pub fn ensure_folder(&self, token: &Credential, folder: &str) -> Result<()> {
        info!("Checking folder '{}'...", folder);
        if self.resource_state(token, folder)? == ResourceState::Missing {
            warn!("Folder '{}' not found, creating it...", folder);
            let req = self.resource_request(Method::Put, token, folder);
            let res = self
                .transport
                .execute(&req)
                .context("Failed to send folder creation request")?;
            if res.status != StatusCode::CREATED {
                return Err(failure("Folder creation failed", &res));
            }
        }
        info!("Folder '{}' is available.", folder);
        Ok(())
    }

    /// Ask the disk to fetch `source_url` into `remote_path`, replacing
    /// whatever is there. Returns once the fetch is queued (201/202).
    pub fn start_remote_upload(
        &self,
        token: &Credential,
        local_filename: &str,
        remote_path: &str,
        source_url: &str,
    ) -> Result<()> {
        info!("Starting upload of '{}' to the disk...", local_filename);
        let req = ApiRequest::new(Method::Post, format!("{}/upload", self.resources_url()))
            .query("path", remote_path)
            .query("url", source_url)
            .query("overwrite", "true")
            .authorization(token.header_value());
        let res = self
            .transport
            .execute(&req)
            .context("Failed to send upload request")?;
        if !matches!(res.status, StatusCode::CREATED | StatusCode::ACCEPTED) {
            return Err(failure("Upload failed", &res));
        }
        info!("Upload of '{}' accepted ({}).", local_filename, res.status.as_u16());
        Ok(())
    }

    /// Start a remote-fetch upload and block until the file is readable.
    pub fn upload_from_url(
        &self,
        token: &Credential,
        local_filename: &str,
        remote_path: &str,
        source_url: &str,
    ) -> Result<()> {
        self.start_remote_upload(token, local_filename, remote_path, source_url)?;
        self.progress.set_message(format!("Uploading {}...", local_filename));
        let waited = self
            .poller
            .wait_until_available(remote_path, &self.progress, || {
                self.resource_state(token, remote_path)
            });
        self.progress.finish_and_clear();
        waited?;
        info!("File '{}' uploaded to the disk.", local_filename);
        Ok(())
    }

    /// Items of `folder` in the order the API returns them.
    pub fn list_folder(&self, token: &Credential, folder: &str) -> Result<Vec<DiskItem>> {
        info!("Listing files in folder '{}'...", folder);
        let req = self.resource_request(Method::Get, token, folder);
        let res = self
            .transport
            .execute(&req)
            .context("Failed to send listing request")?;
        if res.status != StatusCode::OK {
            return Err(failure("Listing failed", &res));
        }
        let listing: ResourceListing = res.json().context("Parsing folder listing")?;
        Ok(listing.embedded.map(|e| e.items).unwrap_or_default())
    }
}
