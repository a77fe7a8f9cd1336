// Upload completion poller.
//
// A remote-fetch upload returns before the file exists. The poller keeps
// probing the destination at a fixed cadence: not-found means still
// pending, found means done, anything else is fatal (the probe returns an
// error). No backoff; no cap unless `max_wait` is set.

use anyhow::Result;
use indicatif::ProgressBar;
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

/// Outcome of a metadata probe on a remote path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    Present,
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPoller {
    interval: Duration,
    max_wait: Option<Duration>,
}

impl UploadPoller {
    /// Unbounded poller with a fixed delay between checks.
    pub fn new(interval: Duration) -> Self {
        UploadPoller {
            interval,
            max_wait: None,
        }
    }

    pub fn with_max_wait(mut self, max_wait: Option<Duration>) -> Self {
        self.max_wait = max_wait;
        self
    }

    /// Block until `probe` reports the resource present. Returns the number
    /// of probes issued.
    pub fn wait_until_available<F>(&self, path: &str, progress: &ProgressBar, mut probe: F) -> Result<u32>
    where
        F: FnMut() -> Result<ResourceState>,
    {
        let started = Instant::now();
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match probe()? {
                ResourceState::Present => {
                    info!("'{}' is available after {} check(s)", path, attempt);
                    return Ok(attempt);
                }
                ResourceState::Missing => {
                    info!("Upload of '{}' still in progress (check {})", path, attempt);
                    progress.set_message(format!("Waiting for {} (check {})", path, attempt));
                    progress.tick();
                }
            }
            if let Some(max_wait) = self.max_wait {
                if started.elapsed() >= max_wait {
                    anyhow::bail!(
                        "Upload of '{}' did not complete within {}s ({} checks)",
                        path,
                        max_wait.as_secs(),
                        attempt
                    );
                }
            }
            thread::sleep(self.interval);
        }
    }
}
