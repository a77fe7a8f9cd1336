// Runtime settings. Everything has a default; environment variables
// override individual values.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_IMAGE_API_URL: &str = "https://cataas.com";
pub const DEFAULT_DISK_API_URL: &str = "https://cloud-api.yandex.net/v1/disk";
pub const DEFAULT_FOLDER: &str = "pd-fpy_138";
pub const TOKEN_VAR: &str = "DISK_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub image_api_url: String,
    pub disk_api_url: String,
    pub folder: String,
    pub manifest_path: PathBuf,
    pub log_file: PathBuf,
    pub poll_interval: Duration,
    /// `None` polls until the upload shows up, however long that takes.
    pub poll_max_wait: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            image_api_url: DEFAULT_IMAGE_API_URL.into(),
            disk_api_url: DEFAULT_DISK_API_URL.into(),
            folder: DEFAULT_FOLDER.into(),
            manifest_path: PathBuf::from("content.json"),
            log_file: PathBuf::from("program.log"),
            poll_interval: Duration::from_millis(1000),
            poll_max_wait: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup (the environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();
        let poll_interval = match lookup("DISK_POLL_INTERVAL_MS") {
            Some(v) => Duration::from_millis(
                v.trim()
                    .parse()
                    .with_context(|| format!("Invalid DISK_POLL_INTERVAL_MS: {}", v))?,
            ),
            None => defaults.poll_interval,
        };
        let poll_max_wait = match lookup("DISK_POLL_MAX_WAIT_SECS") {
            Some(v) => Some(Duration::from_secs(
                v.trim()
                    .parse()
                    .with_context(|| format!("Invalid DISK_POLL_MAX_WAIT_SECS: {}", v))?,
            )),
            None => None,
        };
        Ok(Settings {
            image_api_url: lookup("IMAGE_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.image_api_url),
            disk_api_url: lookup("DISK_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.disk_api_url),
            folder: lookup("DISK_FOLDER").unwrap_or(defaults.folder),
            manifest_path: lookup("MANIFEST_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.manifest_path),
            log_file: lookup("LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
            poll_interval,
            poll_max_wait,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(settings(&[]).unwrap(), Settings::default());
    }

    #[test]
    fn overrides_are_applied() {
        let s = settings(&[
            ("DISK_API_URL", "http://localhost:9000/disk/"),
            ("DISK_FOLDER", "g1"),
            ("DISK_POLL_INTERVAL_MS", "250"),
            ("DISK_POLL_MAX_WAIT_SECS", "60"),
        ])
        .unwrap();
        assert_eq!(s.disk_api_url, "http://localhost:9000/disk");
        assert_eq!(s.folder, "g1");
        assert_eq!(s.poll_interval, Duration::from_millis(250));
        assert_eq!(s.poll_max_wait, Some(Duration::from_secs(60)));
    }

    #[test]
    fn bad_number_is_rejected() {
        assert!(settings(&[("DISK_POLL_INTERVAL_MS", "soon")]).is_err());
    }
}
