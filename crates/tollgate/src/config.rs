//! Gate configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Name of the on-disk license file inside the application directory.
pub const LICENSE_FILE_NAME: &str = "license.txt";

fn default_app_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_refresh_interval() -> u64 {
    3600
}

fn default_refresh_timeout() -> u64 {
    10
}

/// Gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Directory searched for `license.txt`.
    #[serde(default = "default_app_dir")]
    pub app_dir: PathBuf,

    /// License material override. Takes precedence over the on-disk file.
    #[serde(default)]
    pub license: Option<String>,

    /// Force the community verdict, bypassing all license logic.
    #[serde(default)]
    pub disabled: bool,

    /// Remote feature endpoint. Refresh is off when unset.
    #[serde(default)]
    pub refresh_url: Option<String>,

    /// Refresh period in seconds.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// Per-fetch timeout in seconds.
    #[serde(default = "default_refresh_timeout")]
    pub refresh_timeout_secs: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            app_dir: default_app_dir(),
            license: None,
            disabled: false,
            refresh_url: None,
            refresh_interval_secs: default_refresh_interval(),
            refresh_timeout_secs: default_refresh_timeout(),
        }
    }
}

impl GateConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `TOLLGATE_LICENSE` | License material override |
    /// | `TOLLGATE_DISABLE` | Force the community verdict (`1`/`true`) |
    /// | `TOLLGATE_APP_DIR` | Directory containing `license.txt` |
    /// | `TOLLGATE_REFRESH_URL` | Remote feature endpoint |
    /// | `TOLLGATE_REFRESH_INTERVAL` | Refresh period in seconds (default: 3600) |
    /// | `TOLLGATE_REFRESH_TIMEOUT` | Per-fetch timeout in seconds (default: 10) |
    pub fn from_env() -> Self {
        Self {
            app_dir: std::env::var("TOLLGATE_APP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_app_dir()),
            license: std::env::var("TOLLGATE_LICENSE").ok(),
            disabled: std::env::var("TOLLGATE_DISABLE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            refresh_url: std::env::var("TOLLGATE_REFRESH_URL").ok(),
            refresh_interval_secs: std::env::var("TOLLGATE_REFRESH_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_refresh_interval),
            refresh_timeout_secs: std::env::var("TOLLGATE_REFRESH_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_refresh_timeout),
        }
    }

    /// Set the application directory.
    pub fn with_app_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.app_dir = dir.into();
        self
    }

    /// Set the license material override.
    pub fn with_license(mut self, material: impl Into<String>) -> Self {
        self.license = Some(material.into());
        self
    }

    /// Force the community verdict.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the remote feature endpoint.
    pub fn with_refresh_url(mut self, url: impl Into<String>) -> Self {
        self.refresh_url = Some(url.into());
        self
    }
}
