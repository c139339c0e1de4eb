use std::time::Duration;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::config::{EnvConfig, defaults};

/// Read from `REMINDERS_CLIENT_BASE_URL` and `REMINDERS_CLIENT_REQUEST_TIMEOUT_SECS`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        <Self as EnvConfig>::from_env()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::DEFAULT_CLIENT_BASE_URL.to_string(),
            request_timeout_secs: defaults::DEFAULT_CLIENT_TIMEOUT_SECS as u64,
        }
    }
}

impl EnvConfig for ClientConfig {
    const PREFIX: &'static str = "REMINDERS_CLIENT";

    fn validate(&self) -> Result<()> {
        let base_url = self.base_url.trim().to_ascii_lowercase();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            bail!("client.base_url must start with http:// or https://");
        }
        if self.request_timeout_secs == 0 {
            bail!("client.request_timeout_secs must be > 0");
        }
        Ok(())
    }
}
