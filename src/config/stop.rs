// ABOUTME: Sandbox stop configuration.
// ABOUTME: Defines the signal sent to a live process and how long to wait for it.

use nix::sys::signal::Signal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct StopConfig {
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    #[serde(default = "default_signal")]
    pub signal: String,
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_signal() -> String {
    "SIGKILL".to_string()
}

impl Default for StopConfig {
    fn default() -> Self {
        StopConfig {
            timeout: default_timeout(),
            signal: default_signal(),
        }
    }
}

impl StopConfig {
    /// Parse the configured signal. Accepts `SIGKILL` and `KILL` forms.
    pub fn signal(&self) -> Result<Signal> {
        let name = self.signal.trim().to_ascii_uppercase();
        let name = if name.starts_with("SIG") {
            name
        } else {
            format!("SIG{name}")
        };

        Signal::from_str(&name)
            .map_err(|_| Error::InvalidConfig(format!("unknown stop signal: {}", self.signal)))
    }
}
