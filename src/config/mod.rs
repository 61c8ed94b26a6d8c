// ABOUTME: Configuration types and loading for reclaim.
// ABOUTME: Handles YAML parsing, config discovery, and environment overrides.

mod cgroup;
mod stop;

pub use cgroup::{CgroupConfig, LayoutSetting};
pub use stop::StopConfig;

use crate::cgroups::LazyResolver;
use crate::error::{Error, Result};
use crate::runtime::LocalSandboxStore;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// System-wide config file, used when present.
pub const CONFIG_PATH: &str = "/etc/reclaim/config.yml";
/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "RECLAIM_CONFIG";
/// Environment variable overriding the state root.
pub const ROOT_ENV: &str = "RECLAIM_ROOT";
pub const DEFAULT_ROOT: &str = "/run/reclaim";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory holding one subdirectory per managed container.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    #[serde(default)]
    pub cgroup: CgroupConfig,

    #[serde(default)]
    pub stop: StopConfig,
}

fn default_root() -> PathBuf {
    PathBuf::from(DEFAULT_ROOT)
}

impl Default for Config {
    fn default() -> Self {
        Config {
            root: default_root(),
            cgroup: CgroupConfig::default(),
            stop: StopConfig::default(),
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ConfigNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        Self::from_yaml(&content)
    }

    /// Locate and load the configuration.
    ///
    /// Order: `explicit`, then `$RECLAIM_CONFIG`, then [`CONFIG_PATH`] if it
    /// exists, else defaults. `$RECLAIM_ROOT` overrides the loaded root.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        let config = if let Some(path) = explicit {
            Self::load(path)?
        } else if let Some(path) = env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            Self::load(Path::new(&path))?
        } else if Path::new(CONFIG_PATH).exists() {
            Self::load(Path::new(CONFIG_PATH))?
        } else {
            Self::default()
        };

        Ok(config.with_env_overrides())
    }

    fn with_env_overrides(mut self) -> Self {
        if let Some(root) = env::var_os(ROOT_ENV).filter(|r| !r.is_empty()) {
            self.root = PathBuf::from(root);
        }
        self
    }

    fn validate(&self) -> Result<()> {
        if self.root.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("root cannot be empty".to_string()));
        }
        self.stop.signal()?;
        Ok(())
    }

    /// Sandbox store for the configured root and stop policy.
    pub fn sandbox_store(&self) -> Result<LocalSandboxStore> {
        Ok(LocalSandboxStore::new(&self.root)
            .stop_signal(self.stop.signal()?)
            .stop_timeout(self.stop.timeout))
    }

    /// Cgroup resolver; mount discovery is deferred until paths are needed.
    pub fn cgroup_resolver(&self) -> LazyResolver {
        self.cgroup.resolver()
    }
}
