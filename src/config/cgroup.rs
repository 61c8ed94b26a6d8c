// ABOUTME: Cgroup mount configuration.
// ABOUTME: Explicit root and layout, or discovery from mountinfo.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cgroups::{
    self, CgroupLayout, CgroupResolver, LazyResolver, MOUNTINFO_PATH, MountInfoError,
};

/// Which cgroup layout to assume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutSetting {
    /// Detect from mountinfo.
    #[default]
    Auto,
    V1,
    Unified,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CgroupConfig {
    /// Cgroup mount root; discovered when absent.
    #[serde(default)]
    pub root: Option<PathBuf>,

    #[serde(default)]
    pub layout: LayoutSetting,
}

impl CgroupConfig {
    /// Resolver that reads the host's mountinfo on first use, if needed.
    pub fn resolver(&self) -> LazyResolver {
        let config = self.clone();
        LazyResolver::new(move || config.resolver_with(Path::new(MOUNTINFO_PATH)))
    }

    /// Build a resolver, reading mountinfo from `mountinfo` if the root or
    /// layout is not configured.
    pub fn resolver_with(&self, mountinfo: &Path) -> Result<CgroupResolver, MountInfoError> {
        match (&self.root, self.layout) {
            (Some(root), LayoutSetting::V1) => Ok(CgroupResolver::new(root, CgroupLayout::V1)),
            (Some(root), LayoutSetting::Unified) => {
                Ok(CgroupResolver::new(root, CgroupLayout::Unified))
            }
            (root, setting) => {
                let mount = cgroups::discover(mountinfo)?;
                let layout = match setting {
                    LayoutSetting::Auto => mount.layout,
                    LayoutSetting::V1 => CgroupLayout::V1,
                    LayoutSetting::Unified => CgroupLayout::Unified,
                };
                let root = root.clone().unwrap_or(mount.root);
                Ok(CgroupResolver::new(root, layout))
            }
        }
    }
}
