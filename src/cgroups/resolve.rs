// ABOUTME: Derives host cgroup paths from a container's OCI configuration.
// ABOUTME: One path per declared controller on v1, a single path on unified.

use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use snafu::{ResultExt, ensure};

use super::error::{
    EscapesRootSnafu, MountInfoError, MountSnafu, NotBindMountSnafu, ResolutionError,
    RootPathSnafu,
};
use super::paths::ResourcePathSet;
use crate::oci::{OciConfig, Resources};

/// How controllers are arranged under the cgroup root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CgroupLayout {
    /// One hierarchy per controller (`<root>/<controller>/...`).
    V1,
    /// Single cgroup v2 hierarchy (`<root>/...`).
    Unified,
}

/// A cgroup v1 controller a container can declare resources for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Controller {
    Devices,
    Memory,
    Cpu,
    Pids,
    Blkio,
    Hugetlb,
    NetCls,
}

impl Controller {
    /// Directory name of the controller hierarchy.
    pub fn as_str(&self) -> &'static str {
        match self {
            Controller::Devices => "devices",
            Controller::Memory => "memory",
            Controller::Cpu => "cpu",
            Controller::Pids => "pids",
            Controller::Blkio => "blkio",
            Controller::Hugetlb => "hugetlb",
            Controller::NetCls => "net_cls",
        }
    }
}

/// Controllers declared by a resource section, in reclamation order.
pub fn declared_controllers(resources: &Resources) -> Vec<Controller> {
    let declared = [
        (!resources.devices.is_empty(), Controller::Devices),
        (resources.memory.is_some(), Controller::Memory),
        (resources.cpu.is_some(), Controller::Cpu),
        (resources.pids.is_some(), Controller::Pids),
        (resources.block_io.is_some(), Controller::Blkio),
        (!resources.hugepage_limits.is_empty(), Controller::Hugetlb),
        (resources.network.is_some(), Controller::NetCls),
    ];

    declared
        .into_iter()
        .filter_map(|(present, controller)| present.then_some(controller))
        .collect()
}

/// Derives the cgroup paths an OCI configuration declares.
pub trait PathResolver: Send + Sync {
    fn resolve(&self, config: &OciConfig) -> Result<ResourcePathSet, ResolutionError>;
}

/// Resolves cgroup paths relative to a host cgroup mount.
#[derive(Debug, Clone)]
pub struct CgroupResolver {
    root: PathBuf,
    layout: CgroupLayout,
}

impl CgroupResolver {
    pub fn new(root: impl Into<PathBuf>, layout: CgroupLayout) -> Self {
        Self {
            root: root.into(),
            layout,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn layout(&self) -> CgroupLayout {
        self.layout
    }

    /// Every cgroup path the configuration declares.
    ///
    /// A configuration without a cgroups path, without resources, or with
    /// an empty resource section yields an empty set.
    pub fn resolve(&self, config: &OciConfig) -> Result<ResourcePathSet, ResolutionError> {
        let Some((cgroups_path, controllers)) = declared_cgroups(config) else {
            return Ok(ResourcePathSet::empty());
        };

        let relative = confine(cgroups_path)?;
        let base = self.mount_base(config, cgroups_path)?;

        let paths = match self.layout {
            CgroupLayout::Unified => vec![base.join(&relative)],
            CgroupLayout::V1 => controllers
                .iter()
                .map(|c| base.join(c.as_str()).join(&relative))
                .collect(),
        };

        Ok(ResourcePathSet::from(paths))
    }

    /// Directory the controller hierarchies hang off.
    ///
    /// An absolute cgroups path may be served through a mount of the cgroup
    /// root inside the config; that mount has to be a bind mount.
    fn mount_base(
        &self,
        config: &OciConfig,
        cgroups_path: &str,
    ) -> Result<PathBuf, ResolutionError> {
        if !Path::new(cgroups_path).is_absolute() {
            return Ok(self.root.clone());
        }

        let Some(mount) = config
            .mounts
            .iter()
            .find(|m| Path::new(&m.destination) == self.root)
        else {
            return Ok(self.root.clone());
        };

        ensure!(
            mount.mount_type.as_deref() == Some("bind"),
            NotBindMountSnafu {
                destination: mount.destination.clone(),
                mount_type: mount.mount_type.clone(),
            }
        );

        Ok(PathBuf::from(&mount.destination))
    }
}

/// The cgroups path and its controllers, if the configuration uses any.
fn declared_cgroups(config: &OciConfig) -> Option<(&str, Vec<Controller>)> {
    let cgroups_path = config.cgroups_path()?;
    let controllers = declared_controllers(config.resources()?);
    (!controllers.is_empty()).then_some((cgroups_path, controllers))
}

impl PathResolver for CgroupResolver {
    fn resolve(&self, config: &OciConfig) -> Result<ResourcePathSet, ResolutionError> {
        CgroupResolver::resolve(self, config)
    }
}

type MountLookup = Box<dyn Fn() -> Result<CgroupResolver, MountInfoError> + Send + Sync>;

/// Resolver that locates the cgroup mount the first time it is needed.
///
/// A failed lookup is not cached and is retried on the next call.
pub struct LazyResolver {
    lookup: MountLookup,
    resolver: OnceLock<CgroupResolver>,
}

impl LazyResolver {
    pub fn new<F>(lookup: F) -> Self
    where
        F: Fn() -> Result<CgroupResolver, MountInfoError> + Send + Sync + 'static,
    {
        Self {
            lookup: Box::new(lookup),
            resolver: OnceLock::new(),
        }
    }

    fn get(&self) -> Result<&CgroupResolver, ResolutionError> {
        if let Some(resolver) = self.resolver.get() {
            return Ok(resolver);
        }
        let resolver = (self.lookup)().context(MountSnafu)?;
        Ok(self.resolver.get_or_init(|| resolver))
    }
}

impl std::fmt::Debug for LazyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyResolver")
            .field("resolver", &self.resolver.get())
            .finish_non_exhaustive()
    }
}

impl PathResolver for LazyResolver {
    fn resolve(&self, config: &OciConfig) -> Result<ResourcePathSet, ResolutionError> {
        if declared_cgroups(config).is_none() {
            return Ok(ResourcePathSet::empty());
        }
        self.get()?.resolve(config)
    }
}

/// Turn a cgroups path into a relative path that cannot leave its base.
fn confine(cgroups_path: &str) -> Result<PathBuf, ResolutionError> {
    let mut relative = PathBuf::new();

    for component in Path::new(cgroups_path).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir | Component::Prefix(_) => {
                return EscapesRootSnafu {
                    path: cgroups_path,
                }
                .fail();
            }
        }
    }

    ensure!(
        !relative.as_os_str().is_empty(),
        RootPathSnafu {
            path: cgroups_path
        }
    );

    Ok(relative)
}
