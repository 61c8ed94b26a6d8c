// ABOUTME: Cgroup path resolution and reclamation.
// ABOUTME: Resolver, cleanup executor, and host mount discovery.

mod cleanup;
mod error;
mod mountinfo;
mod paths;
mod resolve;

pub use cleanup::{CgroupFs, CleanupOutcome, HostCgroupFs, cleanup};
pub use error::{MountInfoError, RemovalError, ResolutionError};
pub use mountinfo::{CgroupMount, MOUNTINFO_PATH, discover};
pub use paths::ResourcePathSet;
pub use resolve::{
    CgroupLayout, CgroupResolver, Controller, LazyResolver, PathResolver, declared_controllers,
};
