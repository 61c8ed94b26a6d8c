// ABOUTME: Cgroup error types with SNAFU context selectors.
// ABOUTME: Resolution, removal, and mount discovery failures.

use snafu::Snafu;
use std::path::{Path, PathBuf};

/// Failure deriving cgroup paths from an OCI configuration.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ResolutionError {
    #[snafu(display("cgroups path {path:?} escapes the cgroup root"))]
    EscapesRoot { path: String },

    #[snafu(display("cgroups path {path:?} names the cgroup root itself"))]
    RootPath { path: String },

    #[snafu(display(
        "cgroup mount at {destination} has type {}, expected bind",
        mount_type.as_deref().unwrap_or("none")
    ))]
    NotBindMount {
        destination: String,
        mount_type: Option<String>,
    },

    #[snafu(display("cannot locate cgroup mount: {source}"))]
    Mount { source: MountInfoError },
}

/// A cgroup path that could not be removed.
///
/// Paths before it in the set were removed; paths after it were not tried.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[snafu(display("failed to remove cgroup path {}: {source}", path.display()))]
pub struct RemovalError {
    path: PathBuf,
    source: std::io::Error,
}

impl RemovalError {
    /// The path whose removal failed.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Failure locating the host cgroup mount.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum MountInfoError {
    #[snafu(display("failed to read {}: {source}", path.display()))]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("no cgroup filesystem is mounted"))]
    NoCgroupMount,
}
