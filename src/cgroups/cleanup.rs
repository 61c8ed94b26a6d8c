// ABOUTME: Removes reclaimed cgroup paths from the host filesystem.
// ABOUTME: Tolerates missing paths and stops at the first unremovable one.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use snafu::ResultExt;
use tracing::{debug, info};

use super::error::{RemovalError, RemovalSnafu};
use super::paths::ResourcePathSet;

/// Filesystem access used to remove cgroup paths.
#[async_trait]
pub trait CgroupFs: Send + Sync {
    /// Recursively remove `path`. A missing path fails with `NotFound`.
    async fn remove_all(&self, path: &Path) -> std::io::Result<()>;
}

/// Removes cgroup directories on the host.
///
/// Directories are removed bottom-up with rmdir. Control files inside a
/// cgroupfs directory cannot be unlinked (EPERM) and disappear with their
/// directory, so that error is left for the rmdir to report. Symlinks are
/// unlinked, never followed.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostCgroupFs;

#[async_trait]
impl CgroupFs for HostCgroupFs {
    async fn remove_all(&self, path: &Path) -> std::io::Result<()> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || remove_tree(&path))
            .await
            .map_err(std::io::Error::other)?
    }
}

/// Remove `path` and everything below it.
///
/// Only the initial lookup reports `NotFound`; entries vanishing while the
/// walk runs are already gone and are skipped.
fn remove_tree(path: &Path) -> std::io::Result<()> {
    let metadata = std::fs::symlink_metadata(path)?;
    if !metadata.is_dir() {
        return ignore_missing(std::fs::remove_file(path));
    }

    remove_contents(path)?;
    ignore_missing(std::fs::remove_dir(path))
}

fn remove_contents(dir: &Path) -> std::io::Result<()> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(e),
        };
        // DirEntry::file_type does not follow symlinks.
        let is_dir = match entry.file_type() {
            Ok(file_type) => file_type.is_dir(),
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(e),
        };

        let child = entry.path();
        if is_dir {
            remove_contents(&child)?;
            ignore_missing(std::fs::remove_dir(&child))?;
        } else {
            match std::fs::remove_file(&child) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::PermissionDenied => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
    }

    Ok(())
}

fn ignore_missing(result: std::io::Result<()>) -> std::io::Result<()> {
    match result {
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// What a cleanup pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupOutcome {
    pub removed: Vec<PathBuf>,
    pub already_absent: Vec<PathBuf>,
}

/// Remove every path in the set, in order.
///
/// An empty set touches nothing. A path that is already gone counts as
/// removed. The first failure aborts the rest of the list and names the
/// offending path; earlier removals are kept.
pub async fn cleanup<F>(fs: &F, paths: &ResourcePathSet) -> Result<CleanupOutcome, RemovalError>
where
    F: CgroupFs + ?Sized,
{
    let mut outcome = CleanupOutcome::default();

    if paths.is_empty() {
        info!("cgroup files not removed because no cgroups path was declared");
        return Ok(outcome);
    }

    for path in paths {
        match fs.remove_all(path).await {
            Ok(()) => {
                debug!(path = %path.display(), "removed cgroup path");
                outcome.removed.push(path.clone());
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "cgroup path already absent");
                outcome.already_absent.push(path.clone());
            }
            Err(e) => return Err(e).context(RemovalSnafu { path }),
        }
    }

    Ok(outcome)
}
