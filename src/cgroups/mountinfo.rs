// ABOUTME: Locates the host cgroup mount by parsing /proc/self/mountinfo.
// ABOUTME: Detects whether controllers live in v1 hierarchies or the unified tree.

use std::path::{Path, PathBuf};

use snafu::{OptionExt, ResultExt};

use super::error::{MountInfoError, NoCgroupMountSnafu, ReadSnafu};
use super::resolve::CgroupLayout;

pub const MOUNTINFO_PATH: &str = "/proc/self/mountinfo";

/// Where cgroups are mounted on this host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CgroupMount {
    pub root: PathBuf,
    pub layout: CgroupLayout,
}

/// Read and parse the mountinfo file at `path`.
pub fn discover(path: &Path) -> Result<CgroupMount, MountInfoError> {
    let content = std::fs::read_to_string(path).context(ReadSnafu { path })?;
    parse(&content)
}

/// Find the cgroup mount in mountinfo content.
///
/// Any v1 `cgroup` mount wins over a `cgroup2` mount (hybrid hosts keep
/// their controllers in v1); its root is the parent of the controller
/// mount point.
fn parse(content: &str) -> Result<CgroupMount, MountInfoError> {
    let mut unified = None;

    for line in content.lines() {
        let Some((mount_point, fs_type)) = parse_line(line) else {
            continue;
        };

        match fs_type {
            "cgroup" => {
                if let Some(root) = Path::new(mount_point).parent() {
                    return Ok(CgroupMount {
                        root: root.to_path_buf(),
                        layout: CgroupLayout::V1,
                    });
                }
            }
            "cgroup2" if unified.is_none() => unified = Some(PathBuf::from(mount_point)),
            _ => {}
        }
    }

    unified
        .map(|root| CgroupMount {
            root,
            layout: CgroupLayout::Unified,
        })
        .context(NoCgroupMountSnafu)
}

/// Extract (mount point, filesystem type) from one mountinfo line.
///
/// Format: `id parent major:minor root mount-point options [optional...] -
/// fstype source super-options`.
fn parse_line(line: &str) -> Option<(&str, &str)> {
    let (pre, post) = line.split_once(" - ")?;
    let mount_point = pre.split_whitespace().nth(4)?;
    let fs_type = post.split_whitespace().next()?;
    Some((mount_point, fs_type))
}
