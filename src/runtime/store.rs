// ABOUTME: File-backed sandbox store implementing SandboxOps.
// ABOUTME: Keeps one directory per container holding its status.json.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use nix::errno::Errno;
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::sandbox::{
    SandboxError, SandboxHandle, SandboxOps, SandboxPhase, SandboxStatus, SandboxSummary,
};
use crate::types::ContainerId;

pub const STATUS_FILENAME: &str = "status.json";

/// How often a stopping process is polled for exit.
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Sandbox store rooted at a state directory.
///
/// Layout: `<root>/<container-id>/status.json`.
#[derive(Debug, Clone)]
pub struct LocalSandboxStore {
    root: PathBuf,
    stop_signal: Signal,
    stop_timeout: Duration,
}

impl LocalSandboxStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            stop_signal: Signal::SIGKILL,
            stop_timeout: Duration::from_secs(10),
        }
    }

    /// Signal sent to a live process when its sandbox is stopped.
    pub fn stop_signal(mut self, signal: Signal) -> Self {
        self.stop_signal = signal;
        self
    }

    /// How long to wait for the process to exit after signalling it.
    pub fn stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = timeout;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn sandbox_dir(&self, id: &ContainerId) -> PathBuf {
        self.root.join(id.as_str())
    }

    fn status_path(&self, id: &ContainerId) -> PathBuf {
        self.sandbox_dir(id).join(STATUS_FILENAME)
    }

    /// Persist a status record, creating the sandbox directory if needed.
    ///
    /// The record is written to a temporary file and renamed into place so a
    /// concurrent reader never observes a partial write.
    pub async fn save_status(&self, status: &SandboxStatus) -> Result<(), SandboxError> {
        let dir = self.sandbox_dir(&status.id);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| SandboxError::io(format!("failed to create {}", dir.display()), e))?;

        let json = serde_json::to_vec_pretty(status).map_err(|e| SandboxError::Corrupt {
            id: status.id.to_string(),
            source: e,
        })?;

        let path = self.status_path(&status.id);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| SandboxError::io(format!("failed to write {}", tmp.display()), e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| SandboxError::io(format!("failed to replace {}", path.display()), e))?;

        Ok(())
    }

    async fn load_status(&self, id: &ContainerId) -> Result<SandboxStatus, SandboxError> {
        let path = self.status_path(id);
        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SandboxError::NotFound(id.to_string()));
            }
            Err(e) => {
                return Err(SandboxError::io(
                    format!("failed to read {}", path.display()),
                    e,
                ));
            }
        };

        serde_json::from_slice(&content).map_err(|e| SandboxError::Corrupt {
            id: id.to_string(),
            source: e,
        })
    }

    /// Signal the process and wait until the kernel no longer knows it.
    async fn terminate(&self, pid: u32) -> Result<(), SandboxError> {
        let raw = i32::try_from(pid).map_err(|_| SandboxError::Signal {
            pid,
            source: Errno::EINVAL,
        })?;
        let target = Pid::from_raw(raw);

        match kill(target, self.stop_signal) {
            Ok(()) => {}
            Err(Errno::ESRCH) => return Ok(()),
            Err(source) => return Err(SandboxError::Signal { pid, source }),
        }
        debug!(pid, signal = %self.stop_signal, "sent stop signal");

        let deadline = Instant::now() + self.stop_timeout;
        loop {
            match kill(target, None) {
                Err(Errno::ESRCH) => return Ok(()),
                Ok(()) | Err(Errno::EPERM) => {}
                Err(source) => return Err(SandboxError::Signal { pid, source }),
            }

            if Instant::now() >= deadline {
                return Err(SandboxError::StopTimeout {
                    pid,
                    timeout: self.stop_timeout,
                });
            }

            tokio::time::sleep(STOP_POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl SandboxOps for LocalSandboxStore {
    async fn list_sandboxes(&self) -> Result<Vec<SandboxSummary>, SandboxError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(SandboxError::io(
                    format!("failed to read {}", self.root.display()),
                    e,
                ));
            }
        };

        let mut sandboxes = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| SandboxError::io(format!("failed to read {}", self.root.display()), e))?
        {
            let name = entry.file_name();
            let Some(id) = name.to_str().and_then(|n| ContainerId::new(n).ok()) else {
                debug!(entry = ?name, "skipping entry that is not a container ID");
                continue;
            };

            match self.load_status(&id).await {
                Ok(status) => sandboxes.push(status.summary()),
                Err(SandboxError::NotFound(_)) => {
                    debug!(%id, "skipping directory without status");
                }
                Err(e) => warn!(%id, error = %e, "skipping unreadable sandbox"),
            }
        }

        sandboxes.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        Ok(sandboxes)
    }

    async fn fetch_status(&self, id: &ContainerId) -> Result<SandboxStatus, SandboxError> {
        self.load_status(id).await
    }

    async fn stop_sandbox(&self, id: &ContainerId) -> Result<SandboxHandle, SandboxError> {
        let mut status = self.load_status(id).await?;

        if status.phase == SandboxPhase::Stopped {
            debug!(%id, "sandbox already stopped");
            return Ok(status.handle());
        }

        if status.pid != 0 {
            self.terminate(status.pid).await?;
        }

        status.phase = SandboxPhase::Stopped;
        status.pid = 0;
        self.save_status(&status).await?;
        info!(%id, "sandbox stopped");

        Ok(status.handle())
    }

    async fn delete_sandbox(&self, id: &ContainerId) -> Result<(), SandboxError> {
        let dir = self.sandbox_dir(id);
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => {
                info!(%id, "sandbox deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(SandboxError::NotFound(id.to_string()))
            }
            Err(e) => Err(SandboxError::io(
                format!("failed to remove {}", dir.display()),
                e,
            )),
        }
    }
}
