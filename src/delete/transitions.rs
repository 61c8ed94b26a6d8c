// ABOUTME: State transition methods for container deletion.
// ABOUTME: Each method consumes self and returns the next state on success.

use tracing::{debug, info};

use crate::cgroups::{CgroupFs, PathResolver, cleanup};
use crate::liveness::ProcessProbe;
use crate::oci::{OciConfig, OciTranslator};
use crate::runtime::SandboxOps;

use super::Deletion;
use super::error::DeleteError;
use super::state::{Cleared, Completed, Configured, Deleted, Requested, Stopped, Validated};
use super::validate::validate_container;

// =============================================================================
// Requested -> Validated
// =============================================================================

impl Deletion<Requested> {
    /// Check the container exists and may be deleted.
    ///
    /// # Errors
    ///
    /// `MissingId`, `Registry`, `NotFound` or `InvalidState`. No side
    /// effects happen on failure.
    #[must_use = "deletion state must be used"]
    pub async fn validate<S>(self, sandboxes: &S) -> Result<Deletion<Validated>, DeleteError>
    where
        S: SandboxOps + ?Sized,
    {
        let id = validate_container(sandboxes, self.request.container_id()).await?;
        Ok(Deletion {
            request: self.request,
            state: Validated { id },
        })
    }
}

// =============================================================================
// Validated -> Cleared
// =============================================================================

impl Deletion<Validated> {
    /// Refuse to continue while the container's process is alive.
    ///
    /// A forced deletion passes without consulting the probe. Otherwise the
    /// status is fetched fresh, translated to OCI state, and its pid probed.
    ///
    /// # Errors
    ///
    /// `StillRunning` if the process is alive. `Status`,
    /// `StateTranslation` or `Lookup` if liveness cannot be established;
    /// unknown liveness never counts as stopped.
    #[must_use = "deletion state must be used"]
    pub async fn ensure_stoppable<S, T, P>(
        self,
        sandboxes: &S,
        translator: &T,
        probe: &P,
    ) -> Result<Deletion<Cleared>, DeleteError>
    where
        S: SandboxOps + ?Sized,
        T: OciTranslator + ?Sized,
        P: ProcessProbe + ?Sized,
    {
        let forced = self.is_forced();
        let id = self.state.id;

        if forced {
            debug!(%id, "forced deletion, skipping liveness check");
        } else {
            let status = match sandboxes.fetch_status(&id).await {
                Ok(status) => status,
                Err(source) => return Err(DeleteError::Status { id, source }),
            };

            let state = match translator.state_of(&status) {
                Ok(state) => state,
                Err(source) => return Err(DeleteError::StateTranslation { id, source }),
            };

            match probe.is_running(state.pid) {
                Ok(false) => debug!(%id, pid = state.pid, "container process not running"),
                Ok(true) => {
                    return Err(DeleteError::StillRunning { id, pid: state.pid });
                }
                Err(source) => return Err(DeleteError::Lookup { id, source }),
            }
        }

        Ok(Deletion {
            request: self.request,
            state: Cleared { id },
        })
    }
}

// =============================================================================
// Cleared -> Stopped
// =============================================================================

impl Deletion<Cleared> {
    /// Stop the sandbox backing the container.
    ///
    /// # Errors
    ///
    /// `Stop` if the runtime fails; nothing has been torn down yet.
    #[must_use = "deletion state must be used"]
    pub async fn stop<S>(self, sandboxes: &S) -> Result<Deletion<Stopped>, DeleteError>
    where
        S: SandboxOps + ?Sized,
    {
        let id = self.state.id;
        let handle = match sandboxes.stop_sandbox(&id).await {
            Ok(handle) => handle,
            Err(source) => return Err(DeleteError::Stop { id, source }),
        };

        Ok(Deletion {
            request: self.request,
            state: Stopped { id, handle },
        })
    }
}

// =============================================================================
// Stopped -> Configured
// =============================================================================

impl Deletion<Stopped> {
    /// Capture the OCI configuration from the stopped sandbox.
    ///
    /// This has to happen before the sandbox is deleted: afterwards there is
    /// no record left to derive cgroup paths from.
    ///
    /// # Errors
    ///
    /// `ConfigTranslation` if the configuration cannot be recovered.
    #[must_use = "deletion state must be used"]
    pub fn fetch_config<T>(self, translator: &T) -> Result<Deletion<Configured>, DeleteError>
    where
        T: OciTranslator + ?Sized,
    {
        let Stopped { id, handle } = self.state;
        let config = match translator.config_of(&handle) {
            Ok(config) => config,
            Err(source) => return Err(DeleteError::ConfigTranslation { id, source }),
        };

        Ok(Deletion {
            request: self.request,
            state: Configured { id, config },
        })
    }
}

// =============================================================================
// Configured -> Deleted
// =============================================================================

impl Deletion<Configured> {
    pub fn config(&self) -> &OciConfig {
        &self.state.config
    }

    /// Permanently delete the sandbox.
    ///
    /// # Errors
    ///
    /// `Delete` if the runtime fails. The earlier stop is not undone.
    #[must_use = "deletion state must be used"]
    pub async fn delete_sandbox<S>(self, sandboxes: &S) -> Result<Deletion<Deleted>, DeleteError>
    where
        S: SandboxOps + ?Sized,
    {
        let Configured { id, config } = self.state;
        if let Err(source) = sandboxes.delete_sandbox(&id).await {
            return Err(DeleteError::Delete { id, source });
        }

        Ok(Deletion {
            request: self.request,
            state: Deleted { id, config },
        })
    }
}

// =============================================================================
// Deleted -> Completed
// =============================================================================

impl Deletion<Deleted> {
    /// Resolve and remove the container's cgroup paths.
    ///
    /// # Errors
    ///
    /// `Resolution` or `Removal`. The sandbox stays deleted either way.
    #[must_use = "deletion state must be used"]
    pub async fn reclaim_cgroups<R, F>(
        self,
        resolver: &R,
        fs: &F,
    ) -> Result<Deletion<Completed>, DeleteError>
    where
        R: PathResolver + ?Sized,
        F: CgroupFs + ?Sized,
    {
        let Deleted { id, config } = self.state;

        let paths = match resolver.resolve(&config) {
            Ok(paths) => paths,
            Err(source) => return Err(DeleteError::Resolution { id, source }),
        };
        debug!(%id, count = paths.len(), "resolved cgroup paths");

        let cgroups = match cleanup(fs, &paths).await {
            Ok(outcome) => outcome,
            Err(source) => return Err(DeleteError::Removal { id, source }),
        };
        info!(
            %id,
            removed = cgroups.removed.len(),
            already_absent = cgroups.already_absent.len(),
            "cgroups reclaimed"
        );

        Ok(Deletion {
            request: self.request,
            state: Completed { id, cgroups },
        })
    }
}
