// ABOUTME: Deletion preconditions checked against the sandbox registry.
// ABOUTME: The container must exist and must not still be creating.

use tracing::debug;

use crate::runtime::{SandboxOps, SandboxPhase};
use crate::types::{ContainerId, ContainerIdError};

use super::error::DeleteError;

/// Check that `raw_id` names a container the runtime manages and that it
/// may be deleted. Read-only.
///
/// An empty ID is `MissingId`. Any other ID that is not well-formed cannot
/// name a managed container and is `NotFound` without consulting the
/// registry.
pub async fn validate_container<S>(sandboxes: &S, raw_id: &str) -> Result<ContainerId, DeleteError>
where
    S: SandboxOps + ?Sized,
{
    let id = match ContainerId::new(raw_id) {
        Ok(id) => id,
        Err(ContainerIdError::Empty) => return Err(DeleteError::MissingId),
        Err(e) => {
            debug!(id = raw_id, error = %e, "malformed container ID");
            return Err(DeleteError::NotFound(raw_id.to_string()));
        }
    };

    let listed = sandboxes
        .list_sandboxes()
        .await
        .map_err(|source| DeleteError::Registry { source })?;

    let Some(summary) = listed.into_iter().find(|s| s.id == id) else {
        return Err(DeleteError::NotFound(id.to_string()));
    };

    // OCI: delete is not allowed while the container is still being created.
    if summary.phase == SandboxPhase::Creating {
        return Err(DeleteError::InvalidState {
            id,
            phase: summary.phase,
        });
    }

    debug!(%id, phase = %summary.phase, "container valid for deletion");
    Ok(id)
}
