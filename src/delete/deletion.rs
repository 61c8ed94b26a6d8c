// ABOUTME: Generic deletion struct parameterized by state, plus request and report.
// ABOUTME: Requests are immutable; reports summarize a completed deletion.

use serde::Serialize;

use crate::cgroups::CleanupOutcome;
use crate::types::ContainerId;

use super::state::{Completed, Requested};

/// One deletion request: which container, and whether to bypass the
/// liveness gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionRequest {
    container_id: String,
    force: bool,
}

impl DeletionRequest {
    pub fn new(container_id: impl Into<String>, force: bool) -> Self {
        Self {
            container_id: container_id.into(),
            force,
        }
    }

    /// The ID as given, before validation.
    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn force(&self) -> bool {
        self.force
    }
}

/// A container deletion in progress, parameterized by its current state.
///
/// Transitions consume the deletion and return the next state, so steps
/// cannot be skipped or reordered. In particular the sandbox can only be
/// deleted once its OCI configuration has been captured:
///
/// ```compile_fail
/// use reclaim::delete::{Deletion, DeletionRequest};
/// use reclaim::runtime::LocalSandboxStore;
///
/// async fn delete_too_early(store: &LocalSandboxStore) {
///     let deletion = Deletion::new(DeletionRequest::new("c1", false));
///     let _ = deletion.delete_sandbox(store).await;
/// }
/// ```
///
/// and a stopped sandbox has to go through `fetch_config()` first:
///
/// ```compile_fail
/// use reclaim::delete::{Deletion, Stopped};
/// use reclaim::runtime::LocalSandboxStore;
///
/// async fn skip_config(deletion: Deletion<Stopped>, store: &LocalSandboxStore) {
///     let _ = deletion.delete_sandbox(store).await;
/// }
/// ```
#[derive(Debug)]
pub struct Deletion<S> {
    pub(crate) request: DeletionRequest,
    pub(crate) state: S,
}

impl Deletion<Requested> {
    pub fn new(request: DeletionRequest) -> Self {
        Deletion {
            request,
            state: Requested,
        }
    }
}

impl<S> Deletion<S> {
    pub fn is_forced(&self) -> bool {
        self.request.force
    }
}

impl Deletion<Completed> {
    /// Consume the deletion and summarize what was done.
    pub fn finish(self) -> DeletionReport {
        DeletionReport {
            container_id: self.state.id,
            forced: self.request.force,
            cgroups: self.state.cgroups,
        }
    }
}

/// Summary of a successful deletion.
#[derive(Debug, Clone, Serialize)]
pub struct DeletionReport {
    pub container_id: ContainerId,
    pub forced: bool,
    pub cgroups: CleanupOutcome,
}
