// ABOUTME: Entry points that drive a deletion through every state.
// ABOUTME: Single-container delete and fail-fast batch delete.

use nonempty::NonEmpty;
use tracing::{Instrument, info, info_span};

use crate::cgroups::{CgroupFs, PathResolver};
use crate::liveness::ProcessProbe;
use crate::oci::OciTranslator;
use crate::runtime::SandboxOps;

use super::deletion::{Deletion, DeletionReport, DeletionRequest};
use super::error::DeleteError;

/// Collaborators a deletion needs, passed explicitly.
#[derive(Clone, Copy)]
pub struct DeleteContext<'a> {
    pub sandboxes: &'a dyn SandboxOps,
    pub translator: &'a dyn OciTranslator,
    pub probe: &'a dyn ProcessProbe,
    pub resolver: &'a dyn PathResolver,
    pub cgroup_fs: &'a dyn CgroupFs,
}

impl std::fmt::Debug for DeleteContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeleteContext").finish_non_exhaustive()
    }
}

/// Delete one container and reclaim its cgroups.
///
/// Validation, the liveness gate (unless forced), stop, config capture,
/// sandbox delete and cgroup cleanup run strictly in that order. The first
/// failure is returned as-is and nothing is rolled back.
pub async fn delete_container(
    ctx: &DeleteContext<'_>,
    request: DeletionRequest,
) -> Result<DeletionReport, DeleteError> {
    let span = info_span!(
        "delete",
        container = request.container_id(),
        force = request.force()
    );

    async move {
        let deletion = Deletion::new(request)
            .validate(ctx.sandboxes)
            .await?
            .ensure_stoppable(ctx.sandboxes, ctx.translator, ctx.probe)
            .await?
            .stop(ctx.sandboxes)
            .await?
            .fetch_config(ctx.translator)?
            .delete_sandbox(ctx.sandboxes)
            .await?
            .reclaim_cgroups(ctx.resolver, ctx.cgroup_fs)
            .await?;

        info!("container deleted");
        Ok::<_, DeleteError>(deletion.finish())
    }
    .instrument(span)
    .await
}

/// Delete several containers one after another, stopping at the first
/// failure.
///
/// `on_deleted` is called after each successful deletion. Containers after
/// a failing one are not attempted.
pub async fn delete_all<F>(
    ctx: &DeleteContext<'_>,
    container_ids: &NonEmpty<String>,
    force: bool,
    mut on_deleted: F,
) -> Result<Vec<DeletionReport>, DeleteError>
where
    F: FnMut(&DeletionReport),
{
    let mut reports = Vec::with_capacity(container_ids.len());

    for id in container_ids.iter() {
        let report = delete_container(ctx, DeletionRequest::new(id.as_str(), force)).await?;
        on_deleted(&report);
        reports.push(report);
    }

    Ok(reports)
}
