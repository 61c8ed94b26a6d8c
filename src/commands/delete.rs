// ABOUTME: Delete command implementation.
// ABOUTME: Wires the local store and host probes into the batch deletion workflow.

use nonempty::NonEmpty;
use reclaim::cgroups::HostCgroupFs;
use reclaim::config::Config;
use reclaim::delete::{DeleteContext, delete_all};
use reclaim::diagnostics::Diagnostics;
use reclaim::error::{Error, Result};
use reclaim::liveness::SignalProbe;
use reclaim::oci::AnnotationTranslator;
use reclaim::output::Output;

/// Delete the given containers in order, stopping at the first failure.
pub async fn delete(
    config: &Config,
    container_ids: Vec<String>,
    force: bool,
    mut output: Output,
) -> Result<()> {
    let ids = NonEmpty::from_vec(container_ids).ok_or(Error::MissingContainerId)?;

    let store = config.sandbox_store()?;
    let resolver = config.cgroup_resolver();
    let ctx = DeleteContext {
        sandboxes: &store,
        translator: &AnnotationTranslator,
        probe: &SignalProbe,
        resolver: &resolver,
        cgroup_fs: &HostCgroupFs,
    };

    output.start_timer();
    let mut diag = Diagnostics::default();

    output.progress(&format!("Deleting {} container(s)", ids.len()));

    let outcome = delete_all(&ctx, &ids, force, |report| {
        diag.record(report);
        output.deleted(report);
    })
    .await;

    // Warnings from containers deleted before a failure are still shown.
    for warning in diag.warnings() {
        output.warning(&warning.message);
    }
    outcome?;

    output.success("Delete complete!");
    Ok(())
}
