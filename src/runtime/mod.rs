// ABOUTME: Sandbox runtime seam used by the deletion workflow.
// ABOUTME: Exposes the SandboxOps trait and the file-backed local store.

mod sandbox;
mod store;

pub use sandbox::{
    SandboxError, SandboxHandle, SandboxOps, SandboxPhase, SandboxStatus, SandboxSummary,
};
pub use store::{LocalSandboxStore, STATUS_FILENAME};
