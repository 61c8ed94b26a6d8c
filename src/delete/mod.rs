// ABOUTME: Container deletion orchestration using the type state pattern.
// ABOUTME: Exports state markers, the Deletion struct, and workflow entry points.

mod deletion;
mod error;
mod state;
mod transitions;
mod validate;
mod workflow;

pub use deletion::{Deletion, DeletionReport, DeletionRequest};
pub use error::{DeleteError, DeleteErrorKind, DeletePhase};
pub use state::{Cleared, Completed, Configured, Deleted, Requested, Stopped, Validated};
pub use validate::validate_container;
pub use workflow::{DeleteContext, delete_all, delete_container};
