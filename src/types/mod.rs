// ABOUTME: Validated domain types shared across the crate.
// ABOUTME: Currently the container identifier.

mod container_id;

pub use container_id::{ContainerId, ContainerIdError};
