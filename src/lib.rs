// ABOUTME: Library root for reclaim - container deletion and cgroup reclamation.
// ABOUTME: The main binary is in main.rs.

pub mod cgroups;
pub mod config;
pub mod delete;
pub mod diagnostics;
pub mod error;
pub mod liveness;
pub mod oci;
pub mod output;
pub mod runtime;
pub mod types;
