// ABOUTME: Command module aggregator for the reclaim CLI.
// ABOUTME: Re-exports the delete command handler.

mod delete;

pub use delete::delete;
