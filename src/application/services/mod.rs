//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem) but are themselves
//! concrete structs, not traits.

mod snapshot;
mod tree_store;

pub use snapshot::SnapshotService;
pub use tree_store::{Located, TreeStore};
