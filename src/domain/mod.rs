//! Domain layer: entities and tree logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod name;
pub mod render;
pub mod sample;
pub mod study;
pub mod tree;

pub use entities::*;
pub use error::DomainError;
pub use name::NodeName;
pub use render::TreeDisplay;
pub use sample::sample_tree;
pub use study::{Side, StudySession};
pub use tree::{find_by_id, Found};
