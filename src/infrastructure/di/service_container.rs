//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::services::{SnapshotService, TreeStore};
use crate::application::{protocol, ApplicationResult};
use crate::config::{SeedMode, Settings};
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
///
/// The store is created once here and handed out by reference; there is no
/// process-wide tree.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// The tree every operation runs against
    pub store: Arc<TreeStore>,

    pub snapshots: SnapshotService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> ApplicationResult<Self> {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> ApplicationResult<Self> {
        let settings = Arc::new(settings);
        let snapshots = SnapshotService::new(Arc::clone(&fs));
        let store = Arc::new(Self::build_store(&settings, &snapshots)?);

        Ok(Self {
            settings,
            fs,
            store,
            snapshots,
        })
    }

    fn build_store(settings: &Settings, snapshots: &SnapshotService) -> ApplicationResult<TreeStore> {
        if let Some(seed_file) = &settings.seed_file {
            info!("seeding tree from {}", seed_file.display());
            return TreeStore::with_root(snapshots.load(seed_file)?);
        }
        debug!("seeding tree: {:?}", settings.seed);
        match settings.seed {
            SeedMode::Sample => TreeStore::seeded(&settings.root_name),
            SeedMode::Empty => Ok(TreeStore::new(protocol::parse_name(&settings.root_name)?)),
        }
    }
}
