// Persistence, config migration and point sources
pub mod config_store;
pub mod migration;
pub mod sources;
pub mod store;

// Re-export commonly used types
pub use config_store::ConfigStore;
pub use migration::{MigrationPath, Resolution, resolve, resolve_text};
pub use sources::{DemoSource, JsonFileSource, PointSource, load_first_available};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
