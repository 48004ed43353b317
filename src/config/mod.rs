pub mod duration;
pub mod error;
pub mod expand;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use expand::{expand, PathExpansionError};
pub use loader::{default_config_path, read_config_file};
pub use types::{Config, DbConfig, ReplicaConfig};
