//! Contract with the continuous replication engine.
//!
//! WAL shadowing, checkpointing, snapshots and retention belong to the engine.
//! This crate hands it assembled [`Db`] units through a [`DbFactory`] and
//! controls its lifecycle through [`ReplicationEngine`].

pub mod db;
pub mod error;
pub mod metrics;
pub mod replica;
pub mod server;

use std::path::Path;
use std::sync::Arc;

use crate::replica::ReplicaError;

pub use db::Db;
pub use error::EngineError;
pub use replica::Replica;
pub use server::Server;

/// Builds the database unit for a watched path.
pub type DbFactory = Arc<dyn Fn(&Path) -> Result<Db, ReplicaError> + Send + Sync>;

pub trait ReplicationEngine: Send + Sync {
    /// Registers `path` for continuous replication. The engine invokes `factory`
    /// once the file is ready.
    fn watch(&self, path: &Path, factory: DbFactory) -> Result<(), EngineError>;

    /// Stops every watch and releases the databases it opened.
    fn close(&self) -> Result<(), EngineError>;
}
