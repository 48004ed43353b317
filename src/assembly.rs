use std::path::Path;

use crate::config::{DbConfig, ReplicaConfig};
use crate::engine::{Db, Replica};
use crate::replica::{resolve, ReplicaClient, ReplicaError};

/// Builds a replica with its client from configuration. Interval overrides are
/// applied only when set.
pub fn new_replica_from_config(config: &ReplicaConfig) -> Result<Replica, ReplicaError> {
    let client = ReplicaClient::from_resolved(resolve(config)?);
    let mut replica = Replica::new(config.name.clone(), client);

    if let Some(v) = config.retention {
        replica.retention = v;
    }
    if let Some(v) = config.retention_check_interval {
        replica.retention_check_interval = v;
    }
    if let Some(v) = config.sync_interval {
        replica.sync_interval = v;
    }
    if let Some(v) = config.snapshot_interval {
        replica.snapshot_interval = v;
    }
    if let Some(v) = config.validation_interval {
        replica.validation_interval = v;
    }

    Ok(replica)
}

/// Builds the database unit for `path`, applying overrides onto the engine
/// defaults and attaching every replica in order. The first replica that fails
/// to resolve aborts assembly.
pub fn new_db_from_config(config: &DbConfig, path: impl AsRef<Path>) -> Result<Db, ReplicaError> {
    let mut db = Db::new(path.as_ref());

    if let Some(v) = config.monitor_delay_interval {
        db.monitor_delay_interval = v;
    }
    if let Some(v) = config.checkpoint_interval {
        db.checkpoint_interval = v;
    }
    if let Some(v) = config.min_checkpoint_page_n {
        db.min_checkpoint_page_n = v;
    }
    if let Some(v) = config.max_checkpoint_page_n {
        db.max_checkpoint_page_n = v;
    }
    if let Some(v) = config.shadow_retention_n {
        db.shadow_retention_n = v;
    }

    for replica in &config.replicas {
        db.replicas.push(new_replica_from_config(replica)?);
    }

    Ok(db)
}
