use std::time::Duration;

use crate::replica::ReplicaClient;

pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_RETENTION_CHECK_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// A replication destination attached to a [`Db`](super::Db).
///
/// A zero `snapshot_interval` or `validation_interval` disables that task.
#[derive(Debug, Clone)]
pub struct Replica {
    name: String,
    client: ReplicaClient,

    pub retention: Duration,
    pub retention_check_interval: Duration,
    pub sync_interval: Duration,
    pub snapshot_interval: Duration,
    pub validation_interval: Duration,
}

impl Replica {
    /// Creates a replica. An empty name falls back to the backend name.
    pub fn new(name: impl Into<String>, client: ReplicaClient) -> Self {
        let mut name = name.into();
        if name.is_empty() {
            name = client.replica_type().to_string();
        }

        Self {
            name,
            client,
            retention: DEFAULT_RETENTION,
            retention_check_interval: DEFAULT_RETENTION_CHECK_INTERVAL,
            sync_interval: DEFAULT_SYNC_INTERVAL,
            snapshot_interval: Duration::ZERO,
            validation_interval: Duration::ZERO,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn client(&self) -> &ReplicaClient {
        &self.client
    }
}
