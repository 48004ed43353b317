use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use super::duration;

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Bind address for serving metrics.
    #[serde(default)]
    pub addr: String,

    #[serde(default)]
    pub dbs: Vec<DbConfig>,

    /// Subcommand to execute during replication. The process shuts down when it exits.
    #[serde(default)]
    pub exec: String,

    // Global credentials, copied to replicas that do not set their own.
    #[serde(default)]
    pub access_key_id: String,
    #[serde(default)]
    pub secret_access_key: String,
}

impl Config {
    /// Copies the global credentials onto every replica that left them empty.
    pub fn propagate_global_settings(&mut self) {
        for db in &mut self.dbs {
            for replica in &mut db.replicas {
                if replica.access_key_id.is_empty() {
                    replica.access_key_id = self.access_key_id.clone();
                }
                if replica.secret_access_key.is_empty() {
                    replica.secret_access_key = self.secret_access_key.clone();
                }
            }
        }
    }

    /// Returns the database entry for `path`, or the first entry when none matches.
    pub fn db_config(&self, path: &Path) -> Option<&DbConfig> {
        self.dbs
            .iter()
            .find(|db| Path::new(&db.path) == path)
            .or_else(|| self.dbs.first())
    }
}

/// Configuration for a single monitored database. Every override is optional so
/// that an explicit zero is distinguishable from "not set".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DbConfig {
    pub path: String,

    #[serde(default, deserialize_with = "duration::deserialize_opt")]
    pub monitor_delay_interval: Option<Duration>,
    #[serde(default, deserialize_with = "duration::deserialize_opt")]
    pub checkpoint_interval: Option<Duration>,
    #[serde(default, rename = "min-checkpoint-page-count")]
    pub min_checkpoint_page_n: Option<usize>,
    #[serde(default, rename = "max-checkpoint-page-count")]
    pub max_checkpoint_page_n: Option<usize>,
    #[serde(default, rename = "shadow-retention-count")]
    pub shadow_retention_n: Option<usize>,

    #[serde(default)]
    pub replicas: Vec<ReplicaConfig>,
}

/// Configuration for a single backup destination of a database.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ReplicaConfig {
    #[serde(rename = "type")]
    pub replica_type: String,
    pub name: String,
    pub path: String,
    pub url: String,

    #[serde(deserialize_with = "duration::deserialize_opt")]
    pub retention: Option<Duration>,
    #[serde(deserialize_with = "duration::deserialize_opt")]
    pub retention_check_interval: Option<Duration>,
    #[serde(deserialize_with = "duration::deserialize_opt")]
    pub sync_interval: Option<Duration>,
    #[serde(deserialize_with = "duration::deserialize_opt")]
    pub snapshot_interval: Option<Duration>,
    #[serde(deserialize_with = "duration::deserialize_opt")]
    pub validation_interval: Option<Duration>,

    // S3 / GCS
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub bucket: String,
    pub endpoint: String,
    pub force_path_style: Option<bool>,
    pub skip_verify: bool,

    // Azure Blob Storage
    pub account_name: String,
    pub account_key: String,

    // SFTP
    pub host: String,
    pub user: String,
    pub password: String,
    pub key_path: String,
}
