use std::path::{Path, PathBuf};
use std::time::Duration;

use super::replica::Replica;

pub const DEFAULT_MONITOR_DELAY_INTERVAL: Duration = Duration::from_millis(10);
pub const DEFAULT_CHECKPOINT_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_MIN_CHECKPOINT_PAGE_N: usize = 1000;
pub const DEFAULT_MAX_CHECKPOINT_PAGE_N: usize = 10000;
pub const DEFAULT_SHADOW_RETENTION_N: usize = 32;

/// A database under replication together with the replicas it owns.
#[derive(Debug)]
pub struct Db {
    path: PathBuf,

    pub monitor_delay_interval: Duration,
    pub checkpoint_interval: Duration,
    pub min_checkpoint_page_n: usize,
    pub max_checkpoint_page_n: usize,
    pub shadow_retention_n: usize,

    pub replicas: Vec<Replica>,
}

impl Db {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            monitor_delay_interval: DEFAULT_MONITOR_DELAY_INTERVAL,
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
            min_checkpoint_page_n: DEFAULT_MIN_CHECKPOINT_PAGE_N,
            max_checkpoint_page_n: DEFAULT_MAX_CHECKPOINT_PAGE_N,
            shadow_retention_n: DEFAULT_SHADOW_RETENTION_N,
            replicas: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn replica(&self, name: &str) -> Option<&Replica> {
        self.replicas.iter().find(|r| r.name() == name)
    }
}
