use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use tracing::info;

use crate::config::{expand, Config, PathExpansionError};
use crate::supervisor::types::{DEFAULT_READINESS_ATTEMPTS, ReadinessPolicy};
use crate::supervisor::{BackupServer, NoopSupervisor, Supervisor, SupervisorError};

#[derive(Error, Debug)]
pub enum CliError {
    #[error("no databases configured")]
    NoDatabases,

    #[error(transparent)]
    PathExpansion(#[from] PathExpansionError),

    #[error(transparent)]
    Supervisor(#[from] SupervisorError),
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Continuous backup of databases to replica destinations", long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Do not expand environment variables in the configuration file
    #[arg(long)]
    pub no_expand_env: bool,

    /// Database to replicate; defaults to the first configured database
    #[arg(long)]
    pub db: Option<String>,

    /// Load the configuration but do not replicate
    #[arg(long)]
    pub disabled: bool,

    /// Checks for the database file before replication starts anyway
    #[arg(long, default_value_t = DEFAULT_READINESS_ATTEMPTS)]
    pub wait_attempts: u32,

    /// Delay between checks for the database file
    #[arg(long, default_value = "1s", value_parser = humantime::parse_duration)]
    pub wait_interval: Duration,
}

impl Cli {
    pub fn readiness_policy(&self) -> ReadinessPolicy {
        ReadinessPolicy {
            attempts: self.wait_attempts,
            interval: self.wait_interval,
        }
    }

    /// Database to replicate: `--db` if given, else the first configured one.
    pub fn db_path(&self, config: &Config) -> Result<PathBuf, CliError> {
        match (&self.db, config.dbs.first()) {
            (Some(path), _) => Ok(expand(path)?),
            (None, Some(db)) => Ok(PathBuf::from(&db.path)),
            (None, None) => Err(CliError::NoDatabases),
        }
    }

    /// Builds the backup server. Disabled replication needs no database.
    pub fn backup_server(&self, config: &Config) -> Result<Box<dyn BackupServer>, CliError> {
        if self.disabled {
            info!("replication disabled");
            return Ok(Box::new(NoopSupervisor));
        }

        let db_path = self.db_path(config)?;
        info!(path = %db_path.display(), "replicating database");
        let supervisor =
            Supervisor::open(config.clone(), db_path)?.with_policy(self.readiness_policy());
        Ok(Box::new(supervisor))
    }
}
