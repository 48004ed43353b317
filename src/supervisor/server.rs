use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use super::error::SupervisorError;
use super::readiness::wait_for_db;
use super::types::{Readiness, ReadinessPolicy, SupervisorState};
use super::BackupServer;
use crate::assembly::new_db_from_config;
use crate::config::Config;
use crate::engine::{DbFactory, ReplicationEngine, Server};

/// Waits for a database file and then hands it to the replication engine.
pub struct Supervisor<E: ReplicationEngine> {
    engine: Arc<E>,
    config: Config,
    db_path: PathBuf,
    policy: ReadinessPolicy,
    state: SupervisorState,
    readiness: Option<Readiness>,
}

impl Supervisor<Server> {
    /// Creates a supervisor backed by an opened in-process [`Server`].
    pub fn open(config: Config, db_path: impl Into<PathBuf>) -> Result<Self, SupervisorError> {
        let server = Server::new();
        server.open()?;
        Ok(Self::new(config, db_path, Arc::new(server)))
    }
}

impl<E: ReplicationEngine> Supervisor<E> {
    pub fn new(config: Config, db_path: impl Into<PathBuf>, engine: Arc<E>) -> Self {
        Self {
            engine,
            config,
            db_path: db_path.into(),
            policy: ReadinessPolicy::default(),
            state: SupervisorState::Idle,
            readiness: None,
        }
    }

    pub fn with_policy(mut self, policy: ReadinessPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Outcome of the last readiness wait, once `start` has run.
    pub fn readiness(&self) -> Option<Readiness> {
        self.readiness
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }
}

#[async_trait]
impl<E: ReplicationEngine + 'static> BackupServer for Supervisor<E> {
    async fn start(&mut self) -> Result<(), SupervisorError> {
        if self.state != SupervisorState::Idle {
            return Err(SupervisorError::InvalidState(self.state));
        }

        let db_config = self
            .config
            .db_config(&self.db_path)
            .cloned()
            .ok_or_else(|| SupervisorError::NoDatabase(self.db_path.clone()))?;

        self.state = SupervisorState::Waiting;
        let readiness = wait_for_db(&self.db_path, self.policy).await;
        self.readiness = Some(readiness);

        let factory: DbFactory = Arc::new(move |path: &Path| new_db_from_config(&db_config, path));
        if let Err(e) = self.engine.watch(&self.db_path, factory) {
            let _ = self.engine.close();
            self.state = SupervisorState::Stopped;
            return Err(e.into());
        }

        self.state = SupervisorState::Running;
        tracing::info!(
            path = %self.db_path.display(),
            ready = readiness.is_ready(),
            "replication started"
        );
        Ok(())
    }

    fn stop(&mut self) {
        if self.state == SupervisorState::Stopped {
            return;
        }
        tracing::info!(path = %self.db_path.display(), "stopping backup server");
        if let Err(e) = self.engine.close() {
            tracing::error!(error = %e, "failed to close replication engine");
        }
        self.state = SupervisorState::Stopped;
    }
}

/// Backup server used when replication is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSupervisor;

#[async_trait]
impl BackupServer for NoopSupervisor {
    async fn start(&mut self) -> Result<(), SupervisorError> {
        Ok(())
    }

    fn stop(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DbConfig, ReplicaConfig};
    use crate::engine::EngineError;
    use crate::replica::ReplicaType;
    use std::time::Duration;
    use tempfile::TempDir;

    fn config_for(path: &Path, replicas: Vec<ReplicaConfig>) -> Config {
        Config {
            dbs: vec![DbConfig {
                path: path.to_string_lossy().into_owned(),
                replicas,
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn fast() -> ReadinessPolicy {
        ReadinessPolicy {
            attempts: 3,
            interval: Duration::from_millis(10),
        }
    }

    fn opened_server() -> Arc<Server> {
        let server = Server::with_poll_interval(Duration::from_millis(10));
        server.open().unwrap();
        Arc::new(server)
    }

    #[tokio::test]
    async fn test_start_with_existing_database() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.db");
        std::fs::write(&path, b"").unwrap();

        let replicas = vec![ReplicaConfig {
            path: dir.path().join("replica").to_string_lossy().into_owned(),
            ..Default::default()
        }];
        let engine = opened_server();
        let mut supervisor = Supervisor::new(config_for(&path, replicas), &path, engine.clone())
            .with_policy(fast());
        assert_eq!(supervisor.state(), SupervisorState::Idle);

        supervisor.start().await.unwrap();
        assert_eq!(supervisor.state(), SupervisorState::Running);
        assert_eq!(supervisor.readiness(), Some(Readiness::Ready { attempts: 1 }));

        let db = engine.db(&path).unwrap();
        assert_eq!(db.replicas.len(), 1);
        assert_eq!(db.replicas[0].client().replica_type(), ReplicaType::File);

        supervisor.stop();
        assert_eq!(supervisor.state(), SupervisorState::Stopped);
        assert!(!engine.is_watching(&path));
    }

    #[tokio::test]
    async fn test_start_proceeds_when_database_never_appears() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.db");

        let engine = opened_server();
        let mut supervisor =
            Supervisor::new(config_for(&path, vec![]), &path, engine.clone()).with_policy(fast());

        supervisor.start().await.unwrap();
        assert_eq!(supervisor.state(), SupervisorState::Running);
        assert_eq!(supervisor.readiness(), Some(Readiness::GaveUp { attempts: 3 }));
        assert!(engine.is_watching(&path));
        assert!(engine.db(&path).is_none());

        supervisor.stop();
    }

    #[tokio::test]
    async fn test_start_twice_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.db");
        std::fs::write(&path, b"").unwrap();

        let mut supervisor =
            Supervisor::new(config_for(&path, vec![]), &path, opened_server()).with_policy(fast());
        supervisor.start().await.unwrap();

        let err = supervisor.start().await.unwrap_err();
        assert!(matches!(err, SupervisorError::InvalidState(SupervisorState::Running)));
        supervisor.stop();
    }

    #[tokio::test]
    async fn test_invalid_replica_fails_start() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.db");
        std::fs::write(&path, b"").unwrap();

        let replicas = vec![ReplicaConfig {
            url: "s3://bucket/db".to_string(),
            bucket: "bucket".to_string(),
            ..Default::default()
        }];
        let engine = opened_server();
        let mut supervisor =
            Supervisor::new(config_for(&path, replicas), &path, engine.clone()).with_policy(fast());

        let err = supervisor.start().await.unwrap_err();
        assert!(matches!(err, SupervisorError::Engine(EngineError::Factory { .. })));
        assert_eq!(supervisor.state(), SupervisorState::Stopped);
        assert!(!engine.is_watching(&path));
    }

    #[tokio::test]
    async fn test_no_database_configured() {
        let mut supervisor = Supervisor::new(Config::default(), "/data/app.db", opened_server())
            .with_policy(fast());
        let err = supervisor.start().await.unwrap_err();
        assert!(matches!(err, SupervisorError::NoDatabase(_)));
        assert_eq!(supervisor.state(), SupervisorState::Idle);
    }

    #[tokio::test]
    async fn test_noop_supervisor() {
        let mut server: Box<dyn BackupServer> = Box::new(NoopSupervisor);
        server.start().await.unwrap();
        server.stop();
    }
}
