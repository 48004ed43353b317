use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use super::db::Db;
use super::error::EngineError;
use super::metrics::{OPEN_DATABASES, WATCHED_PATHS};
use super::{DbFactory, ReplicationEngine};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

type DbSlot = Arc<Mutex<Option<Arc<Db>>>>;

/// Hosts watched databases in-process.
///
/// A watched path is opened through its factory whenever the file exists and
/// dropped again when the file goes away. `watch` must be called from within a
/// tokio runtime.
pub struct Server {
    poll_interval: Duration,
    state: Mutex<ServerState>,
}

#[derive(Default)]
struct ServerState {
    open: bool,
    closed: bool,
    watches: HashMap<PathBuf, Watch>,
}

struct Watch {
    db: DbSlot,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl Server {
    pub fn new() -> Self {
        Self::with_poll_interval(DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            state: Mutex::new(ServerState::default()),
        }
    }

    pub fn open(&self) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(EngineError::Closed);
        }
        state.open = true;
        Ok(())
    }

    pub fn is_watching(&self, path: &Path) -> bool {
        self.state.lock().watches.contains_key(path)
    }

    /// Returns the open database for `path`, if the file currently exists.
    pub fn db(&self, path: &Path) -> Option<Arc<Db>> {
        let state = self.state.lock();
        let watch = state.watches.get(path)?;
        let db = watch.db.lock().clone();
        db
    }

    fn shutdown_all(state: &mut ServerState) {
        for (path, mut watch) in state.watches.drain() {
            if let Some(tx) = watch.shutdown_tx.take() {
                let _ = tx.send(());
            }
            if watch.db.lock().take().is_some() {
                OPEN_DATABASES.dec();
            }
            WATCHED_PATHS.dec();
            tracing::info!(path = %path.display(), "stopped watching database");
            drop(watch.handle);
        }
    }
}

impl Default for Server {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplicationEngine for Server {
    fn watch(&self, path: &Path, factory: DbFactory) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(EngineError::Closed);
        }
        if !state.open {
            return Err(EngineError::NotOpen);
        }
        if state.watches.contains_key(path) {
            return Err(EngineError::AlreadyWatching(path.to_path_buf()));
        }

        // Configuration errors surface to the caller when the file is already there.
        let slot: DbSlot = Arc::new(Mutex::new(None));
        if path.exists() {
            let db = factory(path).map_err(|source| EngineError::Factory {
                path: path.to_path_buf(),
                source,
            })?;
            log_opened(&db);
            *slot.lock() = Some(Arc::new(db));
            OPEN_DATABASES.inc();
        }

        let (tx, rx) = oneshot::channel();
        let handle = tokio::spawn(monitor(
            path.to_path_buf(),
            factory,
            slot.clone(),
            self.poll_interval,
            rx,
        ));

        state.watches.insert(
            path.to_path_buf(),
            Watch {
                db: slot,
                shutdown_tx: Some(tx),
                handle,
            },
        );
        WATCHED_PATHS.inc();
        tracing::info!(path = %path.display(), "watching database");
        Ok(())
    }

    fn close(&self) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        if state.closed {
            return Ok(());
        }
        Self::shutdown_all(&mut state);
        state.closed = true;
        state.open = false;
        Ok(())
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        Self::shutdown_all(&mut self.state.lock());
    }
}

async fn monitor(
    path: PathBuf,
    factory: DbFactory,
    slot: DbSlot,
    interval: Duration,
    rx: oneshot::Receiver<()>,
) {
    tokio::pin!(rx);
    let mut last_failed = false;

    loop {
        tokio::select! {
            _ = sleep(interval) => {
                match tokio::fs::try_exists(&path).await {
                    Ok(exists) => refresh(&path, exists, &factory, &slot, &mut last_failed),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "cannot stat database file, keeping current state");
                    }
                }
            }
            _ = &mut rx => {
                tracing::debug!(path = %path.display(), "database monitor shutting down");
                break;
            }
        }
    }
}

/// Opens the database when its file exists and drops it once the file is gone.
fn refresh(path: &Path, exists: bool, factory: &DbFactory, slot: &DbSlot, last_failed: &mut bool) {
    let mut current = slot.lock();

    if exists && current.is_none() {
        match factory(path) {
            Ok(db) => {
                log_opened(&db);
                *current = Some(Arc::new(db));
                OPEN_DATABASES.inc();
                *last_failed = false;
            }
            Err(e) => {
                if !*last_failed {
                    tracing::error!(path = %path.display(), error = %e, "Failed to open database");
                }
                *last_failed = true;
            }
        }
    } else if !exists && current.take().is_some() {
        OPEN_DATABASES.dec();
        tracing::info!(path = %path.display(), "database removed, closed");
    }
}

fn log_opened(db: &Db) {
    tracing::info!(
        path = %db.path().display(),
        replicas = db.replicas.len(),
        "database opened"
    );
    for replica in &db.replicas {
        tracing::info!(
            path = %db.path().display(),
            replica = %replica.name(),
            backend = %replica.client().replica_type(),
            location = %replica.client().location(),
            "replica attached"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replica::ReplicaError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn counting_factory(calls: Arc<AtomicUsize>) -> DbFactory {
        Arc::new(move |path: &Path| -> Result<Db, ReplicaError> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Db::new(path))
        })
    }

    #[tokio::test]
    async fn test_watch_requires_open() {
        let server = Server::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let result = server.watch(Path::new("/nonexistent.db"), counting_factory(calls));
        assert!(matches!(result.unwrap_err(), EngineError::NotOpen));
    }

    #[tokio::test]
    async fn test_watch_existing_file_opens_immediately() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.db");
        std::fs::write(&path, b"").unwrap();

        let server = Server::with_poll_interval(Duration::from_millis(10));
        server.open().unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        server.watch(&path, counting_factory(calls.clone())).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(server.db(&path).unwrap().path(), path.as_path());

        let again = server.watch(&path, counting_factory(calls.clone()));
        assert!(matches!(again.unwrap_err(), EngineError::AlreadyWatching(_)));

        server.close().unwrap();
        assert!(!server.is_watching(&path));
        assert!(server.db(&path).is_none());
    }

    #[tokio::test]
    async fn test_watch_opens_when_file_appears_and_closes_when_removed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("late.db");

        let server = Server::with_poll_interval(Duration::from_millis(10));
        server.open().unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        server.watch(&path, counting_factory(calls.clone())).unwrap();
        assert!(server.db(&path).is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        std::fs::write(&path, b"").unwrap();
        sleep(Duration::from_millis(200)).await;
        assert!(server.db(&path).is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        std::fs::remove_file(&path).unwrap();
        sleep(Duration::from_millis(200)).await;
        assert!(server.db(&path).is_none());

        server.close().unwrap();
    }

    #[tokio::test]
    async fn test_stat_error_keeps_database_open() {
        let dir = TempDir::new().unwrap();
        let parent = dir.path().join("data");
        std::fs::create_dir(&parent).unwrap();
        let path = parent.join("app.db");
        std::fs::write(&path, b"").unwrap();

        let server = Server::with_poll_interval(Duration::from_millis(10));
        server.open().unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        server.watch(&path, counting_factory(calls.clone())).unwrap();
        assert!(server.db(&path).is_some());

        // A regular file where the parent directory was makes stat fail with
        // something other than "not found".
        std::fs::remove_dir_all(&parent).unwrap();
        std::fs::write(&parent, b"").unwrap();
        assert!(std::fs::metadata(&path).is_err());

        sleep(Duration::from_millis(200)).await;
        assert!(server.db(&path).is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        server.close().unwrap();
    }

    #[tokio::test]
    async fn test_factory_error_is_returned() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.db");
        std::fs::write(&path, b"").unwrap();

        let server = Server::new();
        server.open().unwrap();

        let factory: DbFactory = Arc::new(|_: &Path| -> Result<Db, ReplicaError> {
            Err(ReplicaError::UnknownType("tape".to_string()))
        });
        let err = server.watch(&path, factory).unwrap_err();
        assert!(matches!(err, EngineError::Factory { .. }));
        assert!(!server.is_watching(&path));
    }

    #[tokio::test]
    async fn test_closed_server_rejects_watch() {
        let server = Server::new();
        server.open().unwrap();
        server.close().unwrap();
        server.close().unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let result = server.watch(Path::new("/tmp/x.db"), counting_factory(calls));
        assert!(matches!(result.unwrap_err(), EngineError::Closed));
        assert!(matches!(server.open().unwrap_err(), EngineError::Closed));
    }
}
