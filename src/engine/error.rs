use std::path::PathBuf;

use thiserror::Error;

use crate::replica::ReplicaError;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("cannot open database {}: {source}", path.display())]
    Factory {
        path: PathBuf,
        #[source]
        source: ReplicaError,
    },

    #[error("already watching {}", .0.display())]
    AlreadyWatching(PathBuf),

    #[error("server is not open")]
    NotOpen,

    #[error("server is closed")]
    Closed,
}
