use std::path::PathBuf;

use thiserror::Error;

use super::types::SupervisorState;
use crate::engine::EngineError;

#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("cannot start backup server in state {0:?}")]
    InvalidState(SupervisorState),

    #[error("no database configured for {}", .0.display())]
    NoDatabase(PathBuf),

    #[error("replication engine error: {0}")]
    Engine(#[from] EngineError),
}
