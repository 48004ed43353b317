pub mod error;
pub mod readiness;
pub mod server;
pub mod types;

use async_trait::async_trait;

pub use error::SupervisorError;
pub use readiness::wait_for_db;
pub use server::{NoopSupervisor, Supervisor};
pub use types::{Readiness, ReadinessPolicy, SupervisorState};

/// Start/stop lifecycle of a backup server.
#[async_trait]
pub trait BackupServer: Send {
    async fn start(&mut self) -> Result<(), SupervisorError>;

    fn stop(&mut self);
}
