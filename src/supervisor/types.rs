use std::time::Duration;

pub const DEFAULT_READINESS_ATTEMPTS: u32 = 10;
pub const DEFAULT_READINESS_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Idle,
    Waiting,
    Running,
    Stopped,
}

/// How long to wait for the database file before starting replication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_READINESS_ATTEMPTS,
            interval: DEFAULT_READINESS_INTERVAL,
        }
    }
}

/// Outcome of the readiness wait. Replication starts either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// The file was found (or could not be checked) on the given attempt.
    Ready { attempts: u32 },
    /// The file never appeared.
    GaveUp { attempts: u32 },
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready { .. })
    }
}
