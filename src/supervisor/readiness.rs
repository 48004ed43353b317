use std::io::ErrorKind;
use std::path::Path;

use tokio::time::sleep;

use super::types::{Readiness, ReadinessPolicy};
use crate::engine::metrics::READINESS_ATTEMPTS;

/// Polls for `path` until it exists or the policy's attempts run out.
///
/// Exhausting the attempts is not an error; the caller proceeds and the engine
/// picks the file up once it appears.
pub async fn wait_for_db(path: &Path, policy: ReadinessPolicy) -> Readiness {
    for attempt in 1..=policy.attempts {
        READINESS_ATTEMPTS.inc();

        match tokio::fs::metadata(path).await {
            Ok(_) => return Readiness::Ready { attempts: attempt },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), attempt, "database file does not exist");
                if attempt < policy.attempts {
                    sleep(policy.interval).await;
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot stat database file, proceeding");
                return Readiness::Ready { attempts: attempt };
            }
        }
    }

    tracing::warn!(
        path = %path.display(),
        attempts = policy.attempts,
        "database file did not appear, starting replication anyway"
    );
    Readiness::GaveUp {
        attempts: policy.attempts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    fn fast(attempts: u32) -> ReadinessPolicy {
        ReadinessPolicy {
            attempts,
            interval: Duration::from_millis(10),
        }
    }

    #[tokio::test]
    async fn test_existing_file_is_ready_on_first_attempt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.db");
        std::fs::write(&path, b"").unwrap();

        assert_eq!(wait_for_db(&path, fast(5)).await, Readiness::Ready { attempts: 1 });
    }

    #[tokio::test]
    async fn test_missing_file_gives_up_after_bounded_attempts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.db");

        let started = Instant::now();
        let readiness = wait_for_db(&path, fast(3)).await;
        assert_eq!(readiness, Readiness::GaveUp { attempts: 3 });
        assert!(!readiness.is_ready());
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_file_appearing_mid_wait() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("late.db");

        let writer_path = path.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(30)).await;
            tokio::fs::write(&writer_path, b"").await.unwrap();
        });

        let policy = ReadinessPolicy {
            attempts: 50,
            interval: Duration::from_millis(10),
        };
        let readiness = wait_for_db(&path, policy).await;
        assert!(readiness.is_ready());
        assert!(matches!(readiness, Readiness::Ready { attempts } if attempts > 1));
    }

    #[tokio::test]
    async fn test_zero_attempts_gives_up_immediately() {
        let readiness = wait_for_db(Path::new("/nonexistent/app.db"), fast(0)).await;
        assert_eq!(readiness, Readiness::GaveUp { attempts: 0 });
    }
}
