pub mod client;
pub mod error;
pub mod resolve;
pub mod s3_host;
pub mod types;
pub mod url;

pub use client::ReplicaClient;
pub use error::{ReplicaError, UrlError};
pub use resolve::{replica_type, resolve};
pub use types::{ReplicaType, ResolvedReplica};
pub use self::url::{parse_replica_url, ReplicaUrl};
