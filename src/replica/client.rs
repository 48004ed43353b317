use std::path::PathBuf;

use super::types::{
    AbsDescriptor, FileDescriptor, GcsDescriptor, ReplicaType, ResolvedReplica, S3Descriptor,
    SftpDescriptor,
};

/// Client for one replica destination. The replication engine drives reads and
/// writes through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplicaClient {
    File(FileReplicaClient),
    S3(S3ReplicaClient),
    Gcs(GcsReplicaClient),
    Abs(AbsReplicaClient),
    Sftp(SftpReplicaClient),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReplicaClient {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct S3ReplicaClient {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    pub path: String,
    pub region: String,
    pub endpoint: String,
    pub force_path_style: bool,
    pub skip_verify: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GcsReplicaClient {
    pub bucket: String,
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbsReplicaClient {
    pub account_name: String,
    pub account_key: String,
    pub bucket: String,
    pub path: String,
    pub endpoint: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SftpReplicaClient {
    pub host: String,
    pub user: String,
    pub password: String,
    pub path: String,
    pub key_path: String,
}

impl ReplicaClient {
    /// Builds the client for a resolved descriptor. No I/O happens here.
    pub fn from_resolved(resolved: ResolvedReplica) -> Self {
        match resolved {
            ResolvedReplica::File(FileDescriptor { path }) => {
                ReplicaClient::File(FileReplicaClient { path })
            }
            ResolvedReplica::S3(d) => ReplicaClient::S3(S3ReplicaClient::from(d)),
            ResolvedReplica::Gcs(GcsDescriptor { bucket, path }) => {
                ReplicaClient::Gcs(GcsReplicaClient { bucket, path })
            }
            ResolvedReplica::Abs(d) => ReplicaClient::Abs(AbsReplicaClient {
                account_name: d.account_name,
                account_key: d.account_key,
                bucket: d.bucket,
                path: d.path,
                endpoint: d.endpoint,
            }),
            ResolvedReplica::Sftp(d) => ReplicaClient::Sftp(SftpReplicaClient::from(d)),
        }
    }

    pub fn replica_type(&self) -> ReplicaType {
        match self {
            ReplicaClient::File(_) => ReplicaType::File,
            ReplicaClient::S3(_) => ReplicaType::S3,
            ReplicaClient::Gcs(_) => ReplicaType::Gcs,
            ReplicaClient::Abs(_) => ReplicaType::Abs,
            ReplicaClient::Sftp(_) => ReplicaType::Sftp,
        }
    }

    /// URL-style location of the replica root, without credentials.
    pub fn location(&self) -> String {
        match self {
            ReplicaClient::File(c) => c.path.to_string_lossy().into_owned(),
            ReplicaClient::S3(c) => format!("s3://{}", join_key(&c.bucket, &c.path)),
            ReplicaClient::Gcs(c) => format!("gs://{}", join_key(&c.bucket, &c.path)),
            ReplicaClient::Abs(c) if c.account_name.is_empty() => {
                format!("abs://{}", join_key(&c.bucket, &c.path))
            }
            ReplicaClient::Abs(c) => {
                format!("abs://{}@{}", c.account_name, join_key(&c.bucket, &c.path))
            }
            ReplicaClient::Sftp(c) => format!("sftp://{}@{}{}", c.user, c.host, c.path),
        }
    }
}

impl From<S3Descriptor> for S3ReplicaClient {
    fn from(d: S3Descriptor) -> Self {
        Self {
            access_key_id: d.access_key_id,
            secret_access_key: d.secret_access_key,
            bucket: d.bucket,
            path: d.path,
            region: d.region,
            endpoint: d.endpoint,
            force_path_style: d.force_path_style,
            skip_verify: d.skip_verify,
        }
    }
}

impl From<SftpDescriptor> for SftpReplicaClient {
    fn from(d: SftpDescriptor) -> Self {
        Self {
            host: d.host,
            user: d.user,
            password: d.password,
            path: d.path,
            key_path: d.key_path,
        }
    }
}

fn join_key(base: &str, rest: &str) -> String {
    if rest.is_empty() {
        return base.to_string();
    }
    if base.is_empty() {
        return rest.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s3(path: &str) -> ReplicaClient {
        ReplicaClient::from_resolved(ResolvedReplica::S3(S3Descriptor {
            bucket: "bucket".to_string(),
            path: path.to_string(),
            region: "us-east-1".to_string(),
            force_path_style: true,
            ..Default::default()
        }))
    }

    #[test]
    fn test_factory_assigns_every_field() {
        let client = ReplicaClient::from_resolved(ResolvedReplica::S3(S3Descriptor {
            access_key_id: "AK".to_string(),
            secret_access_key: "SK".to_string(),
            bucket: "b".to_string(),
            path: "p".to_string(),
            region: "r".to_string(),
            endpoint: "http://e".to_string(),
            force_path_style: true,
            skip_verify: true,
        }));
        let ReplicaClient::S3(c) = client else {
            panic!("expected s3 client");
        };
        assert_eq!(c.access_key_id, "AK");
        assert_eq!(c.secret_access_key, "SK");
        assert_eq!(c.bucket, "b");
        assert_eq!(c.path, "p");
        assert_eq!(c.region, "r");
        assert_eq!(c.endpoint, "http://e");
        assert!(c.force_path_style);
        assert!(c.skip_verify);

        let client = ReplicaClient::from_resolved(ResolvedReplica::Sftp(SftpDescriptor {
            host: "h:22".to_string(),
            user: "u".to_string(),
            password: "pw".to_string(),
            path: "/srv".to_string(),
            key_path: "/k".to_string(),
        }));
        assert_eq!(client.replica_type(), ReplicaType::Sftp);
        assert_eq!(client.location(), "sftp://u@h:22/srv");
    }

    #[test]
    fn test_locations() {
        assert_eq!(s3("db").location(), "s3://bucket/db");
        assert_eq!(s3("").location(), "s3://bucket");

        let abs = ReplicaClient::from_resolved(ResolvedReplica::Abs(AbsDescriptor {
            account_name: "acct".to_string(),
            bucket: "container".to_string(),
            path: "db".to_string(),
            ..Default::default()
        }));
        assert_eq!(abs.location(), "abs://acct@container/db");

        let file = ReplicaClient::from_resolved(ResolvedReplica::File(FileDescriptor {
            path: PathBuf::from("/backups/app"),
        }));
        assert_eq!(file.location(), "/backups/app");
        assert_eq!(file.replica_type(), ReplicaType::File);
    }
}
