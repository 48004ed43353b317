use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::error::ReplicaError;

/// Backend family of a replica.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplicaType {
    File,
    S3,
    Gcs,
    Abs,
    Sftp,
}

impl ReplicaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplicaType::File => "file",
            ReplicaType::S3 => "s3",
            ReplicaType::Gcs => "gs",
            ReplicaType::Abs => "abs",
            ReplicaType::Sftp => "sftp",
        }
    }
}

impl fmt::Display for ReplicaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReplicaType {
    type Err = ReplicaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(ReplicaType::File),
            "s3" => Ok(ReplicaType::S3),
            "gs" => Ok(ReplicaType::Gcs),
            "abs" => Ok(ReplicaType::Abs),
            "sftp" => Ok(ReplicaType::Sftp),
            other => Err(ReplicaError::UnknownType(other.to_string())),
        }
    }
}

/// Fully resolved connection parameters for one replica.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedReplica {
    File(FileDescriptor),
    S3(S3Descriptor),
    Gcs(GcsDescriptor),
    Abs(AbsDescriptor),
    Sftp(SftpDescriptor),
}

impl ResolvedReplica {
    pub fn replica_type(&self) -> ReplicaType {
        match self {
            ResolvedReplica::File(_) => ReplicaType::File,
            ResolvedReplica::S3(_) => ReplicaType::S3,
            ResolvedReplica::Gcs(_) => ReplicaType::Gcs,
            ResolvedReplica::Abs(_) => ReplicaType::Abs,
            ResolvedReplica::Sftp(_) => ReplicaType::Sftp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Absolute path of the replica directory.
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct S3Descriptor {
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
pub struct GcsDescriptor {
    pub bucket: String,
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbsDescriptor {
    pub account_name: String,
    pub account_key: String,
    pub bucket: String,
    pub path: String,
    pub endpoint: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SftpDescriptor {
    /// Host, including the port when one is given.
    pub host: String,
    pub user: String,
    pub password: String,
    pub path: String,
    pub key_path: String,
}
