use crate::config::{expand, ReplicaConfig};

use super::error::ReplicaError;
use super::s3_host;
use super::types::{
    AbsDescriptor, FileDescriptor, GcsDescriptor, ReplicaType, ResolvedReplica, S3Descriptor,
    SftpDescriptor,
};
use super::url::{is_url, normalize_bucket_path, parse_replica_url};

/// Determines the backend of a replica. A URL scheme wins over the `type`
/// field, and a replica with neither is a local file replica.
pub fn replica_type(config: &ReplicaConfig) -> Result<ReplicaType, ReplicaError> {
    let scheme = if config.url.is_empty() {
        None
    } else {
        parse_replica_url(&config.url).ok().map(|u| u.scheme)
    };

    match scheme.filter(|s| !s.is_empty()) {
        Some(scheme) => scheme.parse(),
        None if !config.replica_type.is_empty() => config.replica_type.parse(),
        None => Ok(ReplicaType::File),
    }
}

/// Resolves a replica configuration into a validated descriptor.
///
/// Explicit fields always win over values derived from the URL, field by field.
pub fn resolve(config: &ReplicaConfig) -> Result<ResolvedReplica, ReplicaError> {
    if is_url(&config.path) {
        return Err(ReplicaError::PathIsUrl(config.path.clone()));
    }

    let resolved = match replica_type(config)? {
        ReplicaType::File => ResolvedReplica::File(resolve_file(config)?),
        ReplicaType::S3 => ResolvedReplica::S3(resolve_s3(config)?),
        ReplicaType::Gcs => ResolvedReplica::Gcs(resolve_gcs(config)?),
        ReplicaType::Abs => ResolvedReplica::Abs(resolve_abs(config)?),
        ReplicaType::Sftp => ResolvedReplica::Sftp(resolve_sftp(config)?),
    };

    tracing::debug!(
        backend = %resolved.replica_type(),
        name = %config.name,
        "replica resolved"
    );
    Ok(resolved)
}

pub fn resolve_file(config: &ReplicaConfig) -> Result<FileDescriptor, ReplicaError> {
    ensure_exclusive(config, ReplicaType::File, "path", &config.path)?;

    let mut path = config.path.clone();
    if !config.url.is_empty() {
        path = parse_replica_url(&config.url)?.path;
    }
    require(ReplicaType::File, "path", &path)?;

    Ok(FileDescriptor {
        path: expand(&path)?,
    })
}

pub fn resolve_s3(config: &ReplicaConfig) -> Result<S3Descriptor, ReplicaError> {
    ensure_exclusive(config, ReplicaType::S3, "path", &config.path)?;
    ensure_exclusive(config, ReplicaType::S3, "bucket", &config.bucket)?;

    let mut bucket = config.bucket.clone();
    let mut path = config.path.clone();
    let mut region = config.region.clone();
    let mut endpoint = config.endpoint.clone();
    let mut url_path_style = false;

    if !config.url.is_empty() {
        let url = parse_replica_url(&config.url)?;
        let host = s3_host::parse_host(&url.host);

        fill(&mut path, url.path);
        fill(&mut bucket, host.bucket);
        fill(&mut region, host.region);
        fill(&mut endpoint, host.endpoint);
        url_path_style = host.force_path_style;
    }

    // Only AWS itself uses virtual-host addressing, and it takes no endpoint.
    let force_path_style = config
        .force_path_style
        .unwrap_or(!endpoint.is_empty() || url_path_style);

    require(ReplicaType::S3, "bucket", &bucket)?;

    Ok(S3Descriptor {
        access_key_id: config.access_key_id.clone(),
        secret_access_key: config.secret_access_key.clone(),
        bucket,
        path: normalize_bucket_path(&path),
        region,
        endpoint,
        force_path_style,
        skip_verify: config.skip_verify,
    })
}

pub fn resolve_gcs(config: &ReplicaConfig) -> Result<GcsDescriptor, ReplicaError> {
    ensure_exclusive(config, ReplicaType::Gcs, "path", &config.path)?;
    ensure_exclusive(config, ReplicaType::Gcs, "bucket", &config.bucket)?;

    let mut bucket = config.bucket.clone();
    let mut path = config.path.clone();

    if !config.url.is_empty() {
        let url = parse_replica_url(&config.url)?;
        fill(&mut path, url.path);
        fill(&mut bucket, url.host);
    }

    require(ReplicaType::Gcs, "bucket", &bucket)?;

    Ok(GcsDescriptor {
        bucket,
        path: normalize_bucket_path(&path),
    })
}

pub fn resolve_abs(config: &ReplicaConfig) -> Result<AbsDescriptor, ReplicaError> {
    ensure_exclusive(config, ReplicaType::Abs, "path", &config.path)?;
    ensure_exclusive(config, ReplicaType::Abs, "bucket", &config.bucket)?;

    let mut account_name = config.account_name.clone();
    let mut bucket = config.bucket.clone();
    let mut path = config.path.clone();

    if !config.url.is_empty() {
        let url = parse_replica_url(&config.url)?;
        fill(&mut account_name, url.username);
        fill(&mut bucket, url.host);
        fill(&mut path, url.path);
    }

    require(ReplicaType::Abs, "bucket", &bucket)?;

    Ok(AbsDescriptor {
        account_name,
        account_key: config.account_key.clone(),
        bucket,
        path: normalize_bucket_path(&path),
        endpoint: config.endpoint.clone(),
    })
}

pub fn resolve_sftp(config: &ReplicaConfig) -> Result<SftpDescriptor, ReplicaError> {
    ensure_exclusive(config, ReplicaType::Sftp, "path", &config.path)?;
    ensure_exclusive(config, ReplicaType::Sftp, "host", &config.host)?;

    let mut host = config.host.clone();
    let mut user = config.user.clone();
    let mut password = config.password.clone();
    let mut path = config.path.clone();

    if !config.url.is_empty() {
        let url = parse_replica_url(&config.url)?;
        fill(&mut host, url.host);
        fill(&mut user, url.username);
        fill(&mut password, url.password.unwrap_or_default());
        fill(&mut path, url.raw_path);
    }

    require(ReplicaType::Sftp, "host", &host)?;
    require(ReplicaType::Sftp, "user", &user)?;

    Ok(SftpDescriptor {
        host,
        user,
        password,
        path,
        key_path: config.key_path.clone(),
    })
}

fn ensure_exclusive(
    config: &ReplicaConfig,
    backend: ReplicaType,
    field: &'static str,
    value: &str,
) -> Result<(), ReplicaError> {
    if !config.url.is_empty() && !value.is_empty() {
        return Err(ReplicaError::Conflict { backend, field });
    }
    Ok(())
}

fn require(backend: ReplicaType, field: &'static str, value: &str) -> Result<(), ReplicaError> {
    if value.is_empty() {
        return Err(ReplicaError::MissingField { backend, field });
    }
    Ok(())
}

/// Sets `field` from the URL only when it was not configured explicitly.
fn fill(field: &mut String, derived: String) {
    if field.is_empty() {
        *field = derived;
    }
}
