use thiserror::Error;

use super::types::ReplicaType;
use crate::config::PathExpansionError;

#[derive(Error, Debug)]
pub enum UrlError {
    #[error("invalid replica url {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid percent-encoding in {component} of replica url {url}")]
    Escape { url: String, component: &'static str },

    /// The URL had no scheme. `host` and `path` hold what could still be parsed.
    #[error("replica url scheme required: {url}")]
    MissingScheme {
        url: String,
        host: String,
        path: String,
    },
}

#[derive(Error, Debug)]
pub enum ReplicaError {
    #[error(transparent)]
    Url(#[from] UrlError),

    #[error("replica path cannot be a url, please use the 'url' field instead: {0}")]
    PathIsUrl(String),

    #[error("cannot specify url & {field} for {backend} replica")]
    Conflict {
        backend: ReplicaType,
        field: &'static str,
    },

    #[error("{field} required for {backend} replica")]
    MissingField {
        backend: ReplicaType,
        field: &'static str,
    },

    #[error("unknown replica type in config: {0:?}")]
    UnknownType(String),

    #[error(transparent)]
    PathExpansion(#[from] PathExpansionError),
}
