use std::borrow::Cow;

use percent_encoding::percent_decode_str;
use regex::Regex;
use url::Url;

use super::error::UrlError;

lazy_static::lazy_static! {
    static ref URL_PREFIX: Regex = Regex::new(r"^\w+://").unwrap();
    static ref ESCAPE: Regex = Regex::new(r"%([0-9A-Fa-f]{2})?").unwrap();
}

/// The parts of a replica URL the resolver cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplicaUrl {
    pub scheme: String,
    /// Host including the port, if one was given.
    pub host: String,
    /// Cleaned, bucket-relative path (no leading separator).
    pub path: String,
    /// Decoded URL path exactly as written.
    pub raw_path: String,
    pub username: String,
    pub password: Option<String>,
}

/// Returns true if `s` starts with a `scheme://` prefix.
pub fn is_url(s: &str) -> bool {
    URL_PREFIX.is_match(s)
}

/// Splits a replica URL into scheme, host and normalized path.
///
/// `file://` URLs return the cleaned absolute path and no host. A URL without a
/// scheme fails with [`UrlError::MissingScheme`], which still carries the host
/// and path that could be parsed.
pub fn parse_replica_url(s: &str) -> Result<ReplicaUrl, UrlError> {
    let parsed = match Url::parse(s) {
        Ok(parsed) => parsed,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let (host, path) = split_relative(s);
            return Err(UrlError::MissingScheme {
                url: s.to_string(),
                host,
                path,
            });
        }
        Err(source) => {
            return Err(UrlError::Parse {
                url: s.to_string(),
                source,
            })
        }
    };

    let host = authority(&parsed);
    let raw_path = decode(s, "path", parsed.path())?;

    if parsed.scheme() == "file" {
        // A host in a file URL is treated as the first path segment.
        let full = if host.is_empty() {
            raw_path.clone()
        } else {
            format!("/{}{}", host, raw_path)
        };
        return Ok(ReplicaUrl {
            scheme: "file".to_string(),
            host: String::new(),
            path: clean_path(&full),
            raw_path,
            username: String::new(),
            password: None,
        });
    }

    Ok(ReplicaUrl {
        scheme: parsed.scheme().to_string(),
        host,
        path: normalize_bucket_path(&raw_path),
        raw_path,
        username: decode(s, "username", parsed.username())?,
        password: parsed
            .password()
            .map(|p| decode(s, "password", p))
            .transpose()?,
    })
}

/// Cleans a bucket-relative path: traversal segments are resolved, the leading
/// separator is dropped and the bucket root becomes the empty string.
pub fn normalize_bucket_path(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    let cleaned = clean_path(path);
    let trimmed = cleaned.strip_prefix('/').unwrap_or(&cleaned);
    match trimmed {
        "." => String::new(),
        other => other.to_string(),
    }
}

/// Lexical path cleaning for `/`-separated paths.
///
/// Repeated separators collapse, `.` segments are removed, `..` removes the
/// preceding segment and `..` at the root is dropped. An empty result is `.`.
pub fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.last().map_or(false, |last| *last != "..") {
                    parts.pop();
                } else if !rooted {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    if rooted {
        format!("/{}", joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

fn authority(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    }
}

/// Best-effort split of a scheme-less reference into host and path.
fn split_relative(s: &str) -> (String, String) {
    let s = s.split(|c| c == '?' || c == '#').next().unwrap_or_default();
    match s.strip_prefix("//") {
        Some(rest) => match rest.find('/') {
            Some(i) => (rest[..i].to_string(), rest[i..].to_string()),
            None => (rest.to_string(), String::new()),
        },
        None => (String::new(), s.to_string()),
    }
}

/// Percent-decodes one URL component. Escapes must be `%XX` and the decoded
/// bytes must be UTF-8.
fn decode(url: &str, component: &'static str, value: &str) -> Result<String, UrlError> {
    let invalid = || UrlError::Escape {
        url: url.to_string(),
        component,
    };

    if ESCAPE.captures_iter(value).any(|caps| caps.get(1).is_none()) {
        return Err(invalid());
    }

    percent_decode_str(value)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| invalid())
}
