use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

use regex::{Captures, Regex};
use thiserror::Error;

lazy_static::lazy_static! {
    static ref ENV_VAR: Regex = Regex::new(r"\$\{([^}]*)\}|\$([A-Za-z0-9_]+)").unwrap();
}

#[derive(Error, Debug)]
pub enum PathExpansionError {
    #[error("cannot expand path {0}, no home directory available")]
    NoHomeDir(String),

    #[error("cannot resolve absolute path for {path}: {source}")]
    Absolute {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Returns an absolute path for `path`, replacing a leading `~` with the
/// current user's home directory.
pub fn expand(path: &str) -> Result<PathBuf, PathExpansionError> {
    let prefix = format!("~{}", MAIN_SEPARATOR);
    if path != "~" && !path.starts_with(&prefix) {
        return absolute(path);
    }

    let home = dirs::home_dir()
        .filter(|home| !home.as_os_str().is_empty())
        .ok_or_else(|| PathExpansionError::NoHomeDir(path.to_string()))?;

    if path == "~" {
        return Ok(home);
    }
    Ok(normalize(&home.join(&path[prefix.len()..])))
}

fn absolute(path: &str) -> Result<PathBuf, PathExpansionError> {
    let p = Path::new(path);
    if p.is_absolute() {
        return Ok(normalize(p));
    }

    let cwd = std::env::current_dir().map_err(|source| PathExpansionError::Absolute {
        path: path.to_string(),
        source,
    })?;
    Ok(normalize(&cwd.join(p)))
}

/// Lexically removes `.` and `..` segments. `..` at the root stays at the root.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Replaces `$VAR` and `${VAR}` with the value of the environment variable.
/// Unset variables expand to the empty string.
pub fn expand_env(input: &str) -> String {
    ENV_VAR
        .replace_all(input, |caps: &Captures| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map_or("", |m| m.as_str());
            std::env::var(name).unwrap_or_default()
        })
        .into_owned()
}
