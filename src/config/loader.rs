use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, info, warn};

use super::error::ConfigError;
use super::expand::{expand, expand_env};
use super::types::Config;

/// Environment variable naming the config file used when none is given.
pub const CONFIG_ENV: &str = "LITEREPLICA_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "/etc/litereplica.yml";
pub const LOCAL_CONFIG_PATH: &str = "./litereplica.yml";

pub fn default_config_path() -> String {
    match std::env::var(CONFIG_ENV) {
        Ok(v) if !v.is_empty() => v,
        _ => DEFAULT_CONFIG_PATH.to_string(),
    }
}

/// Reads the configuration from `filename`, falling back to the local and
/// default config paths.
///
/// A missing file is only an error when it was named explicitly. When none of
/// the candidates exist the default config is returned.
pub fn read_config_file(filename: Option<&str>, expand_env: bool) -> Result<Config, ConfigError> {
    let explicit = filename.filter(|f| !f.is_empty());

    let mut candidates: Vec<(String, bool)> = Vec::new();
    if let Some(name) = explicit {
        candidates.push((name.to_string(), true));
    }
    candidates.push((LOCAL_CONFIG_PATH.to_string(), false));
    candidates.push((default_config_path(), false));

    for (name, is_explicit) in candidates {
        match load_file(&name, expand_env) {
            Err(ConfigError::NotFound(path)) if !is_explicit => {
                debug!(path = %path.display(), "config candidate not found");
                continue;
            }
            other => return other,
        }
    }

    warn!("no config file found, using defaults");
    Ok(Config::default())
}

fn load_file(filename: &str, expand_vars: bool) -> Result<Config, ConfigError> {
    let path = expand(filename)?;

    let mut contents = std::fs::read_to_string(&path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            ConfigError::NotFound(path.clone())
        } else {
            ConfigError::Io {
                path: path.clone(),
                source,
            }
        }
    })?;

    if expand_vars {
        contents = expand_env(&contents);
    }

    let config = parse_config(&path, &contents)?;
    info!(path = %path.display(), dbs = config.dbs.len(), "config loaded");
    Ok(config)
}

/// Deserializes a document, normalizes database paths and propagates global
/// credentials to replicas.
fn parse_config(path: &Path, contents: &str) -> Result<Config, ConfigError> {
    let mut config: Config = if contents.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?
    };

    for db in &mut config.dbs {
        db.path = expand(&db.path)?.to_string_lossy().into_owned();
    }

    config.propagate_global_settings();
    Ok(config)
}
