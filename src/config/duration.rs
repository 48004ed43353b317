use std::time::Duration;

use serde::de::Error;
use serde::{Deserialize, Deserializer};

/// Deserializes an optional human-readable duration such as `"10s"` or `"24h"`.
pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    value
        .map(|s| {
            humantime::parse_duration(s.trim())
                .map_err(|e| D::Error::custom(format!("invalid duration {:?}: {}", s, e)))
        })
        .transpose()
}
