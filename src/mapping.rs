use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("failed to read mapping file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse mapping file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// One named redirect rule, optionally bounded to a time window.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Mapping {
    /// Names (aliases) this rule is reachable under.
    pub name: Vec<String>,

    /// URL to redirect to.
    pub target: String,

    /// Redirect status to send; 303 when unset or zero.
    #[serde(default)]
    pub http_code: Option<u16>,

    /// Unix time before which the rule is not yet active.
    #[serde(default)]
    pub premier_time: Option<i64>,

    /// Unix time after which the rule stops matching. Zero or unset means
    /// never expires.
    #[serde(default)]
    pub expire_time: Option<i64>,
}

impl Mapping {
    /// Whether this mapping should be served at `when` (unix seconds).
    pub fn allowed(&self, when: i64) -> bool {
        if when < self.premier_time.unwrap_or(0) {
            return false;
        }
        let expire = self.expire_time.unwrap_or(0);
        if expire > 0 && when > expire {
            return false;
        }
        true
    }
}

/// Lookup table from name to mapping. BTreeMap keeps `/list` output in key
/// order for free.
pub type ServiceMap = BTreeMap<String, Mapping>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MappingFile {
    #[serde(default)]
    mapping: Vec<Mapping>,
}

/// Parse the mapping file into a fresh lookup table. Every alias points at
/// its whole record; a name declared by two records resolves to the later
/// one. Callers decide whether to install the result.
pub fn load(path: &Path) -> Result<ServiceMap, MappingError> {
    let contents = fs::read_to_string(path).map_err(|source| MappingError::Read {
        path: path.to_owned(),
        source,
    })?;
    let records: MappingFile =
        toml::from_str(&contents).map_err(|source| MappingError::Parse {
            path: path.to_owned(),
            source,
        })?;

    let mut map = ServiceMap::new();
    for record in records.mapping {
        for name in &record.name {
            map.insert(name.clone(), record.clone());
        }
    }
    Ok(map)
}
