use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

#[derive(Debug, Deserialize, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct ListenConfig {
    pub(crate) host: String,
    pub(crate) port: u16,
}

const DEFAULT_HTTP_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";
fn default_listen() -> ListenConfig {
    ListenConfig {
        host: DEFAULT_HOST.to_string(),
        port: DEFAULT_HTTP_PORT,
    }
}

// This handles the case where the `listen` block is PRESENT, but a field may be missing.
fn deserialize_listen_with_defaults<'de, D>(deserializer: D) -> Result<ListenConfig, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct PartialListenConfig {
        host: Option<String>,
        port: Option<u16>,
    }

    let partial_config = PartialListenConfig::deserialize(deserializer)?;

    Ok(ListenConfig {
        host: partial_config
            .host
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: partial_config.port.unwrap_or(DEFAULT_HTTP_PORT),
    })
}

fn default_map_file() -> PathBuf {
    "location_map.html".into()
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EnvConfig {
    #[serde(default = "default_listen")]
    #[serde(deserialize_with = "deserialize_listen_with_defaults")]
    pub(crate) listen: ListenConfig,
    pub(crate) database: String,
    /// The file that the latest generated map page is written to. There is a
    /// single slot: every map generation overwrites it.
    #[serde(default = "default_map_file")]
    pub(crate) map_file: PathBuf,
    /// When enabled, creating or updating a location rejects latitudes
    /// outside ±90 and longitudes outside ±180. Off by default: the upstream
    /// data model accepted any value.
    #[serde(default)]
    pub(crate) coordinate_limits: bool,
}

impl EnvConfig {
    /// Load the configuration for the named environment from a yaml file that
    /// maps environment names to their settings
    pub(crate) fn load<P: AsRef<Path>>(path: P, envname: &str) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let mut configs: HashMap<String, EnvConfig> = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
        configs
            .remove(envname)
            .with_context(|| format!("No environment '{envname}' in '{}'", path.display()))
    }
}
