//! External configuration: per-service properties from the environment,
//! a credentials file, or memory.

use crate::error::{ResultsError, ResultsResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Property keys recognised for a service, lower-cased and without the
/// service prefix.
pub const PROPERTY_KEYS: &[&str] = &[
    "url",
    "auth_type",
    "apikey",
    "auth_url",
    "bearer_token",
    "username",
    "password",
    "enable_gzip",
    "enable_retries",
    "max_retries",
    "retry_interval",
];

/// Source of per-service configuration properties.
pub trait ConfigProvider: Send + Sync {
    /// Properties configured for `service_name`. Unconfigured services yield
    /// an empty property set.
    fn service_properties(&self, service_name: &str) -> ResultsResult<ServiceProperties>;
}

/// Properties configured for one service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceProperties {
    service_name: String,
    values: HashMap<String, String>,
}

impl ServiceProperties {
    pub fn new(service_name: impl Into<String>, values: HashMap<String, String>) -> Self {
        Self {
            service_name: service_name.into(),
            values: values
                .into_iter()
                .map(|(key, value)| (key.to_ascii_lowercase(), value))
                .collect(),
        }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw value of a property. Blank values count as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    pub fn url(&self) -> Option<&str> {
        self.get("url")
    }

    pub fn auth_type(&self) -> Option<&str> {
        self.get("auth_type")
    }

    /// Boolean property; accepts `true`/`false` in any case.
    pub fn bool(&self, key: &str) -> ResultsResult<Option<bool>> {
        self.get(key)
            .map(|value| {
                value.to_ascii_lowercase().parse::<bool>().map_err(|_| {
                    ResultsError::Config(format!(
                        "{} for service {} must be true or false, got {value}",
                        key.to_ascii_uppercase(),
                        self.service_name
                    ))
                })
            })
            .transpose()
    }

    /// Unsigned integer property.
    pub fn u64(&self, key: &str) -> ResultsResult<Option<u64>> {
        self.get(key)
            .map(|value| {
                value.parse::<u64>().map_err(|_| {
                    ResultsError::Config(format!(
                        "{} for service {} must be a non-negative integer, got {value}",
                        key.to_ascii_uppercase(),
                        self.service_name
                    ))
                })
            })
            .transpose()
    }
}

/// Environment variable prefix for a service: upper case, `-` replaced by `_`.
pub fn env_prefix(service_name: &str) -> String {
    service_name.to_ascii_uppercase().replace('-', "_")
}

/// Reads `<SERVICE>_<KEY>` variables from the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvConfigProvider;

impl ConfigProvider for EnvConfigProvider {
    fn service_properties(&self, service_name: &str) -> ResultsResult<ServiceProperties> {
        let prefix = env_prefix(service_name);
        let values = PROPERTY_KEYS
            .iter()
            .filter_map(|key| {
                let var = format!("{prefix}_{}", key.to_ascii_uppercase());
                std::env::var(var).ok().map(|value| (key.to_string(), value))
            })
            .collect();

        Ok(ServiceProperties::new(service_name, values))
    }
}

/// Reads a TOML credentials file with one table per service:
///
/// ```toml
/// [compliance_results]
/// url = "https://us-south.compliance.cloud.ibm.com/instances/abc/v3"
/// auth_type = "iam"
/// apikey = "..."
/// ```
#[derive(Debug, Clone)]
pub struct FileConfigProvider {
    path: PathBuf,
}

impl FileConfigProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigProvider for FileConfigProvider {
    fn service_properties(&self, service_name: &str) -> ResultsResult<ServiceProperties> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            ResultsError::Config(format!(
                "failed to read credentials file {}: {e}",
                self.path.display()
            ))
        })?;
        let document: toml::Table = toml::from_str(&content).map_err(|e| {
            ResultsError::Config(format!(
                "failed to parse credentials file {}: {e}",
                self.path.display()
            ))
        })?;

        let Some(table) = document.get(service_name).and_then(toml::Value::as_table) else {
            return Ok(ServiceProperties::new(service_name, HashMap::new()));
        };

        let values = table
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    toml::Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                (key.clone(), value)
            })
            .collect();

        Ok(ServiceProperties::new(service_name, values))
    }
}

/// In-memory properties keyed by service name.
#[derive(Debug, Clone, Default)]
pub struct MapConfigProvider {
    services: HashMap<String, HashMap<String, String>>,
}

impl MapConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one property of a service.
    pub fn with(
        mut self,
        service_name: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.services
            .entry(service_name.into())
            .or_default()
            .insert(key.into(), value.into());
        self
    }
}

impl ConfigProvider for MapConfigProvider {
    fn service_properties(&self, service_name: &str) -> ResultsResult<ServiceProperties> {
        Ok(ServiceProperties::new(
            service_name,
            self.services.get(service_name).cloned().unwrap_or_default(),
        ))
    }
}
