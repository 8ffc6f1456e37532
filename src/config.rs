//! Client configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{DriverError, DriverResult};
use crate::util::check_name;

/// Connection settings for a remote graph
///
/// ```yaml
/// url: http://127.0.0.1:8080
/// graph: hugegraph
/// timeout_secs: 20
/// page_size: 500
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the graph server
    pub url: String,
    /// Name of the graph to operate on
    pub graph: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Default page size for iteration
    pub page_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8080".to_string(),
            graph: "hugegraph".to_string(),
            timeout_secs: 20,
            page_size: 500,
        }
    }
}

impl ClientConfig {
    pub fn new(url: impl Into<String>, graph: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            graph: graph.into(),
            ..Default::default()
        }
    }

    /// Parse a YAML document; missing fields take their defaults
    pub fn from_yaml_str(yaml: &str) -> DriverResult<Self> {
        let config: ClientConfig =
            serde_yaml::from_str(yaml).map_err(|e| DriverError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> DriverResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> DriverResult<()> {
        if self.url.is_empty() {
            return Err(DriverError::Config("url can't be empty".to_string()));
        }
        check_name(&self.graph)?;
        if self.page_size == 0 {
            return Err(DriverError::Config("page_size must be positive".to_string()));
        }
        Ok(())
    }
}
