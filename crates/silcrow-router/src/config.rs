use serde::Deserialize;
use std::path::Path;

use crate::error::{ConfigError, RouterError};
use crate::table::RouteTable;

/// Route file contents, usually loaded from `routes.toml`
///
/// ```toml
/// prefix = "/"
/// case_insensitive = false
///
/// [[route]]
/// pattern = "photos/+photoIds&"
/// destination = "photos"
/// ```
///
/// `[[route]]` order is the registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RouteConfig {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub case_insensitive: bool,
    #[serde(default, rename = "route")]
    pub routes: Vec<RouteEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RouteEntry {
    pub pattern: String,
    pub destination: String,
}

impl RouteConfig {
    /// Load from a specific path.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Compiles the declared routes into a table
    pub fn compile(&self) -> Result<RouteTable, RouterError> {
        crate::compile(
            &self.prefix,
            self.routes
                .iter()
                .map(|entry| (entry.pattern.as_str(), entry.destination.as_str())),
            self.case_insensitive,
        )
    }
}
