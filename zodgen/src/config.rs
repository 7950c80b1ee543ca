//! Generator configuration: the namespace identifier plus the token registry.

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::creators::Namespace;
use crate::errors::{GenError, Result};
use crate::lexical::check_identifier;
use crate::tokens::TokenRegistry;

const BUILTIN_TOKENS: &str = include_str!("../registry/zod.toml");

/// Configuration every value-kind builder is composed from.
///
/// In TOML the registry tables sit next to `namespace`:
///
/// ```toml
/// namespace = "z"
///
/// [shared]
/// optional = "optional"
///
/// [kinds.string.members]
/// starts_with = "startsWith"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(flatten)]
    pub registry: TokenRegistry,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            registry: TokenRegistry::default(),
        }
    }
}

fn default_namespace() -> String {
    "z".to_string()
}

impl GeneratorConfig {
    pub fn new(namespace: impl Into<String>, registry: TokenRegistry) -> Self {
        Self {
            namespace: namespace.into(),
            registry,
        }
    }

    /// The embedded zod token table.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_TOKENS)
    }

    /// Parses and validates a TOML token table.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        debug!(
            "loaded token table: namespace `{}`, {} kinds, {} shared tokens",
            config.namespace,
            config.registry.kinds.len(),
            config.registry.shared.len()
        );
        Ok(config)
    }

    /// Reads, parses and validates a TOML token table from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| GenError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_identifier(&self.namespace)?;
        self.registry.validate()
    }

    /// Identifier factory for the configured namespace.
    pub fn namespace_factory(&self) -> Result<Namespace> {
        Namespace::new(self.namespace.as_str())
    }
}
