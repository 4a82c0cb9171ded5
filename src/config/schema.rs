use crate::config::toml_config::substitute_env_vars;
use crate::domain::class::{ClassDescriptor, ClassRegistry};
use crate::utils::error::{MapperError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Record classes declared in TOML.
///
/// ```toml
/// [[classes]]
/// id = "Customer"
/// properties = [{ name = "name" }, { name = "email", visibility = "private" }]
/// methods = [{ name = "getEmail", returns = "email" }]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassSchema {
    #[serde(default)]
    pub classes: Vec<ClassDescriptor>,
}

impl ClassSchema {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MapperError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(&substitute_env_vars(content)).map_err(|e| MapperError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Registers every class; the first invalid or duplicate declaration fails.
    pub fn into_registry(self) -> Result<ClassRegistry> {
        let mut registry = ClassRegistry::new();
        for class in self.classes {
            registry.register(class)?;
        }
        tracing::info!("Loaded {} classes from schema", registry.len());
        Ok(registry)
    }
}
