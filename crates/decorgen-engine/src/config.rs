//! Generator configuration (decorgen.toml)
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Longest disambiguator a SHA-256 digest can supply, in hex characters.
pub const MAX_HASH_LENGTH: usize = 64;

/// Errors that can occur while loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Names and switches used by a generation pass
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// First namespace segment of every proxy (default: "Decorators")
    pub root_namespace: String,

    /// Type name of every proxy (default: "Decorator")
    pub proxy_class_name: String,

    /// Namespace of the dispatcher (default: "Decorators.Dispatch")
    pub dispatcher_namespace: String,

    /// Type name of the dispatcher (default: "DecoratorDispatcher")
    pub dispatcher_class_name: String,

    /// Artifact name of the dispatcher (default: "DecoratorDispatcher.g.cs")
    pub dispatcher_artifact: String,

    /// Runtime contract the dispatcher implements
    pub dispatcher_contract: String,

    /// Fully-qualified name of the base behavior provider
    pub behavior_provider_base: String,

    /// Type of the runtime allow-list field
    pub allow_list_type: String,

    /// Exception thrown by construction-only accessors
    pub not_supported_exception: String,

    /// Length of the hash disambiguator for colliding short names (default: 10)
    pub hash_length: usize,

    /// Fan extraction and emission out across threads (default: false)
    pub parallel: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            root_namespace: "Decorators".to_string(),
            proxy_class_name: "Decorator".to_string(),
            dispatcher_namespace: "Decorators.Dispatch".to_string(),
            dispatcher_class_name: "DecoratorDispatcher".to_string(),
            dispatcher_artifact: "DecoratorDispatcher.g.cs".to_string(),
            dispatcher_contract: "global::Decorgen.Runtime.IDecoratorDispatcher".to_string(),
            behavior_provider_base: "global::Decorgen.Runtime.BehaviorProvider".to_string(),
            allow_list_type: "global::System.Collections.Generic.HashSet<string>".to_string(),
            not_supported_exception: "global::System.NotSupportedException".to_string(),
            hash_length: 10,
            parallel: false,
        }
    }
}

impl GeneratorConfig {
    /// Parse and validate a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: GeneratorConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check that the configuration can produce valid output
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hash_length == 0 || self.hash_length > MAX_HASH_LENGTH {
            return Err(ConfigError::ValidationError(format!(
                "hash_length must be between 1 and {}, got {}",
                MAX_HASH_LENGTH, self.hash_length
            )));
        }

        let identifiers = [
            ("root_namespace", &self.root_namespace),
            ("proxy_class_name", &self.proxy_class_name),
            ("dispatcher_namespace", &self.dispatcher_namespace),
            ("dispatcher_class_name", &self.dispatcher_class_name),
        ];
        for (field, value) in identifiers {
            if !is_dotted_identifier(value) {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be a dotted identifier, got '{}'",
                    field, value
                )));
            }
        }

        let required = [
            ("dispatcher_artifact", &self.dispatcher_artifact),
            ("dispatcher_contract", &self.dispatcher_contract),
            ("behavior_provider_base", &self.behavior_provider_base),
            ("allow_list_type", &self.allow_list_type),
            ("not_supported_exception", &self.not_supported_exception),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!("{} must not be empty", field)));
            }
        }

        Ok(())
    }
}

fn is_dotted_identifier(value: &str) -> bool {
    !value.is_empty()
        && value.split('.').all(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) if first.is_alphabetic() || first == '_' => {
                    chars.all(|c| c.is_alphanumeric() || c == '_')
                }
                _ => false,
            }
        })
}
