//! Generation errors

use thiserror::Error;

use crate::config::ConfigError;
use crate::model::HookKind;

/// Result alias for fallible generation steps
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Errors raised while generating
///
/// Only `Cancelled` aborts a whole pass; the rest are scoped to the unit
/// that raised them and surface as diagnostics.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The host requested cancellation
    #[error("Generation was cancelled")]
    Cancelled,

    /// No type in the provider's chain declares the hook
    #[error("Provider '{provider}' has no reachable {kind} hook")]
    UnresolvedHook {
        /// Fully-qualified provider name
        provider: String,
        /// The hook kind that was looked up
        kind: HookKind,
    },

    /// The provider cannot be instantiated by the dispatcher
    #[error("Provider '{provider}' has no accessible constructor")]
    NoConstructor {
        /// Fully-qualified provider name
        provider: String,
    },

    /// A type reference the host cannot resolve
    #[error("Type '{name}' is not known to the host")]
    UnknownType {
        /// Fully-qualified name that failed to resolve
        name: String,
    },

    /// Configuration failed to load or validate
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
