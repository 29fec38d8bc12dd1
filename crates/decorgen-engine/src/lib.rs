//! Decorgen Engine
//!
//! Synthesizes decorator proxies from a pre-resolved metadata model:
//! - **Model**: type references, member descriptors, decorator units (`model` module)
//! - **Host**: the metadata catalog the host compilation hands over (`host` module)
//! - **Validation**: rejects ineligible (contract, provider) pairs with diagnostics
//! - **Extraction**: member surface and provider hook resolution (`extract` module)
//! - **Naming**: deterministic, collision-free identities for every unit
//! - **Emission**: proxy and dispatcher source text (`emit` module)
//!
//! # Example
//!
//! ```rust,ignore
//! use decorgen_engine::{CancellationToken, Generator, GeneratorConfig, MetadataCatalog, Trigger};
//!
//! let catalog = MetadataCatalog::from_json(&json)?;
//! let generator = Generator::new(&catalog, GeneratorConfig::default());
//! let output = generator.generate(&triggers, &CancellationToken::new())?;
//!
//! for artifact in &output.artifacts {
//!     println!("{}: {} bytes", artifact.name, artifact.text.len());
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// ============================================================================
// Core Modules
// ============================================================================

/// Metadata model: type references, members, decorator units
pub mod model;

/// Host-supplied metadata catalog and type graph helpers
pub mod host;

/// Member extraction and provider hook resolution
pub mod extract;

/// Deterministic identity assignment across all units of a pass
pub mod naming;

/// Source text synthesis for proxies and the dispatcher
pub mod emit;

/// Trigger validation
pub mod validate;

/// Generation pass driver
pub mod pipeline;

// ============================================================================
// Ambient Modules
// ============================================================================

/// Cooperative cancellation
pub mod cancel;

/// Generator configuration
pub mod config;

/// Structured diagnostics reported back to the host
pub mod diagnostics;

/// Error types
pub mod error;

// ============================================================================
// Re-exports
// ============================================================================

pub use cancel::CancellationToken;
pub use config::{ConfigError, GeneratorConfig};
pub use diagnostics::{Diagnostic, Severity, SourceLocation};
pub use emit::SourceArtifact;
pub use error::{GenerationError, GenerationResult};
pub use host::{MetadataCatalog, TypeDefinition, TypeHost, TypeKind};
pub use model::{
    AccessorKind, DecoratorUnit, GeneratedIdentity, HookKind, MethodDescriptor,
    ParameterDescriptor, PassingMode, PropertyDescriptor, ReturnShape, TypeReference,
};
pub use pipeline::{GenerationOutput, Generator};
pub use validate::Trigger;
