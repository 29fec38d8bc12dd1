//! Metadata model
//!
//! Immutable values describing what a generation pass works on. Everything
//! here is produced by the host (type references, members) or derived once
//! per pass (decorator units, identities) and never mutated afterwards.

pub mod members;
pub mod shape;
pub mod types;
pub mod unit;

pub use members::{
    AccessorKind, MethodDescriptor, ParameterDescriptor, PassingMode, PropertyDescriptor,
};
pub use shape::{HookKind, ReturnShape};
pub use types::TypeReference;
pub use unit::{DecoratorUnit, GeneratedIdentity};
