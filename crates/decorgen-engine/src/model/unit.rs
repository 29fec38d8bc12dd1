//! Decorator units and their generated identities

use serde::Serialize;
use std::collections::BTreeSet;

use super::members::{MethodDescriptor, ParameterDescriptor, PropertyDescriptor};
use super::types::TypeReference;

/// One (contract, provider) configuration slated for proxy generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecoratorUnit {
    /// The contract the proxy implements
    pub contract: TypeReference,
    /// The behavior provider the proxy routes through
    pub provider: TypeReference,
    /// Parameters of the provider's first accessible constructor
    pub provider_constructor: Vec<ParameterDescriptor>,
    /// Methods in extraction order
    pub methods: Vec<MethodDescriptor>,
    /// Properties in extraction order
    pub properties: Vec<PropertyDescriptor>,
    /// Members known at generation time to be intercepted; `None` means all
    pub allow_list: Option<BTreeSet<String>>,
}

impl DecoratorUnit {
    /// Whether the static allow-list admits `method`.
    ///
    /// Entries match either the bare member name or `Contract.Member`, where
    /// `Contract` is the declaring contract's simple or fully-qualified name.
    pub fn intercepts(&self, method: &MethodDescriptor) -> bool {
        let Some(allowed) = &self.allow_list else {
            return true;
        };

        method.allow_list_keys().iter().any(|key| allowed.contains(key))
    }

    /// Whether another member named `name` is declared by a different contract.
    ///
    /// Calls to such members must go through the declaring contract
    /// explicitly, or the underlying invocation would be ambiguous.
    pub fn is_name_shared(&self, declaring_contract: &TypeReference, name: &str) -> bool {
        let methods = self
            .methods
            .iter()
            .map(|m| (&m.declaring_contract, m.name.as_str()));
        let properties = self
            .properties
            .iter()
            .map(|p| (&p.declaring_contract, p.name.as_str()));

        methods
            .chain(properties)
            .any(|(declaring, member)| member == name && declaring != declaring_contract)
    }
}

/// Names assigned to a unit's generated proxy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GeneratedIdentity {
    /// Namespace-like grouping token
    pub namespace: String,
    /// Proxy type name
    pub type_name: String,
    /// Artifact (file) name
    pub artifact_name: String,
}

impl GeneratedIdentity {
    /// `global::`-qualified proxy type name.
    pub fn fully_qualified_name(&self) -> String {
        format!("global::{}.{}", self.namespace, self.type_name)
    }
}
