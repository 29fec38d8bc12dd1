//! Provider hook resolution
//!
//! A provider may override only some of the six hooks, and may do so at
//! any level of its class chain. The table is built once per provider as a
//! flat list ordered most-derived first, so "nearest override" is the first
//! entry of the requested kind.

use crate::error::{GenerationError, GenerationResult};
use crate::host::{base_chain, TypeDefinition, TypeHost};
use crate::model::{HookKind, TypeReference};

/// One hook declaration found in the provider chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookOverride {
    /// Type declaring the override
    pub declared_by: TypeReference,
    /// Hook kind
    pub kind: HookKind,
    /// Method name to call
    pub selector: String,
}

/// Hook overrides of one provider, most-derived first
#[derive(Debug, Clone)]
pub struct HookTable {
    provider: TypeReference,
    entries: Vec<HookOverride>,
}

impl HookTable {
    /// Walk `provider` up to and including `base`.
    pub fn build<H: TypeHost + ?Sized>(host: &H, provider: &TypeDefinition, base: &str) -> Self {
        let mut entries = Vec::new();

        for def in base_chain(host, provider) {
            for kind in HookKind::ALL {
                let declared = def.methods.iter().find(|m| m.hook == Some(kind));
                if let Some(method) = declared {
                    entries.push(HookOverride {
                        declared_by: def.reference.clone(),
                        kind,
                        selector: method.name.clone(),
                    });
                }
            }

            if def.name() == base {
                break;
            }
        }

        Self {
            provider: provider.reference.clone(),
            entries,
        }
    }

    /// The provider this table belongs to
    pub fn provider(&self) -> &TypeReference {
        &self.provider
    }

    /// The nearest override of `kind`
    pub fn resolve(&self, kind: HookKind) -> GenerationResult<&HookOverride> {
        self.entries
            .iter()
            .find(|entry| entry.kind == kind)
            .ok_or_else(|| GenerationError::UnresolvedHook {
                provider: self.provider.fully_qualified_name.clone(),
                kind,
            })
    }

    /// Selector name of the nearest override of `kind`
    pub fn selector(&self, kind: HookKind) -> GenerationResult<&str> {
        self.resolve(kind).map(|entry| entry.selector.as_str())
    }
}
