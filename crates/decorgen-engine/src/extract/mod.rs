//! Member extraction
//!
//! Turns a validated pair into a [`DecoratorUnit`]: every property and
//! method reachable through the contract's inheritance closure, each
//! classified and bound to the provider hook it routes through.

pub mod hooks;

pub use hooks::{HookOverride, HookTable};

use rustc_hash::FxHashSet;

use crate::error::{GenerationError, GenerationResult};
use crate::host::{inheritance_closure, SetterKind, TypeHost};
use crate::model::{
    AccessorKind, DecoratorUnit, MethodDescriptor, PropertyDescriptor, ReturnShape,
};
use crate::validate::ValidatedPair;

/// Builds decorator units from host metadata
pub struct MemberExtractor<'h, H: TypeHost + ?Sized> {
    host: &'h H,
}

impl<'h, H: TypeHost + ?Sized> MemberExtractor<'h, H> {
    /// Create an extractor over `host`
    pub fn new(host: &'h H) -> Self {
        Self { host }
    }

    /// Extract the member surface of one pair.
    ///
    /// Properties come first, then methods, both in closure order. Accessor
    /// methods of extracted properties are not repeated as methods.
    pub fn extract(
        &self,
        pair: &ValidatedPair,
        hooks: &HookTable,
    ) -> GenerationResult<DecoratorUnit> {
        let contract = self.resolve(&pair.contract.fully_qualified_name)?;
        let provider = self.resolve(&pair.provider.fully_qualified_name)?;
        let provider_constructor = provider.constructors.first().cloned().ok_or_else(|| {
            GenerationError::NoConstructor {
                provider: pair.provider.fully_qualified_name.clone(),
            }
        })?;
        let closure = inheritance_closure(self.host, contract);

        let mut properties: Vec<PropertyDescriptor> = Vec::new();
        let mut seen_properties = FxHashSet::default();
        for def in &closure {
            for symbol in def.properties.iter().filter(|p| !p.is_static) {
                let mut accessors = Vec::new();
                if symbol.has_getter {
                    accessors.push(AccessorKind::Get);
                }
                match symbol.setter {
                    SetterKind::None => {}
                    SetterKind::Set => accessors.push(AccessorKind::Set),
                    SetterKind::InitOnly => accessors.push(AccessorKind::InitOnly),
                }

                let Some(property) = PropertyDescriptor::new(
                    def.reference.clone(),
                    symbol.name.clone(),
                    symbol.ty.clone(),
                    accessors,
                ) else {
                    continue;
                };
                if seen_properties.insert((def.name(), symbol.name.as_str())) {
                    properties.push(property);
                }
            }
        }

        let mut methods: Vec<MethodDescriptor> = Vec::new();
        let mut seen_methods = FxHashSet::default();
        for def in &closure {
            for symbol in def.methods.iter().filter(|m| !m.is_static) {
                let is_accessor = symbol
                    .associated_property
                    .as_deref()
                    .is_some_and(|prop| seen_properties.contains(&(def.name(), prop)));
                if is_accessor {
                    continue;
                }

                let shape = ReturnShape::classify(symbol.return_type.as_ref());
                let hook = hooks.selector(shape.hook_kind())?;
                let method = MethodDescriptor {
                    declaring_contract: def.reference.clone(),
                    name: symbol.name.clone(),
                    shape,
                    return_type: symbol.return_type.clone(),
                    type_parameters: symbol.type_parameters.clone(),
                    parameters: symbol.parameters.clone(),
                    hook: hook.to_string(),
                };
                if seen_methods.insert(method.key()) {
                    methods.push(method);
                }
            }
        }

        tracing::debug!(
            contract = %pair.contract,
            provider = %pair.provider,
            methods = methods.len(),
            properties = properties.len(),
            "extracted unit"
        );

        Ok(DecoratorUnit {
            contract: pair.contract.clone(),
            provider: pair.provider.clone(),
            provider_constructor,
            methods,
            properties,
            allow_list: pair.allow_list.clone(),
        })
    }

    fn resolve(&self, name: &str) -> GenerationResult<&'h crate::host::TypeDefinition> {
        self.host.resolve(name).ok_or_else(|| GenerationError::UnknownType {
            name: name.to_string(),
        })
    }
}
