//! Member descriptors: parameters, methods, properties

use serde::{Deserialize, Serialize};

use super::shape::ReturnShape;
use super::types::TypeReference;

/// How an argument is passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PassingMode {
    /// Plain by-value argument
    #[default]
    ByValue,
    /// `ref` argument: read and written
    ByRef,
    /// `out` argument: written only
    ByOut,
    /// `in` argument: read-only reference
    ByIn,
}

impl PassingMode {
    /// Source keyword preceding the argument, empty for `ByValue`.
    pub fn keyword(self) -> &'static str {
        match self {
            PassingMode::ByValue => "",
            PassingMode::ByRef => "ref",
            PassingMode::ByOut => "out",
            PassingMode::ByIn => "in",
        }
    }

    /// Whether the argument carries a meaningful value into the call.
    pub fn is_captured_on_entry(self) -> bool {
        !matches!(self, PassingMode::ByOut)
    }

    /// Whether the callee's value must flow back to the caller.
    pub fn writes_back(self) -> bool {
        matches!(self, PassingMode::ByRef | PassingMode::ByOut)
    }

    /// Whether the inner call needs a local temporary for this argument.
    pub fn needs_temporary(self) -> bool {
        !matches!(self, PassingMode::ByValue)
    }
}

/// A single method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Parameter name
    pub name: String,
    /// Parameter type
    pub ty: TypeReference,
    /// Passing mode
    #[serde(default)]
    pub mode: PassingMode,
}

impl ParameterDescriptor {
    /// Create a parameter descriptor.
    pub fn new(name: impl Into<String>, ty: TypeReference, mode: PassingMode) -> Self {
        Self {
            name: name.into(),
            ty,
            mode,
        }
    }

    /// Create a by-value parameter.
    pub fn by_value(name: impl Into<String>, ty: TypeReference) -> Self {
        Self::new(name, ty, PassingMode::ByValue)
    }
}

/// A contract method slated for interception.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodDescriptor {
    /// The specific contract that declares this method
    pub declaring_contract: TypeReference,
    /// Method name
    pub name: String,
    /// Return-shape classification
    pub shape: ReturnShape,
    /// Return type, absent for `Void`
    pub return_type: Option<TypeReference>,
    /// Method type-parameter names in declaration order
    pub type_parameters: Vec<String>,
    /// Parameters in declaration order
    pub parameters: Vec<ParameterDescriptor>,
    /// Name of the provider hook servicing this method
    pub hook: String,
}

/// Identity of a method within one decorator unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodKey {
    declaring_contract: String,
    name: String,
    type_parameter_count: usize,
    parameters: Vec<(String, PassingMode)>,
}

impl MethodDescriptor {
    /// The (declaring contract, name, signature) key used for de-duplication.
    pub fn key(&self) -> MethodKey {
        MethodKey {
            declaring_contract: self.declaring_contract.fully_qualified_name.clone(),
            name: self.name.clone(),
            type_parameter_count: self.type_parameters.len(),
            parameters: self
                .parameters
                .iter()
                .map(|p| (p.ty.fully_qualified_name.clone(), p.mode))
                .collect(),
        }
    }

    /// Allow-list entries that name this method.
    ///
    /// The bare name, then the name qualified by the declaring contract's
    /// simple and fully-qualified names. The static allow-list and the
    /// generated runtime guard both match against exactly these.
    pub fn allow_list_keys(&self) -> [String; 3] {
        let contract = &self.declaring_contract;
        [
            self.name.clone(),
            format!("{}.{}", contract.simple_name(), self.name),
            format!("{}.{}", contract.fully_qualified_name, self.name),
        ]
    }

    /// Method type parameters used by any parameter type, in declaration order.
    pub fn captured_type_parameters(&self) -> Vec<&str> {
        self.type_parameters
            .iter()
            .filter(|tp| self.parameters.iter().any(|p| p.ty.mentions_type_parameter(tp)))
            .map(String::as_str)
            .collect()
    }
}

/// Accessor present on a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessorKind {
    /// Readable
    Get,
    /// Writable after construction
    Set,
    /// Writable during construction only
    InitOnly,
}

/// A contract property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyDescriptor {
    /// The specific contract that declares this property
    pub declaring_contract: TypeReference,
    /// Property name
    pub name: String,
    /// Value type
    pub ty: TypeReference,
    /// Accessors, `Get` first when present
    pub accessors: Vec<AccessorKind>,
}

impl PropertyDescriptor {
    /// Build a descriptor, enforcing the accessor-set invariant.
    ///
    /// Returns `None` when the property has no accessor, or when both `Set`
    /// and `InitOnly` are requested.
    pub fn new(
        declaring_contract: TypeReference,
        name: impl Into<String>,
        ty: TypeReference,
        accessors: Vec<AccessorKind>,
    ) -> Option<Self> {
        let has_set = accessors.contains(&AccessorKind::Set);
        let has_init = accessors.contains(&AccessorKind::InitOnly);
        if accessors.is_empty() || (has_set && has_init) {
            return None;
        }

        let mut ordered = Vec::with_capacity(accessors.len());
        for kind in [AccessorKind::Get, AccessorKind::Set, AccessorKind::InitOnly] {
            if accessors.contains(&kind) {
                ordered.push(kind);
            }
        }

        Some(Self {
            declaring_contract,
            name: name.into(),
            ty,
            accessors: ordered,
        })
    }
}
