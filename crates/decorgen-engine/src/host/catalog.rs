//! Host-supplied type catalog
//!
//! The host resolves its own type system into these plain records before
//! a pass starts. Closed generic types are supplied under their closed
//! fully-qualified name with member types already substituted.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::model::{HookKind, ParameterDescriptor, TypeReference};

use super::TypeHost;

/// Kind of a host type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    /// Pure capability set
    Interface,
    /// Reference type with an inheritance chain
    Class,
    /// Value type
    Struct,
    /// Enumeration
    Enum,
    /// Delegate type
    Delegate,
}

/// Setter flavor of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SetterKind {
    /// Read-only
    #[default]
    None,
    /// Regular setter
    Set,
    /// Construction-time only setter
    InitOnly,
}

/// A method as the host declares it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSymbol {
    /// Method name
    pub name: String,
    /// Return type; `None` when the method returns nothing
    #[serde(default)]
    pub return_type: Option<TypeReference>,
    /// Type-parameter names
    #[serde(default)]
    pub type_parameters: Vec<String>,
    /// Parameters
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
    /// Static member
    #[serde(default)]
    pub is_static: bool,
    /// Property this method is an accessor of
    #[serde(default)]
    pub associated_property: Option<String>,
    /// Set when this method is, or overrides, a base provider hook
    #[serde(default)]
    pub hook: Option<HookKind>,
    /// Last parameter is a variable-length array
    #[serde(default)]
    pub has_params_array: bool,
}

impl MethodSymbol {
    /// An instance method with the given signature
    pub fn new(
        name: impl Into<String>,
        return_type: Option<TypeReference>,
        parameters: Vec<ParameterDescriptor>,
    ) -> Self {
        Self {
            name: name.into(),
            return_type,
            type_parameters: Vec::new(),
            parameters,
            is_static: false,
            associated_property: None,
            hook: None,
            has_params_array: false,
        }
    }

    /// A method overriding (or declaring) the given hook
    pub fn hook_override(kind: HookKind) -> Self {
        let mut method = Self::new(kind.default_selector(), None, Vec::new());
        method.hook = Some(kind);
        method
    }
}

/// A property as the host declares it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySymbol {
    /// Property name
    pub name: String,
    /// Value type
    pub ty: TypeReference,
    /// Has a getter
    #[serde(default)]
    pub has_getter: bool,
    /// Setter flavor
    #[serde(default)]
    pub setter: SetterKind,
    /// Static member
    #[serde(default)]
    pub is_static: bool,
}

/// Everything the core needs to know about one type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDefinition {
    /// The type itself
    pub reference: TypeReference,
    /// Kind
    pub kind: TypeKind,
    /// Base class, for classes
    #[serde(default)]
    pub base_type: Option<TypeReference>,
    /// Directly inherited interfaces, in declaration order
    #[serde(default)]
    pub interfaces: Vec<TypeReference>,
    /// Declared methods (not inherited ones)
    #[serde(default)]
    pub methods: Vec<MethodSymbol>,
    /// Declared properties (not inherited ones)
    #[serde(default)]
    pub properties: Vec<PropertySymbol>,
    /// Names of declared events
    #[serde(default)]
    pub events: Vec<String>,
    /// Accessible instance constructors' parameter lists
    #[serde(default)]
    pub constructors: Vec<Vec<ParameterDescriptor>>,
}

impl TypeDefinition {
    /// An empty definition of the given kind
    pub fn new(reference: TypeReference, kind: TypeKind) -> Self {
        Self {
            reference,
            kind,
            base_type: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
            events: Vec::new(),
            constructors: Vec::new(),
        }
    }

    /// The base behavior provider with pass-through defaults for all six hooks
    pub fn standard_behavior_provider(reference: TypeReference) -> Self {
        let mut def = Self::new(reference, TypeKind::Class);
        def.methods = HookKind::ALL.iter().map(|&kind| MethodSymbol::hook_override(kind)).collect();
        def.constructors = vec![Vec::new()];
        def
    }

    /// Fully-qualified name
    pub fn name(&self) -> &str {
        &self.reference.fully_qualified_name
    }
}

/// In-memory catalog of type definitions keyed by fully-qualified name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<TypeDefinition>", into = "Vec<TypeDefinition>")]
pub struct MetadataCatalog {
    types: Vec<TypeDefinition>,
    index: FxHashMap<String, usize>,
}

impl MetadataCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from a JSON array of type definitions
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Add or replace a definition
    pub fn insert(&mut self, definition: TypeDefinition) {
        let key = definition.reference.fully_qualified_name.clone();
        match self.index.get(&key) {
            Some(&slot) => self.types[slot] = definition,
            None => {
                self.index.insert(key, self.types.len());
                self.types.push(definition);
            }
        }
    }

    /// Builder form of [`MetadataCatalog::insert`]
    pub fn with(mut self, definition: TypeDefinition) -> Self {
        self.insert(definition);
        self
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the catalog has no definitions
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl From<Vec<TypeDefinition>> for MetadataCatalog {
    fn from(types: Vec<TypeDefinition>) -> Self {
        let mut catalog = MetadataCatalog::new();
        for def in types {
            catalog.insert(def);
        }
        catalog
    }
}

impl From<MetadataCatalog> for Vec<TypeDefinition> {
    fn from(catalog: MetadataCatalog) -> Self {
        catalog.types
    }
}

impl TypeHost for MetadataCatalog {
    fn resolve(&self, fully_qualified_name: &str) -> Option<&TypeDefinition> {
        self.index
            .get(fully_qualified_name)
            .map(|&slot| &self.types[slot])
    }
}
