//! Type references

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Reference to a type as resolved by the host.
///
/// Two references are equal when their fully-qualified names are equal; the
/// remaining fields are display data derived from the same symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeReference {
    /// Fully-qualified name, e.g. `global::Acme.IStore<global::System.Int32>`
    pub fully_qualified_name: String,
    /// Short display name, e.g. `IStore<Int32>`
    pub short_name: String,
    /// Whether this reference is an open type parameter such as `T`
    #[serde(default)]
    pub is_type_parameter: bool,
    /// Type arguments in declaration order
    #[serde(default)]
    pub type_arguments: Vec<TypeReference>,
}

impl TypeReference {
    /// Reference to a non-generic named type.
    pub fn named(fully_qualified_name: impl Into<String>, short_name: impl Into<String>) -> Self {
        Self {
            fully_qualified_name: fully_qualified_name.into(),
            short_name: short_name.into(),
            is_type_parameter: false,
            type_arguments: Vec::new(),
        }
    }

    /// Reference to a type parameter (`T`, `TResult`, ...).
    pub fn type_parameter(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            fully_qualified_name: name.clone(),
            short_name: name,
            is_type_parameter: true,
            type_arguments: Vec::new(),
        }
    }

    /// Close this reference over the given type arguments.
    ///
    /// Both names get a `<A, B>` suffix built from the arguments' own names.
    pub fn with_type_arguments(mut self, arguments: Vec<TypeReference>) -> Self {
        if arguments.is_empty() {
            return self;
        }

        let short: Vec<&str> = arguments.iter().map(|a| a.short_name.as_str()).collect();
        let full: Vec<&str> = arguments
            .iter()
            .map(|a| a.fully_qualified_name.as_str())
            .collect();

        self.short_name = format!("{}<{}>", self.short_name, short.join(", "));
        self.fully_qualified_name = format!("{}<{}>", self.fully_qualified_name, full.join(", "));
        self.type_arguments = arguments;
        self
    }

    /// Short name without any type argument list (`Task<Int32>` -> `Task`).
    pub fn simple_name(&self) -> &str {
        match self.short_name.find('<') {
            Some(idx) => &self.short_name[..idx],
            None => &self.short_name,
        }
    }

    /// Number of type arguments.
    pub fn arity(&self) -> usize {
        self.type_arguments.len()
    }

    /// Whether any type parameter is reachable through the type arguments.
    pub fn is_open_generic(&self) -> bool {
        self.type_arguments
            .iter()
            .any(|arg| arg.is_type_parameter || arg.is_open_generic())
    }

    /// Whether this reference is, or nests, the type parameter `name`.
    pub fn mentions_type_parameter(&self, name: &str) -> bool {
        if self.is_type_parameter {
            return self.fully_qualified_name == name;
        }
        self.type_arguments
            .iter()
            .any(|arg| arg.mentions_type_parameter(name))
    }
}

impl PartialEq for TypeReference {
    fn eq(&self, other: &Self) -> bool {
        self.fully_qualified_name == other.fully_qualified_name
    }
}

impl Eq for TypeReference {}

impl Hash for TypeReference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fully_qualified_name.hash(state);
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fully_qualified_name)
    }
}
