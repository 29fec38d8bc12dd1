//! Source text emission
//!
//! - `proxy`: one artifact per decorator unit
//! - `dispatcher`: the shared runtime selector over all units
//! - `method` / `property`: per-member bodies inside a proxy
//! - `locals`: collision-free local names for method bodies
//! - `writer`: indentation-aware text buffer

pub mod dispatcher;
pub mod locals;
pub mod method;
pub mod property;
pub mod proxy;
pub mod writer;

pub use dispatcher::emit_dispatcher;
pub use proxy::emit_proxy;
pub use writer::SourceWriter;

use serde::Serialize;
use std::borrow::Cow;

use crate::model::{DecoratorUnit, TypeReference};

/// Lines opening every generated artifact
pub const GENERATED_HEADER: [&str; 2] = ["// <auto-generated/>", "#nullable disable"];

/// A named piece of generated source handed to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceArtifact {
    /// Artifact (file) name, unique within a pass
    pub name: String,
    /// Source text
    pub text: String,
}

/// `<A, B>` for a non-empty list, otherwise nothing.
pub(crate) fn type_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let items: Vec<S> = items.into_iter().collect();
    if items.is_empty() {
        return String::new();
    }
    let names: Vec<&str> = items.iter().map(AsRef::as_ref).collect();
    format!("<{}>", names.join(", "))
}

/// Reserved words of the target language; identifiers spelled like one
/// need a verbatim `@` prefix.
const RESERVED_WORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

/// `name` as it must be spelled in generated source.
pub(crate) fn identifier(name: &str) -> Cow<'_, str> {
    if RESERVED_WORDS.contains(&name) {
        Cow::Owned(format!("@{}", name))
    } else {
        Cow::Borrowed(name)
    }
}

/// Member access target for `expr`, cast to the declaring contract when
/// another contract of the unit declares a member of the same name.
pub(crate) fn receiver(
    unit: &DecoratorUnit,
    declaring_contract: &TypeReference,
    member: &str,
    expr: &str,
) -> String {
    if unit.is_name_shared(declaring_contract, member) {
        format!("(({}){})", declaring_contract.fully_qualified_name, expr)
    } else {
        expr.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_list() {
        assert_eq!(type_list(Vec::<String>::new()), "");
        assert_eq!(type_list(["T"]), "<T>");
        assert_eq!(type_list(&vec!["TIn".to_string(), "TOut".to_string()]), "<TIn, TOut>");
    }

    #[test]
    fn test_reserved_identifiers_escaped() {
        assert_eq!(identifier("event"), "@event");
        assert_eq!(identifier("object"), "@object");
        assert_eq!(identifier("@event"), "@event");
        assert_eq!(identifier("count"), "count");
    }
}
