//! Host metadata access
//!
//! The core consumes metadata through [`TypeHost`] only; it never inspects
//! a host type system directly.

pub mod catalog;

pub use catalog::{
    MetadataCatalog, MethodSymbol, PropertySymbol, SetterKind, TypeDefinition, TypeKind,
};

use rustc_hash::FxHashSet;

/// Source of resolved type definitions
pub trait TypeHost {
    /// Look up a type by fully-qualified name
    fn resolve(&self, fully_qualified_name: &str) -> Option<&TypeDefinition>;
}

/// A contract and every contract it inherits, each exactly once.
///
/// Order is the contract itself followed by its bases in depth-first
/// declaration order. Bases the host cannot resolve are skipped.
pub fn inheritance_closure<'h, H: TypeHost + ?Sized>(
    host: &'h H,
    contract: &'h TypeDefinition,
) -> Vec<&'h TypeDefinition> {
    let mut seen = FxHashSet::default();
    let mut order = Vec::new();
    let mut stack = vec![contract];

    while let Some(def) = stack.pop() {
        if !seen.insert(def.name()) {
            continue;
        }
        order.push(def);

        for base in def.interfaces.iter().rev() {
            if let Some(base_def) = host.resolve(&base.fully_qualified_name) {
                stack.push(base_def);
            }
        }
    }

    order
}

/// The class chain `ty -> base -> base ...`, most-derived first.
///
/// Stops at the first unresolved base or on a cycle.
pub fn base_chain<'h, H: TypeHost + ?Sized>(
    host: &'h H,
    ty: &'h TypeDefinition,
) -> Vec<&'h TypeDefinition> {
    let mut seen = FxHashSet::default();
    let mut chain = Vec::new();
    let mut current = Some(ty);

    while let Some(def) = current {
        if !seen.insert(def.name()) {
            break;
        }
        chain.push(def);
        current = def
            .base_type
            .as_ref()
            .and_then(|base| host.resolve(&base.fully_qualified_name));
    }

    chain
}

/// Whether `ty` is `ancestor` or derives from it through its base chain.
pub fn derives_from<H: TypeHost + ?Sized>(host: &H, ty: &TypeDefinition, ancestor: &str) -> bool {
    base_chain(host, ty).iter().any(|def| def.name() == ancestor)
}
