//! Generated identity assignment
//!
//! Runs once over every unit of a pass. Phase one gathers the short names
//! of all providers and all contracts; phase two gives each distinct type a
//! segment. A short name used by only one fully-qualified type is used as
//! is (sanitized); a short name shared by several distinct types gets a
//! truncated SHA-256 of the fully-qualified name appended.

use rustc_hash::{FxHashMap, FxHashSet};
use sha2::{Digest, Sha256};

use crate::config::GeneratorConfig;
use crate::model::{DecoratorUnit, GeneratedIdentity, TypeReference};

/// Replace characters that cannot appear in an identifier with `_`,
/// collapse runs of `_` and trim them from both ends.
pub fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let c = if c.is_alphanumeric() || c == '_' { c } else { '_' };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    out.trim_matches('_').to_string()
}

/// Uppercase hex prefix of the SHA-256 digest of `fully_qualified_name`.
pub fn disambiguator(fully_qualified_name: &str, length: usize) -> String {
    let digest = Sha256::digest(fully_qualified_name.as_bytes());
    let mut hex = hex::encode_upper(digest);
    hex.truncate(length);
    hex
}

/// Assigns identities to all units of a pass
pub struct NamingResolver<'c> {
    config: &'c GeneratorConfig,
}

impl<'c> NamingResolver<'c> {
    /// Create a resolver using the namespace and class names in `config`
    pub fn new(config: &'c GeneratorConfig) -> Self {
        Self { config }
    }

    /// One identity per unit, in the same order as `units`.
    pub fn resolve(&self, units: &[DecoratorUnit]) -> Vec<GeneratedIdentity> {
        let providers = self.segments(units.iter().map(|u| &u.provider));
        let contracts = self.segments(units.iter().map(|u| &u.contract));

        units
            .iter()
            .map(|unit| {
                let provider = segment_of(&providers, &unit.provider);
                let contract = segment_of(&contracts, &unit.contract);
                GeneratedIdentity {
                    namespace: format!("{}.{}.{}", self.config.root_namespace, provider, contract),
                    type_name: self.config.proxy_class_name.clone(),
                    artifact_name: format!(
                        "{}_{}_{}.g.cs",
                        self.config.proxy_class_name, provider, contract
                    ),
                }
            })
            .collect()
    }

    fn segments<'u>(
        &self,
        types: impl Iterator<Item = &'u TypeReference>,
    ) -> FxHashMap<&'u str, String> {
        let mut distinct: Vec<&'u TypeReference> = Vec::new();
        let mut seen = FxHashSet::default();
        for ty in types {
            if seen.insert(ty.fully_qualified_name.as_str()) {
                distinct.push(ty);
            }
        }

        let mut usage: FxHashMap<String, usize> = FxHashMap::default();
        for ty in &distinct {
            *usage.entry(sanitize(&ty.short_name)).or_default() += 1;
        }

        distinct
            .into_iter()
            .map(|ty| {
                let short = sanitize(&ty.short_name);
                let segment = if usage.get(&short).copied().unwrap_or(0) > 1 {
                    let hash = disambiguator(&ty.fully_qualified_name, self.config.hash_length);
                    tracing::debug!(
                        ty = %ty.fully_qualified_name,
                        short = %short,
                        hash = %hash,
                        "short name collides, disambiguating"
                    );
                    format!("{}_{}", short, hash)
                } else {
                    short
                };
                (ty.fully_qualified_name.as_str(), segment)
            })
            .collect()
    }
}

fn segment_of<'a>(segments: &'a FxHashMap<&str, String>, ty: &TypeReference) -> &'a str {
    segments
        .get(ty.fully_qualified_name.as_str())
        .map(String::as_str)
        .unwrap_or_default()
}
