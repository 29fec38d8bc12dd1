//! Trigger validation
//!
//! Filters the (contract, provider) pairs found by the trigger scanner.
//! Every problem with a pair is reported, one diagnostic per originating
//! location, and the pair is skipped; other pairs are unaffected.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::diagnostics::{self, Diagnostic, SourceLocation};
use crate::host::{derives_from, inheritance_closure, TypeHost, TypeKind};
use crate::model::TypeReference;

/// A generation request discovered in calling code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    /// Contract to proxy
    pub contract: TypeReference,
    /// Behavior provider to route through
    pub provider: TypeReference,
    /// Where the request was found
    #[serde(default)]
    pub locations: Vec<SourceLocation>,
    /// Member names known statically to be intercepted; `None` means all
    #[serde(default)]
    pub allow_list: Option<Vec<String>>,
}

impl Trigger {
    /// A trigger for every member, with no location
    pub fn new(contract: TypeReference, provider: TypeReference) -> Self {
        Self {
            contract,
            provider,
            locations: Vec::new(),
            allow_list: None,
        }
    }

    /// Attach a location
    pub fn at(mut self, location: SourceLocation) -> Self {
        self.locations.push(location);
        self
    }

    /// Restrict interception to the given members
    pub fn allowing<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_list = Some(members.into_iter().map(Into::into).collect());
        self
    }
}

/// A pair that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPair {
    /// Contract to proxy
    pub contract: TypeReference,
    /// Behavior provider to route through
    pub provider: TypeReference,
    /// All locations requesting this pair
    pub locations: Vec<SourceLocation>,
    /// Merged static allow-list
    pub allow_list: Option<BTreeSet<String>>,
}

/// Merge triggers naming the same pair, keeping first-discovery order.
///
/// Locations are concatenated. The merged allow-list is the union of all
/// allow-lists, or `None` as soon as one trigger asks for every member.
pub fn merge_triggers(triggers: &[Trigger]) -> Vec<ValidatedPair> {
    let mut slots: FxHashMap<(&str, &str), usize> = FxHashMap::default();
    let mut merged: Vec<ValidatedPair> = Vec::new();

    for trigger in triggers {
        let key = (
            trigger.contract.fully_qualified_name.as_str(),
            trigger.provider.fully_qualified_name.as_str(),
        );
        let incoming: Option<BTreeSet<String>> =
            trigger.allow_list.as_ref().map(|l| l.iter().cloned().collect());

        match slots.get(&key) {
            Some(&slot) => {
                let pair = &mut merged[slot];
                pair.locations.extend(trigger.locations.iter().cloned());
                pair.allow_list = match (pair.allow_list.take(), incoming) {
                    (Some(mut existing), Some(more)) => {
                        existing.extend(more);
                        Some(existing)
                    }
                    _ => None,
                };
            }
            None => {
                slots.insert(key, merged.len());
                merged.push(ValidatedPair {
                    contract: trigger.contract.clone(),
                    provider: trigger.provider.clone(),
                    locations: trigger.locations.clone(),
                    allow_list: incoming,
                });
            }
        }
    }

    merged
}

/// Checks pairs against the host metadata
pub struct Validator<'h, H: TypeHost + ?Sized> {
    host: &'h H,
    behavior_provider_base: &'h str,
}

impl<'h, H: TypeHost + ?Sized> Validator<'h, H> {
    /// Create a validator for the given base behavior provider
    pub fn new(host: &'h H, behavior_provider_base: &'h str) -> Self {
        Self {
            host,
            behavior_provider_base,
        }
    }

    /// All diagnostics for one pair; empty means the pair is eligible
    pub fn validate(&self, pair: &ValidatedPair) -> Vec<Diagnostic> {
        let mut problems = Vec::new();
        let contract_name = &pair.contract.fully_qualified_name;
        let provider_name = &pair.provider.fully_qualified_name;

        match self.host.resolve(contract_name) {
            None => problems.push(Diagnostic::error(
                diagnostics::UNKNOWN_TYPE,
                format!("Contract type '{}' could not be resolved", contract_name),
            )),
            Some(contract) if contract.kind != TypeKind::Interface => {
                problems.push(Diagnostic::error(
                    diagnostics::INVALID_CONTRACT,
                    format!("Type '{}' is not an interface and cannot be decorated", contract_name),
                ));
            }
            Some(contract) => {
                if pair.contract.is_open_generic() {
                    problems.push(Diagnostic::error(
                        diagnostics::OPEN_GENERIC_CONTRACT,
                        format!(
                            "Open generic interface '{}' cannot be decorated; close it over concrete type arguments",
                            contract_name
                        ),
                    ));
                }

                for def in inheritance_closure(self.host, contract) {
                    for event in &def.events {
                        problems.push(Diagnostic::error(
                            diagnostics::UNSUPPORTED_MEMBER,
                            format!(
                                "Interface '{}' declares event '{}'; only methods and properties can be decorated",
                                def.name(),
                                event
                            ),
                        ));
                    }
                    for method in def.methods.iter().filter(|m| m.has_params_array) {
                        problems.push(Diagnostic::error(
                            diagnostics::PARAMS_PARAMETER,
                            format!(
                                "Method '{}.{}' declares a variable-length parameter, which cannot be decorated",
                                def.name(),
                                method.name
                            ),
                        ));
                    }
                }
            }
        }

        match self.host.resolve(provider_name) {
            None => problems.push(Diagnostic::error(
                diagnostics::UNKNOWN_TYPE,
                format!("Provider type '{}' could not be resolved", provider_name),
            )),
            Some(provider) => {
                if !derives_from(self.host, provider, self.behavior_provider_base) {
                    problems.push(Diagnostic::error(
                        diagnostics::INVALID_PROVIDER,
                        format!(
                            "Type '{}' does not derive from '{}'",
                            provider_name, self.behavior_provider_base
                        ),
                    ));
                }
                if provider.constructors.is_empty() {
                    problems.push(Diagnostic::error(
                        diagnostics::NO_CONSTRUCTOR,
                        format!("Provider '{}' has no accessible constructor", provider_name),
                    ));
                }
            }
        }

        problems
            .into_iter()
            .flat_map(|diag| diag.at_each(&pair.locations))
            .collect()
    }
}
