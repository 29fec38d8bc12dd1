//! Generation pass driver
//!
//! One pass is a pure function of the trigger set:
//!
//! 1. merge triggers naming the same pair
//! 2. validate each pair (diagnostics, never aborts)
//! 3. extract a decorator unit per eligible pair
//! 4. assign identities across all units (the barrier)
//! 5. emit one proxy per unit, then the dispatcher
//!
//! Steps 3 and 5 touch no shared mutable state and may fan out across
//! threads. Cancellation is checked once per unit in each phase; a
//! cancelled pass returns no artifacts.

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::time::Instant;

use crate::cancel::CancellationToken;
use crate::config::GeneratorConfig;
use crate::diagnostics::{self, Diagnostic};
use crate::emit::{emit_dispatcher, emit_proxy, SourceArtifact};
use crate::error::{GenerationError, GenerationResult};
use crate::extract::{HookTable, MemberExtractor};
use crate::host::TypeHost;
use crate::model::{DecoratorUnit, GeneratedIdentity};
use crate::naming::NamingResolver;
use crate::validate::{merge_triggers, Trigger, ValidatedPair, Validator};

type NamedUnit<'a> = (&'a DecoratorUnit, &'a GeneratedIdentity);

/// Everything a pass hands back to the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationOutput {
    /// Proxies in discovery order, then the dispatcher
    pub artifacts: Vec<SourceArtifact>,
    /// Diagnostics for skipped pairs
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationOutput {
    /// Whether any diagnostic fails the build
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Runs generation passes over one host
pub struct Generator<'h, H: TypeHost + Sync + ?Sized> {
    host: &'h H,
    config: GeneratorConfig,
}

impl<'h, H: TypeHost + Sync + ?Sized> Generator<'h, H> {
    /// Create a generator
    pub fn new(host: &'h H, config: GeneratorConfig) -> Self {
        Self { host, config }
    }

    /// The configuration in use
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Run one pass over `triggers`
    pub fn generate(
        &self,
        triggers: &[Trigger],
        cancel: &CancellationToken,
    ) -> GenerationResult<GenerationOutput> {
        let start = Instant::now();
        self.config.validate()?;

        let mut diagnostics = Vec::new();
        let eligible = self.validate(triggers, cancel, &mut diagnostics)?;
        let units = self.extract(&eligible, cancel, &mut diagnostics)?;

        cancel.check()?;
        let identities = NamingResolver::new(&self.config).resolve(&units);

        let artifacts = self.emit(&units, &identities, cancel)?;

        tracing::info!(
            target: "decorgen",
            triggers = triggers.len(),
            units = units.len(),
            artifacts = artifacts.len(),
            diagnostics = diagnostics.len(),
            parallel = self.config.parallel,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "generation pass complete"
        );

        Ok(GenerationOutput {
            artifacts,
            diagnostics,
        })
    }

    fn validate(
        &self,
        triggers: &[Trigger],
        cancel: &CancellationToken,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> GenerationResult<Vec<ValidatedPair>> {
        let validator = Validator::new(self.host, &self.config.behavior_provider_base);
        let mut eligible = Vec::new();

        for pair in merge_triggers(triggers) {
            cancel.check()?;
            let problems = validator.validate(&pair);
            if problems.is_empty() {
                eligible.push(pair);
                continue;
            }
            tracing::warn!(
                target: "decorgen",
                contract = %pair.contract,
                provider = %pair.provider,
                problems = problems.len(),
                "skipping ineligible pair"
            );
            diagnostics.extend(problems);
        }

        Ok(eligible)
    }

    fn extract(
        &self,
        eligible: &[ValidatedPair],
        cancel: &CancellationToken,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> GenerationResult<Vec<DecoratorUnit>> {
        let mut tables: FxHashMap<&str, HookTable> = FxHashMap::default();
        for pair in eligible {
            let name = pair.provider.fully_qualified_name.as_str();
            if tables.contains_key(name) {
                continue;
            }
            if let Some(provider) = self.host.resolve(name) {
                let base = self.config.behavior_provider_base.as_str();
                tables.insert(name, HookTable::build(self.host, provider, base));
            }
        }

        let extractor = MemberExtractor::new(self.host);
        let extract_one = |pair: &ValidatedPair| -> GenerationResult<DecoratorUnit> {
            cancel.check()?;
            let table = tables
                .get(pair.provider.fully_qualified_name.as_str())
                .ok_or_else(|| GenerationError::UnknownType {
                    name: pair.provider.fully_qualified_name.clone(),
                })?;
            extractor.extract(pair, table)
        };
        let results = fan_out(eligible, self.config.parallel, extract_one);

        let mut units = Vec::with_capacity(eligible.len());
        for (pair, result) in eligible.iter().zip(results) {
            match result {
                Ok(unit) => units.push(unit),
                Err(GenerationError::Cancelled) => return Err(GenerationError::Cancelled),
                Err(err) => {
                    let code = match err {
                        GenerationError::UnresolvedHook { .. } => {
                            tracing::error!(
                                target: "decorgen",
                                contract = %pair.contract,
                                provider = %pair.provider,
                                error = %err,
                                "behavior provider is missing a hook"
                            );
                            diagnostics::UNRESOLVED_HOOK
                        }
                        GenerationError::NoConstructor { .. } => diagnostics::NO_CONSTRUCTOR,
                        _ => diagnostics::UNKNOWN_TYPE,
                    };
                    let diagnostic = Diagnostic::error(code, err.to_string());
                    diagnostics.extend(diagnostic.at_each(&pair.locations));
                }
            }
        }

        Ok(units)
    }

    fn emit(
        &self,
        units: &[DecoratorUnit],
        identities: &[GeneratedIdentity],
        cancel: &CancellationToken,
    ) -> GenerationResult<Vec<SourceArtifact>> {
        let named: Vec<NamedUnit<'_>> = units.iter().zip(identities).collect();

        let emit_one = |&(unit, identity): &NamedUnit<'_>| -> GenerationResult<SourceArtifact> {
            cancel.check()?;
            let artifact = emit_proxy(unit, identity, &self.config);
            tracing::debug!(
                target: "decorgen",
                artifact = %artifact.name,
                bytes = artifact.text.len(),
                "emitted proxy"
            );
            Ok(artifact)
        };
        let proxies = fan_out(&named, self.config.parallel, emit_one);

        let mut artifacts = proxies.into_iter().collect::<GenerationResult<Vec<_>>>()?;
        cancel.check()?;
        artifacts.push(emit_dispatcher(&named, &self.config));
        Ok(artifacts)
    }
}

/// Apply `work` to every item, keeping input order.
///
/// With `parallel` set the items are split into one contiguous chunk per
/// worker and run on crossbeam scoped threads. A panicking worker is
/// re-raised on the calling thread.
fn fan_out<T, R, F>(items: &[T], parallel: bool, work: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    if !parallel || items.len() < 2 {
        return items.iter().map(&work).collect();
    }

    let workers = num_cpus::get().clamp(1, items.len());
    let chunk_size = items.len().div_ceil(workers);
    let work = &work;

    let scoped = crossbeam::thread::scope(|scope| {
        let handles: Vec<_> = items
            .chunks(chunk_size)
            .map(|chunk| scope.spawn(move |_| chunk.iter().map(work).collect::<Vec<R>>()))
            .collect();

        let mut results = Vec::with_capacity(items.len());
        for handle in handles {
            match handle.join() {
                Ok(part) => results.extend(part),
                Err(payload) => std::panic::resume_unwind(payload),
            }
        }
        results
    });

    match scoped {
        Ok(results) => results,
        Err(payload) => std::panic::resume_unwind(payload),
    }
}
