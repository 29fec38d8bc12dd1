//! Runtime dispatcher assembly
//!
//! One artifact per pass. Both selectors compare the requested type pair
//! against every unit in discovery order and act on the first match; the
//! number of units is fixed at generation time, so a linear scan is all
//! that is needed.

use crate::config::GeneratorConfig;
use crate::model::{DecoratorUnit, GeneratedIdentity};

use super::writer::SourceWriter;
use super::{SourceArtifact, GENERATED_HEADER};

const CONTRACT_PARAMETER: &str = "TContract";
const PROVIDER_PARAMETER: &str = "TProvider";

/// Assemble the dispatcher over all units of a pass
pub fn emit_dispatcher(
    units: &[(&DecoratorUnit, &GeneratedIdentity)],
    config: &GeneratorConfig,
) -> SourceArtifact {
    let mut w = SourceWriter::with_capacity(1024 + units.len() * 512);
    let dispatcher = &config.dispatcher_contract;

    for line in GENERATED_HEADER {
        w.line(line);
    }
    w.blank();
    w.open(format!("namespace {}", config.dispatcher_namespace));
    w.open(format!(
        "public sealed class {} : {}",
        config.dispatcher_class_name, dispatcher
    ));

    w.line(format!(
        "{} {}.Instantiate<{}, {}>(",
        CONTRACT_PARAMETER, dispatcher, CONTRACT_PARAMETER, PROVIDER_PARAMETER
    ));
    w.line(format!("    {} underlyingImplementation,", CONTRACT_PARAMETER));
    w.line(format!("    {} applicableMembers,", config.allow_list_type));
    w.line(format!("    {} behaviorProvider)", PROVIDER_PARAMETER));
    w.open("");
    for (unit, identity) in units {
        let contract = &unit.contract.fully_qualified_name;
        let provider = &unit.provider.fully_qualified_name;

        w.blank();
        if !unit.provider_constructor.is_empty() {
            let signature: Vec<String> = unit
                .provider_constructor
                .iter()
                .map(|p| format!("{} {}", p.ty.fully_qualified_name, p.name))
                .collect();
            w.line(format!("// {}({})", unit.provider.short_name, signature.join(", ")));
        }
        emit_condition(&mut w, contract, provider);
        w.open("");
        w.line(format!(
            "return ({})(object)new {}(",
            CONTRACT_PARAMETER,
            identity.fully_qualified_name()
        ));
        w.line(format!("    ({})(object)underlyingImplementation,", contract));
        w.line("    applicableMembers,");
        w.line(format!("    ({})(object)behaviorProvider);", provider));
        w.close();
    }
    w.blank();
    w.line("return default;");
    w.close();

    w.blank();
    w.open(format!(
        "global::System.Type {}.GetDecoratorType<{}, {}>()",
        dispatcher, CONTRACT_PARAMETER, PROVIDER_PARAMETER
    ));
    for (unit, identity) in units {
        w.blank();
        emit_condition(
            &mut w,
            &unit.contract.fully_qualified_name,
            &unit.provider.fully_qualified_name,
        );
        w.open("");
        w.line(format!("return typeof({});", identity.fully_qualified_name()));
        w.close();
    }
    w.blank();
    w.line("return default;");
    w.close();

    w.close();
    w.close();

    SourceArtifact {
        name: config.dispatcher_artifact.clone(),
        text: w.finish(),
    }
}

fn emit_condition(w: &mut SourceWriter, contract: &str, provider: &str) {
    w.line(format!(
        "if (typeof({}) == typeof({}) &&",
        CONTRACT_PARAMETER, contract
    ));
    w.line(format!(
        "    typeof({}) == typeof({}))",
        PROVIDER_PARAMETER, provider
    ));
}
