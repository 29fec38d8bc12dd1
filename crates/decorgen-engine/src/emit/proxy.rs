//! Proxy type assembly

use crate::config::GeneratorConfig;
use crate::model::{DecoratorUnit, GeneratedIdentity};

use super::locals::MethodLocals;
use super::method::{emit_context_class, emit_method};
use super::property::emit_property;
use super::writer::SourceWriter;
use super::{SourceArtifact, GENERATED_HEADER};

/// Field holding the wrapped implementation
pub const UNDERLYING_FIELD: &str = "_underlyingImplementation";
/// Field holding the runtime allow-list
pub const ALLOW_LIST_FIELD: &str = "_applicableMembers";
/// Field holding the behavior provider
pub const PROVIDER_FIELD: &str = "_behaviorProvider";

const CONSTRUCTOR_PARAMETERS: [&str; 3] =
    ["underlyingImplementation", "applicableMembers", "behaviorProvider"];

/// Assemble the complete proxy artifact for one unit
pub fn emit_proxy(
    unit: &DecoratorUnit,
    identity: &GeneratedIdentity,
    config: &GeneratorConfig,
) -> SourceArtifact {
    let mut w = SourceWriter::with_capacity(4096);
    let contract = &unit.contract.fully_qualified_name;
    let provider = &unit.provider.fully_qualified_name;
    let fields = [
        (contract.as_str(), UNDERLYING_FIELD),
        (config.allow_list_type.as_str(), ALLOW_LIST_FIELD),
        (provider.as_str(), PROVIDER_FIELD),
    ];

    for line in GENERATED_HEADER {
        w.line(line);
    }
    w.blank();
    w.open(format!("namespace {}", identity.namespace));
    w.open(format!("public sealed class {} : {}", identity.type_name, contract));

    for (ty, name) in fields {
        w.line(format!("private readonly {} {};", ty, name));
    }

    let parameters: Vec<String> = fields
        .iter()
        .zip(CONSTRUCTOR_PARAMETERS)
        .map(|((ty, _), param)| format!("{} {}", ty, param))
        .collect();
    w.blank();
    w.open(format!("public {}({})", identity.type_name, parameters.join(", ")));
    for ((_, field), param) in fields.iter().zip(CONSTRUCTOR_PARAMETERS) {
        w.line(format!("this.{} = {};", field, param));
    }
    w.close();

    for property in &unit.properties {
        emit_property(&mut w, unit, property, &config.not_supported_exception);
    }

    for (index, method) in unit.methods.iter().enumerate() {
        let locals = MethodLocals::resolve(method);
        if unit.intercepts(method) {
            w.blank();
            emit_context_class(&mut w, unit, method, index, &locals);
        }
        emit_method(&mut w, unit, method, index, &locals);
    }

    w.close();
    w.close();

    SourceArtifact {
        name: identity.artifact_name.clone(),
        text: w.finish(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        AccessorKind, MethodDescriptor, PropertyDescriptor, ReturnShape, TypeReference,
    };

    fn identity() -> GeneratedIdentity {
        GeneratedIdentity {
            namespace: "Decorators.Logging.IService".to_string(),
            type_name: "Decorator".to_string(),
            artifact_name: "Decorator_Logging_IService.g.cs".to_string(),
        }
    }

    fn unit() -> DecoratorUnit {
        let contract = TypeReference::named("global::Acme.IService", "IService");
        DecoratorUnit {
            contract: contract.clone(),
            provider: TypeReference::named("global::Acme.Logging", "Logging"),
            provider_constructor: vec![],
            methods: vec![MethodDescriptor {
                declaring_contract: contract.clone(),
                name: "Run".to_string(),
                shape: ReturnShape::Void,
                return_type: None,
                type_parameters: vec![],
                parameters: vec![],
                hook: "Process".to_string(),
            }],
            properties: vec![PropertyDescriptor::new(
                contract,
                "Name",
                TypeReference::named("global::System.String", "String"),
                vec![AccessorKind::Get],
            )
            .unwrap()],
            allow_list: None,
        }
    }

    #[test]
    fn test_proxy_layout() {
        let artifact = emit_proxy(&unit(), &identity(), &GeneratorConfig::default());
        assert_eq!(artifact.name, "Decorator_Logging_IService.g.cs");

        let text = &artifact.text;
        assert!(text.starts_with("// <auto-generated/>\n#nullable disable\n\nnamespace Decorators.Logging.IService\n{\n"));
        assert!(text.contains("    public sealed class Decorator : global::Acme.IService\n"));
        assert!(text.contains(
            "        private readonly global::System.Collections.Generic.HashSet<string> _applicableMembers;\n"
        ));
        assert!(text.contains("        public Decorator(global::Acme.IService underlyingImplementation, global::System.Collections.Generic.HashSet<string> applicableMembers, global::Acme.Logging behaviorProvider)\n"));
        assert!(text.contains("            this._behaviorProvider = behaviorProvider;\n"));
        assert!(text.contains("        private sealed class RunMethodContext_0\n"));
        assert!(text.ends_with("    }\n}\n"));

        let property_at = text.find("global::Acme.IService.Name").unwrap();
        let method_at = text.find("global::Acme.IService.Run()").unwrap();
        assert!(property_at < method_at);
    }

    #[test]
    fn test_braces_balance() {
        let text = emit_proxy(&unit(), &identity(), &GeneratorConfig::default()).text;
        let open = text.matches('{').count();
        let close = text.matches('}').count();
        assert_eq!(open, close);
    }
}
