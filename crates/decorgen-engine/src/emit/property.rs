//! Property forwarding synthesis

use crate::model::{AccessorKind, DecoratorUnit, PropertyDescriptor};

use super::proxy::UNDERLYING_FIELD;
use super::receiver;
use super::writer::SourceWriter;

/// Emit the explicit implementation of one property.
///
/// `get` and `set` forward to the underlying implementation. An init-only
/// accessor cannot be intercepted after construction and always throws
/// `not_supported`.
pub(crate) fn emit_property(
    w: &mut SourceWriter,
    unit: &DecoratorUnit,
    property: &PropertyDescriptor,
    not_supported: &str,
) {
    let target = receiver(
        unit,
        &property.declaring_contract,
        &property.name,
        &format!("this.{}", UNDERLYING_FIELD),
    );

    w.blank();
    w.open(format!(
        "{} {}.{}",
        property.ty.fully_qualified_name, property.declaring_contract.fully_qualified_name, property.name
    ));
    for accessor in &property.accessors {
        match accessor {
            AccessorKind::Get => {
                w.open("get");
                w.line(format!("return {}.{};", target, property.name));
                w.close();
            }
            AccessorKind::Set => {
                w.open("set");
                w.line(format!("{}.{} = value;", target, property.name));
                w.close();
            }
            AccessorKind::InitOnly => {
                w.open("init");
                w.line(format!("throw new {}();", not_supported));
                w.close();
            }
        }
    }
    w.close();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypeReference;

    const NOT_SUPPORTED: &str = "global::System.NotSupportedException";

    fn contract() -> TypeReference {
        TypeReference::named("global::Acme.IService", "IService")
    }

    fn unit(properties: Vec<PropertyDescriptor>) -> DecoratorUnit {
        DecoratorUnit {
            contract: contract(),
            provider: TypeReference::named("global::Acme.Logging", "Logging"),
            provider_constructor: vec![],
            methods: vec![],
            properties,
            allow_list: None,
        }
    }

    fn property(name: &str, accessors: Vec<AccessorKind>) -> PropertyDescriptor {
        PropertyDescriptor::new(
            contract(),
            name,
            TypeReference::named("global::System.String", "String"),
            accessors,
        )
        .unwrap()
    }

    fn render(unit: &DecoratorUnit) -> String {
        let mut w = SourceWriter::new();
        for p in &unit.properties {
            emit_property(&mut w, unit, p, NOT_SUPPORTED);
        }
        w.finish()
    }

    #[test]
    fn test_get_and_set_forward() {
        let u = unit(vec![property("Name", vec![AccessorKind::Get, AccessorKind::Set])]);
        let expected = "\
global::System.String global::Acme.IService.Name
{
    get
    {
        return this._underlyingImplementation.Name;
    }
    set
    {
        this._underlyingImplementation.Name = value;
    }
}
";
        assert_eq!(render(&u), expected);
    }

    #[test]
    fn test_init_only_throws() {
        let u = unit(vec![property("Id", vec![AccessorKind::Get, AccessorKind::InitOnly])]);
        let text = render(&u);
        assert!(text.contains("    init\n    {\n        throw new global::System.NotSupportedException();\n    }"));
        assert!(!text.contains("Id = value"));
    }
}
