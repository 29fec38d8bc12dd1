//! Method forwarding synthesis
//!
//! Each method produces two members on the proxy: a private context class
//! holding the call's arguments, and the explicit implementation that
//! routes the call through the provider hook.

use crate::model::{DecoratorUnit, MethodDescriptor, ParameterDescriptor, PassingMode};

use super::locals::MethodLocals;
use super::proxy::{ALLOW_LIST_FIELD, PROVIDER_FIELD, UNDERLYING_FIELD};
use super::writer::SourceWriter;
use super::{identifier, receiver, type_list};

/// Name of the context class for the method at `index` within its unit
pub fn context_class_name(method: &MethodDescriptor, index: usize) -> String {
    format!("{}MethodContext_{}", method.name, index)
}

/// Emit the context class of one method.
///
/// The class is a reference type so writes made by the inner call are
/// still visible to the proxy after the hook returns.
pub(crate) fn emit_context_class(
    w: &mut SourceWriter,
    unit: &DecoratorUnit,
    method: &MethodDescriptor,
    index: usize,
    locals: &MethodLocals,
) {
    let generics = type_list(method.captured_type_parameters());
    w.open(format!(
        "private sealed class {}{}",
        context_class_name(method, index),
        generics
    ));
    w.line(format!(
        "public {} {};",
        unit.contract.fully_qualified_name, locals.underlying_field
    ));
    for param in &method.parameters {
        w.line(format!(
            "public {} {};",
            param.ty.fully_qualified_name,
            identifier(&param.name)
        ));
    }
    w.close();
}

/// Emit the explicit implementation of one method.
pub(crate) fn emit_method(
    w: &mut SourceWriter,
    unit: &DecoratorUnit,
    method: &MethodDescriptor,
    index: usize,
    locals: &MethodLocals,
) {
    let declaring = &method.declaring_contract.fully_qualified_name;
    let return_type = match (&method.return_type, method.shape.is_void()) {
        (Some(ty), false) => ty.fully_qualified_name.as_str(),
        _ => "void",
    };
    let parameters: Vec<String> = method.parameters.iter().map(declare_parameter).collect();

    w.blank();
    w.open(format!(
        "{} {}.{}{}({})",
        return_type,
        declaring,
        method.name,
        type_list(&method.type_parameters),
        parameters.join(", ")
    ));

    if !unit.intercepts(method) {
        emit_direct_call(w, unit, method, false);
        w.close();
        return;
    }

    emit_guard(w, unit, method);
    w.blank();
    emit_context_initialization(w, method, index, locals);
    w.blank();
    emit_hook_call(w, unit, method, locals);

    let write_backs: Vec<&ParameterDescriptor> =
        method.parameters.iter().filter(|p| p.mode.writes_back()).collect();
    if !write_backs.is_empty() {
        w.blank();
        for param in write_backs {
            let name = identifier(&param.name);
            w.line(format!("{} = {}.{};", name, locals.context, name));
        }
    }

    if !method.shape.is_void() {
        w.blank();
        w.line(format!("return {};", locals.result));
    }

    w.close();
}

/// Skip the provider when the runtime allow-list does not name this method.
///
/// Accepts the same entries as [`DecoratorUnit::intercepts`].
fn emit_guard(w: &mut SourceWriter, unit: &DecoratorUnit, method: &MethodDescriptor) {
    let [_, simple, qualified] = method.allow_list_keys();
    let checks = [
        format!("nameof({}.{})", method.declaring_contract.fully_qualified_name, method.name),
        format!("\"{}\"", simple),
        format!("\"{}\"", qualified),
    ];

    w.line(format!("if (this.{} != null &&", ALLOW_LIST_FIELD));
    let last = checks.len() - 1;
    for (i, check) in checks.iter().enumerate() {
        let tail = if i == last { ")" } else { " &&" };
        w.line(format!("    !this.{}.Contains({}){}", ALLOW_LIST_FIELD, check, tail));
    }
    w.open("");
    emit_direct_call(w, unit, method, true);
    w.close();
}

fn emit_direct_call(
    w: &mut SourceWriter,
    unit: &DecoratorUnit,
    method: &MethodDescriptor,
    early_return: bool,
) {
    let underlying = format!("this.{}", UNDERLYING_FIELD);
    let target = receiver(unit, &method.declaring_contract, &method.name, &underlying);
    let arguments: Vec<String> = method
        .parameters
        .iter()
        .map(|p| with_keyword(p.mode, &identifier(&p.name)))
        .collect();
    let call = format!(
        "{}.{}{}({})",
        target,
        method.name,
        type_list(&method.type_parameters),
        arguments.join(", ")
    );

    if method.shape.is_void() {
        w.line(format!("{};", call));
        if early_return {
            w.line("return;");
        }
    } else {
        w.line(format!("return {};", call));
    }
}

fn emit_context_initialization(
    w: &mut SourceWriter,
    method: &MethodDescriptor,
    index: usize,
    locals: &MethodLocals,
) {
    let mut assignments = vec![format!("{} = this.{}", locals.underlying_field, UNDERLYING_FIELD)];
    assignments.extend(
        method
            .parameters
            .iter()
            .filter(|p| p.mode.is_captured_on_entry())
            .map(|p| identifier(&p.name))
            .map(|name| format!("{} = {}", name, name)),
    );

    w.line(format!(
        "var {} = new {}{}",
        locals.context,
        context_class_name(method, index),
        type_list(method.captured_type_parameters())
    ));
    w.open("");
    let last = assignments.len() - 1;
    for (i, assignment) in assignments.iter().enumerate() {
        if i == last {
            w.line(assignment);
        } else {
            w.line(format!("{},", assignment));
        }
    }
    w.close_with("};");
}

fn emit_hook_call(
    w: &mut SourceWriter,
    unit: &DecoratorUnit,
    method: &MethodDescriptor,
    locals: &MethodLocals,
) {
    let ctx = &locals.closure_parameter;
    let context_argument = if method.shape.is_asynchronous() {
        locals.context.clone()
    } else {
        format!("in {}", locals.context)
    };
    let holder = if method.shape.is_void() {
        String::new()
    } else {
        format!("var {} = ", locals.result)
    };

    w.line(format!(
        "{}this.{}.{}({}, static ({}) =>",
        holder, PROVIDER_FIELD, method.hook, context_argument, ctx
    ));
    w.open("");

    let mut arguments = Vec::with_capacity(method.parameters.len());
    let mut loaded = false;
    for (i, param) in method.parameters.iter().enumerate() {
        let name = identifier(&param.name);
        let argument = match (param.mode, locals.temporary(i)) {
            (PassingMode::ByValue, _) | (_, None) => format!("{}.{}", ctx, name),
            (PassingMode::ByOut, Some(temp)) => {
                format!("out {} {}", param.ty.fully_qualified_name, temp)
            }
            (mode, Some(temp)) => {
                w.line(format!("var {} = {}.{};", temp, ctx, name));
                loaded = true;
                with_keyword(mode, temp)
            }
        };
        arguments.push(argument);
    }
    if loaded {
        w.blank();
    }

    let target = receiver(
        unit,
        &method.declaring_contract,
        &method.name,
        &format!("{}.{}", ctx, locals.underlying_field),
    );
    let call = format!(
        "{}.{}{}({})",
        target,
        method.name,
        type_list(&method.type_parameters),
        arguments.join(", ")
    );
    if method.shape.is_void() {
        w.line(format!("{};", call));
    } else {
        w.line(format!("var {} = {};", locals.inner_result, call));
    }

    let mut stored = false;
    for (i, param) in method.parameters.iter().enumerate() {
        if let (true, Some(temp)) = (param.mode.writes_back(), locals.temporary(i)) {
            if !stored {
                w.blank();
                stored = true;
            }
            w.line(format!("{}.{} = {};", ctx, identifier(&param.name), temp));
        }
    }

    if !method.shape.is_void() {
        w.blank();
        w.line(format!("return {};", locals.inner_result));
    }
    w.close_with("});");
}

fn declare_parameter(param: &ParameterDescriptor) -> String {
    with_keyword(
        param.mode,
        &format!("{} {}", param.ty.fully_qualified_name, identifier(&param.name)),
    )
}

fn with_keyword(mode: PassingMode, text: &str) -> String {
    match mode.keyword() {
        "" => text.to_string(),
        keyword => format!("{} {}", keyword, text),
    }
}
