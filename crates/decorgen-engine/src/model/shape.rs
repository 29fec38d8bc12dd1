//! Return-shape classification and the hook kinds it selects

use serde::{Deserialize, Serialize};
use std::fmt;

use super::types::TypeReference;

/// Simple name of the deferred unit-of-work type.
pub const AWAITABLE_TYPE_NAME: &str = "Task";
/// Simple name of the lightweight deferred type.
pub const LIGHT_AWAITABLE_TYPE_NAME: &str = "ValueTask";

/// Shape of a method's return, computed from the return type alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReturnShape {
    /// Returns nothing
    Void,
    /// Returns a non-deferred value
    Value,
    /// Returns a deferred unit of work (`Task`)
    Awaitable,
    /// Returns a deferred value (`Task<T>`)
    AwaitableOfValue,
    /// Returns a lightweight deferred unit of work (`ValueTask`)
    LightAwaitable,
    /// Returns a lightweight deferred value (`ValueTask<T>`)
    LightAwaitableOfValue,
}

impl ReturnShape {
    /// Classify a return type. `None` means the method returns nothing.
    pub fn classify(return_type: Option<&TypeReference>) -> Self {
        let Some(ty) = return_type else {
            return ReturnShape::Void;
        };

        match (ty.simple_name(), ty.arity()) {
            (AWAITABLE_TYPE_NAME, 0) => ReturnShape::Awaitable,
            (AWAITABLE_TYPE_NAME, 1) => ReturnShape::AwaitableOfValue,
            (LIGHT_AWAITABLE_TYPE_NAME, 0) => ReturnShape::LightAwaitable,
            (LIGHT_AWAITABLE_TYPE_NAME, 1) => ReturnShape::LightAwaitableOfValue,
            _ => ReturnShape::Value,
        }
    }

    /// The provider hook kind servicing this shape.
    pub fn hook_kind(self) -> HookKind {
        match self {
            ReturnShape::Void => HookKind::ProcessVoid,
            ReturnShape::Value => HookKind::ProcessValue,
            ReturnShape::Awaitable => HookKind::ProcessAwaitable,
            ReturnShape::AwaitableOfValue => HookKind::ProcessAwaitableOfValue,
            ReturnShape::LightAwaitable => HookKind::ProcessLightAwaitable,
            ReturnShape::LightAwaitableOfValue => HookKind::ProcessLightAwaitableOfValue,
        }
    }

    /// Whether the method produces no result at all.
    pub fn is_void(self) -> bool {
        matches!(self, ReturnShape::Void)
    }

    /// Whether the call may complete after the synchronous frame returns.
    pub fn is_asynchronous(self) -> bool {
        !matches!(self, ReturnShape::Void | ReturnShape::Value)
    }
}

/// One of the six behavior-provider hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookKind {
    /// Wraps methods returning nothing
    ProcessVoid,
    /// Wraps methods returning a plain value
    ProcessValue,
    /// Wraps methods returning `Task`
    ProcessAwaitable,
    /// Wraps methods returning `Task<T>`
    ProcessAwaitableOfValue,
    /// Wraps methods returning `ValueTask`
    ProcessLightAwaitable,
    /// Wraps methods returning `ValueTask<T>`
    ProcessLightAwaitableOfValue,
}

impl HookKind {
    /// All hook kinds, in table order.
    pub const ALL: [HookKind; 6] = [
        HookKind::ProcessVoid,
        HookKind::ProcessValue,
        HookKind::ProcessAwaitable,
        HookKind::ProcessAwaitableOfValue,
        HookKind::ProcessLightAwaitable,
        HookKind::ProcessLightAwaitableOfValue,
    ];

    /// Method name the base behavior provider declares for this hook.
    pub fn default_selector(self) -> &'static str {
        match self {
            HookKind::ProcessVoid => "Process",
            HookKind::ProcessValue => "ProcessWithReturnType",
            HookKind::ProcessAwaitable => "ProcessAsync",
            HookKind::ProcessAwaitableOfValue => "ProcessWithReturnTypeAsync",
            HookKind::ProcessLightAwaitable => "ProcessValueTaskAsync",
            HookKind::ProcessLightAwaitableOfValue => "ProcessWithReturnTypeValueTaskAsync",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            HookKind::ProcessVoid => "process-void",
            HookKind::ProcessValue => "process-value",
            HookKind::ProcessAwaitable => "process-awaitable",
            HookKind::ProcessAwaitableOfValue => "process-awaitable-of-value",
            HookKind::ProcessLightAwaitable => "process-light-awaitable",
            HookKind::ProcessLightAwaitableOfValue => "process-light-awaitable-of-value",
        };
        f.write_str(text)
    }
}
