//! Proxy binding hooks
//!
//! The functions a wrapper calls on entry to and exit from an intercepted
//! member. Each one builds the phase context, runs the chain executor and
//! reads back the result and halt state. Members with no bindings for the
//! phase pass through without building a context.

use tracing::trace;
use weave_chain::execute;
use weave_core::{
    AccessKind, Arguments, CallId, HaltCell, Invocation, Phase, PropertyAccess, Result, Target,
    Value,
};

use crate::table::InterceptorTable;

/// State shared by both phases of one intercepted call.
#[derive(Debug, Default)]
pub struct CallFrame {
    pub id: CallId,
    pub halt: HaltCell,
}

impl CallFrame {
    pub fn new() -> Self {
        Self::default()
    }
}

/// What a hook hands back to the wrapper.
#[derive(Clone, Debug, PartialEq)]
pub struct HookOutcome {
    pub result: Value,
    pub halted: bool,
}

impl HookOutcome {
    pub fn pass(result: Value) -> Self {
        Self {
            result,
            halted: false,
        }
    }
}

/// Before-phase hook for a method. A halted outcome means: skip the real
/// method and return `result`.
pub fn on_before(
    table: &InterceptorTable,
    target: &dyn Target,
    member: &str,
    args: &Arguments,
    frame: &CallFrame,
) -> Result<HookOutcome> {
    let chain = table.method_chain(member, Phase::Before);
    if chain.is_empty() {
        trace!(member, "no before aspects");
        return Ok(HookOutcome::pass(Value::Null));
    }

    let invocation = Invocation::before(target, member, args, &frame.halt, frame.id);
    let outcome = execute(chain, &invocation)?;
    Ok(HookOutcome {
        result: outcome.result,
        halted: outcome.halted,
    })
}

/// After-phase hook for a method, seeded with `real_result`.
pub fn on_after(
    table: &InterceptorTable,
    target: &dyn Target,
    member: &str,
    args: &Arguments,
    real_result: Value,
    frame: &CallFrame,
) -> Result<HookOutcome> {
    let chain = table.method_chain(member, Phase::After);
    if chain.is_empty() {
        trace!(member, "no after aspects");
        return Ok(HookOutcome::pass(real_result));
    }

    let invocation = Invocation::after(target, member, args, &frame.halt, frame.id, real_result);
    let outcome = execute(chain, &invocation)?;
    Ok(HookOutcome {
        result: outcome.result,
        halted: outcome.halted,
    })
}

/// Before-phase hook for a property operation.
pub fn on_property_before(
    table: &InterceptorTable,
    target: &dyn Target,
    kind: AccessKind,
    property: &str,
    proposed: Option<&Value>,
    frame: &CallFrame,
) -> Result<HookOutcome> {
    let chain = table.property_chain(property, kind, Phase::Before);
    if chain.is_empty() {
        trace!(property, %kind, "no before aspects");
        return Ok(HookOutcome::pass(Value::Null));
    }

    let access = PropertyAccess::before(target, kind, property, proposed, &frame.halt, frame.id);
    let outcome = execute(chain, &access)?;
    Ok(HookOutcome {
        result: outcome.result,
        halted: outcome.halted,
    })
}

/// After-phase hook for a property operation, seeded with `real_result`.
pub fn on_property_after(
    table: &InterceptorTable,
    target: &dyn Target,
    kind: AccessKind,
    property: &str,
    proposed: Option<&Value>,
    real_result: Value,
    frame: &CallFrame,
) -> Result<HookOutcome> {
    let chain = table.property_chain(property, kind, Phase::After);
    if chain.is_empty() {
        trace!(property, %kind, "no after aspects");
        return Ok(HookOutcome::pass(real_result));
    }

    let access = PropertyAccess::after(
        target,
        kind,
        property,
        proposed,
        &frame.halt,
        frame.id,
        real_result,
    );
    let outcome = execute(chain, &access)?;
    Ok(HookOutcome {
        result: outcome.result,
        halted: outcome.halted,
    })
}
