//! Per-call contexts handed to aspects.
//!
//! One intercepted call produces up to two contexts, one per phase. Both
//! borrow the same [`HaltCell`], so the after phase can see that the before
//! phase stopped the call. Contexts live only as long as their phase.

use std::cell::{Cell, OnceCell, RefCell};

use crate::target::Target;
use crate::types::{AccessKind, Arguments, CallId, Phase, Value};

/// The "halt requested" cell shared by both phases of one call.
///
/// Halts are recorded per phase: a halt in the before phase does not stop
/// an after chain that the caller decided to run anyway.
#[derive(Debug, Default)]
pub struct HaltCell {
    before: Cell<bool>,
    after: Cell<bool>,
}

impl HaltCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent.
    pub fn request(&self, phase: Phase) {
        match phase {
            Phase::Before => self.before.set(true),
            Phase::After => self.after.set(true),
        }
    }

    pub fn is_halted(&self, phase: Phase) -> bool {
        match phase {
            Phase::Before => self.before.get(),
            Phase::After => self.after.get(),
        }
    }

    pub fn any(&self) -> bool {
        self.before.get() || self.after.get()
    }
}

/// What the chain executor needs from a context, regardless of whether it
/// describes a method call or a property access.
pub trait JoinPoint {
    fn phase(&self) -> Phase;
    fn call_id(&self) -> CallId;
    /// Member or property name.
    fn subject(&self) -> &str;
    fn is_halted(&self) -> bool;
    fn result(&self) -> Value;
    fn set_result(&self, value: Value);
}

/// One phase of an intercepted method call.
pub struct Invocation<'a> {
    target: &'a dyn Target,
    member: &'a str,
    arguments: &'a Arguments,
    phase: Phase,
    halt: &'a HaltCell,
    result: RefCell<Value>,
    call_id: CallId,
}

impl<'a> Invocation<'a> {
    /// Context for the before phase. The candidate result starts as `Null`.
    pub fn before(
        target: &'a dyn Target,
        member: &'a str,
        arguments: &'a Arguments,
        halt: &'a HaltCell,
        call_id: CallId,
    ) -> Self {
        Self {
            target,
            member,
            arguments,
            phase: Phase::Before,
            halt,
            result: RefCell::new(Value::Null),
            call_id,
        }
    }

    /// Context for the after phase, seeded with the real operation's result.
    pub fn after(
        target: &'a dyn Target,
        member: &'a str,
        arguments: &'a Arguments,
        halt: &'a HaltCell,
        call_id: CallId,
        result: Value,
    ) -> Self {
        Self {
            target,
            member,
            arguments,
            phase: Phase::After,
            halt,
            result: RefCell::new(result),
            call_id,
        }
    }

    pub fn target(&self) -> &'a dyn Target {
        self.target
    }

    pub fn member_name(&self) -> &str {
        self.member
    }

    pub fn arguments(&self) -> &Arguments {
        self.arguments
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn call_id(&self) -> CallId {
        self.call_id
    }

    /// Ask the executor to stop this chain after the current aspect returns.
    pub fn request_halt(&self) {
        self.halt.request(self.phase);
    }

    pub fn is_halted(&self) -> bool {
        self.halt.is_halted(self.phase)
    }

    /// True when the before phase of this call halted.
    pub fn halted_before(&self) -> bool {
        self.halt.is_halted(Phase::Before)
    }

    pub fn result(&self) -> Value {
        self.result.borrow().clone()
    }

    pub fn set_result(&self, value: Value) {
        *self.result.borrow_mut() = value;
    }

    pub fn into_result(self) -> Value {
        self.result.into_inner()
    }
}

impl JoinPoint for Invocation<'_> {
    fn phase(&self) -> Phase {
        self.phase
    }

    fn call_id(&self) -> CallId {
        self.call_id
    }

    fn subject(&self) -> &str {
        self.member
    }

    fn is_halted(&self) -> bool {
        Invocation::is_halted(self)
    }

    fn result(&self) -> Value {
        Invocation::result(self)
    }

    fn set_result(&self, value: Value) {
        Invocation::set_result(self, value)
    }
}

/// One phase of an intercepted property operation.
pub struct PropertyAccess<'a> {
    target: &'a dyn Target,
    name: &'a str,
    kind: AccessKind,
    proposed: Option<&'a Value>,
    current: OnceCell<Value>,
    phase: Phase,
    halt: &'a HaltCell,
    result: RefCell<Value>,
    call_id: CallId,
}

impl<'a> PropertyAccess<'a> {
    pub fn before(
        target: &'a dyn Target,
        kind: AccessKind,
        name: &'a str,
        proposed: Option<&'a Value>,
        halt: &'a HaltCell,
        call_id: CallId,
    ) -> Self {
        Self {
            target,
            name,
            kind,
            proposed,
            current: OnceCell::new(),
            phase: Phase::Before,
            halt,
            result: RefCell::new(Value::Null),
            call_id,
        }
    }

    pub fn after(
        target: &'a dyn Target,
        kind: AccessKind,
        name: &'a str,
        proposed: Option<&'a Value>,
        halt: &'a HaltCell,
        call_id: CallId,
        result: Value,
    ) -> Self {
        Self {
            target,
            name,
            kind,
            proposed,
            current: OnceCell::new(),
            phase: Phase::After,
            halt,
            result: RefCell::new(result),
            call_id,
        }
    }

    pub fn target(&self) -> &'a dyn Target {
        self.target
    }

    pub fn property_name(&self) -> &str {
        self.name
    }

    pub fn kind(&self) -> AccessKind {
        self.kind
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn call_id(&self) -> CallId {
        self.call_id
    }

    /// The property's value on the target, fetched on first use and then
    /// memoised for the rest of this phase. `Null` when unset.
    pub fn current_value(&self) -> &Value {
        self.current
            .get_or_init(|| self.target.get_property(self.name).unwrap_or(Value::Null))
    }

    /// The value being written. Only present for [`AccessKind::Write`].
    pub fn proposed_value(&self) -> Option<&Value> {
        self.proposed
    }

    pub fn request_halt(&self) {
        self.halt.request(self.phase);
    }

    pub fn is_halted(&self) -> bool {
        self.halt.is_halted(self.phase)
    }

    pub fn halted_before(&self) -> bool {
        self.halt.is_halted(Phase::Before)
    }

    pub fn result(&self) -> Value {
        self.result.borrow().clone()
    }

    pub fn set_result(&self, value: Value) {
        *self.result.borrow_mut() = value;
    }

    pub fn into_result(self) -> Value {
        self.result.into_inner()
    }
}

impl JoinPoint for PropertyAccess<'_> {
    fn phase(&self) -> Phase {
        self.phase
    }

    fn call_id(&self) -> CallId {
        self.call_id
    }

    fn subject(&self) -> &str {
        self.name
    }

    fn is_halted(&self) -> bool {
        PropertyAccess::is_halted(self)
    }

    fn result(&self) -> Value {
        PropertyAccess::result(self)
    }

    fn set_result(&self, value: Value) {
        PropertyAccess::set_result(self, value)
    }
}
