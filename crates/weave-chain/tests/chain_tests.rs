//! Tests for weave-chain: execution order, halting, substitution, failures, capability checks

use std::sync::{Arc, Mutex};

use serde_json::json;
use weave_chain::*;
use weave_core::{
    AccessKind, AspectError, Arguments, CallId, Error, HaltCell, Invocation, Metadata, Phase,
    PropertyAccess, Result, Target, Value,
};

struct Dummy;

impl Target for Dummy {
    fn type_name(&self) -> &str {
        "Dummy"
    }

    fn call(&mut self, _member: &str, _args: &Arguments) -> Result<Value> {
        Ok(Value::Null)
    }

    fn get_property(&self, name: &str) -> Option<Value> {
        (name == "level").then(|| json!(3))
    }
}

type Log = Arc<Mutex<Vec<String>>>;

/// Records every phase call, optionally returning a value and/or halting.
struct Recorder {
    name: String,
    caps: Capabilities,
    log: Log,
    returns: Option<Value>,
    halt: bool,
    fail: bool,
}

impl Recorder {
    fn new(name: &str, caps: Capabilities, log: &Log) -> Self {
        Self {
            name: name.into(),
            caps,
            log: log.clone(),
            returns: None,
            halt: false,
            fail: false,
        }
    }

    fn returning(mut self, value: Value) -> Self {
        self.returns = Some(value);
        self
    }

    fn halting(mut self) -> Self {
        self.halt = true;
        self
    }

    fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    fn step(&self, phase: &str, request_halt: impl Fn()) -> AspectResult {
        self.log.lock().unwrap().push(format!("{}.{}", self.name, phase));
        if self.fail {
            return Err(AspectError::failed(&self.name, "boom"));
        }
        if self.halt {
            request_halt();
        }
        Ok(self.returns.clone())
    }
}

impl MethodAspect for Recorder {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    fn before(&self, _metadata: &Metadata, invocation: &Invocation<'_>) -> AspectResult {
        self.step("before", || invocation.request_halt())
    }

    fn after(&self, _metadata: &Metadata, invocation: &Invocation<'_>) -> AspectResult {
        self.step("after", || invocation.request_halt())
    }
}

impl PropertyAspect for Recorder {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, kind: AccessKind, phase: Phase) -> bool {
        kind == AccessKind::Read && self.caps.supports(phase)
    }

    fn before(&self, _metadata: &Metadata, access: &PropertyAccess<'_>) -> AspectResult {
        self.step("before", || access.request_halt())
    }
}

fn method_binding(aspect: Recorder) -> MethodBinding {
    let kind = aspect.name.clone();
    let aspect: Arc<dyn MethodAspect> = Arc::new(aspect);
    Binding::new(Metadata::new(kind), aspect)
}

fn property_binding(aspect: Recorder) -> PropertyBinding {
    let kind = aspect.name.clone();
    let aspect: Arc<dyn PropertyAspect> = Arc::new(aspect);
    Binding::new(Metadata::new(kind), aspect)
}

fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

fn run_before(bindings: &[MethodBinding]) -> Result<ChainOutcome> {
    let args = Arguments::new();
    let halt = HaltCell::new();
    let inv = Invocation::before(&Dummy, "op", &args, &halt, CallId::new());
    execute(bindings, &inv)
}

fn run_after(bindings: &[MethodBinding], seed: Value) -> Result<ChainOutcome> {
    let args = Arguments::new();
    let halt = HaltCell::new();
    let inv = Invocation::after(&Dummy, "op", &args, &halt, CallId::new(), seed);
    execute(bindings, &inv)
}

// ===========================================================================
// Ordering
// ===========================================================================

#[test]
fn before_runs_in_declaration_order() {
    let log = new_log();
    let chain: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|n| method_binding(Recorder::new(n, Capabilities::BOTH, &log)))
        .collect();

    let outcome = run_before(&chain).unwrap();
    assert_eq!(entries(&log), vec!["a.before", "b.before", "c.before"]);
    assert_eq!(outcome.steps, 3);
    assert!(!outcome.halted);
}

#[test]
fn after_runs_in_reverse_order() {
    let log = new_log();
    let chain: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|n| method_binding(Recorder::new(n, Capabilities::BOTH, &log)))
        .collect();

    run_after(&chain, Value::Null).unwrap();
    assert_eq!(entries(&log), vec!["c.after", "b.after", "a.after"]);
}

#[test]
fn after_order_is_reverse_of_before_order() {
    let log = new_log();
    let chain: Vec<_> = ["x", "y", "z", "w"]
        .iter()
        .map(|n| method_binding(Recorder::new(n, Capabilities::BOTH, &log)))
        .collect();

    run_before(&chain).unwrap();
    let before: Vec<String> = entries(&log).iter().map(|e| e.replace(".before", "")).collect();
    log.lock().unwrap().clear();
    run_after(&chain, Value::Null).unwrap();
    let mut after: Vec<String> = entries(&log).iter().map(|e| e.replace(".after", "")).collect();
    after.reverse();
    assert_eq!(before, after);
}

// ===========================================================================
// Results
// ===========================================================================

#[test]
fn empty_chain_passes_seed_through() {
    let outcome = run_after(&[], json!("real")).unwrap();
    assert_eq!(outcome.result, json!("real"));
    assert!(!outcome.halted);
    assert_eq!(outcome.steps, 0);
}

#[test]
fn none_keeps_candidate_and_some_replaces_it() {
    let log = new_log();
    let chain = vec![
        method_binding(Recorder::new("outer", Capabilities::AFTER, &log)),
        method_binding(Recorder::new("inner", Capabilities::AFTER, &log).returning(json!(7))),
    ];
    // inner runs first in the after phase, then outer keeps its value
    let outcome = run_after(&chain, json!(1)).unwrap();
    assert_eq!(outcome.result, json!(7));
}

#[test]
fn last_substitution_wins() {
    let log = new_log();
    let chain = vec![
        method_binding(Recorder::new("a", Capabilities::BEFORE, &log).returning(json!(1))),
        method_binding(Recorder::new("b", Capabilities::BEFORE, &log).returning(json!(2))),
    ];
    assert_eq!(run_before(&chain).unwrap().result, json!(2));
}

// ===========================================================================
// Halting
// ===========================================================================

#[test]
fn halt_stops_remaining_aspects() {
    let log = new_log();
    let chain = vec![
        method_binding(Recorder::new("a", Capabilities::BEFORE, &log)),
        method_binding(
            Recorder::new("b", Capabilities::BEFORE, &log)
                .returning(json!("cached"))
                .halting(),
        ),
        method_binding(Recorder::new("c", Capabilities::BEFORE, &log)),
    ];

    let outcome = run_before(&chain).unwrap();
    assert!(outcome.halted);
    assert_eq!(outcome.result, json!("cached"));
    assert_eq!(outcome.steps, 2);
    assert_eq!(entries(&log), vec!["a.before", "b.before"]);
}

#[test]
fn after_halt_returns_halting_value() {
    let log = new_log();
    let chain = vec![
        method_binding(Recorder::new("a", Capabilities::AFTER, &log)),
        method_binding(
            Recorder::new("b", Capabilities::AFTER, &log)
                .returning(json!(42))
                .halting(),
        ),
    ];

    let outcome = run_after(&chain, json!("real")).unwrap();
    assert!(outcome.halted);
    assert_eq!(outcome.result, json!(42));
    assert_eq!(entries(&log), vec!["b.after"]);
}

#[test]
fn halt_without_value_keeps_candidate() {
    let log = new_log();
    let chain = vec![method_binding(Recorder::new("a", Capabilities::AFTER, &log).halting())];
    let outcome = run_after(&chain, json!("real")).unwrap();
    assert!(outcome.halted);
    assert_eq!(outcome.result, json!("real"));
}

// ===========================================================================
// Failures
// ===========================================================================

#[test]
fn aspect_failure_propagates_unchanged_and_stops_chain() {
    let log = new_log();
    let chain = vec![
        method_binding(Recorder::new("a", Capabilities::BEFORE, &log).failing()),
        method_binding(Recorder::new("b", Capabilities::BEFORE, &log)),
    ];

    let err = run_before(&chain).unwrap_err();
    assert_eq!(err.as_aspect_error(), Some(&AspectError::failed("a", "boom")));
    assert_eq!(entries(&log), vec!["a.before"]);
}

#[test]
fn capability_mismatch_is_contract_violation() {
    let log = new_log();
    let chain = vec![
        method_binding(Recorder::new("after_only", Capabilities::AFTER, &log)),
    ];

    let err = run_before(&chain).unwrap_err();
    assert!(matches!(err, Error::ContractViolation(_)));
    assert!(err.to_string().contains("after_only"));
    assert!(entries(&log).is_empty());
}

// ===========================================================================
// Determinism
// ===========================================================================

#[test]
fn repeated_runs_are_identical() {
    let log = new_log();
    let chain = vec![
        method_binding(Recorder::new("a", Capabilities::BOTH, &log).returning(json!(1))),
        method_binding(Recorder::new("b", Capabilities::BOTH, &log).halting()),
        method_binding(Recorder::new("c", Capabilities::BOTH, &log)),
    ];

    let first = run_before(&chain).unwrap();
    let first_log = entries(&log);
    log.lock().unwrap().clear();
    let second = run_before(&chain).unwrap();
    assert_eq!(first, second);
    assert_eq!(first_log, entries(&log));
}

// ===========================================================================
// Property chains
// ===========================================================================

#[test]
fn property_chain_runs_and_halts() {
    let log = new_log();
    let chain = vec![
        property_binding(
            Recorder::new("cache", Capabilities::BEFORE, &log)
                .returning(json!("cached"))
                .halting(),
        ),
        property_binding(Recorder::new("never", Capabilities::BEFORE, &log)),
    ];
    let halt = HaltCell::new();
    let access =
        PropertyAccess::before(&Dummy, AccessKind::Read, "level", None, &halt, CallId::new());

    let outcome = execute(&chain, &access).unwrap();
    assert!(outcome.halted);
    assert_eq!(outcome.result, json!("cached"));
    assert_eq!(entries(&log), vec!["cache.before"]);
}

#[test]
fn property_chain_rejects_unsupported_kind() {
    let log = new_log();
    let chain = vec![property_binding(Recorder::new("reader", Capabilities::BEFORE, &log))];
    let halt = HaltCell::new();
    let proposed = json!(1);
    let access = PropertyAccess::before(
        &Dummy,
        AccessKind::Write,
        "level",
        Some(&proposed),
        &halt,
        CallId::new(),
    );

    let err = execute(&chain, &access).unwrap_err();
    assert!(matches!(err, Error::ContractViolation(_)));
}

// ===========================================================================
// Bindings
// ===========================================================================

#[test]
fn binding_supports_reflects_capabilities() {
    let log = new_log();
    let b = method_binding(Recorder::new("a", Capabilities::AFTER, &log));
    assert!(!b.supports(Phase::Before));
    assert!(b.supports(Phase::After));
    assert_eq!(b.metadata().kind(), "a");

    let p = property_binding(Recorder::new("p", Capabilities::BEFORE, &log));
    assert!(p.supports(AccessKind::Read, Phase::Before));
    assert!(!p.supports(AccessKind::Write, Phase::Before));
}

#[test]
fn capabilities_constants() {
    assert!(Capabilities::BOTH.supports(Phase::Before));
    assert!(Capabilities::BOTH.supports(Phase::After));
    assert!(!Capabilities::NONE.supports(Phase::Before));
    assert_eq!(Capabilities::default(), Capabilities::NONE);
}
