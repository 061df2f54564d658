//! Tests for the built-in aspects, driven through real proxies

use std::sync::Arc;

use serde_json::json;
use weave_aspects::*;
use weave_core::{AccessKind, Arguments, AspectError, Error, Metadata, Result, Target, Value};
use weave_proxy::{AspectContainer, AspectRegistry, DeclarativeResolver, Declarations, Proxy};

#[derive(Debug, Default)]
struct Thermostat {
    setpoint: f64,
    reads: u32,
}

impl Target for Thermostat {
    fn type_name(&self) -> &str {
        "Thermostat"
    }

    fn call(&mut self, member: &str, _args: &Arguments) -> Result<Value> {
        match member {
            "read" => {
                self.reads += 1;
                Ok(json!(self.setpoint))
            }
            _ => Err(Error::unknown_member("Thermostat", member)),
        }
    }

    fn get_property(&self, name: &str) -> Option<Value> {
        (name == "setpoint").then(|| json!(self.setpoint))
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<()> {
        match (name, value.as_f64()) {
            ("setpoint", Some(v)) => {
                self.setpoint = v;
                Ok(())
            }
            _ => Err(Error::unknown_property("Thermostat", name)),
        }
    }
}

fn proxied(registry: AspectRegistry, declarations: Declarations) -> Proxy<Thermostat> {
    let resolver = Arc::new(DeclarativeResolver::new(declarations, Arc::new(registry)));
    AspectContainer::new(resolver)
        .proxy(Thermostat {
            setpoint: 20.0,
            reads: 0,
        })
        .unwrap()
}

fn with_default(declarations: Declarations) -> Proxy<Thermostat> {
    proxied(create_default_registry(), declarations)
}

// ===========================================================================
// Registries
// ===========================================================================

#[test]
fn default_registry_has_all_builtins() {
    let registry = create_default_registry();
    assert_eq!(
        registry.list(),
        vec!["count", "override_result", "range_guard", "short_circuit", "trace"]
    );
    assert!(registry.method_aspect("trace").is_ok());
    assert!(registry.property_aspect("trace").is_ok());
    assert!(registry.property_aspect("range_guard").is_ok());
    assert!(registry.method_aspect("range_guard").is_err());
}

#[test]
fn scoped_registry_only_holds_allowed_kinds() {
    let registry = create_scoped_registry(&["trace", "range_guard", "bogus"]);
    assert_eq!(registry.list(), vec!["range_guard", "trace"]);
    assert!(matches!(
        registry.method_aspect("short_circuit"),
        Err(Error::UnknownAspect { .. })
    ));
}

// ===========================================================================
// range_guard
// ===========================================================================

fn guarded(min: f64, max: f64) -> Proxy<Thermostat> {
    with_default(Declarations::new().property(
        "Thermostat",
        "setpoint",
        Metadata::new("range_guard")
            .with_param("min", min)
            .with_param("max", max),
    ))
}

#[test]
fn range_guard_allows_in_range_writes() {
    let mut proxy = guarded(10.0, 30.0);
    assert_eq!(proxy.set("setpoint", 25.0).unwrap(), json!(25.0));
    assert_eq!(proxy.inner().setpoint, 25.0);
    // bounds are inclusive
    assert_eq!(proxy.set("setpoint", 30.0).unwrap(), json!(30.0));
    assert_eq!(proxy.set("setpoint", 10.0).unwrap(), json!(10.0));
}

#[test]
fn range_guard_rejects_out_of_range_with_current_value() {
    let mut proxy = guarded(10.0, 30.0);
    assert_eq!(proxy.set("setpoint", 31.0).unwrap(), json!(20.0));
    assert_eq!(proxy.set("setpoint", -4.0).unwrap(), json!(20.0));
    assert_eq!(proxy.inner().setpoint, 20.0);
}

#[test]
fn range_guard_leaves_reads_alone() {
    let mut proxy = guarded(10.0, 30.0);
    assert_eq!(proxy.get("setpoint").unwrap(), json!(20.0));
}

#[test]
fn range_guard_with_single_bound() {
    let mut proxy = with_default(Declarations::new().property(
        "Thermostat",
        "setpoint",
        Metadata::new("range_guard").with_param("min", 0),
    ));
    assert_eq!(proxy.set("setpoint", 1000.0).unwrap(), json!(1000.0));
    assert_eq!(proxy.set("setpoint", -1.0).unwrap(), json!(1000.0));
}

#[test]
fn range_guard_rejects_non_numeric_proposal() {
    let mut proxy = guarded(10.0, 30.0);
    let err = proxy.set("setpoint", "warm").unwrap_err();
    assert!(matches!(
        err.as_aspect_error(),
        Some(AspectError::InvalidArgument { .. })
    ));
    assert_eq!(proxy.inner().setpoint, 20.0);
}

#[test]
fn range_guard_rejects_non_numeric_bound() {
    let mut proxy = with_default(Declarations::new().property(
        "Thermostat",
        "setpoint",
        Metadata::new("range_guard").with_param("max", "high"),
    ));
    let err = proxy.set("setpoint", 12.0).unwrap_err();
    assert!(err.to_string().contains("'max' must be a number"));
}

// ===========================================================================
// short_circuit / override_result
// ===========================================================================

#[test]
fn short_circuit_skips_real_method() {
    let mut proxy = with_default(Declarations::new().method(
        "Thermostat",
        "read",
        Metadata::new("short_circuit").with_param("value", "cached"),
    ));
    assert_eq!(proxy.call("read", Arguments::new()).unwrap(), json!("cached"));
    assert_eq!(proxy.inner().reads, 0);
}

#[test]
fn short_circuit_without_value_returns_null() {
    let mut proxy = with_default(
        Declarations::new().method("Thermostat", "read", Metadata::new("short_circuit")),
    );
    assert_eq!(proxy.call("read", Arguments::new()).unwrap(), Value::Null);
}

#[test]
fn override_result_replaces_value_after_real_call() {
    let mut proxy = with_default(Declarations::new().method(
        "Thermostat",
        "read",
        Metadata::new("override_result").with_param("value", 99),
    ));
    assert_eq!(proxy.call("read", Arguments::new()).unwrap(), json!(99));
    assert_eq!(proxy.inner().reads, 1);
}

#[test]
fn override_result_halt_stops_outer_after_aspects() {
    // after runs innermost first: the halting override hides the outer one
    let mut proxy = with_default(
        Declarations::new()
            .method(
                "Thermostat",
                "read",
                Metadata::new("override_result").with_param("value", "outer"),
            )
            .method(
                "Thermostat",
                "read",
                Metadata::new("override_result")
                    .with_param("value", "inner")
                    .with_param("halt", true),
            ),
    );
    assert_eq!(proxy.call("read", Arguments::new()).unwrap(), json!("inner"));
}

#[test]
fn override_result_without_value_keeps_result() {
    let mut proxy = with_default(
        Declarations::new().method("Thermostat", "read", Metadata::new("override_result")),
    );
    assert_eq!(proxy.call("read", Arguments::new()).unwrap(), json!(20.0));
}

// ===========================================================================
// count / trace
// ===========================================================================

#[test]
fn count_tracks_methods_and_properties() {
    let counter = Arc::new(CountAspect::new());
    let mut registry = AspectRegistry::new();
    registry.register_shared("count", counter.clone());
    let mut proxy = proxied(
        registry,
        Declarations::new()
            .method("Thermostat", "read", Metadata::new("count"))
            .property("Thermostat", "setpoint", Metadata::new("count")),
    );

    proxy.call("read", Arguments::new()).unwrap();
    proxy.call("read", Arguments::new()).unwrap();
    proxy.get("setpoint").unwrap();
    proxy.set("setpoint", 5.0).unwrap();
    assert!(proxy.exists("setpoint").unwrap());
    assert_eq!(counter.count(), 5);

    counter.reset();
    assert_eq!(counter.count(), 0);
}

#[test]
fn count_handle_registered_per_side() {
    let methods = Arc::new(CountAspect::new());
    let properties = Arc::new(CountAspect::new());
    let mut registry = AspectRegistry::new();
    registry.register_method_arc("count", methods.clone());
    registry.register_property_arc("count", properties.clone());
    let mut proxy = proxied(
        registry,
        Declarations::new()
            .method("Thermostat", "read", Metadata::new("count"))
            .property("Thermostat", "setpoint", Metadata::new("count")),
    );

    proxy.call("read", Arguments::new()).unwrap();
    proxy.get("setpoint").unwrap();
    proxy.get("setpoint").unwrap();
    assert_eq!(methods.count(), 1);
    assert_eq!(properties.count(), 2);
}

#[test]
fn trace_never_changes_results() {
    let mut proxy = with_default(
        Declarations::new()
            .method(
                "Thermostat",
                "read",
                Metadata::new("trace").with_param("label", "thermo"),
            )
            .property("Thermostat", "setpoint", Metadata::new("trace")),
    );
    assert_eq!(proxy.call("read", Arguments::new()).unwrap(), json!(20.0));
    assert_eq!(proxy.set("setpoint", 22.5).unwrap(), json!(22.5));
    assert_eq!(proxy.access(AccessKind::Read, "setpoint", None).unwrap(), json!(22.5));
    assert_eq!(proxy.inner().reads, 1);
}

#[test]
fn guard_and_trace_compose() {
    let mut proxy = with_default(
        Declarations::new()
            .property("Thermostat", "setpoint", Metadata::new("trace"))
            .property(
                "Thermostat",
                "setpoint",
                Metadata::new("range_guard").with_param("max", 25),
            ),
    );
    assert_eq!(proxy.set("setpoint", 40.0).unwrap(), json!(20.0));
    assert_eq!(proxy.set("setpoint", 24.0).unwrap(), json!(24.0));
}
