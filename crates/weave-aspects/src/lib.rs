//! Weave Aspects - built-in aspect implementations
//!
//! Each aspect is a self-contained file in src/aspects/.
//! To add an aspect: create the file, implement MethodAspect and/or
//! PropertyAspect, register it below under its metadata kind.

pub mod aspects;

pub use aspects::count::CountAspect;
pub use aspects::override_result::OverrideResultAspect;
pub use aspects::range_guard::RangeGuardAspect;
pub use aspects::short_circuit::ShortCircuitAspect;
pub use aspects::trace::TraceAspect;

use std::sync::Arc;

use weave_proxy::AspectRegistry;

/// Create a registry with every built-in aspect under its default kind.
pub fn create_default_registry() -> AspectRegistry {
    let mut registry = AspectRegistry::new();

    // --- Observation ---
    registry.register_shared("trace", Arc::new(TraceAspect::new()));
    registry.register_shared("count", Arc::new(CountAspect::new()));

    // --- Guards and substitution ---
    registry.register_property("range_guard", RangeGuardAspect::new());
    registry.register_method("short_circuit", ShortCircuitAspect::new());
    registry.register_method("override_result", OverrideResultAspect::new());

    registry
}

/// Create a registry holding only the kinds named in `allowed`.
///
/// Metadata naming any other kind then fails resolution.
pub fn create_scoped_registry(allowed: &[&str]) -> AspectRegistry {
    let mut registry = AspectRegistry::new();

    for kind in allowed {
        match *kind {
            "trace" => registry.register_shared("trace", Arc::new(TraceAspect::new())),
            "count" => registry.register_shared("count", Arc::new(CountAspect::new())),
            "range_guard" => registry.register_property("range_guard", RangeGuardAspect::new()),
            "short_circuit" => registry.register_method("short_circuit", ShortCircuitAspect::new()),
            "override_result" => {
                registry.register_method("override_result", OverrideResultAspect::new())
            }
            _ => tracing::warn!("Unknown aspect kind in scope: {}", kind),
        }
    }

    registry
}
