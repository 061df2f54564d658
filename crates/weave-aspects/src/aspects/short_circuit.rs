//! Short circuit - skip the real method and return a fixed value

use weave_chain::{AspectResult, Capabilities, MethodAspect};
use weave_core::{Invocation, Metadata, Value};

/// Before aspect that always halts with `params.value` (`Null` if absent).
#[derive(Debug, Default)]
pub struct ShortCircuitAspect;

impl ShortCircuitAspect {
    pub fn new() -> Self {
        Self
    }
}

impl MethodAspect for ShortCircuitAspect {
    fn name(&self) -> &str {
        "short_circuit"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::BEFORE
    }

    fn before(&self, metadata: &Metadata, invocation: &Invocation<'_>) -> AspectResult {
        invocation.request_halt();
        Ok(Some(metadata.param("value").cloned().unwrap_or(Value::Null)))
    }
}
