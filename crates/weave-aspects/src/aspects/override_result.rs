//! Override result - replace a method's return value after it ran

use weave_chain::{AspectResult, Capabilities, MethodAspect};
use weave_core::{Invocation, Metadata};

/// After aspect. Params: `value` (replacement; absent keeps the result) and
/// `halt` (bool; stop the remaining after aspects).
#[derive(Debug, Default)]
pub struct OverrideResultAspect;

impl OverrideResultAspect {
    pub fn new() -> Self {
        Self
    }
}

impl MethodAspect for OverrideResultAspect {
    fn name(&self) -> &str {
        "override_result"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::AFTER
    }

    fn after(&self, metadata: &Metadata, invocation: &Invocation<'_>) -> AspectResult {
        if metadata.param("halt").and_then(|v| v.as_bool()).unwrap_or(false) {
            invocation.request_halt();
        }
        Ok(metadata.param("value").cloned())
    }
}
