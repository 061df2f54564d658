//! Trace aspect - log every intercepted call and property access

use tracing::info;
use weave_chain::{AspectResult, Capabilities, MethodAspect, PropertyAspect};
use weave_core::{AccessKind, Invocation, Metadata, Phase, PropertyAccess};

/// Logs entry and exit of whatever it is bound to. Never changes the result.
///
/// An optional `label` param is included in every log line.
#[derive(Debug, Default)]
pub struct TraceAspect;

impl TraceAspect {
    pub fn new() -> Self {
        Self
    }

    fn label(metadata: &Metadata) -> &str {
        metadata
            .param("label")
            .and_then(|v| v.as_str())
            .unwrap_or("trace")
    }
}

impl MethodAspect for TraceAspect {
    fn name(&self) -> &str {
        "trace"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::BOTH
    }

    fn before(&self, metadata: &Metadata, invocation: &Invocation<'_>) -> AspectResult {
        let args: Vec<_> = invocation.arguments().values().collect();
        info!(
            label = Self::label(metadata),
            target = invocation.target().type_name(),
            member = invocation.member_name(),
            call_id = %invocation.call_id(),
            "enter {:?}",
            args
        );
        Ok(None)
    }

    fn after(&self, metadata: &Metadata, invocation: &Invocation<'_>) -> AspectResult {
        info!(
            label = Self::label(metadata),
            target = invocation.target().type_name(),
            member = invocation.member_name(),
            call_id = %invocation.call_id(),
            halted_before = invocation.halted_before(),
            "exit -> {}",
            invocation.result()
        );
        Ok(None)
    }
}

impl PropertyAspect for TraceAspect {
    fn name(&self) -> &str {
        "trace"
    }

    fn supports(&self, _kind: AccessKind, _phase: Phase) -> bool {
        true
    }

    fn before(&self, metadata: &Metadata, access: &PropertyAccess<'_>) -> AspectResult {
        info!(
            label = Self::label(metadata),
            target = access.target().type_name(),
            property = access.property_name(),
            kind = %access.kind(),
            call_id = %access.call_id(),
            "access {:?}",
            access.proposed_value()
        );
        Ok(None)
    }

    fn after(&self, metadata: &Metadata, access: &PropertyAccess<'_>) -> AspectResult {
        info!(
            label = Self::label(metadata),
            target = access.target().type_name(),
            property = access.property_name(),
            kind = %access.kind(),
            call_id = %access.call_id(),
            "accessed -> {}",
            access.result()
        );
        Ok(None)
    }
}
