//! Count aspect - count intercepted calls and accesses

use std::sync::atomic::{AtomicU64, Ordering};

use weave_chain::{AspectResult, Capabilities, MethodAspect, PropertyAspect};
use weave_core::{AccessKind, Invocation, Metadata, Phase, PropertyAccess};

/// Counts before-phase entries. Shared across calls and threads, so the
/// counter is atomic.
#[derive(Debug, Default)]
pub struct CountAspect {
    calls: AtomicU64,
}

impl CountAspect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.calls.store(0, Ordering::Relaxed);
    }
}

impl MethodAspect for CountAspect {
    fn name(&self) -> &str {
        "count"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::BEFORE
    }

    fn before(&self, _metadata: &Metadata, _invocation: &Invocation<'_>) -> AspectResult {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(None)
    }
}

impl PropertyAspect for CountAspect {
    fn name(&self) -> &str {
        "count"
    }

    fn supports(&self, _kind: AccessKind, phase: Phase) -> bool {
        phase == Phase::Before
    }

    fn before(&self, _metadata: &Metadata, _access: &PropertyAccess<'_>) -> AspectResult {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(None)
    }
}
