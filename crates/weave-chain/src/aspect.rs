//! Aspect trait definitions
//!
//! Each aspect is a standalone unit keyed by a metadata kind. It declares
//! which phases it takes part in; the pipeline never calls a phase method
//! the aspect did not declare.

use weave_core::{
    AccessKind, AspectError, Invocation, JoinPoint, Metadata, Phase, PropertyAccess, Value,
};

/// `Ok(Some(v))` replaces the candidate result, `Ok(None)` keeps it.
pub type AspectResult = Result<Option<Value>, AspectError>;

/// Phases a method aspect takes part in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub before: bool,
    pub after: bool,
}

impl Capabilities {
    pub const NONE: Self = Self { before: false, after: false };
    pub const BEFORE: Self = Self { before: true, after: false };
    pub const AFTER: Self = Self { before: false, after: true };
    pub const BOTH: Self = Self { before: true, after: true };

    pub fn supports(&self, phase: Phase) -> bool {
        match phase {
            Phase::Before => self.before,
            Phase::After => self.after,
        }
    }
}

/// Behaviour woven around method calls.
pub trait MethodAspect: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    fn capabilities(&self) -> Capabilities;

    /// Runs before the real method. Only called when `capabilities().before`.
    fn before(&self, _metadata: &Metadata, _invocation: &Invocation<'_>) -> AspectResult {
        Ok(None)
    }

    /// Runs after the real method. Only called when `capabilities().after`.
    fn after(&self, _metadata: &Metadata, _invocation: &Invocation<'_>) -> AspectResult {
        Ok(None)
    }
}

/// Behaviour woven around property reads, writes, deletes and existence checks.
pub trait PropertyAspect: Send + Sync {
    fn name(&self) -> &str;

    /// Whether this aspect handles `kind` in `phase`.
    fn supports(&self, kind: AccessKind, phase: Phase) -> bool;

    fn before(&self, _metadata: &Metadata, _access: &PropertyAccess<'_>) -> AspectResult {
        Ok(None)
    }

    fn after(&self, _metadata: &Metadata, _access: &PropertyAccess<'_>) -> AspectResult {
        Ok(None)
    }
}

/// Glue between an aspect trait object and the context type it runs on.
pub trait Advice<C: JoinPoint> {
    fn advice_name(&self) -> &str;

    /// Whether the aspect takes part in the phase (and access kind) of `ctx`.
    fn accepts(&self, ctx: &C) -> bool;

    fn invoke(&self, metadata: &Metadata, ctx: &C) -> AspectResult;
}

impl<'a> Advice<Invocation<'a>> for dyn MethodAspect {
    fn advice_name(&self) -> &str {
        self.name()
    }

    fn accepts(&self, ctx: &Invocation<'a>) -> bool {
        self.capabilities().supports(ctx.phase())
    }

    fn invoke(&self, metadata: &Metadata, ctx: &Invocation<'a>) -> AspectResult {
        match ctx.phase() {
            Phase::Before => self.before(metadata, ctx),
            Phase::After => self.after(metadata, ctx),
        }
    }
}

impl<'a> Advice<PropertyAccess<'a>> for dyn PropertyAspect {
    fn advice_name(&self) -> &str {
        self.name()
    }

    fn accepts(&self, ctx: &PropertyAccess<'a>) -> bool {
        self.supports(ctx.kind(), ctx.phase())
    }

    fn invoke(&self, metadata: &Metadata, ctx: &PropertyAccess<'a>) -> AspectResult {
        match ctx.phase() {
            Phase::Before => self.before(metadata, ctx),
            Phase::After => self.after(metadata, ctx),
        }
    }
}
