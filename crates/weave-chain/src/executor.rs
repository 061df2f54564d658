//! Chain executor
//!
//! Drives one phase of one call: every binding is invoked once, in order,
//! and the halt cell is checked after each step. The before phase walks the
//! binding list front to back; the after phase walks the same list back to
//! front, so the innermost aspect sees the real result first.

use tracing::{debug, warn};
use weave_core::{Error, JoinPoint, Phase, Result, Value};

use crate::aspect::Advice;
use crate::binding::Binding;

/// Result of running one chain.
#[derive(Clone, Debug, PartialEq)]
pub struct ChainOutcome {
    /// Last candidate result, or the context's seed value if nothing replaced it.
    pub result: Value,
    /// Whether an aspect requested a halt in this phase.
    pub halted: bool,
    /// Number of aspects that ran.
    pub steps: usize,
}

/// Walks a binding list in the order required by a phase.
pub struct ChainCursor<'b, A: ?Sized> {
    bindings: &'b [Binding<A>],
    phase: Phase,
    position: usize,
}

impl<'b, A: ?Sized> ChainCursor<'b, A> {
    pub fn new(bindings: &'b [Binding<A>], phase: Phase) -> Self {
        Self {
            bindings,
            phase,
            position: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.bindings.len() - self.position
    }
}

impl<'b, A: ?Sized> Iterator for ChainCursor<'b, A> {
    type Item = &'b Binding<A>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.bindings.len() {
            return None;
        }
        let index = match self.phase {
            Phase::Before => self.position,
            Phase::After => self.bindings.len() - 1 - self.position,
        };
        self.position += 1;
        self.bindings.get(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

/// Run `bindings` against `ctx` for the context's phase.
///
/// Aspect failures are returned unchanged and stop the chain. A binding
/// whose aspect does not take part in this phase is a contract violation:
/// bindings must be filtered by capability before they reach the executor.
pub fn execute<A, C>(bindings: &[Binding<A>], ctx: &C) -> Result<ChainOutcome>
where
    A: Advice<C> + ?Sized,
    C: JoinPoint,
{
    let phase = ctx.phase();
    let mut steps = 0;

    for binding in ChainCursor::new(bindings, phase) {
        let aspect = binding.aspect();
        if !aspect.accepts(ctx) {
            return Err(Error::ContractViolation(format!(
                "aspect '{}' bound to '{}' does not support the {} phase",
                aspect.advice_name(),
                ctx.subject(),
                phase
            )));
        }

        debug!(
            aspect = aspect.advice_name(),
            kind = binding.metadata().kind(),
            %phase,
            subject = ctx.subject(),
            call_id = %ctx.call_id(),
            "running aspect"
        );

        match aspect.invoke(binding.metadata(), ctx) {
            Ok(Some(value)) => ctx.set_result(value),
            Ok(None) => {}
            Err(e) => {
                warn!(
                    aspect = aspect.advice_name(),
                    %phase,
                    subject = ctx.subject(),
                    call_id = %ctx.call_id(),
                    "aspect failed: {}",
                    e
                );
                return Err(e.into());
            }
        }
        steps += 1;

        if ctx.is_halted() {
            debug!(
                aspect = aspect.advice_name(),
                %phase,
                subject = ctx.subject(),
                call_id = %ctx.call_id(),
                "chain halted"
            );
            return Ok(ChainOutcome {
                result: ctx.result(),
                halted: true,
                steps,
            });
        }
    }

    Ok(ChainOutcome {
        result: ctx.result(),
        halted: false,
        steps,
    })
}
