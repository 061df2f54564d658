//! Value-holder proxy
//!
//! [`Proxy`] owns a target and forwards every method call and property
//! operation through the interceptor table for the target's type.

use std::sync::Arc;

use tracing::debug;
use weave_core::{AccessKind, AfterHaltPolicy, Arguments, Error, Result, Target, Value};

use crate::hooks::{self, CallFrame};
use crate::table::InterceptorTable;

pub struct Proxy<T: Target> {
    inner: T,
    table: Arc<InterceptorTable>,
    after_halt: AfterHaltPolicy,
}

impl<T: Target> Proxy<T> {
    pub fn new(inner: T, table: Arc<InterceptorTable>) -> Self {
        Self {
            inner,
            table,
            after_halt: AfterHaltPolicy::default(),
        }
    }

    pub fn with_after_halt(mut self, policy: AfterHaltPolicy) -> Self {
        self.after_halt = policy;
        self
    }

    /// Call `member` through its before and after chains.
    ///
    /// A before-phase halt skips the real method. Whether the after chain
    /// still runs in that case is governed by [`AfterHaltPolicy`].
    pub fn call(&mut self, member: &str, args: Arguments) -> Result<Value> {
        let frame = CallFrame::new();

        let before = hooks::on_before(&self.table, &self.inner, member, &args, &frame)?;
        let result = if before.halted {
            debug!(member, call_id = %frame.id, "before chain halted, skipping real call");
            if self.after_halt == AfterHaltPolicy::Skip {
                return Ok(before.result);
            }
            before.result
        } else {
            self.inner.call(member, &args)?
        };

        let after = hooks::on_after(&self.table, &self.inner, member, &args, result, &frame)?;
        Ok(after.result)
    }

    /// Uniform property dispatch.
    ///
    /// `value` is required for [`AccessKind::Write`] and ignored otherwise.
    /// Results: `Read` yields the value (`Null` when unset), `Write` the
    /// assigned value, `Delete` `Null`, `Exists` a boolean.
    pub fn access(&mut self, kind: AccessKind, name: &str, value: Option<Value>) -> Result<Value> {
        let proposed = match kind {
            AccessKind::Write => Some(value.ok_or_else(|| {
                Error::ContractViolation(format!("write to '{}' without a value", name))
            })?),
            _ => None,
        };
        let frame = CallFrame::new();

        let before = hooks::on_property_before(
            &self.table,
            &self.inner,
            kind,
            name,
            proposed.as_ref(),
            &frame,
        )?;
        let result = if before.halted {
            debug!(property = name, %kind, call_id = %frame.id, "before chain halted, skipping real access");
            if self.after_halt == AfterHaltPolicy::Skip {
                return Ok(before.result);
            }
            before.result
        } else {
            self.perform(kind, name, proposed.as_ref())?
        };

        let after = hooks::on_property_after(
            &self.table,
            &self.inner,
            kind,
            name,
            proposed.as_ref(),
            result,
            &frame,
        )?;
        Ok(after.result)
    }

    pub fn get(&mut self, name: &str) -> Result<Value> {
        self.access(AccessKind::Read, name, None)
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<Value> {
        self.access(AccessKind::Write, name, Some(value.into()))
    }

    pub fn delete(&mut self, name: &str) -> Result<Value> {
        self.access(AccessKind::Delete, name, None)
    }

    /// Existence check. An aspect substituting a non-boolean result counts
    /// as "exists" when the value is anything but `Null` or `false`.
    pub fn exists(&mut self, name: &str) -> Result<bool> {
        let value = self.access(AccessKind::Exists, name, None)?;
        Ok(match value {
            Value::Bool(b) => b,
            Value::Null => false,
            _ => true,
        })
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }

    pub fn table(&self) -> &Arc<InterceptorTable> {
        &self.table
    }

    fn perform(&mut self, kind: AccessKind, name: &str, proposed: Option<&Value>) -> Result<Value> {
        match kind {
            AccessKind::Read => Ok(self.inner.get_property(name).unwrap_or(Value::Null)),
            AccessKind::Write => {
                let value = proposed.cloned().unwrap_or(Value::Null);
                self.inner.set_property(name, value.clone())?;
                Ok(value)
            }
            AccessKind::Delete => {
                self.inner.delete_property(name)?;
                Ok(Value::Null)
            }
            AccessKind::Exists => Ok(Value::Bool(self.inner.has_property(name))),
        }
    }
}
