//! Interceptor table
//!
//! Built once per target type. For every intercepted method it keeps the
//! before-capable and after-capable bindings, each in declaration order; for
//! every intercepted property it keeps the same split per access kind.

use std::collections::HashMap;

use weave_chain::{MethodBinding, PropertyBinding};
use weave_core::{AccessKind, Phase, Result};

use crate::resolver::MetadataResolver;

#[derive(Debug, Default)]
struct MethodChains {
    before: Vec<MethodBinding>,
    after: Vec<MethodBinding>,
}

#[derive(Debug, Default)]
struct PropertyChains {
    before: [Vec<PropertyBinding>; 4],
    after: [Vec<PropertyBinding>; 4],
}

/// Member name to ordered, capability-filtered bindings.
#[derive(Debug)]
pub struct InterceptorTable {
    type_name: String,
    methods: HashMap<String, MethodChains>,
    properties: HashMap<String, PropertyChains>,
}

impl InterceptorTable {
    /// A table that intercepts nothing.
    pub fn empty(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            methods: HashMap::new(),
            properties: HashMap::new(),
        }
    }

    pub fn builder(type_name: impl Into<String>) -> InterceptorTableBuilder {
        InterceptorTableBuilder {
            table: Self::empty(type_name),
        }
    }

    /// Build the table for every member `resolver` declares on `type_name`.
    ///
    /// Resolution failures (e.g. metadata with no registered aspect) are
    /// returned to the caller; no partial table is produced.
    pub fn from_resolver(resolver: &dyn MetadataResolver, type_name: &str) -> Result<Self> {
        let mut builder = Self::builder(type_name);
        let Some(members) = resolver.declared(type_name) else {
            return Ok(builder.build());
        };

        for method in &members.methods {
            let bindings = resolver.resolve_method(type_name, method)?;
            builder = builder.method(method.clone(), bindings);
        }
        for property in &members.properties {
            let bindings = resolver.resolve_property(type_name, property)?;
            builder = builder.property(property.clone(), bindings);
        }

        Ok(builder.build())
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Bindings for one phase of `member`, in declaration order. Empty when
    /// the member is not intercepted in that phase.
    pub fn method_chain(&self, member: &str, phase: Phase) -> &[MethodBinding] {
        match self.methods.get(member) {
            Some(chains) => match phase {
                Phase::Before => &chains.before,
                Phase::After => &chains.after,
            },
            None => &[],
        }
    }

    pub fn property_chain(&self, property: &str, kind: AccessKind, phase: Phase) -> &[PropertyBinding] {
        match self.properties.get(property) {
            Some(chains) => match phase {
                Phase::Before => &chains.before[kind.index()],
                Phase::After => &chains.after[kind.index()],
            },
            None => &[],
        }
    }

    pub fn intercepts_method(&self, member: &str) -> bool {
        self.methods.contains_key(member)
    }

    pub fn intercepts_property(&self, property: &str) -> bool {
        self.properties.contains_key(property)
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty() && self.properties.is_empty()
    }
}

pub struct InterceptorTableBuilder {
    table: InterceptorTable,
}

impl InterceptorTableBuilder {
    /// Add bindings for a method. Bindings whose aspect supports neither
    /// phase are dropped; an empty result leaves the method unintercepted.
    pub fn method(mut self, member: impl Into<String>, bindings: Vec<MethodBinding>) -> Self {
        let chains = MethodChains {
            before: bindings.iter().filter(|b| b.supports(Phase::Before)).cloned().collect(),
            after: bindings.iter().filter(|b| b.supports(Phase::After)).cloned().collect(),
        };
        if !chains.before.is_empty() || !chains.after.is_empty() {
            self.table.methods.insert(member.into(), chains);
        }
        self
    }

    pub fn property(mut self, property: impl Into<String>, bindings: Vec<PropertyBinding>) -> Self {
        let mut chains = PropertyChains::default();
        for kind in AccessKind::ALL {
            chains.before[kind.index()] = bindings
                .iter()
                .filter(|b| b.supports(kind, Phase::Before))
                .cloned()
                .collect();
            chains.after[kind.index()] = bindings
                .iter()
                .filter(|b| b.supports(kind, Phase::After))
                .cloned()
                .collect();
        }
        let any = chains.before.iter().chain(chains.after.iter()).any(|c| !c.is_empty());
        if any {
            self.table.properties.insert(property.into(), chains);
        }
        self
    }

    pub fn build(self) -> InterceptorTable {
        self.table
    }
}
