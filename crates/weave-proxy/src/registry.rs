//! Aspect registry
//!
//! Maps a metadata kind to the aspect instance that handles it. One kind may
//! have a method aspect, a property aspect, or both.

use std::collections::HashMap;
use std::sync::Arc;

use weave_chain::{MethodAspect, PropertyAspect};
use weave_core::{Error, Result};

#[derive(Default)]
pub struct AspectRegistry {
    methods: HashMap<String, Arc<dyn MethodAspect>>,
    properties: HashMap<String, Arc<dyn PropertyAspect>>,
}

impl AspectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a method aspect. Replaces any existing one for `kind`.
    pub fn register_method(&mut self, kind: impl Into<String>, aspect: impl MethodAspect + 'static) {
        self.methods.insert(kind.into(), Arc::new(aspect));
    }

    pub fn register_property(
        &mut self,
        kind: impl Into<String>,
        aspect: impl PropertyAspect + 'static,
    ) {
        self.properties.insert(kind.into(), Arc::new(aspect));
    }

    /// Register one shared instance for both methods and properties.
    pub fn register_shared<A>(&mut self, kind: impl Into<String>, aspect: Arc<A>)
    where
        A: MethodAspect + PropertyAspect + 'static,
    {
        let kind = kind.into();
        self.register_method_arc(kind.clone(), aspect.clone());
        self.register_property_arc(kind, aspect);
    }

    /// Register an already-shared method aspect, e.g. one the caller keeps
    /// a handle to for inspection.
    pub fn register_method_arc(&mut self, kind: impl Into<String>, aspect: Arc<dyn MethodAspect>) {
        self.methods.insert(kind.into(), aspect);
    }

    pub fn register_property_arc(
        &mut self,
        kind: impl Into<String>,
        aspect: Arc<dyn PropertyAspect>,
    ) {
        self.properties.insert(kind.into(), aspect);
    }

    /// Remove every aspect registered under `kind`.
    pub fn remove(&mut self, kind: &str) -> bool {
        let m = self.methods.remove(kind).is_some();
        let p = self.properties.remove(kind).is_some();
        m || p
    }

    pub fn method_aspect(&self, kind: &str) -> Result<Arc<dyn MethodAspect>> {
        self.methods
            .get(kind)
            .cloned()
            .ok_or_else(|| Error::unknown_aspect(kind))
    }

    pub fn property_aspect(&self, kind: &str) -> Result<Arc<dyn PropertyAspect>> {
        self.properties
            .get(kind)
            .cloned()
            .ok_or_else(|| Error::unknown_aspect(kind))
    }

    /// Registered kinds, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self
            .methods
            .keys()
            .chain(self.properties.keys())
            .map(|s| s.as_str())
            .collect();
        kinds.sort_unstable();
        kinds.dedup();
        kinds
    }
}
