//! Metadata/aspect pairs

use std::fmt;
use std::sync::Arc;

use weave_core::{AccessKind, Metadata, Phase};

use crate::aspect::{MethodAspect, PropertyAspect};

/// One resolved piece of metadata paired with the aspect that handles it.
pub struct Binding<A: ?Sized> {
    metadata: Arc<Metadata>,
    aspect: Arc<A>,
}

pub type MethodBinding = Binding<dyn MethodAspect>;
pub type PropertyBinding = Binding<dyn PropertyAspect>;

impl<A: ?Sized> Binding<A> {
    pub fn new(metadata: impl Into<Arc<Metadata>>, aspect: Arc<A>) -> Self {
        Self {
            metadata: metadata.into(),
            aspect,
        }
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn aspect(&self) -> &A {
        &self.aspect
    }
}

impl<A: ?Sized> Clone for Binding<A> {
    fn clone(&self) -> Self {
        Self {
            metadata: Arc::clone(&self.metadata),
            aspect: Arc::clone(&self.aspect),
        }
    }
}

impl<A: ?Sized> fmt::Debug for Binding<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("kind", &self.metadata.kind)
            .finish_non_exhaustive()
    }
}

impl MethodBinding {
    pub fn supports(&self, phase: Phase) -> bool {
        self.aspect.capabilities().supports(phase)
    }
}

impl PropertyBinding {
    pub fn supports(&self, kind: AccessKind, phase: Phase) -> bool {
        self.aspect.supports(kind, phase)
    }
}
