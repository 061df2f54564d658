//! Metadata resolution
//!
//! [`MetadataResolver`] answers "which aspects apply to this member, in which
//! order". [`DeclarativeResolver`] implements it from explicit per-type
//! [`Declarations`] and an [`AspectRegistry`].

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use weave_chain::{Binding, MethodBinding, PropertyBinding};
use weave_core::{Metadata, Result};

use crate::registry::AspectRegistry;

/// Members of a type that carry metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeclaredMembers {
    pub methods: Vec<String>,
    pub properties: Vec<String>,
}

impl DeclaredMembers {
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty() && self.properties.is_empty()
    }
}

/// Resolves metadata into ordered, aspect-bearing bindings.
///
/// Bindings must come back in declaration order. The before phase trusts
/// this order and the after phase reverses it.
pub trait MetadataResolver: Send + Sync {
    /// Members of `type_name` that carry metadata, or `None` if the type has
    /// no declarations at all.
    fn declared(&self, type_name: &str) -> Option<DeclaredMembers>;

    fn resolve_method(&self, type_name: &str, member: &str) -> Result<Vec<MethodBinding>>;

    fn resolve_property(&self, type_name: &str, property: &str) -> Result<Vec<PropertyBinding>>;
}

/// Metadata declared on one method or property.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemberDeclaration {
    pub name: String,
    #[serde(default)]
    pub aspects: Vec<Metadata>,
}

/// All declarations for one type.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    #[serde(default)]
    pub methods: Vec<MemberDeclaration>,
    #[serde(default)]
    pub properties: Vec<MemberDeclaration>,
}

impl TypeDeclaration {
    fn member<'d>(list: &'d [MemberDeclaration], name: &str) -> Option<&'d MemberDeclaration> {
        list.iter().find(|m| m.name == name)
    }

    fn push(list: &mut Vec<MemberDeclaration>, name: String, metadata: Metadata) {
        match list.iter_mut().find(|m| m.name == name) {
            Some(member) => member.aspects.push(metadata),
            None => list.push(MemberDeclaration {
                name,
                aspects: vec![metadata],
            }),
        }
    }
}

/// Explicit metadata declarations, keyed by type name.
#[derive(Clone, Debug, Default)]
pub struct Declarations {
    types: HashMap<String, TypeDeclaration>,
}

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `metadata` to a method's declarations.
    pub fn method(
        mut self,
        type_name: impl Into<String>,
        member: impl Into<String>,
        metadata: Metadata,
    ) -> Self {
        let decl = self.types.entry(type_name.into()).or_default();
        TypeDeclaration::push(&mut decl.methods, member.into(), metadata);
        self
    }

    /// Append `metadata` to a property's declarations.
    pub fn property(
        mut self,
        type_name: impl Into<String>,
        property: impl Into<String>,
        metadata: Metadata,
    ) -> Self {
        let decl = self.types.entry(type_name.into()).or_default();
        TypeDeclaration::push(&mut decl.properties, property.into(), metadata);
        self
    }

    /// Replace everything declared for `type_name`.
    pub fn insert_type(&mut self, type_name: impl Into<String>, declaration: TypeDeclaration) {
        self.types.insert(type_name.into(), declaration);
    }

    pub fn get(&self, type_name: &str) -> Option<&TypeDeclaration> {
        self.types.get(type_name)
    }
}

/// Resolver backed by [`Declarations`] and an [`AspectRegistry`].
pub struct DeclarativeResolver {
    declarations: Declarations,
    registry: Arc<AspectRegistry>,
}

impl DeclarativeResolver {
    pub fn new(declarations: Declarations, registry: Arc<AspectRegistry>) -> Self {
        Self {
            declarations,
            registry,
        }
    }

    pub fn registry(&self) -> &AspectRegistry {
        &self.registry
    }
}

impl MetadataResolver for DeclarativeResolver {
    fn declared(&self, type_name: &str) -> Option<DeclaredMembers> {
        let decl = self.declarations.get(type_name)?;
        Some(DeclaredMembers {
            methods: decl.methods.iter().map(|m| m.name.clone()).collect(),
            properties: decl.properties.iter().map(|p| p.name.clone()).collect(),
        })
    }

    fn resolve_method(&self, type_name: &str, member: &str) -> Result<Vec<MethodBinding>> {
        let Some(decl) = self
            .declarations
            .get(type_name)
            .and_then(|t| TypeDeclaration::member(&t.methods, member))
        else {
            return Ok(Vec::new());
        };

        decl.aspects
            .iter()
            .map(|metadata| {
                let aspect = self.registry.method_aspect(metadata.kind())?;
                Ok(Binding::new(metadata.clone(), aspect))
            })
            .collect()
    }

    fn resolve_property(&self, type_name: &str, property: &str) -> Result<Vec<PropertyBinding>> {
        let Some(decl) = self
            .declarations
            .get(type_name)
            .and_then(|t| TypeDeclaration::member(&t.properties, property))
        else {
            return Ok(Vec::new());
        };

        decl.aspects
            .iter()
            .map(|metadata| {
                let aspect = self.registry.property_aspect(metadata.kind())?;
                Ok(Binding::new(metadata.clone(), aspect))
            })
            .collect()
    }
}
