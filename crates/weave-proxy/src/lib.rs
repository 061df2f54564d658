//! Weave Proxy - interceptor tables, hooks and proxies
//!
//! Resolution happens once per target type ([`AspectContainer`],
//! [`InterceptorTable::from_resolver`]); every call then goes through the
//! hook functions in [`hooks`].

pub mod container;
pub mod hooks;
pub mod proxy;
pub mod registry;
pub mod resolver;
pub mod table;

pub use container::AspectContainer;
pub use hooks::{CallFrame, HookOutcome};
pub use proxy::Proxy;
pub use registry::AspectRegistry;
pub use resolver::{
    DeclarativeResolver, Declarations, DeclaredMembers, MemberDeclaration, MetadataResolver,
    TypeDeclaration,
};
pub use table::{InterceptorTable, InterceptorTableBuilder};
