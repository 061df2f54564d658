//! Weave Chain - aspect traits, bindings and the chain executor
//!
//! An aspect implements [`MethodAspect`] and/or [`PropertyAspect`]. A
//! [`Binding`] pairs it with the metadata that selected it, and
//! [`execute`] drives one phase of one call over an ordered binding list.

pub mod aspect;
pub mod binding;
pub mod executor;

pub use aspect::{Advice, AspectResult, Capabilities, MethodAspect, PropertyAspect};
pub use binding::{Binding, MethodBinding, PropertyBinding};
pub use executor::{execute, ChainCursor, ChainOutcome};
