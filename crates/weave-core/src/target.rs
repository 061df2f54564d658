//! The contract an intercepted object exposes to the pipeline.

use crate::error::{Error, Result};
use crate::types::{Arguments, Value};

/// An object whose methods and properties can be routed through aspect chains.
///
/// Implementations dispatch by name. Names a target does not know should be
/// reported with [`Error::UnknownMember`] / [`Error::UnknownProperty`]; the
/// default property methods treat every property as unknown.
pub trait Target {
    /// Type name used to look up declarations and interceptor tables.
    fn type_name(&self) -> &str;

    /// Invoke a method.
    fn call(&mut self, member: &str, args: &Arguments) -> Result<Value>;

    /// Read a property. `None` when the property is not set.
    fn get_property(&self, _name: &str) -> Option<Value> {
        None
    }

    fn set_property(&mut self, name: &str, _value: Value) -> Result<()> {
        Err(Error::unknown_property(self.type_name(), name))
    }

    fn delete_property(&mut self, name: &str) -> Result<()> {
        Err(Error::unknown_property(self.type_name(), name))
    }

    fn has_property(&self, name: &str) -> bool {
        self.get_property(name).is_some()
    }
}
