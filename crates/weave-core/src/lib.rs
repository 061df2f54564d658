//! Weave Core - call contexts, target contract, errors and configuration

pub mod config;
pub mod context;
pub mod error;
pub mod target;
pub mod types;

pub use config::{LoggingConfig, PipelineConfig, WeaveConfig};
pub use context::{HaltCell, Invocation, JoinPoint, PropertyAccess};
pub use error::{AspectError, Error, Result};
pub use target::Target;
pub use types::*;
