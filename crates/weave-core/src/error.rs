//! Error types for Weave

use thiserror::Error;

/// Failure raised by an aspect callback.
///
/// The pipeline never inspects or rewrites these; they travel back to the
/// caller of the intercepted operation exactly as the aspect produced them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AspectError {
    #[error("aspect '{aspect}' failed: {message}")]
    Failed { aspect: String, message: String },

    #[error("aspect '{aspect}' received an invalid argument: {message}")]
    InvalidArgument { aspect: String, message: String },
}

impl AspectError {
    pub fn failed(aspect: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            aspect: aspect.into(),
            message: message.into(),
        }
    }

    pub fn invalid_argument(aspect: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            aspect: aspect.into(),
            message: message.into(),
        }
    }

    /// Name of the aspect that raised the error.
    pub fn aspect(&self) -> &str {
        match self {
            Self::Failed { aspect, .. } | Self::InvalidArgument { aspect, .. } => aspect,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("no aspect registered for metadata kind: {kind}")]
    UnknownAspect { kind: String },

    #[error(transparent)]
    Aspect(#[from] AspectError),

    #[error("contract violation: {0}")]
    ContractViolation(String),

    #[error("unknown member: {type_name}::{member}")]
    UnknownMember { type_name: String, member: String },

    #[error("unknown property: {type_name}.{property}")]
    UnknownProperty { type_name: String, property: String },

    #[error("target error: {0}")]
    Target(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn unknown_aspect(kind: impl Into<String>) -> Self {
        Self::UnknownAspect { kind: kind.into() }
    }

    pub fn unknown_member(type_name: impl Into<String>, member: impl Into<String>) -> Self {
        Self::UnknownMember {
            type_name: type_name.into(),
            member: member.into(),
        }
    }

    pub fn unknown_property(type_name: impl Into<String>, property: impl Into<String>) -> Self {
        Self::UnknownProperty {
            type_name: type_name.into(),
            property: property.into(),
        }
    }

    pub fn target(message: impl Into<String>) -> Self {
        Self::Target(message.into())
    }

    /// The aspect failure carried by this error, if any.
    pub fn as_aspect_error(&self) -> Option<&AspectError> {
        match self {
            Self::Aspect(e) => Some(e),
            _ => None,
        }
    }
}
