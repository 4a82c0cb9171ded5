use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapperError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Invalid point syntax: {specifier} ({reason})")]
    InvalidPointSyntax { specifier: String, reason: String },

    #[error("Invalid point: {specifier} ({message})")]
    InvalidPoint { specifier: String, message: String },

    #[error("Operation {operation} is invalid: {message}")]
    InvalidOperation { operation: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Coarse classification used for control decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    InvalidPointSyntax,
    InvalidPoint,
    InvalidOperation,
    Config,
    Io,
}

impl MapperError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn invalid_operation(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::InvalidPointSyntax { .. } => ErrorKind::InvalidPointSyntax,
            Self::InvalidPoint { .. } => ErrorKind::InvalidPoint,
            Self::InvalidOperation { .. } => ErrorKind::InvalidOperation,
            Self::ConfigError { .. } => ErrorKind::Config,
            Self::IoError(_) | Self::SerializationError(_) => ErrorKind::Io,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidPointSyntax { specifier, .. } => {
                format!("'{}' is not a recognized point specifier", specifier)
            }
            Self::InvalidPoint { specifier, message } => {
                format!("'{}' does not name an existing member: {}", specifier, message)
            }
            Self::InvalidOperation { message, .. } => format!("Mapping failed: {}", message),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.kind() {
            ErrorKind::InvalidPointSyntax => {
                "Use one of #Class::$property, #Class::method(), #Class::method()::$parameter, ~Class::$property or Class.method().$parameter"
            }
            ErrorKind::InvalidPoint => "Check that the class is registered and declares the member",
            ErrorKind::InvalidOperation => {
                "Check that every required parameter is routed or has a default value"
            }
            ErrorKind::InvalidArgument => "Check that the points belong to the mapped classes",
            ErrorKind::Config => "Check the configuration file syntax and values",
            ErrorKind::Io => "Check that the input files exist and are readable",
        }
    }
}

/// Failure reported by an [`Object`](crate::domain::ports::Object) member hook.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemberError {
    #[error("{class}::{member} is not defined")]
    Undefined { class: String, member: String },

    #[error("{class} does not support overloaded {capability}")]
    Unsupported { class: String, capability: String },

    #[error("{class}::{member} rejected the call: {reason}")]
    Rejected {
        class: String,
        member: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, MapperError>;
