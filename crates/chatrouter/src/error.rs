use thiserror::Error;

/// Boxed error produced by integrator code (transformers, handlers, middleware)
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while registering commands or routing a message
#[derive(Error, Debug)]
pub enum RouterError {
    #[error("Unknown command: {name}")]
    UnknownCommand { name: String },

    #[error("No command name given after prefix")]
    BlankCommand,

    #[error("Missing argument {spec_index} for command '{command}'")]
    MissingArgument { command: String, spec_index: usize },

    #[error("Argument {spec_index} of command '{command}' could not be transformed: {cause}")]
    TransformFailure {
        command: String,
        spec_index: usize,
        #[source]
        cause: BoxError,
    },

    #[error("Permission denied for command '{command}': {reason}")]
    PermissionDenied { command: String, reason: String },

    #[error("Middleware rejected command '{command}': {cause}")]
    MiddlewareRejected {
        command: String,
        #[source]
        cause: BoxError,
    },

    #[error("Command '{command}' failed: {cause}")]
    HandlerError {
        command: String,
        #[source]
        cause: BoxError,
    },

    #[error("Invalid command definition: {reason}")]
    InvalidCommandDefinition { reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Regex error: {0}")]
    RegexError(#[from] regex::Error),
}

impl RouterError {
    pub(crate) fn invalid_definition(reason: impl Into<String>) -> Self {
        Self::InvalidCommandDefinition {
            reason: reason.into(),
        }
    }

    /// Name of the command the error belongs to, if one was resolved
    pub fn command(&self) -> Option<&str> {
        match self {
            Self::MissingArgument { command, .. }
            | Self::TransformFailure { command, .. }
            | Self::PermissionDenied { command, .. }
            | Self::MiddlewareRejected { command, .. }
            | Self::HandlerError { command, .. } => Some(command),
            _ => None,
        }
    }

    /// Index of the argument spec that failed, for argument errors
    pub fn spec_index(&self) -> Option<usize> {
        match self {
            Self::MissingArgument { spec_index, .. } | Self::TransformFailure { spec_index, .. } => {
                Some(*spec_index)
            }
            _ => None,
        }
    }
}

/// Errors returned by the built-in argument transformers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("'{0}' is not a valid integer")]
    InvalidInteger(String),

    #[error("'{0}' is not a valid unsigned integer")]
    InvalidUnsigned(String),

    #[error("'{0}' is not a valid number")]
    InvalidFloat(String),

    #[error("'{0}' is not a valid boolean")]
    InvalidBoolean(String),

    #[error("'{input}' is not a valid URL: {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("'{input}' must be one of: {}", .options.join(", "))]
    NotAChoice {
        input: String,
        options: Vec<String>,
    },
}

pub type Result<T> = std::result::Result<T, RouterError>;
