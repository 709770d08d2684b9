/// Convenience result type used across the crate.
pub type PlasmaResult<T> = Result<T, PlasmaError>;

/// Top-level error taxonomy used by catalog, assembler and pipeline APIs.
///
/// Configuration and assembly errors are recoverable at the orchestration level: the caller
/// rejects the change and keeps its last good program.
#[derive(thiserror::Error, Debug)]
pub enum PlasmaError {
    /// Unknown function or parameter, or a bound value outside its declared range.
    #[error("configuration error: {0}")]
    Config(String),

    /// A fragment, placeholder or directive could not be resolved into program text.
    #[error("assembly error: {0}")]
    Assembly(String),

    /// A catalog document violates the parameter schema.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlasmaError {
    /// Build a [`PlasmaError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`PlasmaError::Assembly`] value.
    pub fn assembly(msg: impl Into<String>) -> Self {
        Self::Assembly(msg.into())
    }

    /// Build a [`PlasmaError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PlasmaError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Prefix the message of a string-carrying variant, keeping its class.
    pub fn context(self, prefix: impl std::fmt::Display) -> Self {
        match self {
            Self::Config(m) => Self::Config(format!("{prefix}: {m}")),
            Self::Assembly(m) => Self::Assembly(format!("{prefix}: {m}")),
            Self::Validation(m) => Self::Validation(format!("{prefix}: {m}")),
            Self::Serde(m) => Self::Serde(format!("{prefix}: {m}")),
            Self::Other(e) => Self::Other(e.context(prefix.to_string())),
        }
    }

    /// True for the error classes that leave the previous program usable.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Assembly(_))
    }
}

impl From<serde_json::Error> for PlasmaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
