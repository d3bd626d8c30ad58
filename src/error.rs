use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// The species identifier is unknown to the attribute service.
    #[error("species '{identifier}' not found")]
    NotFound { identifier: String },

    /// Transient failure while talking to a data service.
    #[error("data for '{identifier}' is unavailable: {reason}")]
    Unavailable { identifier: String, reason: String },

    /// A type identifier has no entry in the relation table or service.
    #[error("unknown type '{0}'")]
    UnknownType(String),

    /// Two stat maps did not share the same key set.
    #[error(
        "stat keys differ (missing on left: [{}], missing on right: [{}])",
        .missing_left.join(", "),
        .missing_right.join(", ")
    )]
    KeyMismatch {
        missing_left: Vec<String>,
        missing_right: Vec<String>,
    },

    #[error("invalid attribute record: {0}")]
    InvalidRecord(String),

    #[error("invalid value '{value}' for {key}")]
    Config { key: String, value: String },

    #[error("failed to load type relation table: {0}")]
    TableLoad(String),
}

impl EngineError {
    pub fn not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            identifier: identifier.into(),
        }
    }

    pub fn unavailable(identifier: impl Into<String>, reason: impl ToString) -> Self {
        Self::Unavailable {
            identifier: identifier.into(),
            reason: reason.to_string(),
        }
    }

    /// Transient failures are the only ones a caller may reasonably retry or
    /// substitute with fallback data.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}
