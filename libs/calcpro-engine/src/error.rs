//! Error types for calcpro-engine

use thiserror::Error;

/// Calculation errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CalcError {
    /// Malformed expression syntax (mismatched parentheses, invalid tokens)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Expression parsed but produced a non-finite value
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// Function invoked outside its valid input domain
    #[error("{0}")]
    Domain(String),

    /// Result or argument exceeds a supported bound
    #[error("{0}")]
    Range(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("History error: {0}")]
    History(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Error category, for callers that branch on the kind of failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Evaluation,
    Domain,
    Range,
    InvalidInput,
    Conversion,
    History,
    Storage,
}

impl CalcError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    pub fn domain(msg: impl Into<String>) -> Self {
        Self::Domain(msg.into())
    }

    pub fn range(msg: impl Into<String>) -> Self {
        Self::Range(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn conversion(msg: impl Into<String>) -> Self {
        Self::Conversion(msg.into())
    }

    pub fn history(msg: impl Into<String>) -> Self {
        Self::History(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse(_) => ErrorKind::Parse,
            Self::Evaluation(_) => ErrorKind::Evaluation,
            Self::Domain(_) => ErrorKind::Domain,
            Self::Range(_) => ErrorKind::Range,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Conversion(_) => ErrorKind::Conversion,
            Self::History(_) => ErrorKind::History,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Title of the user-facing notification for this failure
    pub fn title(&self) -> &'static str {
        match self {
            Self::Parse(_) | Self::Evaluation(_) => "Calculation Error",
            Self::Domain(_) | Self::Range(_) => "Function Error",
            Self::InvalidInput(_) => "Invalid Input",
            Self::Conversion(_) => "Conversion Error",
            Self::History(_) => "No History",
            Self::Storage(_) => "Storage Error",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<std::io::Error> for CalcError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
