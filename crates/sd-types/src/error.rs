use crate::project::ProjectId;
use thiserror::Error;

/// Failure talking to the external smell analyzer
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Analyzer unreachable: {0}")]
    Transport(String),

    #[error("Analyzer returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed analyzer response: {0}")]
    Malformed(String),

    #[error("Analyzer timed out after {0}s")]
    Timeout(u64),
}

/// Error classes surfaced to callers of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Upstream,
    Conflict,
    NotFound,
    Forbidden,
    Internal,
}

/// Main error type for the engine
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Source archive is required")]
    MissingArchive,

    #[error("No analyzable source files found in {0}")]
    NoSourceFiles(String),

    #[error("Unreadable archive {name}: {reason}")]
    InvalidArchive { name: String, reason: String },

    #[error("Invalid smell at index {index}: {reason}")]
    InvalidSmell { index: usize, reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Analyzer error: {0}")]
    Analyzer(#[from] AnalyzerError),

    #[error("Project {project} changed concurrently: expected head v{expected}, found v{found}")]
    Conflict {
        project: ProjectId,
        expected: u32,
        found: u32,
    },

    #[error("Project already exists: {0}")]
    DuplicateProject(ProjectId),

    #[error("Project not found: {0}")]
    ProjectNotFound(ProjectId),

    #[error("User {user} may not access project {project}")]
    Forbidden { user: String, project: ProjectId },

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::MissingArchive
            | EngineError::NoSourceFiles(_)
            | EngineError::InvalidArchive { .. }
            | EngineError::InvalidSmell { .. }
            | EngineError::InvalidInput(_) => ErrorKind::Validation,
            EngineError::Analyzer(_) => ErrorKind::Upstream,
            EngineError::Conflict { .. } | EngineError::DuplicateProject(_) => ErrorKind::Conflict,
            EngineError::ProjectNotFound(_) => ErrorKind::NotFound,
            EngineError::Forbidden { .. } => ErrorKind::Forbidden,
            EngineError::StorageError(_)
            | EngineError::ConfigError(_)
            | EngineError::IoError(_)
            | EngineError::SerializationError(_) => ErrorKind::Internal,
        }
    }
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
