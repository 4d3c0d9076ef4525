/// Centralized error types for pydigest using thiserror
///
/// Extraction failures are fatal for the file they occur in; the aggregator
/// decides whether a failed file aborts the run or is skipped and reported.
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for a digest run
#[derive(Error, Debug)]
pub enum DigestError {
    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("File selection error: {0}")]
    Walk(#[from] WalkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Notebook error: {0}")]
    Notebook(#[from] NotebookError),

    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while parsing a source file or rendering its definitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Failed to load Python grammar: {0}")]
    Grammar(String),

    #[error("Syntax error in {file} at line {line}, column {column}")]
    Parse {
        file: String,
        line: usize,
        column: usize,
    },

    #[error("Cannot render {node}: {reason}")]
    Render { node: String, reason: String },
}

impl ExtractError {
    pub(crate) fn render(node: impl Into<String>, reason: impl Into<String>) -> Self {
        ExtractError::Render {
            node: node.into(),
            reason: reason.into(),
        }
    }

    /// Attach the file name to a parse failure raised before the file was known
    pub(crate) fn in_file(self, file: &str) -> Self {
        match self {
            ExtractError::Parse { line, column, .. } => ExtractError::Parse {
                file: file.to_string(),
                line,
                column,
            },
            other => other,
        }
    }
}

/// Errors related to selecting input files
#[derive(Error, Debug)]
pub enum WalkError {
    #[error("Root directory does not exist: {0}")]
    RootNotFound(String),

    #[error("Root path is not a directory: {0}")]
    NotADirectory(String),

    #[error("Failed to walk directory: {0}")]
    WalkFailed(String),

    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration file: {0}")]
    LoadFailed(String),

    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
}

/// Errors related to notebook output
#[derive(Error, Debug)]
pub enum NotebookError {
    #[error("Failed to serialize notebook: {0}")]
    Serialize(String),

    #[error("Failed to write notebook to '{path}': {reason}")]
    Write { path: String, reason: String },
}

impl DigestError {
    /// Whether the error comes from bad input (source or configuration) rather than the system
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            DigestError::Extract(ExtractError::Parse { .. })
                | DigestError::Config(ConfigError::InvalidValue { .. })
                | DigestError::Walk(WalkError::InvalidPattern { .. })
        )
    }
}
