use thiserror::Error;

/// Main error type for Graphroute
#[derive(Error, Debug)]
pub enum GraphrouteError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tabular source errors (malformed rows, bad encoding)
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A tabular source lacks required columns
    #[error("{path} missing columns: {}", missing.join(", "))]
    MissingColumns { path: String, missing: Vec<String> },

    /// Strict property parse errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Edge endpoint or lookup refers to an unknown node
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenient Result type using GraphrouteError
pub type Result<T> = std::result::Result<T, GraphrouteError>;
