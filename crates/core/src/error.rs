use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur while converting a BUILD tree
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Tree-sitter error: {0}")]
    TreeSitterError(String),

    #[error("{rule}() is missing required argument '{argument}'")]
    MissingRequiredArgument { rule: String, argument: String },

    #[error("name '{0}' is not defined")]
    NameError(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Type error: {0}")]
    TypeError(String),

    #[error("Unsupported syntax: {0}")]
    UnsupportedSyntax(String),

    #[error("Load cycle through {}", .0.display())]
    LoadCycle(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Directory walk error: {0}")]
    WalkError(#[from] walkdir::Error),

    #[error("{}:{line}: {source}", .file.display())]
    Located {
        file: PathBuf,
        line: usize,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attach a file and line to this error. Already located errors are kept as is.
    pub fn at(self, file: &Path, line: usize) -> Self {
        match self {
            located @ Error::Located { .. } => located,
            other => Error::Located {
                file: file.to_path_buf(),
                line,
                source: Box::new(other),
            },
        }
    }

    /// The underlying fault with every location layer removed
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Located { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub(crate) fn missing(rule: &str, argument: &str) -> Self {
        Error::MissingRequiredArgument {
            rule: rule.to_string(),
            argument: argument.to_string(),
        }
    }
}

/// Result type alias for conversion operations
pub type Result<T> = std::result::Result<T, Error>;
