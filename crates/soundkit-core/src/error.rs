use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Must specify {var}: {}", .allowed.join(" | "))]
    MissingVariable {
        var: String,
        allowed: Vec<&'static str>,
    },

    #[error("Invalid {var}: {value}. Must be one of: {}", .allowed.join(" | "))]
    InvalidVariable {
        var: String,
        value: String,
        allowed: Vec<&'static str>,
    },

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to parse {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("Invalid entry '{key}': {reason}")]
    InvalidEntry { key: String, reason: String },

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Command failed: {0}")]
    Command(String),
}

impl Error {
    /// Wrap an I/O error, mapping a missing file to [`Error::NotFound`]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound(path)
        } else {
            Error::Io { path, source }
        }
    }

    pub fn parse(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::Parse {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error comes from invalid or missing environment configuration
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::MissingVariable { .. } | Error::InvalidVariable { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
