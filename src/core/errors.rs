//! Shared error types for the application

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for rulemap operations
#[derive(Debug, Error)]
pub enum Error {
    /// File system related errors
    #[error("File system error: {message}")]
    FileSystem {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Parsing errors
    #[error("Parse error in {file}:{line}: {message}")]
    Parse {
        file: PathBuf,
        line: usize,
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a file system error with path context
    pub fn file_system(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: Some(path.into()),
            source: None,
        }
    }

    /// Create a file system error wrapping an underlying IO error
    pub fn file_system_with_source(
        message: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: Some(path.into()),
            source: Some(source),
        }
    }

    /// Create a parse error with source location
    pub fn parse(file: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_system_error_display() {
        let err = Error::file_system("cannot write to rules.xml", "rules.xml");
        assert_eq!(err.to_string(), "File system error: cannot write to rules.xml");
    }

    #[test]
    fn test_parse_error_display_includes_location() {
        let err = Error::parse("src/handlers.rs", 42, "unexpected token");
        assert_eq!(
            err.to_string(),
            "Parse error in src/handlers.rs:42: unexpected token"
        );
    }

    #[test]
    fn test_configuration_error_display() {
        let err = Error::configuration("saveRulesTo option must be specified");
        assert!(err.to_string().starts_with("Configuration error:"));
    }

    #[test]
    fn test_io_error_is_transparent() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert_eq!(err.to_string(), "gone");
    }
}
