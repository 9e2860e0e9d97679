use std::path::PathBuf;

use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
///
/// `Display` output is what the user sees through `notify_error`, so the
/// lookup failures read as complete sentences.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// A command needs an active file and none was given.
    #[error("Open a file first")]
    NoActiveFile,

    /// A counterpart, index or sibling file does not exist.
    #[error("Couldn't find {0}")]
    NotFound(String),

    /// More than one file qualifies and the command refuses to guess.
    #[error("Found multiple {0}")]
    Ambiguous(String),

    /// A file name lacks an extension, or the test suffix token is unusable.
    #[error("Malformed file name: {0}")]
    MalformedName(String),

    /// A configuration value other than the suffix is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The filesystem refused to create a file.
    #[error("Couldn't create {}: {source}", path.display())]
    CreateFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A search or exclude pattern failed to compile.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] globset::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert!(app_err.to_string().contains("file not found"));
    }

    #[test]
    fn not_found_display() {
        let err = AppError::NotFound("test file counterpart".into());
        assert_eq!(err.to_string(), "Couldn't find test file counterpart");
    }

    #[test]
    fn ambiguous_display() {
        let err = AppError::Ambiguous("index files".into());
        assert_eq!(err.to_string(), "Found multiple index files");
    }

    #[test]
    fn no_active_file_display() {
        assert_eq!(AppError::NoActiveFile.to_string(), "Open a file first");
    }

    #[test]
    fn create_failed_display_includes_path() {
        let err = AppError::CreateFailed {
            path: PathBuf::from("/ro/tests/a.test.ts"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Couldn't create /ro/tests/a.test.ts"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn glob_error_conversion() {
        let glob_err = globset::Glob::new("a[").unwrap_err();
        let app_err: AppError = glob_err.into();
        assert!(matches!(app_err, AppError::Glob(_)));
    }
}
