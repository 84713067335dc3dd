//! Core error types.

use thiserror::Error;

/// Errors raised by workspace and command execution primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Tenant identifier failed validation.
    #[error("Invalid tenant id: {0}")]
    InvalidTenant(String),

    /// Requested file does not exist in the tenant workspace.
    #[error("File not found: {0}")]
    NotFound(String),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(String),

    /// Process could not be spawned or awaited.
    #[error("Process error: {0}")]
    Process(String),

    /// Command exited with a non-zero code; carries the captured output.
    #[error("Command failed with exit code {code}")]
    NonZeroExit {
        /// Exit code reported by the process.
        code: i32,
        /// Combined stdout/stderr captured before exit.
        output: String,
    },

    /// Command exceeded its timeout.
    #[error("Command timed out after {0} seconds")]
    Timeout(u64),
}

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::InvalidTenant("bad/tenant".to_string());
        assert_eq!(err.to_string(), "Invalid tenant id: bad/tenant");

        let err = CoreError::NonZeroExit {
            code: 1,
            output: "plan failed".to_string(),
        };
        assert_eq!(err.to_string(), "Command failed with exit code 1");

        let err = CoreError::Timeout(30);
        assert_eq!(err.to_string(), "Command timed out after 30 seconds");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let core_err: CoreError = io_err.into();
        assert!(matches!(core_err, CoreError::Io(_)));
    }
}
