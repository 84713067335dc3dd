//! Result extension trait for logging errors with context.

use std::fmt::Display;
use tracing::error;

/// Adds a `log` method to `Result` for recording errors with a context
/// message and source location without interrupting the flow.
pub trait ResultExt<T, E> {
    /// Log the error with context if this is an `Err` variant, returning
    /// the original `Result` unchanged.
    fn log<S: ToString>(self, context: S) -> Result<T, E>;
}

impl<T, E: Display> ResultExt<T, E> for Result<T, E> {
    #[track_caller]
    fn log<S: ToString>(self, context: S) -> Result<T, E> {
        if let Err(ref e) = self {
            let caller_location = std::panic::Location::caller();
            error!(
                target: "terraplane_server",
                error = %e,
                file = %format!("{}:{}", caller_location.file(), caller_location.line()),
                context = %context.to_string(),
                "Operation failed"
            );
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_passes_through() {
        let result: Result<i32, &str> = Ok(42);
        assert_eq!(result.log("test context").unwrap(), 42);
    }

    #[test]
    fn test_err_passes_through() {
        let result: Result<i32, &str> = Err("test error");
        assert!(result.log("test context").is_err());
    }
}
