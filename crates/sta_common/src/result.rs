//! Common result and error types for the STA core.

/// The standard result type for fallible internal operations.
///
/// `Ok` contains the result value. `Err` indicates an unrecoverable
/// internal/critical condition (e.g. tag index overflow, an internal
/// consistency failure), not a user-input problem. User-input errors
/// are reported through
/// [`DiagnosticSink`](sta_diagnostics::DiagnosticSink) as warnings and the
/// surrounding operation still returns `Ok` with a degraded result.
pub type StaResult<T> = Result<T, InternalError>;

/// A critical internal error: a bug or a fatal resource-exhaustion
/// condition, not a user input problem.
///
/// These should never occur during normal operation. If one does, it means
/// either an invariant was violated or a hard resource limit (such as the
/// 24-bit tag index space) was exceeded.
#[derive(Debug, thiserror::Error)]
#[error("internal error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let err = InternalError::new("something broke");
        assert_eq!(format!("{err}"), "internal error: something broke");
    }

    #[test]
    fn ok_path() {
        let r: StaResult<i32> = Ok(42);
        assert!(r.is_ok());
        assert_eq!(r.ok(), Some(42));
    }

    #[test]
    fn err_path() {
        let r: StaResult<i32> = Err(InternalError::new("test error"));
        assert!(r.is_err());
        assert_eq!(r.err().unwrap().message, "test error");
    }

    #[test]
    fn from_string() {
        let err: InternalError = "from string".to_string().into();
        assert_eq!(err.message, "from string");
    }
}
