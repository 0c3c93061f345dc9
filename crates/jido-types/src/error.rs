//! Unified error code convention.
//!
//! Every error enum in the workspace implements [`ErrorCode`] so that
//! hosts can branch on stable machine-readable codes and drive retry
//! logic from `is_recoverable` without matching on concrete types.
//!
//! # Code Format
//!
//! - UPPER_SNAKE_CASE, prefixed per crate: `SIGNAL_`, `EXEC_`,
//!   `RUNTIME_`
//! - Stable once published (changing a code is a breaking change)
//!
//! # Recoverability
//!
//! An error is recoverable when retrying the operation may succeed:
//! transient execution failures, saturated subscribers. Validation
//! and format errors are never recoverable: the input will not change
//! on retry. Deadline expirations are deliberately *not* recoverable;
//! the workflow executor never retries a timed-out attempt.

/// Machine-readable error code interface.
///
/// # Example
///
/// ```
/// use jido_types::ErrorCode;
///
/// #[derive(Debug)]
/// enum QueueError {
///     Full,
///     Closed,
/// }
///
/// impl ErrorCode for QueueError {
///     fn code(&self) -> &'static str {
///         match self {
///             Self::Full => "QUEUE_FULL",
///             Self::Closed => "QUEUE_CLOSED",
///         }
///     }
///
///     fn is_recoverable(&self) -> bool {
///         matches!(self, Self::Full)
///     }
/// }
///
/// assert_eq!(QueueError::Full.code(), "QUEUE_FULL");
/// assert!(QueueError::Full.is_recoverable());
/// ```
pub trait ErrorCode {
    /// Returns a stable UPPER_SNAKE_CASE code with a domain prefix.
    fn code(&self) -> &'static str;

    /// Returns whether retrying the failed operation may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Asserts that an error's code follows workspace conventions.
///
/// Checks the code is non-empty, carries the expected prefix and is
/// UPPER_SNAKE_CASE. Panics with a descriptive message otherwise.
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );
    assert!(
        is_upper_snake_case(code),
        "error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Asserts every variant in `errors` against [`assert_error_code`].
///
/// Error test modules enumerate all variants and pass them through
/// this in one `all_error_codes_valid` test.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
