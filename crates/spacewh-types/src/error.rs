//! Unified error interface for spacewh.
//!
//! This module provides the [`ErrorCode`] trait shared by every error
//! enum in the workspace (auth, tracker, engine, router, tools).
//!
//! # Design
//!
//! All spacewh error types should implement [`ErrorCode`] to provide:
//!
//! - **Machine-readable codes**: For programmatic error handling
//! - **Recoverability info**: For admission backpressure and user feedback
//!
//! Post-admission failures are stored on a request record as
//! `{code, message}`, so the code doubles as the wire-level error tag.
//!
//! # Example
//!
//! ```
//! use spacewh_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum MyError {
//!     NotFound(String),
//!     Timeout,
//! }
//!
//! impl ErrorCode for MyError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::NotFound(_) => "NOT_FOUND",
//!             Self::Timeout => "TIMEOUT",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Timeout)
//!     }
//! }
//!
//! let err = MyError::Timeout;
//! assert_eq!(err.code(), "TIMEOUT");
//! assert!(err.is_recoverable());
//! ```

use serde::{Deserialize, Serialize};

/// Unified error code interface for spacewh errors.
///
/// Implement this trait for all error types to enable:
///
/// - Consistent error code format across crates
/// - Error tags on failed request records and `engine-request-error` events
/// - Standardized logging and monitoring
///
/// # Code Format
///
/// Error codes should be:
///
/// - **UPPER_SNAKE_CASE**: e.g., `"TIMEOUT"`, `"PERMISSION_DENIED"`
/// - **Namespace-prefixed for specificity**: e.g., `"AUTH_LEVEL_DENIED"`, `"TRACKER_CONFLICT"`
/// - **Stable**: Codes should not change once defined (API contract)
///
/// # Recoverability
///
/// An error is recoverable if:
///
/// - Retrying the operation may succeed
/// - The user can take action to fix it
/// - It's a transient condition (engine timeout, admission overload)
///
/// Non-recoverable errors:
///
/// - Invalid input (won't change on retry)
/// - Permission denied (requires a higher mode, not retry)
/// - Internal errors (bugs)
///
/// # Example Implementation
///
/// ```
/// use spacewh_types::ErrorCode;
///
/// enum DispatchError {
///     Overloaded,
///     PermissionDenied { capability: String },
///     UnknownAction,
/// }
///
/// impl ErrorCode for DispatchError {
///     fn code(&self) -> &'static str {
///         match self {
///             Self::Overloaded => "DISPATCH_OVERLOADED",
///             Self::PermissionDenied { .. } => "DISPATCH_PERMISSION_DENIED",
///             Self::UnknownAction => "DISPATCH_UNKNOWN_ACTION",
///         }
///     }
///
///     fn is_recoverable(&self) -> bool {
///         match self {
///             // Capacity frees up as requests settle
///             Self::Overloaded => true,
///             // Needs a higher mode, not retry
///             Self::PermissionDenied { .. } => false,
///             // Malformed input stays malformed
///             Self::UnknownAction => false,
///         }
///     }
/// }
/// ```
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    ///
    /// # Format
    ///
    /// - UPPER_SNAKE_CASE
    /// - Prefixed with domain (e.g., `"AUTH_"`, `"ROUTER_"`)
    /// - Stable across versions (breaking change if modified)
    ///
    /// # Examples
    ///
    /// - `"ENGINE_TIMEOUT"`
    /// - `"TRACKER_NOT_FOUND"`
    /// - `"AUTH_CATEGORY_DENIED"`
    fn code(&self) -> &'static str;

    /// Returns whether the error is recoverable.
    ///
    /// # Returns
    ///
    /// - `true`: Retry may succeed, or user can take corrective action
    /// - `false`: Retry will not help, requires code/config change
    fn is_recoverable(&self) -> bool;
}

/// Serializable snapshot of an error: its code and rendered message.
///
/// Stored on failed request records and carried in
/// `engine-request-error` event payloads, where the original error
/// value can no longer travel.
///
/// # Example
///
/// ```
/// use spacewh_types::{ErrorCode, ErrorDetail};
///
/// #[derive(Debug)]
/// struct Boom;
///
/// impl std::fmt::Display for Boom {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         f.write_str("engine exploded")
///     }
/// }
///
/// impl ErrorCode for Boom {
///     fn code(&self) -> &'static str { "ENGINE_FAILED" }
///     fn is_recoverable(&self) -> bool { false }
/// }
///
/// let detail = ErrorDetail::from_error(&Boom);
/// assert_eq!(detail.code, "ENGINE_FAILED");
/// assert_eq!(detail.message, "engine exploded");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable code, see [`ErrorCode::code`].
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl ErrorDetail {
    /// Creates a detail from a code and message.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Captures the code and display message of an error.
    #[must_use]
    pub fn from_error<E: ErrorCode + std::fmt::Display>(err: &E) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

impl std::fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Validates that an error code follows the workspace conventions.
///
/// # Checks
///
/// 1. Code is UPPER_SNAKE_CASE
/// 2. Code starts with expected prefix
/// 3. Code is not empty
///
/// # Panics
///
/// Panics with descriptive message if validation fails.
///
/// # Example
///
/// ```
/// use spacewh_types::{ErrorCode, assert_error_code};
///
/// #[derive(Debug)]
/// enum MyError { Timeout }
///
/// impl ErrorCode for MyError {
///     fn code(&self) -> &'static str { "MY_TIMEOUT" }
///     fn is_recoverable(&self) -> bool { true }
/// }
///
/// let err = MyError::Timeout;
/// assert_error_code(&err, "MY_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    // Check not empty
    assert!(!code.is_empty(), "Error code must not be empty");

    // Check prefix
    assert!(
        code.starts_with(expected_prefix),
        "Error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );

    // Check UPPER_SNAKE_CASE
    assert!(
        is_upper_snake_case(code),
        "Error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Validates multiple error codes at once.
///
/// Use this to verify all variants of an error enum.
///
/// # Example
///
/// ```
/// use spacewh_types::{ErrorCode, assert_error_codes};
///
/// #[derive(Debug)]
/// enum MyError { A, B }
///
/// impl ErrorCode for MyError {
///     fn code(&self) -> &'static str {
///         match self {
///             Self::A => "MY_A",
///             Self::B => "MY_B",
///         }
///     }
///     fn is_recoverable(&self) -> bool { false }
/// }
///
/// assert_error_codes(&[MyError::A, MyError::B], "MY_");
/// ```
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

/// Checks if a string is UPPER_SNAKE_CASE.
fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }

    // Must not start or end with underscore
    if s.starts_with('_') || s.ends_with('_') {
        return false;
    }

    // Must not have consecutive underscores
    if s.contains("__") {
        return false;
    }

    // All chars must be uppercase letters, digits, or underscore
    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum TestError {
        Overloaded,
        Denied,
    }

    impl ErrorCode for TestError {
        fn code(&self) -> &'static str {
            match self {
                Self::Overloaded => "TEST_OVERLOADED",
                Self::Denied => "TEST_DENIED",
            }
        }

        fn is_recoverable(&self) -> bool {
            matches!(self, Self::Overloaded)
        }
    }

    #[test]
    fn error_code_trait() {
        let overloaded = TestError::Overloaded;
        assert_eq!(overloaded.code(), "TEST_OVERLOADED");
        assert!(overloaded.is_recoverable());

        let denied = TestError::Denied;
        assert_eq!(denied.code(), "TEST_DENIED");
        assert!(!denied.is_recoverable());
    }

    #[test]
    fn assert_error_code_valid() {
        let err = TestError::Overloaded;
        assert_error_code(&err, "TEST_");
    }

    #[test]
    fn assert_error_codes_all_variants() {
        assert_error_codes(&[TestError::Overloaded, TestError::Denied], "TEST_");
    }

    #[test]
    #[should_panic(expected = "must start with prefix")]
    fn assert_error_code_wrong_prefix() {
        let err = TestError::Overloaded;
        assert_error_code(&err, "WRONG_");
    }

    #[test]
    fn is_upper_snake_case_valid() {
        assert!(is_upper_snake_case("HELLO"));
        assert!(is_upper_snake_case("HELLO_WORLD"));
        assert!(is_upper_snake_case("A_B_C"));
        assert!(is_upper_snake_case("ERROR_123"));
    }

    #[test]
    fn is_upper_snake_case_invalid() {
        assert!(!is_upper_snake_case(""));
        assert!(!is_upper_snake_case("hello"));
        assert!(!is_upper_snake_case("Hello_World"));
        assert!(!is_upper_snake_case("_HELLO"));
        assert!(!is_upper_snake_case("HELLO_"));
        assert!(!is_upper_snake_case("HELLO__WORLD"));
    }
}
