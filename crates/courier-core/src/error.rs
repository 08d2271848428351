//! Core error types and the client-facing problem payload.

use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Error assigning a typed value to a message field.
///
/// These errors indicate a disagreement between a declared shape and the
/// value produced for it, not malformed client input (raw-input failures are
/// conversion errors, raised before a value ever reaches a field).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    /// The value's kind does not match the field's declared type.
    #[error("expected a {expected} value, got {actual}")]
    Mismatch {
        /// The declared kind.
        expected: &'static str,
        /// The supplied kind.
        actual: &'static str,
    },

    /// A null value was supplied for a non-optional field.
    #[error("null value for a non-optional {expected} field")]
    UnexpectedNull {
        /// The declared kind.
        expected: &'static str,
    },

    /// An integer value does not fit the field's storage type.
    #[error("integer {value} is out of range for {target}")]
    OutOfRange {
        /// The supplied value.
        value: i64,
        /// The target storage type.
        target: &'static str,
    },

    /// A member name does not belong to the enumeration.
    #[error("'{member}' is not a member of {enum_name}")]
    UnknownMember {
        /// The enumeration type's name.
        enum_name: &'static str,
        /// The offending member name.
        member: String,
    },
}

impl ValueError {
    /// Creates a kind-mismatch error.
    #[must_use]
    pub fn mismatch(expected: &'static str, actual: &'static str) -> Self {
        Self::Mismatch { expected, actual }
    }

    /// Creates an unexpected-null error.
    #[must_use]
    pub fn unexpected_null(expected: &'static str) -> Self {
        Self::UnexpectedNull { expected }
    }

    /// Creates an out-of-range error.
    #[must_use]
    pub fn out_of_range(value: i64, target: &'static str) -> Self {
        Self::OutOfRange { value, target }
    }

    /// Creates an unknown-member error.
    #[must_use]
    pub fn unknown_member(enum_name: &'static str, member: impl Into<String>) -> Self {
        Self::UnknownMember {
            enum_name,
            member: member.into(),
        }
    }
}

/// A client-facing error payload in the RFC 7807 problem-details shape.
///
/// Request-time binding failures are translated into this payload at the
/// host boundary; registration-time failures abort startup and never reach
/// a client.
///
/// # Example
///
/// ```rust
/// use courier_core::Problem;
/// use http::StatusCode;
///
/// let problem = Problem::new(StatusCode::BAD_REQUEST, "Invalid request value")
///     .with_detail("Cannot convert 'abc' to integer.");
/// assert_eq!(problem.status, 400);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// A URI reference identifying the problem type.
    #[serde(rename = "type")]
    pub problem_type: String,
    /// A short, human-readable summary.
    pub title: String,
    /// The HTTP status code.
    pub status: u16,
    /// A human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// A URI reference identifying this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl Problem {
    /// Creates a problem with the given status and title.
    #[must_use]
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            problem_type: "about:blank".to_string(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
        }
    }

    /// Sets the problem type URI.
    #[must_use]
    pub fn with_type(mut self, problem_type: impl Into<String>) -> Self {
        self.problem_type = problem_type.into();
        self
    }

    /// Sets the occurrence-specific detail text.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Sets the occurrence URI.
    #[must_use]
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Returns the status as a typed [`StatusCode`].
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}
