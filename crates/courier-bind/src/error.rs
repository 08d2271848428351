//! Binding error types.
//!
//! Errors split along the propagation boundary: [`RegistrationError`] is
//! raised synchronously while routes are bound and aborts startup;
//! [`ConvertError`] and [`BindError`] occur per request and are translated
//! into client-facing [`Problem`] payloads at the host boundary.

use courier_core::execute::ExecutionError;
use courier_core::message::MessageKind;
use courier_core::value::FieldType;
use courier_core::{Problem, ValueError};
use http::{Method, StatusCode};

/// Fatal error while registering a route binding.
///
/// These indicate configuration defects (a template that cannot be satisfied
/// by the message's shape, or a message used in an incompatible role) and
/// are never deferred to request time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// A route token has no matching field on the target shape.
    #[error("Route parameter '{token}' does not match any property in type '{type_name}'.")]
    TemplateMismatch {
        /// The offending token name.
        token: String,
        /// The target type's name.
        type_name: &'static str,
    },

    /// A token name appears more than once in the template.
    #[error("route parameter '{token}' appears more than once in template '{template}'")]
    DuplicateToken {
        /// The repeated token name.
        token: String,
        /// The offending template.
        template: String,
    },

    /// The message kind is incompatible with the requested binding role.
    #[error("cannot bind {kind} '{type_name}' to {verb}: {reason}")]
    Classification {
        /// The message type's name.
        type_name: &'static str,
        /// The message's kind.
        kind: MessageKind,
        /// The HTTP verb being registered.
        verb: Method,
        /// Why the combination is invalid.
        reason: &'static str,
    },

    /// A projection was synthesized with a blank type name.
    #[error("projection type name must be provided")]
    EmptyProjectionName,
}

/// Per-request conversion failure: a raw textual value could not become the
/// declared field type.
///
/// The three variants are deliberately distinct: a missing required value, an
/// unknown enumeration member, and a structurally malformed value are
/// different client mistakes and diagnose differently.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    /// Null or empty input for a type that does not accept null.
    #[error("cannot convert null or empty input to non-nullable {ty}")]
    NullIntoNonNullable {
        /// The declared target type.
        ty: FieldType,
    },

    /// The input is not a member of the target enumeration.
    #[error("'{value}' is not a member of enumeration {enum_name}")]
    InvalidEnumMember {
        /// The raw input.
        value: String,
        /// The enumeration type's name.
        enum_name: &'static str,
    },

    /// The input could not be parsed as the target type.
    #[error("cannot convert '{value}' to {ty}")]
    Conversion {
        /// The raw input.
        value: String,
        /// The declared target type.
        ty: FieldType,
    },
}

impl ConvertError {
    /// Creates a null-into-non-nullable error.
    #[must_use]
    pub fn null_into_non_nullable(ty: FieldType) -> Self {
        Self::NullIntoNonNullable { ty }
    }

    /// Creates an invalid-enum-member error.
    #[must_use]
    pub fn invalid_enum_member(value: impl Into<String>, enum_name: &'static str) -> Self {
        Self::InvalidEnumMember {
            value: value.into(),
            enum_name,
        }
    }

    /// Creates a generic conversion error.
    #[must_use]
    pub fn conversion(value: impl Into<String>, ty: FieldType) -> Self {
        Self::Conversion {
            value: value.into(),
            ty,
        }
    }
}

/// Per-request binding failure, surfaced to the host.
#[derive(Debug, thiserror::Error)]
pub enum BindError {
    /// A request body was required but not provided.
    #[error("request body is required but was not provided")]
    MissingBody,

    /// The body or assembled parameter object failed to deserialize.
    #[error("failed to deserialize request: {source}")]
    Deserialize {
        /// The serde failure.
        #[source]
        source: serde_json::Error,
    },

    /// A raw value could not be converted for a named field.
    #[error("invalid value for '{field}': {source}")]
    Convert {
        /// The field being bound.
        field: String,
        /// The conversion failure.
        #[source]
        source: ConvertError,
    },

    /// A converted value could not be assigned to a named field.
    #[error("invalid value for '{field}': {source}")]
    Value {
        /// The field being bound.
        field: String,
        /// The assignment failure.
        #[source]
        source: ValueError,
    },

    /// A name was bound into a projection record that does not carry it.
    #[error("'{name}' is not a field of projection type '{type_name}'")]
    UnknownField {
        /// The unknown name.
        name: String,
        /// The projection type's name.
        type_name: String,
    },

    /// The message declared a result but its handler never set one.
    ///
    /// This is a handler defect, reported server-side and never defaulted.
    #[error("handler for '{type_name}' declared a result but did not set one")]
    ResultNotSet {
        /// The message type's name.
        type_name: &'static str,
    },

    /// The handler's result failed to serialize.
    #[error("failed to serialize result for '{type_name}': {source}")]
    ResultSerialization {
        /// The message type's name.
        type_name: &'static str,
        /// The serde failure.
        #[source]
        source: serde_json::Error,
    },

    /// The executor reported a business-level failure.
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl BindError {
    /// Creates a conversion error for a named field.
    #[must_use]
    pub fn convert(field: impl Into<String>, source: ConvertError) -> Self {
        Self::Convert {
            field: field.into(),
            source,
        }
    }

    /// Creates an assignment error for a named field.
    #[must_use]
    pub fn value(field: impl Into<String>, source: ValueError) -> Self {
        Self::Value {
            field: field.into(),
            source,
        }
    }

    /// Returns the HTTP status code for this error.
    ///
    /// Client input problems map to 400; handler defects map to 500;
    /// execution errors carry their own category.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingBody
            | Self::Deserialize { .. }
            | Self::Convert { .. }
            | Self::Value { .. }
            | Self::UnknownField { .. } => StatusCode::BAD_REQUEST,
            Self::ResultNotSet { .. } | Self::ResultSerialization { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Execution(err) => err.status_code(),
        }
    }

    /// Renders the client-facing problem payload for this error.
    ///
    /// Server-side defects keep their detail out of the payload.
    #[must_use]
    pub fn to_problem(&self) -> Problem {
        let status = self.status_code();
        match self {
            Self::ResultNotSet { .. } | Self::ResultSerialization { .. } => {
                Problem::new(status, "The handler failed to produce a result")
            }
            Self::Execution(err) => {
                Problem::new(status, "Execution failed").with_detail(err.to_string())
            }
            other => {
                Problem::new(status, "Invalid request value").with_detail(other.to_string())
            }
        }
    }
}
