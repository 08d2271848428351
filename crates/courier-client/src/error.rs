//! Outbound construction errors.

use http::Method;

/// Error assembling an outbound URI or request from a message.
#[derive(Debug, thiserror::Error)]
pub enum OutboundError {
    /// A template placeholder has no matching field on the message.
    #[error("property '{field}' not found on type '{type_name}'")]
    MissingField {
        /// The placeholder name.
        field: String,
        /// The message type's name.
        type_name: &'static str,
    },

    /// A template placeholder's field is null.
    #[error("property '{field}' on type '{type_name}' is null")]
    NullField {
        /// The placeholder name.
        field: String,
        /// The message type's name.
        type_name: &'static str,
    },

    /// The message declares no route for the requested verb.
    #[error("no {verb} route declared for type '{type_name}'")]
    NoDeclaredRoute {
        /// The requested verb.
        verb: Method,
        /// The message type's name.
        type_name: &'static str,
    },

    /// The query string could not be encoded.
    #[error("failed to encode query string: {source}")]
    Encode {
        /// The encoder failure.
        #[source]
        source: serde_urlencoded::ser::Error,
    },

    /// The request body could not be serialized.
    #[error("failed to serialize request body: {source}")]
    Body {
        /// The serde failure.
        #[source]
        source: serde_json::Error,
    },

    /// The request could not be assembled.
    #[error("failed to assemble request: {source}")]
    Http {
        /// The builder failure.
        #[source]
        source: http::Error,
    },
}
