//! # Courier Client
//!
//! The client-side mirror of the Courier binding engine: given a message
//! instance, substitute its fields into a route template and assemble an
//! outbound request.
//!
//! [`build_uri`] replaces each `{name}` placeholder with the matching
//! field's wire text and appends every unconsumed, non-null field as a
//! URL-encoded query pair in declaration order. [`outbound_request`]
//! resolves a message's declared route for a verb and produces an
//! `http::Request` - transport stays the caller's concern.
//!
//! ## Example
//!
//! ```rust,ignore
//! let uri = build_uri("/api/customers/{id}", &query)?;
//! // "/api/customers/42?name=John&age=30"
//!
//! let request = outbound_request(&Method::POST, &command)?;
//! // POST with a JSON body; hand it to any HTTP client.
//! ```

#![doc(html_root_url = "https://docs.rs/courier-client/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod request;
mod uri;

pub use error::OutboundError;
pub use request::outbound_request;
pub use uri::{build_uri, substitute_placeholders};
