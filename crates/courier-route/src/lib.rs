//! # Courier Route
//!
//! Route template parsing and raw route-value storage for the Courier
//! binding engine.
//!
//! A route template is a path pattern containing named placeholders:
//!
//! ```text
//! /customers/{id}
//! /customers/{id:guid}
//! /customers/{id:guid?}/orders/{orderId?}
//! ```
//!
//! [`parse_template`] turns a template into an ordered list of
//! [`TemplateToken`]s. Parsing is purely syntactic: no correlation against a
//! message shape happens here (that is the extraction layer's job), and
//! constraint strings are carried through opaquely without validation.
//!
//! [`RouteValues`] is the raw `(name, value)` bag a host hands to the binding
//! engine after matching a request path. Lookups are case-insensitive, which
//! is the contract for name matching throughout Courier.

#![doc(html_root_url = "https://docs.rs/courier-route/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod template;
mod values;

pub use template::{parse_template, TemplateToken};
pub use values::RouteValues;
