//! # Courier Core
//!
//! Core types and traits for the Courier binding engine.
//!
//! This crate provides the foundational pieces used throughout Courier:
//!
//! - [`FieldType`] / [`FieldValue`] - the explicit, reflection-free model of
//!   a message field's declared type and a typed runtime value
//! - [`Shape`] - the declared field and constructor-parameter manifest of a
//!   message type, with description resolution
//! - [`Message`] - the command/query trait, with [`ResultSlot`] for handlers
//!   that produce a typed result
//! - [`Execute`] - the external executor boundary
//! - [`ExecutionContext`] / [`RequestId`] - per-execution context with an
//!   opaque cancellation handle
//! - [`Problem`] - the client-facing error payload
//!
//! Message shapes are declared with the [`shape!`] macro rather than
//! discovered by reflection; enumerated field types implement
//! [`BindableField`] via [`bindable_enum!`].

#![doc(html_root_url = "https://docs.rs/courier-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod execute;
pub mod message;
pub mod shape;
pub mod value;

pub use error::{Problem, ValueError};
pub use execute::{Cancellation, Execute, ExecutionContext, ExecutionError, Outcome, RequestId};
pub use message::{
    DeclaredRoutes, EndpointMeta, FieldAccess, Message, MessageKind, ResultSlot, RouteBinding,
};
pub use shape::{FieldDef, HasShape, ParamDef, Shape, ShapeBuilder};
pub use value::{BindableField, FieldType, FieldValue};

// Macro support: the `shape!` expansion references these through `$crate`.
#[doc(hidden)]
pub use once_cell as __once_cell;
