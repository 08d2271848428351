//! # Courier
//!
//! **Metadata-driven binding of CQRS messages to HTTP routes**
//!
//! Courier declaratively binds strongly typed command and query messages to
//! request handling. From a route template and a message's declared shape it
//! infers which fields come from path segments, which from query values, and
//! which from a body; converts raw wire text into typed field values; and
//! dispatches the populated message to your executor, marshaling the result
//! back to a wire outcome.
//!
//! - **Shape-driven extraction** – route templates are correlated against an
//!   explicit per-type field manifest; mismatches fail at registration
//! - **Typed conversion** – invariant parsing with distinct errors for
//!   missing required values and unknown enum members
//! - **Projection records** – minimal synthesized types for split
//!   parameters-and-body binding
//! - **Client-side mirror** – outbound URI and request construction from the
//!   same templates
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use courier::prelude::*;
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! struct FindCustomer {
//!     id: i64,
//!     #[serde(skip)]
//!     found: ResultSlot<Customer>,
//! }
//!
//! shape! {
//!     FindCustomer {
//!         id: i64 => "Customer identifier",
//!     }
//! }
//!
//! impl Message for FindCustomer {
//!     const KIND: MessageKind = MessageKind::Query;
//!     const HAS_RESULT: bool = true;
//!
//!     fn take_result(&mut self) -> Option<Result<serde_json::Value, serde_json::Error>> {
//!         self.found.take_serialized()
//!     }
//! }
//!
//! let dispatcher = Dispatcher::new(CustomerService::default());
//! let handler = dispatcher.bind::<FindCustomer>(Method::GET, "/customers/{id}")?;
//! // Register `handler` with your host's router; call it per request with
//! // the raw path/query values and optional body.
//! ```

#![doc(html_root_url = "https://docs.rs/courier/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use courier_core as core;

// Re-export route template types
pub use courier_route as route;

// Re-export binding types
pub use courier_bind as bind;

// Re-export outbound construction types
pub use courier_client as client;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use courier::prelude::*;
/// ```
pub mod prelude {
    pub use courier_core::{
        bindable_enum, shape, Cancellation, DeclaredRoutes, EndpointMeta, Execute,
        ExecutionContext, ExecutionError, FieldAccess, HasShape, Message, MessageKind, Outcome,
        Problem, RequestId, ResultSlot, RouteBinding,
    };

    // Re-export value model types
    pub use courier_core::value::{BindableField, FieldType, FieldValue};

    // Re-export binding machinery
    pub use courier_bind::{
        BindError, BindRequest, BindingStrategy, BoundHandler, Dispatcher, MountedRoute,
        RegistrationError, RouteValues,
    };

    // Re-export outbound construction
    pub use courier_client::{build_uri, outbound_request, OutboundError};
}
