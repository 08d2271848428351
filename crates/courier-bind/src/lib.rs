//! # Courier Bind
//!
//! Parameter extraction, value conversion, projection synthesis, and binding
//! dispatch for the Courier engine.
//!
//! The pipeline from wire data to an executed message:
//!
//! 1. At registration, [`route_parameters`] and friends correlate a route
//!    template against the message's declared shape into
//!    [`ParameterDescriptor`]s, and
//!    [`Projection::synthesize`] builds the minimal record type for split
//!    binding. Mismatches fail here, not on first request.
//! 2. Per request, [`convert`] turns raw text into typed
//!    [`FieldValue`](courier_core::value::FieldValue)s - nullable unwrapping,
//!    case-sensitive enum members, invariant parsing.
//! 3. The [`Dispatcher`] picks a [`BindingStrategy`] per `(message type,
//!    declared route)`, populates an instance, hands it to the executor, and
//!    maps the result slot back to a wire [`Outcome`](courier_core::Outcome).
//!
//! ## Example
//!
//! ```rust,ignore
//! let dispatcher = Dispatcher::new(service);
//! let handler = dispatcher.bind::<FindCustomer>(Method::GET, "/customers/{id}")?;
//!
//! // Host-side, per request:
//! let request = BindRequest::new()
//!     .with_path(RouteValues::from([("id", "42")]));
//! let outcome = handler(request, ExecutionContext::new()).await?;
//! ```

#![doc(html_root_url = "https://docs.rs/courier-bind/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod convert;
mod dispatch;
mod error;
mod extract;
mod projection;

pub use convert::convert;
pub use dispatch::{
    BindRequest, BindingStrategy, BoundHandler, BoxFuture, Dispatcher, MountedRoute,
};
pub use error::{BindError, ConvertError, RegistrationError};
pub use extract::{
    all_parameters, query_parameters, route_parameters, ParameterDescriptor, ParameterSource,
};
pub use projection::{Projection, ProjectionRecord};

// Re-export the raw-value bag alongside the request type that carries it.
pub use courier_route::RouteValues;
