//! Message traits and route declarations.
//!
//! A message is a command or query object whose fields are populated from
//! wire data and which is then handed to an executor. Messages declare their
//! kind, whether they carry a result slot, and (optionally) the routes they
//! are served on.

use crate::error::ValueError;
use crate::shape::HasShape;
use crate::value::FieldValue;
use http::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Whether a message is a command (state-changing) or a query (data-fetching).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// A state-changing message; results, when any, are carried in a
    /// [`ResultSlot`].
    Command,
    /// A data-fetching message; always produces a result.
    Query,
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Command => write!(f, "command"),
            Self::Query => write!(f, "query"),
        }
    }
}

/// By-name field access, implemented by the [`shape!`](crate::shape!) macro.
///
/// Names are matched case-insensitively against the declared shape.
pub trait FieldAccess {
    /// Assigns a typed value to the named field.
    ///
    /// Returns `Ok(false)` when no field matches the name - callers decide
    /// whether that is ignorable (overlay from a generic route bag) or an
    /// error (outbound substitution).
    ///
    /// # Errors
    ///
    /// Returns [`ValueError`] when the value does not fit the field.
    fn assign(&mut self, name: &str, value: FieldValue) -> Result<bool, ValueError>;

    /// Reads the named field as a typed value.
    ///
    /// Returns `None` when no field matches; a present-but-null field reads
    /// as `Some(FieldValue::Null)`.
    fn read(&self, name: &str) -> Option<FieldValue>;
}

/// A bindable command or query message.
///
/// # Example
///
/// ```rust
/// use courier_core::{shape, Message, MessageKind, ResultSlot};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Default, Serialize, Deserialize)]
/// pub struct RenameCustomer {
///     pub id: i64,
///     pub name: String,
///     #[serde(skip)]
///     pub receipt: ResultSlot<i64>,
/// }
///
/// shape! {
///     RenameCustomer {
///         id: i64 => "Customer identifier",
///         name: String,
///     }
/// }
///
/// impl Message for RenameCustomer {
///     const KIND: MessageKind = MessageKind::Command;
///     const HAS_RESULT: bool = true;
///
///     fn take_result(&mut self) -> Option<Result<serde_json::Value, serde_json::Error>> {
///         self.receipt.take_serialized()
///     }
/// }
/// ```
pub trait Message: HasShape + FieldAccess + Serialize + DeserializeOwned + Send + 'static {
    /// The message's kind, checked against the HTTP verb at registration.
    const KIND: MessageKind;

    /// Whether executions are expected to populate a result. A declared
    /// result that was never set is a fatal handler defect, surfaced to the
    /// host rather than defaulted.
    const HAS_RESULT: bool = false;

    /// Body-less marker: bind every field from route and query values and
    /// never read a request body, regardless of verb.
    const FROM_PARAMETERS: bool = false;

    /// Takes the serialized result out of the message's result slot.
    ///
    /// Returns `None` when the slot was never set. The default suits
    /// messages without a result slot.
    fn take_result(&mut self) -> Option<Result<serde_json::Value, serde_json::Error>> {
        None
    }
}

/// A one-shot cell carrying a handler's typed result back to the dispatcher.
///
/// Embed it in a message struct with `#[serde(skip)]` so it never appears on
/// the wire; the handler calls [`set`](Self::set), the dispatcher reads it
/// back through [`Message::take_result`].
#[derive(Debug, Clone)]
pub struct ResultSlot<T>(Option<T>);

impl<T> ResultSlot<T> {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self(None)
    }

    /// Stores a result, replacing any earlier one.
    pub fn set(&mut self, value: T) {
        self.0 = Some(value);
    }

    /// Returns true if a result has been stored.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    /// Takes the stored result, leaving the slot empty.
    pub fn take(&mut self) -> Option<T> {
        self.0.take()
    }
}

impl<T: Serialize> ResultSlot<T> {
    /// Takes the stored result, serialized to JSON.
    pub fn take_serialized(&mut self) -> Option<Result<serde_json::Value, serde_json::Error>> {
        self.0.take().map(|value| serde_json::to_value(value))
    }
}

impl<T> Default for ResultSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Documentation metadata attached to a declared route.
///
/// Consumed by API-documentation tooling at the host; the binding engine
/// carries it through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EndpointMeta {
    /// An explicit endpoint name for link generation; empty when inferred.
    pub name: &'static str,
    /// A short one-line summary.
    pub summary: &'static str,
    /// A longer description of purpose and behavior.
    pub description: &'static str,
    /// Tags categorizing the endpoint in documentation.
    pub tags: &'static [&'static str],
    /// When true the endpoint is hidden from generated descriptions.
    pub hidden: bool,
}

/// One declared route of a message type: verb, template, and metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteBinding {
    /// The HTTP verb.
    pub verb: Method,
    /// The route template, with `{name}` placeholders.
    pub template: &'static str,
    /// Documentation metadata.
    pub meta: EndpointMeta,
}

impl RouteBinding {
    /// Creates a route binding with empty metadata.
    #[must_use]
    pub fn new(verb: Method, template: &'static str) -> Self {
        Self {
            verb,
            template,
            meta: EndpointMeta::default(),
        }
    }

    /// Attaches documentation metadata.
    #[must_use]
    pub fn with_meta(mut self, meta: EndpointMeta) -> Self {
        self.meta = meta;
        self
    }
}

/// The explicit route manifest of a message type.
///
/// This replaces attribute scanning: the host mounts each message's declared
/// routes at startup instead of discovering annotations across a whole
/// program.
pub trait DeclaredRoutes {
    /// Returns the routes this message is served on.
    fn routes() -> Vec<RouteBinding>;
}
