//! The executor boundary.
//!
//! The binding engine populates a message instance and hands it, with an
//! [`ExecutionContext`], to an [`Execute`] implementation supplied by the
//! host. Cancellation is opaque to the engine: it travels inside the context
//! and is forwarded unexamined.

use crate::message::Message;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// A unique identifier for each execution, using UUID v7.
///
/// UUID v7 is time-ordered, which makes it suitable for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An opaque cancellation handle.
///
/// The host sets it, the executor may observe it; the binding engine only
/// passes it through.
#[derive(Debug, Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    /// Creates a fresh, non-cancelled handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals cancellation. All clones observe it.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Returns true if cancellation was signalled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Per-execution context handed through to the executor.
///
/// # Example
///
/// ```rust
/// use courier_core::ExecutionContext;
///
/// let ctx = ExecutionContext::new();
/// assert!(!ctx.cancellation().is_cancelled());
/// println!("executing request {}", ctx.request_id());
/// ```
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    request_id: RequestId,
    cancellation: Cancellation,
    started_at: Instant,
}

impl ExecutionContext {
    /// Creates a context with a fresh request ID and cancellation handle.
    #[must_use]
    pub fn new() -> Self {
        Self {
            request_id: RequestId::new(),
            cancellation: Cancellation::new(),
            started_at: Instant::now(),
        }
    }

    /// Creates a context with the specified request ID.
    #[must_use]
    pub fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            ..Self::new()
        }
    }

    /// Attaches a host-owned cancellation handle.
    #[must_use]
    pub fn with_cancellation(mut self, cancellation: Cancellation) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Creates a mock context for testing purposes.
    #[must_use]
    pub fn mock() -> Self {
        Self::new()
    }

    /// Returns the request ID.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the cancellation handle.
    #[must_use]
    pub const fn cancellation(&self) -> &Cancellation {
        &self.cancellation
    }

    /// Returns the elapsed time since the context was created.
    #[must_use]
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Error surfaced by an executor.
///
/// Categories map to HTTP status codes the way the host reports them to
/// clients; `Internal` may carry an unexposed source error.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    /// Business-level validation failed.
    #[error("validation error: {message}")]
    Validation {
        /// Human-readable error message.
        message: String,
    },

    /// A referenced resource does not exist.
    #[error("not found: {message}")]
    NotFound {
        /// Human-readable error message.
        message: String,
    },

    /// The request conflicts with current state.
    #[error("conflict: {message}")]
    Conflict {
        /// Human-readable error message.
        message: String,
    },

    /// The execution did not complete in time.
    #[error("timeout: {message}")]
    Timeout {
        /// Human-readable error message.
        message: String,
    },

    /// An internal failure in the handler.
    #[error("internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
        /// The underlying error (not exposed to clients).
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl ExecutionError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error with a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// The external executor for a message type.
///
/// The dispatcher populates a message and calls [`execute`](Self::execute);
/// handlers that produce a result store it in the message's result slot.
///
/// # Example
///
/// ```rust,ignore
/// struct CustomerService;
///
/// impl Execute<DeactivateCustomer> for CustomerService {
///     async fn execute(
///         &self,
///         message: &mut DeactivateCustomer,
///         _ctx: &ExecutionContext,
///     ) -> Result<(), ExecutionError> {
///         // business logic...
///         Ok(())
///     }
/// }
/// ```
pub trait Execute<M: Message>: Send + Sync + 'static {
    /// Executes the populated message.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError`] when business logic fails; binding and
    /// conversion problems never reach this point.
    fn execute(
        &self,
        message: &mut M,
        ctx: &ExecutionContext,
    ) -> impl Future<Output = Result<(), ExecutionError>> + Send;
}

/// The wire-level outcome of one bound execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// The response status.
    pub status: StatusCode,
    /// The response payload, when the message produced one.
    pub body: Option<serde_json::Value>,
}

impl Outcome {
    /// An outcome with a payload.
    #[must_use]
    pub fn with_body(status: StatusCode, body: serde_json::Value) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    /// An outcome with no payload.
    #[must_use]
    pub fn empty(status: StatusCode) -> Self {
        Self { status, body: None }
    }
}
