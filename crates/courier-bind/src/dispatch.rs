//! The binding dispatcher.
//!
//! [`Dispatcher`] resolves, per `(message type, declared route)` pair, how a
//! message instance is produced from wire data - whole-object from body,
//! whole-object from parameters, or split parameters-and-body - and builds
//! the type-erased [`BoundHandler`] the host registers against its router.
//!
//! Resolution happens once at registration time: verb/kind classification
//! errors and template/shape mismatches abort registration rather than
//! surfacing on first request. Plans and strategies are cached in concurrent
//! maps; synthesis is deterministic, so racing first-time registrations at
//! worst recompute structurally identical state.

use crate::convert::convert;
use crate::error::{BindError, RegistrationError};
use crate::extract::{all_parameters, route_parameters, ParameterDescriptor};
use crate::projection::Projection;
use bytes::Bytes;
use courier_core::execute::{Execute, ExecutionContext, Outcome};
use courier_core::message::{DeclaredRoutes, EndpointMeta, FieldAccess, Message, MessageKind};
use courier_core::shape::HasShape;
use courier_route::RouteValues;
use dashmap::DashMap;
use http::{Method, StatusCode};
use serde_json::Value;
use std::any::TypeId;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A registered, type-erased request handler.
///
/// The host calls it with the raw values it extracted from an incoming
/// request; the handler binds a message, executes it, and returns the wire
/// outcome.
pub type BoundHandler = Arc<
    dyn Fn(BindRequest, ExecutionContext) -> BoxFuture<'static, Result<Outcome, BindError>>
        + Send
        + Sync,
>;

/// Raw request data handed to a bound handler by the host.
#[derive(Debug, Clone, Default)]
pub struct BindRequest {
    /// Raw path-segment values from the host's route match.
    pub path: RouteValues,
    /// Raw query-string values.
    pub query: RouteValues,
    /// The request body, when one was sent.
    pub body: Option<Bytes>,
}

impl BindRequest {
    /// Creates an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the path values.
    #[must_use]
    pub fn with_path(mut self, path: RouteValues) -> Self {
        self.path = path;
        self
    }

    /// Sets the query values.
    #[must_use]
    pub fn with_query(mut self, query: RouteValues) -> Self {
        self.query = query;
        self
    }

    /// Sets the body payload.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// How a message instance is produced from wire data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingStrategy {
    /// Construct from the union of route and query values; never read a body.
    ParametersOnly,
    /// Deserialize the body, then overlay route values (route wins).
    BodyOnly,
    /// Bind a projection record from route values, deserialize the body,
    /// then overlay the record onto the instance.
    SplitParametersAndBody,
}

/// The cached, verb-independent binding state for one `(type, template)`
/// pair: descriptors and the synthesized projection.
#[derive(Debug, Clone)]
struct BindingPlan {
    route: Vec<ParameterDescriptor>,
    all: Vec<ParameterDescriptor>,
    projection: Projection,
}

/// A route bound through a message's declared manifest.
pub struct MountedRoute {
    /// The HTTP verb.
    pub verb: Method,
    /// The route template.
    pub template: &'static str,
    /// Documentation metadata from the declaration.
    pub meta: EndpointMeta,
    /// The registered handler.
    pub handler: BoundHandler,
}

impl std::fmt::Debug for MountedRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountedRoute")
            .field("verb", &self.verb)
            .field("template", &self.template)
            .finish_non_exhaustive()
    }
}

/// The binding dispatcher: registration-time resolution, request-time
/// binding, executor dispatch, and outcome mapping.
///
/// # Example
///
/// ```rust,ignore
/// let dispatcher = Dispatcher::new(CustomerService::default());
/// let handler = dispatcher.bind::<DeactivateCustomer>(Method::DELETE, "/customers/{id}")?;
/// // hand `handler` to the host's router...
/// ```
pub struct Dispatcher<E> {
    executor: Arc<E>,
    /// Descriptor/projection plans keyed by (type identity, template).
    plans: DashMap<(TypeId, String), Arc<BindingPlan>>,
    /// Resolved strategies keyed by (type identity, verb, template-has-tokens).
    strategies: DashMap<(TypeId, Method, bool), BindingStrategy>,
}

impl<E> std::fmt::Debug for Dispatcher<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("plan_count", &self.plans.len())
            .finish_non_exhaustive()
    }
}

impl<E: Send + Sync + 'static> Dispatcher<E> {
    /// Creates a dispatcher around an executor.
    #[must_use]
    pub fn new(executor: E) -> Self {
        Self::from_arc(Arc::new(executor))
    }

    /// Creates a dispatcher around a shared executor.
    #[must_use]
    pub fn from_arc(executor: Arc<E>) -> Self {
        Self {
            executor,
            plans: DashMap::new(),
            strategies: DashMap::new(),
        }
    }

    /// Binds a message type to a verb and route template, returning the
    /// handler the host registers.
    ///
    /// # Errors
    ///
    /// Fails at registration when the verb and message kind are
    /// incompatible, when a template token matches no field, or when a token
    /// repeats. Nothing is deferred to request time.
    pub fn bind<M>(&self, verb: Method, template: &str) -> Result<BoundHandler, RegistrationError>
    where
        M: Message,
        E: Execute<M>,
    {
        classify::<M>(&verb)?;
        let plan = self.plan_for::<M>(template)?;
        let strategy = self.strategy_for::<M>(&verb, !plan.route.is_empty());

        tracing::debug!(
            message_type = M::shape().type_name(),
            verb = %verb,
            template,
            ?strategy,
            "route bound"
        );

        let executor = Arc::clone(&self.executor);
        let handler: BoundHandler = Arc::new(move |request: BindRequest, ctx: ExecutionContext| {
            let executor = Arc::clone(&executor);
            let plan = Arc::clone(&plan);
            let verb = verb.clone();
            Box::pin(async move {
                tracing::trace!(request_id = %ctx.request_id(), "binding message");
                let mut message = construct::<M>(strategy, &plan, &request)?;
                executor.execute(&mut message, &ctx).await?;
                conclude(&verb, message)
            })
        });
        Ok(handler)
    }

    /// Binds every route a message declares in its manifest.
    ///
    /// # Errors
    ///
    /// Propagates the first [`RegistrationError`] from [`bind`](Self::bind).
    pub fn mount<M>(&self) -> Result<Vec<MountedRoute>, RegistrationError>
    where
        M: Message + DeclaredRoutes,
        E: Execute<M>,
    {
        M::routes()
            .into_iter()
            .map(|route| {
                let handler = self.bind::<M>(route.verb.clone(), route.template)?;
                Ok(MountedRoute {
                    verb: route.verb,
                    template: route.template,
                    meta: route.meta,
                    handler,
                })
            })
            .collect()
    }

    /// Resolves (once per key) the descriptor/projection plan.
    fn plan_for<M: Message>(&self, template: &str) -> Result<Arc<BindingPlan>, RegistrationError> {
        let key = (TypeId::of::<M>(), template.to_string());
        if let Some(existing) = self.plans.get(&key) {
            return Ok(Arc::clone(&existing));
        }

        let shape = M::shape();
        let route = route_parameters(template, shape)?;
        let all = all_parameters(template, shape)?;
        let projection = Projection::synthesize(
            format!("{}RouteParameters", shape.type_name()),
            &route,
        )?;
        let plan = Arc::new(BindingPlan {
            route,
            all,
            projection,
        });

        let entry = self.plans.entry(key).or_insert(plan);
        Ok(Arc::clone(entry.value()))
    }

    /// Resolves (once per key) the binding strategy.
    fn strategy_for<M: Message>(&self, verb: &Method, has_route_tokens: bool) -> BindingStrategy {
        let key = (TypeId::of::<M>(), verb.clone(), has_route_tokens);
        if let Some(strategy) = self.strategies.get(&key) {
            return *strategy;
        }

        let resolved = resolve_strategy(M::FROM_PARAMETERS, verb, has_route_tokens);
        self.strategies.insert(key, resolved);
        resolved
    }
}

/// Verb/kind compatibility, checked when the binding is registered.
fn classify<M: Message>(verb: &Method) -> Result<(), RegistrationError> {
    let classification = |reason| RegistrationError::Classification {
        type_name: M::shape().type_name(),
        kind: M::KIND,
        verb: verb.clone(),
        reason,
    };

    if *verb == Method::GET {
        if M::KIND != MessageKind::Query {
            return Err(classification("GET endpoints require a query message"));
        }
    } else if *verb == Method::POST
        || *verb == Method::PUT
        || *verb == Method::PATCH
        || *verb == Method::DELETE
    {
        if M::KIND != MessageKind::Command {
            return Err(classification("command verbs require a command message"));
        }
    } else {
        return Err(classification("unsupported verb"));
    }

    if M::KIND == MessageKind::Query && !M::HAS_RESULT {
        return Err(classification("a query must declare a result"));
    }

    Ok(())
}

fn resolve_strategy(
    from_parameters: bool,
    verb: &Method,
    has_route_tokens: bool,
) -> BindingStrategy {
    if from_parameters || *verb == Method::GET || *verb == Method::DELETE {
        BindingStrategy::ParametersOnly
    } else if has_route_tokens {
        BindingStrategy::SplitParametersAndBody
    } else {
        BindingStrategy::BodyOnly
    }
}

/// Produces a populated message instance per the resolved strategy.
fn construct<M: Message>(
    strategy: BindingStrategy,
    plan: &BindingPlan,
    request: &BindRequest,
) -> Result<M, BindError> {
    match strategy {
        BindingStrategy::ParametersOnly => from_parameters(plan, request),
        BindingStrategy::BodyOnly => {
            let mut message: M = from_body(request)?;
            overlay_route_values(&mut message, request)?;
            Ok(message)
        }
        BindingStrategy::SplitParametersAndBody => {
            let mut record = plan.projection.record();
            for descriptor in &plan.route {
                record.bind_raw(descriptor.name, request.path.get(descriptor.name))?;
            }

            let mut message: M = from_body(request)?;
            for (name, value) in record.values() {
                if value.is_null() {
                    continue;
                }
                message
                    .assign(name, value.clone())
                    .map_err(|source| BindError::value(name, source))?;
            }
            Ok(message)
        }
    }
}

/// Assembles a message from route and query values alone.
fn from_parameters<M: Message>(plan: &BindingPlan, request: &BindRequest) -> Result<M, BindError> {
    let mut object = serde_json::Map::new();
    for descriptor in &plan.all {
        let raw = request
            .path
            .get(descriptor.name)
            .or_else(|| request.query.get(descriptor.name));
        let value = convert(raw, &descriptor.ty)
            .map_err(|source| BindError::convert(descriptor.name, source))?;
        if !value.is_null() {
            object.insert(descriptor.name.to_string(), value.to_json());
        }
    }

    serde_json::from_value(Value::Object(object)).map_err(|source| BindError::Deserialize { source })
}

/// Deserializes a message from the request body.
fn from_body<M: Message>(request: &BindRequest) -> Result<M, BindError> {
    let Some(body) = &request.body else {
        return Err(BindError::MissingBody);
    };
    serde_json::from_slice(body).map_err(|source| BindError::Deserialize { source })
}

/// Overlays route-segment values onto a body-deserialized instance. Route
/// values win over body values for the same field.
///
/// Names with no matching field are ignored here: they come from the host's
/// generic route bag, and declared-template mismatches were already fatal at
/// registration.
fn overlay_route_values<M: Message>(
    message: &mut M,
    request: &BindRequest,
) -> Result<(), BindError> {
    for (name, raw) in request.path.iter() {
        let Some(field) = M::shape().field(name) else {
            continue;
        };
        let value = convert(Some(raw), &field.ty)
            .map_err(|source| BindError::convert(field.name, source))?;
        message
            .assign(field.name, value)
            .map_err(|source| BindError::value(field.name, source))?;
    }
    Ok(())
}

/// Maps the executed message to a wire outcome.
fn conclude<M: Message>(verb: &Method, mut message: M) -> Result<Outcome, BindError> {
    let type_name = M::shape().type_name();

    if M::HAS_RESULT {
        return match message.take_result() {
            Some(Ok(body)) => {
                let status = if *verb == Method::POST {
                    StatusCode::CREATED
                } else {
                    StatusCode::OK
                };
                Ok(Outcome::with_body(status, body))
            }
            Some(Err(source)) => Err(BindError::ResultSerialization { type_name, source }),
            None => {
                tracing::warn!(message_type = type_name, "declared result was never set");
                Err(BindError::ResultNotSet { type_name })
            }
        };
    }

    let status = if *verb == Method::POST {
        StatusCode::CREATED
    } else {
        StatusCode::NO_CONTENT
    };
    Ok(Outcome::empty(status))
}
