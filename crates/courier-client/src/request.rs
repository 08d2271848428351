//! Outbound request assembly from a message's declared routes.

use crate::error::OutboundError;
use crate::uri::{build_uri, substitute_placeholders};
use bytes::Bytes;
use courier_core::message::{DeclaredRoutes, Message};
use courier_core::shape::HasShape;
use http::header::CONTENT_TYPE;
use http::{Method, Request};

/// Assembles an outbound `http::Request` for a message, using the route it
/// declares for the given verb.
///
/// Body-carrying verbs (POST, PUT, PATCH) substitute route placeholders only
/// and serialize the whole message as a JSON body - every field travels in
/// the payload, so no query appendix is added. GET appends unconsumed fields
/// as a query string and sends no body; DELETE substitutes placeholders only.
///
/// Transport is the caller's concern: hand the request to any HTTP client.
///
/// # Errors
///
/// Fails when the message declares no route for the verb, when a placeholder
/// field is missing or null, or when serialization fails.
pub fn outbound_request<M>(verb: &Method, message: &M) -> Result<Request<Bytes>, OutboundError>
where
    M: Message + DeclaredRoutes,
{
    let route = M::routes()
        .into_iter()
        .find(|route| route.verb == *verb)
        .ok_or_else(|| OutboundError::NoDeclaredRoute {
            verb: verb.clone(),
            type_name: M::shape().type_name(),
        })?;

    if *verb == Method::POST || *verb == Method::PUT || *verb == Method::PATCH {
        let uri = substitute_placeholders(route.template, message)?;
        let body = serde_json::to_vec(message).map_err(|source| OutboundError::Body { source })?;
        return Request::builder()
            .method(verb.clone())
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Bytes::from(body))
            .map_err(|source| OutboundError::Http { source });
    }

    let uri = if *verb == Method::GET {
        build_uri(route.template, message)?
    } else {
        substitute_placeholders(route.template, message)?
    };

    Request::builder()
        .method(verb.clone())
        .uri(uri)
        .body(Bytes::new())
        .map_err(|source| OutboundError::Http { source })
}
