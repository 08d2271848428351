//! Outbound URI construction: placeholder substitution and the leftover
//! query appendix.

use crate::error::OutboundError;
use courier_core::message::FieldAccess;
use courier_core::shape::HasShape;
use courier_route::parse_template;

/// Substitutes each `{name}` placeholder in the template with the matching
/// field's wire text.
///
/// Constraint and optional markers inside placeholders are permitted and
/// ignored; the field itself must exist and be non-null.
///
/// # Errors
///
/// Returns [`OutboundError::MissingField`] when no field matches a
/// placeholder and [`OutboundError::NullField`] when the field is null.
pub fn substitute_placeholders<M>(template: &str, message: &M) -> Result<String, OutboundError>
where
    M: HasShape + FieldAccess,
{
    let mut uri = template.to_string();
    for token in parse_template(template) {
        let Some(value) = message.read(&token.name) else {
            return Err(OutboundError::MissingField {
                field: token.name,
                type_name: M::shape().type_name(),
            });
        };
        if value.is_null() {
            return Err(OutboundError::NullField {
                field: token.name,
                type_name: M::shape().type_name(),
            });
        }
        uri = uri.replacen(&token.raw, &value.to_string(), 1);
    }
    Ok(uri)
}

/// Builds an outbound URI: placeholder substitution plus every unconsumed,
/// non-null field appended as a URL-encoded query pair.
///
/// Placeholder consumption is case-insensitive; query order is the shape's
/// declaration order, which makes output deterministic. Timestamps render
/// as RFC 3339.
///
/// # Errors
///
/// Propagates [`substitute_placeholders`] failures and query-encoding
/// failures.
///
/// # Example
///
/// ```rust,ignore
/// // With fields Id=42 (consumed), Name="John", Age=30:
/// let uri = build_uri("/api/{Id}", &message)?;
/// assert_eq!(uri, "/api/42?Name=John&Age=30");
/// ```
pub fn build_uri<M>(template: &str, message: &M) -> Result<String, OutboundError>
where
    M: HasShape + FieldAccess,
{
    let uri = substitute_placeholders(template, message)?;

    let consumed: Vec<String> = parse_template(template)
        .into_iter()
        .map(|t| t.name)
        .collect();

    let mut pairs: Vec<(&str, String)> = Vec::new();
    for field in M::shape().fields() {
        if consumed.iter().any(|name| name.eq_ignore_ascii_case(field.name)) {
            continue;
        }
        let Some(value) = message.read(field.name) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        pairs.push((field.name, value.to_string()));
    }

    if pairs.is_empty() {
        return Ok(uri);
    }

    let query =
        serde_urlencoded::to_string(&pairs).map_err(|source| OutboundError::Encode { source })?;
    Ok(format!("{uri}?{query}"))
}
