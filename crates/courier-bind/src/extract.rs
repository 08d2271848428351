//! Parameter extraction: correlating route templates and shapes into
//! descriptors.
//!
//! A [`ParameterDescriptor`] is the resolved binding metadata for one field:
//! its canonical name, declared type, documentation, optionality, opaque
//! constraint, and source. Route-sourced descriptors come from template
//! tokens; query-sourced descriptors come from the shape's remaining fields.

use crate::error::RegistrationError;
use courier_core::shape::Shape;
use courier_core::value::FieldType;
use courier_route::parse_template;

/// Where a parameter's raw value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterSource {
    /// A route path segment.
    Route,
    /// A query-string value.
    Query,
}

/// Resolved binding metadata for one bindable field.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    /// The canonical field name from the shape (not the token's casing).
    pub name: &'static str,
    /// The field's declared type.
    pub ty: FieldType,
    /// The best-available description for the field.
    pub description: &'static str,
    /// Whether a value may be omitted.
    ///
    /// Route-sourced: the token's `?` marker. Query-sourced: structural -
    /// nullable types and plain textual fields are optional.
    pub optional: bool,
    /// The opaque constraint text from the token, if any.
    pub constraint: Option<String>,
    /// The parameter's source.
    pub source: ParameterSource,
}

/// Extracts Route-sourced descriptors for a template against a shape.
///
/// Every template token must match exactly one field, case-insensitively;
/// a token with no matching field is a hard registration failure naming
/// both the token and the type. Descriptor order is template order.
///
/// # Errors
///
/// Returns [`RegistrationError::TemplateMismatch`] for an unmatched token and
/// [`RegistrationError::DuplicateToken`] when a token name repeats.
pub fn route_parameters(
    template: &str,
    shape: &Shape,
) -> Result<Vec<ParameterDescriptor>, RegistrationError> {
    let tokens = parse_template(template);
    let mut descriptors = Vec::with_capacity(tokens.len());

    for token in tokens {
        let Some(field) = shape.field(&token.name) else {
            return Err(RegistrationError::TemplateMismatch {
                token: token.name,
                type_name: shape.type_name(),
            });
        };

        if descriptors
            .iter()
            .any(|d: &ParameterDescriptor| d.name.eq_ignore_ascii_case(field.name))
        {
            return Err(RegistrationError::DuplicateToken {
                token: token.name,
                template: template.to_string(),
            });
        }

        descriptors.push(ParameterDescriptor {
            name: field.name,
            ty: field.ty.clone(),
            description: shape.describe(field.name),
            optional: token.optional,
            constraint: token.constraint,
            source: ParameterSource::Route,
        });
    }

    Ok(descriptors)
}

/// Extracts Query-sourced descriptors for every non-excluded field of a
/// shape, in declaration order.
///
/// Optionality is structural: a nullable declared type is optional, and so
/// is any plain textual field regardless of nullability - strings always
/// bind as optional. That convention is deliberate and load-bearing; callers
/// must not tighten it.
#[must_use]
pub fn query_parameters(shape: &Shape, exclude: &[&str]) -> Vec<ParameterDescriptor> {
    shape
        .fields()
        .iter()
        .filter(|field| {
            !exclude
                .iter()
                .any(|name| name.eq_ignore_ascii_case(field.name))
        })
        .map(|field| ParameterDescriptor {
            name: field.name,
            ty: field.ty.clone(),
            description: shape.describe(field.name),
            optional: field.ty.accepts_null() || matches!(field.ty, FieldType::Text),
            constraint: None,
            source: ParameterSource::Query,
        })
        .collect()
}

/// Extracts the union of route and query descriptors: route descriptors
/// first, then query descriptors for the fields the template did not cover.
///
/// # Errors
///
/// Propagates the route-extraction failures of [`route_parameters`].
pub fn all_parameters(
    template: &str,
    shape: &Shape,
) -> Result<Vec<ParameterDescriptor>, RegistrationError> {
    let mut descriptors = route_parameters(template, shape)?;
    let covered: Vec<&str> = descriptors.iter().map(|d| d.name).collect();
    descriptors.extend(query_parameters(shape, &covered));
    Ok(descriptors)
}
