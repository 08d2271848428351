//! Route template tokenization.
//!
//! This module scans a route template for `{...}` placeholder spans and
//! splits each span into its name, optional constraint, and optional marker.
//! No validation against any message shape occurs at this stage.

/// A single placeholder token discovered in a route template.
///
/// For the template `/api/{id:guid?}` the token is:
///
/// ```rust
/// use courier_route::parse_template;
///
/// let tokens = parse_template("/api/{id:guid?}");
/// assert_eq!(tokens.len(), 1);
/// assert_eq!(tokens[0].name, "id");
/// assert_eq!(tokens[0].constraint.as_deref(), Some("guid"));
/// assert!(tokens[0].optional);
/// assert_eq!(tokens[0].raw, "{id:guid?}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateToken {
    /// The full placeholder span as it appears in the template, braces included.
    pub raw: String,
    /// The placeholder name (text before any `:` or `?`).
    pub name: String,
    /// The constraint text after `:`, with a trailing `?` stripped.
    ///
    /// Constraints are opaque passthrough; Courier never interprets them.
    pub constraint: Option<String>,
    /// Whether the token carries the `?` optional marker (on the name or on
    /// the constraint segment).
    pub optional: bool,
}

/// Parses a route template into its ordered placeholder tokens.
///
/// Tokens are discovered left to right by scanning for `{...}` spans. A
/// token body is split on `:` first; the `?` marker is then stripped from
/// whichever segment bears it. A template without placeholders yields an
/// empty list, not an error.
///
/// # Example
///
/// ```rust
/// use courier_route::parse_template;
///
/// let tokens = parse_template("/orgs/{orgId}/users/{userId:int?}");
/// let names: Vec<_> = tokens.iter().map(|t| t.name.as_str()).collect();
/// assert_eq!(names, vec!["orgId", "userId"]);
/// ```
#[must_use]
pub fn parse_template(template: &str) -> Vec<TemplateToken> {
    let mut tokens = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let Some(close_rel) = rest[open + 1..].find('}') else {
            break;
        };
        let close = open + 1 + close_rel;
        let body = &rest[open + 1..close];
        tokens.push(parse_token(body));
        rest = &rest[close + 1..];
    }

    tokens
}

/// Splits a token body into name / constraint / optional marker.
fn parse_token(body: &str) -> TemplateToken {
    let optional = body.contains('?');
    let constraint = body
        .split_once(':')
        .map(|(_, c)| c.trim_end_matches('?').to_string());
    let name = body
        .split(|c| c == ':' || c == '?')
        .next()
        .unwrap_or_default()
        .to_string();

    TemplateToken {
        raw: format!("{{{body}}}"),
        name,
        constraint,
        optional,
    }
}
