//! Projection synthesis: minimal runtime types for partial binding.
//!
//! A [`Projection`] is synthesized from a descriptor list and exposes exactly
//! those fields - nothing of the message's remaining shape leaks through. It
//! stands in for a nominal runtime-emitted type: a named, validated record
//! whose structure is deterministic for a given descriptor list. Callers may
//! rely on structural shape only, never on identity.

use crate::convert::convert;
use crate::error::{BindError, RegistrationError};
use crate::extract::ParameterDescriptor;
use courier_core::value::FieldValue;
use indexmap::IndexMap;

/// A minimal synthesized type: one named, typed, documented field per
/// descriptor, in descriptor order.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    type_name: String,
    // Keyed by lowercased name for case-insensitive lookup; descriptors
    // keep their canonical names.
    fields: IndexMap<String, ParameterDescriptor>,
}

impl Projection {
    /// Synthesizes a projection from a descriptor list.
    ///
    /// Synthesis is idempotent in structure: the same descriptors (names,
    /// types, order) always produce a field-for-field identical projection.
    ///
    /// # Errors
    ///
    /// A blank `type_name` is a contract violation and fails fast with
    /// [`RegistrationError::EmptyProjectionName`].
    pub fn synthesize(
        type_name: impl Into<String>,
        descriptors: &[ParameterDescriptor],
    ) -> Result<Self, RegistrationError> {
        let type_name = type_name.into();
        if type_name.trim().is_empty() {
            return Err(RegistrationError::EmptyProjectionName);
        }

        let fields = descriptors
            .iter()
            .map(|d| (d.name.to_ascii_lowercase(), d.clone()))
            .collect();

        Ok(Self { type_name, fields })
    }

    /// Returns the projection's type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the projection has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the descriptors in declaration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.fields.values()
    }

    /// Looks up a field's descriptor by name, case-insensitively.
    #[must_use]
    pub fn descriptor(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.fields.get(&name.to_ascii_lowercase())
    }

    /// Creates an empty record of this projection's shape.
    #[must_use]
    pub fn record(&self) -> ProjectionRecord<'_> {
        ProjectionRecord {
            projection: self,
            values: IndexMap::new(),
        }
    }
}

/// A value record of a [`Projection`]'s shape.
///
/// Binding converts raw text through the conversion engine against the
/// field's declared type; reading yields the typed value back. Names outside
/// the projection are errors - the record *is* the minimal type.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionRecord<'a> {
    projection: &'a Projection,
    values: IndexMap<String, FieldValue>,
}

impl ProjectionRecord<'_> {
    /// Binds a raw textual value to the named field, converting it to the
    /// field's declared type.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::UnknownField`] for a name outside the projection
    /// and [`BindError::Convert`] when conversion fails.
    pub fn bind_raw(&mut self, name: &str, raw: Option<&str>) -> Result<(), BindError> {
        let Some(descriptor) = self.projection.descriptor(name) else {
            return Err(BindError::UnknownField {
                name: name.to_string(),
                type_name: self.projection.type_name.clone(),
            });
        };

        let value = convert(raw, &descriptor.ty)
            .map_err(|source| BindError::convert(descriptor.name, source))?;
        self.values
            .insert(descriptor.name.to_ascii_lowercase(), value);
        Ok(())
    }

    /// Reads the named field's value, case-insensitively.
    ///
    /// Returns `None` for fields never bound.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(&name.to_ascii_lowercase())
    }

    /// Returns `(canonical name, value)` pairs in binding order.
    pub fn values(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.values.iter().filter_map(|(key, value)| {
            self.projection
                .descriptor(key)
                .map(|d| (d.name, value))
        })
    }

    /// Returns the number of bound fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing has been bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{route_parameters, ParameterSource};
    use courier_core::shape;
    use courier_core::shape::HasShape;
    use courier_core::value::FieldType;
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Target {
        id: Uuid,
        count: i32,
        label: Option<String>,
    }

    shape! {
        Target {
            id: Uuid => "The unique identifier",
            count: i32,
            label: Option<String>,
        }
    }

    fn descriptors() -> Vec<ParameterDescriptor> {
        route_parameters("/api/{id}/{count}/{label?}", Target::shape()).unwrap()
    }

    #[test]
    fn test_synthesize_preserves_descriptor_order_and_metadata() {
        let projection = Projection::synthesize("TargetRouteParams", &descriptors()).unwrap();

        assert_eq!(projection.type_name(), "TargetRouteParams");
        assert_eq!(projection.len(), 3);

        let names: Vec<_> = projection.descriptors().map(|d| d.name).collect();
        assert_eq!(names, vec!["id", "count", "label"]);

        let id = projection.descriptor("ID").unwrap();
        assert_eq!(id.description, "The unique identifier");
        assert_eq!(id.ty, FieldType::Uuid);
        assert_eq!(id.source, ParameterSource::Route);
    }

    #[test]
    fn test_blank_type_name_fails_fast() {
        assert!(matches!(
            Projection::synthesize("", &descriptors()),
            Err(RegistrationError::EmptyProjectionName)
        ));
        assert!(matches!(
            Projection::synthesize("   ", &descriptors()),
            Err(RegistrationError::EmptyProjectionName)
        ));
    }

    #[test]
    fn test_synthesis_is_structurally_idempotent() {
        let a = Projection::synthesize("P", &descriptors()).unwrap();
        let b = Projection::synthesize("P", &descriptors()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_bind_and_read_round_trip() {
        let id = Uuid::now_v7();
        let projection = Projection::synthesize("P", &descriptors()).unwrap();
        let mut record = projection.record();

        record.bind_raw("Id", Some(&id.to_string())).unwrap();
        record.bind_raw("count", Some("42")).unwrap();
        record.bind_raw("label", None).unwrap();

        assert_eq!(record.get("id"), Some(&FieldValue::Uuid(id)));
        assert_eq!(record.get("COUNT"), Some(&FieldValue::Integer(42)));
        assert_eq!(record.get("label"), Some(&FieldValue::Null));
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn test_bind_unknown_field_is_error() {
        let projection = Projection::synthesize("P", &descriptors()).unwrap();
        let mut record = projection.record();

        let err = record.bind_raw("age", Some("30")).unwrap_err();
        assert!(matches!(err, BindError::UnknownField { .. }));
        assert!(err.to_string().contains("age"));
        assert!(err.to_string().contains("P"));
    }

    #[test]
    fn test_bind_converts_against_declared_type() {
        let projection = Projection::synthesize("P", &descriptors()).unwrap();
        let mut record = projection.record();

        let err = record.bind_raw("count", Some("abc")).unwrap_err();
        assert!(matches!(err, BindError::Convert { .. }));

        // Required field refuses null.
        assert!(record.bind_raw("count", None).is_err());
    }

    #[test]
    fn test_values_yield_canonical_names() {
        let projection = Projection::synthesize("P", &descriptors()).unwrap();
        let mut record = projection.record();
        record.bind_raw("COUNT", Some("5")).unwrap();

        let pairs: Vec<_> = record.values().collect();
        assert_eq!(pairs, vec![("count", &FieldValue::Integer(5))]);
    }

    #[test]
    fn test_empty_descriptor_list_yields_empty_projection() {
        let projection = Projection::synthesize("Empty", &[]).unwrap();
        assert!(projection.is_empty());
        assert!(projection.record().is_empty());
    }
}
