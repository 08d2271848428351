//! The conversion engine: raw text to typed field values.
//!
//! All parsing is culture-invariant so results are reproducible across
//! environments: numbers use Rust's standard grammar, timestamps use
//! RFC 3339 with plain-date and naive-datetime fallbacks.

use crate::error::ConvertError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use courier_core::value::{FieldType, FieldValue};
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

/// Converts a raw textual value into a typed value for the declared type.
///
/// - Missing, empty, or whitespace-only input becomes `Null` when the type
///   accepts null, and the distinct null-into-non-nullable error otherwise.
/// - `Optional` wrappers unwrap before any parsing.
/// - Enumerations parse by exact, case-sensitive member-name match and fail
///   with the distinct invalid-member error.
/// - Everything else parses invariantly, failing with a generic conversion
///   error that names the raw value and the target type.
///
/// # Example
///
/// ```rust
/// use courier_bind::convert;
/// use courier_core::value::{FieldType, FieldValue};
///
/// assert_eq!(
///     convert(Some("123"), &FieldType::Integer).unwrap(),
///     FieldValue::Integer(123)
/// );
/// assert_eq!(
///     convert(Some(""), &FieldType::Optional(Box::new(FieldType::Integer))).unwrap(),
///     FieldValue::Null
/// );
/// assert!(convert(None, &FieldType::Integer).is_err());
/// ```
pub fn convert(raw: Option<&str>, ty: &FieldType) -> Result<FieldValue, ConvertError> {
    let Some(text) = raw.filter(|s| !s.trim().is_empty()) else {
        if ty.accepts_null() {
            return Ok(FieldValue::Null);
        }
        return Err(ConvertError::null_into_non_nullable(ty.clone()));
    };

    convert_text(text, ty.underlying())
}

/// Parses non-empty text as the (already unwrapped) underlying type.
fn convert_text(text: &str, ty: &FieldType) -> Result<FieldValue, ConvertError> {
    let failure = || ConvertError::conversion(text, ty.clone());

    match ty {
        FieldType::Text => Ok(FieldValue::Text(text.to_string())),
        FieldType::Integer => text
            .trim()
            .parse::<i64>()
            .map(FieldValue::Integer)
            .map_err(|_| failure()),
        FieldType::Float => text
            .trim()
            .parse::<f64>()
            .map(FieldValue::Float)
            .map_err(|_| failure()),
        FieldType::Decimal => Decimal::from_str(text.trim())
            .map(FieldValue::Decimal)
            .map_err(|_| failure()),
        FieldType::Boolean => parse_boolean(text).map(FieldValue::Boolean).ok_or_else(failure),
        FieldType::Character => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(FieldValue::Character(c)),
                _ => Err(failure()),
            }
        }
        FieldType::Uuid => Uuid::parse_str(text.trim())
            .map(FieldValue::Uuid)
            .map_err(|_| failure()),
        FieldType::DateTime => parse_date_time(text.trim())
            .map(FieldValue::DateTime)
            .ok_or_else(failure),
        FieldType::Enumeration { type_name, members } => members
            .iter()
            .copied()
            .find(|member| *member == text)
            .map(FieldValue::Member)
            .ok_or_else(|| ConvertError::invalid_enum_member(text, type_name)),
        FieldType::Optional(inner) => convert_text(text, inner),
    }
}

/// Boolean parsing accepts `true`/`false` in any casing (invariant).
fn parse_boolean(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Timestamp parsing: RFC 3339 first, then a naive datetime, then a plain
/// date at midnight. Everything is interpreted as UTC.
fn parse_date_time(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_core::bindable_enum;
    use courier_core::value::BindableField;

    bindable_enum! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum TestEnum {
            EnumValue,
            AnotherValue,
        }
    }

    fn optional(ty: FieldType) -> FieldType {
        FieldType::Optional(Box::new(ty))
    }

    #[test]
    fn test_integer_conversions() {
        assert_eq!(
            convert(Some("123"), &FieldType::Integer).unwrap(),
            FieldValue::Integer(123)
        );
        assert_eq!(
            convert(Some("123"), &optional(FieldType::Integer)).unwrap(),
            FieldValue::Integer(123)
        );
        assert_eq!(
            convert(None, &optional(FieldType::Integer)).unwrap(),
            FieldValue::Null
        );
    }

    #[test]
    fn test_empty_string_to_nullable_is_null() {
        assert_eq!(
            convert(Some(""), &optional(FieldType::Integer)).unwrap(),
            FieldValue::Null
        );
        assert_eq!(
            convert(Some("   "), &optional(FieldType::Text)).unwrap(),
            FieldValue::Null
        );
    }

    #[test]
    fn test_null_into_non_nullable_is_distinct_error() {
        let err = convert(None, &FieldType::Integer).unwrap_err();
        assert!(matches!(err, ConvertError::NullIntoNonNullable { .. }));

        let err = convert(Some("  "), &FieldType::Boolean).unwrap_err();
        assert!(matches!(err, ConvertError::NullIntoNonNullable { .. }));
    }

    #[test]
    fn test_boolean_conversions() {
        assert_eq!(
            convert(Some("true"), &FieldType::Boolean).unwrap(),
            FieldValue::Boolean(true)
        );
        assert_eq!(
            convert(Some("False"), &optional(FieldType::Boolean)).unwrap(),
            FieldValue::Boolean(false)
        );
        assert!(convert(Some("yes"), &FieldType::Boolean).is_err());
    }

    #[test]
    fn test_float_and_decimal_conversions() {
        assert_eq!(
            convert(Some("123.45"), &FieldType::Float).unwrap(),
            FieldValue::Float(123.45)
        );
        let expected: Decimal = "123.45".parse().unwrap();
        assert_eq!(
            convert(Some("123.45"), &FieldType::Decimal).unwrap(),
            FieldValue::Decimal(expected)
        );
        assert_eq!(
            convert(Some("123.45"), &optional(FieldType::Decimal)).unwrap(),
            FieldValue::Decimal(expected)
        );
    }

    #[test]
    fn test_character_conversions() {
        assert_eq!(
            convert(Some("c"), &FieldType::Character).unwrap(),
            FieldValue::Character('c')
        );
        assert!(convert(Some("cc"), &FieldType::Character).is_err());
    }

    #[test]
    fn test_date_conversions() {
        let plain = convert(Some("2023-12-25"), &FieldType::DateTime).unwrap();
        let FieldValue::DateTime(dt) = plain else {
            panic!("expected a timestamp");
        };
        assert_eq!(dt.to_rfc3339(), "2023-12-25T00:00:00+00:00");

        let rfc = convert(Some("2023-12-25T10:30:00Z"), &FieldType::DateTime).unwrap();
        let FieldValue::DateTime(dt) = rfc else {
            panic!("expected a timestamp");
        };
        assert_eq!(dt.to_rfc3339(), "2023-12-25T10:30:00+00:00");

        let naive = convert(Some("2023-12-25T10:30:00"), &FieldType::DateTime).unwrap();
        assert!(matches!(naive, FieldValue::DateTime(_)));
    }

    #[test]
    fn test_uuid_conversion() {
        let id = Uuid::now_v7();
        assert_eq!(
            convert(Some(&id.to_string()), &FieldType::Uuid).unwrap(),
            FieldValue::Uuid(id)
        );
        assert!(convert(Some("not-a-uuid"), &FieldType::Uuid).is_err());
    }

    #[test]
    fn test_enum_exact_member_match() {
        let ty = TestEnum::field_type();
        assert_eq!(
            convert(Some("EnumValue"), &ty).unwrap(),
            FieldValue::Member("EnumValue")
        );
        assert_eq!(
            convert(Some("EnumValue"), &optional(ty)).unwrap(),
            FieldValue::Member("EnumValue")
        );
    }

    #[test]
    fn test_enum_match_is_case_sensitive() {
        let err = convert(Some("enumvalue"), &TestEnum::field_type()).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidEnumMember { .. }));
    }

    #[test]
    fn test_invalid_enum_is_not_generic_conversion_error() {
        let err = convert(Some("InvalidValue"), &TestEnum::field_type()).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidEnumMember { .. }));
        assert!(err.to_string().contains("InvalidValue"));
        assert!(err.to_string().contains("TestEnum"));
    }

    #[test]
    fn test_generic_conversion_error_names_value_and_type() {
        let err = convert(Some("abc"), &FieldType::Integer).unwrap_err();
        assert!(matches!(err, ConvertError::Conversion { .. }));
        assert!(err.to_string().contains("'abc'"));
        assert!(err.to_string().contains("integer"));
    }
}
