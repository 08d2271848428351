//! Field types and typed field values.
//!
//! Courier never reflects over Rust types at runtime. Instead, every bindable
//! field is described by a [`FieldType`] and carried as a [`FieldValue`], and
//! the mapping between a Rust field and this model is provided by the
//! [`BindableField`] trait. [`bindable_enum!`] implements the trait for
//! fieldless enums with case-sensitive member-name mapping.

use crate::error::ValueError;
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use std::fmt;
use uuid::Uuid;

/// The declared type of a bindable message field.
///
/// `Optional` wraps the underlying type; all conversion logic unwraps it
/// first. Enumeration members are the exact, case-sensitive names used on
/// the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// A textual value.
    Text,
    /// A signed integer (stored as `i64`; narrower fields range-check on
    /// assignment).
    Integer,
    /// A binary floating-point value.
    Float,
    /// An exact decimal value.
    Decimal,
    /// A boolean value.
    Boolean,
    /// A single character.
    Character,
    /// A UUID.
    Uuid,
    /// A UTC timestamp.
    DateTime,
    /// An enumerated value parsed by exact member-name match.
    Enumeration {
        /// The enum type's name, used in diagnostics.
        type_name: &'static str,
        /// Member names in declaration order.
        members: &'static [&'static str],
    },
    /// A nullable wrapper around another field type.
    Optional(Box<FieldType>),
}

impl FieldType {
    /// Returns true if this type accepts a null value.
    #[must_use]
    pub fn accepts_null(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// Unwraps `Optional` layers to the underlying type.
    #[must_use]
    pub fn underlying(&self) -> &FieldType {
        match self {
            Self::Optional(inner) => inner.underlying(),
            other => other,
        }
    }

    /// A short name for diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Character => "character",
            Self::Uuid => "uuid",
            Self::DateTime => "date-time",
            Self::Enumeration { .. } => "enumeration",
            Self::Optional(_) => "optional",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enumeration { type_name, .. } => write!(f, "enumeration {type_name}"),
            Self::Optional(inner) => write!(f, "optional {inner}"),
            other => write!(f, "{}", other.kind_name()),
        }
    }
}

/// A typed runtime value for one message field.
///
/// `Null` is the absence of a value and is only ever produced for fields
/// whose declared type accepts null.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// No value.
    Null,
    /// A textual value.
    Text(String),
    /// A signed integer value.
    Integer(i64),
    /// A floating-point value.
    Float(f64),
    /// An exact decimal value.
    Decimal(Decimal),
    /// A boolean value.
    Boolean(bool),
    /// A single character.
    Character(char),
    /// A UUID value.
    Uuid(Uuid),
    /// A UTC timestamp.
    DateTime(DateTime<Utc>),
    /// An enumeration member, by its exact name.
    Member(&'static str),
}

impl FieldValue {
    /// Returns true if the value is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// A short name for diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Text(_) => "text",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Decimal(_) => "decimal",
            Self::Boolean(_) => "boolean",
            Self::Character(_) => "character",
            Self::Uuid(_) => "uuid",
            Self::DateTime(_) => "date-time",
            Self::Member(_) => "enumeration",
        }
    }

    /// Converts the value to its JSON representation.
    ///
    /// Decimals serialize as strings to preserve exactness; timestamps use
    /// RFC 3339.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::Integer(i) => serde_json::Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::Decimal(d) => serde_json::Value::String(d.to_string()),
            Self::Boolean(b) => serde_json::Value::Bool(*b),
            Self::Character(c) => serde_json::Value::String(c.to_string()),
            Self::Uuid(u) => serde_json::Value::String(u.to_string()),
            Self::DateTime(dt) => {
                serde_json::Value::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Self::Member(m) => serde_json::Value::String((*m).to_string()),
        }
    }
}

/// The wire-text form of a value. Timestamps render as RFC 3339 (fixed and
/// sortable); null renders as the empty string.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Text(s) => write!(f, "{s}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Character(c) => write!(f, "{c}"),
            Self::Uuid(u) => write!(f, "{u}"),
            Self::DateTime(dt) => write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::Member(m) => write!(f, "{m}"),
        }
    }
}

/// Maps a Rust field type to its [`FieldType`] and converts to/from
/// [`FieldValue`].
///
/// Implementations exist for the textual, numeric, boolean, character, UUID,
/// timestamp, and decimal primitives, for `Option<T>` over any of them, and
/// (via [`bindable_enum!`]) for fieldless enums.
pub trait BindableField: Sized {
    /// The declared field type for this Rust type.
    fn field_type() -> FieldType;

    /// Converts a typed value into this Rust type.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError`] on a kind mismatch, an out-of-range integer, or
    /// a null value for a non-optional type.
    fn from_value(value: FieldValue) -> Result<Self, ValueError>;

    /// Converts this Rust value into a typed field value.
    fn to_value(&self) -> FieldValue;
}

impl BindableField for String {
    fn field_type() -> FieldType {
        FieldType::Text
    }

    fn from_value(value: FieldValue) -> Result<Self, ValueError> {
        match value {
            FieldValue::Text(s) => Ok(s),
            FieldValue::Null => Err(ValueError::unexpected_null("text")),
            other => Err(ValueError::mismatch("text", other.kind_name())),
        }
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Text(self.clone())
    }
}

macro_rules! narrow_integer {
    ($($ty:ty),+) => {
        $(
            impl BindableField for $ty {
                fn field_type() -> FieldType {
                    FieldType::Integer
                }

                fn from_value(value: FieldValue) -> Result<Self, ValueError> {
                    match value {
                        FieldValue::Integer(i) => <$ty>::try_from(i)
                            .map_err(|_| ValueError::out_of_range(i, stringify!($ty))),
                        FieldValue::Null => Err(ValueError::unexpected_null("integer")),
                        other => Err(ValueError::mismatch("integer", other.kind_name())),
                    }
                }

                fn to_value(&self) -> FieldValue {
                    FieldValue::Integer(i64::from(*self))
                }
            }
        )+
    };
}

narrow_integer!(i16, i32, u16, u32);

impl BindableField for i64 {
    fn field_type() -> FieldType {
        FieldType::Integer
    }

    fn from_value(value: FieldValue) -> Result<Self, ValueError> {
        match value {
            FieldValue::Integer(i) => Ok(i),
            FieldValue::Null => Err(ValueError::unexpected_null("integer")),
            other => Err(ValueError::mismatch("integer", other.kind_name())),
        }
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Integer(*self)
    }
}

impl BindableField for u64 {
    fn field_type() -> FieldType {
        FieldType::Integer
    }

    fn from_value(value: FieldValue) -> Result<Self, ValueError> {
        match value {
            FieldValue::Integer(i) => {
                u64::try_from(i).map_err(|_| ValueError::out_of_range(i, "u64"))
            }
            FieldValue::Null => Err(ValueError::unexpected_null("integer")),
            other => Err(ValueError::mismatch("integer", other.kind_name())),
        }
    }

    fn to_value(&self) -> FieldValue {
        // Values above i64::MAX saturate.
        FieldValue::Integer(i64::try_from(*self).unwrap_or(i64::MAX))
    }
}

impl BindableField for f64 {
    fn field_type() -> FieldType {
        FieldType::Float
    }

    fn from_value(value: FieldValue) -> Result<Self, ValueError> {
        match value {
            FieldValue::Float(v) => Ok(v),
            FieldValue::Null => Err(ValueError::unexpected_null("float")),
            other => Err(ValueError::mismatch("float", other.kind_name())),
        }
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Float(*self)
    }
}

impl BindableField for Decimal {
    fn field_type() -> FieldType {
        FieldType::Decimal
    }

    fn from_value(value: FieldValue) -> Result<Self, ValueError> {
        match value {
            FieldValue::Decimal(d) => Ok(d),
            FieldValue::Null => Err(ValueError::unexpected_null("decimal")),
            other => Err(ValueError::mismatch("decimal", other.kind_name())),
        }
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Decimal(*self)
    }
}

impl BindableField for bool {
    fn field_type() -> FieldType {
        FieldType::Boolean
    }

    fn from_value(value: FieldValue) -> Result<Self, ValueError> {
        match value {
            FieldValue::Boolean(b) => Ok(b),
            FieldValue::Null => Err(ValueError::unexpected_null("boolean")),
            other => Err(ValueError::mismatch("boolean", other.kind_name())),
        }
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Boolean(*self)
    }
}

impl BindableField for char {
    fn field_type() -> FieldType {
        FieldType::Character
    }

    fn from_value(value: FieldValue) -> Result<Self, ValueError> {
        match value {
            FieldValue::Character(c) => Ok(c),
            FieldValue::Null => Err(ValueError::unexpected_null("character")),
            other => Err(ValueError::mismatch("character", other.kind_name())),
        }
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Character(*self)
    }
}

impl BindableField for Uuid {
    fn field_type() -> FieldType {
        FieldType::Uuid
    }

    fn from_value(value: FieldValue) -> Result<Self, ValueError> {
        match value {
            FieldValue::Uuid(u) => Ok(u),
            FieldValue::Null => Err(ValueError::unexpected_null("uuid")),
            other => Err(ValueError::mismatch("uuid", other.kind_name())),
        }
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Uuid(*self)
    }
}

impl BindableField for DateTime<Utc> {
    fn field_type() -> FieldType {
        FieldType::DateTime
    }

    fn from_value(value: FieldValue) -> Result<Self, ValueError> {
        match value {
            FieldValue::DateTime(dt) => Ok(dt),
            FieldValue::Null => Err(ValueError::unexpected_null("date-time")),
            other => Err(ValueError::mismatch("date-time", other.kind_name())),
        }
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::DateTime(*self)
    }
}

impl<T: BindableField> BindableField for Option<T> {
    fn field_type() -> FieldType {
        FieldType::Optional(Box::new(T::field_type()))
    }

    fn from_value(value: FieldValue) -> Result<Self, ValueError> {
        match value {
            FieldValue::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn to_value(&self) -> FieldValue {
        self.as_ref().map_or(FieldValue::Null, BindableField::to_value)
    }
}

/// Declares a fieldless enum and implements [`BindableField`] for it.
///
/// Member names are matched exactly and case-sensitively on the wire, in
/// both directions.
///
/// # Example
///
/// ```rust
/// use courier_core::bindable_enum;
/// use courier_core::value::{BindableField, FieldType, FieldValue};
///
/// bindable_enum! {
///     /// Sort direction for listing queries.
///     #[derive(Debug, Clone, Copy, PartialEq, Eq)]
///     pub enum SortOrder {
///         Ascending,
///         Descending,
///     }
/// }
///
/// assert_eq!(SortOrder::MEMBERS, &["Ascending", "Descending"]);
/// let value = SortOrder::Descending.to_value();
/// assert_eq!(value, FieldValue::Member("Descending"));
/// assert_eq!(SortOrder::from_value(value).unwrap(), SortOrder::Descending);
/// ```
#[macro_export]
macro_rules! bindable_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Member names in declaration order.
            $vis const MEMBERS: &'static [&'static str] = &[$(stringify!($variant)),+];

            /// Returns the exact member name of this value.
            #[must_use]
            $vis fn member_name(&self) -> &'static str {
                match self {
                    $( Self::$variant => stringify!($variant) ),+
                }
            }
        }

        impl $crate::value::BindableField for $name {
            fn field_type() -> $crate::value::FieldType {
                $crate::value::FieldType::Enumeration {
                    type_name: stringify!($name),
                    members: Self::MEMBERS,
                }
            }

            fn from_value(
                value: $crate::value::FieldValue,
            ) -> Result<Self, $crate::error::ValueError> {
                match value {
                    $crate::value::FieldValue::Member(member) => match member {
                        $( _ if member == stringify!($variant) => Ok(Self::$variant), )+
                        other => Err($crate::error::ValueError::unknown_member(
                            stringify!($name),
                            other,
                        )),
                    },
                    $crate::value::FieldValue::Null => {
                        Err($crate::error::ValueError::unexpected_null("enumeration"))
                    }
                    other => Err($crate::error::ValueError::mismatch(
                        "enumeration",
                        other.kind_name(),
                    )),
                }
            }

            fn to_value(&self) -> $crate::value::FieldValue {
                $crate::value::FieldValue::Member(self.member_name())
            }
        }
    };
}
