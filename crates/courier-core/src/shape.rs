//! Message shapes: the declared field and constructor-parameter manifest.
//!
//! A [`Shape`] is the explicit replacement for runtime reflection: it lists a
//! message type's bindable fields (name, declared type, description) and,
//! independently, its documented constructor parameters. Both are consulted
//! for description resolution, with field-level documentation taking
//! priority.
//!
//! Shapes are normally declared with the [`shape!`](crate::shape!) macro,
//! which also implements [`FieldAccess`](crate::message::FieldAccess) so the
//! binding engine can read and assign fields by name.

use crate::value::FieldType;

/// One bindable field of a message shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// The field's canonical name.
    pub name: &'static str,
    /// The field's declared type.
    pub ty: FieldType,
    /// Field-level documentation; empty when absent.
    pub description: &'static str,
}

/// One documented constructor parameter of a message shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDef {
    /// The parameter's name.
    pub name: &'static str,
    /// Parameter-level documentation; empty when absent.
    pub description: &'static str,
}

/// The declared shape of a message type.
///
/// Field order is declaration order and is observable: query-parameter
/// extraction and outbound query strings both follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    type_name: &'static str,
    fields: Vec<FieldDef>,
    constructor: Vec<ParamDef>,
}

impl Shape {
    /// Starts building a shape for the named type.
    #[must_use]
    pub fn builder(type_name: &'static str) -> ShapeBuilder {
        ShapeBuilder {
            type_name,
            fields: Vec::new(),
            constructor: Vec::new(),
        }
    }

    /// Returns the message type's name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Returns the documented constructor parameters in declaration order.
    #[must_use]
    pub fn constructor_params(&self) -> &[ParamDef] {
        &self.constructor
    }

    /// Looks up a field by name, case-insensitively.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Looks up a constructor parameter by name, case-insensitively.
    #[must_use]
    pub fn constructor_param(&self, name: &str) -> Option<&ParamDef> {
        self.constructor
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Resolves the best-available description for a field name.
    ///
    /// Field-level documentation wins over a same-named constructor
    /// parameter's documentation; when neither is present the result is the
    /// empty string. This priority order is part of the contract.
    #[must_use]
    pub fn describe(&self, name: &str) -> &'static str {
        if let Some(field) = self.field(name) {
            if !field.description.is_empty() {
                return field.description;
            }
        }
        if let Some(param) = self.constructor_param(name) {
            if !param.description.is_empty() {
                return param.description;
            }
        }
        ""
    }
}

/// Builder for [`Shape`], used by the [`shape!`](crate::shape!) macro and in
/// tests that assemble shapes by hand.
#[derive(Debug)]
pub struct ShapeBuilder {
    type_name: &'static str,
    fields: Vec<FieldDef>,
    constructor: Vec<ParamDef>,
}

impl ShapeBuilder {
    /// Adds a field typed after `T`, with a description (pass `""` for none).
    #[must_use]
    pub fn field<T: crate::value::BindableField>(
        mut self,
        name: &'static str,
        description: &'static str,
    ) -> Self {
        self.fields.push(FieldDef {
            name,
            ty: T::field_type(),
            description,
        });
        self
    }

    /// Adds a field with an explicit declared type.
    #[must_use]
    pub fn field_of(
        mut self,
        name: &'static str,
        ty: FieldType,
        description: &'static str,
    ) -> Self {
        self.fields.push(FieldDef {
            name,
            ty,
            description,
        });
        self
    }

    /// Adds a documented constructor parameter.
    #[must_use]
    pub fn constructor_param(mut self, name: &'static str, description: &'static str) -> Self {
        self.constructor.push(ParamDef { name, description });
        self
    }

    /// Finishes the shape.
    #[must_use]
    pub fn build(self) -> Shape {
        Shape {
            type_name: self.type_name,
            fields: self.fields,
            constructor: self.constructor,
        }
    }
}

/// Access to a message type's static [`Shape`].
pub trait HasShape {
    /// Returns the declared shape, built once and cached.
    fn shape() -> &'static Shape;
}

/// Declares the shape of a message type and wires up field access.
///
/// The macro takes an explicit field manifest - names, Rust types, and
/// optional `=> "description"` documentation - plus an optional
/// `constructor { .. }` block documenting construction parameters. It
/// implements [`HasShape`] and [`FieldAccess`](crate::message::FieldAccess)
/// for the type; field types are checked against the struct's real fields at
/// compile time through the generated accessors.
///
/// # Example
///
/// ```rust
/// use courier_core::shape;
/// use courier_core::shape::HasShape;
/// use serde::{Deserialize, Serialize};
/// use uuid::Uuid;
///
/// #[derive(Debug, Default, Serialize, Deserialize)]
/// pub struct DeactivateCustomer {
///     pub id: Uuid,
///     pub reason: Option<String>,
/// }
///
/// shape! {
///     DeactivateCustomer {
///         id: Uuid => "Identifier of the customer to deactivate",
///         reason: Option<String>,
///     }
///     constructor {
///         id: "assigned when the customer record was created",
///     }
/// }
///
/// let shape = DeactivateCustomer::shape();
/// assert_eq!(shape.type_name(), "DeactivateCustomer");
/// assert_eq!(shape.describe("id"), "Identifier of the customer to deactivate");
/// ```
#[macro_export]
macro_rules! shape {
    (
        $ty:ident {
            $( $fname:ident : $ftype:ty $( => $fdoc:literal )? ),* $(,)?
        }
        $( constructor {
            $( $pname:ident : $pdoc:literal ),* $(,)?
        } )?
    ) => {
        impl $crate::shape::HasShape for $ty {
            fn shape() -> &'static $crate::shape::Shape {
                static SHAPE: $crate::__once_cell::sync::Lazy<$crate::shape::Shape> =
                    $crate::__once_cell::sync::Lazy::new(|| {
                        $crate::shape::Shape::builder(stringify!($ty))
                            $(
                                .field::<$ftype>(
                                    stringify!($fname),
                                    $crate::__opt_str!($($fdoc)?),
                                )
                            )*
                            $($(
                                .constructor_param(stringify!($pname), $pdoc)
                            )*)?
                            .build()
                    });
                &SHAPE
            }
        }

        impl $crate::message::FieldAccess for $ty {
            fn assign(
                &mut self,
                name: &str,
                value: $crate::value::FieldValue,
            ) -> Result<bool, $crate::error::ValueError> {
                $(
                    if name.eq_ignore_ascii_case(stringify!($fname)) {
                        self.$fname =
                            <$ftype as $crate::value::BindableField>::from_value(value)?;
                        return Ok(true);
                    }
                )*
                let _ = value;
                Ok(false)
            }

            fn read(&self, name: &str) -> Option<$crate::value::FieldValue> {
                $(
                    if name.eq_ignore_ascii_case(stringify!($fname)) {
                        return Some($crate::value::BindableField::to_value(&self.$fname));
                    }
                )*
                None
            }
        }
    };
}

/// Expands to the given literal, or `""` when absent.
#[doc(hidden)]
#[macro_export]
macro_rules! __opt_str {
    () => {
        ""
    };
    ($s:literal) => {
        $s
    };
}
