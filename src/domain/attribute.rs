// SPDX-License-Identifier: MIT OR Apache-2.0

//! Attribute and object class definitions.
//!
//! These are the metadata records a host configuration UI uses to present and
//! validate the options of a configurable component.

use crate::domain::errors::{ConfigError, Result};
use crate::domain::param_type::{ParamType, ValueKind};
use serde::Serialize;

/// Cardinality of an attribute holding an unbounded array.
pub const UNBOUNDED: i32 = i32::MAX;

/// Describes a single configurable property.
///
/// # Examples
///
/// ```
/// use httpcfg::domain::{AttributeDefinition, ParamType, ValueKind};
///
/// let ad = AttributeDefinition::new(
///     "max.redirects",
///     Some("Max Redirects".to_string()),
///     ParamType::Scalar(ValueKind::Integer),
///     Some(vec!["50".to_string()]),
/// )
/// .unwrap();
/// assert_eq!(ad.description(), "default: 50");
/// assert_eq!(ad.cardinality(), 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AttributeDefinition {
    id: String,
    name: Option<String>,
    kind: ValueKind,
    cardinality: i32,
    default_value: Option<Vec<String>>,
    description: String,
}

impl AttributeDefinition {
    /// Creates a definition for a property of type `ty`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedAttributeType`] if `ty` is opaque.
    pub fn new(
        id: impl Into<String>,
        name: Option<String>,
        ty: ParamType,
        default_value: Option<Vec<String>>,
    ) -> Result<Self> {
        let kind = ty
            .attribute_kind()
            .ok_or_else(|| ConfigError::UnsupportedAttributeType {
                type_name: ty.to_string(),
            })?;
        let cardinality = if ty.is_array() { UNBOUNDED } else { 0 };
        let description = describe_default(default_value.as_deref(), cardinality);
        Ok(AttributeDefinition {
            id: id.into(),
            name,
            kind,
            cardinality,
            default_value,
            description,
        })
    }

    /// The namespaced property id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The display name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The value kind, or element kind for arrays.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// The metatype type code of [`kind`](Self::kind).
    pub fn type_code(&self) -> i32 {
        self.kind.type_code()
    }

    /// `0` for scalars, [`UNBOUNDED`] for arrays.
    pub fn cardinality(&self) -> i32 {
        self.cardinality
    }

    /// The string-serialized default values.
    pub fn default_value(&self) -> Option<&[String]> {
        self.default_value.as_deref()
    }

    /// A generated description mentioning the default value.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Option labels; definitions never restrict their values.
    pub fn option_labels(&self) -> Option<&[String]> {
        None
    }

    /// Option values; definitions never restrict their values.
    pub fn option_values(&self) -> Option<&[String]> {
        None
    }

    /// Validates a value, returning an error message on failure.
    ///
    /// Every value is accepted.
    pub fn validate(&self, _value: &str) -> Option<String> {
        None
    }
}

fn describe_default(default_value: Option<&[String]>, cardinality: i32) -> String {
    match default_value {
        None => String::new(),
        Some([single]) if cardinality == 0 => format!("default: {}", single),
        Some(values) => format!("default: [{}]", values.join(", ")),
    }
}

/// A named group of attribute definitions describing one configurable component.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ObjectClassDefinition {
    id: String,
    name: String,
    description: Option<String>,
    attributes: Vec<AttributeDefinition>,
}

impl ObjectClassDefinition {
    /// Creates a new object class definition.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: Option<String>,
        attributes: Vec<AttributeDefinition>,
    ) -> Self {
        ObjectClassDefinition {
            id: id.into(),
            name: name.into(),
            description,
            attributes,
        }
    }

    /// The schema id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// An optional description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The attribute definitions in presentation order.
    pub fn attribute_definitions(&self) -> &[AttributeDefinition] {
        &self.attributes
    }

    /// Looks up an attribute definition by id.
    pub fn attribute(&self, id: &str) -> Option<&AttributeDefinition> {
        self.attributes.iter().find(|ad| ad.id == id)
    }
}
