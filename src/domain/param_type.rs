// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declared parameter and attribute types.
//!
//! A [`ParamType`] describes what an accessor accepts or returns. Only the
//! scalar kinds in [`ValueKind`] (and arrays of them) can be described by
//! attribute metadata or bound from a configuration map; everything else is an
//! opaque type that only code can supply.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of value kinds a configuration entry can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValueKind {
    /// UTF-8 text
    String,
    /// 64-bit signed integer
    Long,
    /// 32-bit signed integer
    Integer,
    /// 16-bit signed integer
    Short,
    /// A single character
    Character,
    /// 8-bit signed integer
    Byte,
    /// 64-bit float
    Double,
    /// 32-bit float
    Float,
    /// Boolean flag
    Boolean,
}

impl ValueKind {
    /// Returns the metatype type code for this kind.
    ///
    /// The numbering follows the OSGi metatype `AttributeDefinition` constants.
    pub fn type_code(self) -> i32 {
        match self {
            ValueKind::String => 1,
            ValueKind::Long => 2,
            ValueKind::Integer => 3,
            ValueKind::Short => 4,
            ValueKind::Character => 5,
            ValueKind::Byte => 6,
            ValueKind::Double => 7,
            ValueKind::Float => 8,
            ValueKind::Boolean => 11,
        }
    }

    /// Returns `true` if a value of this kind can be passed where `target` is declared.
    ///
    /// Identical kinds always match. Integral kinds widen along
    /// `Byte -> Short -> Integer -> Long` and `Float` widens to `Double`. This is
    /// looser than an exact boxed-type match: an `Integer` value reaches a `Long`
    /// setter instead of being skipped as a mismatch.
    pub fn widens_to(self, target: ValueKind) -> bool {
        if self == target {
            return true;
        }
        match (self.integral_rank(), target.integral_rank()) {
            (Some(from), Some(to)) => from < to,
            _ => self == ValueKind::Float && target == ValueKind::Double,
        }
    }

    fn integral_rank(self) -> Option<u8> {
        match self {
            ValueKind::Byte => Some(0),
            ValueKind::Short => Some(1),
            ValueKind::Integer => Some(2),
            ValueKind::Long => Some(3),
            _ => None,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::String => "String",
            ValueKind::Long => "Long",
            ValueKind::Integer => "Integer",
            ValueKind::Short => "Short",
            ValueKind::Character => "Character",
            ValueKind::Byte => "Byte",
            ValueKind::Double => "Double",
            ValueKind::Float => "Float",
            ValueKind::Boolean => "Boolean",
        };
        f.write_str(name)
    }
}

/// The declared type of a single accessor parameter or return value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// A single value of a supported kind
    Scalar(ValueKind),
    /// An array of values of a supported kind
    Array(ValueKind),
    /// Any other type, identified by name only
    Opaque(&'static str),
}

impl ParamType {
    /// Returns the supported value kind, or `None` for opaque types.
    pub fn attribute_kind(&self) -> Option<ValueKind> {
        match self {
            ParamType::Scalar(kind) | ParamType::Array(kind) => Some(*kind),
            ParamType::Opaque(_) => None,
        }
    }

    /// Returns `true` for array types.
    pub fn is_array(&self) -> bool {
        matches!(self, ParamType::Array(_))
    }

    /// Returns the array type whose elements have this type.
    ///
    /// Arrays of arrays and arrays of opaque types collapse to an opaque type.
    pub fn into_array(self) -> ParamType {
        match self {
            ParamType::Scalar(kind) => ParamType::Array(kind),
            _ => ParamType::Opaque("array"),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Scalar(kind) => write!(f, "{}", kind),
            ParamType::Array(kind) => write!(f, "{}[]", kind),
            ParamType::Opaque(name) => f.write_str(name),
        }
    }
}

/// Formats a parameter list as `(A, B)` for diagnostics.
pub fn signature(types: &[ParamType]) -> String {
    let names: Vec<String> = types.iter().map(ToString::to_string).collect();
    format!("({})", names.join(", "))
}
