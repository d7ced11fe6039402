// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration value type with type-safe conversions.
//!
//! This module provides the `ConfigValue` type, a typed value carried by a flat
//! configuration map, together with the [`FromValue`] and [`IntoValue`] traits that
//! convert between configuration values and the Rust types accessors declare.

use crate::domain::param_type::{ParamType, ValueKind};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;

/// A flat configuration map with dotted keys.
///
/// A `BTreeMap` keeps iteration order stable, so binding passes are deterministic.
pub type ConfigMap = BTreeMap<String, ConfigValue>;

/// A typed configuration value.
///
/// The variants mirror the value kinds a configuration admin can store. Arrays hold
/// values of a single kind; the kind of an empty array is undetermined.
///
/// # Examples
///
/// ```
/// use httpcfg::domain::{ConfigValue, ParamType, ValueKind};
///
/// let value = ConfigValue::from(5);
/// assert!(value.is_assignable_to(&ParamType::Scalar(ValueKind::Integer)));
/// assert!(value.is_assignable_to(&ParamType::Scalar(ValueKind::Long)));
/// assert!(!value.is_assignable_to(&ParamType::Scalar(ValueKind::String)));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// UTF-8 text
    String(String),
    /// 64-bit signed integer
    Long(i64),
    /// 32-bit signed integer
    Integer(i32),
    /// 16-bit signed integer
    Short(i16),
    /// A single character
    Character(char),
    /// 8-bit signed integer
    Byte(i8),
    /// 64-bit float
    Double(f64),
    /// 32-bit float
    Float(f32),
    /// Boolean flag
    Boolean(bool),
    /// Homogeneous array
    Array(Vec<ConfigValue>),
}

impl ConfigValue {
    /// Infers a typed value from untyped text.
    ///
    /// Used for sources that only carry strings, such as environment variables.
    /// `true`/`false` (case-insensitive) become booleans, integers become `Integer`
    /// or `Long` depending on their range, decimals become `Double`, and anything
    /// else stays a string.
    ///
    /// # Examples
    ///
    /// ```
    /// use httpcfg::domain::ConfigValue;
    ///
    /// assert_eq!(ConfigValue::infer("2000"), ConfigValue::Integer(2000));
    /// assert_eq!(ConfigValue::infer("TRUE"), ConfigValue::Boolean(true));
    /// assert_eq!(ConfigValue::infer("agent/1.0"), ConfigValue::from("agent/1.0"));
    /// ```
    pub fn infer(text: &str) -> Self {
        match text.to_lowercase().as_str() {
            "true" => return ConfigValue::Boolean(true),
            "false" => return ConfigValue::Boolean(false),
            _ => {}
        }
        if let Ok(n) = text.parse::<i32>() {
            return ConfigValue::Integer(n);
        }
        if let Ok(n) = text.parse::<i64>() {
            return ConfigValue::Long(n);
        }
        let looks_decimal = text.contains('.') || text.contains('e') || text.contains('E');
        if looks_decimal && text.chars().any(|c| c.is_ascii_digit()) {
            if let Ok(n) = text.parse::<f64>() {
                return ConfigValue::Double(n);
            }
        }
        ConfigValue::String(text.to_string())
    }

    /// Returns the kind of a scalar value, or the element kind of a non-empty array.
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            ConfigValue::String(_) => Some(ValueKind::String),
            ConfigValue::Long(_) => Some(ValueKind::Long),
            ConfigValue::Integer(_) => Some(ValueKind::Integer),
            ConfigValue::Short(_) => Some(ValueKind::Short),
            ConfigValue::Character(_) => Some(ValueKind::Character),
            ConfigValue::Byte(_) => Some(ValueKind::Byte),
            ConfigValue::Double(_) => Some(ValueKind::Double),
            ConfigValue::Float(_) => Some(ValueKind::Float),
            ConfigValue::Boolean(_) => Some(ValueKind::Boolean),
            ConfigValue::Array(items) => items.first().and_then(ConfigValue::kind),
        }
    }

    /// Returns a human-readable runtime type name, e.g. `Integer` or `String[]`.
    pub fn type_name(&self) -> String {
        match self {
            ConfigValue::Array(_) => match self.kind() {
                Some(kind) => format!("{}[]", kind),
                None => "[]".to_string(),
            },
            _ => self
                .kind()
                .map(|kind| kind.to_string())
                .unwrap_or_default(),
        }
    }

    /// Checks whether this value can be passed to a parameter of type `ty`.
    ///
    /// Scalars match scalars of the same or a wider kind. Arrays match array types
    /// when every element matches the element kind. Nothing matches an opaque type.
    pub fn is_assignable_to(&self, ty: &ParamType) -> bool {
        match (self, ty) {
            (ConfigValue::Array(items), ParamType::Array(kind)) => items.iter().all(|item| {
                !matches!(item, ConfigValue::Array(_))
                    && item.kind().is_some_and(|k| k.widens_to(*kind))
            }),
            (ConfigValue::Array(_), _) => false,
            (value, ParamType::Scalar(kind)) => value.kind().is_some_and(|k| k.widens_to(*kind)),
            _ => false,
        }
    }

    /// Returns the text of a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the flag of a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns any integral value widened to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Long(n) => Some(*n),
            ConfigValue::Integer(n) => Some(i64::from(*n)),
            ConfigValue::Short(n) => Some(i64::from(*n)),
            ConfigValue::Byte(n) => Some(i64::from(*n)),
            _ => None,
        }
    }

    /// Returns the elements of an array value.
    pub fn as_array(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Renders the value as a list of strings, element-wise for arrays.
    pub fn to_strings(&self) -> Vec<String> {
        match self {
            ConfigValue::Array(items) => items.iter().map(ToString::to_string).collect(),
            other => vec![other.to_string()],
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::String(s) => f.write_str(s),
            ConfigValue::Long(n) => write!(f, "{}", n),
            ConfigValue::Integer(n) => write!(f, "{}", n),
            ConfigValue::Short(n) => write!(f, "{}", n),
            ConfigValue::Character(c) => write!(f, "{}", c),
            ConfigValue::Byte(n) => write!(f, "{}", n),
            ConfigValue::Double(n) => write!(f, "{:?}", n),
            ConfigValue::Float(n) => write!(f, "{:?}", n),
            ConfigValue::Boolean(b) => write!(f, "{}", b),
            ConfigValue::Array(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        ConfigValue::Long(n)
    }
}

impl From<i32> for ConfigValue {
    fn from(n: i32) -> Self {
        ConfigValue::Integer(n)
    }
}

impl From<i16> for ConfigValue {
    fn from(n: i16) -> Self {
        ConfigValue::Short(n)
    }
}

impl From<i8> for ConfigValue {
    fn from(n: i8) -> Self {
        ConfigValue::Byte(n)
    }
}

impl From<char> for ConfigValue {
    fn from(c: char) -> Self {
        ConfigValue::Character(c)
    }
}

impl From<f64> for ConfigValue {
    fn from(n: f64) -> Self {
        ConfigValue::Double(n)
    }
}

impl From<f32> for ConfigValue {
    fn from(n: f32) -> Self {
        ConfigValue::Float(n)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Boolean(b)
    }
}

impl<V: Into<ConfigValue>> From<Vec<V>> for ConfigValue {
    fn from(items: Vec<V>) -> Self {
        ConfigValue::Array(items.into_iter().map(Into::into).collect())
    }
}

/// Conversion from a configuration value into an accessor argument.
///
/// `param_type` is the type the accessor declares for the argument. Conversions
/// accept the same widening the binder's assignability check accepts.
pub trait FromValue: Sized {
    /// The declared parameter type.
    fn param_type() -> ParamType;

    /// Converts the value, or returns `None` if it has the wrong type.
    fn from_value(value: &ConfigValue) -> Option<Self>;
}

/// Conversion from an accessor's return value into a configuration value.
pub trait IntoValue {
    /// The declared return type.
    fn return_type() -> ParamType;

    /// Converts the value; `None` means "no value".
    fn into_value(self) -> Option<ConfigValue>;
}

/// Marker for types that may appear as array elements.
pub trait ScalarValue: FromValue + IntoValue {}

macro_rules! scalar_value {
    ($ty:ty, $kind:ident, |$v:ident| $extract:expr) => {
        impl FromValue for $ty {
            fn param_type() -> ParamType {
                ParamType::Scalar(ValueKind::$kind)
            }

            fn from_value($v: &ConfigValue) -> Option<Self> {
                $extract
            }
        }

        impl IntoValue for $ty {
            fn return_type() -> ParamType {
                ParamType::Scalar(ValueKind::$kind)
            }

            fn into_value(self) -> Option<ConfigValue> {
                Some(ConfigValue::from(self))
            }
        }

        impl ScalarValue for $ty {}
    };
}

scalar_value!(String, String, |v| v.as_str().map(str::to_string));
scalar_value!(i64, Long, |v| v.as_i64());
scalar_value!(i32, Integer, |v| match v {
    ConfigValue::Integer(n) => Some(*n),
    ConfigValue::Short(n) => Some(i32::from(*n)),
    ConfigValue::Byte(n) => Some(i32::from(*n)),
    _ => None,
});
scalar_value!(i16, Short, |v| match v {
    ConfigValue::Short(n) => Some(*n),
    ConfigValue::Byte(n) => Some(i16::from(*n)),
    _ => None,
});
scalar_value!(i8, Byte, |v| match v {
    ConfigValue::Byte(n) => Some(*n),
    _ => None,
});
scalar_value!(char, Character, |v| match v {
    ConfigValue::Character(c) => Some(*c),
    _ => None,
});
scalar_value!(f64, Double, |v| match v {
    ConfigValue::Double(n) => Some(*n),
    ConfigValue::Float(n) => Some(f64::from(*n)),
    _ => None,
});
scalar_value!(f32, Float, |v| match v {
    ConfigValue::Float(n) => Some(*n),
    _ => None,
});
scalar_value!(bool, Boolean, |v| v.as_bool());

impl<T: ScalarValue> FromValue for Vec<T> {
    fn param_type() -> ParamType {
        T::param_type().into_array()
    }

    fn from_value(value: &ConfigValue) -> Option<Self> {
        value.as_array()?.iter().map(T::from_value).collect()
    }
}

impl<T: ScalarValue> IntoValue for Vec<T> {
    fn return_type() -> ParamType {
        T::return_type().into_array()
    }

    fn into_value(self) -> Option<ConfigValue> {
        self.into_iter()
            .map(IntoValue::into_value)
            .collect::<Option<Vec<_>>>()
            .map(ConfigValue::Array)
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn return_type() -> ParamType {
        T::return_type()
    }

    fn into_value(self) -> Option<ConfigValue> {
        self.and_then(IntoValue::into_value)
    }
}

impl FromValue for IpAddr {
    fn param_type() -> ParamType {
        ParamType::Opaque("IpAddr")
    }

    fn from_value(value: &ConfigValue) -> Option<Self> {
        value.as_str()?.parse().ok()
    }
}
