// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types.
//!
//! This module contains the value types shared by the binding engine and the client
//! factory. It is independent of any external concerns: values, declared types,
//! property names, metadata records, service filters and errors.

pub mod attribute;
pub mod config_value;
pub mod errors;
pub mod filter;
pub mod param_type;
pub mod property_name;

// Re-export commonly used types
pub use attribute::{AttributeDefinition, ObjectClassDefinition};
pub use config_value::{ConfigMap, ConfigValue, FromValue, IntoValue};
pub use errors::{ConfigError, Result};
pub use filter::Filter;
pub use param_type::{ParamType, ValueKind};
pub use property_name::PropertyName;
