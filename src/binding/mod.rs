// SPDX-License-Identifier: MIT OR Apache-2.0

//! The configuration binding engine.
//!
//! Bean types declare their accessors as a static table of [`Method`]s. From that table
//! the engine derives property registries keyed by dotted names, binds flat
//! configuration maps onto targets, synthesizes attribute metadata, and merges and
//! sanitizes configuration sources.

pub mod accessor;
pub mod binder;
pub mod introspect;
pub mod invoker;
pub mod merge;
pub mod metatype;
pub mod method;

// Re-export commonly used types
pub use accessor::{GetterAdapter, PropertyReader, SetOutcome, SetterAdapter};
pub use binder::{apply_configuration, bind, normalize_namespace, BindReport};
pub use introspect::{bean_getters, bean_setters, scan, scan_methods, Introspect, PropertyRegistry};
pub use invoker::Invoker;
pub use merge::{
    clean, ends_with, forbidden_properties, merge_and_sanitize, merge_maps, or, starts_with,
};
pub use metatype::{
    attribute_definition, attribute_definitions, create_object_class_definition, join,
};
pub use method::{Method, MethodBody};
