// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metadata provider trait definition.

use crate::domain::ObjectClassDefinition;

/// Describes the configuration schemas a component understands.
pub trait MetaTypeProvider: Send + Sync {
    /// Returns the schema registered under `id`, or `None` for unknown ids.
    ///
    /// `locale` selects a localized variant where the provider has one.
    fn object_class_definition(&self, id: &str, locale: Option<&str>)
        -> Option<&ObjectClassDefinition>;

    /// The locales the provider has localized schemas for, if any.
    fn locales(&self) -> Option<&[String]>;
}
