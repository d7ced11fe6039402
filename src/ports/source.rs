// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration source trait definition.
//!
//! This module defines the `ConfigSource` trait, the port through which flat
//! configuration maps enter the system. Any configuration source (environment
//! variables, files, in-memory maps, etc.) must implement this trait.

use crate::domain::{ConfigMap, ConfigValue, Result};

/// A trait for configuration sources.
///
/// A source yields a flat map of dotted keys to typed values. Sources do not carry a
/// precedence of their own; callers decide the order in which maps are merged.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow for use in multi-threaded contexts.
///
/// # Examples
///
/// ```rust
/// use httpcfg::ports::ConfigSource;
/// use httpcfg::domain::{ConfigMap, ConfigValue, Result};
///
/// struct MySource;
///
/// impl ConfigSource for MySource {
///     fn name(&self) -> &str {
///         "my-source"
///     }
///
///     fn load(&self) -> Result<ConfigMap> {
///         let mut map = ConfigMap::new();
///         map.insert("max.redirects".to_string(), ConfigValue::from(5));
///         Ok(map)
///     }
///
///     fn reload(&mut self) -> Result<()> {
///         Ok(())
///     }
/// }
///
/// let source = MySource;
/// assert_eq!(source.get("max.redirects").unwrap(), Some(ConfigValue::from(5)));
/// ```
pub trait ConfigSource: Send + Sync {
    /// Returns the name of this configuration source.
    ///
    /// This name is used for logging, error messages, and debugging. It should be
    /// a short, descriptive identifier like "env" or "yaml-file".
    fn name(&self) -> &str;

    /// Returns the current contents of the source as a flat map.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read.
    fn load(&self) -> Result<ConfigMap>;

    /// Reloads the configuration from the underlying storage.
    ///
    /// Sources that cannot change return `Ok(())`.
    fn reload(&mut self) -> Result<()>;

    /// Retrieves a single value.
    ///
    /// The default implementation loads the whole map.
    fn get(&self, key: &str) -> Result<Option<ConfigValue>> {
        Ok(self.load()?.remove(key))
    }
}
