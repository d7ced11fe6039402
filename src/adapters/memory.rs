// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory configuration source adapter.

use crate::domain::{ConfigMap, ConfigValue, Result};
use crate::ports::ConfigSource;

/// A configuration source over a fixed map.
///
/// # Examples
///
/// ```rust
/// use httpcfg::adapters::MapSource;
/// use httpcfg::domain::ConfigValue;
/// use httpcfg::ports::ConfigSource;
///
/// let source = MapSource::new("defaults").with_value("max.conn.per.route", ConfigValue::from(4));
/// assert_eq!(source.get("max.conn.per.route").unwrap(), Some(ConfigValue::from(4)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct MapSource {
    name: String,
    values: ConfigMap,
}

impl MapSource {
    /// Creates an empty source.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: ConfigMap::new(),
        }
    }

    /// Creates a source over `values`.
    pub fn from_map(name: impl Into<String>, values: ConfigMap) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Adds a value.
    pub fn with_value(mut self, key: impl Into<String>, value: ConfigValue) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Replaces a value, returning the previous one.
    pub fn set(&mut self, key: impl Into<String>, value: ConfigValue) -> Option<ConfigValue> {
        self.values.insert(key.into(), value)
    }

    /// Removes a value.
    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.values.remove(key)
    }
}

impl ConfigSource for MapSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<ConfigMap> {
        Ok(self.values.clone())
    }

    fn reload(&mut self) -> Result<()> {
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<ConfigValue>> {
        Ok(self.values.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_source() {
        let mut source = MapSource::new("test")
            .with_value("user.agent", ConfigValue::from("a"))
            .with_value("tcp.nodelay", ConfigValue::from(false));
        assert_eq!(source.name(), "test");
        assert_eq!(source.load().unwrap().len(), 2);

        assert_eq!(
            source.set("user.agent", ConfigValue::from("b")),
            Some(ConfigValue::from("a"))
        );
        assert_eq!(source.remove("tcp.nodelay"), Some(ConfigValue::from(false)));
        source.reload().unwrap();
        assert_eq!(source.get("user.agent").unwrap(), Some(ConfigValue::from("b")));
        assert_eq!(source.get("tcp.nodelay").unwrap(), None);
    }
}
