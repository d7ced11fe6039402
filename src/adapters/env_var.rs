// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment variable configuration source adapter.
//!
//! This module provides an adapter that reads a client configuration from
//! environment variables.

use crate::domain::{ConfigMap, ConfigValue, Result};
use crate::ports::ConfigSource;
use std::collections::HashMap;
use std::env;
use std::sync::RwLock;

/// Maximum allowed length for environment variable keys
const MAX_ENV_KEY_LEN: usize = 512;

/// Maximum allowed length for environment variable values
const MAX_ENV_VALUE_LEN: usize = 1048576; // 1MB

/// Configuration source adapter for environment variables.
///
/// Variable names are turned into dotted keys: the optional prefix is stripped, the
/// name is lower-cased and underscores become dots, so that
/// `HTTPCFG_REQUEST_CONFIG_SOCKET_TIMEOUT` yields `request.config.socket.timeout`.
/// Values are untyped text and are coerced with [`ConfigValue::infer`].
///
/// # Examples
///
/// ```rust
/// use httpcfg::adapters::EnvVarAdapter;
/// use httpcfg::domain::ConfigValue;
/// use httpcfg::ports::ConfigSource;
/// use std::collections::HashMap;
///
/// let mut vars = HashMap::new();
/// vars.insert("HTTPCFG_MAX_CONN_PER_ROUTE".to_string(), "8".to_string());
///
/// let adapter = EnvVarAdapter::with_prefix("HTTPCFG_").with_values(vars);
/// assert_eq!(
///     adapter.get("max.conn.per.route").unwrap(),
///     Some(ConfigValue::Integer(8))
/// );
/// ```
#[derive(Debug)]
pub struct EnvVarAdapter {
    /// Optional prefix to filter environment variables
    prefix: Option<String>,
    /// Whether to convert keys to lowercase
    lowercase_keys: bool,
    /// Whether to replace underscores with dots
    replace_underscores: bool,
    /// Fixed variables used instead of the process environment
    fixed: Option<HashMap<String, String>>,
    /// Cache of transformed values
    cache: RwLock<Option<ConfigMap>>,
}

impl EnvVarAdapter {
    /// Creates an adapter over every environment variable.
    pub fn new() -> Self {
        Self {
            prefix: None,
            lowercase_keys: true,
            replace_underscores: true,
            fixed: None,
            cache: RwLock::new(None),
        }
    }

    /// Creates an adapter over the variables starting with `prefix`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Self::new()
        }
    }

    /// Sets whether keys are lower-cased (default `true`).
    pub fn lowercase_keys(mut self, enabled: bool) -> Self {
        self.lowercase_keys = enabled;
        self
    }

    /// Sets whether underscores become dots (default `true`).
    pub fn replace_underscores(mut self, enabled: bool) -> Self {
        self.replace_underscores = enabled;
        self
    }

    /// Reads `values` instead of the process environment.
    ///
    /// The names are filtered and transformed like real variables.
    pub fn with_values(mut self, values: HashMap<String, String>) -> Self {
        self.fixed = Some(values);
        self
    }

    fn transform_key(&self, key: &str) -> Option<String> {
        let key = match &self.prefix {
            Some(prefix) => key.strip_prefix(prefix.as_str())?,
            None => key,
        };
        if key.is_empty() {
            return None;
        }
        let mut transformed = key.to_string();
        if self.lowercase_keys {
            transformed = transformed.to_lowercase();
        }
        if self.replace_underscores {
            transformed = transformed.replace('_', ".");
        }
        Some(transformed)
    }

    fn read_vars(&self) -> ConfigMap {
        let vars: Box<dyn Iterator<Item = (String, String)>> = match &self.fixed {
            Some(values) => Box::new(values.clone().into_iter()),
            None => Box::new(env::vars()),
        };

        let mut map = ConfigMap::new();
        for (key, value) in vars {
            // Bound input sizes
            if key.len() > MAX_ENV_KEY_LEN || value.len() > MAX_ENV_VALUE_LEN {
                tracing::debug!(
                    "Skipping oversized environment variable: key_len={}, value_len={} (max key={}, max value={})",
                    key.len(),
                    value.len(),
                    MAX_ENV_KEY_LEN,
                    MAX_ENV_VALUE_LEN
                );
                continue;
            }
            if let Some(key) = self.transform_key(&key) {
                map.insert(key, ConfigValue::infer(&value));
            }
        }

        tracing::debug!(
            "Loaded {} environment variables (prefix={:?}, lowercase={}, replace_underscores={})",
            map.len(),
            self.prefix,
            self.lowercase_keys,
            self.replace_underscores
        );
        map
    }

    fn cached(&self) -> ConfigMap {
        if let Ok(cache) = self.cache.read() {
            if let Some(map) = cache.as_ref() {
                return map.clone();
            }
        }

        let map = self.read_vars();
        if let Ok(mut cache) = self.cache.write() {
            *cache = Some(map.clone());
        }
        map
    }
}

impl Default for EnvVarAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSource for EnvVarAdapter {
    fn name(&self) -> &str {
        "env"
    }

    fn load(&self) -> Result<ConfigMap> {
        Ok(self.cached())
    }

    fn reload(&mut self) -> Result<()> {
        // Clear cache to force reload on next access
        if let Ok(mut cache) = self.cache.write() {
            *cache = None;
        }
        Ok(())
    }
}
