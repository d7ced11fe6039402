// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML file configuration source adapter.
//!
//! This module provides an adapter that reads client configurations from YAML files.
//! Nested mappings are flattened into dotted keys and scalars keep their YAML type.

use crate::domain::{ConfigError, ConfigMap, ConfigValue, Result};
use crate::ports::{ConfigParser, ConfigSource};
use directories::ProjectDirs;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum allowed file size for YAML configuration files (10MB)
/// Larger files are rejected before they are read.
const MAX_YAML_FILE_SIZE: u64 = 10 * 1024 * 1024;

const SOURCE_NAME: &str = "yaml-file";

/// YAML parser implementation.
///
/// This parser converts YAML documents into flat maps using dot notation for nested
/// mappings. Integers become `Integer` when they fit 32 bits and `Long` otherwise,
/// floats become `Double`, and sequences of scalars become arrays. Sequences holding
/// mappings are flattened with the element index as a key segment. Nulls are
/// dropped.
///
/// # Examples
///
/// ```rust
/// use httpcfg::adapters::YamlParser;
/// use httpcfg::domain::ConfigValue;
/// use httpcfg::ports::ConfigParser;
///
/// let parser = YamlParser::new();
/// let yaml_content = "request:\n  config:\n    socket.timeout: 2000\nuser.agent: demo";
/// let result = parser.parse(yaml_content).unwrap();
/// assert_eq!(
///     result.get("request.config.socket.timeout"),
///     Some(&ConfigValue::from(2000))
/// );
/// assert_eq!(result.get("user.agent"), Some(&ConfigValue::from("demo")));
/// ```
#[derive(Debug, Clone)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlParser
    }

    /// Flattens a YAML value into a flat map with dot notation keys.
    fn flatten_yaml(value: &Value, prefix: &str, result: &mut ConfigMap) {
        match value {
            Value::Mapping(map) => {
                for (key, val) in map {
                    let Some(key_str) = key_segment(key) else {
                        continue;
                    };
                    let new_prefix = if prefix.is_empty() {
                        key_str
                    } else {
                        format!("{}.{}", prefix, key_str)
                    };
                    Self::flatten_yaml(val, &new_prefix, result);
                }
            }
            Value::Sequence(seq) => {
                let scalars: Option<Vec<ConfigValue>> = seq.iter().map(scalar).collect();
                match scalars {
                    Some(elements) => {
                        result.insert(prefix.to_string(), ConfigValue::Array(elements));
                    }
                    None => {
                        for (i, val) in seq.iter().enumerate() {
                            let new_prefix = format!("{}.{}", prefix, i);
                            Self::flatten_yaml(val, &new_prefix, result);
                        }
                    }
                }
            }
            Value::Tagged(tagged) => Self::flatten_yaml(&tagged.value, prefix, result),
            other => {
                if let Some(value) = scalar(other) {
                    result.insert(prefix.to_string(), value);
                }
            }
        }
    }
}

fn key_segment(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn scalar(value: &Value) -> Option<ConfigValue> {
    match value {
        Value::String(s) => Some(ConfigValue::from(s.as_str())),
        Value::Bool(b) => Some(ConfigValue::Boolean(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(match i32::try_from(i) {
                    Ok(small) => ConfigValue::Integer(small),
                    Err(_) => ConfigValue::Long(i),
                })
            } else {
                n.as_f64().map(ConfigValue::Double)
            }
        }
        _ => None,
    }
}

impl Default for YamlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigParser for YamlParser {
    fn parse(&self, content: &str) -> Result<ConfigMap> {
        let value: Value = serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: format!("Failed to parse YAML: {}", e),
            source: Some(Box::new(e)),
        })?;

        let mut result = ConfigMap::new();
        Self::flatten_yaml(&value, "", &mut result);
        Ok(result)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}

/// Configuration source adapter for YAML files.
///
/// This adapter reads a client configuration from a YAML file. It supports automatic
/// discovery of configuration files in OS-appropriate locations, as well as custom
/// file paths. The file is read once on creation and again on every
/// [`reload`](ConfigSource::reload).
///
/// # Examples
///
/// ```rust,no_run
/// use httpcfg::adapters::YamlFileAdapter;
/// use httpcfg::ports::ConfigSource;
///
/// // Load from a specific file
/// let adapter = YamlFileAdapter::from_file("/path/to/http-client.yaml").unwrap();
///
/// // Load from default OS location
/// let adapter = YamlFileAdapter::from_default_location("myapp", "com.example").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct YamlFileAdapter {
    /// Path to the YAML file
    file_path: PathBuf,
    /// Parsed configuration values
    values: ConfigMap,
    /// YAML parser
    parser: YamlParser,
}

impl YamlFileAdapter {
    /// Creates a new YAML file adapter from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns a `SourceError` if the file cannot be read or is too large, and a
    /// `ParseError` if it is not valid YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file_path = path.as_ref();
        let parser = YamlParser::new();

        // Canonicalize the path
        let canonical_path = file_path
            .canonicalize()
            .map_err(|e| source_error("Invalid or inaccessible path", file_path, e))?;

        let values = parser.parse(&read_file(&canonical_path)?)?;

        Ok(Self {
            file_path: canonical_path,
            values,
            parser,
        })
    }

    /// Creates a new YAML file adapter reading `http-client.yaml` from the default
    /// OS-appropriate configuration directory.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name (e.g., "myapp")
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    pub fn from_default_location(app_name: &str, qualifier: &str) -> Result<Self> {
        Self::with_filename(app_name, qualifier, "http-client.yaml")
    }

    /// Creates a new YAML file adapter with a custom file name in the default location.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use httpcfg::adapters::YamlFileAdapter;
    ///
    /// let adapter = YamlFileAdapter::with_filename("myapp", "com.example", "search-client.yaml").unwrap();
    /// ```
    pub fn with_filename(app_name: &str, qualifier: &str, filename: &str) -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| ConfigError::SourceError {
                source_name: SOURCE_NAME.to_string(),
                message: "Failed to determine project directories".to_string(),
                source: None,
            })?;

        Self::from_file(proj_dirs.config_dir().join(filename))
    }

    /// Returns the path to the configuration file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

impl ConfigSource for YamlFileAdapter {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn load(&self) -> Result<ConfigMap> {
        Ok(self.values.clone())
    }

    fn reload(&mut self) -> Result<()> {
        let content = read_file(&self.file_path)?;
        self.values = self.parser.parse(&content)?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<ConfigValue>> {
        Ok(self.values.get(key).cloned())
    }
}

fn read_file(path: &Path) -> Result<String> {
    // Check file size before reading
    let metadata =
        fs::metadata(path).map_err(|e| source_error("Failed to read file metadata", path, e))?;

    if metadata.len() > MAX_YAML_FILE_SIZE {
        return Err(ConfigError::SourceError {
            source_name: SOURCE_NAME.to_string(),
            message: format!(
                "Configuration file too large: {} bytes (max {} bytes)",
                metadata.len(),
                MAX_YAML_FILE_SIZE
            ),
            source: None,
        });
    }

    fs::read_to_string(path)
        .map_err(|e| source_error("Failed to read configuration file", path, e))
}

fn source_error(message: &str, path: &Path, e: std::io::Error) -> ConfigError {
    ConfigError::SourceError {
        source_name: SOURCE_NAME.to_string(),
        message: format!(
            "{}: {}",
            message,
            path.file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("<unknown>")
        ),
        source: Some(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_yaml_parser_simple() {
        let parser = YamlParser::new();
        let result = parser.parse("user.agent: demo").unwrap();

        assert_eq!(result.get("user.agent"), Some(&ConfigValue::from("demo")));
    }

    #[test]
    fn test_yaml_parser_nested() {
        let parser = YamlParser::new();
        let yaml = r#"
request:
  config:
    socket:
      timeout: 2000
    redirects.enabled: false
"#;
        let result = parser.parse(yaml).unwrap();

        assert_eq!(
            result.get("request.config.socket.timeout"),
            Some(&ConfigValue::Integer(2000))
        );
        assert_eq!(
            result.get("request.config.redirects.enabled"),
            Some(&ConfigValue::Boolean(false))
        );
    }

    #[test]
    fn test_yaml_parser_scalar_sequence_is_array() {
        let parser = YamlParser::new();
        let yaml = r#"
default.headers:
  - "Accept: application/json"
  - "X-Trace: on"
"#;
        let result = parser.parse(yaml).unwrap();

        assert_eq!(
            result.get("default.headers"),
            Some(&ConfigValue::Array(vec![
                ConfigValue::from("Accept: application/json"),
                ConfigValue::from("X-Trace: on"),
            ]))
        );
    }

    #[test]
    fn test_yaml_parser_sequence_of_mappings() {
        let parser = YamlParser::new();
        let yaml = r#"
clients:
  - id: first
  - id: second
"#;
        let result = parser.parse(yaml).unwrap();

        assert_eq!(result.get("clients.0.id"), Some(&ConfigValue::from("first")));
        assert_eq!(result.get("clients.1.id"), Some(&ConfigValue::from("second")));
    }

    #[test]
    fn test_yaml_parser_mixed_types() {
        let parser = YamlParser::new();
        let yaml = r#"
string_value: hello
number_value: 42
long_value: 4294967296
float_value: 1.5
bool_value: true
null_value: null
"#;
        let result = parser.parse(yaml).unwrap();

        assert_eq!(result.get("string_value"), Some(&ConfigValue::from("hello")));
        assert_eq!(result.get("number_value"), Some(&ConfigValue::Integer(42)));
        assert_eq!(
            result.get("long_value"),
            Some(&ConfigValue::Long(4_294_967_296))
        );
        assert_eq!(result.get("float_value"), Some(&ConfigValue::Double(1.5)));
        assert_eq!(result.get("bool_value"), Some(&ConfigValue::Boolean(true)));
        assert!(!result.contains_key("null_value"));
    }

    #[test]
    fn test_yaml_parser_invalid() {
        let parser = YamlParser::new();
        let result = parser.parse("invalid: yaml: content:");

        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_yaml_parser_extensions() {
        assert_eq!(YamlParser::new().supported_extensions(), &["yaml", "yml"]);
    }

    #[test]
    fn test_yaml_file_adapter_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "http.client.id: search").unwrap();
        writeln!(temp_file, "max.conn.per.route: 8").unwrap();

        let adapter = YamlFileAdapter::from_file(temp_file.path()).unwrap();

        assert_eq!(adapter.name(), "yaml-file");
        assert_eq!(
            adapter.get("http.client.id").unwrap(),
            Some(ConfigValue::from("search"))
        );
        assert_eq!(adapter.load().unwrap().len(), 2);
    }

    #[test]
    fn test_yaml_file_adapter_missing_file() {
        let result = YamlFileAdapter::from_file("/nonexistent/http-client.yaml");

        assert!(matches!(result, Err(ConfigError::SourceError { .. })));
    }

    #[test]
    fn test_yaml_file_adapter_reload() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "user.agent: before").unwrap();
        temp_file.flush().unwrap();

        let mut adapter = YamlFileAdapter::from_file(temp_file.path()).unwrap();
        assert_eq!(
            adapter.get("user.agent").unwrap(),
            Some(ConfigValue::from("before"))
        );

        fs::write(temp_file.path(), "user.agent: after\n").unwrap();
        adapter.reload().unwrap();

        assert_eq!(
            adapter.get("user.agent").unwrap(),
            Some(ConfigValue::from("after"))
        );
    }
}
