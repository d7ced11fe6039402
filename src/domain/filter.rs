// SPDX-License-Identifier: MIT OR Apache-2.0

//! LDAP-style service property filters.
//!
//! Supports the subset used to select services by their registration properties:
//!
//! - Equality: `(http.client.id=test-client)`
//! - Presence: `(service.ranking=*)`
//! - Negation: `(!(http.client.id=*))`
//! - Conjunction and disjunction: `(&(a=1)(b=2))`, `(|(a=1)(a=2))`

use crate::domain::config_value::{ConfigMap, ConfigValue};
use crate::domain::errors::{ConfigError, Result};
use std::fmt;
use std::str::FromStr;

/// A parsed service property filter.
///
/// # Examples
///
/// ```
/// use httpcfg::domain::{ConfigMap, ConfigValue, Filter};
///
/// let filter: Filter = "(http.client.id=test-client)".parse().unwrap();
///
/// let mut props = ConfigMap::new();
/// props.insert("http.client.id".to_string(), ConfigValue::from("test-client"));
/// assert!(filter.matches(&props));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Filter {
    /// The property equals the value
    Equals(String, String),
    /// The property is present
    Present(String),
    /// The inner filter does not match
    Not(Box<Filter>),
    /// All inner filters match
    And(Vec<Filter>),
    /// At least one inner filter matches
    Or(Vec<Filter>),
}

impl Filter {
    /// Shorthand for an equality filter.
    pub fn equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Equals(key.into(), value.into())
    }

    /// Evaluates the filter against a property map.
    ///
    /// Values are compared by their string form. An array property matches an
    /// equality filter when any of its elements does.
    pub fn matches(&self, properties: &ConfigMap) -> bool {
        match self {
            Filter::Equals(key, expected) => match properties.get(key) {
                Some(ConfigValue::Array(items)) => {
                    items.iter().any(|item| item.to_string() == *expected)
                }
                Some(value) => value.to_string() == *expected,
                None => false,
            },
            Filter::Present(key) => properties.contains_key(key),
            Filter::Not(inner) => !inner.matches(properties),
            Filter::And(filters) => filters.iter().all(|f| f.matches(properties)),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(properties)),
        }
    }
}

impl FromStr for Filter {
    type Err = ConfigError;

    fn from_str(text: &str) -> Result<Self> {
        let mut parser = Parser {
            text,
            chars: text.trim().chars().collect(),
            pos: 0,
        };
        let filter = parser.parse_filter()?;
        if parser.pos != parser.chars.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(filter)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Equals(key, value) => write!(f, "({}={})", key, value),
            Filter::Present(key) => write!(f, "({}=*)", key),
            Filter::Not(inner) => write!(f, "(!{})", inner),
            Filter::And(filters) => {
                f.write_str("(&")?;
                for inner in filters {
                    write!(f, "{}", inner)?;
                }
                f.write_str(")")
            }
            Filter::Or(filters) => {
                f.write_str("(|")?;
                for inner in filters {
                    write!(f, "{}", inner)?;
                }
                f.write_str(")")
            }
        }
    }
}

struct Parser<'a> {
    text: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, message: &str) -> ConfigError {
        ConfigError::FilterSyntax {
            filter: self.text.to_string(),
            message: format!("{} at position {}", message, self.pos),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(self.error(&format!("expected '{}'", expected))),
        }
    }

    fn parse_filter(&mut self) -> Result<Filter> {
        self.expect('(')?;
        let filter = match self.peek() {
            Some('&') => {
                self.pos += 1;
                Filter::And(self.parse_list()?)
            }
            Some('|') => {
                self.pos += 1;
                Filter::Or(self.parse_list()?)
            }
            Some('!') => {
                self.pos += 1;
                Filter::Not(Box::new(self.parse_filter()?))
            }
            Some(_) => self.parse_item()?,
            None => return Err(self.error("unexpected end of filter")),
        };
        self.expect(')')?;
        Ok(filter)
    }

    fn parse_list(&mut self) -> Result<Vec<Filter>> {
        let mut filters = Vec::new();
        while self.peek() == Some('(') {
            filters.push(self.parse_filter()?);
        }
        if filters.is_empty() {
            return Err(self.error("empty filter list"));
        }
        Ok(filters)
    }

    fn parse_item(&mut self) -> Result<Filter> {
        let key = self.take_until(|c| c == '=' || c == '(' || c == ')');
        let key = key.trim().to_string();
        if key.is_empty() {
            return Err(self.error("missing attribute name"));
        }
        self.expect('=')?;
        let value = self.take_until(|c| c == ')' || c == '(');
        if value == "*" {
            Ok(Filter::Present(key))
        } else {
            Ok(Filter::Equals(key, value))
        }
    }

    fn take_until(&mut self, stop: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if stop(c) {
                break;
            }
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }
}
