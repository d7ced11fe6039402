// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dotted property names and the name transcoder.
//!
//! Accessor names such as `setMaxRedirects` are exposed to configuration as dotted,
//! lower-case keys such as `max.redirects`. This module provides the `PropertyName`
//! newtype for such keys and the functions converting between the two forms.

use std::borrow::Borrow;
use std::fmt;

/// A dotted, lower-case property name such as `max.redirects`.
///
/// # Examples
///
/// ```
/// use httpcfg::domain::PropertyName;
///
/// let name = PropertyName::from_camel("MaxRedirects");
/// assert_eq!(name.as_str(), "max.redirects");
/// assert_eq!(name.to_camel(), "MaxRedirects");
/// assert_eq!(name.to_title(), "Max Redirects");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyName(String);

impl PropertyName {
    /// Creates a property name from an already dotted string.
    pub fn new(name: impl Into<String>) -> Self {
        PropertyName(name.into())
    }

    /// Derives a property name from the camel-case remainder of an accessor name.
    pub fn from_camel(camel: &str) -> Self {
        PropertyName(camel_to_dotted(camel))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the camel-case form, e.g. `MaxRedirects`.
    pub fn to_camel(&self) -> String {
        dotted_to_camel(&self.0)
    }

    /// Returns the display form, e.g. `Max Redirects`.
    pub fn to_title(&self) -> String {
        dotted_to_title(&self.0)
    }

    /// Converts the name into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for PropertyName {
    fn from(s: &str) -> Self {
        PropertyName(s.to_string())
    }
}

impl From<String> for PropertyName {
    fn from(s: String) -> Self {
        PropertyName(s)
    }
}

impl AsRef<str> for PropertyName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PropertyName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Converts a camel-case name into a dotted, lower-case name.
///
/// Every upper-case letter becomes `.` followed by its lower-case form, except at the
/// start of the name where no dot is emitted. All other characters pass through.
///
/// # Examples
///
/// ```
/// use httpcfg::domain::property_name::camel_to_dotted;
///
/// assert_eq!(camel_to_dotted("FooBar"), "foo.bar");
/// assert_eq!(camel_to_dotted("fooBar"), "foo.bar");
/// assert_eq!(camel_to_dotted("URL"), "u.r.l");
/// ```
pub fn camel_to_dotted(camel: &str) -> String {
    let mut dotted = String::with_capacity(camel.len() + 4);
    for (i, c) in camel.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                dotted.push('.');
            }
            dotted.extend(c.to_lowercase());
        } else {
            dotted.push(c);
        }
    }
    dotted
}

/// Converts a dotted name back into camel case.
///
/// The first character and every character following a `.` are upper-cased and the
/// dots are dropped. A trailing dot is dropped too.
///
/// # Examples
///
/// ```
/// use httpcfg::domain::property_name::dotted_to_camel;
///
/// assert_eq!(dotted_to_camel("foo.bar"), "FooBar");
/// assert_eq!(dotted_to_camel("socket.timeout"), "SocketTimeout");
/// ```
pub fn dotted_to_camel(dotted: &str) -> String {
    let mut camel = String::with_capacity(dotted.len());
    let mut upper_next = true;
    for c in dotted.chars() {
        if c == '.' {
            upper_next = true;
        } else if upper_next {
            camel.extend(c.to_uppercase());
            upper_next = false;
        } else {
            camel.push(c);
        }
    }
    camel
}

/// Converts a dotted name into a display title, e.g. `foo.bar` to `Foo Bar`.
pub fn dotted_to_title(dotted: &str) -> String {
    dotted
        .split('.')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_camel_to_dotted() {
        assert_eq!(camel_to_dotted("FooBar"), "foo.bar");
        assert_eq!(camel_to_dotted("MaxRedirects"), "max.redirects");
        assert_eq!(camel_to_dotted("Foo"), "foo");
        assert_eq!(camel_to_dotted(""), "");
    }

    #[test]
    fn test_camel_to_dotted_passes_digits_through() {
        assert_eq!(camel_to_dotted("Http2Enabled"), "http2.enabled");
        assert_eq!(camel_to_dotted("max_count"), "max_count");
    }

    #[test]
    fn test_consecutive_capitals_each_get_a_dot() {
        assert_eq!(camel_to_dotted("UserAgentURL"), "user.agent.u.r.l");
    }

    #[test]
    fn test_dotted_to_camel() {
        assert_eq!(dotted_to_camel("foo.bar"), "FooBar");
        assert_eq!(dotted_to_camel("connect.timeout"), "ConnectTimeout");
        assert_eq!(dotted_to_camel("foo."), "Foo");
        assert_eq!(dotted_to_camel(""), "");
    }

    #[test]
    fn test_dotted_to_title() {
        assert_eq!(dotted_to_title("foo.bar"), "Foo Bar");
        assert_eq!(dotted_to_title("http.client.id"), "Http Client Id");
        assert_eq!(dotted_to_title("redirects.enabled"), "Redirects Enabled");
    }

    #[test]
    fn test_round_trip() {
        for name in ["FooBar", "MaxConnPerRoute", "A", "SocketTimeout"] {
            assert_eq!(dotted_to_camel(&camel_to_dotted(name)), name);
        }
    }

    #[test]
    fn test_property_name_borrows_as_str() {
        let mut map = BTreeMap::new();
        map.insert(PropertyName::from("foo.bar"), 1);
        assert_eq!(map.get("foo.bar"), Some(&1));
    }

    #[test]
    fn test_property_name_display() {
        let name = PropertyName::from_camel("MinCount");
        assert_eq!(format!("{}", name), "min.count");
        assert_eq!(name.into_string(), "min.count");
    }
}
