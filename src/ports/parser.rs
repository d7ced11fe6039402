// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration parser trait definition.
//!
//! This module defines the `ConfigParser` trait, which turns the text of a
//! configuration file into a flat map of dotted keys to typed values.

use crate::domain::{ConfigMap, Result};

/// A trait for configuration file parsers.
///
/// Nested structures are flattened into dotted keys, e.g. a `request: { config: {
/// socket: { timeout: 2000 } } }` document yields `request.config.socket.timeout`.
pub trait ConfigParser {
    /// Parses the content into a flat map.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the content is malformed.
    fn parse(&self, content: &str) -> Result<ConfigMap>;

    /// Returns the file extensions this parser handles, without the leading dot.
    fn supported_extensions(&self) -> &[&str];
}
