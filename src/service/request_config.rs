// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-request options and their builder.
//!
//! [`RequestConfig`] is the immutable request-options object attached to every client.
//! Its getters expose the library defaults to the metadata synthesizer, and
//! [`RequestConfigBuilder`]'s setters receive the `request.config.*` namespace.

use crate::binding::{bean_getters, bean_setters, Introspect, Method, MethodBody, PropertyRegistry};
use crate::domain::{ConfigValue, FromValue};
use once_cell::sync::Lazy;
use std::net::IpAddr;
use std::time::Duration;

/// Configuration namespace bound onto the request-options builder.
pub const REQUEST_CONFIG_NAMESPACE: &str = "request.config";

static REQUEST_CONFIG_GETTERS: Lazy<PropertyRegistry<RequestConfig>> =
    Lazy::new(bean_getters::<RequestConfig>);

static REQUEST_CONFIG_BUILDER_SETTERS: Lazy<PropertyRegistry<RequestConfigBuilder>> =
    Lazy::new(bean_setters::<RequestConfigBuilder>);

/// Immutable per-request options.
///
/// Timeouts are in milliseconds; a negative value means "not set".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestConfig {
    connect_timeout: i32,
    socket_timeout: i32,
    redirects_enabled: bool,
    max_redirects: i32,
    content_compression_enabled: bool,
    local_address: Option<IpAddr>,
}

impl RequestConfig {
    /// The library defaults.
    pub const DEFAULT: RequestConfig = RequestConfig {
        connect_timeout: -1,
        socket_timeout: -1,
        redirects_enabled: true,
        max_redirects: 50,
        content_compression_enabled: true,
        local_address: None,
    };

    /// Starts a builder seeded from the library defaults.
    pub fn custom() -> RequestConfigBuilder {
        RequestConfig::copy(&RequestConfig::DEFAULT)
    }

    /// Starts a builder seeded from `config`.
    pub fn copy(config: &RequestConfig) -> RequestConfigBuilder {
        RequestConfigBuilder {
            config: config.clone(),
        }
    }

    /// Connect timeout in milliseconds, negative when unset.
    pub fn connect_timeout(&self) -> i32 {
        self.connect_timeout
    }

    /// Socket read timeout in milliseconds, negative when unset.
    pub fn socket_timeout(&self) -> i32 {
        self.socket_timeout
    }

    /// Whether redirects are followed.
    pub fn is_redirects_enabled(&self) -> bool {
        self.redirects_enabled
    }

    /// Maximum number of redirects followed.
    pub fn max_redirects(&self) -> i32 {
        self.max_redirects
    }

    /// Whether responses are transparently decompressed.
    pub fn is_content_compression_enabled(&self) -> bool {
        self.content_compression_enabled
    }

    /// Local address outgoing connections bind to.
    pub fn local_address(&self) -> Option<IpAddr> {
        self.local_address
    }

    /// The connect timeout as a duration, if set.
    pub fn connect_timeout_duration(&self) -> Option<Duration> {
        millis(self.connect_timeout)
    }

    /// The socket timeout as a duration, if set.
    pub fn socket_timeout_duration(&self) -> Option<Duration> {
        millis(self.socket_timeout)
    }

    /// The getter registry of this type.
    pub fn getters() -> &'static PropertyRegistry<RequestConfig> {
        &REQUEST_CONFIG_GETTERS
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        RequestConfig::DEFAULT
    }
}

impl Introspect for RequestConfig {
    fn declared_methods() -> Vec<Method<Self>> {
        vec![
            Method::getter("getConnectTimeout", RequestConfig::connect_timeout),
            Method::getter("getSocketTimeout", RequestConfig::socket_timeout),
            Method::getter("isRedirectsEnabled", RequestConfig::is_redirects_enabled),
            Method::getter("getMaxRedirects", RequestConfig::max_redirects),
            Method::getter(
                "isContentCompressionEnabled",
                RequestConfig::is_content_compression_enabled,
            ),
            Method::raw(
                "getLocalAddress",
                Vec::new(),
                Some(IpAddr::param_type()),
                MethodBody::Query(Box::new(|c: &RequestConfig| {
                    c.local_address.map(|a| ConfigValue::from(a.to_string()))
                })),
            ),
        ]
    }
}

/// Builder for [`RequestConfig`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestConfigBuilder {
    config: RequestConfig,
}

impl RequestConfigBuilder {
    /// Sets the connect timeout in milliseconds.
    pub fn set_connect_timeout(&mut self, millis: i32) -> &mut Self {
        self.config.connect_timeout = millis;
        self
    }

    /// Sets the socket read timeout in milliseconds.
    pub fn set_socket_timeout(&mut self, millis: i32) -> &mut Self {
        self.config.socket_timeout = millis;
        self
    }

    /// Enables or disables following redirects.
    pub fn set_redirects_enabled(&mut self, enabled: bool) -> &mut Self {
        self.config.redirects_enabled = enabled;
        self
    }

    /// Sets the maximum number of redirects followed.
    pub fn set_max_redirects(&mut self, max: i32) -> &mut Self {
        self.config.max_redirects = max;
        self
    }

    /// Enables or disables transparent decompression.
    pub fn set_content_compression_enabled(&mut self, enabled: bool) -> &mut Self {
        self.config.content_compression_enabled = enabled;
        self
    }

    /// Sets the local address outgoing connections bind to.
    pub fn set_local_address(&mut self, address: IpAddr) -> &mut Self {
        self.config.local_address = Some(address);
        self
    }

    /// Builds the immutable options.
    pub fn build(&self) -> RequestConfig {
        self.config.clone()
    }

    /// The setter registry of this type.
    pub fn setters() -> &'static PropertyRegistry<RequestConfigBuilder> {
        &REQUEST_CONFIG_BUILDER_SETTERS
    }
}

impl Introspect for RequestConfigBuilder {
    fn declared_methods() -> Vec<Method<Self>> {
        vec![
            Method::setter("setConnectTimeout", |b: &mut Self, v: i32| {
                b.set_connect_timeout(v);
            }),
            Method::setter("setSocketTimeout", |b: &mut Self, v: i32| {
                b.set_socket_timeout(v);
            }),
            Method::setter("setRedirectsEnabled", |b: &mut Self, v: bool| {
                b.set_redirects_enabled(v);
            }),
            Method::setter("setMaxRedirects", |b: &mut Self, v: i32| {
                b.set_max_redirects(v);
            }),
            Method::setter("setContentCompressionEnabled", |b: &mut Self, v: bool| {
                b.set_content_compression_enabled(v);
            }),
            Method::setter("setLocalAddress", |b: &mut Self, v: IpAddr| {
                b.set_local_address(v);
            }),
        ]
    }
}

fn millis(value: i32) -> Option<Duration> {
    u64::try_from(value).ok().map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::bind;
    use crate::domain::ConfigMap;

    #[test]
    fn test_defaults() {
        let config = RequestConfig::DEFAULT;
        assert_eq!(config.connect_timeout(), -1);
        assert_eq!(config.socket_timeout(), -1);
        assert!(config.is_redirects_enabled());
        assert_eq!(config.max_redirects(), 50);
        assert!(config.is_content_compression_enabled());
        assert_eq!(config.local_address(), None);
        assert_eq!(config.socket_timeout_duration(), None);
    }

    #[test]
    fn test_builder_copies_and_overrides() {
        let config = RequestConfig::custom()
            .set_socket_timeout(2000)
            .set_max_redirects(3)
            .build();
        assert_eq!(config.socket_timeout(), 2000);
        assert_eq!(config.max_redirects(), 3);
        assert_eq!(config.connect_timeout(), -1);
        assert_eq!(
            config.socket_timeout_duration(),
            Some(Duration::from_millis(2000))
        );
    }

    #[test]
    fn test_registries() {
        let setters: Vec<&str> = RequestConfigBuilder::setters()
            .names()
            .map(|n| n.as_str())
            .collect();
        assert_eq!(
            setters,
            vec![
                "connect.timeout",
                "content.compression.enabled",
                "local.address",
                "max.redirects",
                "redirects.enabled",
                "socket.timeout",
            ]
        );
        assert_eq!(RequestConfig::getters().len(), 6);
    }

    #[test]
    fn test_bind_request_config_namespace() {
        let mut config = ConfigMap::new();
        config.insert(
            "request.config.socket.timeout".to_string(),
            ConfigValue::from(5000),
        );
        config.insert(
            "request.config.redirects.enabled".to_string(),
            ConfigValue::from(false),
        );
        config.insert("max.redirects".to_string(), ConfigValue::from(1));

        let mut builder = RequestConfig::custom();
        let report = bind(
            REQUEST_CONFIG_NAMESPACE,
            &config,
            &mut builder,
            RequestConfigBuilder::setters(),
        );
        let built = builder.build();
        assert_eq!(built.socket_timeout(), 5000);
        assert!(!built.is_redirects_enabled());
        assert_eq!(built.max_redirects(), 50);
        assert!(report.is_clean());
    }
}
