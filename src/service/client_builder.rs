// SPDX-License-Identifier: MIT OR Apache-2.0

//! The transport builder.
//!
//! [`HttpClientBuilder`] collects transport settings through bean-style setters and
//! `disable*`/`evict*` toggles, then builds an [`HttpClient`] around a
//! `reqwest::Client`.

use crate::binding::{Introspect, Method, MethodBody};
use crate::domain::{ConfigError, ConfigValue, FromValue, ParamType, Result};
use crate::service::client::HttpClient;
use crate::service::request_config::RequestConfig;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::redirect::Policy;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::trace;

/// Idle timeout used when expired-connection eviction is enabled without an interval.
pub const DEFAULT_EVICTION_IDLE_TIME: Duration = Duration::from_secs(90);

/// A unit for durations given as a count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    /// Nanoseconds
    Nanoseconds,
    /// Microseconds
    Microseconds,
    /// Milliseconds
    Milliseconds,
    /// Seconds
    Seconds,
    /// Minutes
    Minutes,
    /// Hours
    Hours,
    /// Days
    Days,
}

impl TimeUnit {
    /// Converts `count` units into a duration; negative counts yield `None`.
    pub fn to_duration(self, count: i64) -> Option<Duration> {
        let count = u64::try_from(count).ok()?;
        let duration = match self {
            TimeUnit::Nanoseconds => Duration::from_nanos(count),
            TimeUnit::Microseconds => Duration::from_micros(count),
            TimeUnit::Milliseconds => Duration::from_millis(count),
            TimeUnit::Seconds => Duration::from_secs(count),
            TimeUnit::Minutes => Duration::from_secs(count.saturating_mul(60)),
            TimeUnit::Hours => Duration::from_secs(count.saturating_mul(3_600)),
            TimeUnit::Days => Duration::from_secs(count.saturating_mul(86_400)),
        };
        Some(duration)
    }

    /// The upper-case name, e.g. `MILLISECONDS`.
    pub fn name(self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "NANOSECONDS",
            TimeUnit::Microseconds => "MICROSECONDS",
            TimeUnit::Milliseconds => "MILLISECONDS",
            TimeUnit::Seconds => "SECONDS",
            TimeUnit::Minutes => "MINUTES",
            TimeUnit::Hours => "HOURS",
            TimeUnit::Days => "DAYS",
        }
    }
}

impl FromStr for TimeUnit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "NANOSECONDS" => Ok(TimeUnit::Nanoseconds),
            "MICROSECONDS" => Ok(TimeUnit::Microseconds),
            "MILLISECONDS" => Ok(TimeUnit::Milliseconds),
            "SECONDS" => Ok(TimeUnit::Seconds),
            "MINUTES" => Ok(TimeUnit::Minutes),
            "HOURS" => Ok(TimeUnit::Hours),
            "DAYS" => Ok(TimeUnit::Days),
            _ => Err(ConfigError::ParseError {
                message: format!("Unknown time unit '{}'", s),
                source: None,
            }),
        }
    }
}

impl From<TimeUnit> for ConfigValue {
    fn from(unit: TimeUnit) -> Self {
        ConfigValue::from(unit.name())
    }
}

impl FromValue for TimeUnit {
    fn param_type() -> ParamType {
        ParamType::Opaque("TimeUnit")
    }

    fn from_value(value: &ConfigValue) -> Option<Self> {
        value.as_str()?.parse().ok()
    }
}

/// A proxy endpoint, e.g. `http://proxy.example.com:3128`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProxyHost {
    url: String,
}

impl ProxyHost {
    /// Creates a proxy endpoint from its URL.
    pub fn new(url: impl Into<String>) -> Self {
        ProxyHost { url: url.into() }
    }

    /// The proxy URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for ProxyHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl FromValue for ProxyHost {
    fn param_type() -> ParamType {
        ParamType::Opaque("ProxyHost")
    }

    fn from_value(value: &ConfigValue) -> Option<Self> {
        value.as_str().map(ProxyHost::new)
    }
}

/// Collects transport settings and builds clients.
///
/// # Examples
///
/// ```
/// use httpcfg::service::{HttpClientBuilder, RequestConfig};
///
/// let mut builder = HttpClientBuilder::create();
/// builder
///     .set_user_agent("agent/1.0")
///     .disable_redirect_handling()
///     .set_default_request_config(RequestConfig::custom().set_socket_timeout(2000).build());
///
/// let client = builder.build().unwrap();
/// assert_eq!(client.request_config().socket_timeout(), 2000);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct HttpClientBuilder {
    user_agent: Option<String>,
    default_headers: Vec<String>,
    max_conn_per_route: Option<usize>,
    tcp_nodelay: bool,
    https_only: bool,
    proxy: Option<ProxyHost>,
    default_request_config: Option<RequestConfig>,
    redirect_handling_disabled: bool,
    content_compression_disabled: bool,
    referer_header_disabled: bool,
    connection_pooling_disabled: bool,
    evict_expired_connections: bool,
    max_idle_time: Option<Duration>,
}

impl HttpClientBuilder {
    /// Creates a builder with the library defaults.
    pub fn create() -> Self {
        HttpClientBuilder {
            user_agent: None,
            default_headers: Vec::new(),
            max_conn_per_route: None,
            tcp_nodelay: true,
            https_only: false,
            proxy: None,
            default_request_config: None,
            redirect_handling_disabled: false,
            content_compression_disabled: false,
            referer_header_disabled: false,
            connection_pooling_disabled: false,
            evict_expired_connections: false,
            max_idle_time: None,
        }
    }

    /// Sets the `User-Agent` header sent with every request.
    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) -> &mut Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets headers sent with every request, each as `Name: value`.
    pub fn set_default_headers(&mut self, headers: Vec<String>) -> &mut Self {
        self.default_headers = headers;
        self
    }

    /// Sets the maximum number of idle connections kept per host.
    pub fn set_max_conn_per_route(&mut self, max: usize) -> &mut Self {
        self.max_conn_per_route = Some(max);
        self
    }

    /// Enables or disables `TCP_NODELAY`.
    pub fn set_tcp_nodelay(&mut self, enabled: bool) -> &mut Self {
        self.tcp_nodelay = enabled;
        self
    }

    /// Restricts the client to HTTPS URLs.
    pub fn set_https_only(&mut self, enabled: bool) -> &mut Self {
        self.https_only = enabled;
        self
    }

    /// Routes all requests through `proxy`.
    pub fn set_proxy(&mut self, proxy: ProxyHost) -> &mut Self {
        self.proxy = Some(proxy);
        self
    }

    /// Attaches the request options applied to every request.
    pub fn set_default_request_config(&mut self, config: RequestConfig) -> &mut Self {
        self.default_request_config = Some(config);
        self
    }

    /// Stops following redirects regardless of the request options.
    pub fn disable_redirect_handling(&mut self) -> &mut Self {
        self.redirect_handling_disabled = true;
        self
    }

    /// Stops transparent decompression regardless of the request options.
    pub fn disable_content_compression(&mut self) -> &mut Self {
        self.content_compression_disabled = true;
        self
    }

    /// Stops sending `Referer` headers on redirects.
    pub fn disable_referer_header(&mut self) -> &mut Self {
        self.referer_header_disabled = true;
        self
    }

    /// Stops keeping idle connections.
    pub fn disable_connection_pooling(&mut self) -> &mut Self {
        self.connection_pooling_disabled = true;
        self
    }

    /// Evicts idle connections after [`DEFAULT_EVICTION_IDLE_TIME`].
    pub fn evict_expired_connections(&mut self) -> &mut Self {
        self.evict_expired_connections = true;
        self
    }

    /// Evicts connections idle for longer than `max_idle_time` units.
    pub fn evict_idle_connections(&mut self, max_idle_time: i64, unit: TimeUnit) -> &mut Self {
        self.max_idle_time = unit.to_duration(max_idle_time);
        self
    }

    /// The user agent, if set.
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// The default headers as `Name: value` lines.
    pub fn default_headers(&self) -> &[String] {
        &self.default_headers
    }

    /// The maximum number of idle connections kept per host.
    pub fn max_conn_per_route(&self) -> Option<usize> {
        if self.connection_pooling_disabled {
            Some(0)
        } else {
            self.max_conn_per_route
        }
    }

    /// The attached request options, or the library defaults.
    pub fn default_request_config(&self) -> &RequestConfig {
        self.default_request_config
            .as_ref()
            .unwrap_or(&RequestConfig::DEFAULT)
    }

    /// Whether redirects are followed, combining the toggle and the request options.
    pub fn follows_redirects(&self) -> bool {
        !self.redirect_handling_disabled && self.default_request_config().is_redirects_enabled()
    }

    /// Whether responses are decompressed, combining the toggle and the request options.
    pub fn decompresses_content(&self) -> bool {
        !self.content_compression_disabled
            && self.default_request_config().is_content_compression_enabled()
    }

    /// Whether `Referer` headers are sent.
    pub fn sends_referer(&self) -> bool {
        !self.referer_header_disabled
    }

    /// The idle timeout after which pooled connections are evicted.
    pub fn idle_eviction(&self) -> Option<Duration> {
        self.max_idle_time.or(if self.evict_expired_connections {
            Some(DEFAULT_EVICTION_IDLE_TIME)
        } else {
            None
        })
    }

    /// Whether only HTTPS URLs are allowed.
    pub fn is_https_only(&self) -> bool {
        self.https_only
    }

    /// Whether `TCP_NODELAY` is set.
    pub fn is_tcp_nodelay(&self) -> bool {
        self.tcp_nodelay
    }

    /// The proxy, if any.
    pub fn proxy(&self) -> Option<&ProxyHost> {
        self.proxy.as_ref()
    }

    /// Builds a client from the collected settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ClientBuildError`] if a header or the proxy is
    /// malformed, or the client library rejects the settings.
    pub fn build(&self) -> Result<HttpClient> {
        let request_config = self.default_request_config().clone();
        let mut builder = reqwest::Client::builder()
            .default_headers(self.header_map()?)
            .tcp_nodelay(self.tcp_nodelay)
            .https_only(self.https_only)
            .referer(self.sends_referer())
            .gzip(self.decompresses_content())
            .pool_idle_timeout(self.idle_eviction());

        builder = if self.follows_redirects() {
            let max = usize::try_from(request_config.max_redirects()).unwrap_or(0);
            builder.redirect(Policy::limited(max))
        } else {
            builder.redirect(Policy::none())
        };
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        if let Some(max) = self.max_conn_per_route() {
            builder = builder.pool_max_idle_per_host(max);
        }
        if let Some(proxy) = &self.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy.url())?);
        }
        if let Some(timeout) = request_config.connect_timeout_duration() {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = request_config.socket_timeout_duration() {
            builder = builder.read_timeout(timeout);
        }
        if let Some(address) = request_config.local_address() {
            builder = builder.local_address(address);
        }

        let client = builder.build()?;
        trace!("Built HTTP client with {:?}", request_config);
        Ok(HttpClient::new(client, request_config))
    }

    fn header_map(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        for line in &self.default_headers {
            let Some((name, value)) = line.split_once(':') else {
                return Err(build_error(format!(
                    "Default header '{}' is not of the form 'Name: value'",
                    line
                )));
            };
            let name = HeaderName::from_bytes(name.trim().as_bytes())
                .map_err(|e| build_error(format!("Invalid header name in '{}': {}", line, e)))?;
            let value = HeaderValue::from_str(value.trim())
                .map_err(|e| build_error(format!("Invalid header value in '{}': {}", line, e)))?;
            headers.append(name, value);
        }
        Ok(headers)
    }
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self::create()
    }
}

fn build_error(message: String) -> ConfigError {
    ConfigError::ClientBuildError {
        message,
        source: None,
    }
}

impl Introspect for HttpClientBuilder {
    fn declared_methods() -> Vec<Method<Self>> {
        vec![
            Method::setter("setUserAgent", |b: &mut Self, v: String| {
                b.set_user_agent(v);
            }),
            Method::setter("setDefaultHeaders", |b: &mut Self, v: Vec<String>| {
                b.set_default_headers(v);
            }),
            Method::try_setter("setMaxConnPerRoute", |b: &mut Self, v: i32| {
                let max = usize::try_from(v).map_err(|_| {
                    ConfigError::invocation("setMaxConnPerRoute", format!("negative value {}", v))
                })?;
                b.set_max_conn_per_route(max);
                Ok(())
            }),
            Method::setter("setTcpNodelay", |b: &mut Self, v: bool| {
                b.set_tcp_nodelay(v);
            }),
            Method::setter("setHttpsOnly", |b: &mut Self, v: bool| {
                b.set_https_only(v);
            }),
            Method::setter("setProxy", |b: &mut Self, v: ProxyHost| {
                b.set_proxy(v);
            }),
            Method::raw(
                "setDefaultRequestConfig",
                vec![ParamType::Opaque("RequestConfig")],
                None,
                MethodBody::Mutate(Box::new(
                    |_: &mut Self, _: &[ConfigValue]| -> Result<Option<ConfigValue>> {
                        Err(ConfigError::invocation(
                            "setDefaultRequestConfig",
                            "request options cannot be supplied as a configuration value",
                        ))
                    },
                )),
            ),
            Method::action("disableRedirectHandling", |b: &mut Self| {
                b.disable_redirect_handling();
            }),
            Method::action("disableContentCompression", |b: &mut Self| {
                b.disable_content_compression();
            }),
            Method::action("disableRefererHeader", |b: &mut Self| {
                b.disable_referer_header();
            }),
            Method::action("disableConnectionPooling", |b: &mut Self| {
                b.disable_connection_pooling();
            }),
            Method::action("evictExpiredConnections", |b: &mut Self| {
                b.evict_expired_connections();
            }),
            Method::setter2(
                "evictIdleConnections",
                |b: &mut Self, max_idle_time: i64, unit: TimeUnit| {
                    b.evict_idle_connections(max_idle_time, unit);
                },
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::bean_setters;
    use crate::domain::ValueKind;

    #[test]
    fn test_time_unit() {
        assert_eq!("milliseconds".parse::<TimeUnit>().unwrap(), TimeUnit::Milliseconds);
        assert!("fortnights".parse::<TimeUnit>().is_err());
        assert_eq!(
            TimeUnit::Minutes.to_duration(2),
            Some(Duration::from_secs(120))
        );
        assert_eq!(TimeUnit::Seconds.to_duration(-1), None);
        assert_eq!(ConfigValue::from(TimeUnit::Milliseconds), ConfigValue::from("MILLISECONDS"));
    }

    #[test]
    fn test_bean_setters() {
        let setters = bean_setters::<HttpClientBuilder>();
        let names: Vec<&str> = setters.names().map(|n| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "default.headers",
                "default.request.config",
                "https.only",
                "max.conn.per.route",
                "proxy",
                "tcp.nodelay",
                "user.agent",
            ]
        );
        assert_eq!(
            setters.get("default.headers").unwrap().parameter_types(),
            vec![ParamType::Array(ValueKind::String)]
        );
    }

    #[test]
    fn test_toggles_combine_with_request_config() {
        let mut builder = HttpClientBuilder::create();
        assert!(builder.follows_redirects());
        builder.set_default_request_config(
            RequestConfig::custom().set_redirects_enabled(false).build(),
        );
        assert!(!builder.follows_redirects());

        let mut builder = HttpClientBuilder::create();
        builder.disable_redirect_handling();
        assert!(!builder.follows_redirects());
    }

    #[test]
    fn test_idle_eviction() {
        let mut builder = HttpClientBuilder::create();
        assert_eq!(builder.idle_eviction(), None);
        builder.evict_expired_connections();
        assert_eq!(builder.idle_eviction(), Some(DEFAULT_EVICTION_IDLE_TIME));
        builder.evict_idle_connections(500, TimeUnit::Milliseconds);
        assert_eq!(builder.idle_eviction(), Some(Duration::from_millis(500)));
    }

    #[test]
    fn test_connection_pooling_disabled() {
        let mut builder = HttpClientBuilder::create();
        builder.set_max_conn_per_route(20);
        assert_eq!(builder.max_conn_per_route(), Some(20));
        builder.disable_connection_pooling();
        assert_eq!(builder.max_conn_per_route(), Some(0));
    }

    #[test]
    fn test_build() {
        let mut builder = HttpClientBuilder::create();
        builder
            .set_user_agent("httpcfg-test")
            .set_default_headers(vec!["X-Trace: on".to_string()])
            .set_default_request_config(RequestConfig::custom().set_connect_timeout(100).build());
        let client = builder.build().unwrap();
        assert_eq!(client.request_config().connect_timeout(), 100);
        assert!(!client.is_closed());
    }

    #[test]
    fn test_build_rejects_malformed_header() {
        let mut builder = HttpClientBuilder::create();
        builder.set_default_headers(vec!["no-colon".to_string()]);
        assert!(matches!(
            builder.build(),
            Err(ConfigError::ClientBuildError { .. })
        ));
    }

    #[test]
    fn test_negative_max_conn_per_route_is_rejected() {
        let setters = bean_setters::<HttpClientBuilder>();
        let mut builder = HttpClientBuilder::create();
        let result = setters
            .get("max.conn.per.route")
            .unwrap()
            .invoke(&mut builder, &[ConfigValue::from(-1)]);
        assert!(result.is_err());
        assert_eq!(builder.max_conn_per_route(), None);
    }
}
