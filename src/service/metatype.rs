// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration schemas of the HTTP client component.
//!
//! Two schemas are published: one for the singleton default client and one for
//! factory-created instances, which additionally carry their identity. Both
//! describe the `request.config.*` options (with the library defaults) followed by
//! the transport builder's options.

use crate::binding::{
    attribute_definition, attribute_definitions, bean_setters, create_object_class_definition,
    join, GetterAdapter, Introspect, Invoker, PropertyRegistry,
};
use crate::domain::property_name::camel_to_dotted;
use crate::domain::{
    AttributeDefinition, ConfigValue, ObjectClassDefinition, ParamType, PropertyName, ValueKind,
};
use crate::ports::MetaTypeProvider;
use crate::service::client_builder::{HttpClientBuilder, TimeUnit};
use crate::service::request_config::{RequestConfig, RequestConfigBuilder, REQUEST_CONFIG_NAMESPACE};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

/// Schema id of the singleton default client.
pub const DEFAULT_HTTP_CLIENT_PID: &str = "httpcfg.client.default";

/// Schema id of factory-created client instances.
pub const HTTP_CLIENT_FACTORY_PID: &str = "httpcfg.client";

/// Identity property of a factory-created client.
pub const HTTP_CLIENT_ID: &str = "http.client.id";

/// Property a configuration UI uses to label factory instances.
pub const NAME_HINT: &str = "webconsole.configurationFactory.nameHint";

const DISABLE_PREFIX: &str = "disable";
const ENABLED_SUFFIX: &str = ".enabled";

const DESCRIPTION: &str =
    "Configuration to provide pre-configured HttpClient instances via the service registry.";

static TRANSPORT_SETTERS: Lazy<PropertyRegistry<HttpClientBuilder>> =
    Lazy::new(build_transport_setters);

static ATTRIBUTE_DEFINITIONS: Lazy<Vec<AttributeDefinition>> = Lazy::new(|| {
    let request_config_getters = RequestConfig::getters();
    join([
        attribute_definitions(
            REQUEST_CONFIG_NAMESPACE,
            RequestConfigBuilder::setters(),
            &GetterAdapter::new(&RequestConfig::DEFAULT, request_config_getters),
        ),
        attribute_definitions(
            "",
            transport_setters(),
            &GetterAdapter::<HttpClientBuilder>::empty(),
        ),
    ])
});

static DEFINITIONS: Lazy<BTreeMap<&'static str, ObjectClassDefinition>> = Lazy::new(|| {
    let string = ParamType::Scalar(ValueKind::String);
    let identity = join([
        fixed_attribute(HTTP_CLIENT_ID, Some("HttpClient ID"), string, &[]),
        fixed_attribute(NAME_HINT, None, string, &["HttpClient ID: {http.client.id}"]),
    ]);

    let mut definitions = BTreeMap::new();
    definitions.insert(
        DEFAULT_HTTP_CLIENT_PID,
        create_object_class_definition(
            DEFAULT_HTTP_CLIENT_PID,
            Some("Default HTTP Client Configuration"),
            Some(DESCRIPTION),
            ATTRIBUTE_DEFINITIONS.to_vec(),
        ),
    );
    definitions.insert(
        HTTP_CLIENT_FACTORY_PID,
        create_object_class_definition(
            HTTP_CLIENT_FACTORY_PID,
            Some("HTTP Client Configuration"),
            Some(DESCRIPTION),
            join([identity, ATTRIBUTE_DEFINITIONS.to_vec()]),
        ),
    );
    definitions
});

/// The setters bound from the empty namespace onto the transport builder.
///
/// Besides the builder's bean setters this holds the derived toggles:
/// every zero-argument `disableX` method as `x.enabled` (acting on `false`),
/// `evict.expired.connections` (acting on `true`) and `evict.idle.connections.ms`
/// (idle eviction with the unit fixed to milliseconds).
pub fn transport_setters() -> &'static PropertyRegistry<HttpClientBuilder> {
    &TRANSPORT_SETTERS
}

fn build_transport_setters() -> PropertyRegistry<HttpClientBuilder> {
    let mut setters = bean_setters::<HttpClientBuilder>();
    for method in HttpClientBuilder::declared_methods() {
        let name = method.name().to_string();
        let arity = method.parameter_types().len();
        let method = Arc::new(method);
        if arity == 0 {
            if let Some(feature) = name.strip_prefix(DISABLE_PREFIX) {
                let property = format!("{}{}", camel_to_dotted(feature), ENABLED_SUFFIX);
                setters.insert(
                    PropertyName::new(property),
                    Invoker::conditional(method, false),
                );
                continue;
            }
        }
        match name.as_str() {
            "evictExpiredConnections" => {
                setters.insert(
                    PropertyName::new("evict.expired.connections"),
                    Invoker::conditional(method, true),
                );
            }
            "evictIdleConnections" => {
                let defaults = vec![None, Some(ConfigValue::from(TimeUnit::Milliseconds))];
                match Invoker::default_arguments(method, defaults) {
                    Ok(invoker) => {
                        setters.insert(PropertyName::new("evict.idle.connections.ms"), invoker);
                    }
                    Err(e) => warn!("Not exposing idle connection eviction: {}", e),
                }
            }
            _ => {}
        }
    }
    setters
}

fn fixed_attribute(
    id: &str,
    name: Option<&str>,
    ty: ParamType,
    default_values: &[&str],
) -> Vec<AttributeDefinition> {
    attribute_definition(id, name, ty, default_values).unwrap_or_else(|e| {
        warn!("Failed to describe '{}': {}", id, e);
        Vec::new()
    })
}

/// Metadata provider for the default client and for factory-created clients.
///
/// # Examples
///
/// ```
/// use httpcfg::ports::MetaTypeProvider;
/// use httpcfg::service::metatype::{HttpClientMetaType, HTTP_CLIENT_FACTORY_PID};
///
/// let metatype = HttpClientMetaType;
/// let ocd = metatype
///     .object_class_definition(HTTP_CLIENT_FACTORY_PID, None)
///     .unwrap();
/// assert_eq!(ocd.attribute_definitions()[0].id(), "http.client.id");
/// assert!(metatype.object_class_definition("unknown", None).is_none());
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpClientMetaType;

impl HttpClientMetaType {
    /// The attribute definitions shared by both schemas.
    pub fn attribute_definitions(&self) -> &'static [AttributeDefinition] {
        &ATTRIBUTE_DEFINITIONS
    }

    /// The schema ids this provider describes.
    pub fn pids(&self) -> impl Iterator<Item = &'static str> {
        DEFINITIONS.keys().copied()
    }
}

impl MetaTypeProvider for HttpClientMetaType {
    fn object_class_definition(
        &self,
        id: &str,
        _locale: Option<&str>,
    ) -> Option<&ObjectClassDefinition> {
        DEFINITIONS.get(id)
    }

    fn locales(&self) -> Option<&[String]> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::attribute::UNBOUNDED;

    fn ids(definitions: &[AttributeDefinition]) -> Vec<&str> {
        definitions.iter().map(|ad| ad.id()).collect()
    }

    #[test]
    fn test_transport_toggles() {
        let setters = transport_setters();
        for name in [
            "redirect.handling.enabled",
            "content.compression.enabled",
            "referer.header.enabled",
            "connection.pooling.enabled",
            "evict.expired.connections",
            "evict.idle.connections.ms",
        ] {
            assert!(setters.contains(name), "missing {}", name);
        }
        assert_eq!(
            setters.get("redirect.handling.enabled").unwrap().parameter_types(),
            vec![ParamType::Scalar(ValueKind::Boolean)]
        );
        assert_eq!(
            setters.get("evict.idle.connections.ms").unwrap().parameter_types(),
            vec![ParamType::Scalar(ValueKind::Long)]
        );
    }

    #[test]
    fn test_disable_toggle_acts_on_false() {
        let setters = transport_setters();
        let invoker = setters.get("redirect.handling.enabled").unwrap();

        let mut builder = HttpClientBuilder::create();
        invoker.invoke(&mut builder, &[ConfigValue::from(true)]).unwrap();
        assert!(builder.follows_redirects());
        invoker.invoke(&mut builder, &[ConfigValue::from(false)]).unwrap();
        assert!(!builder.follows_redirects());
    }

    #[test]
    fn test_idle_eviction_in_milliseconds() {
        let setters = transport_setters();
        let mut builder = HttpClientBuilder::create();
        setters
            .get("evict.idle.connections.ms")
            .unwrap()
            .invoke(&mut builder, &[ConfigValue::Long(1500)])
            .unwrap();
        assert_eq!(
            builder.idle_eviction(),
            Some(std::time::Duration::from_millis(1500))
        );
    }

    #[test]
    fn test_request_config_defaults() {
        let metatype = HttpClientMetaType;
        let definitions = metatype.attribute_definitions();
        let socket_timeout = definitions
            .iter()
            .find(|ad| ad.id() == "request.config.socket.timeout")
            .unwrap();
        assert_eq!(socket_timeout.name(), Some("Socket Timeout"));
        assert_eq!(socket_timeout.default_value(), Some(&["-1".to_string()][..]));
        assert_eq!(socket_timeout.description(), "default: -1");

        let max_redirects = definitions
            .iter()
            .find(|ad| ad.id() == "request.config.max.redirects")
            .unwrap();
        assert_eq!(max_redirects.default_value(), Some(&["50".to_string()][..]));
    }

    #[test]
    fn test_opaque_setters_not_described() {
        let ids = ids(HttpClientMetaType.attribute_definitions());
        assert!(!ids.contains(&"request.config.local.address"));
        assert!(!ids.contains(&"proxy"));
        assert!(!ids.contains(&"default.request.config"));
        assert!(ids.contains(&"user.agent"));
    }

    #[test]
    fn test_transport_attributes_have_no_defaults() {
        let definitions = HttpClientMetaType.attribute_definitions();
        let headers = definitions
            .iter()
            .find(|ad| ad.id() == "default.headers")
            .unwrap();
        assert_eq!(headers.cardinality(), UNBOUNDED);
        assert_eq!(headers.default_value(), None);
    }

    #[test]
    fn test_object_class_definitions() {
        let metatype = HttpClientMetaType;
        let default = metatype
            .object_class_definition(DEFAULT_HTTP_CLIENT_PID, None)
            .unwrap();
        let factory = metatype
            .object_class_definition(HTTP_CLIENT_FACTORY_PID, Some("de"))
            .unwrap();

        assert_eq!(default.name(), "Default HTTP Client Configuration");
        assert_eq!(default.description(), Some(DESCRIPTION));
        assert!(default.attribute(HTTP_CLIENT_ID).is_none());
        assert_eq!(
            factory.attribute_definitions().len(),
            default.attribute_definitions().len() + 2
        );

        let hint = factory.attribute(NAME_HINT).unwrap();
        assert_eq!(hint.name(), None);
        assert_eq!(hint.description(), "default: HttpClient ID: {http.client.id}");
        assert_eq!(factory.attribute(HTTP_CLIENT_ID).unwrap().name(), Some("HttpClient ID"));

        assert!(metatype.locales().is_none());
        assert_eq!(
            metatype.pids().collect::<Vec<_>>(),
            vec![HTTP_CLIENT_FACTORY_PID, DEFAULT_HTTP_CLIENT_PID]
        );
    }
}
