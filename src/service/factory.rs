// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport and client factories.
//!
//! [`PreconfiguredClientFactory`] layers an effective configuration over another
//! transport factory. [`ClientPrototype`] publishes that factory's clients through
//! the service registry, one fresh client per consumer.

use crate::binding::bind;
use crate::domain::{ConfigMap, Result};
use crate::ports::{ServiceFactory, ServiceInstance, TransportFactory};
use crate::service::client::HttpClient;
use crate::service::client_builder::HttpClientBuilder;
use crate::service::metatype::transport_setters;
use crate::service::request_config::{RequestConfig, RequestConfigBuilder, REQUEST_CONFIG_NAMESPACE};
use std::fmt;
use std::sync::Arc;
use tracing::{trace, warn};

/// A transport factory handing out [`HttpClientBuilder`]s.
pub type HttpTransportFactory = dyn TransportFactory<Builder = HttpClientBuilder>;

/// Hands out unconfigured transport builders with the library defaults.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultTransportFactory;

impl TransportFactory for DefaultTransportFactory {
    type Builder = HttpClientBuilder;

    fn new_builder(&self) -> HttpClientBuilder {
        HttpClientBuilder::create()
    }
}

/// A transport factory whose builders come pre-configured.
///
/// Every builder is obtained from the delegate and then bound in two phases: the
/// `request.config` namespace onto request options seeded from the library
/// defaults, then the empty namespace onto the builder itself. The resulting
/// request options are attached to the builder last.
pub struct PreconfiguredClientFactory {
    delegate: Arc<HttpTransportFactory>,
    configuration: ConfigMap,
}

impl PreconfiguredClientFactory {
    /// Wraps `delegate` with an effective configuration.
    pub fn new(delegate: Arc<HttpTransportFactory>, configuration: ConfigMap) -> Self {
        PreconfiguredClientFactory {
            delegate,
            configuration,
        }
    }

    /// The effective configuration applied to every builder.
    pub fn configuration(&self) -> &ConfigMap {
        &self.configuration
    }

    /// Builds the request options described by the configuration.
    pub fn request_config(&self) -> RequestConfig {
        let mut builder = RequestConfig::custom();
        bind(
            REQUEST_CONFIG_NAMESPACE,
            &self.configuration,
            &mut builder,
            RequestConfigBuilder::setters(),
        );
        builder.build()
    }
}

impl TransportFactory for PreconfiguredClientFactory {
    type Builder = HttpClientBuilder;

    fn new_builder(&self) -> HttpClientBuilder {
        let request_config = self.request_config();
        let mut builder = self.delegate.new_builder();
        bind("", &self.configuration, &mut builder, transport_setters());
        builder.set_default_request_config(request_config);
        builder
    }
}

impl fmt::Debug for PreconfiguredClientFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreconfiguredClientFactory")
            .field("configuration", &self.configuration)
            .finish()
    }
}

/// Creates a new client for every consumer and closes it when handed back.
pub struct ClientPrototype {
    id: String,
    factory: Arc<HttpTransportFactory>,
}

impl ClientPrototype {
    /// Creates a prototype for the client identified by `id`.
    pub fn new(id: impl Into<String>, factory: Arc<HttpTransportFactory>) -> Self {
        ClientPrototype {
            id: id.into(),
            factory,
        }
    }

    /// Builds a new client.
    ///
    /// # Errors
    ///
    /// Returns a `ClientBuildError` if the transport rejects the configuration.
    pub fn create_client(&self) -> Result<HttpClient> {
        let client = self.factory.new_builder().build()?.with_id(self.id.as_str());
        trace!("Created HttpClient {}", self.id);
        Ok(client)
    }
}

impl ServiceFactory for ClientPrototype {
    fn get_service(&self) -> Result<ServiceInstance> {
        Ok(Arc::new(self.create_client()?))
    }

    fn unget_service(&self, service: ServiceInstance) {
        match service.downcast::<HttpClient>() {
            Ok(client) => {
                if let Err(e) = client.close() {
                    warn!("Failed to close HttpClient {}: {}", self.id, e);
                }
            }
            Err(_) => warn!("Not an HttpClient handed back to '{}'", self.id),
        }
    }
}

impl fmt::Debug for ClientPrototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientPrototype").field("id", &self.id).finish()
    }
}
