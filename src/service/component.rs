// SPDX-License-Identifier: MIT OR Apache-2.0

//! The client configuration component.
//!
//! An activated [`HttpClientConfiguration`] owns two registrations in the service
//! registry: a pre-configured transport factory and a client prototype. Both carry
//! the effective configuration as their properties, so consumers can select a
//! client by filtering on, for example, `http.client.id`.

use crate::binding::{clean, forbidden_properties, merge_and_sanitize};
use crate::domain::{ConfigError, ConfigMap, ConfigValue, Result};
use crate::ports::{ServiceId, ServiceObject, ServiceRegistry, SERVICE_RANKING};
use crate::service::factory::{ClientPrototype, HttpTransportFactory, PreconfiguredClientFactory};
use crate::service::metatype::HTTP_CLIENT_ID;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Interface name of the client registrations.
pub const HTTP_CLIENT_INTERFACE: &str = "HttpClient";

/// Interface name of the pre-configured transport factory registrations.
pub const TRANSPORT_FACTORY_INTERFACE: &str = "HttpClientBuilderFactory";

/// Identity of the singleton default client.
pub const DEFAULT_CLIENT_ID: &str = "default";

/// Ranking of the default client's registrations.
pub const DEFAULT_RANKING: i32 = 100;

/// An activated client configuration.
///
/// Dropping the component unregisters its services.
pub struct HttpClientConfiguration {
    id: String,
    registry: Arc<dyn ServiceRegistry>,
    properties: ConfigMap,
    registrations: Vec<ServiceId>,
}

impl HttpClientConfiguration {
    /// Activates the singleton default client.
    ///
    /// The configuration is optional. Its registrations carry a `service.ranking`
    /// of [`DEFAULT_RANKING`] so that lookups without a filter prefer it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCollaborator`] if no transport factory is
    /// available, or [`ConfigError::RegistrationFailed`] if the registry refuses a
    /// registration.
    pub fn activate_default(
        registry: Arc<dyn ServiceRegistry>,
        transport: Option<Arc<HttpTransportFactory>>,
        configuration: Option<&ConfigMap>,
    ) -> Result<Self> {
        let transport = require_transport(transport)?;
        let effective = configuration
            .map(|c| clean(c.clone(), forbidden_properties()))
            .unwrap_or_default();
        let mut properties = effective.clone();
        properties.insert(
            SERVICE_RANKING.to_string(),
            ConfigValue::Integer(DEFAULT_RANKING),
        );
        Self::activate(
            DEFAULT_CLIENT_ID.to_string(),
            registry,
            transport,
            effective,
            properties,
        )
    }

    /// Activates a factory-created client.
    ///
    /// The instance configuration is merged over the default client's configuration
    /// (the instance wins) and reserved keys are removed, including any ranking.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingIdentity`] if the configuration lacks
    /// `http.client.id`, [`ConfigError::MissingCollaborator`] if no transport
    /// factory is available, or [`ConfigError::RegistrationFailed`] if the registry
    /// refuses a registration.
    pub fn activate_instance(
        registry: Arc<dyn ServiceRegistry>,
        transport: Option<Arc<HttpTransportFactory>>,
        configuration: &ConfigMap,
        default_configuration: Option<&ConfigMap>,
    ) -> Result<Self> {
        let id = configuration
            .get(HTTP_CLIENT_ID)
            .map(ConfigValue::to_string)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ConfigError::MissingIdentity {
                key: HTTP_CLIENT_ID.to_string(),
            })?;
        let transport = require_transport(transport)?;
        let effective = merge_and_sanitize(
            [Some(configuration), default_configuration],
            forbidden_properties(),
        );
        Self::activate(id, registry, transport, effective.clone(), effective)
    }

    fn activate(
        id: String,
        registry: Arc<dyn ServiceRegistry>,
        transport: Arc<HttpTransportFactory>,
        effective: ConfigMap,
        properties: ConfigMap,
    ) -> Result<Self> {
        let factory: Arc<HttpTransportFactory> =
            Arc::new(PreconfiguredClientFactory::new(transport, effective));
        let prototype = ClientPrototype::new(id.as_str(), Arc::clone(&factory));

        let factory_registration = registry.register(
            TRANSPORT_FACTORY_INTERFACE,
            ServiceObject::Instance(Arc::new(factory)),
            properties.clone(),
        )?;
        let client_registration = match registry.register(
            HTTP_CLIENT_INTERFACE,
            ServiceObject::Factory(Arc::new(prototype)),
            properties.clone(),
        ) {
            Ok(registration) => registration,
            Err(e) => {
                registry.unregister(factory_registration);
                return Err(e);
            }
        };
        debug!("Effective config for '{}': {:?}", id, properties);
        info!("Activated HTTP client '{}'", id);

        Ok(HttpClientConfiguration {
            id,
            registry,
            properties,
            registrations: vec![factory_registration, client_registration],
        })
    }

    /// The identity of this client.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The properties the services were registered with.
    pub fn properties(&self) -> &ConfigMap {
        &self.properties
    }

    /// The registrations owned by this component.
    pub fn registrations(&self) -> &[ServiceId] {
        &self.registrations
    }

    /// Returns `true` while the component's services are registered.
    pub fn is_active(&self) -> bool {
        !self.registrations.is_empty()
    }

    /// Unregisters the component's services. Further calls are no-ops.
    pub fn deactivate(&mut self) {
        if self.registrations.is_empty() {
            return;
        }
        // Client registration before its transport factory.
        for registration in self.registrations.drain(..).rev() {
            self.registry.unregister(registration);
        }
        info!("Deactivated HTTP client '{}'", self.id);
    }
}

impl Drop for HttpClientConfiguration {
    fn drop(&mut self) {
        self.deactivate();
    }
}

impl fmt::Debug for HttpClientConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClientConfiguration")
            .field("id", &self.id)
            .field("properties", &self.properties)
            .field("registrations", &self.registrations)
            .finish()
    }
}

fn require_transport(
    transport: Option<Arc<HttpTransportFactory>>,
) -> Result<Arc<HttpTransportFactory>> {
    transport.ok_or_else(|| ConfigError::MissingCollaborator {
        name: TRANSPORT_FACTORY_INTERFACE.to_string(),
    })
}
