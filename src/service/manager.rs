// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lifecycle orchestration of client configurations.
//!
//! The [`ClientManager`] plays the part of the host runtime: it holds the default
//! configuration and the factory instance configurations, activates a component for
//! each, and re-activates components whenever their configuration changes.

use crate::adapters::InMemoryServiceRegistry;
use crate::domain::{ConfigMap, Filter, Result};
use crate::ports::{get_typed, ConfigSource, ServiceInstance, ServiceReference, ServiceRegistry};
use crate::service::client::HttpClient;
use crate::service::component::{HttpClientConfiguration, HTTP_CLIENT_INTERFACE};
use crate::service::factory::{DefaultTransportFactory, HttpTransportFactory};
use crate::service::metatype::HTTP_CLIENT_ID;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use tracing::{error, info};

/// A client obtained from the registry.
///
/// The handle dereferences to the [`HttpClient`]. Dropping it hands the client back
/// to the registry, which closes it. A client whose registration went away in the
/// meantime is already closed and the hand-back is ignored.
pub struct ClientHandle {
    registry: Arc<dyn ServiceRegistry>,
    reference: ServiceReference,
    client: Arc<HttpClient>,
}

impl ClientHandle {
    /// The registration the client was obtained from.
    pub fn reference(&self) -> &ServiceReference {
        &self.reference
    }

    /// The shared client. Clones stay usable until the handle is dropped.
    pub fn inner(&self) -> &Arc<HttpClient> {
        &self.client
    }
}

impl Deref for ClientHandle {
    type Target = HttpClient;

    fn deref(&self) -> &HttpClient {
        &self.client
    }
}

impl Drop for ClientHandle {
    fn drop(&mut self) {
        let service: ServiceInstance = Arc::<HttpClient>::clone(&self.client);
        self.registry.unget_service(&self.reference, service);
    }
}

impl fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientHandle")
            .field("service", &self.reference.id())
            .field("client", &self.client)
            .finish()
    }
}

#[derive(Debug, Default)]
struct Instance {
    configuration: ConfigMap,
    component: Option<HttpClientConfiguration>,
}

/// Activates, updates and removes client configurations.
///
/// Activation failures are reported to the caller and never retried; the affected
/// configuration stays inactive until it is updated again.
///
/// # Examples
///
/// ```rust
/// use httpcfg::domain::{ConfigMap, ConfigValue};
/// use httpcfg::service::ClientManager;
///
/// # fn main() -> httpcfg::domain::Result<()> {
/// let mut manager = ClientManager::builder().build()?;
/// manager.start()?;
///
/// let default = manager.client(None)?.expect("default client");
/// assert_eq!(default.id(), "default");
///
/// let mut config = ConfigMap::new();
/// config.insert("http.client.id".to_string(), ConfigValue::from("search"));
/// manager.update_instance("search-pid", config)?;
/// assert!(manager.client(Some("search"))?.is_some());
///
/// manager.shutdown();
/// # Ok(())
/// # }
/// ```
pub struct ClientManager {
    registry: Arc<dyn ServiceRegistry>,
    transport: Option<Arc<HttpTransportFactory>>,
    default_configuration: Option<ConfigMap>,
    default_client: Option<HttpClientConfiguration>,
    instances: BTreeMap<String, Instance>,
}

impl ClientManager {
    /// Creates a manager publishing into `registry`.
    pub fn new(
        registry: Arc<dyn ServiceRegistry>,
        transport: Option<Arc<HttpTransportFactory>>,
    ) -> Self {
        ClientManager {
            registry,
            transport,
            default_configuration: None,
            default_client: None,
            instances: BTreeMap::new(),
        }
    }

    /// Creates a new manager builder.
    pub fn builder() -> ClientManagerBuilder {
        ClientManagerBuilder::new()
    }

    /// The registry clients are published into.
    pub fn registry(&self) -> &Arc<dyn ServiceRegistry> {
        &self.registry
    }

    /// Activates the default client and every known instance.
    ///
    /// # Errors
    ///
    /// Every configuration is attempted; the first failure is returned.
    pub fn start(&mut self) -> Result<()> {
        let default = self.activate_default();
        let instances = self.reactivate_instances();
        default.and(instances)
    }

    /// Replaces the default configuration and re-activates the default client.
    ///
    /// Instances merge the default configuration into their own, so they are
    /// re-activated as well.
    ///
    /// # Errors
    ///
    /// Every configuration is attempted; the first failure is returned.
    pub fn update_default(&mut self, configuration: Option<ConfigMap>) -> Result<()> {
        self.default_configuration = configuration;
        self.start()
    }

    /// Adds or replaces the instance configuration stored under `pid`.
    ///
    /// # Errors
    ///
    /// Returns the activation failure; the instance stays inactive.
    pub fn update_instance(&mut self, pid: &str, configuration: ConfigMap) -> Result<()> {
        let instance = self.instances.entry(pid.to_string()).or_default();
        instance.configuration = configuration;
        // Release the old registrations before the replacement is published.
        instance.component = None;
        self.activate_instance(pid)
    }

    /// Removes the instance configuration stored under `pid` and its client.
    ///
    /// Returns `false` if there was no such configuration.
    pub fn delete_instance(&mut self, pid: &str) -> bool {
        match self.instances.remove(pid) {
            Some(mut instance) => {
                if let Some(component) = instance.component.as_mut() {
                    component.deactivate();
                }
                info!("Deleted HTTP client configuration '{}'", pid);
                true
            }
            None => false,
        }
    }

    /// Replaces the transport factory and re-activates every configuration.
    ///
    /// Without a transport factory every component is deactivated.
    ///
    /// # Errors
    ///
    /// Every configuration is attempted; the first failure is returned.
    pub fn set_transport(&mut self, transport: Option<Arc<HttpTransportFactory>>) -> Result<()> {
        self.transport = transport;
        self.start()
    }

    /// The active default client component, if any.
    pub fn default_client(&self) -> Option<&HttpClientConfiguration> {
        self.default_client.as_ref()
    }

    /// The active component of the instance stored under `pid`, if any.
    pub fn instance(&self, pid: &str) -> Option<&HttpClientConfiguration> {
        self.instances.get(pid)?.component.as_ref()
    }

    /// The pids of all stored instance configurations.
    pub fn instance_pids(&self) -> impl Iterator<Item = &str> {
        self.instances.keys().map(String::as_str)
    }

    /// Looks up a client in the registry.
    ///
    /// Without an id the best-ranked client is returned, which is the default
    /// client while it is active. Every call builds a new client; it is handed back
    /// and closed when the returned handle is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built.
    pub fn client(&self, id: Option<&str>) -> Result<Option<ClientHandle>> {
        let filter = id.map(|id| Filter::equals(HTTP_CLIENT_ID, id));
        let references = self
            .registry
            .references(HTTP_CLIENT_INTERFACE, filter.as_ref());
        let Some(reference) = references.into_iter().next() else {
            return Ok(None);
        };
        let client = get_typed::<HttpClient>(self.registry.as_ref(), &reference)?;
        Ok(client.map(|client| ClientHandle {
            registry: Arc::clone(&self.registry),
            reference,
            client,
        }))
    }

    /// Deactivates every component. Stored configurations are kept.
    pub fn shutdown(&mut self) {
        for instance in self.instances.values_mut() {
            instance.component = None;
        }
        self.default_client = None;
        info!("HTTP client manager shut down");
    }

    fn activate_default(&mut self) -> Result<()> {
        self.default_client = None;
        let component = HttpClientConfiguration::activate_default(
            Arc::clone(&self.registry),
            self.transport.clone(),
            self.default_configuration.as_ref(),
        )
        .inspect_err(|e| error!("Failed to activate the default HTTP client: {}", e))?;
        self.default_client = Some(component);
        Ok(())
    }

    fn activate_instance(&mut self, pid: &str) -> Result<()> {
        let Some(instance) = self.instances.get_mut(pid) else {
            return Ok(());
        };
        instance.component = None;
        let component = HttpClientConfiguration::activate_instance(
            Arc::clone(&self.registry),
            self.transport.clone(),
            &instance.configuration,
            self.default_configuration.as_ref(),
        )
        .inspect_err(|e| error!("Failed to activate HTTP client '{}': {}", pid, e))?;
        instance.component = Some(component);
        Ok(())
    }

    fn reactivate_instances(&mut self) -> Result<()> {
        let pids: Vec<String> = self.instances.keys().cloned().collect();
        let mut result = Ok(());
        for pid in pids {
            if let Err(e) = self.activate_instance(&pid) {
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }
}

impl Drop for ClientManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Builder for constructing a [`ClientManager`].
///
/// By default clients are published into a fresh [`InMemoryServiceRegistry`] and
/// built on [`DefaultTransportFactory`].
///
/// # Examples
///
/// ```rust
/// use httpcfg::adapters::MapSource;
/// use httpcfg::domain::ConfigValue;
/// use httpcfg::service::ClientManager;
///
/// # fn main() -> httpcfg::domain::Result<()> {
/// let defaults = MapSource::new("defaults")
///     .with_value("request.config.socket.timeout", ConfigValue::from(2000));
///
/// let mut manager = ClientManager::builder()
///     .with_default_source(&defaults)?
///     .build()?;
/// manager.start()?;
///
/// let client = manager.client(None)?.expect("default client");
/// assert_eq!(client.request_config().socket_timeout(), 2000);
/// # Ok(())
/// # }
/// ```
pub struct ClientManagerBuilder {
    registry: Option<Arc<dyn ServiceRegistry>>,
    transport: Option<Arc<HttpTransportFactory>>,
    default_configuration: Option<ConfigMap>,
    instances: BTreeMap<String, ConfigMap>,
}

impl ClientManagerBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            registry: None,
            transport: Some(Arc::new(DefaultTransportFactory)),
            default_configuration: None,
            instances: BTreeMap::new(),
        }
    }

    /// Publishes clients into `registry`.
    pub fn with_registry(mut self, registry: Arc<dyn ServiceRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Builds clients on `transport`; `None` leaves the manager without one.
    pub fn with_transport(mut self, transport: Option<Arc<HttpTransportFactory>>) -> Self {
        self.transport = transport;
        self
    }

    /// Sets the default client's configuration.
    pub fn with_default_configuration(mut self, configuration: ConfigMap) -> Self {
        self.default_configuration = Some(configuration);
        self
    }

    /// Loads the default client's configuration from `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read.
    pub fn with_default_source(self, source: &dyn ConfigSource) -> Result<Self> {
        Ok(self.with_default_configuration(source.load()?))
    }

    /// Adds an instance configuration under `pid`.
    pub fn with_instance(mut self, pid: impl Into<String>, configuration: ConfigMap) -> Self {
        self.instances.insert(pid.into(), configuration);
        self
    }

    /// Loads an instance configuration from `source` and adds it under `pid`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read.
    pub fn with_instance_source(
        self,
        pid: impl Into<String>,
        source: &dyn ConfigSource,
    ) -> Result<Self> {
        Ok(self.with_instance(pid, source.load()?))
    }

    /// Builds the manager. Nothing is activated until [`ClientManager::start`].
    pub fn build(self) -> Result<ClientManager> {
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(InMemoryServiceRegistry::new()));
        let mut manager = ClientManager::new(registry, self.transport);
        manager.default_configuration = self.default_configuration;
        manager.instances = self
            .instances
            .into_iter()
            .map(|(pid, configuration)| {
                (
                    pid,
                    Instance {
                        configuration,
                        component: None,
                    },
                )
            })
            .collect();
        Ok(manager)
    }
}

impl Default for ClientManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConfigError, ConfigValue};
    use crate::ports::SERVICE_RANKING;

    fn config(entries: &[(&str, ConfigValue)]) -> ConfigMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn started() -> ClientManager {
        let mut manager = ClientManager::builder().build().unwrap();
        manager.start().unwrap();
        manager
    }

    #[test]
    fn test_start_activates_default() {
        let manager = started();
        let component = manager.default_client().unwrap();
        assert_eq!(component.id(), "default");
        let references = manager.registry().references(HTTP_CLIENT_INTERFACE, None);
        assert_eq!(references.len(), 1);
        assert_eq!(
            references[0].property(SERVICE_RANKING),
            Some(&ConfigValue::Integer(100))
        );
    }

    #[test]
    fn test_update_default_replaces_client() {
        let mut manager = started();
        let before = manager.client(None).unwrap().unwrap();
        assert_eq!(before.request_config().socket_timeout(), -1);

        manager
            .update_default(Some(config(&[(
                "request.config.socket.timeout",
                ConfigValue::from(2000),
            )])))
            .unwrap();
        assert!(before.is_closed());

        let after = manager.client(None).unwrap().unwrap();
        assert_eq!(after.request_config().socket_timeout(), 2000);
        assert_eq!(
            manager.registry().references(HTTP_CLIENT_INTERFACE, None).len(),
            1
        );
    }

    #[test]
    fn test_dropped_handles_release_clients() {
        let registry = Arc::new(InMemoryServiceRegistry::new());
        let mut manager = ClientManager::builder()
            .with_registry(registry.clone())
            .build()
            .unwrap();
        manager.start().unwrap();
        let id = manager.registry().references(HTTP_CLIENT_INTERFACE, None)[0].id();

        for _ in 0..100 {
            let handle = manager.client(None).unwrap().unwrap();
            assert_eq!(handle.reference().id(), id);
        }
        assert_eq!(registry.outstanding(id), 0);

        let handle = manager.client(None).unwrap().unwrap();
        let shared = Arc::clone(handle.inner());
        assert_eq!(registry.outstanding(id), 1);
        assert!(!shared.is_closed());

        drop(handle);
        assert_eq!(registry.outstanding(id), 0);
        assert!(shared.is_closed());
    }

    #[test]
    fn test_instance_lifecycle() {
        let mut manager = started();
        manager
            .update_instance(
                "pid-1",
                config(&[
                    (HTTP_CLIENT_ID, ConfigValue::from("test-client")),
                    ("request.config.socket.timeout", ConfigValue::from(5000)),
                ]),
            )
            .unwrap();
        assert_eq!(manager.instance_pids().collect::<Vec<_>>(), vec!["pid-1"]);

        let client = manager.client(Some("test-client")).unwrap().unwrap();
        assert_eq!(client.request_config().socket_timeout(), 5000);
        assert_eq!(
            manager.registry().references(HTTP_CLIENT_INTERFACE, None).len(),
            2
        );

        assert!(manager.delete_instance("pid-1"));
        assert!(client.is_closed());
        assert!(manager.client(Some("test-client")).unwrap().is_none());
        assert!(!manager.delete_instance("pid-1"));
    }

    #[test]
    fn test_instance_without_identity_fails_fast() {
        let mut manager = started();
        let result = manager.update_instance(
            "pid-1",
            config(&[("request.config.socket.timeout", ConfigValue::from(5000))]),
        );
        assert!(matches!(result, Err(ConfigError::MissingIdentity { .. })));
        assert!(manager.instance("pid-1").is_none());
    }

    #[test]
    fn test_instances_follow_default_configuration() {
        let mut manager = started();
        manager
            .update_instance(
                "pid-1",
                config(&[(HTTP_CLIENT_ID, ConfigValue::from("test-client"))]),
            )
            .unwrap();
        manager
            .update_default(Some(config(&[(
                "request.config.connect.timeout",
                ConfigValue::from(750),
            )])))
            .unwrap();

        let client = manager.client(Some("test-client")).unwrap().unwrap();
        assert_eq!(client.request_config().connect_timeout(), 750);
    }

    #[test]
    fn test_missing_transport() {
        let mut manager = started();
        let result = manager.set_transport(None);
        assert!(matches!(result, Err(ConfigError::MissingCollaborator { .. })));
        assert!(manager.default_client().is_none());
        assert!(manager.client(None).unwrap().is_none());

        manager
            .set_transport(Some(Arc::new(DefaultTransportFactory)))
            .unwrap();
        assert!(manager.client(None).unwrap().is_some());
    }

    #[test]
    fn test_shutdown() {
        let mut manager = started();
        manager.shutdown();
        assert!(manager.default_client().is_none());
        assert!(manager
            .registry()
            .references(HTTP_CLIENT_INTERFACE, None)
            .is_empty());
    }
}
