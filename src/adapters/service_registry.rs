// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process service registry adapter.

use crate::domain::{ConfigError, ConfigMap, ConfigValue, Filter, Result};
use crate::ports::{
    ServiceFactory, ServiceId, ServiceInstance, ServiceObject, ServiceReference, ServiceRegistry,
    OBJECT_CLASS, SERVICE_ID,
};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{debug, error};

struct Registration {
    interface: String,
    object: ServiceObject,
    properties: ConfigMap,
    /// Objects handed out by a factory and not yet handed back
    outstanding: Vec<ServiceInstance>,
}

/// A service registry living in the current process.
///
/// Every registration gets `service.id` and `objectClass` properties. Objects
/// obtained from a factory registration are tracked until they are handed back;
/// unregistering hands back whatever is still outstanding.
///
/// # Examples
///
/// ```rust
/// use httpcfg::adapters::InMemoryServiceRegistry;
/// use httpcfg::domain::{ConfigMap, ConfigValue, Filter};
/// use httpcfg::ports::{ServiceObject, ServiceRegistry};
/// use std::sync::Arc;
///
/// let registry = InMemoryServiceRegistry::new();
/// let mut properties = ConfigMap::new();
/// properties.insert("name".to_string(), ConfigValue::from("greeting"));
/// registry
///     .register("Greeting", ServiceObject::Instance(Arc::new("hello")), properties)
///     .unwrap();
///
/// let filter: Filter = "(name=greeting)".parse().unwrap();
/// assert_eq!(registry.references("Greeting", Some(&filter)).len(), 1);
/// ```
pub struct InMemoryServiceRegistry {
    next_id: AtomicU64,
    registrations: RwLock<BTreeMap<ServiceId, Registration>>,
}

impl InMemoryServiceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            registrations: RwLock::new(BTreeMap::new()),
        }
    }

    /// The number of live registrations.
    pub fn len(&self) -> usize {
        self.registrations.read().map(|r| r.len()).unwrap_or(0)
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of factory objects of a registration not yet handed back.
    pub fn outstanding(&self, id: ServiceId) -> usize {
        self.registrations
            .read()
            .ok()
            .and_then(|r| r.get(&id).map(|reg| reg.outstanding.len()))
            .unwrap_or(0)
    }
}

impl Default for InMemoryServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceRegistry for InMemoryServiceRegistry {
    fn register(
        &self,
        interface: &str,
        service: ServiceObject,
        mut properties: ConfigMap,
    ) -> Result<ServiceId> {
        let id = ServiceId(self.next_id.fetch_add(1, Ordering::SeqCst));
        properties.insert(
            SERVICE_ID.to_string(),
            ConfigValue::Long(i64::try_from(id.0).unwrap_or(i64::MAX)),
        );
        properties.insert(OBJECT_CLASS.to_string(), ConfigValue::from(interface));

        let mut registrations = self.registrations.write().map_err(|e| {
            error!("Failed to register {}: {}", interface, e);
            ConfigError::RegistrationFailed {
                interface: interface.to_string(),
                message: e.to_string(),
            }
        })?;
        registrations.insert(
            id,
            Registration {
                interface: interface.to_string(),
                object: service,
                properties,
                outstanding: Vec::new(),
            },
        );
        debug!("Registered {} as service {}", interface, id);
        Ok(id)
    }

    fn unregister(&self, id: ServiceId) -> bool {
        let removed = match self.registrations.write() {
            Ok(mut registrations) => registrations.remove(&id),
            Err(e) => {
                error!("Failed to unregister service {}: {}", id, e);
                None
            }
        };
        let Some(registration) = removed else {
            return false;
        };
        // Released outside the lock.
        if let ServiceObject::Factory(factory) = &registration.object {
            for service in registration.outstanding {
                factory.unget_service(service);
            }
        }
        debug!("Unregistered {} service {}", registration.interface, id);
        true
    }

    fn references(&self, interface: &str, filter: Option<&Filter>) -> Vec<ServiceReference> {
        let Ok(registrations) = self.registrations.read() else {
            return Vec::new();
        };
        let mut references: Vec<ServiceReference> = registrations
            .iter()
            .filter(|(_, reg)| reg.interface == interface)
            .filter(|(_, reg)| filter.map_or(true, |f| f.matches(&reg.properties)))
            .map(|(id, reg)| ServiceReference::new(*id, interface, reg.properties.clone()))
            .collect();
        references.sort_by_key(|r| (Reverse(r.ranking()), r.id()));
        references
    }

    fn get_service(&self, reference: &ServiceReference) -> Result<Option<ServiceInstance>> {
        let factory: Arc<dyn ServiceFactory> = {
            let Ok(registrations) = self.registrations.read() else {
                return Ok(None);
            };
            let object = registrations.get(&reference.id()).map(|reg| &reg.object);
            match object {
                None => return Ok(None),
                Some(ServiceObject::Instance(service)) => return Ok(Some(Arc::clone(service))),
                Some(ServiceObject::Factory(factory)) => Arc::clone(factory),
            }
        };

        let service = factory.get_service()?;
        let tracked = match self.registrations.write() {
            Ok(mut registrations) => match registrations.get_mut(&reference.id()) {
                Some(registration) => {
                    registration.outstanding.push(Arc::clone(&service));
                    true
                }
                None => false,
            },
            Err(_) => false,
        };
        if tracked {
            Ok(Some(service))
        } else {
            // Unregistered while the object was being created.
            factory.unget_service(service);
            Ok(None)
        }
    }

    fn unget_service(&self, reference: &ServiceReference, service: ServiceInstance) {
        let factory = match self.registrations.write() {
            Ok(mut registrations) => match registrations.get_mut(&reference.id()) {
                Some(registration) => {
                    let before = registration.outstanding.len();
                    registration
                        .outstanding
                        .retain(|held| !Arc::ptr_eq(held, &service));
                    match &registration.object {
                        ServiceObject::Factory(factory)
                            if registration.outstanding.len() < before =>
                        {
                            Some(Arc::clone(factory))
                        }
                        _ => None,
                    }
                }
                None => None,
            },
            Err(_) => None,
        };
        match factory {
            Some(factory) => factory.unget_service(service),
            None => debug!("Ignoring unget of untracked object of service {}", reference.id()),
        }
    }
}
