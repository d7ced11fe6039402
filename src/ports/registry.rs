// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service registry trait definition.
//!
//! The registry is the publish/lookup capability the client factory places its
//! services into. Services are registered under an interface name with a property
//! map and are found again by interface and an optional [`Filter`] over those
//! properties.

use crate::domain::{ConfigMap, ConfigValue, Filter, Result};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Property carrying the registration's unique id.
pub const SERVICE_ID: &str = "service.id";

/// Property ranking a registration against others of the same interface.
pub const SERVICE_RANKING: &str = "service.ranking";

/// Property carrying the registered interface name.
pub const OBJECT_CLASS: &str = "objectClass";

/// A type-erased service object.
pub type ServiceInstance = Arc<dyn Any + Send + Sync>;

/// Produces a distinct service object for every consumer.
///
/// A consumer obtaining a service from a factory registration owns that object and
/// must hand it back through [`ServiceRegistry::unget_service`], which lets the
/// factory release its resources.
pub trait ServiceFactory: Send + Sync {
    /// Creates a new service object.
    ///
    /// # Errors
    ///
    /// Returns an error if the object cannot be created.
    fn get_service(&self) -> Result<ServiceInstance>;

    /// Releases a service object created by [`get_service`](Self::get_service).
    ///
    /// Failures are logged by the implementation, never returned.
    fn unget_service(&self, service: ServiceInstance);
}

/// What a registration provides.
#[derive(Clone)]
pub enum ServiceObject {
    /// One shared object
    Instance(ServiceInstance),
    /// A factory creating an object per consumer
    Factory(Arc<dyn ServiceFactory>),
}

impl fmt::Debug for ServiceObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceObject::Instance(_) => f.write_str("Instance"),
            ServiceObject::Factory(_) => f.write_str("Factory"),
        }
    }
}

/// The handle of a registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceId(pub u64);

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registration as seen by lookups.
#[derive(Clone, Debug, PartialEq)]
pub struct ServiceReference {
    id: ServiceId,
    interface: String,
    properties: ConfigMap,
}

impl ServiceReference {
    /// Creates a reference.
    pub fn new(id: ServiceId, interface: impl Into<String>, properties: ConfigMap) -> Self {
        ServiceReference {
            id,
            interface: interface.into(),
            properties,
        }
    }

    /// The registration id.
    pub fn id(&self) -> ServiceId {
        self.id
    }

    /// The registered interface name.
    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// The registration properties.
    pub fn properties(&self) -> &ConfigMap {
        &self.properties
    }

    /// Looks up a single registration property.
    pub fn property(&self, key: &str) -> Option<&ConfigValue> {
        self.properties.get(key)
    }

    /// The integer ranking, `0` when absent or not an integer.
    pub fn ranking(&self) -> i32 {
        match self.properties.get(SERVICE_RANKING) {
            Some(ConfigValue::Integer(n)) => *n,
            _ => 0,
        }
    }
}

/// A publish/lookup registry for services.
///
/// Lookups return references ordered by descending ranking, then by registration
/// order.
pub trait ServiceRegistry: Send + Sync {
    /// Publishes a service under `interface`.
    ///
    /// # Errors
    ///
    /// Returns a `RegistrationFailed` error if the registration was not recorded.
    fn register(
        &self,
        interface: &str,
        service: ServiceObject,
        properties: ConfigMap,
    ) -> Result<ServiceId>;

    /// Removes a registration, releasing service objects still held from a factory.
    ///
    /// Returns `false` if the registration does not exist.
    fn unregister(&self, id: ServiceId) -> bool;

    /// Finds registrations of `interface` whose properties match `filter`.
    fn references(&self, interface: &str, filter: Option<&Filter>) -> Vec<ServiceReference>;

    /// Obtains the service object of a registration.
    ///
    /// Returns `Ok(None)` if the registration is gone.
    ///
    /// # Errors
    ///
    /// Propagates failures of a service factory.
    fn get_service(&self, reference: &ServiceReference) -> Result<Option<ServiceInstance>>;

    /// Hands back a service object obtained through
    /// [`get_service`](Self::get_service).
    fn unget_service(&self, reference: &ServiceReference, service: ServiceInstance);
}

/// Obtains a service object and downcasts it to `T`.
///
/// Returns `Ok(None)` if the registration is gone or holds another type. A factory
/// object of the wrong type is handed back immediately.
pub fn get_typed<T>(
    registry: &dyn ServiceRegistry,
    reference: &ServiceReference,
) -> Result<Option<Arc<T>>>
where
    T: Any + Send + Sync,
{
    let Some(service) = registry.get_service(reference)? else {
        return Ok(None);
    };
    match Arc::clone(&service).downcast::<T>() {
        Ok(typed) => Ok(Some(typed)),
        Err(_) => {
            registry.unget_service(reference, service);
            Ok(None)
        }
    }
}
