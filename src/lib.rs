// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration-driven factory for pre-configured HTTP clients.
//!
//! This crate builds HTTP clients from flat, dotted configuration maps. At its core
//! is a declarative property binding engine: configurable types list their accessors
//! once, and the engine derives dotted property names from them, binds
//! configuration maps onto builders, and describes the accepted properties as
//! metadata for configuration UIs.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types (`ConfigValue`, `PropertyName`, attribute
//!   definitions, service filters, errors)
//! - **Binding**: The engine (`Method`, `Invoker`, property registries, binder,
//!   metadata synthesis, merge and sanitize)
//! - **Ports**: Trait definitions that define interfaces (`ConfigSource`,
//!   `ServiceRegistry`, `TransportFactory`, `ConfigWatcher`, `MetaTypeProvider`)
//! - **Adapters**: Implementations for specific sources and registries (env vars,
//!   YAML, in-memory maps, in-process registry, file watching)
//! - **Service**: Request options, the transport builder, client factories, the
//!   client configuration component and the manager orchestrating it
//!
//! # Configuration Keys
//!
//! - Bare keys such as `user.agent` or `max.conn.per.route` configure the transport
//!   builder.
//! - Keys under `request.config.`, such as `request.config.socket.timeout`,
//!   configure the per-request options.
//! - `<feature>.enabled` keys (`redirect.handling.enabled`,
//!   `content.compression.enabled`, ...) switch transport features off when `false`.
//! - `http.client.id` identifies a factory-created client.
//! - Keys starting with `service.` or `component.`, or ending with `.target`, are
//!   reserved and never bound.
//!
//! # Feature Flags
//!
//! - `yaml`: Enable YAML file support (default)
//! - `env`: Enable environment variable support (default)
//! - `reload`: Enable dynamic reloading with file watching
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use httpcfg::prelude::*;
//!
//! # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let mut manager = ClientManager::builder().build()?;
//! manager.start()?;
//!
//! let mut config = ConfigMap::new();
//! config.insert("http.client.id".to_string(), ConfigValue::from("search"));
//! config.insert("request.config.socket.timeout".to_string(), ConfigValue::from(5000));
//! manager.update_instance("search-pid", config)?;
//!
//! let client = manager.client(Some("search"))?.expect("search client");
//! assert_eq!(client.request_config().socket_timeout(), 5000);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod binding;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::binding::{bind, bean_setters, BindReport, Introspect, Method};
    pub use crate::domain::{ConfigError, ConfigMap, ConfigValue, Filter, Result};
    pub use crate::ports::{
        ConfigParser, ConfigSource, ConfigWatcher, MetaTypeProvider, ServiceRegistry,
        TransportFactory,
    };
    pub use crate::service::{
        ClientHandle, ClientManager, HttpClient, HttpClientBuilder, HttpClientMetaType,
        RequestConfig,
    };

    // Re-export adapters based on feature flags
    #[cfg(feature = "env")]
    pub use crate::adapters::EnvVarAdapter;
    pub use crate::adapters::{InMemoryServiceRegistry, MapSource};
    #[cfg(feature = "yaml")]
    pub use crate::adapters::{YamlFileAdapter, YamlParser};
}
