// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer: pre-configured HTTP clients built with the binding engine.
//!
//! This module contains the configurable beans (request options and the transport
//! builder), the metadata describing them, the factories and component that publish
//! clients into a service registry, and the manager orchestrating their lifecycle.

pub mod client;
pub mod client_builder;
pub mod component;
pub mod factory;
pub mod manager;
pub mod metatype;
#[cfg(feature = "reload")]
pub mod reloader;
pub mod request_config;

// Re-export commonly used types
pub use client::HttpClient;
pub use client_builder::{HttpClientBuilder, ProxyHost, TimeUnit};
pub use component::{
    HttpClientConfiguration, DEFAULT_CLIENT_ID, DEFAULT_RANKING, HTTP_CLIENT_INTERFACE,
    TRANSPORT_FACTORY_INTERFACE,
};
pub use factory::{
    ClientPrototype, DefaultTransportFactory, HttpTransportFactory, PreconfiguredClientFactory,
};
pub use manager::{ClientHandle, ClientManager, ClientManagerBuilder};
pub use metatype::{
    transport_setters, HttpClientMetaType, DEFAULT_HTTP_CLIENT_PID, HTTP_CLIENT_FACTORY_PID,
    HTTP_CLIENT_ID,
};
#[cfg(feature = "reload")]
pub use reloader::{ConfigReloader, ReloadTarget};
pub use request_config::{RequestConfig, RequestConfigBuilder, REQUEST_CONFIG_NAMESPACE};
