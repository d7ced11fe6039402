// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) that define the interfaces
//! between the client factory and its surroundings: where configuration comes
//! from, where clients are published, and which transport they are built on. These
//! traits are implemented by adapters in the adapters layer.

pub mod metatype;
pub mod parser;
pub mod registry;
pub mod source;
pub mod transport;
pub mod watcher;

// Re-export commonly used types
pub use metatype::MetaTypeProvider;
pub use parser::ConfigParser;
pub use registry::{
    get_typed, ServiceFactory, ServiceId, ServiceInstance, ServiceObject, ServiceReference,
    ServiceRegistry, OBJECT_CLASS, SERVICE_ID, SERVICE_RANKING,
};
pub use source::ConfigSource;
pub use transport::TransportFactory;
pub use watcher::{ChangeCallback, ConfigWatcher};
