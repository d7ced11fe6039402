// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing implementations of the ports.
//!
//! This module contains the configuration sources (YAML files, environment
//! variables, in-memory maps), the in-process service registry, and the file
//! watcher used for reloading.

#[cfg(feature = "env")]
pub mod env_var;
pub mod memory;
pub mod service_registry;
#[cfg(feature = "yaml")]
pub mod yaml_file;

pub mod watchers;

// Re-export adapters based on feature flags
#[cfg(feature = "env")]
pub use env_var::EnvVarAdapter;
pub use memory::MapSource;
pub use service_registry::InMemoryServiceRegistry;
#[cfg(feature = "reload")]
pub use watchers::FileWatcher;
#[cfg(feature = "yaml")]
pub use yaml_file::{YamlFileAdapter, YamlParser};
