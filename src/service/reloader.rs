// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pushes changed configuration files to a [`ClientManager`].

use crate::domain::{ConfigError, Result};
use crate::ports::{ConfigSource, ConfigWatcher};
use crate::service::manager::ClientManager;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Which configuration a reloaded source replaces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReloadTarget {
    /// The default client's configuration
    Default,
    /// The instance configuration stored under the given pid
    Instance(String),
}

/// Re-reads a source whenever its watcher reports a change and hands the result
/// to the manager.
///
/// # Examples
///
/// ```rust,no_run
/// use httpcfg::adapters::{FileWatcher, YamlFileAdapter};
/// use httpcfg::service::{ClientManager, ConfigReloader, ReloadTarget};
/// use std::sync::{Arc, Mutex};
///
/// # fn main() -> httpcfg::domain::Result<()> {
/// let manager = Arc::new(Mutex::new(ClientManager::builder().build()?));
/// let source = YamlFileAdapter::from_file("/etc/myapp/http-client.yaml")?;
/// let watcher = FileWatcher::new("/etc/myapp/http-client.yaml", None)?;
///
/// let mut reloader = ConfigReloader::new(
///     Arc::clone(&manager),
///     Box::new(source),
///     Box::new(watcher),
///     ReloadTarget::Default,
/// );
/// reloader.start()?;
/// # Ok(())
/// # }
/// ```
pub struct ConfigReloader {
    manager: Arc<Mutex<ClientManager>>,
    source: Arc<Mutex<Box<dyn ConfigSource>>>,
    watcher: Box<dyn ConfigWatcher>,
    target: ReloadTarget,
}

impl ConfigReloader {
    /// Creates a reloader; nothing is watched until [`start`](Self::start).
    pub fn new(
        manager: Arc<Mutex<ClientManager>>,
        source: Box<dyn ConfigSource>,
        watcher: Box<dyn ConfigWatcher>,
        target: ReloadTarget,
    ) -> Self {
        Self {
            manager,
            source: Arc::new(Mutex::new(source)),
            watcher,
            target,
        }
    }

    /// Starts watching.
    ///
    /// # Errors
    ///
    /// Returns a `WatcherError` if the watcher cannot be started.
    pub fn start(&mut self) -> Result<()> {
        let manager = Arc::clone(&self.manager);
        let source = Arc::clone(&self.source);
        let target = self.target.clone();
        self.watcher.watch(Arc::new(move |changed: String| {
            info!("Configuration '{}' changed, reloading", changed);
            if let Err(e) = reload(&manager, &source, &target) {
                warn!("Failed to apply reloaded configuration '{}': {}", changed, e);
            }
        }))
    }

    /// Re-reads the source and applies it immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or the client fails to
    /// activate.
    pub fn reload_now(&self) -> Result<()> {
        reload(&self.manager, &self.source, &self.target)
    }

    /// Stops watching.
    ///
    /// # Errors
    ///
    /// Returns a `WatcherError` if the watcher cannot be stopped cleanly.
    pub fn stop(&mut self) -> Result<()> {
        self.watcher.stop()
    }
}

fn reload(
    manager: &Mutex<ClientManager>,
    source: &Mutex<Box<dyn ConfigSource>>,
    target: &ReloadTarget,
) -> Result<()> {
    let configuration = {
        let mut source = source.lock().map_err(|e| poisoned("source", e))?;
        source.reload()?;
        source.load()?
    };
    let mut manager = manager.lock().map_err(|e| poisoned("manager", e))?;
    match target {
        ReloadTarget::Default => manager.update_default(Some(configuration)),
        ReloadTarget::Instance(pid) => manager.update_instance(pid, configuration),
    }
}

fn poisoned<E: std::fmt::Display>(what: &str, e: E) -> ConfigError {
    ConfigError::WatcherError {
        message: format!("{} lock poisoned: {}", what, e),
        source: None,
    }
}
