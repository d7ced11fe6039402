// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration watcher trait definition.
//!
//! This module defines the `ConfigWatcher` trait, which provides an interface for
//! watching configuration sources for changes and triggering callbacks when changes occur.

use crate::domain::Result;
use std::sync::Arc;

/// Callback invoked with the name of the changed source, e.g. a file path.
pub type ChangeCallback = Arc<dyn Fn(String) + Send + Sync>;

/// A trait for watching configuration sources for changes.
///
/// Implementations must be `Send + Sync`; callbacks may run on a background thread.
pub trait ConfigWatcher: Send + Sync {
    /// Starts watching, invoking `callback` on every change.
    ///
    /// # Errors
    ///
    /// Returns a `WatcherError` if watching cannot be started.
    fn watch(&mut self, callback: ChangeCallback) -> Result<()>;

    /// Stops watching. Calling it on a stopped watcher is a no-op.
    fn stop(&mut self) -> Result<()>;
}
