// SPDX-License-Identifier: MIT OR Apache-2.0

//! File system watcher for client configuration files.
//!
//! This module provides a watcher that monitors a configuration file and reports
//! debounced change notifications, so that the clients built from it can be
//! re-activated.

use crate::domain::{ConfigError, Result};
use crate::ports::{ChangeCallback, ConfigWatcher};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// File system watcher for a configuration file.
///
/// The file's parent directory is watched and events are filtered down to the file
/// itself. Notifications arriving within the debounce delay of the previous one are
/// dropped.
///
/// # Examples
///
/// ```rust,no_run
/// use httpcfg::adapters::FileWatcher;
/// use httpcfg::ports::ConfigWatcher;
/// use std::sync::Arc;
///
/// # fn main() -> httpcfg::domain::Result<()> {
/// let mut watcher = FileWatcher::new("/etc/myapp/http-client.yaml", None)?;
///
/// watcher.watch(Arc::new(|path| {
///     println!("Configuration changed: {}", path);
/// }))?;
///
/// // Later, stop watching
/// watcher.stop()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FileWatcher {
    /// Canonical path of the watched file
    file_path: PathBuf,
    /// Minimum time between two notifications
    debounce_delay: Duration,
    /// Internal watcher
    watcher: Option<RecommendedWatcher>,
    /// Thread handle for the dispatch thread
    watch_thread: Option<JoinHandle<()>>,
    /// Stop signal sender
    stop_tx: Option<Sender<()>>,
}

impl FileWatcher {
    /// Creates a new file watcher for the given path.
    ///
    /// `debounce_delay` defaults to 500ms.
    ///
    /// # Errors
    ///
    /// Returns a `WatcherError` if the file does not exist.
    pub fn new(path: impl AsRef<Path>, debounce_delay: Option<Duration>) -> Result<Self> {
        let path = path.as_ref();
        let file_path = path.canonicalize().map_err(|e| ConfigError::WatcherError {
            message: format!("File does not exist: {}", path.display()),
            source: Some(Box::new(e)),
        })?;

        Ok(Self {
            file_path,
            debounce_delay: debounce_delay.unwrap_or(DEFAULT_DEBOUNCE),
            watcher: None,
            watch_thread: None,
            stop_tx: None,
        })
    }

    /// The watched file.
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Returns `true` while the watcher is running.
    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }
}

fn concerns(event: &Event, file_path: &Path) -> bool {
    if matches!(event.kind, EventKind::Access(_)) {
        return false;
    }
    event.paths.iter().any(|p| {
        p == file_path
            || p.canonicalize().is_ok_and(|p| p == file_path)
            || (p.file_name() == file_path.file_name() && p.parent() == file_path.parent())
    })
}

fn dispatch(
    events: Receiver<notify::Result<Event>>,
    stop: Receiver<()>,
    file_path: PathBuf,
    debounce_delay: Duration,
    callback: ChangeCallback,
) {
    let mut last_notified: Option<Instant> = None;
    let name = file_path.to_string_lossy().into_owned();

    while stop.try_recv().is_err() {
        match events.recv_timeout(POLL_INTERVAL) {
            Ok(Ok(event)) if concerns(&event, &file_path) => {
                let now = Instant::now();
                if last_notified.is_some_and(|last| now.duration_since(last) < debounce_delay) {
                    continue;
                }
                last_notified = Some(now);
                debug!("Configuration file '{}' changed", name);
                callback(name.clone());
            }
            Ok(Ok(_)) | Err(RecvTimeoutError::Timeout) => {}
            Ok(Err(e)) => warn!("Error watching '{}': {}", name, e),
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

impl ConfigWatcher for FileWatcher {
    fn watch(&mut self, callback: ChangeCallback) -> Result<()> {
        if self.watcher.is_some() {
            return Err(ConfigError::WatcherError {
                message: "Watcher is already running".to_string(),
                source: None,
            });
        }

        let (event_tx, event_rx) = channel();
        let (stop_tx, stop_rx) = channel::<()>();

        let mut watcher =
            RecommendedWatcher::new(event_tx, notify::Config::default()).map_err(|e| {
                ConfigError::WatcherError {
                    message: format!("Failed to create file watcher: {}", e),
                    source: Some(Box::new(e)),
                }
            })?;

        // Editors replace files on save, so the directory is watched instead.
        let watch_path = self
            .file_path
            .parent()
            .ok_or_else(|| ConfigError::WatcherError {
                message: "Failed to get parent directory".to_string(),
                source: None,
            })?;

        watcher
            .watch(watch_path, RecursiveMode::NonRecursive)
            .map_err(|e| ConfigError::WatcherError {
                message: format!("Failed to start watching: {}", e),
                source: Some(Box::new(e)),
            })?;

        let file_path = self.file_path.clone();
        let debounce_delay = self.debounce_delay;
        self.watch_thread = Some(thread::spawn(move || {
            dispatch(event_rx, stop_rx, file_path, debounce_delay, callback)
        }));
        self.watcher = Some(watcher);
        self.stop_tx = Some(stop_tx);

        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        // Dropping the watcher closes the event channel.
        self.watcher = None;

        if let Some(handle) = self.watch_thread.take() {
            handle.join().map_err(|_| ConfigError::WatcherError {
                message: "Failed to join watcher thread".to_string(),
                source: None,
            })?;
        }

        Ok(())
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
