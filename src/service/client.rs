// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pre-configured HTTP client handle.

use crate::domain::{ConfigError, Result};
use crate::service::request_config::RequestConfig;
use std::fmt;
use std::sync::RwLock;
use tracing::debug;

/// A pre-configured HTTP client.
///
/// The handle owns the underlying `reqwest::Client` until [`close`](Self::close) is
/// called, which drops it and releases its pooled connections. Closing is
/// idempotent; a closed client refuses to hand out its transport.
pub struct HttpClient {
    id: String,
    request_config: RequestConfig,
    inner: RwLock<Option<reqwest::Client>>,
}

impl HttpClient {
    pub(crate) fn new(client: reqwest::Client, request_config: RequestConfig) -> Self {
        HttpClient {
            id: String::new(),
            request_config,
            inner: RwLock::new(Some(client)),
        }
    }

    pub(crate) fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// The identity of the configuration this client was built from.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The request options applied to every request.
    pub fn request_config(&self) -> &RequestConfig {
        &self.request_config
    }

    /// Returns the transport for issuing requests.
    ///
    /// `reqwest::Client` is a cheap handle; clones share the connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ClientClosed`] once the client has been closed.
    pub fn client(&self) -> Result<reqwest::Client> {
        if let Ok(inner) = self.inner.read() {
            if let Some(client) = inner.as_ref() {
                return Ok(client.clone());
            }
        }
        Err(ConfigError::ClientClosed {
            id: self.id.clone(),
        })
    }

    /// Returns `true` once the client has been closed.
    pub fn is_closed(&self) -> bool {
        match self.inner.read() {
            Ok(inner) => inner.is_none(),
            Err(_) => true,
        }
    }

    /// Releases the transport. Further calls are no-ops.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvocationFailed`] if the client's lock is poisoned.
    pub fn close(&self) -> Result<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|e| ConfigError::invocation("close", e.to_string()))?;
        if inner.take().is_some() {
            debug!("Closed HTTP client '{}'", self.id);
        }
        Ok(())
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("id", &self.id)
            .field("request_config", &self.request_config)
            .field("closed", &self.is_closed())
            .finish()
    }
}
