// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared helpers for the integration tests.

#![allow(dead_code)]

use httpcfg::domain::{ConfigMap, ConfigValue};
use httpcfg::ports::TransportFactory;
use httpcfg::service::HttpClientBuilder;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;

static TRACING: Once = Once::new();

/// Routes `tracing` output to the test harness.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Builds a configuration map from key/value pairs.
pub fn config(entries: &[(&str, ConfigValue)]) -> ConfigMap {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// A transport factory that counts the builders it hands out and seeds them with a
/// user agent.
#[derive(Debug, Default)]
pub struct CountingTransportFactory {
    builders: AtomicUsize,
}

impl CountingTransportFactory {
    /// The number of builders handed out so far.
    pub fn builders(&self) -> usize {
        self.builders.load(Ordering::SeqCst)
    }
}

impl TransportFactory for CountingTransportFactory {
    type Builder = HttpClientBuilder;

    fn new_builder(&self) -> HttpClientBuilder {
        self.builders.fetch_add(1, Ordering::SeqCst);
        let mut builder = HttpClientBuilder::create();
        builder.set_user_agent("counting/1.0");
        builder
    }
}
