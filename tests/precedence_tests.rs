// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tests for configuration precedence.
//!
//! These tests verify which value wins when a key is set by several configurations,
//! and that reserved keys never reach a client.

mod common;

use common::config;
use httpcfg::adapters::{InMemoryServiceRegistry, MapSource};
use httpcfg::binding::{clean, forbidden_properties, merge_and_sanitize, merge_maps};
use httpcfg::domain::{ConfigMap, ConfigValue};
use httpcfg::ports::{ConfigSource, ServiceRegistry, SERVICE_RANKING};
use httpcfg::service::{ClientManager, HTTP_CLIENT_INTERFACE};
use std::sync::Arc;

#[test]
fn test_first_source_wins() {
    let high = config(&[("user.agent", ConfigValue::from("high"))]);
    let low = config(&[
        ("user.agent", ConfigValue::from("low")),
        ("tcp.nodelay", ConfigValue::from(false)),
    ]);

    let merged = merge_maps([Some(&high), Some(&low)]);
    assert_eq!(merged.get("user.agent"), Some(&ConfigValue::from("high")));
    assert_eq!(merged.get("tcp.nodelay"), Some(&ConfigValue::from(false)));

    let reversed = merge_maps([Some(&low), Some(&high)]);
    assert_eq!(reversed.get("user.agent"), Some(&ConfigValue::from("low")));
}

#[test]
fn test_three_sources() {
    let first = config(&[("a", ConfigValue::from(1))]);
    let second = config(&[("a", ConfigValue::from(2)), ("b", ConfigValue::from(2))]);
    let third = config(&[
        ("a", ConfigValue::from(3)),
        ("b", ConfigValue::from(3)),
        ("c", ConfigValue::from(3)),
    ]);

    let merged = merge_maps([Some(&first), Some(&second), Some(&third)]);
    assert_eq!(merged.get("a"), Some(&ConfigValue::from(1)));
    assert_eq!(merged.get("b"), Some(&ConfigValue::from(2)));
    assert_eq!(merged.get("c"), Some(&ConfigValue::from(3)));
}

#[test]
fn test_absent_sources_skipped() {
    let only = config(&[("a", ConfigValue::from(1))]);
    assert_eq!(merge_maps([None, Some(&only), None]), only);
    assert!(merge_maps(Vec::<Option<&ConfigMap>>::new()).is_empty());
    assert!(merge_maps([None::<&ConfigMap>, None]).is_empty());
}

#[test]
fn test_sanitize_removes_reserved_keys() {
    let dirty = config(&[
        ("service.pid", ConfigValue::from("pid")),
        ("service.ranking", ConfigValue::from(10)),
        ("component.id", ConfigValue::from(7)),
        ("transport.target", ConfigValue::from("(name=x)")),
        ("user.agent", ConfigValue::from("kept")),
        ("my.service.name", ConfigValue::from("kept")),
        ("target.host", ConfigValue::from("kept")),
    ]);

    let cleaned = clean(dirty, forbidden_properties());
    let keys: Vec<&str> = cleaned.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["my.service.name", "target.host", "user.agent"]);
}

#[test]
fn test_sanitize_after_merge() {
    let instance = config(&[
        ("http.client.id", ConfigValue::from("a")),
        ("service.pid", ConfigValue::from("instance-pid")),
    ]);
    let default = config(&[
        ("service.pid", ConfigValue::from("default-pid")),
        ("request.config.socket.timeout", ConfigValue::from(10)),
    ]);

    let effective = merge_and_sanitize([Some(&instance), Some(&default)], forbidden_properties());
    assert_eq!(effective.len(), 2);
    assert!(effective.contains_key("http.client.id"));
    assert!(effective.contains_key("request.config.socket.timeout"));
}

#[test]
fn test_instance_overrides_default() {
    let mut manager = ClientManager::builder()
        .with_default_configuration(config(&[
            ("request.config.socket.timeout", ConfigValue::from(1000)),
            ("request.config.connect.timeout", ConfigValue::from(1000)),
        ]))
        .with_instance(
            "pid",
            config(&[
                ("http.client.id", ConfigValue::from("override")),
                ("request.config.socket.timeout", ConfigValue::from(50)),
            ]),
        )
        .build()
        .unwrap();
    manager.start().unwrap();

    let client = manager.client(Some("override")).unwrap().unwrap();
    assert_eq!(client.request_config().socket_timeout(), 50);
    assert_eq!(client.request_config().connect_timeout(), 1000);

    let default = manager.client(None).unwrap().unwrap();
    assert_eq!(default.request_config().socket_timeout(), 1000);
}

#[test]
fn test_default_update_reaches_instances() {
    let mut manager = ClientManager::builder()
        .with_instance(
            "pid",
            config(&[("http.client.id", ConfigValue::from("follower"))]),
        )
        .build()
        .unwrap();
    manager.start().unwrap();
    assert_eq!(
        manager
            .client(Some("follower"))
            .unwrap()
            .unwrap()
            .request_config()
            .max_redirects(),
        50
    );

    manager
        .update_default(Some(config(&[(
            "request.config.max.redirects",
            ConfigValue::from(2),
        )])))
        .unwrap();
    assert_eq!(
        manager
            .client(Some("follower"))
            .unwrap()
            .unwrap()
            .request_config()
            .max_redirects(),
        2
    );

    manager.update_default(None).unwrap();
    assert_eq!(
        manager
            .client(Some("follower"))
            .unwrap()
            .unwrap()
            .request_config()
            .max_redirects(),
        50
    );
}

#[test]
fn test_configured_ranking_is_ignored() {
    let registry = Arc::new(InMemoryServiceRegistry::new());
    let mut manager = ClientManager::builder()
        .with_registry(registry.clone())
        .with_default_configuration(config(&[("service.ranking", ConfigValue::from(-5))]))
        .with_instance(
            "pid",
            config(&[
                ("http.client.id", ConfigValue::from("pushy")),
                ("service.ranking", ConfigValue::from(1000)),
            ]),
        )
        .build()
        .unwrap();
    manager.start().unwrap();

    let references = registry.references(HTTP_CLIENT_INTERFACE, None);
    assert_eq!(references.len(), 2);
    assert_eq!(references[0].property(SERVICE_RANKING), Some(&ConfigValue::from(100)));
    assert_eq!(references[1].ranking(), 0);
    assert_eq!(manager.client(None).unwrap().unwrap().id(), "default");
}

#[test]
fn test_source_changes_visible_after_reload() {
    let mut source = MapSource::new("mutable")
        .with_value("http.client.id", ConfigValue::from("mutable"))
        .with_value("request.config.socket.timeout", ConfigValue::from(1));

    let mut manager = ClientManager::builder()
        .with_instance_source("pid", &source)
        .unwrap()
        .build()
        .unwrap();
    manager.start().unwrap();

    source.set("request.config.socket.timeout", ConfigValue::from(2));
    source.reload().unwrap();
    manager.update_instance("pid", source.load().unwrap()).unwrap();

    let client = manager.client(Some("mutable")).unwrap().unwrap();
    assert_eq!(client.request_config().socket_timeout(), 2);
}
