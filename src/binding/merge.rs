// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration merge and sanitization.
//!
//! Sources are merged with the first-listed source winning on key collisions. Keys
//! reserved for the host's service and component bookkeeping are stripped afterwards
//! so they never reach a setter.

use crate::domain::ConfigMap;
use tracing::debug;

/// Prefix of the host's service identity properties.
pub const SERVICE_PREFIX: &str = "service.";

/// Prefix of the host's component identity properties.
pub const COMPONENT_PREFIX: &str = "component.";

/// Suffix of the host's target reference properties.
pub const TARGET_SUFFIX: &str = ".target";

/// Merges maps so that the first-listed map wins when several define a key.
///
/// `None` entries are skipped.
///
/// # Examples
///
/// ```
/// use httpcfg::binding::merge_maps;
/// use httpcfg::domain::{ConfigMap, ConfigValue};
///
/// let mut first = ConfigMap::new();
/// first.insert("a".to_string(), ConfigValue::from(1));
/// let mut second = ConfigMap::new();
/// second.insert("a".to_string(), ConfigValue::from(2));
/// second.insert("b".to_string(), ConfigValue::from(3));
///
/// let merged = merge_maps([Some(&first), None, Some(&second)]);
/// assert_eq!(merged.get("a"), Some(&ConfigValue::from(1)));
/// assert_eq!(merged.get("b"), Some(&ConfigValue::from(3)));
/// ```
pub fn merge_maps<'a, I>(sources: I) -> ConfigMap
where
    I: IntoIterator<Item = Option<&'a ConfigMap>>,
{
    let mut merged = ConfigMap::new();
    for source in sources.into_iter().flatten() {
        for (key, value) in source {
            merged
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }
    merged
}

/// Removes every key matching `forbidden`.
pub fn clean<P>(mut map: ConfigMap, forbidden: P) -> ConfigMap
where
    P: Fn(&str) -> bool,
{
    map.retain(|key, _| {
        let keep = !forbidden(key);
        if !keep {
            debug!("Removing reserved property '{}'", key);
        }
        keep
    });
    map
}

/// Merges `sources` first-wins and removes every key matching `forbidden`.
pub fn merge_and_sanitize<'a, I, P>(sources: I, forbidden: P) -> ConfigMap
where
    I: IntoIterator<Item = Option<&'a ConfigMap>>,
    P: Fn(&str) -> bool,
{
    clean(merge_maps(sources), forbidden)
}

/// Matches keys starting with `prefix`.
pub fn starts_with(prefix: impl Into<String>) -> impl Fn(&str) -> bool + Clone + Send + Sync {
    let prefix = prefix.into();
    move |key: &str| key.starts_with(prefix.as_str())
}

/// Matches keys ending with `suffix`.
pub fn ends_with(suffix: impl Into<String>) -> impl Fn(&str) -> bool + Clone + Send + Sync {
    let suffix = suffix.into();
    move |key: &str| key.ends_with(suffix.as_str())
}

/// Matches keys matched by either predicate.
pub fn or<A, B>(a: A, b: B) -> impl Fn(&str) -> bool + Clone + Send + Sync
where
    A: Fn(&str) -> bool + Clone + Send + Sync,
    B: Fn(&str) -> bool + Clone + Send + Sync,
{
    move |key: &str| a(key) || b(key)
}

/// Matches the host's reserved keys: `service.*`, `component.*` and `*.target`.
///
/// # Examples
///
/// ```
/// use httpcfg::binding::forbidden_properties;
///
/// let forbidden = forbidden_properties();
/// assert!(forbidden("service.pid"));
/// assert!(forbidden("component.name"));
/// assert!(forbidden("foo.target"));
/// assert!(!forbidden("real.key"));
/// ```
pub fn forbidden_properties() -> impl Fn(&str) -> bool + Clone + Send + Sync {
    or(
        or(starts_with(SERVICE_PREFIX), starts_with(COMPONENT_PREFIX)),
        ends_with(TARGET_SUFFIX),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigValue;

    fn map(entries: &[(&str, ConfigValue)]) -> ConfigMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_first_source_wins() {
        let first = map(&[("a", ConfigValue::from(1))]);
        let second = map(&[("a", ConfigValue::from(2)), ("b", ConfigValue::from(3))]);
        let merged = merge_maps([Some(&first), Some(&second)]);
        assert_eq!(
            merged,
            map(&[("a", ConfigValue::from(1)), ("b", ConfigValue::from(3))])
        );
    }

    #[test]
    fn test_merge_nothing() {
        assert!(merge_maps([None, None]).is_empty());
        assert!(merge_maps(Vec::<Option<&ConfigMap>>::new()).is_empty());
    }

    #[test]
    fn test_clean_removes_reserved_keys() {
        let cleaned = clean(
            map(&[
                ("service.pid", ConfigValue::from("x")),
                ("component.name", ConfigValue::from("y")),
                ("foo.target", ConfigValue::from("z")),
                ("real.key", ConfigValue::from("v")),
            ]),
            forbidden_properties(),
        );
        assert_eq!(cleaned, map(&[("real.key", ConfigValue::from("v"))]));
    }

    #[test]
    fn test_reserved_prefix_must_match_at_start() {
        let forbidden = forbidden_properties();
        assert!(!forbidden("my.service.pid"));
        assert!(!forbidden("target.host"));
        assert!(forbidden("service.ranking"));
    }

    #[test]
    fn test_merge_and_sanitize() {
        let instance = map(&[
            ("http.client.id", ConfigValue::from("test-client")),
            ("service.pid", ConfigValue::from("pid-1")),
        ]);
        let default = map(&[
            ("http.client.id", ConfigValue::from("default")),
            ("service.ranking", ConfigValue::from(100)),
            ("max.redirects", ConfigValue::from(5)),
        ]);
        let effective =
            merge_and_sanitize([Some(&instance), Some(&default)], forbidden_properties());
        assert_eq!(
            effective,
            map(&[
                ("http.client.id", ConfigValue::from("test-client")),
                ("max.redirects", ConfigValue::from(5)),
            ])
        );
    }
}
