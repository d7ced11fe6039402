// SPDX-License-Identifier: MIT OR Apache-2.0

//! The property binder.
//!
//! Applies the entries of a flat configuration map to a target's setters. Binding is
//! best effort: unknown keys, mismatched types and failing setters are logged and
//! skipped, and the rest of the map is still applied.

use crate::binding::accessor::{SetOutcome, SetterAdapter};
use crate::binding::introspect::PropertyRegistry;
use crate::domain::ConfigMap;
use tracing::{debug, warn};

/// The per-key result of a binding pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BindReport {
    /// Keys whose setter was invoked
    pub applied: Vec<String>,
    /// Keys with no matching setter
    pub unknown: Vec<String>,
    /// Keys whose value did not fit the setter's parameter type
    pub mismatched: Vec<String>,
    /// Keys whose setter failed
    pub failed: Vec<String>,
}

impl BindReport {
    /// Returns `true` if every considered key was applied.
    pub fn is_clean(&self) -> bool {
        self.unknown.is_empty() && self.mismatched.is_empty() && self.failed.is_empty()
    }
}

/// Appends a trailing `.` to a non-empty namespace that lacks one.
///
/// # Examples
///
/// ```
/// use httpcfg::binding::normalize_namespace;
///
/// assert_eq!(normalize_namespace("request.config"), "request.config.");
/// assert_eq!(normalize_namespace("request.config."), "request.config.");
/// assert_eq!(normalize_namespace(""), "");
/// ```
pub fn normalize_namespace(namespace: &str) -> String {
    if namespace.is_empty() || namespace.ends_with('.') {
        namespace.to_string()
    } else {
        format!("{}.", namespace)
    }
}

/// Applies every entry of `config` under `namespace` to the adapter's target.
///
/// Entries whose key starts with the normalized namespace have the prefix stripped
/// and are offered to the setter of the remaining dotted name. An empty namespace
/// considers every entry. Entries outside the namespace are ignored and do not
/// appear in the report.
pub fn apply_configuration<T>(
    namespace: &str,
    config: &ConfigMap,
    adapter: &mut SetterAdapter<'_, T>,
) -> BindReport {
    let prefix = normalize_namespace(namespace);
    let mut report = BindReport::default();
    for (key, value) in config {
        let Some(name) = key.strip_prefix(prefix.as_str()) else {
            continue;
        };
        match adapter.set(name, value) {
            Ok(SetOutcome::Applied) => report.applied.push(key.clone()),
            Ok(SetOutcome::UnknownProperty) => {
                debug!("Ignoring configuration '{}': no setter for '{}'", key, name);
                report.unknown.push(key.clone());
            }
            Ok(SetOutcome::TypeMismatch { expected, actual }) => {
                warn!(
                    "Skipping configuration '{}': value of type {} does not match {}",
                    key, actual, expected
                );
                report.mismatched.push(key.clone());
            }
            Err(e) => {
                warn!("Failed to apply configuration '{}': {}", key, e);
                report.failed.push(key.clone());
            }
        }
    }
    report
}

/// Binds `config` under `namespace` onto `target` using `setters`.
///
/// # Examples
///
/// ```
/// use httpcfg::binding::{bean_setters, bind, Introspect, Method};
/// use httpcfg::domain::{ConfigMap, ConfigValue};
///
/// #[derive(Default)]
/// struct Bean {
///     foo_bar: String,
/// }
///
/// impl Introspect for Bean {
///     fn declared_methods() -> Vec<Method<Self>> {
///         vec![Method::setter("setFooBar", |b: &mut Bean, s: String| b.foo_bar = s)]
///     }
/// }
///
/// let mut config = ConfigMap::new();
/// config.insert("test.bean.foo.bar".to_string(), ConfigValue::from("X"));
///
/// let setters = bean_setters::<Bean>();
/// let mut bean = Bean::default();
/// bind("test.bean", &config, &mut bean, &setters);
/// assert_eq!(bean.foo_bar, "X");
/// ```
pub fn bind<T>(
    namespace: &str,
    config: &ConfigMap,
    target: &mut T,
    setters: &PropertyRegistry<T>,
) -> BindReport {
    let mut adapter = SetterAdapter::new(target, setters);
    apply_configuration(namespace, config, &mut adapter)
}
