// SPDX-License-Identifier: MIT OR Apache-2.0

//! Attribute metadata synthesis.
//!
//! Derives [`AttributeDefinition`]s from a setter registry, optionally pulling default
//! values from a reference instance through a [`PropertyReader`].

use crate::binding::accessor::PropertyReader;
use crate::binding::binder::normalize_namespace;
use crate::binding::introspect::PropertyRegistry;
use crate::domain::property_name::dotted_to_title;
use crate::domain::{AttributeDefinition, ObjectClassDefinition, ParamType, Result};
use tracing::{debug, warn};

/// Describes every setter whose parameter type a definition can express.
///
/// Each definition's id is the namespaced dotted name and its display name is the
/// title-cased dotted name. If `defaults` has a getter for the same dotted name, its
/// value becomes the default, string-serialized element-wise for arrays. Setters of
/// unsupported types are skipped.
///
/// # Examples
///
/// ```
/// use httpcfg::binding::{attribute_definitions, bean_setters, GetterAdapter, Introspect, Method};
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
/// let setters = bean_setters::<Bean>();
/// let ads = attribute_definitions("", &setters, &GetterAdapter::<Bean>::empty());
/// assert_eq!(ads.len(), 1);
/// assert_eq!(ads[0].id(), "foo.bar");
/// assert_eq!(ads[0].name(), Some("Foo Bar"));
/// ```
pub fn attribute_definitions<S>(
    namespace: &str,
    setters: &PropertyRegistry<S>,
    defaults: &dyn PropertyReader,
) -> Vec<AttributeDefinition> {
    let prefix = normalize_namespace(namespace);
    let mut definitions = Vec::with_capacity(setters.len());
    for (name, invoker) in setters {
        let parameter_types = invoker.parameter_types();
        let [ty] = parameter_types.as_slice() else {
            debug!(
                "Not describing '{}': {} exposes {} parameters",
                name,
                invoker.method_name(),
                parameter_types.len()
            );
            continue;
        };
        if ty.attribute_kind().is_none() {
            debug!("Not describing '{}': unsupported type {}", name, ty);
            continue;
        }
        let default_value = defaults.read(name.as_str()).map(|value| value.to_strings());
        match AttributeDefinition::new(
            format!("{}{}", prefix, name),
            Some(name.to_title()),
            *ty,
            default_value,
        ) {
            Ok(definition) => definitions.push(definition),
            Err(e) => warn!("Failed to describe '{}': {}", name, e),
        }
    }
    definitions
}

/// Describes a single property outside the reflective path.
///
/// Without default values the definition carries no default.
///
/// # Errors
///
/// Returns [`ConfigError::UnsupportedAttributeType`](crate::domain::ConfigError::UnsupportedAttributeType)
/// if `ty` is opaque.
///
/// # Examples
///
/// ```
/// use httpcfg::binding::attribute_definition;
/// use httpcfg::domain::{ParamType, ValueKind};
///
/// let ads = attribute_definition(
///     "http.client.id",
///     Some("HttpClient ID"),
///     ParamType::Scalar(ValueKind::String),
///     &[],
/// )
/// .unwrap();
/// assert_eq!(ads.len(), 1);
/// assert_eq!(ads[0].default_value(), None);
/// ```
pub fn attribute_definition(
    id: &str,
    name: Option<&str>,
    ty: ParamType,
    default_values: &[&str],
) -> Result<Vec<AttributeDefinition>> {
    let default_value = if default_values.is_empty() {
        None
    } else {
        Some(default_values.iter().map(|s| s.to_string()).collect())
    };
    let definition = AttributeDefinition::new(id, name.map(str::to_string), ty, default_value)?;
    Ok(vec![definition])
}

/// Concatenates lists of definitions, preserving order.
pub fn join<I>(lists: I) -> Vec<AttributeDefinition>
where
    I: IntoIterator<Item = Vec<AttributeDefinition>>,
{
    lists.into_iter().flatten().collect()
}

/// Builds an object class definition; without a name the id is used.
pub fn create_object_class_definition(
    id: &str,
    name: Option<&str>,
    description: Option<&str>,
    attributes: Vec<AttributeDefinition>,
) -> ObjectClassDefinition {
    ObjectClassDefinition::new(
        id,
        name.map(str::to_string)
            .unwrap_or_else(|| dotted_to_title(id)),
        description.map(str::to_string),
        attributes,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::accessor::GetterAdapter;
    use crate::binding::introspect::{bean_getters, bean_setters, Introspect};
    use crate::binding::method::Method;
    use crate::domain::attribute::UNBOUNDED;
    use crate::domain::{ConfigError, ValueKind};
    use std::net::IpAddr;

    #[derive(Default)]
    struct Bean {
        foo_bar: String,
        names: Vec<String>,
        enabled: bool,
        ratio: f64,
        address: Option<IpAddr>,
    }

    impl Introspect for Bean {
        fn declared_methods() -> Vec<Method<Self>> {
            vec![
                Method::setter("setFooBar", |b: &mut Bean, s: String| b.foo_bar = s),
                Method::setter("setNames", |b: &mut Bean, n: Vec<String>| b.names = n),
                Method::getter("getNames", |b: &Bean| b.names.clone()),
                Method::setter("setEnabled", |b: &mut Bean, e: bool| b.enabled = e),
                Method::getter("isEnabled", |b: &Bean| b.enabled),
                Method::setter("setRatio", |b: &mut Bean, r: f64| b.ratio = r),
                Method::getter("getRatio", |b: &Bean| b.ratio),
                Method::setter("setAddress", |b: &mut Bean, a: IpAddr| b.address = Some(a)),
            ]
        }
    }

    fn defaults() -> Bean {
        Bean {
            foo_bar: String::new(),
            names: vec!["a".to_string(), "b".to_string()],
            enabled: true,
            ratio: 0.5,
            address: None,
        }
    }

    #[test]
    fn test_namespaced_ids_and_titles() {
        let setters = bean_setters::<Bean>();
        let ads = attribute_definitions("foo", &setters, &GetterAdapter::<Bean>::empty());
        let ids: Vec<&str> = ads.iter().map(|ad| ad.id()).collect();
        assert_eq!(ids, vec!["foo.enabled", "foo.foo.bar", "foo.names", "foo.ratio"]);
        let foo_bar = ads.iter().find(|ad| ad.id() == "foo.foo.bar").unwrap();
        assert_eq!(foo_bar.name(), Some("Foo Bar"));
        assert_eq!(foo_bar.kind(), ValueKind::String);
        assert_eq!(foo_bar.cardinality(), 0);
        assert_eq!(foo_bar.default_value(), None);
    }

    #[test]
    fn test_unsupported_setter_is_skipped() {
        let setters = bean_setters::<Bean>();
        let ads = attribute_definitions("", &setters, &GetterAdapter::<Bean>::empty());
        assert!(ads.iter().all(|ad| ad.id() != "address"));
    }

    #[test]
    fn test_defaults_from_reference_instance() {
        let setters = bean_setters::<Bean>();
        let getters = bean_getters::<Bean>();
        let reference = defaults();
        let ads = attribute_definitions("", &setters, &GetterAdapter::new(&reference, &getters));

        let names = ads.iter().find(|ad| ad.id() == "names").unwrap();
        assert_eq!(names.cardinality(), UNBOUNDED);
        assert_eq!(
            names.default_value(),
            Some(&["a".to_string(), "b".to_string()][..])
        );
        assert_eq!(names.description(), "default: [a, b]");

        let enabled = ads.iter().find(|ad| ad.id() == "enabled").unwrap();
        assert_eq!(enabled.description(), "default: true");

        let ratio = ads.iter().find(|ad| ad.id() == "ratio").unwrap();
        assert_eq!(ratio.description(), "default: 0.5");

        let foo_bar = ads.iter().find(|ad| ad.id() == "foo.bar").unwrap();
        assert_eq!(foo_bar.default_value(), None);
    }

    #[test]
    fn test_attribute_definition_with_defaults() {
        let ads = attribute_definition(
            "webconsole.configurationFactory.nameHint",
            None,
            ParamType::Scalar(ValueKind::String),
            &["HttpClient ID: {http.client.id}"],
        )
        .unwrap();
        assert_eq!(ads[0].name(), None);
        assert_eq!(
            ads[0].description(),
            "default: HttpClient ID: {http.client.id}"
        );
    }

    #[test]
    fn test_attribute_definition_rejects_opaque() {
        let result = attribute_definition("x", None, ParamType::Opaque("TimeUnit"), &[]);
        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedAttributeType { .. })
        ));
    }

    #[test]
    fn test_join_preserves_order() {
        let first = attribute_definition("a", None, ParamType::Scalar(ValueKind::String), &[])
            .unwrap();
        let second = attribute_definition("b", None, ParamType::Scalar(ValueKind::Long), &[])
            .unwrap();
        let joined = join([first, second]);
        let ids: Vec<&str> = joined.iter().map(|ad| ad.id()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_create_object_class_definition() {
        let ocd = create_object_class_definition("http.client", None, None, Vec::new());
        assert_eq!(ocd.id(), "http.client");
        assert_eq!(ocd.name(), "Http Client");
        assert!(ocd.attribute_definitions().is_empty());
    }
}
