// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bean introspection.
//!
//! Bean types declare their accessors through [`Introspect`]. The scanning functions
//! filter the declared methods by name prefix and arity and index the matches by
//! their dotted property name, producing a [`PropertyRegistry`].

use crate::binding::invoker::Invoker;
use crate::binding::method::Method;
use crate::domain::PropertyName;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::trace;

/// Name prefix of setter methods.
pub const SETTER_PREFIX: &str = "set";

/// Name prefixes of getter methods.
pub const GETTER_PREFIXES: [&str; 2] = ["get", "is"];

/// Types whose accessors can be scanned into property registries.
///
/// # Examples
///
/// ```
/// use httpcfg::binding::{bean_setters, Introspect, Method};
///
/// #[derive(Default)]
/// struct Bean {
///     min_count: i32,
/// }
///
/// impl Introspect for Bean {
///     fn declared_methods() -> Vec<Method<Self>> {
///         vec![
///             Method::setter("setMinCount", |b: &mut Bean, n: i32| b.min_count = n),
///             Method::getter("getMinCount", |b: &Bean| b.min_count),
///         ]
///     }
/// }
///
/// let setters = bean_setters::<Bean>();
/// assert!(setters.contains("min.count"));
/// ```
pub trait Introspect: Sized + 'static {
    /// Lists every declared accessor in a stable order.
    fn declared_methods() -> Vec<Method<Self>>;
}

/// An immutable mapping from dotted property name to [`Invoker`].
pub struct PropertyRegistry<T> {
    invokers: BTreeMap<PropertyName, Invoker<T>>,
}

impl<T> PropertyRegistry<T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        PropertyRegistry {
            invokers: BTreeMap::new(),
        }
    }

    /// Registers an invoker, replacing and returning any previous one of the same name.
    pub fn insert(&mut self, name: PropertyName, invoker: Invoker<T>) -> Option<Invoker<T>> {
        self.invokers.insert(name, invoker)
    }

    /// Looks up the invoker for a dotted property name.
    pub fn get(&self, name: &str) -> Option<&Invoker<T>> {
        self.invokers.get(name)
    }

    /// Returns `true` if the registry has an invoker for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.invokers.contains_key(name)
    }

    /// Iterates over the entries in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, PropertyName, Invoker<T>> {
        self.invokers.iter()
    }

    /// The registered property names in order.
    pub fn names(&self) -> impl Iterator<Item = &PropertyName> {
        self.invokers.keys()
    }

    /// The number of registered properties.
    pub fn len(&self) -> usize {
        self.invokers.len()
    }

    /// Returns `true` if no property is registered.
    pub fn is_empty(&self) -> bool {
        self.invokers.is_empty()
    }

    /// Adds all entries of `other`, which win on name collisions.
    pub fn extend(&mut self, other: PropertyRegistry<T>) {
        self.invokers.extend(other.invokers);
    }
}

impl<T> Default for PropertyRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for PropertyRegistry<T> {
    fn clone(&self) -> Self {
        PropertyRegistry {
            invokers: self.invokers.clone(),
        }
    }
}

impl<T> std::fmt::Debug for PropertyRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.invokers.iter()).finish()
    }
}

impl<T> FromIterator<(PropertyName, Invoker<T>)> for PropertyRegistry<T> {
    fn from_iter<I: IntoIterator<Item = (PropertyName, Invoker<T>)>>(iter: I) -> Self {
        PropertyRegistry {
            invokers: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a PropertyRegistry<T> {
    type Item = (&'a PropertyName, &'a Invoker<T>);
    type IntoIter = btree_map::Iter<'a, PropertyName, Invoker<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.invokers.iter()
    }
}

/// Scans a type's one-argument `set*` methods.
pub fn bean_setters<T: Introspect>() -> PropertyRegistry<T> {
    scan(T::declared_methods(), 1, &[SETTER_PREFIX])
}

/// Scans a type's zero-argument `get*` and `is*` methods that return a value.
pub fn bean_getters<T: Introspect>() -> PropertyRegistry<T> {
    scan(T::declared_methods(), 0, &GETTER_PREFIXES)
}

/// Scans a type's declared methods with the given arity and name prefixes.
pub fn scan_methods<T: Introspect>(arity: usize, prefixes: &[&str]) -> PropertyRegistry<T> {
    scan(T::declared_methods(), arity, prefixes)
}

/// Indexes methods by the dotted name of their prefix-stripped name.
///
/// Zero-arity scans skip methods returning nothing. Methods are registered in list
/// order, so a later method deriving the same name replaces an earlier one.
pub fn scan<T>(methods: Vec<Method<T>>, arity: usize, prefixes: &[&str]) -> PropertyRegistry<T> {
    let mut registry = PropertyRegistry::new();
    for method in methods {
        if method.parameter_types().len() != arity {
            continue;
        }
        if arity == 0 && method.return_type().is_none() {
            continue;
        }
        let Some(rest) = prefixes
            .iter()
            .find_map(|prefix| method.name().strip_prefix(prefix))
        else {
            continue;
        };
        let name = PropertyName::from_camel(rest);
        let method = Arc::new(method);
        if let Some(previous) = registry.insert(name.clone(), Invoker::new(Arc::clone(&method))) {
            trace!(
                "Property '{}' of {} replaced by {}",
                name,
                previous.method_name(),
                method.name()
            );
        }
    }
    registry
}
