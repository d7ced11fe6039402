// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property accessors bound to a concrete target.
//!
//! [`SetterAdapter`] pairs a mutable target with its setter registry and checks
//! argument types before invoking. [`GetterAdapter`] pairs a reference instance with
//! its getter registry and reads current values, e.g. library defaults.

use crate::binding::introspect::PropertyRegistry;
use crate::domain::param_type::signature;
use crate::domain::{ConfigValue, ParamType, Result};
use tracing::warn;

/// What happened when a value was offered to a setter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SetOutcome {
    /// The setter was invoked.
    Applied,
    /// No setter exists for the property.
    UnknownProperty,
    /// The value does not fit the setter's parameter type.
    TypeMismatch {
        /// The setter's declared signature
        expected: String,
        /// The offered value's type
        actual: String,
    },
}

/// Applies values to a target through its setter registry.
pub struct SetterAdapter<'a, T> {
    target: &'a mut T,
    setters: &'a PropertyRegistry<T>,
}

impl<'a, T> SetterAdapter<'a, T> {
    /// Binds `setters` to `target`.
    pub fn new(target: &'a mut T, setters: &'a PropertyRegistry<T>) -> Self {
        SetterAdapter { target, setters }
    }

    /// The setter registry.
    pub fn setters(&self) -> &PropertyRegistry<T> {
        self.setters
    }

    /// Offers `value` to the setter of property `name`.
    ///
    /// The setter is invoked only if its visible signature has exactly one parameter
    /// and the value is assignable to it.
    ///
    /// # Errors
    ///
    /// Propagates failures raised by the invoked setter.
    pub fn set(&mut self, name: &str, value: &ConfigValue) -> Result<SetOutcome> {
        let Some(invoker) = self.setters.get(name) else {
            return Ok(SetOutcome::UnknownProperty);
        };
        let parameter_types = invoker.parameter_types();
        if !accepts(&parameter_types, value) {
            return Ok(SetOutcome::TypeMismatch {
                expected: signature(&parameter_types),
                actual: format!("({})", value.type_name()),
            });
        }
        invoker.invoke(self.target, std::slice::from_ref(value))?;
        Ok(SetOutcome::Applied)
    }
}

fn accepts(parameter_types: &[ParamType], value: &ConfigValue) -> bool {
    match parameter_types {
        [ty] => value.is_assignable_to(ty),
        _ => false,
    }
}

/// Read access to the current property values of some instance.
pub trait PropertyReader {
    /// Returns `true` if a getter exists for `name`.
    fn has_property(&self, name: &str) -> bool;

    /// Reads the current value of `name`.
    ///
    /// Returns `None` if there is no getter, the getter yields no value, or it fails.
    fn read(&self, name: &str) -> Option<ConfigValue>;
}

/// Reads values from a reference instance through its getter registry.
pub struct GetterAdapter<'a, T> {
    bound: Option<(&'a T, &'a PropertyRegistry<T>)>,
}

impl<'a, T> GetterAdapter<'a, T> {
    /// Binds `getters` to `target`.
    pub fn new(target: &'a T, getters: &'a PropertyRegistry<T>) -> Self {
        GetterAdapter {
            bound: Some((target, getters)),
        }
    }

    /// An adapter without getters; every read yields `None`.
    pub fn empty() -> Self {
        GetterAdapter { bound: None }
    }
}

impl<T> PropertyReader for GetterAdapter<'_, T> {
    fn has_property(&self, name: &str) -> bool {
        self.bound
            .is_some_and(|(_, getters)| getters.contains(name))
    }

    fn read(&self, name: &str) -> Option<ConfigValue> {
        let (target, getters) = self.bound?;
        let invoker = getters.get(name)?;
        match invoker.get(target) {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    "Failed to read default value of '{}' via {}: {}",
                    name,
                    invoker.method_name(),
                    e
                );
                None
            }
        }
    }
}
