// SPDX-License-Identifier: MIT OR Apache-2.0

//! Uniform call wrappers around declared methods.
//!
//! An [`Invoker`] exposes a parameter signature of at most one value to the binder
//! and the metadata synthesizer, whatever the arity of the method it wraps:
//!
//! - **Direct** invokers pass arguments straight through.
//! - **Conditional** invokers expose one boolean and call a zero-argument method only
//!   when the boolean equals a fixed trigger value. This maps `disableX()` methods
//!   to `x.enabled = false`.
//! - **Default-argument** invokers fill all but one parameter of a multi-argument
//!   method from a fixed tuple and expose the remaining slot.

use crate::binding::method::Method;
use crate::domain::{ConfigError, ConfigValue, ParamType, Result, ValueKind};
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Debug)]
enum Strategy {
    Direct,
    Conditional {
        condition: bool,
    },
    DefaultArguments {
        defaults: Vec<Option<ConfigValue>>,
        slot: Option<usize>,
    },
}

/// A call wrapper around a single declared method.
///
/// # Examples
///
/// ```
/// use httpcfg::binding::{Invoker, Method};
/// use httpcfg::domain::ConfigValue;
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Builder {
///     redirects_disabled: bool,
/// }
///
/// let disable = Arc::new(Method::action("disableRedirectHandling", |b: &mut Builder| {
///     b.redirects_disabled = true;
/// }));
/// let invoker = Invoker::conditional(disable, false);
///
/// let mut builder = Builder::default();
/// invoker.invoke(&mut builder, &[ConfigValue::from(true)]).unwrap();
/// assert!(!builder.redirects_disabled);
/// invoker.invoke(&mut builder, &[ConfigValue::from(false)]).unwrap();
/// assert!(builder.redirects_disabled);
/// ```
pub struct Invoker<T> {
    method: Arc<Method<T>>,
    strategy: Strategy,
}

impl<T> Invoker<T> {
    /// Wraps a method, passing arguments straight through.
    pub fn new(method: Arc<Method<T>>) -> Self {
        Invoker {
            method,
            strategy: Strategy::Direct,
        }
    }

    /// Wraps a zero-argument method behind a single boolean parameter.
    ///
    /// The method is called only when the supplied boolean equals `condition`.
    pub fn conditional(method: Arc<Method<T>>, condition: bool) -> Self {
        Invoker {
            method,
            strategy: Strategy::Conditional { condition },
        }
    }

    /// Wraps a multi-argument method with fixed values for all but one parameter.
    ///
    /// `defaults` must hold one entry per declared parameter. A `None` entry marks
    /// the single externally supplied slot; without one the invoker exposes no
    /// parameters and always calls the method with the fixed tuple.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDefaultArguments`] if the tuple length differs
    /// from the method's arity or more than one slot is left open.
    pub fn default_arguments(
        method: Arc<Method<T>>,
        defaults: Vec<Option<ConfigValue>>,
    ) -> Result<Self> {
        let arity = method.parameter_types().len();
        if defaults.len() != arity {
            return Err(ConfigError::InvalidDefaultArguments {
                method: method.name().to_string(),
                message: format!(
                    "expected {} default arguments, got {}",
                    arity,
                    defaults.len()
                ),
            });
        }
        let mut open = defaults
            .iter()
            .enumerate()
            .filter(|(_, value)| value.is_none())
            .map(|(i, _)| i);
        let slot = open.next();
        if open.next().is_some() {
            return Err(ConfigError::InvalidDefaultArguments {
                method: method.name().to_string(),
                message: "at most one argument may be left open".to_string(),
            });
        }
        Ok(Invoker {
            method,
            strategy: Strategy::DefaultArguments { defaults, slot },
        })
    }

    /// The wrapped method.
    pub fn method(&self) -> &Arc<Method<T>> {
        &self.method
    }

    /// The name of the wrapped method.
    pub fn method_name(&self) -> &str {
        self.method.name()
    }

    /// The externally visible parameter types.
    pub fn parameter_types(&self) -> Vec<ParamType> {
        match &self.strategy {
            Strategy::Direct => self.method.parameter_types().to_vec(),
            Strategy::Conditional { .. } => vec![ParamType::Scalar(ValueKind::Boolean)],
            Strategy::DefaultArguments { slot, .. } => slot
                .and_then(|i| self.method.parameter_types().get(i).copied())
                .into_iter()
                .collect(),
        }
    }

    /// Invokes the method on `target`, applying this invoker's call rule.
    ///
    /// Conditional and default-argument invokers return `Ok(None)` without calling
    /// the method when their rule says not to.
    pub fn invoke(&self, target: &mut T, args: &[ConfigValue]) -> Result<Option<ConfigValue>> {
        match &self.strategy {
            Strategy::Direct => self.method.call(target, args),
            Strategy::Conditional { condition } => match args.first() {
                Some(ConfigValue::Boolean(b)) if b == condition => {
                    self.method.call(target, &[])?;
                    Ok(None)
                }
                _ => Ok(None),
            },
            Strategy::DefaultArguments { defaults, slot } => {
                let mut full = Vec::with_capacity(defaults.len());
                match slot {
                    Some(slot) => {
                        let [value] = args else {
                            return Ok(None);
                        };
                        for (i, default) in defaults.iter().enumerate() {
                            match default {
                                Some(fixed) => full.push(fixed.clone()),
                                None if i == *slot => full.push(value.clone()),
                                None => {}
                            }
                        }
                    }
                    None => full.extend(defaults.iter().flatten().cloned()),
                }
                self.method.call(target, &full)?;
                Ok(None)
            }
        }
    }

    /// Invokes a read-only method, typically a getter.
    pub fn get(&self, target: &T) -> Result<Option<ConfigValue>> {
        match self.strategy {
            Strategy::Direct => self.method.query(target),
            _ => Err(ConfigError::invocation(
                self.method.name(),
                "only direct invokers can be queried",
            )),
        }
    }
}

impl<T> Clone for Invoker<T> {
    fn clone(&self) -> Self {
        Invoker {
            method: Arc::clone(&self.method),
            strategy: self.strategy.clone(),
        }
    }
}

impl<T> fmt::Debug for Invoker<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invoker")
            .field("method", &self.method.name())
            .field("strategy", &self.strategy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Target {
        feature_disabled: bool,
        interval: Option<(i64, String)>,
        name: String,
    }

    fn disable_feature() -> Arc<Method<Target>> {
        Arc::new(Method::action("disableFeature", |t: &mut Target| {
            t.feature_disabled = true;
        }))
    }

    fn evict_idle() -> Arc<Method<Target>> {
        Arc::new(Method::setter2(
            "evictIdle",
            |t: &mut Target, n: i64, unit: String| t.interval = Some((n, unit)),
        ))
    }

    #[test]
    fn test_direct_invoker_passes_through() {
        let method = Arc::new(Method::setter("setName", |t: &mut Target, s: String| {
            t.name = s;
        }));
        let invoker = Invoker::new(method);
        assert_eq!(
            invoker.parameter_types(),
            vec![ParamType::Scalar(ValueKind::String)]
        );

        let mut target = Target::default();
        invoker
            .invoke(&mut target, &[ConfigValue::from("x")])
            .unwrap();
        assert_eq!(target.name, "x");
    }

    #[test]
    fn test_conditional_invoker_exposes_boolean() {
        let invoker = Invoker::conditional(disable_feature(), false);
        assert_eq!(
            invoker.parameter_types(),
            vec![ParamType::Scalar(ValueKind::Boolean)]
        );
    }

    #[test]
    fn test_conditional_invoker_calls_on_match() {
        let invoker = Invoker::conditional(disable_feature(), false);
        let mut target = Target::default();
        invoker
            .invoke(&mut target, &[ConfigValue::from(false)])
            .unwrap();
        assert!(target.feature_disabled);
    }

    #[test]
    fn test_conditional_invoker_ignores_mismatch() {
        let invoker = Invoker::conditional(disable_feature(), false);
        let mut target = Target::default();
        invoker.invoke(&mut target, &[ConfigValue::from(true)]).unwrap();
        invoker.invoke(&mut target, &[ConfigValue::from("false")]).unwrap();
        invoker.invoke(&mut target, &[]).unwrap();
        assert!(!target.feature_disabled);
    }

    #[test]
    fn test_default_arguments_fill_slot() {
        let invoker = Invoker::default_arguments(
            evict_idle(),
            vec![None, Some(ConfigValue::from("MILLISECONDS"))],
        )
        .unwrap();
        assert_eq!(
            invoker.parameter_types(),
            vec![ParamType::Scalar(ValueKind::Long)]
        );

        let mut target = Target::default();
        invoker
            .invoke(&mut target, &[ConfigValue::from(30_000i64)])
            .unwrap();
        assert_eq!(
            target.interval,
            Some((30_000, "MILLISECONDS".to_string()))
        );
    }

    #[test]
    fn test_default_arguments_require_one_argument() {
        let invoker = Invoker::default_arguments(
            evict_idle(),
            vec![None, Some(ConfigValue::from("SECONDS"))],
        )
        .unwrap();
        let mut target = Target::default();
        invoker.invoke(&mut target, &[]).unwrap();
        assert_eq!(target.interval, None);
    }

    #[test]
    fn test_default_arguments_without_slot_use_fixed_tuple() {
        let invoker = Invoker::default_arguments(
            evict_idle(),
            vec![Some(ConfigValue::from(5i64)), Some(ConfigValue::from("SECONDS"))],
        )
        .unwrap();
        assert!(invoker.parameter_types().is_empty());

        let mut target = Target::default();
        invoker.invoke(&mut target, &[]).unwrap();
        assert_eq!(target.interval, Some((5, "SECONDS".to_string())));
    }

    #[test]
    fn test_default_arguments_length_must_match_arity() {
        let result = Invoker::default_arguments(evict_idle(), vec![None]);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidDefaultArguments { .. })
        ));
    }

    #[test]
    fn test_default_arguments_allow_one_open_slot() {
        let result = Invoker::default_arguments(evict_idle(), vec![None, None]);
        assert!(result.is_err());
    }

    #[test]
    fn test_get_only_for_direct_invokers() {
        let getter = Arc::new(Method::getter("getName", |t: &Target| t.name.clone()));
        let target = Target {
            name: "n".to_string(),
            ..Default::default()
        };
        assert_eq!(
            Invoker::new(getter).get(&target).unwrap(),
            Some(ConfigValue::from("n"))
        );
        assert!(Invoker::conditional(disable_feature(), true)
            .get(&target)
            .is_err());
    }
}
