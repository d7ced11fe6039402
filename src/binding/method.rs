// SPDX-License-Identifier: MIT OR Apache-2.0

//! Statically declared accessor methods.
//!
//! A [`Method`] describes one accessor of a bean type: its name, its declared parameter
//! and return types, and a boxed closure performing the call. Bean types list their
//! methods through [`Introspect`](crate::binding::Introspect) and the introspector
//! derives property registries from that list.

use crate::domain::param_type::signature;
use crate::domain::{ConfigError, ConfigValue, FromValue, IntoValue, ParamType, Result};
use std::fmt;

type QueryFn<T> = dyn Fn(&T) -> Option<ConfigValue> + Send + Sync;
type MutateFn<T> = dyn Fn(&mut T, &[ConfigValue]) -> Result<Option<ConfigValue>> + Send + Sync;

/// The callable part of a [`Method`].
pub enum MethodBody<T> {
    /// A read-only call, typically a getter.
    Query(Box<QueryFn<T>>),
    /// A call that may modify the target, typically a setter.
    Mutate(Box<MutateFn<T>>),
}

/// One declared accessor of a bean type.
///
/// # Examples
///
/// ```
/// use httpcfg::binding::Method;
/// use httpcfg::domain::ConfigValue;
///
/// #[derive(Default)]
/// struct Bean {
///     foo_bar: String,
/// }
///
/// let setter = Method::setter("setFooBar", |bean: &mut Bean, value: String| {
///     bean.foo_bar = value;
/// });
///
/// let mut bean = Bean::default();
/// setter.call(&mut bean, &[ConfigValue::from("x")]).unwrap();
/// assert_eq!(bean.foo_bar, "x");
/// ```
pub struct Method<T> {
    name: String,
    parameter_types: Vec<ParamType>,
    return_type: Option<ParamType>,
    body: MethodBody<T>,
}

impl<T: 'static> Method<T> {
    /// Declares a method from its parts.
    ///
    /// A `return_type` of `None` declares a method returning nothing.
    pub fn raw(
        name: impl Into<String>,
        parameter_types: Vec<ParamType>,
        return_type: Option<ParamType>,
        body: MethodBody<T>,
    ) -> Self {
        Method {
            name: name.into(),
            parameter_types,
            return_type,
            body,
        }
    }

    /// Declares a zero-argument method returning a value.
    pub fn getter<R, F>(name: impl Into<String>, f: F) -> Self
    where
        R: IntoValue,
        F: Fn(&T) -> R + Send + Sync + 'static,
    {
        Self::raw(
            name,
            Vec::new(),
            Some(R::return_type()),
            MethodBody::Query(Box::new(move |target: &T| f(target).into_value())),
        )
    }

    /// Declares a one-argument method.
    pub fn setter<A, F>(name: impl Into<String>, f: F) -> Self
    where
        A: FromValue,
        F: Fn(&mut T, A) + Send + Sync + 'static,
    {
        Self::try_setter(name, move |target, arg| {
            f(target, arg);
            Ok(())
        })
    }

    /// Declares a one-argument method that can fail.
    pub fn try_setter<A, F>(name: impl Into<String>, f: F) -> Self
    where
        A: FromValue,
        F: Fn(&mut T, A) -> Result<()> + Send + Sync + 'static,
    {
        let name = name.into();
        let method_name = name.clone();
        Self::raw(
            name,
            vec![A::param_type()],
            None,
            MethodBody::Mutate(Box::new(move |target: &mut T, args: &[ConfigValue]| {
                let arg = match args {
                    [value] => convert::<A>(&method_name, value, args)?,
                    _ => return Err(mismatch(&method_name, &[A::param_type()], args)),
                };
                f(target, arg)?;
                Ok(None)
            })),
        )
    }

    /// Declares a zero-argument method returning nothing.
    pub fn action<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        let name = name.into();
        let method_name = name.clone();
        Self::raw(
            name,
            Vec::new(),
            None,
            MethodBody::Mutate(Box::new(move |target: &mut T, args: &[ConfigValue]| {
                if !args.is_empty() {
                    return Err(mismatch(&method_name, &[], args));
                }
                f(target);
                Ok(None)
            })),
        )
    }

    /// Declares a two-argument method.
    pub fn setter2<A, B, F>(name: impl Into<String>, f: F) -> Self
    where
        A: FromValue,
        B: FromValue,
        F: Fn(&mut T, A, B) + Send + Sync + 'static,
    {
        let name = name.into();
        let method_name = name.clone();
        let declared = vec![A::param_type(), B::param_type()];
        let expected = declared.clone();
        Self::raw(
            name,
            declared,
            None,
            MethodBody::Mutate(Box::new(move |target: &mut T, args: &[ConfigValue]| match args {
                [a, b] => {
                    let a = convert::<A>(&method_name, a, args)?;
                    let b = convert::<B>(&method_name, b, args)?;
                    f(target, a, b);
                    Ok(None)
                }
                _ => Err(mismatch(&method_name, &expected, args)),
            })),
        )
    }
}

impl<T> Method<T> {
    /// The method name, e.g. `setMaxRedirects`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared parameter types.
    pub fn parameter_types(&self) -> &[ParamType] {
        &self.parameter_types
    }

    /// The declared return type, `None` for methods returning nothing.
    pub fn return_type(&self) -> Option<ParamType> {
        self.return_type
    }

    /// Calls the method on `target`.
    pub fn call(&self, target: &mut T, args: &[ConfigValue]) -> Result<Option<ConfigValue>> {
        match &self.body {
            MethodBody::Query(f) => {
                if !args.is_empty() {
                    return Err(mismatch(&self.name, &self.parameter_types, args));
                }
                Ok(f(target))
            }
            MethodBody::Mutate(f) => f(target, args),
        }
    }

    /// Calls a read-only method on `target`.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::InvocationFailed`] for methods that modify the target.
    pub fn query(&self, target: &T) -> Result<Option<ConfigValue>> {
        match &self.body {
            MethodBody::Query(f) => Ok(f(target)),
            MethodBody::Mutate(_) => Err(ConfigError::invocation(
                &self.name,
                "method modifies its target and cannot be queried",
            )),
        }
    }
}

impl<T> fmt::Debug for Method<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("parameter_types", &self.parameter_types)
            .field("return_type", &self.return_type)
            .finish()
    }
}

fn convert<A: FromValue>(method: &str, value: &ConfigValue, args: &[ConfigValue]) -> Result<A> {
    A::from_value(value).ok_or_else(|| mismatch(method, &[A::param_type()], args))
}

fn mismatch(method: &str, expected: &[ParamType], args: &[ConfigValue]) -> ConfigError {
    let actual: Vec<String> = args.iter().map(ConfigValue::type_name).collect();
    ConfigError::ArgumentMismatch {
        method: method.to_string(),
        expected: signature(expected),
        actual: format!("({})", actual.join(", ")),
    }
}
