//! Value specifications.
//!
//! A `ValueSpec` is a deferred computation: a generator function plus the
//! positional and named arguments it is bound to. It is resolved once per
//! generated instance, and every resolution is independent.

use crate::model::ModelId;
use crate::values::FieldValue;
use rand::rngs::StdRng;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Named arguments of a specification, ordered by key for stable display.
pub type NamedArgs = BTreeMap<String, FieldValue>;

/// Generator function bound inside a `ValueSpec`.
pub type GeneratorFn =
    dyn Fn(&mut ValueContext<'_>, &Arguments<'_>) -> Result<FieldValue, ValueError> + Send + Sync;

/// Errors raised while resolving a value specification.
#[derive(Debug, thiserror::Error)]
pub enum ValueError {
    #[error("Missing argument '{0}'")]
    MissingArgument(String),

    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("Generator failed: {0}")]
    Generator(String),
}

/// Per-resolution context handed to generators.
pub struct ValueContext<'a> {
    /// Seeded random number generator of the current run
    pub rng: &'a mut StdRng,
    /// Model whose instance is being generated
    pub model: &'a ModelId,
    /// Index of the instance within the current model run
    pub index: u64,
}

impl<'a> ValueContext<'a> {
    pub fn new(rng: &'a mut StdRng, model: &'a ModelId, index: u64) -> Self {
        Self { rng, model, index }
    }
}

/// Read-only view over the arguments bound to a specification.
pub struct Arguments<'a> {
    positional: &'a [FieldValue],
    named: &'a NamedArgs,
}

impl<'a> Arguments<'a> {
    /// Positional argument at `index`.
    pub fn positional(&self, index: usize) -> Option<&'a FieldValue> {
        self.positional.get(index)
    }

    /// All positional arguments.
    pub fn positionals(&self) -> &'a [FieldValue] {
        self.positional
    }

    /// Named argument by key.
    pub fn named(&self, key: &str) -> Option<&'a FieldValue> {
        self.named.get(key)
    }

    pub fn required(&self, key: &str) -> Result<&'a FieldValue, ValueError> {
        self.named(key)
            .ok_or_else(|| ValueError::MissingArgument(key.to_string()))
    }

    pub fn required_i64(&self, key: &str) -> Result<i64, ValueError> {
        let value = self.required(key)?;
        value.as_i64().ok_or_else(|| invalid(key, "expected an integer", value))
    }

    pub fn optional_i64(&self, key: &str) -> Result<Option<i64>, ValueError> {
        match self.named(key) {
            None | Some(FieldValue::Null) => Ok(None),
            Some(value) => value
                .as_i64()
                .map(Some)
                .ok_or_else(|| invalid(key, "expected an integer", value)),
        }
    }

    pub fn required_f64(&self, key: &str) -> Result<f64, ValueError> {
        let value = self.required(key)?;
        value.as_f64().ok_or_else(|| invalid(key, "expected a number", value))
    }

    pub fn optional_f64(&self, key: &str) -> Result<Option<f64>, ValueError> {
        match self.named(key) {
            None | Some(FieldValue::Null) => Ok(None),
            Some(value) => value
                .as_f64()
                .map(Some)
                .ok_or_else(|| invalid(key, "expected a number", value)),
        }
    }

    pub fn required_str(&self, key: &str) -> Result<&'a str, ValueError> {
        let value = self.required(key)?;
        value.as_str().ok_or_else(|| invalid(key, "expected a string", value))
    }

    pub fn optional_str(&self, key: &str) -> Result<Option<&'a str>, ValueError> {
        match self.named(key) {
            None | Some(FieldValue::Null) => Ok(None),
            Some(value) => value
                .as_str()
                .map(Some)
                .ok_or_else(|| invalid(key, "expected a string", value)),
        }
    }
}

fn invalid(key: &str, reason: &str, value: &FieldValue) -> ValueError {
    ValueError::InvalidArgument {
        name: key.to_string(),
        reason: format!("{reason}, got {value}"),
    }
}

/// A generator bound to its arguments.
///
/// Cloning is cheap: the generator function is shared.
#[derive(Clone)]
pub struct ValueSpec {
    name: String,
    generator: Arc<GeneratorFn>,
    args: Vec<FieldValue>,
    named_args: NamedArgs,
}

impl ValueSpec {
    /// Bind `generator` under a display `name` with no arguments.
    pub fn new<F>(name: impl Into<String>, generator: F) -> Self
    where
        F: Fn(&mut ValueContext<'_>, &Arguments<'_>) -> Result<FieldValue, ValueError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            generator: Arc::new(generator),
            args: Vec::new(),
            named_args: NamedArgs::new(),
        }
    }

    /// A specification that always produces `value`.
    pub fn constant(value: impl Into<FieldValue>) -> Self {
        let value = value.into();
        Self::new("constant", |_, args| {
            Ok(args.positional(0).cloned().unwrap_or(FieldValue::Null))
        })
        .with_arg(value)
    }

    /// Append a positional argument.
    pub fn with_arg(mut self, value: impl Into<FieldValue>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Bind a named argument, replacing any previous value for `key`.
    pub fn with_named_arg(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.named_args.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[FieldValue] {
        &self.args
    }

    pub fn named_args(&self) -> &NamedArgs {
        &self.named_args
    }

    /// Invoke the generator with the bound arguments.
    pub fn resolve(&self, ctx: &mut ValueContext<'_>) -> Result<FieldValue, ValueError> {
        let arguments = Arguments {
            positional: &self.args,
            named: &self.named_args,
        };
        (self.generator)(ctx, &arguments)
    }
}

impl fmt::Display for ValueSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        let mut first = true;
        for arg in &self.args {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
            first = false;
        }
        for (key, value) in &self.named_args {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{key}={value}")?;
            first = false;
        }
        f.write_str(")")
    }
}

impl fmt::Debug for ValueSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueSpec")
            .field("name", &self.name)
            .field("args", &self.args)
            .field("named_args", &self.named_args)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn context<'a>(rng: &'a mut StdRng, model: &'a ModelId) -> ValueContext<'a> {
        ValueContext::new(rng, model, 0)
    }

    #[test]
    fn test_resolve_passes_bound_arguments() {
        let spec = ValueSpec::new("join", |_, args| {
            let sep = args.required_str("sep")?;
            let parts: Vec<String> = args
                .positionals()
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect();
            Ok(FieldValue::String(parts.join(sep)))
        })
        .with_arg("a")
        .with_arg("b")
        .with_named_arg("sep", "-");

        let mut rng = StdRng::seed_from_u64(1);
        let model = ModelId::from("users");
        let value = spec.resolve(&mut context(&mut rng, &model)).unwrap();
        assert_eq!(value, FieldValue::from("a-b"));
    }

    #[test]
    fn test_each_resolution_is_independent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let spec = ValueSpec::new("random", move |ctx, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(FieldValue::Int64(ctx.rng.gen_range(0..1_000_000)))
        });

        let mut rng = StdRng::seed_from_u64(9);
        let model = ModelId::from("users");
        let first = spec.resolve(&mut context(&mut rng, &model)).unwrap();
        let second = spec.resolve(&mut context(&mut rng, &model)).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_ne!(first, second);
    }

    #[test]
    fn test_missing_and_invalid_arguments() {
        let spec = ValueSpec::new("range", |_, args| {
            let min = args.required_i64("min")?;
            Ok(FieldValue::Int64(min))
        });
        let mut rng = StdRng::seed_from_u64(1);
        let model = ModelId::from("users");

        let err = spec.resolve(&mut context(&mut rng, &model)).unwrap_err();
        assert!(matches!(err, ValueError::MissingArgument(ref k) if k == "min"));

        let spec = spec.with_named_arg("min", "zero");
        let err = spec.resolve(&mut context(&mut rng, &model)).unwrap_err();
        assert!(matches!(err, ValueError::InvalidArgument { ref name, .. } if name == "min"));
    }

    #[test]
    fn test_constant() {
        let spec = ValueSpec::constant(5);
        let mut rng = StdRng::seed_from_u64(1);
        let model = ModelId::from("users");
        assert_eq!(
            spec.resolve(&mut context(&mut rng, &model)).unwrap(),
            FieldValue::Int32(5)
        );
    }

    #[test]
    fn test_display() {
        let spec = ValueSpec::new("sentence", |_, _| Ok(FieldValue::Null))
            .with_arg(3)
            .with_named_arg("max", 8)
            .with_named_arg("min", 2);
        assert_eq!(spec.to_string(), "sentence(3, max=8, min=2)");

        let bare = ValueSpec::new("uuid_v4", |_, _| Ok(FieldValue::Null));
        assert_eq!(bare.to_string(), "uuid_v4()");
    }
}
