use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Template filter extension point: `{{ value|name(args...) }}`.
pub trait TemplateFilter: Send + Sync {
    fn name(&self) -> &str;
    fn apply(&self, value: &Value, args: &[Value]) -> Result<Value, String>;
}

/// Template function extension point: `{{ name(args...) }}`.
pub trait TemplateFunction: Send + Sync {
    fn name(&self) -> &str;
    fn call(&self, args: &[Value]) -> Result<Value, String>;
}

/// A named bundle of filters and functions registered on an engine at once.
pub trait Extension: Send + Sync {
    /// Unique name; an engine accepts each name once.
    fn name(&self) -> &str;

    fn filters(&self) -> Vec<Arc<dyn TemplateFilter>> {
        Vec::new()
    }

    fn functions(&self) -> Vec<Arc<dyn TemplateFunction>> {
        Vec::new()
    }
}

/// [`TemplateFilter`] backed by a closure.
pub struct FnFilter<F> {
    name: String,
    f: F,
}

impl<F> FnFilter<F>
where
    F: Fn(&Value, &[Value]) -> Result<Value, String> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> TemplateFilter for FnFilter<F>
where
    F: Fn(&Value, &[Value]) -> Result<Value, String> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, value: &Value, args: &[Value]) -> Result<Value, String> {
        (self.f)(value, args)
    }
}

impl<F> fmt::Debug for FnFilter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFilter").field("name", &self.name).finish()
    }
}

/// [`TemplateFunction`] backed by a closure.
pub struct FnFunction<F> {
    name: String,
    f: F,
}

impl<F> FnFunction<F>
where
    F: Fn(&[Value]) -> Result<Value, String> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> TemplateFunction for FnFunction<F>
where
    F: Fn(&[Value]) -> Result<Value, String> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, args: &[Value]) -> Result<Value, String> {
        (self.f)(args)
    }
}

impl<F> fmt::Debug for FnFunction<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFunction").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Shout;

    impl Extension for Shout {
        fn name(&self) -> &str {
            "shout"
        }

        fn filters(&self) -> Vec<Arc<dyn TemplateFilter>> {
            vec![Arc::new(FnFilter::new("shout", |value: &Value, _: &[Value]| {
                value
                    .as_str()
                    .map(|s| Value::String(s.to_uppercase()))
                    .ok_or_else(|| "shout expects a string".to_string())
            }))]
        }
    }

    #[test]
    fn closure_filter_applies() {
        let filters = Shout.filters();

        assert_eq!(filters[0].name(), "shout");
        assert_eq!(filters[0].apply(&json!("hi"), &[]).unwrap(), json!("HI"));
        assert!(filters[0].apply(&json!(1), &[]).is_err());
    }

    #[test]
    fn extension_defaults_have_no_functions() {
        assert!(Shout.functions().is_empty());
    }

    #[test]
    fn closure_function_receives_args() {
        let sum = FnFunction::new("sum", |args: &[Value]| {
            Ok(json!(args.iter().filter_map(Value::as_i64).sum::<i64>()))
        });

        assert_eq!(sum.call(&[json!(1), json!(2)]).unwrap(), json!(3));
    }
}
