//! MiniJinja-backed template engine.
//!
//! Templates are pulled through a [`TemplateLoader`] and kept compiled in
//! memory. Before each render the engine asks the loader whether anything it
//! compiled has changed (or whether the search paths moved) and drops its
//! compiled templates if so.

use std::{
    collections::HashMap,
    fmt::{self, Write},
    fs,
    sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::SystemTime,
};

use minijinja::{
    AutoEscape, Environment, Error, ErrorKind, Output, State, UndefinedBehavior, Value,
    escape_formatter, value::Rest,
};
use tracing::{debug, instrument, warn};

use bluemvc_twig_core::{
    application::{
        ApplicationError, TemplateError, TemplateErrorKind,
        ports::{Extension, TemplateEngine, TemplateFilter, TemplateFunction, TemplateLoader},
    },
    domain::{Bindings, CacheLocation},
    error::ViewResult,
};

/// Load time of every template the engine compiled, by name.
type LoadedTemplates = Arc<Mutex<HashMap<String, SystemTime>>>;

/// [`TemplateEngine`] over a MiniJinja [`Environment`].
///
/// Every template is HTML auto-escaped the way Twig escapes it (`&`, `<`,
/// `>`, `"` and `'`); `raw` marks a value as safe.
/// Undefined variables render as empty unless strict variables are on.
/// With debug on, templates get a `dump()` function that pretty-prints its
/// arguments, or all four bindings when called without any.
pub struct JinjaEnvironment {
    loader: Arc<dyn TemplateLoader>,
    inner: RwLock<Inner>,
    loaded: LoadedTemplates,
}

struct Inner {
    env: Environment<'static>,
    cache: Option<CacheLocation>,
    cache_prepared: bool,
    strict: bool,
    debug: bool,
    extensions: Vec<String>,
    revision: u64,
}

impl JinjaEnvironment {
    /// Create an engine reading templates through `loader`.
    pub fn new(loader: Arc<dyn TemplateLoader>) -> Self {
        let loaded = LoadedTemplates::default();

        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Chainable);
        env.set_debug(false);
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.set_formatter(html_formatter);
        env.add_filter("raw", raw);
        env.add_filter("escape", escape);
        env.add_filter("e", escape);
        env.add_function("dump", dump);
        {
            let loader = Arc::clone(&loader);
            let loaded = Arc::clone(&loaded);
            env.set_loader(move |name| load_template(loader.as_ref(), &loaded, name));
        }

        let revision = loader.revision();
        Self {
            loader,
            inner: RwLock::new(Inner {
                env,
                cache: None,
                cache_prepared: false,
                strict: false,
                debug: false,
                extensions: Vec::new(),
                revision,
            }),
            loaded,
        }
    }

    /// The loader templates are read through.
    pub fn loader(&self) -> &Arc<dyn TemplateLoader> {
        &self.loader
    }

    /// Run `f` against the underlying MiniJinja environment.
    ///
    /// Compiled templates are dropped afterwards so changes such as globals
    /// or a new auto-escape callback apply to the next render.
    pub fn configure<F, R>(&self, f: F) -> ViewResult<R>
    where
        F: FnOnce(&mut Environment<'static>) -> R,
    {
        let mut inner = self.write()?;
        let result = f(&mut inner.env);
        inner.env.clear_templates();
        self.forget_loaded();
        Ok(result)
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> ViewResult<RwLockWriteGuard<'_, Inner>> {
        self.inner.write().map_err(|_| {
            ApplicationError::LockPoisoned {
                resource: "template environment",
            }
            .into()
        })
    }

    fn forget_loaded(&self) {
        self.loaded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Drop compiled templates if the loader changed under them.
    fn refresh(&self) -> ViewResult<()> {
        let revision = self.loader.revision();
        let paths_changed = self.read().revision != revision;

        let stale = !paths_changed && {
            let loaded = self.loaded.lock().unwrap_or_else(PoisonError::into_inner);
            loaded
                .iter()
                .any(|(name, loaded_at)| !self.loader.is_fresh(name, *loaded_at))
        };

        if paths_changed || stale {
            debug!(paths_changed, stale, "Reloading templates");
            let mut inner = self.write()?;
            inner.env.clear_templates();
            inner.revision = revision;
            self.forget_loaded();
        }
        Ok(())
    }

    /// Create the cache directory the first time it is needed.
    fn prepare_cache(&self) -> ViewResult<()> {
        {
            let inner = self.read();
            if inner.cache_prepared {
                return Ok(());
            }
        }

        let mut inner = self.write()?;
        if let Some(CacheLocation::Directory(path)) = &inner.cache {
            fs::create_dir_all(path).map_err(|e| {
                TemplateError::new(
                    TemplateErrorKind::Io,
                    format!("Unable to create cache directory {}: {}", path.display(), e),
                )
            })?;
            debug!(path = %path.display(), "Cache directory ready");
        }
        inner.cache_prepared = true;
        Ok(())
    }
}

impl TemplateEngine for JinjaEnvironment {
    #[instrument(skip(self, bindings))]
    fn render(&self, name: &str, bindings: &Bindings) -> ViewResult<String> {
        self.refresh()?;
        self.prepare_cache()?;

        let inner = self.read();
        let template = inner
            .env
            .get_template(name)
            .map_err(|e| template_error(&e, name))?;
        template
            .render(Value::from_serialize(bindings))
            .map_err(|e| {
                let error = template_error(&e, name);
                warn!(error = %error, "Render failed");
                error.into()
            })
    }

    fn cache(&self) -> CacheLocation {
        self.read().cache.clone().unwrap_or_default()
    }

    fn is_cache_configured(&self) -> bool {
        self.read().cache.is_some()
    }

    fn set_cache(&self, cache: CacheLocation) -> ViewResult<()> {
        let mut inner = self.write()?;
        inner.cache = Some(cache);
        inner.cache_prepared = false;
        Ok(())
    }

    fn is_strict_variables(&self) -> bool {
        self.read().strict
    }

    fn set_strict_variables(&self, enabled: bool) -> ViewResult<()> {
        let mut inner = self.write()?;
        inner.env.set_undefined_behavior(if enabled {
            UndefinedBehavior::Strict
        } else {
            UndefinedBehavior::Chainable
        });
        inner.strict = enabled;
        Ok(())
    }

    fn is_debug(&self) -> bool {
        self.read().debug
    }

    fn set_debug(&self, enabled: bool) -> ViewResult<()> {
        let mut inner = self.write()?;
        inner.env.set_debug(enabled);
        inner.debug = enabled;
        Ok(())
    }

    fn add_extension(&self, extension: Arc<dyn Extension>) -> ViewResult<()> {
        let mut inner = self.write()?;
        let name = extension.name().to_string();
        if inner.extensions.contains(&name) {
            return Err(ApplicationError::ExtensionAlreadyRegistered { name }.into());
        }

        for filter in extension.filters() {
            register_filter(&mut inner.env, filter);
        }
        for function in extension.functions() {
            register_function(&mut inner.env, function);
        }

        debug!(extension = %name, "Extension registered");
        inner.extensions.push(name);
        Ok(())
    }

    fn extensions(&self) -> Vec<String> {
        self.read().extensions.clone()
    }

    fn add_filter(&self, filter: Arc<dyn TemplateFilter>) -> ViewResult<()> {
        register_filter(&mut self.write()?.env, filter);
        Ok(())
    }

    fn add_function(&self, function: Arc<dyn TemplateFunction>) -> ViewResult<()> {
        register_function(&mut self.write()?.env, function);
        Ok(())
    }
}

impl fmt::Debug for JinjaEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.read();
        f.debug_struct("JinjaEnvironment")
            .field("cache", &inner.cache)
            .field("strict", &inner.strict)
            .field("debug", &inner.debug)
            .field("extensions", &inner.extensions)
            .finish_non_exhaustive()
    }
}

fn load_template(
    loader: &dyn TemplateLoader,
    loaded: &Mutex<HashMap<String, SystemTime>>,
    name: &str,
) -> Result<Option<String>, Error> {
    let loaded_at = SystemTime::now();
    match loader.load_source(name) {
        Ok(source) => {
            loaded
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(name.to_string(), loaded_at);
            Ok(Some(source))
        }
        Err(err) => {
            let kind = if err.is_template_not_found() {
                ErrorKind::TemplateNotFound
            } else {
                ErrorKind::InvalidOperation
            };
            let message = match err.as_template_error() {
                Some(template) => template.message().to_string(),
                None => err.to_string(),
            };
            Err(Error::new(kind, message))
        }
    }
}

fn template_error(err: &Error, name: &str) -> TemplateError {
    let kind = match err.kind() {
        ErrorKind::TemplateNotFound => TemplateErrorKind::NotFound,
        ErrorKind::SyntaxError => TemplateErrorKind::Syntax,
        ErrorKind::UndefinedError => TemplateErrorKind::UndefinedVariable,
        _ => TemplateErrorKind::Render,
    };
    let message = err
        .detail()
        .map(str::to_string)
        .unwrap_or_else(|| err.kind().to_string());

    let error = TemplateError::new(kind, message).with_name(err.name().unwrap_or(name));
    match err.line() {
        Some(line) => error.with_line(line),
        None => error,
    }
}

fn to_json(value: &Value) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}

fn register_filter(env: &mut Environment<'static>, filter: Arc<dyn TemplateFilter>) {
    let name = filter.name().to_string();
    env.add_filter(name, move |value: Value, args: Rest<Value>| -> Result<Value, Error> {
        let args: Vec<_> = args.iter().map(to_json).collect();
        filter
            .apply(&to_json(&value), &args)
            .map(Value::from_serialize)
            .map_err(|e| Error::new(ErrorKind::InvalidOperation, e))
    });
}

fn register_function(env: &mut Environment<'static>, function: Arc<dyn TemplateFunction>) {
    let name = function.name().to_string();
    env.add_function(name, move |args: Rest<Value>| -> Result<Value, Error> {
        let args: Vec<_> = args.iter().map(to_json).collect();
        function
            .call(&args)
            .map(Value::from_serialize)
            .map_err(|e| Error::new(ErrorKind::InvalidOperation, e))
    });
}

/// `dump()`: pretty JSON of the arguments, empty unless debug is on.
fn dump(state: &State, args: Rest<Value>) -> Result<Value, Error> {
    if !state.env().debug() {
        return Ok(Value::from(""));
    }

    let value = match args.as_slice() {
        [] => {
            let bindings = Bindings::NAMES
                .iter()
                .filter_map(|name| state.lookup(name).map(|v| (name.to_string(), to_json(&v))))
                .collect();
            serde_json::Value::Object(bindings)
        }
        [single] => to_json(single),
        many => serde_json::Value::Array(many.iter().map(to_json).collect()),
    };

    let pretty = serde_json::to_string_pretty(&value)
        .map_err(|e| Error::new(ErrorKind::InvalidOperation, e.to_string()))?;
    let mut html = String::with_capacity(pretty.len());
    write_html_escaped(&mut html, &pretty, false)?;
    Ok(Value::from_safe_string(html))
}

/// Writes `raw` with the characters PHP's `htmlspecialchars` replaces
/// escaped. Quotes are left alone when `quotes` is false.
fn write_html_escaped(out: &mut impl Write, raw: &str, quotes: bool) -> fmt::Result {
    let mut last = 0;
    for (i, c) in raw.char_indices() {
        let entity = match c {
            '&' => "&amp;",
            '<' => "&lt;",
            '>' => "&gt;",
            '"' if quotes => "&quot;",
            '\'' if quotes => "&#039;",
            _ => continue,
        };
        out.write_str(&raw[last..i])?;
        out.write_str(entity)?;
        last = i + c.len_utf8();
    }
    out.write_str(&raw[last..])
}

fn html_formatter(out: &mut Output<'_>, state: &State<'_, '_>, value: &Value) -> Result<(), Error> {
    let escapes = matches!(state.auto_escape(), AutoEscape::Html)
        && !value.is_safe()
        && !value.is_undefined()
        && !value.is_none();
    if !escapes {
        return escape_formatter(out, state, value);
    }
    write_html_escaped(out, &value.to_string(), true)?;
    Ok(())
}

/// `raw`: print the value without escaping.
fn raw(value: Value) -> Value {
    if value.is_safe() || value.is_undefined() || value.is_none() {
        return value;
    }
    Value::from_safe_string(value.to_string())
}

/// `escape` / `e`: escape now and mark safe so output is not escaped twice.
fn escape(value: Value) -> Result<Value, Error> {
    if value.is_safe() {
        return Ok(value);
    }
    let mut html = String::new();
    if !value.is_undefined() && !value.is_none() {
        write_html_escaped(&mut html, &value.to_string(), true)?;
    }
    Ok(Value::from_safe_string(html))
}
