//! Integration tests for bluemvc-twig-core against an in-test engine.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::SystemTime;

use serde_json::{Value, json};

use bluemvc_twig_core::application::TemplateError;
use bluemvc_twig_core::prelude::*;

#[derive(Default)]
struct RecordingLoader {
    paths: Mutex<Option<Vec<PathBuf>>>,
    writes: AtomicUsize,
}

impl TemplateLoader for RecordingLoader {
    fn paths(&self) -> Vec<PathBuf> {
        self.paths.lock().unwrap().clone().unwrap_or_default()
    }

    fn is_configured(&self) -> bool {
        self.paths.lock().unwrap().is_some()
    }

    fn set_paths(&self, paths: Vec<PathBuf>) -> ViewResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        *self.paths.lock().unwrap() = Some(paths);
        Ok(())
    }

    fn add_path(&self, path: PathBuf) -> ViewResult<()> {
        self.paths.lock().unwrap().get_or_insert_with(Vec::new).push(path);
        Ok(())
    }

    fn prepend_path(&self, path: PathBuf) -> ViewResult<()> {
        self.paths.lock().unwrap().get_or_insert_with(Vec::new).insert(0, path);
        Ok(())
    }

    fn revision(&self) -> u64 {
        0
    }

    fn resolve(&self, name: &str) -> ViewResult<PathBuf> {
        Err(TemplateError::not_found(name).into())
    }

    fn exists(&self, _name: &str) -> bool {
        true
    }

    fn load_source(&self, name: &str) -> ViewResult<String> {
        Ok(name.to_string())
    }

    fn is_fresh(&self, _name: &str, _time: SystemTime) -> bool {
        true
    }

    fn list_templates(&self, _extension: &ViewFileExtension) -> ViewResult<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Renders the bindings as JSON so tests can inspect them.
#[derive(Default)]
struct JsonEngine {
    cache: Mutex<Option<CacheLocation>>,
    strict: Mutex<bool>,
    debug: Mutex<bool>,
    extensions: Mutex<Vec<String>>,
}

impl TemplateEngine for JsonEngine {
    fn render(&self, name: &str, bindings: &Bindings) -> ViewResult<String> {
        if name == "missing.twig" {
            return Err(TemplateError::not_found(name).into());
        }
        Ok(serde_json::to_string(bindings).unwrap())
    }

    fn cache(&self) -> CacheLocation {
        self.cache.lock().unwrap().clone().unwrap_or_default()
    }

    fn is_cache_configured(&self) -> bool {
        self.cache.lock().unwrap().is_some()
    }

    fn set_cache(&self, cache: CacheLocation) -> ViewResult<()> {
        *self.cache.lock().unwrap() = Some(cache);
        Ok(())
    }

    fn is_strict_variables(&self) -> bool {
        *self.strict.lock().unwrap()
    }

    fn set_strict_variables(&self, enabled: bool) -> ViewResult<()> {
        *self.strict.lock().unwrap() = enabled;
        Ok(())
    }

    fn is_debug(&self) -> bool {
        *self.debug.lock().unwrap()
    }

    fn set_debug(&self, enabled: bool) -> ViewResult<()> {
        *self.debug.lock().unwrap() = enabled;
        Ok(())
    }

    fn add_extension(&self, extension: Arc<dyn Extension>) -> ViewResult<()> {
        self.extensions.lock().unwrap().push(extension.name().to_string());
        Ok(())
    }

    fn extensions(&self) -> Vec<String> {
        self.extensions.lock().unwrap().clone()
    }

    fn add_filter(&self, _filter: Arc<dyn TemplateFilter>) -> ViewResult<()> {
        Ok(())
    }

    fn add_function(&self, _function: Arc<dyn TemplateFunction>) -> ViewResult<()> {
        Ok(())
    }
}

struct App;

impl Application for App {
    fn view_paths(&self) -> Vec<PathBuf> {
        vec![PathBuf::from("views"), PathBuf::from("alternate")]
    }

    fn temp_path(&self) -> PathBuf {
        PathBuf::from("tmp")
    }
}

struct Req;

impl Request for Req {
    fn url(&self) -> &str {
        "http://localhost/foo"
    }
}

fn renderer() -> (ViewRenderService, Arc<JsonEngine>, Arc<RecordingLoader>) {
    let engine = Arc::new(JsonEngine::default());
    let loader = Arc::new(RecordingLoader::default());
    let service = ViewRenderService::new(
        ViewFileExtension::default(),
        engine.clone(),
        loader.clone(),
    );
    (service, engine, loader)
}

fn render(service: &ViewRenderService) -> ViewResult<Value> {
    let out = service.render_view(&App, &Req, &ViewFile::new("basic.twig")?, None, None)?;
    Ok(serde_json::from_str(&out).unwrap())
}

#[test]
fn defaults_applied_after_first_render() {
    let (service, engine, loader) = renderer();

    render(&service).unwrap();

    assert_eq!(
        loader.paths(),
        vec![PathBuf::from("views"), PathBuf::from("alternate")]
    );
    assert_eq!(
        engine.cache(),
        CacheLocation::for_temp_path(PathBuf::from("tmp").as_path())
    );
}

#[test]
fn defaults_are_written_once_across_renders() {
    let (service, _, loader) = renderer();

    for _ in 0..3 {
        render(&service).unwrap();
    }

    assert_eq!(loader.writes.load(Ordering::SeqCst), 1);
}

#[test]
fn explicit_empty_paths_are_preserved() {
    let (service, _, loader) = renderer();
    loader.set_paths(Vec::new()).unwrap();

    render(&service).unwrap();

    assert!(loader.paths().is_empty());
}

#[test]
fn explicitly_disabled_cache_is_preserved() {
    let (service, engine, _) = renderer();
    engine.set_cache(CacheLocation::Disabled).unwrap();

    render(&service).unwrap();

    assert!(engine.cache().is_disabled());
}

#[test]
fn handle_mutations_are_visible_to_renderer() {
    let (service, _, _) = renderer();
    service
        .loader()
        .add_path(PathBuf::from("custom"))
        .unwrap();
    service.engine().set_strict_variables(true).unwrap();

    render(&service).unwrap();

    assert_eq!(service.loader().paths(), vec![PathBuf::from("custom")]);
    assert!(service.engine().is_strict_variables());
}

#[test]
fn rendered_bindings_are_exactly_four() {
    let (service, _, _) = renderer();

    let bindings = render(&service).unwrap();
    let names: Vec<_> = bindings.as_object().unwrap().keys().cloned().collect();

    assert_eq!(names, ["Model", "ViewItems", "Request", "Application"]);
    assert_eq!(bindings["Model"], json!({}));
    assert_eq!(bindings["ViewItems"], json!({}));
    assert_eq!(bindings["Request"]["Url"], json!("http://localhost/foo"));
    assert_eq!(bindings["Application"]["ViewPath"], json!("views"));
}

#[test]
fn missing_template_error_reaches_caller() {
    let (service, _, _) = renderer();

    let err = service
        .render_view(&App, &Req, &ViewFile::new("missing.twig").unwrap(), None, None)
        .unwrap_err();

    assert!(err.is_template_not_found());
}

#[test]
fn concurrent_first_use_writes_defaults_once() {
    let (service, _, loader) = renderer();
    let service = Arc::new(service);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            thread::spawn(move || render(&service).unwrap())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(loader.writes.load(Ordering::SeqCst), 1);
}
