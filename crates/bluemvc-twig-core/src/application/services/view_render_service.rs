//! View Render Service - the configure-and-render handshake.
//!
//! On every render:
//! 1. Fill in the loader's search paths from the application, if never set
//! 2. Fill in the engine's cache location from the application temp path,
//!    if never set
//! 3. Render the view with exactly four bindings: `Model`, `ViewItems`,
//!    `Request`, `Application`
//!
//! Steps 1 and 2 only ever write a default; anything the caller configured
//! beforehand through the engine or loader handles is left alone.

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::{debug, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{Application, Request, TemplateEngine, TemplateLoader, ViewRenderer},
    },
    domain::{Bindings, CacheLocation, Model, ViewFile, ViewFileExtension, ViewItemCollection},
    error::ViewResult,
};

/// Engine-agnostic [`ViewRenderer`].
///
/// Owns shared handles to one engine and one loader for its whole lifetime.
pub struct ViewRenderService {
    extension: ViewFileExtension,
    engine: Arc<dyn TemplateEngine>,
    loader: Arc<dyn TemplateLoader>,
    // Serialises the check-then-set of the lazy defaults.
    defaults_guard: Mutex<()>,
}

impl ViewRenderService {
    /// Create a renderer over an engine and the loader that engine reads from.
    pub fn new(
        extension: ViewFileExtension,
        engine: Arc<dyn TemplateEngine>,
        loader: Arc<dyn TemplateLoader>,
    ) -> Self {
        Self {
            extension,
            engine,
            loader,
            defaults_guard: Mutex::new(()),
        }
    }

    /// Live engine handle.
    pub fn engine(&self) -> &Arc<dyn TemplateEngine> {
        &self.engine
    }

    /// Live loader handle.
    pub fn loader(&self) -> &Arc<dyn TemplateLoader> {
        &self.loader
    }

    /// Apply the application's defaults to whatever is still unset.
    #[instrument(skip_all)]
    fn apply_defaults(&self, application: &dyn Application) -> ViewResult<()> {
        let _guard = self
            .defaults_guard
            .lock()
            .map_err(|_| ApplicationError::LockPoisoned {
                resource: "view renderer defaults",
            })?;

        if !self.loader.is_configured() {
            let paths = application.view_paths();
            debug!(count = paths.len(), "Search paths taken from application");
            self.loader.set_paths(paths)?;
        }

        if !self.engine.is_cache_configured() {
            let cache = CacheLocation::for_temp_path(&application.temp_path());
            debug!(%cache, "Cache location taken from application temp path");
            self.engine.set_cache(cache)?;
        }

        Ok(())
    }
}

impl ViewRenderer for ViewRenderService {
    fn view_file_extension(&self) -> &ViewFileExtension {
        &self.extension
    }

    #[instrument(skip_all, fields(view = %view_file))]
    fn render_view(
        &self,
        application: &dyn Application,
        request: &dyn Request,
        view_file: &ViewFile,
        model: Option<&Model>,
        view_items: Option<&ViewItemCollection>,
    ) -> ViewResult<String> {
        self.apply_defaults(application)?;

        let bindings = Bindings::new(
            Model::binding_value(model),
            view_items.map(ViewItemCollection::to_map).unwrap_or_default(),
            request.template_value(),
            application.template_value(),
        );

        self.engine.render(view_file.template_name(), &bindings)
    }
}

impl fmt::Debug for ViewRenderService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewRenderService")
            .field("extension", &self.extension)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use mockall::predicate::eq;
    use serde_json::json;

    use super::*;
    use crate::application::{
        TemplateError,
        ports::{MockTemplateEngine, MockTemplateLoader},
    };
    use crate::error::ViewError;

    struct FakeApplication {
        view_paths: Vec<PathBuf>,
        temp_path: PathBuf,
    }

    impl FakeApplication {
        fn new() -> Self {
            Self {
                view_paths: vec![PathBuf::from("views/"), PathBuf::from("shared")],
                temp_path: PathBuf::from("tmp"),
            }
        }
    }

    impl Application for FakeApplication {
        fn view_paths(&self) -> Vec<PathBuf> {
            self.view_paths.clone()
        }

        fn temp_path(&self) -> PathBuf {
            self.temp_path.clone()
        }
    }

    struct FakeRequest;

    impl Request for FakeRequest {
        fn url(&self) -> &str {
            "http://localhost/"
        }
    }

    fn service(engine: MockTemplateEngine, loader: MockTemplateLoader) -> ViewRenderService {
        ViewRenderService::new(
            ViewFileExtension::default(),
            Arc::new(engine),
            Arc::new(loader),
        )
    }

    fn basic() -> ViewFile {
        ViewFile::new("basic.twig").unwrap()
    }

    #[test]
    fn fresh_renderer_populates_paths_and_cache() {
        let mut loader = MockTemplateLoader::new();
        loader.expect_is_configured().times(1).return_const(false);
        loader
            .expect_set_paths()
            .with(eq(vec![PathBuf::from("views/"), PathBuf::from("shared")]))
            .times(1)
            .returning(|_| Ok(()));

        let mut engine = MockTemplateEngine::new();
        engine.expect_is_cache_configured().times(1).return_const(false);
        engine
            .expect_set_cache()
            .with(eq(CacheLocation::for_temp_path(Path::new("tmp"))))
            .times(1)
            .returning(|_| Ok(()));
        engine
            .expect_render()
            .returning(|_, _| Ok("rendered".to_string()));

        let renderer = service(engine, loader);
        let out = renderer
            .render_view(&FakeApplication::new(), &FakeRequest, &basic(), None, None)
            .unwrap();

        assert_eq!(out, "rendered");
    }

    #[test]
    fn configured_paths_are_left_alone() {
        let mut loader = MockTemplateLoader::new();
        loader.expect_is_configured().return_const(true);
        loader.expect_set_paths().never();

        let mut engine = MockTemplateEngine::new();
        engine.expect_is_cache_configured().return_const(false);
        engine.expect_set_cache().times(1).returning(|_| Ok(()));
        engine.expect_render().returning(|_, _| Ok(String::new()));

        let renderer = service(engine, loader);
        renderer
            .render_view(&FakeApplication::new(), &FakeRequest, &basic(), None, None)
            .unwrap();
    }

    #[test]
    fn configured_cache_is_left_alone() {
        let mut loader = MockTemplateLoader::new();
        loader.expect_is_configured().return_const(false);
        loader.expect_set_paths().times(1).returning(|_| Ok(()));

        let mut engine = MockTemplateEngine::new();
        engine.expect_is_cache_configured().return_const(true);
        engine.expect_set_cache().never();
        engine.expect_render().returning(|_, _| Ok(String::new()));

        let renderer = service(engine, loader);
        renderer
            .render_view(&FakeApplication::new(), &FakeRequest, &basic(), None, None)
            .unwrap();
    }

    #[test]
    fn missing_model_and_items_bind_empty_mappings() {
        let mut loader = MockTemplateLoader::new();
        loader.expect_is_configured().return_const(true);

        let mut engine = MockTemplateEngine::new();
        engine.expect_is_cache_configured().return_const(true);
        engine
            .expect_render()
            .withf(|name, bindings| {
                name == "basic.twig"
                    && bindings.model == json!({})
                    && bindings.view_items.is_empty()
                    && bindings.request["Url"] == json!("http://localhost/")
                    && bindings.application["ViewPath"] == json!("views/")
            })
            .times(1)
            .returning(|_, _| Ok(String::new()));

        let renderer = service(engine, loader);
        renderer
            .render_view(&FakeApplication::new(), &FakeRequest, &basic(), None, None)
            .unwrap();
    }

    #[test]
    fn model_and_view_items_are_bound() {
        let mut loader = MockTemplateLoader::new();
        loader.expect_is_configured().return_const(true);

        let mut engine = MockTemplateEngine::new();
        engine.expect_is_cache_configured().return_const(true);
        engine
            .expect_render()
            .withf(|_, bindings| {
                bindings.model == json!({"Header": "The header"})
                    && bindings.view_items.get("Title") == Some(&json!("The title"))
            })
            .times(1)
            .returning(|_, _| Ok(String::new()));

        let renderer = service(engine, loader);
        let model = Model::new(json!({"Header": "The header"}));
        let items = ViewItemCollection::new().with("Title", "The title");
        renderer
            .render_view(
                &FakeApplication::new(),
                &FakeRequest,
                &basic(),
                Some(&model),
                Some(&items),
            )
            .unwrap();
    }

    #[test]
    fn engine_errors_propagate_unchanged() {
        let mut loader = MockTemplateLoader::new();
        loader.expect_is_configured().return_const(true);

        let mut engine = MockTemplateEngine::new();
        engine.expect_is_cache_configured().return_const(true);
        engine
            .expect_render()
            .returning(|name, _| Err(TemplateError::not_found(name).into()));

        let renderer = service(engine, loader);
        let err = renderer
            .render_view(&FakeApplication::new(), &FakeRequest, &basic(), None, None)
            .unwrap_err();

        assert!(matches!(err, ViewError::Template(ref e) if e.name() == Some("basic.twig")));
    }

    #[test]
    fn loader_failure_stops_before_render() {
        let mut loader = MockTemplateLoader::new();
        loader.expect_is_configured().return_const(false);
        loader.expect_set_paths().returning(|_| {
            Err(ApplicationError::LockPoisoned {
                resource: "template loader",
            }
            .into())
        });

        let mut engine = MockTemplateEngine::new();
        engine.expect_render().never();

        let renderer = service(engine, loader);
        let result =
            renderer.render_view(&FakeApplication::new(), &FakeRequest, &basic(), None, None);

        assert!(matches!(result, Err(ViewError::Application(_))));
    }

    #[test]
    fn claims_files_with_its_extension() {
        let renderer = ViewRenderService::new(
            ViewFileExtension::new("html.tpl"),
            Arc::new(MockTemplateEngine::new()),
            Arc::new(MockTemplateLoader::new()),
        );

        assert_eq!(renderer.view_file_extension().as_str(), "html.tpl");
        assert!(renderer.claims(Path::new("index.html.tpl")));
        assert!(!renderer.claims(Path::new("index.twig")));
    }
}
