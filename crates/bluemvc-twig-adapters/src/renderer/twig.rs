//! Twig-style view renderer: a [`ViewRenderService`] wired to a
//! [`JinjaEnvironment`] and a [`FilesystemLoader`].

use std::sync::Arc;

use bluemvc_twig_core::{
    application::{
        ViewRenderService,
        ports::{Application, Extension, Request, TemplateEngine, ViewRenderer},
    },
    domain::{Model, ViewFile, ViewFileExtension, ViewItemCollection},
    error::ViewResult,
};

use crate::{environment::JinjaEnvironment, loader::FilesystemLoader};

/// View renderer for `.twig` files (or any other extension given to
/// [`TwigViewRenderer::new`]).
///
/// Search paths and the cache directory are taken from the application on
/// the first render unless set beforehand through [`Self::twig_loader`] or
/// [`Self::twig_environment`].
#[derive(Debug)]
pub struct TwigViewRenderer {
    service: ViewRenderService,
    environment: Arc<JinjaEnvironment>,
    loader: Arc<FilesystemLoader>,
}

impl TwigViewRenderer {
    pub fn new(extension: impl Into<ViewFileExtension>) -> Self {
        let loader = Arc::new(FilesystemLoader::new());
        let environment = Arc::new(JinjaEnvironment::new(loader.clone()));
        let service = ViewRenderService::new(extension.into(), environment.clone(), loader.clone());

        Self {
            service,
            environment,
            loader,
        }
    }

    /// The engine this renderer renders with. Changes made through it are
    /// used by the next render.
    pub fn twig_environment(&self) -> &Arc<JinjaEnvironment> {
        &self.environment
    }

    /// The loader the engine reads templates through.
    pub fn twig_loader(&self) -> &Arc<FilesystemLoader> {
        &self.loader
    }

    pub fn add_extension(&self, extension: impl Extension + 'static) -> ViewResult<&Self> {
        self.environment.add_extension(Arc::new(extension))?;
        Ok(self)
    }

    pub fn set_strict_variables(&self, enabled: bool) -> ViewResult<&Self> {
        self.environment.set_strict_variables(enabled)?;
        Ok(self)
    }

    pub fn set_debug(&self, enabled: bool) -> ViewResult<&Self> {
        self.environment.set_debug(enabled)?;
        Ok(self)
    }
}

impl Default for TwigViewRenderer {
    fn default() -> Self {
        Self::new(ViewFileExtension::default())
    }
}

impl ViewRenderer for TwigViewRenderer {
    fn view_file_extension(&self) -> &ViewFileExtension {
        self.service.view_file_extension()
    }

    fn render_view(
        &self,
        application: &dyn Application,
        request: &dyn Request,
        view_file: &ViewFile,
        model: Option<&Model>,
        view_items: Option<&ViewItemCollection>,
    ) -> ViewResult<String> {
        self.service
            .render_view(application, request, view_file, model, view_items)
    }
}
