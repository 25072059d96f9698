//! Driving (input) port - what the host framework calls.

use std::path::Path;

use crate::{
    application::ports::{Application, Request},
    domain::{Model, ViewFile, ViewFileExtension, ViewItemCollection},
    error::ViewResult,
};

/// A renderer for one kind of view file.
///
/// The host picks the renderer whose extension matches the view file, then
/// calls [`ViewRenderer::render_view`].
pub trait ViewRenderer: Send + Sync {
    /// Extension of the view files this renderer handles.
    fn view_file_extension(&self) -> &ViewFileExtension;

    /// Render `view_file` and return the produced text.
    ///
    /// Rendering either fully succeeds or returns an error; there is no
    /// partial output.
    fn render_view(
        &self,
        application: &dyn Application,
        request: &dyn Request,
        view_file: &ViewFile,
        model: Option<&Model>,
        view_items: Option<&ViewItemCollection>,
    ) -> ViewResult<String>;

    /// `true` if `path` carries this renderer's extension.
    fn claims(&self, path: &Path) -> bool {
        self.view_file_extension().matches(path)
    }
}
