//! Host-context ports: what the host framework hands the renderer per call.

use std::path::PathBuf;

use serde_json::{Map, Value, json};

/// The running application as seen by a view renderer.
///
/// Implemented by the host framework. The renderer reads the view paths and
/// temp path once to fill in defaults and otherwise passes the application
/// through to templates as `Application`.
pub trait Application: Send + Sync {
    /// Directories views are looked up in, in priority order.
    fn view_paths(&self) -> Vec<PathBuf>;

    /// A writable directory for temporary and cache files.
    fn temp_path(&self) -> PathBuf;

    /// Value bound to `Application` in templates.
    ///
    /// Exposes `ViewPath` (the first view path, or null), `ViewPaths` and
    /// `TempPath`. Override to expose more.
    fn template_value(&self) -> Value {
        let view_paths: Vec<String> = self
            .view_paths()
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        json!({
            "ViewPath": view_paths.first(),
            "ViewPaths": view_paths,
            "TempPath": self.temp_path().display().to_string(),
        })
    }
}

/// The request being answered.
///
/// The renderer never inspects it; it is bound to `Request` in templates.
pub trait Request: Send + Sync {
    /// Absolute request URL.
    fn url(&self) -> &str;

    fn method(&self) -> &str {
        "GET"
    }

    /// Request headers in arrival order.
    fn headers(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Value bound to `Request` in templates: `Url`, `Method`, `Headers`.
    fn template_value(&self) -> Value {
        let headers: Map<String, Value> = self
            .headers()
            .into_iter()
            .map(|(name, value)| (name, Value::String(value)))
            .collect();
        json!({
            "Url": self.url(),
            "Method": self.method(),
            "Headers": headers,
        })
    }
}
