use bluemvc_twig_core::application::ports::Request;

const DEFAULT_ORIGIN: &str = "http://localhost";

/// A [`Request`] built from a URL or a site-relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRequest {
    url: String,
    method: String,
    headers: Vec<(String, String)>,
}

impl SimpleRequest {
    /// `"/foo"` becomes `http://localhost/foo`; absolute URLs are kept.
    pub fn new(path_or_url: impl Into<String>) -> Self {
        let raw = path_or_url.into();
        let url = if raw.contains("://") {
            raw
        } else if raw.starts_with('/') {
            format!("{DEFAULT_ORIGIN}{raw}")
        } else {
            format!("{DEFAULT_ORIGIN}/{raw}")
        };

        Self {
            url,
            method: "GET".to_string(),
            headers: Vec::new(),
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into().to_uppercase();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

impl Default for SimpleRequest {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Request for SimpleRequest {
    fn url(&self) -> &str {
        &self.url
    }

    fn method(&self) -> &str {
        &self.method
    }

    fn headers(&self) -> Vec<(String, String)> {
        self.headers.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_get_localhost_origin() {
        assert_eq!(SimpleRequest::new("/foo").url(), "http://localhost/foo");
        assert_eq!(SimpleRequest::new("bar").url(), "http://localhost/bar");
        assert_eq!(SimpleRequest::default().url(), "http://localhost/");
    }

    #[test]
    fn absolute_urls_are_kept() {
        let request = SimpleRequest::new("https://example.com/a?b=c");

        assert_eq!(request.url(), "https://example.com/a?b=c");
    }

    #[test]
    fn method_and_headers() {
        let request = SimpleRequest::new("/")
            .with_method("post")
            .with_header("Accept", "text/html");

        assert_eq!(request.method(), "POST");
        assert_eq!(request.template_value()["Headers"]["Accept"], "text/html");
    }
}
