use serde::Serialize;
use serde_json::{Map, Value};

/// The top-level names every rendered template sees, and nothing else.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bindings {
    #[serde(rename = "Model")]
    pub model: Value,
    #[serde(rename = "ViewItems")]
    pub view_items: Map<String, Value>,
    #[serde(rename = "Request")]
    pub request: Value,
    #[serde(rename = "Application")]
    pub application: Value,
}

impl Bindings {
    /// Binding names in the order they are exposed.
    pub const NAMES: [&'static str; 4] = ["Model", "ViewItems", "Request", "Application"];

    pub fn new(
        model: Value,
        view_items: Map<String, Value>,
        request: Value,
        application: Value,
    ) -> Self {
        Self {
            model,
            view_items,
            request,
            application,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_binding_names() {
        let bindings = Bindings::new(json!({}), Map::new(), json!({"Url": "/"}), json!(null));
        let value = serde_json::to_value(&bindings).unwrap();

        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, Bindings::NAMES.map(String::from).to_vec());
    }
}
