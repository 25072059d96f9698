use serde::Serialize;
use serde_json::{Map, Value};

use super::DomainError;

/// The model passed to a view.
///
/// The renderer never interprets it; any shape serde can represent is
/// accepted and handed to the template unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model(Value);

impl Model {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    /// Build a model from any serializable value.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, DomainError> {
        serde_json::to_value(value)
            .map(Self)
            .map_err(|e| DomainError::InvalidModel(e.to_string()))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Value bound as `Model`: the model itself, or an empty mapping when
    /// there is no model or it is null.
    pub fn binding_value(model: Option<&Model>) -> Value {
        match model {
            Some(Model(Value::Null)) | None => Value::Object(Map::new()),
            Some(Model(value)) => value.clone(),
        }
    }
}

impl From<Value> for Model {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<&str> for Model {
    fn from(value: &str) -> Self {
        Self(Value::String(value.to_owned()))
    }
}

impl From<String> for Model {
    fn from(value: String) -> Self {
        Self(Value::String(value))
    }
}

/// Named items set by a controller next to the model.
///
/// Keys are unique; setting an existing key replaces its value in place so
/// insertion order is kept.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewItemCollection {
    items: Map<String, Value>,
}

impl ViewItemCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an item, replacing any previous value under `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.items.insert(key.into(), value.into());
        self
    }

    /// Builder-style [`Self::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.items.get(key)
    }

    /// Remove an item; the remaining items keep their order.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.items.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Flatten into a plain key -> value mapping, keeping insertion order.
    pub fn to_map(&self) -> Map<String, Value> {
        self.items.clone()
    }
}

impl<K, V> FromIterator<(K, V)> for ViewItemCollection
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut collection = Self::new();
        for (key, value) in iter {
            collection.set(key, value);
        }
        collection
    }
}
