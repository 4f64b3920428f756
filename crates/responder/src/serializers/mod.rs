//! Serializers decide the envelope around transformed data.
//!
//! The serializer used by the bindings is named in config
//! (`responder.serializer`) and looked up in a [`SerializerRegistry`].
//! Built-in serializers are listed in [`SerializerKind`]; applications can
//! register their own under extra identifiers.

pub mod api;
pub mod array;
pub mod data_array;

pub use api::ApiSerializer;
pub use array::ArraySerializer;
pub use data_array::DataArraySerializer;

use crate::errors::{ResponderError, ResponderResult};
use crate::resource::Pagination;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Strategy controlling the JSON shape of transformed data
pub trait Serializer: Send + Sync {
    /// Identifier the serializer is registered under
    fn name(&self) -> &'static str;

    /// Envelope for a single transformed value
    fn item(&self, resource_key: Option<&str>, data: Value) -> Value;

    /// Envelope for a list of transformed values
    fn collection(&self, resource_key: Option<&str>, data: Vec<Value>) -> Value;

    /// Envelope for a resource without data
    fn null(&self) -> Value;

    /// Fields merged into the root object for the given meta
    fn meta(&self, meta: &Map<String, Value>) -> Map<String, Value>;

    /// Meta entries describing pagination
    fn paginator(&self, pagination: &Pagination) -> Map<String, Value> {
        let mut meta = Map::new();
        meta.insert(
            "pagination".to_string(),
            serde_json::to_value(pagination).unwrap_or(Value::Null),
        );
        meta
    }

    /// Shape of an embedded single relation
    fn include_item(&self, data: Value) -> Value {
        self.item(None, data)
    }

    /// Shape of an embedded list relation
    fn include_collection(&self, data: Vec<Value>) -> Value {
        self.collection(None, data)
    }

    /// Shape of an embedded empty relation
    fn include_null(&self) -> Value {
        self.null()
    }

    /// Embed the serialized relations into a transformed value
    fn merge_includes(&self, transformed: Value, included: Map<String, Value>) -> Value {
        match transformed {
            Value::Object(mut object) => {
                object.extend(included);
                Value::Object(object)
            }
            other => {
                if !included.is_empty() {
                    tracing::warn!("Dropping includes for a transformed value that is not an object");
                }
                other
            }
        }
    }
}

/// Built-in serializers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SerializerKind {
    Api,
    Array,
    DataArray,
}

impl SerializerKind {
    pub const ALL: [SerializerKind; 3] = [
        SerializerKind::Api,
        SerializerKind::Array,
        SerializerKind::DataArray,
    ];

    /// Canonical identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            SerializerKind::Api => "api",
            SerializerKind::Array => "array",
            SerializerKind::DataArray => "data_array",
        }
    }

    /// Identifiers accepted in config for this serializer
    pub fn identifiers(&self) -> &'static [&'static str] {
        match self {
            SerializerKind::Api => &["api", "apiserializer"],
            SerializerKind::Array => &["array", "arrayserializer"],
            SerializerKind::DataArray => &["data_array", "dataarray", "dataarrayserializer"],
        }
    }

    pub fn create(&self) -> Arc<dyn Serializer> {
        match self {
            SerializerKind::Api => Arc::new(ApiSerializer),
            SerializerKind::Array => Arc::new(ArraySerializer),
            SerializerKind::DataArray => Arc::new(DataArraySerializer),
        }
    }

    fn constructor(&self) -> SerializerConstructor {
        match self {
            SerializerKind::Api => || SerializerKind::Api.create(),
            SerializerKind::Array => || SerializerKind::Array.create(),
            SerializerKind::DataArray => || SerializerKind::DataArray.create(),
        }
    }
}

impl FromStr for SerializerKind {
    type Err = ResponderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        SerializerKind::ALL
            .into_iter()
            .find(|kind| kind.identifiers().contains(&wanted.as_str()))
            .ok_or_else(|| {
                let available: Vec<String> = SerializerKind::ALL
                    .iter()
                    .map(|kind| kind.as_str().to_string())
                    .collect();
                ResponderError::unknown_serializer(s, &available)
            })
    }
}

impl fmt::Display for SerializerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Constructor stored in the registry
pub type SerializerConstructor = fn() -> Arc<dyn Serializer>;

/// Maps config identifiers to serializer constructors
#[derive(Clone)]
pub struct SerializerRegistry {
    constructors: BTreeMap<String, SerializerConstructor>,
}

impl SerializerRegistry {
    /// A registry without any serializer
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// A registry holding the built-in serializers
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        for kind in SerializerKind::ALL {
            for identifier in kind.identifiers() {
                registry.register(identifier, kind.constructor());
            }
        }
        registry
    }

    /// Register a serializer under an identifier (case-insensitive)
    pub fn register(&mut self, identifier: &str, constructor: SerializerConstructor) {
        self.constructors.insert(normalize(identifier), constructor);
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.constructors.contains_key(&normalize(identifier))
    }

    /// Construct the serializer registered under `identifier`
    pub fn create(&self, identifier: &str) -> ResponderResult<Arc<dyn Serializer>> {
        self.constructors
            .get(&normalize(identifier))
            .map(|constructor| constructor())
            .ok_or_else(|| ResponderError::unknown_serializer(identifier, &self.identifiers()))
    }

    /// Registered identifiers, sorted
    pub fn identifiers(&self) -> Vec<String> {
        self.constructors.keys().cloned().collect()
    }
}

impl Default for SerializerRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for SerializerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializerRegistry")
            .field("identifiers", &self.identifiers())
            .finish()
    }
}

fn normalize(identifier: &str) -> String {
    identifier.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct PlainSerializer;

    impl Serializer for PlainSerializer {
        fn name(&self) -> &'static str {
            "plain"
        }

        fn item(&self, _resource_key: Option<&str>, data: Value) -> Value {
            data
        }

        fn collection(&self, _resource_key: Option<&str>, data: Vec<Value>) -> Value {
            Value::Array(data)
        }

        fn null(&self) -> Value {
            Value::Null
        }

        fn meta(&self, _meta: &Map<String, Value>) -> Map<String, Value> {
            Map::new()
        }
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("api".parse::<SerializerKind>().unwrap(), SerializerKind::Api);
        assert_eq!(
            "DataArraySerializer".parse::<SerializerKind>().unwrap(),
            SerializerKind::DataArray
        );
        assert!("json_api".parse::<SerializerKind>().is_err());
    }

    #[test]
    fn test_registry_creates_builtins() {
        let registry = SerializerRegistry::default();
        assert_eq!(registry.create("api").unwrap().name(), "api");
        assert_eq!(registry.create("ArraySerializer").unwrap().name(), "array");
        assert_eq!(registry.create(" data_array ").unwrap().name(), "data_array");
    }

    #[test]
    fn test_registry_rejects_unknown_identifier() {
        let registry = SerializerRegistry::default();
        match registry.create("App\\Serializers\\Missing") {
            Err(ResponderError::UnknownSerializer { serializer, available }) => {
                assert_eq!(serializer, "App\\Serializers\\Missing");
                assert!(available.contains("api"));
            }
            _ => panic!("expected an unknown serializer error"),
        }
    }

    #[test]
    fn test_custom_serializer_registration() {
        let mut registry = SerializerRegistry::empty();
        assert!(!registry.contains("plain"));

        registry.register("Plain", || -> Arc<dyn Serializer> { Arc::new(PlainSerializer) });
        let serializer = registry.create("plain").unwrap();
        assert_eq!(serializer.item(None, json!({"a": 1})), json!({"a": 1}));
    }

    #[test]
    fn test_default_merge_includes() {
        let mut included = Map::new();
        included.insert("author".into(), json!({"name": "Ada"}));

        let merged = PlainSerializer.merge_includes(json!({"id": 1}), included.clone());
        assert_eq!(merged, json!({"id": 1, "author": {"name": "Ada"}}));

        assert_eq!(PlainSerializer.merge_includes(json!(5), included), json!(5));
    }
}
