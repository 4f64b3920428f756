use super::Serializer;
use serde_json::{Map, Value};

/// Default serializer: `{"success": true, "data": ...}` with meta and
/// pagination merged into the root, and relations embedded unwrapped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiSerializer;

impl ApiSerializer {
    fn envelope(data: Value) -> Value {
        let mut body = Map::new();
        body.insert("success".to_string(), Value::Bool(true));
        body.insert("data".to_string(), data);
        Value::Object(body)
    }
}

impl Serializer for ApiSerializer {
    fn name(&self) -> &'static str {
        "api"
    }

    fn item(&self, _resource_key: Option<&str>, data: Value) -> Value {
        Self::envelope(data)
    }

    fn collection(&self, _resource_key: Option<&str>, data: Vec<Value>) -> Value {
        Self::envelope(Value::Array(data))
    }

    fn null(&self) -> Value {
        Self::envelope(Value::Null)
    }

    fn meta(&self, meta: &Map<String, Value>) -> Map<String, Value> {
        meta.clone()
    }

    fn include_item(&self, data: Value) -> Value {
        data
    }

    fn include_collection(&self, data: Vec<Value>) -> Value {
        Value::Array(data)
    }

    fn include_null(&self) -> Value {
        Value::Null
    }
}
