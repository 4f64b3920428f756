use super::Serializer;
use serde_json::{Map, Value};

/// Items are returned as-is, collections under their resource key
/// (`data` when none is set) and meta under `meta`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArraySerializer;

impl Serializer for ArraySerializer {
    fn name(&self) -> &'static str {
        "array"
    }

    fn item(&self, _resource_key: Option<&str>, data: Value) -> Value {
        data
    }

    fn collection(&self, resource_key: Option<&str>, data: Vec<Value>) -> Value {
        let mut body = Map::new();
        body.insert(
            resource_key.unwrap_or("data").to_string(),
            Value::Array(data),
        );
        Value::Object(body)
    }

    fn null(&self) -> Value {
        Value::Object(Map::new())
    }

    fn meta(&self, meta: &Map<String, Value>) -> Map<String, Value> {
        let mut fields = Map::new();
        if !meta.is_empty() {
            fields.insert("meta".to_string(), Value::Object(meta.clone()));
        }
        fields
    }
}
