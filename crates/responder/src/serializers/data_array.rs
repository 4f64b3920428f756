use super::Serializer;
use serde_json::{Map, Value};

/// Everything, relations included, is wrapped in `{"data": ...}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataArraySerializer;

impl DataArraySerializer {
    fn wrap(data: Value) -> Value {
        let mut body = Map::new();
        body.insert("data".to_string(), data);
        Value::Object(body)
    }
}

impl Serializer for DataArraySerializer {
    fn name(&self) -> &'static str {
        "data_array"
    }

    fn item(&self, _resource_key: Option<&str>, data: Value) -> Value {
        Self::wrap(data)
    }

    fn collection(&self, _resource_key: Option<&str>, data: Vec<Value>) -> Value {
        Self::wrap(Value::Array(data))
    }

    fn null(&self) -> Value {
        Self::wrap(Value::Null)
    }

    fn meta(&self, meta: &Map<String, Value>) -> Map<String, Value> {
        let mut fields = Map::new();
        if !meta.is_empty() {
            fields.insert("meta".to_string(), Value::Object(meta.clone()));
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wraps_everything_in_data() {
        let serializer = DataArraySerializer;
        assert_eq!(serializer.item(None, json!({"id": 1})), json!({"data": {"id": 1}}));
        assert_eq!(serializer.collection(None, vec![json!(1)]), json!({"data": [1]}));
        assert_eq!(serializer.null(), json!({"data": null}));
        assert_eq!(serializer.include_item(json!(3)), json!({"data": 3}));
    }
}
