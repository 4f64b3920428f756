pub mod error;
pub mod request;
pub mod response;
pub mod success;

pub use error::ErrorResponseBuilder;
pub use request::{relations_from_input, RequestInput, RequestParams, RequestParamsWithBody};
pub use response::{ApiResponse, JsonResponseFactory, ResponseFactory};
pub use success::SuccessResponseBuilder;

use serde_json::{Map, Value};

/// Put `"status": <code>` in front of the other body fields. Bodies that are
/// not objects (a raw scalar or list item from the `array` serializer) are
/// returned unchanged.
pub(crate) fn prepend_status_code(body: Value, status: u16) -> Value {
    match body {
        Value::Object(fields) => {
            let mut with_status = Map::new();
            with_status.insert("status".to_string(), Value::from(status));
            for (key, value) in fields {
                if key != "status" {
                    with_status.insert(key, value);
                }
            }
            Value::Object(with_status)
        }
        other => {
            tracing::warn!(status, "Cannot add a status code to a body that is not an object");
            other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_goes_first() {
        let body = prepend_status_code(json!({"success": true, "data": 1}), 201);
        let keys: Vec<&String> = body.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["status", "success", "data"]);
        assert_eq!(body["status"], json!(201));
    }

    #[test]
    fn test_non_object_bodies_are_untouched() {
        assert_eq!(prepend_status_code(json!([1, 2]), 200), json!([1, 2]));
        assert_eq!(prepend_status_code(json!("hello"), 200), json!("hello"));
    }
}
