//! Builder for error responses

use crate::errors::{ResponderError, ResponderResult};
use crate::http::{prepend_status_code, ApiResponse, ResponseFactory};
use crate::translation::Translator;
use axum::http::{HeaderMap, StatusCode};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Default status of error responses
pub const DEFAULT_ERROR_STATUS: u16 = 500;

/// Assembles `{"success": false, "error": {"code": ..., "message": ...}}`
/// bodies. Without an explicit message the translator is asked for
/// `errors.<code>`.
#[derive(Clone)]
pub struct ErrorResponseBuilder {
    response_factory: Arc<dyn ResponseFactory>,
    translator: Arc<dyn Translator>,
    error_code: Option<String>,
    message: Option<String>,
    parameters: BTreeMap<String, String>,
    data: Map<String, Value>,
    include_status_code: bool,
}

impl ErrorResponseBuilder {
    pub fn new(response_factory: Arc<dyn ResponseFactory>, translator: Arc<dyn Translator>) -> Self {
        Self {
            response_factory,
            translator,
            error_code: None,
            message: None,
            parameters: BTreeMap::new(),
            data: Map::new(),
            include_status_code: false,
        }
    }

    /// Set the error code and, optionally, a message overriding the translation
    pub fn set_error(mut self, code: impl Into<String>, message: Option<String>) -> Self {
        self.error_code = Some(code.into());
        self.message = message;
        self
    }

    /// Placeholder values for the translated message
    pub fn with_parameters(mut self, parameters: BTreeMap<String, String>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    pub fn add_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Extra fields placed inside the `error` object
    pub fn add_data(mut self, data: Map<String, Value>) -> Self {
        self.data.extend(data);
        self
    }

    pub fn set_include_status_code(mut self, include_status_code: bool) -> Self {
        self.include_status_code = include_status_code;
        self
    }

    pub fn include_status_code(&self) -> bool {
        self.include_status_code
    }

    pub fn error_code(&self) -> Option<&str> {
        self.error_code.as_deref()
    }

    /// The explicit message, or the translation of the error code
    pub fn resolve_message(&self) -> Option<String> {
        self.message.clone().or_else(|| {
            let code = self.error_code.as_ref()?;
            self.translator
                .translate(&format!("errors.{}", code), &self.parameters)
        })
    }

    /// Response body for the given status
    pub fn to_value(&self, status: u16) -> ResponderResult<Value> {
        validate_status(status)?;

        let mut error = Map::new();
        error.insert(
            "code".to_string(),
            self.error_code.clone().map(Value::String).unwrap_or(Value::Null),
        );
        error.insert(
            "message".to_string(),
            self.resolve_message().map(Value::String).unwrap_or(Value::Null),
        );
        error.extend(self.data.clone());

        let mut body = Map::new();
        body.insert("success".to_string(), Value::Bool(false));
        body.insert("error".to_string(), Value::Object(error));
        let body = Value::Object(body);

        Ok(if self.include_status_code {
            prepend_status_code(body, status)
        } else {
            body
        })
    }

    pub fn respond(&self, status: u16) -> ResponderResult<ApiResponse> {
        self.respond_with_headers(status, HeaderMap::new())
    }

    pub fn respond_with_headers(&self, status: u16, headers: HeaderMap) -> ResponderResult<ApiResponse> {
        let body = self.to_value(status)?;
        let status = StatusCode::from_u16(status)
            .map_err(|_| ResponderError::InvalidErrorStatus { status })?;
        Ok(self.response_factory.json(body, status, headers))
    }
}

impl fmt::Debug for ErrorResponseBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorResponseBuilder")
            .field("error_code", &self.error_code)
            .field("message", &self.message)
            .field("parameters", &self.parameters)
            .field("data", &self.data)
            .field("include_status_code", &self.include_status_code)
            .field("locale", &self.translator.locale())
            .finish()
    }
}

fn validate_status(status: u16) -> ResponderResult<()> {
    if (400..600).contains(&status) {
        Ok(())
    } else {
        Err(ResponderError::InvalidErrorStatus { status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::JsonResponseFactory;
    use crate::translation::LangTranslator;
    use serde_json::json;

    fn builder() -> ErrorResponseBuilder {
        let mut translator = LangTranslator::with_defaults("en", "en").unwrap();
        translator
            .add_lines("en", "errors", "post_locked: 'Post :id is locked.'")
            .unwrap();
        ErrorResponseBuilder::new(Arc::new(JsonResponseFactory), Arc::new(translator))
    }

    #[test]
    fn test_translated_message() {
        let body = builder()
            .set_error("resource_not_found", None)
            .set_include_status_code(true)
            .to_value(404)
            .unwrap();

        assert_eq!(
            body,
            json!({
                "status": 404,
                "success": false,
                "error": {
                    "code": "resource_not_found",
                    "message": "The requested resource does not exist."
                }
            })
        );
    }

    #[test]
    fn test_explicit_message_wins() {
        let body = builder()
            .set_error("resource_not_found", Some("Gone fishing".to_string()))
            .to_value(404)
            .unwrap();
        assert_eq!(body["error"]["message"], json!("Gone fishing"));
        assert!(body.get("status").is_none());
    }

    #[test]
    fn test_parameters_and_data() {
        let body = builder()
            .set_error("post_locked", None)
            .add_parameter("id", "7")
            .add_data(serde_json::from_value(json!({"locked_until": "tomorrow"})).unwrap())
            .to_value(423)
            .unwrap();

        assert_eq!(
            body["error"],
            json!({"code": "post_locked", "message": "Post 7 is locked.", "locked_until": "tomorrow"})
        );
    }

    #[test]
    fn test_unknown_code_has_null_message() {
        let body = builder().set_error("teapot", None).to_value(418).unwrap();
        assert_eq!(body["error"]["message"], Value::Null);

        let body = builder().to_value(DEFAULT_ERROR_STATUS).unwrap();
        assert_eq!(body["error"]["code"], Value::Null);
    }

    #[test]
    fn test_invalid_status_codes() {
        for status in [200, 302, 399, 600] {
            assert!(matches!(
                builder().respond(status),
                Err(ResponderError::InvalidErrorStatus { .. })
            ));
        }
    }

    #[test]
    fn test_respond() {
        let response = builder().set_error("unauthorized", None).respond(403).unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(response.body()["success"], json!(false));
    }
}
