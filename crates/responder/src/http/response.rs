//! JSON responses produced by the builders

use crate::errors::ResponderError;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};

/// A finished API response: status, headers and JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

impl ApiResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_body(self) -> Value {
        self.body
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.body) {
            Ok(bytes) => {
                let mut response = Response::new(bytes.into());
                *response.status_mut() = self.status;
                response.headers_mut().extend(self.headers);
                response
                    .headers_mut()
                    .entry(header::CONTENT_TYPE)
                    .or_insert(HeaderValue::from_static("application/json"));
                response
            }
            Err(err) => {
                tracing::error!("JSON serialization failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error: JSON serialization failed",
                )
                    .into_response()
            }
        }
    }
}

impl IntoResponse for ResponderError {
    fn into_response(self) -> Response {
        tracing::error!("Responder error: {}", self);
        let body = json!({
            "success": false,
            "error": {
                "code": "server_error",
                "message": "Internal server error",
            }
        });
        ApiResponse::new(StatusCode::INTERNAL_SERVER_ERROR, HeaderMap::new(), body).into_response()
    }
}

/// Collaborator turning a body and status into a response
pub trait ResponseFactory: Send + Sync {
    fn json(&self, body: Value, status: StatusCode, headers: HeaderMap) -> ApiResponse;
}

/// Default response factory, marks every response as `application/json`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonResponseFactory;

impl ResponseFactory for JsonResponseFactory {
    fn json(&self, body: Value, status: StatusCode, mut headers: HeaderMap) -> ApiResponse {
        headers
            .entry(header::CONTENT_TYPE)
            .or_insert(HeaderValue::from_static("application/json"));
        ApiResponse::new(status, headers, body)
    }
}
