//! Access to incoming request parameters

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{json, Map, Value};
use std::convert::Infallible;

/// Reads named parameters from the current request
pub trait RequestInput: Send + Sync {
    fn input(&self, key: &str) -> Option<Value>;

    fn has(&self, key: &str) -> bool {
        self.input(key).is_some()
    }
}

/// Query string and JSON body parameters of a request.
///
/// `key[]=a&key[]=b` collects into a list; a repeated plain key keeps the last
/// value, and a plain value followed by `key[]` entries joins the list. Body
/// parameters override query parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParams {
    values: Map<String, Value>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw query string (without the leading `?`)
    pub fn from_query(query: &str) -> Self {
        let pairs: Vec<(String, String)> = match serde_urlencoded::from_str(query) {
            Ok(pairs) => pairs,
            Err(err) => {
                tracing::warn!("Ignoring malformed query string: {}", err);
                Vec::new()
            }
        };

        let mut params = Self::new();
        for (key, value) in pairs {
            match key.strip_suffix("[]") {
                Some(list_key) => {
                    let slot = params
                        .values
                        .entry(list_key.to_string())
                        .or_insert_with(|| Value::Array(Vec::new()));
                    match slot {
                        Value::Array(items) => items.push(Value::String(value)),
                        other => {
                            let previous = std::mem::take(other);
                            *other = Value::Array(vec![previous, Value::String(value)]);
                        }
                    }
                }
                None => {
                    params.values.insert(key, Value::String(value));
                }
            }
        }
        params
    }

    /// Merge the fields of a JSON object body
    pub fn with_json_body(mut self, body: Value) -> Self {
        if let Value::Object(fields) = body {
            self.values.extend(fields);
        }
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.insert(key, value);
        self
    }
}

impl RequestInput for RequestParams {
    fn input(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for RequestParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_query(parts.uri.query().unwrap_or_default()))
    }
}

/// Query string and JSON body parameters, for handlers that receive a body.
///
/// The body is read only when `content-type` is JSON (`application/json` or a
/// `+json` type); its fields override the query string. Use [`RequestParams`]
/// directly when only the query string matters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParamsWithBody(pub RequestParams);

impl RequestParamsWithBody {
    pub fn into_inner(self) -> RequestParams {
        self.0
    }
}

impl RequestInput for RequestParamsWithBody {
    fn input(&self, key: &str) -> Option<Value> {
        self.0.input(key)
    }
}

#[axum::async_trait]
impl<S> FromRequest<S> for RequestParamsWithBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = request.into_parts();
        let params = match RequestParams::from_request_parts(&mut parts, state).await {
            Ok(params) => params,
            Err(never) => match never {},
        };

        if !has_json_content_type(&parts.headers) {
            return Ok(Self(params));
        }

        let bytes = Bytes::from_request(Request::from_parts(parts, body), state)
            .await
            .map_err(IntoResponse::into_response)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(params));
        }

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(body) => Ok(Self(params.with_json_body(body))),
            Err(err) => {
                tracing::debug!("Rejecting malformed JSON body: {}", err);
                let body = json!({
                    "success": false,
                    "error": {
                        "code": "invalid_json",
                        "message": err.to_string(),
                    }
                });
                Err((StatusCode::BAD_REQUEST, axum::Json(body)).into_response())
            }
        }
    }
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| mime.trim().to_ascii_lowercase())
        .is_some_and(|mime| mime == "application/json" || mime.ends_with("+json"))
}

/// Relation names held by a request parameter: a comma-separated string or a
/// list of strings. Anything else yields no relations.
pub fn relations_from_input(value: &Value) -> Vec<String> {
    match value {
        Value::String(relations) => relations
            .split(',')
            .map(str::trim)
            .filter(|relation| !relation.is_empty())
            .map(str::to_string)
            .collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|relation| !relation.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}
