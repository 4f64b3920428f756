//! Builder for success responses

use crate::errors::{ResponderError, ResponderResult};
use crate::http::{prepend_status_code, ApiResponse, ResponseFactory};
use crate::manager::TransformationManager;
use crate::resource::{Paginated, Resource, ResourceFactory};
use crate::serializers::Serializer;
use crate::transformer::Transformer;
use axum::http::{HeaderMap, StatusCode};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Assembles the body and status of a success response.
///
/// ```rust,ignore
/// let response = builder
///     .transform_with(&post, PostTransformer)?
///     .include(["comments"])
///     .respond(201)?;
/// ```
#[derive(Clone)]
pub struct SuccessResponseBuilder {
    response_factory: Arc<dyn ResponseFactory>,
    resource_factory: ResourceFactory,
    manager: TransformationManager,
    resource: Resource,
    include_status_code: bool,
}

impl SuccessResponseBuilder {
    pub fn new(
        response_factory: Arc<dyn ResponseFactory>,
        resource_factory: ResourceFactory,
        manager: TransformationManager,
    ) -> Self {
        Self {
            response_factory,
            resource_factory,
            manager,
            resource: Resource::null(),
            include_status_code: false,
        }
    }

    /// Use a prepared resource as the response data
    pub fn transform(mut self, resource: Resource) -> Self {
        self.resource = resource;
        self
    }

    /// Use `data` as-is
    pub fn transform_data<T>(self, data: &T) -> ResponderResult<Self>
    where
        T: Serialize + ?Sized,
    {
        let resource = self.resource_factory.make(data)?;
        Ok(self.transform(resource))
    }

    /// Shape `data` with a transformer
    pub fn transform_with<T, X>(self, data: &T, transformer: X) -> ResponderResult<Self>
    where
        T: Serialize + ?Sized,
        X: Transformer + 'static,
    {
        let resource = self.resource_factory.make(data)?.with_transformer(transformer);
        Ok(self.transform(resource))
    }

    /// Use a page of results, with pagination details in the body
    pub fn transform_paginated<T>(
        self,
        page: &Paginated<T>,
        transformer: Option<Arc<dyn Transformer>>,
    ) -> ResponderResult<Self>
    where
        T: Serialize,
    {
        let mut resource = self.resource_factory.make_paginated(page)?;
        if let Some(transformer) = transformer {
            resource = resource.with_shared_transformer(transformer);
        }
        Ok(self.transform(resource))
    }

    /// Request relations to embed, e.g. `["author", "comments.author"]` or
    /// `["author,comments"]`
    pub fn include<I, S>(mut self, relations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.manager.parse_includes(relations);
        self
    }

    /// Relations requested so far
    pub fn includes(&self) -> &[String] {
        self.manager.requested_includes()
    }

    pub fn add_meta(mut self, meta: Map<String, Value>) -> Self {
        self.resource = self.resource.with_meta(meta);
        self
    }

    /// Override the serializer for this response
    pub fn serializer(mut self, serializer: Arc<dyn Serializer>) -> Self {
        self.manager.set_serializer(serializer);
        self
    }

    /// Add `"status"` as the first body field. Only object bodies can carry
    /// it; a scalar item under the `array` serializer is sent as-is.
    pub fn set_include_status_code(mut self, include_status_code: bool) -> Self {
        self.include_status_code = include_status_code;
        self
    }

    pub fn include_status_code(&self) -> bool {
        self.include_status_code
    }

    pub fn manager(&self) -> &TransformationManager {
        &self.manager
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Response body for the given status
    pub fn to_value(&self, status: u16) -> ResponderResult<Value> {
        validate_status(status)?;

        let body = self.manager.create_data(&self.resource);
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
            .map_err(|_| ResponderError::InvalidSuccessStatus { status })?;
        Ok(self.response_factory.json(body, status, headers))
    }
}

impl fmt::Debug for SuccessResponseBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuccessResponseBuilder")
            .field("manager", &self.manager)
            .field("resource", &self.resource)
            .field("include_status_code", &self.include_status_code)
            .finish()
    }
}

fn validate_status(status: u16) -> ResponderResult<()> {
    if (100..400).contains(&status) {
        Ok(())
    } else {
        Err(ResponderError::InvalidSuccessStatus { status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::JsonResponseFactory;
    use crate::serializers::{ApiSerializer, ArraySerializer};
    use serde_json::json;

    fn builder() -> SuccessResponseBuilder {
        SuccessResponseBuilder::new(
            Arc::new(JsonResponseFactory),
            ResourceFactory::new(),
            TransformationManager::new(Arc::new(ApiSerializer)),
        )
    }

    #[test]
    fn test_empty_response() {
        assert_eq!(
            builder().to_value(200).unwrap(),
            json!({"success": true, "data": null})
        );
    }

    #[test]
    fn test_status_code_in_body() {
        let body = builder()
            .set_include_status_code(true)
            .transform_data(&json!({"id": 1}))
            .unwrap()
            .to_value(201)
            .unwrap();

        assert_eq!(body, json!({"status": 201, "success": true, "data": {"id": 1}}));
        assert_eq!(body.as_object().unwrap().keys().next().unwrap(), "status");
    }

    #[test]
    fn test_transformer_and_meta() {
        let body = builder()
            .transform_with(&json!([{"id": 1, "secret": "x"}]), |m: &Value| json!({"id": m["id"]}))
            .unwrap()
            .add_meta(serde_json::from_value(json!({"total": 1})).unwrap())
            .to_value(200)
            .unwrap();

        assert_eq!(body, json!({"success": true, "data": [{"id": 1}], "total": 1}));
    }

    #[test]
    fn test_serializer_override() {
        let body = builder()
            .serializer(Arc::new(ArraySerializer))
            .transform_data(&json!({"id": 1}))
            .unwrap()
            .to_value(200)
            .unwrap();
        assert_eq!(body, json!({"id": 1}));
    }

    #[test]
    fn test_scalar_item_keeps_body_without_status() {
        let builder = builder()
            .serializer(Arc::new(ArraySerializer))
            .set_include_status_code(true);

        let body = builder.clone().transform_data(&json!("hello")).unwrap().to_value(200).unwrap();
        assert_eq!(body, json!("hello"));

        let body = builder.transform_data(&json!({"id": 1})).unwrap().to_value(200).unwrap();
        assert_eq!(body, json!({"status": 200, "id": 1}));
    }

    #[test]
    fn test_includes_accumulate() {
        let builder = builder().include(["author,comments"]).include(vec!["tags".to_string()]);
        assert_eq!(builder.includes(), &["author", "comments", "tags"]);
    }

    #[test]
    fn test_invalid_status_codes() {
        for status in [99, 400, 404, 500] {
            let error = builder().respond(status).unwrap_err();
            assert!(matches!(error, ResponderError::InvalidSuccessStatus { status: s } if s == status));
        }
    }

    #[test]
    fn test_respond() {
        let response = builder().transform_data(&json!({"id": 1})).unwrap().respond(202).unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(response.body()["data"]["id"], json!(1));
    }
}
