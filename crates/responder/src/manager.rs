//! The transformation manager applies transformers, includes and the
//! serializer to a resource.

use crate::resource::{Resource, ResourceData};
use crate::serializers::Serializer;
use crate::transformer::Transformer;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// How deep nested includes (`a.b.c`) may go
pub const DEFAULT_RECURSION_LIMIT: usize = 10;

/// Orchestrates transformers and the serializer
#[derive(Clone)]
pub struct TransformationManager {
    serializer: Arc<dyn Serializer>,
    requested_includes: Vec<String>,
    recursion_limit: usize,
}

impl TransformationManager {
    pub fn new(serializer: Arc<dyn Serializer>) -> Self {
        Self {
            serializer,
            requested_includes: Vec::new(),
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }

    pub fn set_serializer(&mut self, serializer: Arc<dyn Serializer>) -> &mut Self {
        self.serializer = serializer;
        self
    }

    pub fn serializer(&self) -> &Arc<dyn Serializer> {
        &self.serializer
    }

    pub fn set_recursion_limit(&mut self, limit: usize) -> &mut Self {
        self.recursion_limit = limit.max(1);
        self
    }

    pub fn recursion_limit(&self) -> usize {
        self.recursion_limit
    }

    /// Add requested includes.
    ///
    /// Each entry may hold several comma-separated relations. `:modifier`
    /// suffixes are dropped and `a.b.c` also requests `a` and `a.b`.
    pub fn parse_includes<I, S>(&mut self, includes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for entry in includes {
            for part in entry.as_ref().split(',') {
                let name = part.split(':').next().unwrap_or_default().trim();
                let segments: Vec<&str> = name
                    .split('.')
                    .map(str::trim)
                    .filter(|segment| !segment.is_empty())
                    .take(self.recursion_limit)
                    .collect();

                for depth in 1..=segments.len() {
                    let path = segments[..depth].join(".");
                    if !self.requested_includes.contains(&path) {
                        self.requested_includes.push(path);
                    }
                }
            }
        }
        self
    }

    pub fn requested_includes(&self) -> &[String] {
        &self.requested_includes
    }

    /// Transform and serialize a resource into the response body
    pub fn create_data(&self, resource: &Resource) -> Value {
        let key = resource.resource_key();
        let mut meta = Map::new();

        let mut body = match resource.data() {
            ResourceData::Item(value) => self
                .serializer
                .item(key, self.transform_value(resource, value, None)),
            ResourceData::Collection { items, pagination } => {
                if let Some(pagination) = pagination {
                    meta.extend(self.serializer.paginator(pagination));
                }
                let transformed = items
                    .iter()
                    .map(|value| self.transform_value(resource, value, None))
                    .collect();
                self.serializer.collection(key, transformed)
            }
            ResourceData::Null => self.serializer.null(),
        };

        meta.extend(resource.meta().clone());
        let fields = self.serializer.meta(&meta);
        if !fields.is_empty() {
            match body {
                Value::Object(ref mut object) => object.extend(fields),
                _ => tracing::warn!(
                    serializer = self.serializer.name(),
                    "Cannot attach meta to a body that is not an object"
                ),
            }
        }

        body
    }

    fn transform_value(&self, resource: &Resource, value: &Value, scope: Option<&str>) -> Value {
        let Some(transformer) = resource.transformer() else {
            return value.clone();
        };

        let transformed = transformer.transform(value);
        let included = self.include_relations(transformer.as_ref(), value, scope);
        if included.is_empty() {
            transformed
        } else {
            self.serializer.merge_includes(transformed, included)
        }
    }

    fn include_relations(
        &self,
        transformer: &dyn Transformer,
        model: &Value,
        scope: Option<&str>,
    ) -> Map<String, Value> {
        let mut included = Map::new();

        let requested = transformer.available_includes().iter().filter(|relation| {
            self.requested_includes
                .contains(&scoped_identifier(scope, relation))
        });

        for relation in transformer.default_includes().iter().chain(requested) {
            if included.contains_key(*relation) {
                continue;
            }

            let identifier = scoped_identifier(scope, relation);
            if identifier.split('.').count() > self.recursion_limit {
                tracing::debug!(include = %identifier, "Skipping include beyond recursion limit");
                continue;
            }

            let Some(child) = transformer.include(relation, model) else {
                continue;
            };

            included.insert(
                relation.to_string(),
                self.serialize_include(&child, &identifier),
            );
        }

        included
    }

    fn serialize_include(&self, child: &Resource, scope: &str) -> Value {
        match child.data() {
            ResourceData::Item(value) => self
                .serializer
                .include_item(self.transform_value(child, value, Some(scope))),
            ResourceData::Collection { items, .. } => self.serializer.include_collection(
                items
                    .iter()
                    .map(|value| self.transform_value(child, value, Some(scope)))
                    .collect(),
            ),
            ResourceData::Null => self.serializer.include_null(),
        }
    }
}

impl fmt::Debug for TransformationManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformationManager")
            .field("serializer", &self.serializer.name())
            .field("requested_includes", &self.requested_includes)
            .field("recursion_limit", &self.recursion_limit)
            .finish()
    }
}

fn scoped_identifier(scope: Option<&str>, relation: &str) -> String {
    match scope {
        Some(scope) => format!("{}.{}", scope, relation),
        None => relation.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Paginated;
    use crate::resource::ResourceFactory;
    use crate::serializers::{ApiSerializer, ArraySerializer, DataArraySerializer};
    use crate::transformer::FnTransformer;
    use serde_json::json;

    fn comment_transformer() -> FnTransformer {
        FnTransformer::new(|comment| json!({ "body": comment["body"] }))
            .with_include("author", |comment| {
                Some(Resource::item(comment["author"].clone()))
            })
    }

    fn post_transformer() -> FnTransformer {
        FnTransformer::new(|post| json!({ "id": post["id"], "title": post["title"] }))
            .with_include("comments", |post| {
                let comments = post["comments"].as_array().cloned().unwrap_or_default();
                Some(Resource::collection(comments).with_transformer(comment_transformer()))
            })
            .with_include("author", |post| match &post["author"] {
                Value::Null => Some(Resource::null()),
                author => Some(Resource::item(author.clone())),
            })
    }

    fn post() -> Value {
        json!({
            "id": 1,
            "title": "Hello",
            "secret": "hidden",
            "author": null,
            "comments": [
                {"body": "First", "author": {"name": "Ada"}}
            ]
        })
    }

    #[test]
    fn test_parse_includes() {
        let mut manager = TransformationManager::new(Arc::new(ApiSerializer));
        manager.parse_includes(["comments.author , tags:limit(5)", "", "comments"]);

        assert_eq!(
            manager.requested_includes(),
            &["comments", "comments.author", "tags"]
        );
    }

    #[test]
    fn test_parse_includes_respects_recursion_limit() {
        let mut manager = TransformationManager::new(Arc::new(ApiSerializer));
        manager.set_recursion_limit(2);
        manager.parse_includes(["a.b.c.d"]);
        assert_eq!(manager.requested_includes(), &["a", "a.b"]);
    }

    #[test]
    fn test_without_transformer_data_passes_through() {
        let manager = TransformationManager::new(Arc::new(ApiSerializer));
        let resource = ResourceFactory::new().make(&json!({"id": 7})).unwrap();
        assert_eq!(
            manager.create_data(&resource),
            json!({"success": true, "data": {"id": 7}})
        );
    }

    #[test]
    fn test_unrequested_includes_are_left_out() {
        let manager = TransformationManager::new(Arc::new(ApiSerializer));
        let resource = Resource::item(post()).with_transformer(post_transformer());

        assert_eq!(
            manager.create_data(&resource),
            json!({"success": true, "data": {"id": 1, "title": "Hello"}})
        );
    }

    #[test]
    fn test_nested_includes() {
        let mut manager = TransformationManager::new(Arc::new(ApiSerializer));
        manager.parse_includes(["comments.author", "author", "unknown"]);
        let resource = Resource::item(post()).with_transformer(post_transformer());

        assert_eq!(
            manager.create_data(&resource),
            json!({
                "success": true,
                "data": {
                    "id": 1,
                    "title": "Hello",
                    "comments": [
                        {"body": "First", "author": {"name": "Ada"}}
                    ],
                    "author": null
                }
            })
        );
    }

    #[test]
    fn test_includes_follow_serializer_shape() {
        let mut manager = TransformationManager::new(Arc::new(DataArraySerializer));
        manager.parse_includes(["comments"]);
        let resource = Resource::item(post()).with_transformer(post_transformer());

        assert_eq!(
            manager.create_data(&resource),
            json!({
                "data": {
                    "id": 1,
                    "title": "Hello",
                    "comments": {"data": [{"body": "First"}]}
                }
            })
        );
    }

    #[test]
    fn test_default_includes_are_always_embedded() {
        let transformer = FnTransformer::new(|tag| json!({ "name": tag["name"] }))
            .with_default_include("count", |tag| Some(Resource::item(tag["count"].clone())));
        let manager = TransformationManager::new(Arc::new(ArraySerializer));
        let resource = Resource::collection(vec![json!({"name": "rust", "count": 3})])
            .with_transformer(transformer)
            .with_resource_key("tags");

        assert_eq!(
            manager.create_data(&resource),
            json!({"tags": [{"name": "rust", "count": 3}]})
        );
    }

    #[test]
    fn test_pagination_and_meta() {
        let page = Paginated::new(vec![json!({"id": 1})], 3, 1, 1);
        let resource = ResourceFactory::new()
            .make_paginated(&page)
            .unwrap()
            .with_meta(serde_json::from_value(json!({"version": 2})).unwrap());

        let api = TransformationManager::new(Arc::new(ApiSerializer)).create_data(&resource);
        assert_eq!(api["pagination"]["total_pages"], json!(3));
        assert_eq!(api["version"], json!(2));

        let array = TransformationManager::new(Arc::new(ArraySerializer)).create_data(&resource);
        assert_eq!(array["meta"]["pagination"]["count"], json!(1));
        assert_eq!(array["meta"]["version"], json!(2));
        assert_eq!(array["data"], json!([{"id": 1}]));
    }
}
