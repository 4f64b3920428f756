//! Transformers turn raw domain values into API output.

use crate::resource::Resource;
use serde_json::Value;
use std::fmt;

/// Shapes a single value and declares the relations it can embed.
///
/// Any `Fn(&Value) -> Value` closure is a transformer without includes.
pub trait Transformer: Send + Sync {
    /// Transform one value
    fn transform(&self, model: &Value) -> Value;

    /// Relations that may be requested through includes
    fn available_includes(&self) -> &[&'static str] {
        &[]
    }

    /// Relations embedded even when not requested
    fn default_includes(&self) -> &[&'static str] {
        &[]
    }

    /// Build the resource for a relation of `model`. `None` skips the relation.
    fn include(&self, relation: &str, model: &Value) -> Option<Resource> {
        let _ = (relation, model);
        None
    }
}

impl<F> Transformer for F
where
    F: Fn(&Value) -> Value + Send + Sync,
{
    fn transform(&self, model: &Value) -> Value {
        self(model)
    }
}

type TransformFn = Box<dyn Fn(&Value) -> Value + Send + Sync>;
type IncludeFn = Box<dyn Fn(&Value) -> Option<Resource> + Send + Sync>;

/// Transformer assembled from closures, handy for small resources and tests
pub struct FnTransformer {
    transform: TransformFn,
    relations: Vec<(&'static str, IncludeFn)>,
    available: Vec<&'static str>,
    defaults: Vec<&'static str>,
}

impl FnTransformer {
    pub fn new<F>(transform: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self {
            transform: Box::new(transform),
            relations: Vec::new(),
            available: Vec::new(),
            defaults: Vec::new(),
        }
    }

    /// Register a relation that clients may request
    pub fn with_include<F>(mut self, relation: &'static str, resolve: F) -> Self
    where
        F: Fn(&Value) -> Option<Resource> + Send + Sync + 'static,
    {
        self.relations.push((relation, Box::new(resolve)));
        self.available.push(relation);
        self
    }

    /// Register a relation that is always embedded
    pub fn with_default_include<F>(mut self, relation: &'static str, resolve: F) -> Self
    where
        F: Fn(&Value) -> Option<Resource> + Send + Sync + 'static,
    {
        self.relations.push((relation, Box::new(resolve)));
        self.defaults.push(relation);
        self
    }
}

impl Transformer for FnTransformer {
    fn transform(&self, model: &Value) -> Value {
        (self.transform)(model)
    }

    fn available_includes(&self) -> &[&'static str] {
        &self.available
    }

    fn default_includes(&self) -> &[&'static str] {
        &self.defaults
    }

    fn include(&self, relation: &str, model: &Value) -> Option<Resource> {
        self.relations
            .iter()
            .find(|(name, _)| *name == relation)
            .and_then(|(_, resolve)| resolve(model))
    }
}

impl fmt::Debug for FnTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTransformer")
            .field("available", &self.available)
            .field("defaults", &self.defaults)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_closure_is_a_transformer() {
        let transformer = |model: &Value| json!({ "name": model["name"] });
        assert_eq!(
            transformer.transform(&json!({"name": "Ada", "password": "x"})),
            json!({"name": "Ada"})
        );
        assert!(Transformer::available_includes(&transformer).is_empty());
    }

    #[test]
    fn test_fn_transformer_includes() {
        let transformer = FnTransformer::new(|model| json!({ "id": model["id"] }))
            .with_include("author", |model| Some(Resource::item(model["author"].clone())))
            .with_default_include("tags", |_| None);

        assert_eq!(transformer.available_includes(), &["author"]);
        assert_eq!(transformer.default_includes(), &["tags"]);

        let model = json!({"id": 1, "author": {"name": "Ada"}});
        assert!(transformer.include("author", &model).is_some());
        assert!(transformer.include("tags", &model).is_none());
        assert!(transformer.include("missing", &model).is_none());
    }
}
