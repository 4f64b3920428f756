//! Resources wrap raw data together with the transformer that shapes it.

use crate::errors::ResponderResult;
use crate::transformer::Transformer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// The data held by a resource
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceData {
    Item(Value),
    Collection {
        items: Vec<Value>,
        pagination: Option<Pagination>,
    },
    Null,
}

/// Pagination details attached to a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub count: u64,
    pub per_page: u64,
    pub current_page: u64,
    pub total_pages: u64,
    pub links: PaginationLinks,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// One page of results, as handed over by the application
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub per_page: u64,
    pub current_page: u64,
    /// URL the previous/next links are built from, e.g. `/api/posts`
    pub base_url: Option<String>,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: u64, per_page: u64, current_page: u64) -> Self {
        Self {
            items,
            total,
            per_page,
            current_page,
            base_url: None,
        }
    }

    /// Build previous/next links from this URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Compute the pagination block for this page
    pub fn pagination(&self) -> Pagination {
        let total_pages = if self.per_page == 0 {
            0
        } else {
            self.total.div_ceil(self.per_page)
        };

        let link = |page: u64| {
            self.base_url.as_ref().map(|base| {
                let separator = if base.contains('?') { '&' } else { '?' };
                format!("{}{}page={}", base, separator, page)
            })
        };

        let links = PaginationLinks {
            previous: if self.current_page > 1 {
                link(self.current_page - 1)
            } else {
                None
            },
            next: if self.current_page < total_pages {
                link(self.current_page + 1)
            } else {
                None
            },
        };

        Pagination {
            total: self.total,
            count: self.items.len() as u64,
            per_page: self.per_page,
            current_page: self.current_page,
            total_pages,
            links,
        }
    }
}

/// Input for the transformation manager
#[derive(Clone)]
pub struct Resource {
    data: ResourceData,
    transformer: Option<Arc<dyn Transformer>>,
    resource_key: Option<String>,
    meta: Map<String, Value>,
}

impl Resource {
    fn new(data: ResourceData) -> Self {
        Self {
            data,
            transformer: None,
            resource_key: None,
            meta: Map::new(),
        }
    }

    /// A single value
    pub fn item(value: Value) -> Self {
        Self::new(ResourceData::Item(value))
    }

    /// A list of values
    pub fn collection(items: Vec<Value>) -> Self {
        Self::new(ResourceData::Collection {
            items,
            pagination: None,
        })
    }

    /// No data at all
    pub fn null() -> Self {
        Self::new(ResourceData::Null)
    }

    /// Attach pagination to a collection. Ignored for items and null.
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        if let ResourceData::Collection {
            pagination: ref mut slot,
            ..
        } = self.data
        {
            *slot = Some(pagination);
        }
        self
    }

    pub fn with_transformer<T>(self, transformer: T) -> Self
    where
        T: Transformer + 'static,
    {
        self.with_shared_transformer(Arc::new(transformer))
    }

    pub fn with_shared_transformer(mut self, transformer: Arc<dyn Transformer>) -> Self {
        self.transformer = Some(transformer);
        self
    }

    /// Key used by serializers that name their collections
    pub fn with_resource_key(mut self, key: impl Into<String>) -> Self {
        self.resource_key = Some(key.into());
        self
    }

    pub fn with_meta(mut self, meta: Map<String, Value>) -> Self {
        self.meta.extend(meta);
        self
    }

    pub fn add_meta(&mut self, key: impl Into<String>, value: Value) {
        self.meta.insert(key.into(), value);
    }

    pub fn data(&self) -> &ResourceData {
        &self.data
    }

    pub fn transformer(&self) -> Option<&Arc<dyn Transformer>> {
        self.transformer.as_ref()
    }

    pub fn resource_key(&self) -> Option<&str> {
        self.resource_key.as_deref()
    }

    pub fn meta(&self) -> &Map<String, Value> {
        &self.meta
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.data, ResourceData::Collection { .. })
    }

    pub fn is_null(&self) -> bool {
        matches!(self.data, ResourceData::Null)
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("data", &self.data)
            .field("has_transformer", &self.transformer.is_some())
            .field("resource_key", &self.resource_key)
            .field("meta", &self.meta)
            .finish()
    }
}

/// Builds resources from serializable data
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceFactory;

impl ResourceFactory {
    pub fn new() -> Self {
        Self
    }

    /// Wrap `data` in an item, collection or null resource depending on its shape
    pub fn make<T>(&self, data: &T) -> ResponderResult<Resource>
    where
        T: Serialize + ?Sized,
    {
        Ok(match serde_json::to_value(data)? {
            Value::Null => Resource::null(),
            Value::Array(items) => Resource::collection(items),
            value => Resource::item(value),
        })
    }

    /// Wrap a page of results in a paginated collection
    pub fn make_paginated<T>(&self, page: &Paginated<T>) -> ResponderResult<Resource>
    where
        T: Serialize,
    {
        let items = page
            .items
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Resource::collection(items).with_pagination(page.pagination()))
    }
}
