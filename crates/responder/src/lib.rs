//! # elif-responder
//!
//! Standardized success and error JSON responses for API handlers.
//!
//! ## Features
//!
//! - **Serializers**: `api`, `array` and `data_array` envelopes, selected by config
//! - **Transformers**: shape values and embed requested relations (`?with=author,comments`)
//! - **Error responses**: translated messages keyed by error code
//! - **Request scoped bindings**: one set of builders per request, resolvable by alias
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use elif_responder::{DeploymentMode, RequestParams, ResponderServiceProvider};
//! use serde_json::json;
//!
//! let booted = ResponderServiceProvider::new(".")
//!     .boot(DeploymentMode::Server)
//!     .unwrap();
//!
//! let scope = booted.scope(RequestParams::from_query("with=author"));
//! let response = scope
//!     .responder()
//!     .unwrap()
//!     .success(&json!({"id": 1, "title": "Hello"}))
//!     .unwrap();
//! assert_eq!(response.status().as_u16(), 200);
//! ```

pub mod assets;
pub mod config;
pub mod errors;
pub mod exceptions;
pub mod helpers;
pub mod http;
pub mod manager;
pub mod provider;
pub mod publish;
pub mod resource;
pub mod responder;
pub mod scaffold;
pub mod serializers;
pub mod transformer;
pub mod translation;

pub use config::{ConfigError, ConfigRepository, ConfigSource, ResponderConfig};
pub use errors::{ResponderError, ResponderResult};
pub use exceptions::ApiException;
pub use http::{
    ApiResponse, ErrorResponseBuilder, JsonResponseFactory, RequestInput, RequestParams,
    RequestParamsWithBody, ResponseFactory, SuccessResponseBuilder,
};
pub use manager::TransformationManager;
pub use provider::{
    AliasTable, BootedResponder, CommandDescriptor, DeploymentMode, RequestScope,
    ResolvedService, ResponderServiceProvider, ResponderServices, ServiceId,
};
pub use publish::{default_publishables, publish, PublishOutcome, Publishable};
pub use resource::{Paginated, Pagination, Resource, ResourceData, ResourceFactory};
pub use responder::Responder;
pub use scaffold::TransformerScaffold;
pub use serializers::{
    ApiSerializer, ArraySerializer, DataArraySerializer, Serializer, SerializerKind,
    SerializerRegistry,
};
pub use transformer::{FnTransformer, Transformer};
pub use translation::{LangTranslator, Translator};

/// Version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
