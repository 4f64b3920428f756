//! Per-request construction of the responder bindings.

use crate::config::ResponderConfig;
use crate::errors::{ResponderError, ResponderResult};
use crate::http::{
    relations_from_input, ErrorResponseBuilder, RequestInput, RequestParams, ResponseFactory,
    SuccessResponseBuilder,
};
use crate::manager::TransformationManager;
use crate::provider::aliases::{AliasTable, ServiceId};
use crate::resource::ResourceFactory;
use crate::responder::Responder;
use crate::serializers::{Serializer, SerializerRegistry};
use crate::translation::Translator;
use once_cell::unsync::OnceCell;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Process-wide collaborators the bindings are built from
pub struct ResponderServices {
    config: ResponderConfig,
    serializers: SerializerRegistry,
    response_factory: Arc<dyn ResponseFactory>,
    translator: Arc<dyn Translator>,
    aliases: AliasTable,
}

impl ResponderServices {
    pub fn new(
        config: ResponderConfig,
        serializers: SerializerRegistry,
        response_factory: Arc<dyn ResponseFactory>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        Self {
            config,
            serializers,
            response_factory,
            translator,
            aliases: AliasTable::default(),
        }
    }

    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn config(&self) -> &ResponderConfig {
        &self.config
    }

    pub fn serializers(&self) -> &SerializerRegistry {
        &self.serializers
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn translator(&self) -> &Arc<dyn Translator> {
        &self.translator
    }

    /// Open a scope for one request
    pub fn scope<R>(self: &Arc<Self>, request: R) -> RequestScope
    where
        R: RequestInput + 'static,
    {
        RequestScope::new(Arc::clone(self), Box::new(request))
    }

    /// Open a scope with no request parameters
    pub fn detached_scope(self: &Arc<Self>) -> RequestScope {
        self.scope(RequestParams::new())
    }
}

impl fmt::Debug for ResponderServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponderServices")
            .field("config", &self.config)
            .field("serializers", &self.serializers)
            .field("aliases", &self.aliases)
            .finish()
    }
}

/// A resolved binding
#[derive(Clone)]
pub enum ResolvedService {
    Responder(Arc<Responder>),
    SuccessBuilder(Arc<SuccessResponseBuilder>),
    ErrorBuilder(Arc<ErrorResponseBuilder>),
    Manager(Arc<TransformationManager>),
    Serializer(Arc<dyn Serializer>),
    ResourceFactory(Arc<ResourceFactory>),
}

impl ResolvedService {
    pub fn id(&self) -> ServiceId {
        match self {
            ResolvedService::Responder(_) => ServiceId::Responder,
            ResolvedService::SuccessBuilder(_) => ServiceId::SuccessBuilder,
            ResolvedService::ErrorBuilder(_) => ServiceId::ErrorBuilder,
            ResolvedService::Manager(_) => ServiceId::Manager,
            ResolvedService::Serializer(_) => ServiceId::Serializer,
            ResolvedService::ResourceFactory(_) => ServiceId::ResourceFactory,
        }
    }

    /// Whether both values point at the same instance
    pub fn same_instance(&self, other: &ResolvedService) -> bool {
        match (self, other) {
            (ResolvedService::Responder(a), ResolvedService::Responder(b)) => Arc::ptr_eq(a, b),
            (ResolvedService::SuccessBuilder(a), ResolvedService::SuccessBuilder(b)) => {
                Arc::ptr_eq(a, b)
            }
            (ResolvedService::ErrorBuilder(a), ResolvedService::ErrorBuilder(b)) => {
                Arc::ptr_eq(a, b)
            }
            (ResolvedService::Manager(a), ResolvedService::Manager(b)) => Arc::ptr_eq(a, b),
            (ResolvedService::Serializer(a), ResolvedService::Serializer(b)) => Arc::ptr_eq(a, b),
            (ResolvedService::ResourceFactory(a), ResolvedService::ResourceFactory(b)) => {
                Arc::ptr_eq(a, b)
            }
            _ => false,
        }
    }

    pub fn into_responder(self) -> Option<Arc<Responder>> {
        match self {
            ResolvedService::Responder(responder) => Some(responder),
            _ => None,
        }
    }

    pub fn into_serializer(self) -> Option<Arc<dyn Serializer>> {
        match self {
            ResolvedService::Serializer(serializer) => Some(serializer),
            _ => None,
        }
    }

    pub fn into_success_builder(self) -> Option<Arc<SuccessResponseBuilder>> {
        match self {
            ResolvedService::SuccessBuilder(builder) => Some(builder),
            _ => None,
        }
    }

    pub fn into_error_builder(self) -> Option<Arc<ErrorResponseBuilder>> {
        match self {
            ResolvedService::ErrorBuilder(builder) => Some(builder),
            _ => None,
        }
    }

    pub fn into_manager(self) -> Option<Arc<TransformationManager>> {
        match self {
            ResolvedService::Manager(manager) => Some(manager),
            _ => None,
        }
    }
}

impl fmt::Debug for ResolvedService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResolvedService({})", self.id())
    }
}

/// Bindings for one request.
///
/// Each binding is built on first use and reused for the rest of the scope,
/// so aliases and canonical names hand out the same instance. A new scope
/// builds everything again.
pub struct RequestScope {
    id: Uuid,
    services: Arc<ResponderServices>,
    request: Box<dyn RequestInput>,
    serializer: OnceCell<Arc<dyn Serializer>>,
    manager: OnceCell<Arc<TransformationManager>>,
    resource_factory: OnceCell<Arc<ResourceFactory>>,
    success: OnceCell<Arc<SuccessResponseBuilder>>,
    error: OnceCell<Arc<ErrorResponseBuilder>>,
    responder: OnceCell<Arc<Responder>>,
}

impl RequestScope {
    fn new(services: Arc<ResponderServices>, request: Box<dyn RequestInput>) -> Self {
        Self {
            id: Uuid::new_v4(),
            services,
            request,
            serializer: OnceCell::new(),
            manager: OnceCell::new(),
            resource_factory: OnceCell::new(),
            success: OnceCell::new(),
            error: OnceCell::new(),
            responder: OnceCell::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn services(&self) -> &Arc<ResponderServices> {
        &self.services
    }

    pub fn request(&self) -> &dyn RequestInput {
        self.request.as_ref()
    }

    /// The serializer named by `responder.serializer`
    pub fn serializer(&self) -> ResponderResult<Arc<dyn Serializer>> {
        self.serializer
            .get_or_try_init(|| {
                let identifier = &self.services.config.serializer;
                tracing::debug!(scope = %self.id, serializer = %identifier, "Resolving serializer");
                self.services.serializers.create(identifier)
            })
            .cloned()
    }

    pub fn manager(&self) -> ResponderResult<Arc<TransformationManager>> {
        self.manager
            .get_or_try_init(|| Ok(Arc::new(TransformationManager::new(self.serializer()?))))
            .cloned()
    }

    pub fn resource_factory(&self) -> Arc<ResourceFactory> {
        self.resource_factory
            .get_or_init(|| Arc::new(ResourceFactory::new()))
            .clone()
    }

    /// Success builder with the request's relations and the status-code flag applied
    pub fn success_builder(&self) -> ResponderResult<Arc<SuccessResponseBuilder>> {
        self.success
            .get_or_try_init(|| {
                let config = &self.services.config;
                let mut builder = SuccessResponseBuilder::new(
                    Arc::clone(&self.services.response_factory),
                    *self.resource_factory(),
                    self.manager()?.as_ref().clone(),
                );

                if let Some(parameter) = &config.load_relations_from_parameter {
                    let value = self
                        .request
                        .input(parameter)
                        .unwrap_or_else(|| Value::Array(Vec::new()));
                    let relations = relations_from_input(&value);
                    tracing::debug!(scope = %self.id, parameter = %parameter, ?relations, "Loading relations from request");
                    builder = builder.include(relations);
                }

                Ok::<_, ResponderError>(Arc::new(
                    builder.set_include_status_code(config.include_status_code),
                ))
            })
            .cloned()
    }

    pub fn error_builder(&self) -> Arc<ErrorResponseBuilder> {
        self.error
            .get_or_init(|| {
                Arc::new(
                    ErrorResponseBuilder::new(
                        Arc::clone(&self.services.response_factory),
                        Arc::clone(&self.services.translator),
                    )
                    .set_include_status_code(self.services.config.include_status_code),
                )
            })
            .clone()
    }

    pub fn responder(&self) -> ResponderResult<Arc<Responder>> {
        self.responder
            .get_or_try_init(|| {
                Ok::<_, ResponderError>(Arc::new(Responder::new(
                    self.success_builder()?,
                    self.error_builder(),
                )))
            })
            .cloned()
    }

    /// Resolve a binding by alias (`responder.success`) or canonical name
    /// (`SuccessResponseBuilder`)
    pub fn resolve(&self, key: &str) -> ResponderResult<ResolvedService> {
        let id = self
            .services
            .aliases
            .resolve(key)
            .ok_or_else(|| ResponderError::service_not_found(key))?;
        self.resolve_id(id)
    }

    pub fn resolve_id(&self, id: ServiceId) -> ResponderResult<ResolvedService> {
        Ok(match id {
            ServiceId::Responder => ResolvedService::Responder(self.responder()?),
            ServiceId::SuccessBuilder => ResolvedService::SuccessBuilder(self.success_builder()?),
            ServiceId::ErrorBuilder => ResolvedService::ErrorBuilder(self.error_builder()),
            ServiceId::Manager => ResolvedService::Manager(self.manager()?),
            ServiceId::Serializer => ResolvedService::Serializer(self.serializer()?),
            ServiceId::ResourceFactory => ResolvedService::ResourceFactory(self.resource_factory()),
        })
    }
}

impl fmt::Debug for RequestScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestScope")
            .field("id", &self.id)
            .field("serializer_resolved", &self.serializer.get().is_some())
            .field("responder_resolved", &self.responder.get().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::JsonResponseFactory;
    use crate::translation::LangTranslator;
    use serde_json::json;

    fn services(config: ResponderConfig) -> Arc<ResponderServices> {
        Arc::new(ResponderServices::new(
            config,
            SerializerRegistry::default(),
            Arc::new(JsonResponseFactory),
            Arc::new(LangTranslator::with_defaults("en", "en").unwrap()),
        ))
    }

    #[test]
    fn test_bindings_are_cached_within_a_scope() {
        let services = services(ResponderConfig::default());
        let scope = services.detached_scope();

        assert!(Arc::ptr_eq(&scope.serializer().unwrap(), &scope.serializer().unwrap()));
        assert!(Arc::ptr_eq(&scope.manager().unwrap(), &scope.manager().unwrap()));
        assert!(Arc::ptr_eq(&scope.error_builder(), &scope.error_builder()));

        let responder = scope.responder().unwrap();
        assert!(Arc::ptr_eq(
            responder.shared_success_builder(),
            &scope.success_builder().unwrap()
        ));
        assert!(Arc::ptr_eq(responder.shared_error_builder(), &scope.error_builder()));
    }

    #[test]
    fn test_new_scope_builds_new_instances() {
        let services = services(ResponderConfig::default());
        let first = services.detached_scope();
        let second = services.detached_scope();

        assert_ne!(first.id(), second.id());
        assert!(!Arc::ptr_eq(&first.manager().unwrap(), &second.manager().unwrap()));
    }

    #[test]
    fn test_relations_from_request() {
        let services = services(ResponderConfig::default());
        let scope = services.scope(RequestParams::new().with("with", json!("author,comments")));
        assert_eq!(scope.success_builder().unwrap().includes(), &["author", "comments"]);
    }

    #[test]
    fn test_relations_disabled() {
        let config = ResponderConfig {
            load_relations_from_parameter: None,
            ..ResponderConfig::default()
        };
        let services = services(config);
        let scope = services.scope(RequestParams::new().with("with", json!("author")));
        assert!(scope.success_builder().unwrap().includes().is_empty());
    }

    #[test]
    fn test_unknown_serializer_fails_resolution() {
        let config = ResponderConfig {
            serializer: "xml".to_string(),
            ..ResponderConfig::default()
        };
        let scope = services(config).detached_scope();

        assert!(matches!(
            scope.serializer(),
            Err(ResponderError::UnknownSerializer { .. })
        ));
        assert!(scope.responder().is_err());
        assert!(scope.resolve("responder.serializer").is_err());
    }

    #[test]
    fn test_resolve_unknown_key() {
        let scope = services(ResponderConfig::default()).detached_scope();
        assert!(matches!(
            scope.resolve("responder.cache"),
            Err(ResponderError::ServiceNotFound { .. })
        ));
    }
}
