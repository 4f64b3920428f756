//! Bootstrapping of the responder bindings

pub mod aliases;
pub mod scope;

pub use aliases::{AliasTable, ServiceId};
pub use scope::{RequestScope, ResolvedService, ResponderServices};

use crate::config::{ConfigError, ConfigRepository, ResponderConfig};
use crate::errors::{ResponderError, ResponderResult};
use crate::http::{JsonResponseFactory, ResponseFactory};
use crate::publish::{default_publishables, Publishable};
use crate::serializers::{SerializerConstructor, SerializerRegistry};
use crate::translation::{LangTranslator, Translator};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// Environment variable selecting the deployment mode
pub const ENV_MODE: &str = "RESPONDER_MODE";

/// Keys the provider registers, in registration order
pub const PROVIDES: [&str; 5] = [
    "responder",
    "responder.success",
    "responder.error",
    "responder.manager",
    "responder.serializer",
];

/// How the host application runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeploymentMode {
    /// Full server serving requests
    #[default]
    Server,
    /// Command line invocation
    Console,
    /// Reduced server without the console tooling
    Lightweight,
}

impl DeploymentMode {
    pub fn from_env() -> Result<Self, ResponderError> {
        match std::env::var(ENV_MODE) {
            Ok(value) => Ok(value.parse()?),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentMode::Server => "server",
            DeploymentMode::Console => "console",
            DeploymentMode::Lightweight => "lightweight",
        }
    }

    pub fn is_console(&self) -> bool {
        matches!(self, DeploymentMode::Console)
    }
}

impl FromStr for DeploymentMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "server" | "http" => Ok(DeploymentMode::Server),
            "console" | "cli" => Ok(DeploymentMode::Console),
            "lightweight" | "lumen" => Ok(DeploymentMode::Lightweight),
            _ => Err(ConfigError::invalid_value(
                ENV_MODE,
                value,
                "one of server, console, lightweight",
            )),
        }
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A console command the provider makes available
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub name: &'static str,
    pub description: &'static str,
}

/// Generator command for transformer files
pub const MAKE_TRANSFORMER: CommandDescriptor = CommandDescriptor {
    name: "make:transformer",
    description: "Create a new transformer",
};

/// Wires the responder into an application.
///
/// Configure collaborators with the `with_*` methods, then call
/// [`boot`](Self::boot) once at startup.
pub struct ResponderServiceProvider {
    base_path: PathBuf,
    serializers: SerializerRegistry,
    response_factory: Arc<dyn ResponseFactory>,
    translator: Option<Arc<dyn Translator>>,
    config: Option<ResponderConfig>,
    aliases: AliasTable,
}

impl ResponderServiceProvider {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            serializers: SerializerRegistry::default(),
            response_factory: Arc::new(JsonResponseFactory),
            translator: None,
            config: None,
            aliases: AliasTable::default(),
        }
    }

    /// Register an additional serializer identifier
    pub fn with_serializer(mut self, identifier: &str, constructor: SerializerConstructor) -> Self {
        self.serializers.register(identifier, constructor);
        self
    }

    pub fn with_response_factory(mut self, factory: Arc<dyn ResponseFactory>) -> Self {
        self.response_factory = factory;
        self
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Use this config instead of loading it from disk and environment
    pub fn with_config(mut self, config: ResponderConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Keys this provider registers
    pub fn provides(&self) -> &'static [&'static str] {
        &PROVIDES
    }

    /// Load configuration and build the process-wide services
    pub fn boot(self, mode: DeploymentMode) -> ResponderResult<BootedResponder> {
        tracing::info!("Booting responder in {} mode", mode);

        let (config, config_repository) = match self.config {
            Some(config) => {
                config.validate()?;
                (config, ConfigRepository::new())
            }
            None => ResponderConfig::load(&self.base_path)?,
        };

        for (key, source) in ResponderConfig::config_sources(&config_repository) {
            tracing::debug!("{} from {}", key, source);
        }

        if !self.serializers.contains(&config.serializer) {
            return Err(ResponderError::unknown_serializer(
                &config.serializer,
                &self.serializers.identifiers(),
            ));
        }

        let translator = match self.translator {
            Some(translator) => translator,
            None => {
                let mut translator =
                    LangTranslator::with_defaults(&config.locale, &config.fallback_locale)?;
                let lang_dir = self.base_path.join("resources").join("lang");
                let groups = translator.load_directory(&lang_dir)?;
                if groups > 0 {
                    tracing::debug!("Loaded {} translation groups from {}", groups, lang_dir.display());
                }
                Arc::new(translator) as Arc<dyn Translator>
            }
        };

        let (publishables, commands) = if mode.is_console() {
            (default_publishables(), vec![MAKE_TRANSFORMER])
        } else {
            (Vec::new(), Vec::new())
        };

        if mode == DeploymentMode::Lightweight {
            tracing::debug!("Lightweight mode: console tooling not registered");
        }

        tracing::info!(
            "Responder ready: serializer={}, include_status_code={}, relations_parameter={:?}",
            config.serializer,
            config.include_status_code,
            config.load_relations_from_parameter
        );

        let services = ResponderServices::new(
            config,
            self.serializers,
            self.response_factory,
            translator,
        )
        .with_aliases(self.aliases);

        Ok(BootedResponder {
            mode,
            services: Arc::new(services),
            publishables,
            commands,
            config_repository,
        })
    }
}

impl fmt::Debug for ResponderServiceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponderServiceProvider")
            .field("base_path", &self.base_path)
            .field("serializers", &self.serializers)
            .field("config", &self.config)
            .finish()
    }
}

/// Result of booting the provider
#[derive(Debug)]
pub struct BootedResponder {
    mode: DeploymentMode,
    services: Arc<ResponderServices>,
    publishables: Vec<Publishable>,
    commands: Vec<CommandDescriptor>,
    config_repository: ConfigRepository,
}

impl BootedResponder {
    pub fn mode(&self) -> DeploymentMode {
        self.mode
    }

    pub fn services(&self) -> &Arc<ResponderServices> {
        &self.services
    }

    pub fn config(&self) -> &ResponderConfig {
        self.services.config()
    }

    /// Repository the config was read from, with value sources
    pub fn config_repository(&self) -> &ConfigRepository {
        &self.config_repository
    }

    /// Open a request scope
    pub fn scope<R>(&self, request: R) -> RequestScope
    where
        R: crate::http::RequestInput + 'static,
    {
        self.services.scope(request)
    }

    /// Assets registered for publishing (console mode only)
    pub fn publishables(&self) -> &[Publishable] {
        &self.publishables
    }

    /// Commands registered (console mode only)
    pub fn commands(&self) -> &[CommandDescriptor] {
        &self.commands
    }

    pub fn provides(&self) -> &'static [&'static str] {
        &PROVIDES
    }
}
