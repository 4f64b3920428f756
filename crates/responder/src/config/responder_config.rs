use crate::assets::{CONFIG_NAMESPACE, CONFIG_TARGET, DEFAULT_CONFIG};
use crate::config::{parse_bool, ConfigError, ConfigRepository, ConfigSource};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::HashMap;
use std::env;
use std::path::Path;

/// Environment variable overriding `responder.serializer`
pub const ENV_SERIALIZER: &str = "RESPONDER_SERIALIZER";
/// Environment variable overriding `responder.include_status_code`
pub const ENV_INCLUDE_STATUS_CODE: &str = "RESPONDER_INCLUDE_STATUS_CODE";
/// Environment variable overriding `responder.load_relations_from_parameter`
pub const ENV_LOAD_RELATIONS: &str = "RESPONDER_LOAD_RELATIONS_FROM_PARAMETER";
/// Environment variable overriding `responder.locale`
pub const ENV_LOCALE: &str = "RESPONDER_LOCALE";

/// Settings read by the responder bindings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponderConfig {
    /// Identifier of the serializer shaping success responses
    pub serializer: String,
    /// Whether response bodies carry the HTTP status code
    pub include_status_code: bool,
    /// Request parameter naming the relations to include
    pub load_relations_from_parameter: Option<String>,
    pub locale: String,
    pub fallback_locale: String,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            serializer: "api".to_string(),
            include_status_code: true,
            load_relations_from_parameter: Some("with".to_string()),
            locale: "en".to_string(),
            fallback_locale: "en".to_string(),
        }
    }
}

impl ResponderConfig {
    /// Load the config the way the provider does at boot: the application's
    /// file (if any) under `base_path`, shipped defaults for missing keys,
    /// then environment overrides.
    pub fn load(base_path: &Path) -> Result<(Self, ConfigRepository), ConfigError> {
        let mut repository = ConfigRepository::new();
        let path = base_path.join(CONFIG_TARGET);
        if repository.load_file(&path)? {
            tracing::debug!("Loaded responder config from {}", path.display());
        }

        merge_defaults(&mut repository)?;
        apply_env_overrides(&mut repository)?;

        let config = Self::from_repository(&repository)?;
        config.validate()?;
        Ok((config, repository))
    }

    /// Read the `responder` namespace out of a repository
    pub fn from_repository(repository: &ConfigRepository) -> Result<Self, ConfigError> {
        let section = repository
            .get(CONFIG_NAMESPACE)
            .cloned()
            .unwrap_or(Value::Null);

        let mut config: Self = if section.is_null() {
            Self::default()
        } else {
            serde_yaml::from_value(section).map_err(|e| ConfigError::parsing(CONFIG_NAMESPACE, e))?
        };

        if config
            .load_relations_from_parameter
            .as_deref()
            .is_some_and(|parameter| parameter.trim().is_empty())
        {
            config.load_relations_from_parameter = None;
        }

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.serializer.trim().is_empty() {
            return Err(ConfigError::missing_required(
                "responder.serializer",
                "Set it to a registered serializer such as 'api'",
            ));
        }

        for (field, value) in [
            ("responder.locale", &self.locale),
            ("responder.fallback_locale", &self.fallback_locale),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::invalid_value(field, value, "a locale such as 'en'"));
            }
        }

        Ok(())
    }

    /// Report where each value came from
    pub fn config_sources(repository: &ConfigRepository) -> HashMap<String, ConfigSource> {
        repository
            .sources()
            .iter()
            .filter(|(key, _)| key.starts_with("responder."))
            .map(|(key, source)| (key.clone(), source.clone()))
            .collect()
    }
}

/// Merge the shipped defaults under the `responder` namespace
pub fn merge_defaults(repository: &mut ConfigRepository) -> Result<(), ConfigError> {
    let mut shipped = ConfigRepository::new();
    shipped.load_yaml(DEFAULT_CONFIG, "shipped defaults")?;

    let defaults = shipped
        .get(CONFIG_NAMESPACE)
        .and_then(Value::as_mapping)
        .cloned()
        .unwrap_or_default();

    repository.merge_config_from(CONFIG_NAMESPACE, &defaults);
    Ok(())
}

/// Apply `RESPONDER_*` environment overrides
pub fn apply_env_overrides(repository: &mut ConfigRepository) -> Result<(), ConfigError> {
    if let Ok(serializer) = env::var(ENV_SERIALIZER) {
        repository.set(
            "responder.serializer",
            Value::String(serializer),
            ConfigSource::EnvVar(ENV_SERIALIZER.to_string()),
        );
    }

    if let Ok(flag) = env::var(ENV_INCLUDE_STATUS_CODE) {
        let flag = parse_bool("responder.include_status_code", &flag)?;
        repository.set(
            "responder.include_status_code",
            Value::Bool(flag),
            ConfigSource::EnvVar(ENV_INCLUDE_STATUS_CODE.to_string()),
        );
    }

    if let Ok(parameter) = env::var(ENV_LOAD_RELATIONS) {
        let value = if parameter.trim().is_empty() {
            Value::Null
        } else {
            Value::String(parameter)
        };
        repository.set(
            "responder.load_relations_from_parameter",
            value,
            ConfigSource::EnvVar(ENV_LOAD_RELATIONS.to_string()),
        );
    }

    if let Ok(locale) = env::var(ENV_LOCALE) {
        repository.set(
            "responder.locale",
            Value::String(locale),
            ConfigSource::EnvVar(ENV_LOCALE.to_string()),
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for var in [ENV_SERIALIZER, ENV_INCLUDE_STATUS_CODE, ENV_LOAD_RELATIONS, ENV_LOCALE] {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_default_matches_shipped_file() {
        let mut repository = ConfigRepository::new();
        merge_defaults(&mut repository).unwrap();
        let shipped = ResponderConfig::from_repository(&repository).unwrap();
        assert_eq!(shipped, ResponderConfig::default());
    }

    #[test]
    #[serial]
    fn test_load_without_application_file_uses_defaults() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let (config, repository) = ResponderConfig::load(dir.path()).unwrap();

        assert_eq!(config, ResponderConfig::default());
        let sources = ResponderConfig::config_sources(&repository);
        assert!(sources["responder.serializer"].is_default());
    }

    #[test]
    #[serial]
    fn test_application_file_overrides_defaults() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("config")).unwrap();
        std::fs::write(
            dir.path().join(CONFIG_TARGET),
            "responder:\n  serializer: array\n  load_relations_from_parameter: null\n",
        )
        .unwrap();

        let (config, repository) = ResponderConfig::load(dir.path()).unwrap();
        assert_eq!(config.serializer, "array");
        assert_eq!(config.load_relations_from_parameter, None);
        assert!(config.include_status_code);
        assert!(repository.source("responder.serializer").unwrap().is_file());
    }

    #[test]
    #[serial]
    fn test_env_overrides_win() {
        clear_env();
        env::set_var(ENV_SERIALIZER, "data_array");
        env::set_var(ENV_INCLUDE_STATUS_CODE, "false");
        env::set_var(ENV_LOAD_RELATIONS, "");

        let dir = tempfile::tempdir().unwrap();
        let result = ResponderConfig::load(dir.path());
        clear_env();

        let (config, repository) = result.unwrap();
        assert_eq!(config.serializer, "data_array");
        assert!(!config.include_status_code);
        assert_eq!(config.load_relations_from_parameter, None);
        assert!(repository
            .source("responder.include_status_code")
            .unwrap()
            .is_env_var());
    }

    #[test]
    #[serial]
    fn test_invalid_env_flag_is_rejected() {
        clear_env();
        env::set_var(ENV_INCLUDE_STATUS_CODE, "sometimes");
        let dir = tempfile::tempdir().unwrap();
        let result = ResponderConfig::load(dir.path());
        clear_env();

        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_validate_rejects_empty_values() {
        let mut config = ResponderConfig::default();
        config.serializer = " ".to_string();
        assert!(config.validate().is_err());

        let mut config = ResponderConfig::default();
        config.locale = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_relation_parameter_means_disabled() {
        let mut repository = ConfigRepository::new();
        repository
            .load_yaml("responder:\n  load_relations_from_parameter: ''\n", "inline")
            .unwrap();
        let config = ResponderConfig::from_repository(&repository).unwrap();
        assert_eq!(config.load_relations_from_parameter, None);
    }
}
