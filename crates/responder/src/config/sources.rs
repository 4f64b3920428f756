use std::fmt;

/// Where a responder setting came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `RESPONDER_*` environment variable, by name
    EnvVar(String),
    /// Shipped default, with the value it supplied
    Default(String),
    /// Application config file, by path or origin label
    File(String),
    /// Set from code through `ConfigRepository::set`
    Programmatic,
}

impl ConfigSource {
    pub fn is_env_var(&self) -> bool {
        matches!(self, ConfigSource::EnvVar(_))
    }

    pub fn is_default(&self) -> bool {
        matches!(self, ConfigSource::Default(_))
    }

    pub fn is_file(&self) -> bool {
        matches!(self, ConfigSource::File(_))
    }

    /// Load order rank; a higher rank overrides a lower one
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default(_) => 0,
            ConfigSource::File(_) => 1,
            ConfigSource::EnvVar(_) => 2,
            ConfigSource::Programmatic => 3,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::EnvVar(var) => write!(f, "env {}", var),
            ConfigSource::Default(value) => write!(f, "shipped default ({})", value),
            ConfigSource::File(origin) => write!(f, "file {}", origin),
            ConfigSource::Programmatic => f.write_str("set in code"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_follows_load_order() {
        let default = ConfigSource::Default("api".to_string());
        let file = ConfigSource::File("config/responder.yaml".to_string());
        let env = ConfigSource::EnvVar("RESPONDER_SERIALIZER".to_string());

        assert!(default.precedence() < file.precedence());
        assert!(file.precedence() < env.precedence());
        assert_eq!(env.to_string(), "env RESPONDER_SERIALIZER");
        assert_eq!(default.to_string(), "shipped default (api)");
    }
}
