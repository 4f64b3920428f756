//! Dotted-key configuration store backed by YAML values.

use crate::config::{ConfigError, ConfigSource};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Configuration values addressed by dotted keys such as `responder.serializer`
#[derive(Debug, Clone, Default)]
pub struct ConfigRepository {
    items: Mapping,
    sources: BTreeMap<String, ConfigSource>,
}

impl ConfigRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a YAML document into the repository. Top-level keys in the
    /// document replace existing ones.
    pub fn load_yaml(&mut self, content: &str, origin: &str) -> Result<(), ConfigError> {
        let document: Value =
            serde_yaml::from_str(content).map_err(|e| ConfigError::parsing(origin, e))?;

        let mapping = match document {
            Value::Mapping(mapping) => mapping,
            Value::Null => return Ok(()),
            _ => {
                return Err(ConfigError::parsing(
                    origin,
                    "expected a mapping at the top level",
                ))
            }
        };

        for (namespace, value) in mapping {
            if let (Some(namespace), Value::Mapping(children)) = (namespace.as_str(), &value) {
                for key in children.keys().filter_map(Value::as_str) {
                    self.sources.insert(
                        format!("{}.{}", namespace, key),
                        ConfigSource::File(origin.to_string()),
                    );
                }
            }
            self.items.insert(namespace, value);
        }

        Ok(())
    }

    /// Load a YAML file if it exists. Returns whether the file was found.
    pub fn load_file(&mut self, path: &Path) -> Result<bool, ConfigError> {
        if !path.exists() {
            return Ok(false);
        }

        let content = std::fs::read_to_string(path)?;
        self.load_yaml(&content, &path.display().to_string())?;
        Ok(true)
    }

    /// Look up a value by dotted key
    pub fn get(&self, key: &str) -> Option<&Value> {
        let mut segments = key.split('.');
        let mut current = self.items.get(segments.next()?)?;
        for segment in segments {
            current = current.get(segment)?;
        }
        Some(current)
    }

    /// Check whether a dotted key is present
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Set a value by dotted key, creating intermediate mappings as needed
    pub fn set(&mut self, key: &str, value: Value, source: ConfigSource) {
        let segments: Vec<&str> = key.split('.').collect();
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let mut current = &mut self.items;
        for segment in parents {
            let entry = current
                .entry(Value::String(segment.to_string()))
                .or_insert_with(|| Value::Mapping(Mapping::new()));
            if !entry.is_mapping() {
                *entry = Value::Mapping(Mapping::new());
            }
            let Some(next) = entry.as_mapping_mut() else {
                return;
            };
            current = next;
        }

        current.insert(Value::String(last.to_string()), value);
        self.sources.insert(key.to_string(), source);
    }

    /// Fill in keys missing under `namespace` from `defaults`.
    ///
    /// The merge is shallow: a key present in the application's config wins as
    /// a whole, nested mappings are not combined.
    pub fn merge_config_from(&mut self, namespace: &str, defaults: &Mapping) {
        let existing = match self.get(namespace) {
            Some(Value::Mapping(existing)) => existing.clone(),
            _ => Mapping::new(),
        };

        let mut merged = defaults.clone();
        for (key, value) in defaults {
            if existing.contains_key(key) {
                continue;
            }
            if let Some(key) = key.as_str() {
                self.sources.insert(
                    format!("{}.{}", namespace, key),
                    ConfigSource::Default(describe(value)),
                );
            }
        }
        for (key, value) in existing {
            merged.insert(key, value);
        }

        self.items
            .insert(Value::String(namespace.to_string()), Value::Mapping(merged));
    }

    /// Where the value behind a dotted key came from
    pub fn source(&self, key: &str) -> Option<&ConfigSource> {
        self.sources.get(key)
    }

    /// All recorded sources
    pub fn sources(&self) -> &BTreeMap<String, ConfigSource> {
        &self.sources
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(_) => "[...]".to_string(),
        Value::Mapping(_) => "{...}".to_string(),
        Value::Tagged(tagged) => describe(&tagged.value),
    }
}
