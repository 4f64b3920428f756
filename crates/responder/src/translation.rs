//! Translation of error messages

use crate::assets::DEFAULT_ERRORS_LANG;
use crate::errors::ResponderResult;
use serde_yaml::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Resolves `group.key` lines for the current locale
pub trait Translator: Send + Sync {
    fn translate(&self, key: &str, parameters: &BTreeMap<String, String>) -> Option<String>;

    fn locale(&self) -> &str;
}

/// Translator backed by YAML language files, one file per group and locale
/// (`lang/<locale>/<group>.yaml`).
#[derive(Debug, Clone)]
pub struct LangTranslator {
    locale: String,
    fallback_locale: String,
    lines: HashMap<String, HashMap<String, String>>,
}

impl LangTranslator {
    /// An empty translator
    pub fn new(locale: impl Into<String>, fallback_locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            fallback_locale: fallback_locale.into(),
            lines: HashMap::new(),
        }
    }

    /// A translator holding the shipped English error messages
    pub fn with_defaults(
        locale: impl Into<String>,
        fallback_locale: impl Into<String>,
    ) -> ResponderResult<Self> {
        let mut translator = Self::new(locale, fallback_locale);
        translator.add_lines("en", "errors", DEFAULT_ERRORS_LANG)?;
        Ok(translator)
    }

    /// Add lines from a YAML document. Nested keys are joined with dots.
    pub fn add_lines(&mut self, locale: &str, group: &str, content: &str) -> ResponderResult<()> {
        let document: Value = serde_yaml::from_str(content)?;
        let lines = self.lines.entry(locale.to_string()).or_default();
        flatten(group, &document, lines);
        Ok(())
    }

    /// Load `<lang_dir>/<locale>/<group>.yaml` files. Returns how many were read.
    pub fn load_directory(&mut self, lang_dir: &Path) -> ResponderResult<usize> {
        if !lang_dir.is_dir() {
            return Ok(0);
        }

        let mut loaded = 0;
        for locale_entry in std::fs::read_dir(lang_dir)? {
            let locale_path = locale_entry?.path();
            let Some(locale) = locale_path.file_name().and_then(|s| s.to_str()).map(str::to_string)
            else {
                continue;
            };
            if !locale_path.is_dir() {
                continue;
            }

            for file_entry in std::fs::read_dir(&locale_path)? {
                let path = file_entry?.path();
                let is_yaml = path
                    .extension()
                    .is_some_and(|ext| ext == "yaml" || ext == "yml");
                let Some(group) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                if !is_yaml {
                    continue;
                }

                let content = std::fs::read_to_string(&path)?;
                self.add_lines(&locale, group, &content)?;
                tracing::debug!("Loaded language lines from {}", path.display());
                loaded += 1;
            }
        }

        Ok(loaded)
    }

    pub fn set_locale(&mut self, locale: impl Into<String>) {
        self.locale = locale.into();
    }

    pub fn fallback_locale(&self) -> &str {
        &self.fallback_locale
    }

    /// Check whether a line exists in the current or fallback locale
    pub fn has(&self, key: &str) -> bool {
        self.line(key).is_some()
    }

    fn line(&self, key: &str) -> Option<&String> {
        [&self.locale, &self.fallback_locale]
            .into_iter()
            .find_map(|locale| self.lines.get(locale).and_then(|lines| lines.get(key)))
    }
}

impl Translator for LangTranslator {
    fn translate(&self, key: &str, parameters: &BTreeMap<String, String>) -> Option<String> {
        let line = self.line(key)?;
        Some(replace_placeholders(line, parameters))
    }

    fn locale(&self) -> &str {
        &self.locale
    }
}

fn flatten(prefix: &str, value: &Value, lines: &mut HashMap<String, String>) {
    match value {
        Value::Mapping(mapping) => {
            for (key, child) in mapping {
                if let Some(key) = key.as_str() {
                    flatten(&format!("{}.{}", prefix, key), child, lines);
                }
            }
        }
        Value::String(line) => {
            lines.insert(prefix.to_string(), line.clone());
        }
        Value::Number(n) => {
            lines.insert(prefix.to_string(), n.to_string());
        }
        Value::Bool(b) => {
            lines.insert(prefix.to_string(), b.to_string());
        }
        _ => {}
    }
}

/// Replace `:name`, `:Name` and `:NAME` placeholders. Longer names are
/// replaced first so `:attribute_name` is not clobbered by `:attribute`.
fn replace_placeholders(line: &str, parameters: &BTreeMap<String, String>) -> String {
    let mut ordered: Vec<(&String, &String)> = parameters.iter().collect();
    ordered.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut result = line.to_string();
    for (name, value) in ordered {
        result = result
            .replace(&format!(":{}", name.to_uppercase()), &value.to_uppercase())
            .replace(&format!(":{}", upper_first(name)), &upper_first(value))
            .replace(&format!(":{}", name), value);
    }
    result
}

fn upper_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
