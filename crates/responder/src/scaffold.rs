//! `make:transformer` file generation

use crate::assets::TRANSFORMER_STUB;
use crate::errors::{ResponderError, ResponderResult};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tinytemplate::TinyTemplate;

const SUFFIX: &str = "Transformer";
const TEMPLATE_NAME: &str = "transformer";

#[derive(Serialize)]
struct StubContext<'a> {
    name: &'a str,
    model: &'a str,
}

/// A transformer file to generate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformerScaffold {
    name: String,
    model: String,
}

impl TransformerScaffold {
    /// `name` may be given in snake or camel case, with or without the
    /// `Transformer` suffix. `model` defaults to the name without the suffix.
    pub fn new(name: &str, model: Option<&str>) -> ResponderResult<Self> {
        let base = to_camel_case(name)?;
        let base = base.strip_suffix(SUFFIX).unwrap_or(&base).to_string();
        if base.is_empty() {
            return Err(ResponderError::InvalidName {
                name: name.to_string(),
                reason: "a name is required in front of the Transformer suffix".to_string(),
            });
        }

        let model = match model {
            Some(model) => to_camel_case(model)?,
            None => base.clone(),
        };

        Ok(Self {
            name: format!("{}{}", base, SUFFIX),
            model,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Path relative to the application base path
    pub fn relative_path(&self) -> PathBuf {
        Path::new("src")
            .join("transformers")
            .join(format!("{}.rs", to_snake_case(&self.name)))
    }

    pub fn render(&self) -> ResponderResult<String> {
        let mut template = TinyTemplate::new();
        template.set_default_formatter(&tinytemplate::format_unescaped);
        template
            .add_template(TEMPLATE_NAME, TRANSFORMER_STUB)
            .map_err(|e| ResponderError::template(e.to_string()))?;

        let context = StubContext {
            name: &self.name,
            model: &self.model,
        };
        template
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| ResponderError::template(e.to_string()))
    }

    /// Write the file under `base_path`, returning its path
    pub fn write(&self, base_path: &Path, force: bool) -> ResponderResult<PathBuf> {
        let path = base_path.join(self.relative_path());
        if path.exists() && !force {
            return Err(ResponderError::AlreadyExists { path });
        }

        let content = self.render()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;

        tracing::info!("Created transformer {} at {}", self.name, path.display());
        Ok(path)
    }
}

fn to_camel_case(name: &str) -> ResponderResult<String> {
    let invalid = |reason: &str| ResponderError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(invalid("name is empty"));
    }
    if !trimmed.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(invalid("must start with a letter"));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(invalid("only letters, digits, '_' and '-' are allowed"));
    }

    Ok(trimmed
        .split(|c| c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect())
}

fn to_snake_case(name: &str) -> String {
    let mut snake = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                snake.push('_');
            }
            snake.push(c.to_ascii_lowercase());
        } else {
            snake.push(c);
        }
    }
    snake
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_normalization() {
        let scaffold = TransformerScaffold::new("blog_post", None).unwrap();
        assert_eq!(scaffold.name(), "BlogPostTransformer");
        assert_eq!(scaffold.model(), "BlogPost");
        assert_eq!(
            scaffold.relative_path(),
            PathBuf::from("src/transformers/blog_post_transformer.rs")
        );

        let scaffold = TransformerScaffold::new("UserTransformer", Some("account")).unwrap();
        assert_eq!(scaffold.name(), "UserTransformer");
        assert_eq!(scaffold.model(), "Account");
    }

    #[test]
    fn test_invalid_names() {
        assert!(matches!(
            TransformerScaffold::new("", None),
            Err(ResponderError::InvalidName { .. })
        ));
        assert!(TransformerScaffold::new("1post", None).is_err());
        assert!(TransformerScaffold::new("post/comment", None).is_err());
        assert!(TransformerScaffold::new("Transformer", None).is_err());
    }

    #[test]
    fn test_render() {
        let rendered = TransformerScaffold::new("post", None).unwrap().render().unwrap();
        assert!(rendered.contains("pub struct PostTransformer;"));
        assert!(rendered.contains("impl Transformer for PostTransformer {"));
        assert!(rendered.contains("/// Shapes `Post` values for API responses."));
        assert!(rendered.contains("use elif_responder::{Resource, Transformer};"));
    }

    #[test]
    fn test_write_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let scaffold = TransformerScaffold::new("post", None).unwrap();

        let path = scaffold.write(dir.path(), false).unwrap();
        assert!(path.ends_with("src/transformers/post_transformer.rs"));

        assert!(matches!(
            scaffold.write(dir.path(), false),
            Err(ResponderError::AlreadyExists { .. })
        ));
        assert!(scaffold.write(dir.path(), true).is_ok());
    }
}
