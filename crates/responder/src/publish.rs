//! Copying shipped assets into an application

use crate::assets::{CONFIG_TARGET, DEFAULT_CONFIG, DEFAULT_ERRORS_LANG, LANG_TARGET};
use crate::errors::ResponderResult;
use std::fs;
use std::path::{Path, PathBuf};

/// Tag of the config file publishable
pub const CONFIG_TAG: &str = "config";
/// Tag of the language file publishable
pub const LANG_TAG: &str = "lang";

/// A shipped file and where it lands in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Publishable {
    pub tag: &'static str,
    pub contents: &'static str,
    /// Path relative to the application base path
    pub target: &'static str,
}

/// The config file and the English error messages
pub fn default_publishables() -> Vec<Publishable> {
    vec![
        Publishable {
            tag: CONFIG_TAG,
            contents: DEFAULT_CONFIG,
            target: CONFIG_TARGET,
        },
        Publishable {
            tag: LANG_TAG,
            contents: DEFAULT_ERRORS_LANG,
            target: LANG_TARGET,
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Copied(PathBuf),
    /// Target already existed and `force` was not set
    Skipped(PathBuf),
}

impl PublishOutcome {
    pub fn path(&self) -> &Path {
        match self {
            PublishOutcome::Copied(path) | PublishOutcome::Skipped(path) => path,
        }
    }

    pub fn is_copied(&self) -> bool {
        matches!(self, PublishOutcome::Copied(_))
    }
}

/// Copy publishables into `base_path`.
///
/// An empty `tags` slice publishes everything. Existing files are left
/// alone unless `force` is set.
pub fn publish(
    publishables: &[Publishable],
    base_path: &Path,
    tags: &[String],
    force: bool,
) -> ResponderResult<Vec<PublishOutcome>> {
    let mut outcomes = Vec::new();

    for publishable in publishables
        .iter()
        .filter(|p| tags.is_empty() || tags.iter().any(|tag| tag == p.tag))
    {
        let path = base_path.join(publishable.target);

        if path.exists() && !force {
            tracing::warn!("Skipping {}: file exists (use --force to overwrite)", path.display());
            outcomes.push(PublishOutcome::Skipped(path));
            continue;
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, publishable.contents)?;
        tracing::info!("Published [{}] to {}", publishable.tag, path.display());
        outcomes.push(PublishOutcome::Copied(path));
    }

    Ok(outcomes)
}
