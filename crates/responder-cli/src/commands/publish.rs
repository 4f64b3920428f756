use anyhow::Context;
use elif_responder::{default_publishables, publish, PublishOutcome};
use std::path::Path;

/// Copy the shipped config and language files into the application
pub fn run(base_path: &Path, tags: &[String], force: bool) -> anyhow::Result<Vec<PublishOutcome>> {
    let publishables = default_publishables();

    if let Some(unknown) = tags
        .iter()
        .find(|tag| !publishables.iter().any(|p| p.tag == tag.as_str()))
    {
        let known: Vec<_> = publishables.iter().map(|p| p.tag).collect();
        anyhow::bail!("Unknown tag '{}'. Available tags: {}", unknown, known.join(", "));
    }

    let outcomes = publish(&publishables, base_path, tags, force)
        .with_context(|| format!("Failed to publish into {}", base_path.display()))?;

    for outcome in &outcomes {
        match outcome {
            PublishOutcome::Copied(path) => println!("Copied {}", path.display()),
            PublishOutcome::Skipped(path) => println!("Skipped {} (already exists)", path.display()),
        }
    }

    Ok(outcomes)
}
