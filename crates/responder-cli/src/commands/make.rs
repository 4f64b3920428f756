use anyhow::Context;
use elif_responder::TransformerScaffold;
use std::path::{Path, PathBuf};

/// Generate `src/transformers/<name>.rs`
pub fn transformer(
    name: &str,
    model: Option<&str>,
    base_path: &Path,
    force: bool,
) -> anyhow::Result<PathBuf> {
    let scaffold = TransformerScaffold::new(name, model)?;
    let path = scaffold
        .write(base_path, force)
        .with_context(|| format!("Failed to create {}", scaffold.name()))?;

    println!("Transformer created: {}", path.display());
    Ok(path)
}
