//! CLI command implementations.
//!
//! Each `run_*` function backs one `docsum` subcommand and prints to stdout.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use docsum_core::models::UploadedDocument;
use docsum_core::store::ArtifactStore;

use crate::config::Config;
use crate::fs_store::FsArtifactStore;
use crate::pipeline::Pipeline;

/// `docsum summarize <file>`: runs the full pipeline on a local file.
pub async fn run_summarize(config: &Config, path: &Path) -> Result<()> {
    let raw_bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let pipeline = Pipeline::from_config(config)?;
    let result = pipeline
        .process(UploadedDocument::new(filename, raw_bytes))
        .await
        .with_context(|| format!("Failed to summarize {}", path.display()))?;

    println!("--- Summary ---");
    println!("{}", result.summary_text);
    println!();
    println!("artifact: {}", result.artifact_name);
    println!(
        "path:     {}",
        config
            .storage
            .output_dir
            .join(&result.artifact_name)
            .display()
    );
    println!("source:   {}", result.original_filename);

    Ok(())
}

/// `docsum get <name>`: prints a stored artifact verbatim.
pub async fn run_get(config: &Config, name: &str) -> Result<()> {
    let store = FsArtifactStore::from_config(config);
    let bytes = store.retrieve(name).await?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&bytes)?;
    if !bytes.ends_with(b"\n") {
        writeln!(stdout)?;
    }
    Ok(())
}

/// `docsum list`: prints artifact names, oldest first.
pub async fn run_list(config: &Config) -> Result<()> {
    let store = FsArtifactStore::from_config(config);
    let names = store.list().await?;

    if names.is_empty() {
        println!("No artifacts in {}.", store.root().display());
        return Ok(());
    }

    for name in &names {
        println!("{}", name);
    }
    println!();
    println!("{} artifact(s) in {}", names.len(), store.root().display());
    Ok(())
}
