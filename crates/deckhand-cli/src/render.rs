//! Render command implementation for the deckhand CLI.
//!
//! Runs the generation pipeline once, outside any server.

use std::path::Path;

use deckhand_core::{DeckService, GenerateParams, Invocation, OutputFormat, Theme};

/// Render `file` and print the staging directory followed by the artifacts.
pub async fn execute(
    deck: &DeckService,
    file: &Path,
    format: OutputFormat,
    theme: Theme,
) -> anyhow::Result<()> {
    if !file.exists() {
        anyhow::bail!("Slide file not found: {}", file.display());
    }
    let text = tokio::fs::read_to_string(file).await?;

    let invocation = Invocation::new(GenerateParams::new(text, theme), format);
    let rendered = deck.run(invocation).await?;

    println!("{}", rendered.dir.path().display());
    match format {
        OutputFormat::Images => {
            let count = rendered.result.images().count();
            eprintln!("Rendered {} slide image(s) with theme {}", count, theme);
        }
        OutputFormat::Pdf | OutputFormat::Pptx => {
            eprintln!(
                "Rendered {} with theme {}",
                rendered.dir.join(format.output_target()).display(),
                theme
            );
        }
    }

    Ok(())
}
