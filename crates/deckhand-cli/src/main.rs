//! deckhand CLI - Slide deck generation server.

mod prune;
mod render;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use deckhand_core::{DeckService, OutputFormat, Renderer, RendererCommand, Theme, WorkRoot};

#[derive(Parser)]
#[command(name = "deckhand")]
#[command(about = "Render slide decks to images, PDF or PPTX for calling agents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding one staging directory per invocation
    #[arg(long, global = true, env = "DECKHAND_WORK_DIR")]
    work_dir: Option<PathBuf>,

    /// Renderer command line; per-invocation arguments are appended
    #[arg(
        long,
        global = true,
        env = "DECKHAND_RENDERER",
        default_value = "npx slidev export"
    )]
    renderer: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the generation tools over HTTP (default) or stdio
    Serve {
        /// Speak newline-delimited JSON-RPC on stdin/stdout instead of HTTP
        #[arg(long)]
        stdio: bool,

        /// Host address to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value = "8000")]
        port: u16,

        /// Mini-app bundle served as the UI resource. Defaults to ui/index.html
        /// next to the executable, then ../share/deckhand/ui/index.html
        #[arg(long, env = "DECKHAND_UI_BUNDLE")]
        ui_bundle: Option<PathBuf>,
    },

    /// Render a slide file once and print where the output landed
    Render {
        /// Path to the slide markdown
        file: PathBuf,

        /// Output format: images, pdf or pptx
        #[arg(short, long, default_value = "images")]
        format: OutputFormat,

        /// Slide theme
        #[arg(short, long, default_value = "default")]
        theme: Theme,
    },

    /// Delete staging directories older than the given age
    Prune {
        /// Minimum age, in hours, of directories to delete
        #[arg(long, default_value = "24")]
        older_than_hours: u64,
    },
}

impl Cli {
    fn work_root(&self) -> WorkRoot {
        let path = self.work_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("deckhand")
        });
        WorkRoot::new(path)
    }

    fn deck_service(&self) -> anyhow::Result<DeckService> {
        let command = RendererCommand::parse(&self.renderer)?;
        Ok(DeckService::new(self.work_root(), Renderer::new(command)))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging. Always stderr: stdout carries protocol traffic in
    // stdio mode.
    let default_level = match (&cli.command, cli.verbose) {
        (_, true) => tracing::Level::DEBUG,
        (Commands::Serve { .. }, false) => tracing::Level::INFO,
        (_, false) => tracing::Level::WARN,
    };
    let filter =
        tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Helper to format deckhand-core errors with recovery hints
    let format_error = |err: anyhow::Error| -> anyhow::Error {
        if let Some(deck_err) = err.downcast_ref::<deckhand_core::Error>() {
            anyhow::anyhow!("{}", deck_err.with_hint())
        } else {
            err
        }
    };

    match &cli.command {
        Commands::Serve {
            stdio,
            host,
            port,
            ui_bundle,
        } => {
            let deck = cli.deck_service().map_err(format_error)?;
            let options = serve::Options {
                stdio: *stdio,
                host: host.clone(),
                port: *port,
                ui_bundle: ui_bundle.clone(),
            };
            serve::execute(deck, options).await.map_err(format_error)?;
        }

        Commands::Render {
            file,
            format,
            theme,
        } => {
            let deck = cli.deck_service().map_err(format_error)?;
            render::execute(&deck, file, *format, *theme)
                .await
                .map_err(format_error)?;
        }

        Commands::Prune { older_than_hours } => {
            prune::execute(&cli.work_root(), *older_than_hours).map_err(format_error)?;
        }
    }

    Ok(())
}
