//! Serve command implementation for the deckhand CLI.
//!
//! Starts the tool server on stdio or HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use deckhand_core::DeckService;
use deckhand_server::{Dispatcher, Resources, ServerConfig};

/// Options collected from the command line.
pub struct Options {
    pub stdio: bool,
    pub host: String,
    pub port: u16,
    pub ui_bundle: Option<PathBuf>,
}

/// Start the tool server and run until the transport closes.
pub async fn execute(deck: DeckService, options: Options) -> anyhow::Result<()> {
    let command = deck.renderer().command();
    match command.resolve() {
        Some(path) => tracing::info!("Renderer: {} ({})", command, path.display()),
        None => tracing::warn!(
            "Renderer program '{}' not found on PATH; generation requests will fail",
            command.program
        ),
    }
    tracing::info!("Work root: {}", deck.work_root().display());

    let resources = match options.ui_bundle {
        Some(path) => Resources::new(path),
        None => Resources::default(),
    };
    if !resources.ui_bundle().exists() {
        tracing::warn!(
            "UI bundle not found at {}; pass --ui-bundle or reads of the app resource will fail",
            resources.ui_bundle().display()
        );
    }

    let dispatcher = Arc::new(Dispatcher::new(deck, resources));

    if options.stdio {
        tracing::info!("Serving on stdio");
        deckhand_server::serve_stdio(dispatcher).await?;
    } else {
        let config = ServerConfig {
            host: options.host,
            port: options.port,
        };
        deckhand_server::serve_http(dispatcher, config).await?;
    }

    Ok(())
}
