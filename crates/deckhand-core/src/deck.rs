//! The generation pipeline: stage, render, collect, package.

use std::path::Path;
use std::time::Instant;

use crate::collect::{collect_document, collect_images};
use crate::envelope::{GenerateParams, ToolResult};
use crate::error::{Error, Result};
use crate::package::{package_document, package_error, package_images};
use crate::paths::{ExecutionId, StagingDir, WorkRoot};
use crate::render::{OutputFormat, Renderer};

/// One end-to-end generation request.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub id: ExecutionId,
    pub params: GenerateParams,
    pub format: OutputFormat,
}

impl Invocation {
    /// A new invocation with a freshly generated identifier.
    pub fn new(params: GenerateParams, format: OutputFormat) -> Self {
        Self {
            id: ExecutionId::new(),
            params,
            format,
        }
    }
}

/// Outcome of a successful invocation, before it is flattened into a
/// [`ToolResult`].
#[derive(Debug)]
pub struct Rendered {
    pub dir: StagingDir,
    pub result: ToolResult,
}

/// Runs generation requests against a work root and a renderer.
///
/// Holds no per-invocation state, so a single service can be shared by any
/// number of concurrent callers.
#[derive(Debug, Clone)]
pub struct DeckService {
    root: WorkRoot,
    renderer: Renderer,
}

impl DeckService {
    pub fn new(root: WorkRoot, renderer: Renderer) -> Self {
        Self { root, renderer }
    }

    pub fn work_root(&self) -> &Path {
        self.root.path()
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Run one invocation, converting any failure into an error-flagged
    /// result. Never fails. Paths in the message are relative to the work
    /// root.
    pub async fn generate(&self, params: GenerateParams, format: OutputFormat) -> ToolResult {
        let invocation = Invocation::new(params, format);
        let id = invocation.id;
        match self.run(invocation).await {
            Ok(rendered) => rendered.result,
            Err(e) => {
                tracing::error!(execution_id = %id, format = %format, kind = e.kind(), "generation failed: {e}");
                package_error(&e.scoped_to(self.root.path()))
            }
        }
    }

    /// Run one invocation, returning the typed error on failure.
    pub async fn run(&self, invocation: Invocation) -> Result<Rendered> {
        let Invocation { id, params, format } = invocation;
        if params.text.trim().is_empty() {
            return Err(Error::InvalidInput("slide text must not be empty".to_string()));
        }

        let start = Instant::now();
        tracing::info!(execution_id = %id, format = %format, theme = %params.theme, "start");

        let dir = self.root.stage(id).await?;
        self.renderer
            .render(&dir, &params.text, params.theme, format)
            .await?;

        let result = match format {
            OutputFormat::Images => {
                let images = collect_images(&dir).await?;
                package_images(&dir, &params, images)
            }
            OutputFormat::Pdf | OutputFormat::Pptx => {
                let document = collect_document(&dir, format).await?;
                package_document(&dir, document)
            }
        };

        tracing::info!(
            execution_id = %id,
            format = %format,
            parts = result.content.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "ok"
        );
        Ok(Rendered { dir, result })
    }
}
