//! Renderer invocation.
//!
//! The rendering engine is an external command (Slidev's `export` by
//! default). It is run once per invocation with the staging directory as its
//! working directory, and its output streams are captured rather than
//! forwarded to the server's console.

use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::process::Command;

use crate::error::{Error, Result};
use crate::paths::StagingDir;

/// File name the input document is written to inside the staging directory.
pub const INPUT_FILE: &str = "slides.md";

/// Directory (relative to the staging directory) receiving image exports.
pub const IMAGE_DIR: &str = "export";

/// Maximum number of stderr bytes kept in a render error.
const STDERR_TAIL: usize = 2048;

/// Slide theme passed to the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    Default,
    Seriph,
    AppleBasic,
    Bricks,
    Shibainu,
}

impl Theme {
    /// All supported themes, in display order.
    pub const ALL: [Theme; 5] = [
        Theme::Default,
        Theme::Seriph,
        Theme::AppleBasic,
        Theme::Bricks,
        Theme::Shibainu,
    ];

    /// Name understood by the renderer.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Seriph => "seriph",
            Theme::AppleBasic => "apple-basic",
            Theme::Bricks => "bricks",
            Theme::Shibainu => "shibainu",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Theme::ALL
            .into_iter()
            .find(|theme| theme.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown theme '{s}'")))
    }
}

/// What the renderer should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One PNG per slide under [`IMAGE_DIR`].
    Images,
    /// A single PDF document.
    Pdf,
    /// A single PowerPoint document.
    Pptx,
}

impl OutputFormat {
    /// Value of the renderer's `--format` flag.
    pub fn renderer_format(self) -> &'static str {
        match self {
            OutputFormat::Images => "png",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Pptx => "pptx",
        }
    }

    /// Output target relative to the staging directory.
    pub fn output_target(self) -> &'static str {
        match self {
            OutputFormat::Images => IMAGE_DIR,
            OutputFormat::Pdf => "slides-export.pdf",
            OutputFormat::Pptx => "slides-export.pptx",
        }
    }

    /// Name of the operation that produces this format.
    pub fn tool_name(self) -> &'static str {
        match self {
            OutputFormat::Images => "generate_images",
            OutputFormat::Pdf => "generate_pdf",
            OutputFormat::Pptx => "generate_pptx",
        }
    }

    /// Inverse of [`OutputFormat::tool_name`].
    pub fn from_tool_name(name: &str) -> Option<Self> {
        [OutputFormat::Images, OutputFormat::Pdf, OutputFormat::Pptx]
            .into_iter()
            .find(|format| format.tool_name() == name)
    }

    /// MIME type of the produced artifact(s).
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Images => "image/png",
            OutputFormat::Pdf => "application/pdf",
            OutputFormat::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.renderer_format())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "images" | "png" => Ok(OutputFormat::Images),
            "pdf" => Ok(OutputFormat::Pdf),
            "pptx" => Ok(OutputFormat::Pptx),
            other => Err(Error::InvalidInput(format!("unknown output format '{other}'"))),
        }
    }
}

/// Command line used to start the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererCommand {
    /// Executable to run.
    pub program: String,
    /// Arguments placed before the per-invocation arguments.
    pub args: Vec<String>,
}

impl RendererCommand {
    /// Build a command from a program and its leading arguments.
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a whitespace-separated command line such as `npx slidev export`.
    pub fn parse(command_line: &str) -> Result<Self> {
        let mut parts = command_line.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| Error::InvalidInput("renderer command is empty".to_string()))?;
        Ok(Self::new(program, parts))
    }

    /// Locate the program on `PATH`, if it can be found.
    pub fn resolve(&self) -> Option<PathBuf> {
        which::which(&self.program).ok()
    }
}

impl Default for RendererCommand {
    fn default() -> Self {
        Self::new("npx", ["slidev", "export"])
    }
}

impl fmt::Display for RendererCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Runs the external renderer inside a staging directory.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    command: RendererCommand,
}

impl Renderer {
    /// Create a renderer using `command`.
    pub fn new(command: RendererCommand) -> Self {
        Self { command }
    }

    /// The configured command.
    pub fn command(&self) -> &RendererCommand {
        &self.command
    }

    /// Write `text` into `dir` and run the renderer to completion.
    ///
    /// No timeout is applied; a hung renderer only blocks this invocation.
    pub async fn render(
        &self,
        dir: &StagingDir,
        text: &str,
        theme: Theme,
        format: OutputFormat,
    ) -> Result<()> {
        let input = dir.join(INPUT_FILE);
        tokio::fs::write(&input, text)
            .await
            .map_err(|source| Error::Staging {
                path: input.clone(),
                source,
            })?;

        let start = Instant::now();
        tracing::debug!(
            execution_id = %dir.id(),
            command = %self.command,
            format = %format,
            theme = %theme,
            "starting renderer"
        );

        let output = Command::new(&self.command.program)
            .args(&self.command.args)
            .arg(INPUT_FILE)
            .args(["--format", format.renderer_format()])
            .args(["--output", format.output_target()])
            .args(["--theme", theme.as_str()])
            .current_dir(dir.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| Error::Spawn {
                program: self.command.program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stdout.trim().is_empty() {
            tracing::debug!(execution_id = %dir.id(), "renderer stdout: {}", stdout.trim());
        }
        if !stderr.trim().is_empty() {
            tracing::debug!(execution_id = %dir.id(), "renderer stderr: {}", stderr.trim());
        }

        if !output.status.success() {
            tracing::warn!(
                execution_id = %dir.id(),
                status = ?output.status.code(),
                elapsed_ms = start.elapsed().as_millis(),
                "renderer failed"
            );
            return Err(Error::Render {
                code: output.status.code(),
                stderr: tail(stderr.trim(), STDERR_TAIL).to_string(),
            });
        }

        tracing::debug!(
            execution_id = %dir.id(),
            elapsed_ms = start.elapsed().as_millis(),
            "renderer finished"
        );
        Ok(())
    }
}

/// Last `max` bytes of `s`, cut on a character boundary.
fn tail(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut start = s.len() - max;
    while !s.is_char_boundary(start) {
        start += 1;
    }
    &s[start..]
}
