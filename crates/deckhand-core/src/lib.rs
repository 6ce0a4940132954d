//! Core pipeline for deckhand slide generation.
//!
//! This crate provides:
//! - Staging directories under a shared work root
//! - Invocation of the external slide renderer
//! - Collection and base64 encoding of rendered artifacts
//! - Response envelopes and their packaging
//! - The mini-app controller state machine

pub mod collect;
pub mod controller;
pub mod deck;
pub mod envelope;
pub mod error;
pub mod package;
pub mod paths;
pub mod render;

pub use deck::{DeckService, Invocation, Rendered};
pub use envelope::{Content, EmbeddedResource, GenerateParams, GenerationMeta, ToolResult};
pub use error::{Error, Result};
pub use paths::{ExecutionId, StagingDir, WorkRoot};
pub use render::{OutputFormat, Renderer, RendererCommand, Theme};
