//! State machine behind the browser mini-app.
//!
//! The mini-app edits slide text, asks the host to run a generation
//! operation, and displays what comes back. [`Host`] abstracts the call into
//! the host and [`View`] the page, so the same logic that ships in the
//! bundled `index.html` can be exercised without a browser.
//!
//! Each trigger disables its own control for the duration of the call and
//! re-enables it afterwards whatever the outcome. Nothing stops two
//! different triggers from overlapping.

use std::future::Future;

use serde_json::json;

use crate::envelope::{Content, ToolResult};
use crate::paths::ExecutionId;
use crate::render::{OutputFormat, Theme};

/// Failure of the host call itself (transport, host rejection).
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct HostError(pub String);

/// The host the mini-app is embedded in.
pub trait Host {
    /// Invoke a tool and wait for its result.
    fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> impl Future<Output = Result<ToolResult, HostError>> + Send;
}

/// Controls that start a host call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Regenerate,
    ExportPdf,
    ExportPptx,
}

impl Trigger {
    fn format(self) -> OutputFormat {
        match self {
            Trigger::Regenerate => OutputFormat::Images,
            Trigger::ExportPdf => OutputFormat::Pdf,
            Trigger::ExportPptx => OutputFormat::Pptx,
        }
    }
}

/// A rendered document offered for manual retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLink {
    pub file_name: String,
    pub data_url: String,
}

/// The page the mini-app draws into.
pub trait View {
    /// Replace the editor contents and theme selection.
    fn set_editor(&mut self, text: &str, theme: Theme);
    /// Show the identifier of the displayed run.
    fn set_execution_id(&mut self, id: ExecutionId);
    /// Replace the slide area with these images (as data URLs), in order.
    fn show_images(&mut self, images: Vec<String>);
    /// Offer a document as a copyable data URL.
    fn show_document(&mut self, link: DocumentLink);
    /// Replace the status line with an error.
    fn show_error(&mut self, message: &str);
    /// Blocking notice for invalid user input.
    fn alert(&mut self, message: &str);
    fn set_enabled(&mut self, trigger: Trigger, enabled: bool);
}

/// Build a `data:` URL for a base64 payload.
pub fn data_url(mime_type: &str, base64: &str) -> String {
    format!("data:{mime_type};base64,{base64}")
}

/// Mini-app controller.
pub struct Controller<H, V> {
    host: H,
    view: V,
    text: String,
    theme: Theme,
}

impl<H: Host, V: View> Controller<H, V> {
    pub fn new(host: H, view: V) -> Self {
        Self {
            host,
            view,
            text: String::new(),
            theme: Theme::default(),
        }
    }

    /// Editor contents changed.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Theme selection changed.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host pushed the result of the tool call that opened the app.
    pub fn on_result_pushed(&mut self, result: &ToolResult) {
        if result.is_error {
            let message = result.texts().next().unwrap_or("Generation failed");
            self.view.show_error(message);
            return;
        }

        if let Some(meta) = result.generation_meta() {
            self.text = meta.params.text.clone();
            self.theme = meta.params.theme;
            self.view.set_editor(&self.text, self.theme);
            self.view.set_execution_id(meta.execution_id);
        }
        self.view.show_images(image_urls(result));
    }

    /// Re-run image generation with the edited text and theme.
    pub async fn regenerate(&mut self) {
        let Some(result) = self.call(Trigger::Regenerate).await else {
            return;
        };

        let images = image_urls(&result);
        if images.is_empty() {
            self.view.show_error("No slides were returned");
            return;
        }
        if let Some(meta) = result.generation_meta() {
            self.view.set_execution_id(meta.execution_id);
        }
        self.view.show_images(images);
    }

    /// Export the edited deck as a PDF or PPTX.
    pub async fn export(&mut self, format: OutputFormat) {
        let trigger = match format {
            OutputFormat::Pdf => Trigger::ExportPdf,
            OutputFormat::Pptx => Trigger::ExportPptx,
            OutputFormat::Images => return self.regenerate().await,
        };
        let Some(result) = self.call(trigger).await else {
            return;
        };

        let Some(resource) = result.resource() else {
            self.view.show_error("No document was returned");
            return;
        };
        let Some(blob) = resource.blob.as_deref() else {
            self.view.show_error("Returned document has no payload");
            return;
        };
        let file_name = resource
            .uri
            .rsplit('/')
            .next()
            .unwrap_or(format.output_target())
            .to_string();
        self.view.show_document(DocumentLink {
            file_name,
            data_url: data_url(&resource.mime_type, blob),
        });
    }

    /// Guarded host call shared by all triggers.
    ///
    /// Returns the result only when the call succeeded and was not
    /// error-flagged; every other outcome is already reported to the view.
    async fn call(&mut self, trigger: Trigger) -> Option<ToolResult> {
        if self.text.trim().is_empty() {
            self.view.alert("Please enter some slide content first");
            return None;
        }

        let name = trigger.format().tool_name();
        let arguments = json!({ "text": self.text, "theme": self.theme });

        let outcome = {
            let _disabled = DisabledTrigger::new(&mut self.view, trigger);
            self.host.call_tool(name, arguments).await
        };

        match outcome {
            Ok(result) if result.is_error => {
                let message = result.texts().next().unwrap_or("Generation failed");
                self.view.show_error(message);
                None
            }
            Ok(result) => Some(result),
            Err(e) => {
                self.view.show_error(&e.to_string());
                None
            }
        }
    }
}

/// Keeps a trigger disabled while alive. Dropping it re-enables the
/// trigger, including when the pending call is cancelled.
struct DisabledTrigger<'a, V: View> {
    view: &'a mut V,
    trigger: Trigger,
}

impl<'a, V: View> DisabledTrigger<'a, V> {
    fn new(view: &'a mut V, trigger: Trigger) -> Self {
        view.set_enabled(trigger, false);
        Self { view, trigger }
    }
}

impl<V: View> Drop for DisabledTrigger<'_, V> {
    fn drop(&mut self) {
        self.view.set_enabled(self.trigger, true);
    }
}

fn image_urls(result: &ToolResult) -> Vec<String> {
    result
        .content
        .iter()
        .filter_map(|part| match part {
            Content::Image { data, mime_type } => Some(data_url(mime_type, data)),
            _ => None,
        })
        .collect()
}
