//! Tool catalogue advertised to the calling agent.

use deckhand_core::{OutputFormat, Theme};
use serde_json::{Value, json};

use crate::protocol::ToolDescriptor;
use crate::resources::UI_BUNDLE_URI;

/// Formats exposed as tools, in listing order.
pub const TOOL_FORMATS: [OutputFormat; 3] =
    [OutputFormat::Images, OutputFormat::Pdf, OutputFormat::Pptx];

/// Input schema shared by all generation tools.
pub fn input_schema() -> Value {
    let themes: Vec<&str> = Theme::ALL.iter().map(|t| t.as_str()).collect();
    json!({
        "type": "object",
        "properties": {
            "text": {
                "type": "string",
                "description": "Slide deck in Slidev markdown. Separate slides with a line containing only ---."
            },
            "theme": {
                "type": "string",
                "enum": themes,
                "default": Theme::default().as_str(),
                "description": "Slide theme."
            }
        },
        "required": ["text"],
        "additionalProperties": false
    })
}

fn description(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Images => {
            "Render a slide deck to PNG images, one per slide. Read the syntax guide resource for the markdown format."
        }
        OutputFormat::Pdf => "Render a slide deck to a PDF document.",
        OutputFormat::Pptx => "Render a slide deck to a PowerPoint (PPTX) document.",
    }
}

/// Descriptor for one generation tool.
pub fn descriptor(format: OutputFormat) -> ToolDescriptor {
    let meta = match format {
        OutputFormat::Images => Some(json!({ "ui/resourceUri": UI_BUNDLE_URI })),
        OutputFormat::Pdf | OutputFormat::Pptx => None,
    };
    ToolDescriptor {
        name: format.tool_name().to_string(),
        description: description(format).to_string(),
        input_schema: input_schema(),
        meta,
    }
}

/// All tools.
pub fn catalogue() -> Vec<ToolDescriptor> {
    TOOL_FORMATS.into_iter().map(descriptor).collect()
}
