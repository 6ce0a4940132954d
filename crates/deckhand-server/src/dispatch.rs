//! Routing of JSON-RPC requests to the generation pipeline and resources.

use deckhand_core::{DeckService, GenerateParams, OutputFormat, ToolResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::error::{ServerError, ServerResult};
use crate::protocol::{
    CallToolParams, InitializeResult, JSONRPC_VERSION, ListResourcesResult, ListToolsResult,
    PROTOCOL_VERSION, ReadResourceParams, ReadResourceResult, Request, Response, ServerInfo,
};
use crate::resources::Resources;
use crate::tools;

const INSTRUCTIONS: &str = "Write slides in Slidev markdown (read the syntax guide resource), \
then call generate_images to preview, or generate_pdf / generate_pptx to export.";

/// Handles every operation. Shared by all transports.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    deck: DeckService,
    resources: Resources,
}

impl Dispatcher {
    pub fn new(deck: DeckService, resources: Resources) -> Self {
        Self { deck, resources }
    }

    pub fn deck(&self) -> &DeckService {
        &self.deck
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Handle one raw JSON message. Returns `None` for notifications.
    pub async fn handle_message(&self, raw: &str) -> Option<Response> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to parse message: {}", e);
                return Some(Response::error(Value::Null, &ServerError::Parse(e.to_string())));
            }
        };
        let request: Request = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(Response::error(
                    Value::Null,
                    &ServerError::InvalidRequest(e.to_string()),
                ));
            }
        };
        self.handle(request).await
    }

    /// Handle one decoded request.
    pub async fn handle(&self, request: Request) -> Option<Response> {
        let Request {
            jsonrpc,
            id,
            method,
            params,
        } = request;

        let Some(id) = id else {
            tracing::debug!(method = %method, "notification received");
            return None;
        };

        if jsonrpc != JSONRPC_VERSION {
            let error = ServerError::InvalidRequest(format!("unsupported jsonrpc version '{jsonrpc}'"));
            return Some(Response::error(id, &error));
        }

        match self.route(&method, params).await {
            Ok(result) => Some(Response::success(id, result)),
            Err(e) => {
                tracing::warn!(method = %method, code = e.code(), "request failed: {}", e);
                Some(Response::error(id, &e))
            }
        }
    }

    async fn route(&self, method: &str, params: Value) -> ServerResult<Value> {
        match method {
            "initialize" => to_value(self.initialize()),
            "ping" => Ok(json!({})),
            "tools/list" => to_value(ListToolsResult {
                tools: tools::catalogue(),
            }),
            "tools/call" => {
                let params: CallToolParams = parse_params(params)?;
                to_value(self.call_tool(params).await?)
            }
            "resources/list" => to_value(ListResourcesResult {
                resources: self.resources.list(),
            }),
            "resources/read" => {
                let params: ReadResourceParams = parse_params(params)?;
                let contents = self.resources.read(&params.uri).await?;
                to_value(ReadResourceResult {
                    contents: vec![contents],
                })
            }
            other => Err(ServerError::MethodNotFound(other.to_string())),
        }
    }

    fn initialize(&self) -> InitializeResult {
        InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: json!({ "tools": {}, "resources": {} }),
            server_info: ServerInfo {
                name: "deckhand".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }

    /// Run a generation tool.
    ///
    /// Unknown tools and malformed arguments are protocol errors; anything
    /// that goes wrong during generation is an error-flagged result.
    pub async fn call_tool(&self, params: CallToolParams) -> ServerResult<ToolResult> {
        let format = OutputFormat::from_tool_name(&params.name)
            .ok_or_else(|| ServerError::UnknownTool(params.name.clone()))?;
        let arguments: GenerateParams = serde_json::from_value(params.arguments)
            .map_err(|e| ServerError::InvalidParams(e.to_string()))?;

        tracing::debug!(tool = %params.name, "tools/call");
        Ok(self.deck.generate(arguments, format).await)
    }
}

fn parse_params<T: DeserializeOwned>(params: Value) -> ServerResult<T> {
    serde_json::from_value(params).map_err(|e| ServerError::InvalidParams(e.to_string()))
}

fn to_value<T: Serialize>(value: T) -> ServerResult<Value> {
    Ok(serde_json::to_value(value)?)
}
