use dc_domain::chat::{Message, ToolCall, ToolDefinition};
use dc_domain::error::Result;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request / Response types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A completion request, independent of any concrete endpoint.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    /// The conversation messages to send.
    pub messages: Vec<Message>,
    /// Tool definitions the model may invoke. Empty means no tools are
    /// offered and `tool_choice` is omitted from the wire body.
    pub tools: Vec<ToolDefinition>,
    /// Sampling temperature. `None` lets the endpoint choose.
    pub temperature: Option<f32>,
    /// Maximum tokens in the response. `None` lets the endpoint choose.
    pub max_tokens: Option<u32>,
    /// Model identifier override. When `None`, the client uses its default.
    pub model: Option<String>,
}

/// A completion response, normalized from the wire format.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// Textual content of the response. Empty when the model produced
    /// only tool calls (or nothing at all).
    pub content: String,
    /// Tool calls emitted by the model.
    pub tool_calls: Vec<ToolCall>,
    /// The model that actually produced the response.
    pub model: String,
    /// The reason the model stopped (e.g. "stop", "tool_calls").
    pub finish_reason: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Trait the runtime uses to request completions. The runtime never sees
/// HTTP details; scripted implementations back the integration tests.
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send a completion request and wait for the full response.
    async fn complete(&self, req: &ChatRequest) -> Result<ChatResponse>;

    /// A stable identifier for this client, used in errors and traces.
    fn client_id(&self) -> &str;
}
