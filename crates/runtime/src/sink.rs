use serde::Serialize;

/// Events emitted during a single turn, in order. Surfaces decide how
/// to render them; the orchestrator never prints.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type")]
pub enum TurnEvent {
    /// The model asked for a tool.
    #[serde(rename = "tool_call")]
    ToolCall { tool_name: String, arguments: String },

    /// The resolved tool result as it was handed back to the model.
    #[serde(rename = "tool_result")]
    ToolResult { tool_name: String, content: String },

    /// The final assistant text for the turn. Always emitted exactly
    /// once, with `is_error` set when the turn failed.
    #[serde(rename = "final")]
    Final { content: String, is_error: bool },
}

/// Where turn events go. One sink per surface: console, JSON collector,
/// test recorder.
pub trait TurnSink: Send {
    fn emit(&mut self, event: &TurnEvent);
}

/// Discards everything. Useful when only the persisted transcript matters.
pub struct NullSink;

impl TurnSink for NullSink {
    fn emit(&mut self, _event: &TurnEvent) {}
}
