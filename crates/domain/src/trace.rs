use serde::Serialize;

/// Structured trace events emitted at the interesting seams of a turn.
/// Each serializes to a single JSON object tagged by `event` and is
/// written through `tracing` so subscribers decide the destination.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    AgentResolved {
        agent_id: String,
        rollover: String,
    },
    CompletionRequest {
        model: String,
        with_tools: bool,
        duration_ms: u64,
        retried: bool,
    },
    CompletionRetry {
        reason: String,
    },
    ToolResolved {
        tool_name: String,
        retrievers: usize,
        passages_seen: usize,
        passages_kept: usize,
    },
    HistoryLoaded {
        agent_id: String,
        messages: usize,
    },
    HistorySaved {
        agent_id: String,
        messages: usize,
    },
    PagesExtracted {
        path: String,
        pages: usize,
        cache_hit: bool,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        match serde_json::to_string(self) {
            Ok(json) => tracing::info!(trace_event = %json, "dc_event"),
            Err(e) => tracing::warn!("failed to serialize trace event: {e}"),
        }
    }
}
