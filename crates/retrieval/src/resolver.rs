use std::collections::HashSet;
use std::sync::Arc;

use dc_domain::chat::{ToolCall, ToolDefinition};
use dc_domain::error::{Error, Result};
use dc_domain::trace::TraceEvent;

use crate::retriever::Retriever;

/// The one tool offered to the model.
pub const SEARCH_TOOL: &str = "search_documents";

/// Sentinel handed back when no retriever produced a usable passage.
pub const NO_RESULTS: &str = "No relevant information found.";

/// Definition of the `search_documents` tool in function-schema form.
pub fn search_documents_tool() -> ToolDefinition {
    ToolDefinition {
        name: SEARCH_TOOL.into(),
        description: "Search the configured document collections for passages \
                      relevant to a query. Always search before answering."
            .into(),
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "What to look for in the documents",
                }
            },
            "required": ["query"],
        }),
    }
}

/// Resolve a `search_documents` call into the formatted passage block
/// that goes back to the model as the tool result.
///
/// Retrievers are consulted in registration order and their passages
/// concatenated without re-ranking. Duplicate passages (same trimmed
/// content, compared across all retrievers) keep only the first
/// occurrence. The survivors are cut to `context_window` and rendered
/// as `[source]: content` blocks separated by blank lines.
pub async fn resolve(
    call: &ToolCall,
    retrievers: &[Arc<dyn Retriever>],
    context_window: usize,
) -> Result<String> {
    let args: serde_json::Value = serde_json::from_str(&call.arguments)
        .map_err(|e| Error::ToolArguments(format!("arguments are not valid JSON: {e}")))?;
    let query = args
        .get("query")
        .and_then(|q| q.as_str())
        .ok_or_else(|| Error::ToolArguments("missing required string field 'query'".into()))?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut kept: Vec<String> = Vec::new();
    let mut passages_seen = 0usize;

    'outer: for retriever in retrievers {
        let passages = retriever.search(query).await?;
        for passage in passages {
            passages_seen += 1;
            let trimmed = passage.content.trim().to_string();
            if trimmed.is_empty() || !seen.insert(trimmed.clone()) {
                continue;
            }
            if kept.len() >= context_window {
                break 'outer;
            }
            kept.push(format!("[{}]: {}", passage.source, trimmed));
        }
    }

    TraceEvent::ToolResolved {
        tool_name: call.tool_name.clone(),
        retrievers: retrievers.len(),
        passages_seen,
        passages_kept: kept.len(),
    }
    .emit();

    if kept.is_empty() {
        Ok(NO_RESULTS.into())
    } else {
        Ok(kept.join("\n\n"))
    }
}
