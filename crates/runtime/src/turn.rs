//! The two-call turn loop.
//!
//! A turn makes at most two completion requests: the first offers the
//! `search_documents` tool, the second (made only when the model called
//! it) carries the tool results and offers no tools at all. Tool calls
//! in the second response are never resolved; the turn always ends in
//! exactly one final assistant message, persisted to history.

use dc_domain::chat::{ChatMessage, Message, Role};
use dc_domain::error::Error;
use dc_providers::{ChatRequest, ChatResponse};
use dc_retrieval::{resolve, search_documents_tool, SEARCH_TOOL};

use crate::session::Session;
use crate::sink::{TurnEvent, TurnSink};
use crate::prompt;

/// How many persisted messages ride along with the system prompt on
/// each request.
pub const HISTORY_WINDOW: usize = 5;

const NO_ANSWER: &str = "Sorry, I could not produce an answer this time.";
const NO_FINAL_ANSWER: &str =
    "Sorry, I could not process the retrieved information this time.";

/// Run one turn. The user text is appended to the transcript first, so
/// it always rides inside the history window of its own request. Errors
/// never propagate out of a turn; they end it with an error-flagged
/// final message and the session stays usable.
pub async fn run_turn(
    session: &mut Session,
    user_text: &str,
    sink: &mut dyn TurnSink,
) -> String {
    session.messages.push(ChatMessage::user(user_text));

    let mut outgoing = windowed_messages(session);

    // Call 1: tools on offer.
    let first = ChatRequest {
        messages: outgoing.clone(),
        tools: vec![search_documents_tool()],
        temperature: Some(session.config.agent.temperature),
        max_tokens: Some(session.config.agent.max_tokens),
        model: None,
    };
    let response = match session.client.complete(&first).await {
        Ok(r) => r,
        Err(e) => return fail_turn(session, sink, e),
    };

    // Tool calls take priority over any content in the same response.
    let final_text = if response.tool_calls.is_empty() {
        text_or(&response, NO_ANSWER)
    } else {
        for call in &response.tool_calls {
            if call.tool_name != SEARCH_TOOL {
                tracing::warn!(tool = %call.tool_name, "ignoring unknown tool call");
                continue;
            }
            sink.emit(&TurnEvent::ToolCall {
                tool_name: call.tool_name.clone(),
                arguments: call.arguments.clone(),
            });
            let result = match resolve(
                call,
                &session.retrievers,
                session.config.agent.context_window,
            )
            .await
            {
                Ok(r) => r,
                Err(e) => return fail_turn(session, sink, e),
            };
            sink.emit(&TurnEvent::ToolResult {
                tool_name: call.tool_name.clone(),
                content: result.clone(),
            });
            outgoing.push(Message::tool_result(&call.tool_name, result));
        }

        // Call 2: no tools. A second round of tool calls is coerced to
        // text rather than resolved.
        let second = ChatRequest {
            messages: outgoing,
            tools: Vec::new(),
            temperature: Some(session.config.agent.temperature),
            max_tokens: Some(session.config.agent.max_tokens),
            model: None,
        };
        match session.client.complete(&second).await {
            Ok(r) => text_or(&r, NO_FINAL_ANSWER),
            Err(e) => return fail_turn(session, sink, e),
        }
    };

    finish_turn(session, sink, final_text, false)
}

/// System prompt plus the last [`HISTORY_WINDOW`] transcript messages,
/// mapped to wire form.
fn windowed_messages(session: &Session) -> Vec<Message> {
    let mut outgoing = vec![Message::system(prompt::system_prompt(&session.config.agent))];
    let start = session.messages.len().saturating_sub(HISTORY_WINDOW);
    for m in &session.messages[start..] {
        let wire = match m.role {
            Role::User => Message::user(&m.content),
            Role::Assistant => Message::assistant(&m.content),
            // history never stores system or tool messages
            _ => continue,
        };
        outgoing.push(wire);
    }
    outgoing
}

fn text_or(response: &ChatResponse, fallback: &str) -> String {
    if response.content.trim().is_empty() {
        fallback.to_string()
    } else {
        response.content.clone()
    }
}

fn fail_turn(session: &mut Session, sink: &mut dyn TurnSink, e: Error) -> String {
    tracing::error!(error = %e, "turn failed");
    finish_turn(session, sink, format!("Error: {e}"), true)
}

/// Append the final assistant message, persist, and emit the final
/// event. Persistence failure is logged; the turn still succeeds.
fn finish_turn(
    session: &mut Session,
    sink: &mut dyn TurnSink,
    content: String,
    is_error: bool,
) -> String {
    session.messages.push(ChatMessage::assistant(&content));
    if let Err(e) = session.history.save(&session.agent_id, &session.messages) {
        tracing::warn!(
            agent_id = %session.agent_id,
            error = %e,
            "failed to persist history; continuing"
        );
    }
    sink.emit(&TurnEvent::Final {
        content: content.clone(),
        is_error,
    });
    content
}
