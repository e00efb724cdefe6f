//! Prompt and transcript text helpers.

use dc_domain::chat::{ChatMessage, Role};
use dc_domain::config::AgentConfig;

/// The system prompt that pins the agent to its persona and to the
/// grounding rules: search first, answer only from retrieved passages,
/// cite sources.
pub fn system_prompt(agent: &AgentConfig) -> String {
    format!(
        "You are {name}, a {role}. Your communication style is {style}.\n\
         \n\
         Rules:\n\
         - Always use the search_documents tool before answering a question.\n\
         - Answer only from the retrieved passages; never invent facts that \
         are not in the documents.\n\
         - Cite the source of each claim using its [source] label.\n\
         - Give {detail} answers.\n\
         - If the search found no relevant information, say so and suggest \
         the student rephrase the question.",
        name = agent.name,
        role = agent.role,
        style = agent.style,
        detail = agent.detail_level,
    )
}

/// Greeting shown (and persisted) when an agent's history starts empty.
pub fn welcome_message(agent: &AgentConfig) -> String {
    format!(
        "Hello! I am {}, your {}. Ask me anything about the loaded documents.",
        agent.name, agent.role
    )
}

/// Render the last `max` messages as a compact `Human:`/`Assistant:`
/// recap block. System and tool messages are skipped.
pub fn recap(messages: &[ChatMessage], max: usize) -> String {
    let lines: Vec<String> = messages
        .iter()
        .filter_map(|m| match m.role {
            Role::User => Some(format!("Human: {}", m.content)),
            Role::Assistant => Some(format!("Assistant: {}", m.content)),
            _ => None,
        })
        .collect();
    let start = lines.len().saturating_sub(max);
    lines[start..].join("\n")
}
