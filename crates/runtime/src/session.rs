use std::sync::Arc;

use dc_domain::chat::{ChatMessage, Role};
use dc_domain::config::Config;
use dc_domain::error::Result;
use dc_domain::trace::TraceEvent;
use dc_history::{derive_agent_id, HistoryStore};
use dc_pager::PageStore;
use dc_providers::CompletionClient;
use dc_retrieval::Retriever;
use chrono::Utc;

use crate::prompt;

/// Everything one conversation needs: config, resolved identity, the
/// in-memory transcript, and the seams (completion client, retrievers,
/// history store, pager). Owned by one surface at a time; turns borrow
/// it mutably, which keeps the conversation strictly sequential.
pub struct Session {
    pub config: Arc<Config>,
    pub agent_id: String,
    pub messages: Vec<ChatMessage>,
    pub client: Arc<dyn CompletionClient>,
    pub retrievers: Vec<Arc<dyn Retriever>>,
    pub history: HistoryStore,
    pub pager: PageStore,
}

impl Session {
    /// Resolve the agent identity, load its transcript, and seed the
    /// welcome message when the transcript is empty. The welcome is
    /// persisted with the first turn, not here.
    pub fn new(
        config: Arc<Config>,
        client: Arc<dyn CompletionClient>,
        retrievers: Vec<Arc<dyn Retriever>>,
    ) -> Result<Self> {
        let agent_id = derive_agent_id(&config.agent.name, config.agent.rollover);
        TraceEvent::AgentResolved {
            agent_id: agent_id.clone(),
            rollover: format!("{:?}", config.agent.rollover).to_lowercase(),
        }
        .emit();

        let history = HistoryStore::new(&config.history.dir);
        let mut messages = history.load(&agent_id)?;
        if messages.is_empty() {
            messages.push(ChatMessage {
                role: Role::Assistant,
                content: prompt::welcome_message(&config.agent),
                timestamp: Utc::now(),
            });
        }

        let pager = PageStore::new(config.pager.lines_per_page);

        Ok(Self {
            config,
            agent_id,
            messages,
            client,
            retrievers,
            history,
            pager,
        })
    }

    /// Compact recap of the recent exchange, for the study surface.
    pub fn recap(&self, max: usize) -> String {
        prompt::recap(&self.messages, max)
    }
}
