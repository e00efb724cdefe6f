//! JSON-file conversation history.
//!
//! Each agent identifier owns one file, `{dir}/{agent_id}.json`, holding
//! the full transcript as a pretty-printed JSON array. Saves rewrite the
//! whole file; transcripts here are study sessions, not firehoses.

use std::path::{Path, PathBuf};

use dc_domain::chat::ChatMessage;
use dc_domain::error::Result;
use dc_domain::trace::TraceEvent;

pub struct HistoryStore {
    dir: PathBuf,
}

impl HistoryStore {
    /// No IO happens here; the directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, agent_id: &str) -> PathBuf {
        self.dir.join(format!("{agent_id}.json"))
    }

    /// Load the transcript for an agent. A missing file is a fresh start,
    /// not an error.
    pub fn load(&self, agent_id: &str) -> Result<Vec<ChatMessage>> {
        let path = self.path_for(agent_id);
        if !path.exists() {
            TraceEvent::HistoryLoaded {
                agent_id: agent_id.into(),
                messages: 0,
            }
            .emit();
            return Ok(Vec::new());
        }
        let raw = std::fs::read_to_string(&path)?;
        let messages: Vec<ChatMessage> = serde_json::from_str(&raw)?;
        TraceEvent::HistoryLoaded {
            agent_id: agent_id.into(),
            messages: messages.len(),
        }
        .emit();
        Ok(messages)
    }

    /// Overwrite the transcript for an agent.
    pub fn save(&self, agent_id: &str, messages: &[ChatMessage]) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(messages)?;
        std::fs::write(self.path_for(agent_id), json)?;
        TraceEvent::HistorySaved {
            agent_id: agent_id.into(),
            messages: messages.len(),
        }
        .emit();
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
