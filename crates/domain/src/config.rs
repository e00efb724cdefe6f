use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Top-level configuration, loaded from a TOML file. Every section and
/// field has a default so an empty file (or no file at all) is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub pager: PagerConfig,
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| crate::error::Error::Config(e.to_string()))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// [agent]
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// How the agent's identifier tracks the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rollover {
    /// Identifier carries the current date; history rolls over at midnight.
    Daily,
    /// Identifier is just the agent name; one history file forever.
    Pinned,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub name: String,
    pub role: String,
    pub style: String,
    pub detail_level: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Maximum retrieved passages handed back to the model per tool call.
    pub context_window: usize,
    pub rollover: Rollover,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: d_name(),
            role: d_role(),
            style: d_style(),
            detail_level: d_detail_level(),
            temperature: d_temperature(),
            max_tokens: d_max_tokens(),
            context_window: d_context_window(),
            rollover: Rollover::Daily,
        }
    }
}

fn d_name() -> String {
    "Tutor".into()
}
fn d_role() -> String {
    "study tutor".into()
}
fn d_style() -> String {
    "friendly".into()
}
fn d_detail_level() -> String {
    "detailed".into()
}
fn d_temperature() -> f32 {
    0.7
}
fn d_max_tokens() -> u32 {
    1000
}
fn d_context_window() -> usize {
    3
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// [llm]
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub model: String,
    pub top_p: f32,
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: d_base_url(),
            api_key_env: d_api_key_env(),
            model: d_model(),
            top_p: d_top_p(),
            timeout_ms: d_timeout_ms(),
        }
    }
}

fn d_base_url() -> String {
    "https://api.aimlapi.com".into()
}
fn d_api_key_env() -> String {
    "AIML_API_KEY".into()
}
fn d_model() -> String {
    "meta-llama/Meta-Llama-3.1-70B-Instruct-Turbo".into()
}
fn d_top_p() -> f32 {
    1.0
}
fn d_timeout_ms() -> u64 {
    30_000
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// [history]
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub dir: PathBuf,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data/chat_history"),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// [retrieval]
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One searchable document collection, backed by a directory on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    pub title: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub collections: Vec<CollectionConfig>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// [pager]
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PagerConfig {
    /// Fallback page size for documents without form-feed breaks.
    pub lines_per_page: usize,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self { lines_per_page: 40 }
    }
}
