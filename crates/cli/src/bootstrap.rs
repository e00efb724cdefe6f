use std::path::Path;
use std::sync::Arc;

use dc_domain::config::Config;
use dc_providers::OpenAiCompatClient;
use dc_retrieval::{DirectoryRetriever, Retriever};
use dc_runtime::Session;

/// Load the config file, falling back to defaults when it does not
/// exist. A present-but-broken file is an error; silently ignoring a
/// typoed config is worse than refusing to start.
pub fn load_config(path: &Path) -> anyhow::Result<Arc<Config>> {
    let config = if path.exists() {
        let raw = std::fs::read_to_string(path)?;
        Config::from_toml(&raw)?
    } else {
        tracing::warn!(path = %path.display(), "config file not found; using defaults");
        Config::default()
    };
    Ok(Arc::new(config))
}

/// Wire a session: HTTP completion client plus one directory retriever
/// per configured collection.
pub fn build_session(config: Arc<Config>) -> anyhow::Result<Session> {
    let client = Arc::new(OpenAiCompatClient::from_config(&config.llm)?);
    let retrievers: Vec<Arc<dyn Retriever>> = config
        .retrieval
        .collections
        .iter()
        .map(|c| {
            Arc::new(DirectoryRetriever::new(&c.title, &c.path)) as Arc<dyn Retriever>
        })
        .collect();
    if retrievers.is_empty() {
        tracing::warn!("no document collections configured; searches will find nothing");
    }
    Ok(Session::new(config, client, retrievers)?)
}
