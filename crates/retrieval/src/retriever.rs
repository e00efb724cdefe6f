use std::path::{Path, PathBuf};

use dc_domain::error::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Retriever seam
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One retrieved passage. `source` labels where it came from (the
/// collection or file title); `content` is the passage text.
#[derive(Debug, Clone, PartialEq)]
pub struct Passage {
    pub source: String,
    pub content: String,
}

/// A searchable document collection. Implementations must preserve
/// their own relevance order; the resolver concatenates retrievers in
/// registration order and never re-ranks across them.
#[async_trait::async_trait]
pub trait Retriever: Send + Sync {
    /// Human-readable title of the collection.
    fn title(&self) -> &str;

    /// Return passages relevant to `query`, most relevant first.
    async fn search(&self, query: &str) -> Result<Vec<Passage>>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Directory-backed retriever
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Searches plain-text documents under a directory. Files are split into
/// paragraphs and scored by query-term overlap. Not a vector store; good
/// enough for note collections of a few hundred pages.
pub struct DirectoryRetriever {
    title: String,
    root: PathBuf,
    max_passages: usize,
}

impl DirectoryRetriever {
    pub fn new(title: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            title: title.into(),
            root: root.into(),
            max_passages: 4,
        }
    }

    pub fn with_max_passages(mut self, max: usize) -> Self {
        self.max_passages = max;
        self
    }

    fn document_paths(&self) -> Result<Vec<PathBuf>> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(&self.root)
            .map_err(|e| Error::Retrieval(format!("{}: {e}", self.root.display())))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| is_text_document(p))
            .collect();
        // stable order so equal-score passages rank deterministically
        paths.sort();
        Ok(paths)
    }
}

fn is_text_document(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("txt") | Some("md")
    )
}

/// Score a paragraph by how many distinct query terms it contains.
fn overlap_score(terms: &[String], paragraph: &str) -> usize {
    let lower = paragraph.to_lowercase();
    terms.iter().filter(|t| lower.contains(t.as_str())).count()
}

#[async_trait::async_trait]
impl Retriever for DirectoryRetriever {
    fn title(&self) -> &str {
        &self.title
    }

    async fn search(&self, query: &str) -> Result<Vec<Passage>> {
        let terms: Vec<String> = query
            .split_whitespace()
            .map(|t| t.to_lowercase())
            .collect();
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, Passage)> = Vec::new();
        for path in self.document_paths()? {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| Error::Retrieval(format!("{}: {e}", path.display())))?;
            let doc_name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("document")
                .to_string();
            for paragraph in text.split("\n\n") {
                let trimmed = paragraph.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let score = overlap_score(&terms, trimmed);
                if score > 0 {
                    scored.push((
                        score,
                        Passage {
                            source: format!("{} / {}", self.title, doc_name),
                            content: trimmed.to_string(),
                        },
                    ));
                }
            }
        }

        // sort_by is stable, so file order breaks score ties
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(scored
            .into_iter()
            .take(self.max_passages)
            .map(|(_, p)| p)
            .collect())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Document catalog
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A document available for reading in the study surface.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentInfo {
    pub title: String,
    pub path: PathBuf,
}

/// List the readable documents under a collection directory, sorted by
/// file name. Missing directories yield an empty catalog rather than an
/// error so unconfigured collections do not break the study surface.
pub fn list_documents(root: &Path) -> Vec<DocumentInfo> {
    let Ok(entries) = std::fs::read_dir(root) else {
        return Vec::new();
    };
    let mut docs: Vec<DocumentInfo> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| is_text_document(p))
        .map(|path| DocumentInfo {
            title: path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("document")
                .to_string(),
            path,
        })
        .collect();
    docs.sort_by(|a, b| a.path.cmp(&b.path));
    docs
}
