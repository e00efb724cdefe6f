use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use dc_domain::error::{Error, Result};
use dc_domain::trace::TraceEvent;

/// Preview length in characters.
const PREVIEW_CHARS: usize = 100;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Pages
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One page of a document. `index` is 1-based, matching what readers
/// see on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContent {
    pub index: usize,
    pub content: String,
    pub preview: String,
}

fn preview_of(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Page store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Lazily extracts and caches the pages of each document. Documents with
/// form-feed breaks split on those; everything else falls back to a
/// fixed number of lines per page.
pub struct PageStore {
    lines_per_page: usize,
    cache: RwLock<HashMap<PathBuf, Arc<Vec<PageContent>>>>,
}

impl PageStore {
    pub fn new(lines_per_page: usize) -> Self {
        Self {
            lines_per_page: lines_per_page.max(1),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Pages for a document, extracting on first access.
    pub fn extract(&self, path: &Path) -> Result<Arc<Vec<PageContent>>> {
        // Fast path: already cached.
        if let Some(pages) = self.cache.read().get(path) {
            TraceEvent::PagesExtracted {
                path: path.display().to_string(),
                pages: pages.len(),
                cache_hit: true,
            }
            .emit();
            return Ok(Arc::clone(pages));
        }

        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Other(format!("{}: {e}", path.display())))?;
        let pages = Arc::new(self.split_pages(&text));

        TraceEvent::PagesExtracted {
            path: path.display().to_string(),
            pages: pages.len(),
            cache_hit: false,
        }
        .emit();

        self.cache
            .write()
            .insert(path.to_path_buf(), Arc::clone(&pages));
        Ok(pages)
    }

    fn split_pages(&self, text: &str) -> Vec<PageContent> {
        let chunks: Vec<String> = if text.contains('\x0c') {
            text.split('\x0c').map(str::to_string).collect()
        } else {
            text.lines()
                .collect::<Vec<_>>()
                .chunks(self.lines_per_page)
                .map(|lines| lines.join("\n"))
                .collect()
        };

        chunks
            .into_iter()
            .enumerate()
            .map(|(i, content)| PageContent {
                index: i + 1,
                preview: preview_of(content.trim()),
                content,
            })
            .collect()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Navigation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Step one page from `current` (a 0-based position), clamped to the
/// document. Never wraps.
pub fn navigate(current: usize, direction: Direction, page_count: usize) -> usize {
    if page_count == 0 {
        return 0;
    }
    let last = page_count - 1;
    match direction {
        Direction::Previous => current.saturating_sub(1).min(last),
        Direction::Next => (current + 1).min(last),
    }
}

/// Jump to a 0-based position, clamped to the document.
pub fn jump(target: usize, page_count: usize) -> usize {
    if page_count == 0 {
        0
    } else {
        target.min(page_count - 1)
    }
}
