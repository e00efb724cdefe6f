//! `docent study` — chat plus a page-by-page document reader.
//!
//! Plain input is a chat turn; lines starting with `:` drive the reader.
//! Page position is clamped to the open document and never wraps.

use std::sync::Arc;

use dc_domain::config::Config;
use dc_pager::{jump, navigate, Direction, PageContent};
use dc_retrieval::{list_documents, DocumentInfo};
use dc_runtime::{run_turn, Session};

use crate::bootstrap;
use crate::surface::ConsoleSink;

struct Reader {
    catalog: Vec<DocumentInfo>,
    open: Option<OpenDocument>,
}

struct OpenDocument {
    title: String,
    pages: Arc<Vec<PageContent>>,
    /// 0-based position into `pages`.
    current: usize,
}

pub async fn study(config: Arc<Config>, doc: Option<String>) -> anyhow::Result<()> {
    let mut session = bootstrap::build_session(Arc::clone(&config))?;

    let catalog = config
        .retrieval
        .collections
        .iter()
        .flat_map(|c| list_documents(&c.path))
        .collect::<Vec<_>>();
    let mut reader = Reader {
        catalog,
        open: None,
    };

    eprintln!("Docent study  |  agent: {}", session.agent_id);
    eprintln!("Chat normally; reader commands start with ':' (:help lists them)");
    eprintln!();

    if let Some(wanted) = doc {
        open_document(&mut reader, &session, &wanted);
    }

    let mut rl = rustyline::DefaultEditor::new()?;
    loop {
        match rl.readline("study> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(&line).ok();

                if let Some(command) = trimmed.strip_prefix(':') {
                    if handle_command(command, &mut reader, &session) {
                        break;
                    }
                    continue;
                }

                run_turn(&mut session, trimmed, &mut ConsoleSink::new()).await;
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                eprintln!("(Use Ctrl+D or :exit to quit)");
            }
            Err(rustyline::error::ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("readline error: {e}");
                break;
            }
        }
    }
    Ok(())
}

/// Returns true when the surface should exit.
fn handle_command(command: &str, reader: &mut Reader, session: &Session) -> bool {
    let mut parts = command.split_whitespace();
    match parts.next().unwrap_or("") {
        "exit" | "quit" => return true,
        "help" => print_help(),
        "docs" => {
            if reader.catalog.is_empty() {
                eprintln!("no documents configured");
            }
            for (i, doc) in reader.catalog.iter().enumerate() {
                eprintln!("{}. {}", i + 1, doc.title);
            }
        }
        "open" => {
            let wanted = parts.collect::<Vec<_>>().join(" ");
            if wanted.is_empty() {
                eprintln!("usage: :open <number|title>");
            } else {
                open_document(reader, session, &wanted);
            }
        }
        "next" => step(reader, Direction::Next),
        "prev" => step(reader, Direction::Previous),
        "page" => match parts.next().and_then(|n| n.parse::<usize>().ok()) {
            Some(n) if n >= 1 => {
                if let Some(open) = reader.open.as_mut() {
                    open.current = jump(n - 1, open.pages.len());
                    show_page(open);
                } else {
                    eprintln!("no document open (try :docs then :open)");
                }
            }
            _ => eprintln!("usage: :page <number>"),
        },
        "pages" => {
            if let Some(open) = &reader.open {
                eprintln!("{} ({} pages)", open.title, open.pages.len());
                for page in open.pages.iter() {
                    eprintln!("  {}. {}", page.index, page.preview);
                }
            } else {
                eprintln!("no document open (try :docs then :open)");
            }
        }
        "recap" => {
            let recap = session.recap(dc_runtime::HISTORY_WINDOW);
            if recap.is_empty() {
                eprintln!("nothing to recap yet");
            } else {
                eprintln!("{recap}");
            }
        }
        other => eprintln!("unknown command: :{other} (try :help)"),
    }
    false
}

fn print_help() {
    eprintln!(":docs        list available documents");
    eprintln!(":open <doc>  open a document by number or title");
    eprintln!(":next        next page");
    eprintln!(":prev        previous page");
    eprintln!(":page <n>    jump to page n");
    eprintln!(":pages       list page previews of the open document");
    eprintln!(":recap       recap the recent conversation");
    eprintln!(":exit        quit");
}

fn open_document(reader: &mut Reader, session: &Session, wanted: &str) {
    let found = wanted
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| reader.catalog.get(i))
        .or_else(|| {
            reader
                .catalog
                .iter()
                .find(|d| d.title.eq_ignore_ascii_case(wanted))
        });
    let Some(doc) = found else {
        eprintln!("no such document: {wanted} (try :docs)");
        return;
    };
    let title = doc.title.clone();
    let path = doc.path.clone();

    match session.pager.extract(&path) {
        Ok(pages) => {
            let open = OpenDocument {
                title,
                pages,
                current: 0,
            };
            show_page(&open);
            reader.open = Some(open);
        }
        Err(e) => eprintln!("could not open {title}: {e}"),
    }
}

fn step(reader: &mut Reader, direction: Direction) {
    if let Some(open) = reader.open.as_mut() {
        open.current = navigate(open.current, direction, open.pages.len());
        show_page(open);
    } else {
        eprintln!("no document open (try :docs then :open)");
    }
}

fn show_page(open: &OpenDocument) {
    match open.pages.get(open.current) {
        Some(page) => {
            println!("── {} | page {}/{} ──", open.title, page.index, open.pages.len());
            println!("{}", page.content);
        }
        None => eprintln!("{} is empty", open.title),
    }
}
