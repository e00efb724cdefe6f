//! `docent chat` — the interactive REPL.

use std::sync::Arc;

use dc_domain::config::Config;
use dc_runtime::{run_turn, Session};

use crate::bootstrap;
use crate::surface::{format_timestamp, ConsoleSink};

pub async fn chat(config: Arc<Config>) -> anyhow::Result<()> {
    let mut session = bootstrap::build_session(config)?;

    let mut rl = rustyline::DefaultEditor::new()?;
    let history_path = session.history.dir().join("repl_input.txt");
    let _ = rl.load_history(&history_path);

    eprintln!("Docent chat  |  agent: {}", session.agent_id);
    eprintln!("Type /help for commands, Ctrl+D to exit");
    if let Some(welcome) = session.messages.first() {
        eprintln!();
        eprintln!("{}", welcome.content);
    }
    eprintln!();

    loop {
        match rl.readline("you> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(&line).ok();

                if trimmed.starts_with('/') {
                    if handle_slash_command(trimmed, &session) {
                        break;
                    }
                    continue;
                }

                run_turn(&mut session, trimmed, &mut ConsoleSink::new()).await;
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                eprintln!("(Use Ctrl+D or /exit to quit)");
            }
            Err(rustyline::error::ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("readline error: {e}");
                break;
            }
        }
    }

    let _ = rl.save_history(&history_path);
    Ok(())
}

/// Returns true when the REPL should exit.
fn handle_slash_command(command: &str, session: &Session) -> bool {
    match command {
        "/exit" | "/quit" => return true,
        "/help" => {
            eprintln!("/history  show the recent transcript");
            eprintln!("/id       show the agent identifier");
            eprintln!("/exit     quit");
        }
        "/history" => {
            for m in &session.messages {
                eprintln!(
                    "[{}] {:?}: {}",
                    format_timestamp(m.timestamp),
                    m.role,
                    m.content
                );
            }
        }
        "/id" => eprintln!("{}", session.agent_id),
        other => eprintln!("unknown command: {other} (try /help)"),
    }
    false
}
