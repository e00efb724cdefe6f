use std::io::Write;

use chrono::{DateTime, Local, Utc};

use dc_runtime::{TurnEvent, TurnSink};

/// Prints turn events for an interactive terminal: tool activity dimmed
/// on stderr, the final answer on stdout.
pub struct ConsoleSink {
    pub saw_error: bool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self { saw_error: false }
    }
}

impl TurnSink for ConsoleSink {
    fn emit(&mut self, event: &TurnEvent) {
        match event {
            TurnEvent::ToolCall { tool_name, .. } => {
                eprintln!("\x1b[2m[searching via {tool_name}...]\x1b[0m");
            }
            TurnEvent::ToolResult { content, .. } => {
                let lines = content.lines().count();
                eprintln!("\x1b[2m[retrieved {lines} lines]\x1b[0m");
            }
            TurnEvent::Final { content, is_error } => {
                if *is_error {
                    self.saw_error = true;
                    eprintln!("\x1b[31m{content}\x1b[0m");
                } else {
                    println!("{content}");
                }
                std::io::stdout().flush().ok();
            }
        }
    }
}

/// Collects events for `--json` output.
pub struct CollectSink {
    pub events: Vec<TurnEvent>,
}

impl CollectSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }
}

impl TurnSink for CollectSink {
    fn emit(&mut self, event: &TurnEvent) {
        self.events.push(event.clone());
    }
}

/// Timestamps as shown in transcripts: day-first local time.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%d/%m/%Y %H:%M").to_string()
}
