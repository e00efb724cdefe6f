//! `docent run` — one-shot execution for scripting and piping.

use std::sync::Arc;

use dc_domain::config::Config;
use dc_runtime::{run_turn, TurnEvent};

use crate::bootstrap;
use crate::surface::{CollectSink, ConsoleSink};

pub async fn run(config: Arc<Config>, message: String, json_output: bool) -> anyhow::Result<()> {
    let mut session = bootstrap::build_session(config)?;

    let failed = if json_output {
        let mut sink = CollectSink::new();
        run_turn(&mut session, &message, &mut sink).await;
        println!("{}", serde_json::to_string_pretty(&sink.events)?);
        sink.events
            .iter()
            .any(|e| matches!(e, TurnEvent::Final { is_error: true, .. }))
    } else {
        let mut sink = ConsoleSink::new();
        run_turn(&mut session, &message, &mut sink).await;
        sink.saw_error
    };

    if failed {
        std::process::exit(1);
    }
    Ok(())
}
