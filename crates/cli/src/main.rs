mod bootstrap;
mod chat;
mod cli;
mod config_cmd;
mod run;
mod study;
mod surface;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout belongs to answers and pages.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("docent=info,dc_runtime=info,dc_providers=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Cli::parse();
    let config = bootstrap::load_config(&args.config)?;

    match args.command.unwrap_or(cli::Command::Chat) {
        cli::Command::Chat => chat::chat(config).await,
        cli::Command::Study { doc } => study::study(config, doc).await,
        cli::Command::Run { message, json } => run::run(config, message, json).await,
        cli::Command::Config(cmd) => config_cmd::handle(&args.config, cmd),
        cli::Command::Version => {
            println!("docent {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
