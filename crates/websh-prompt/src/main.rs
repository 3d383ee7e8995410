use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use websh_client::WebshClient;
use websh_core::{CommandRegistry, Config, HistoryStore, Outcome, Session};
use websh_prompt::cli::{self, Mode};
use websh_prompt::editor::RustylineEditor;

/// Logs go to stderr, `warn` and above unless `RUST_LOG` says otherwise.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();

    let mode = match cli::parse_mode(std::env::args_os()) {
        Ok(mode) => mode,
        Err(outcome) => return outcome.into(),
    };

    match run(mode).await {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            tracing::error!("{:#}", e);
            Outcome::PromptError.into()
        }
    }
}

async fn run(mode: Mode) -> Result<Outcome> {
    if mode == Mode::ShowVersion {
        cli::print_version(&mut io::stdout())?;
        return Ok(Outcome::Ok);
    }

    let config = Config::load();
    let client = WebshClient::with_base_url(&config.base_url)
        .context("Failed to initialize HTTP client")?;

    if mode == Mode::Ping {
        return Ok(cli::ping_once(&client, &mut io::stdout()).await);
    }

    let registry = CommandRegistry::new(config.enable_ping);
    let editor = RustylineEditor::new(&registry, config.history_limit)
        .context("Failed to initialize line editor")?;
    let history = HistoryStore::new(config.history_path(), config.history_limit);

    let mut session = Session::new(editor, client, registry, history);
    Ok(session.run().await)
}
