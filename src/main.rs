use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use acremote::command::{Command, CommandError, parse_command};
use acremote::llm::LlmClient;
use acremote::render;
use acremote::services::recommend::{LlmRecommender, Recommender, Suggestion, UnavailableRecommender};
use acremote::session::Session;
use acremote::state::{ApplianceState, IrProtocol};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "acremote", about = "Virtual Gree air-conditioner remote")]
struct Cli {
    /// Run without an LLM; `ask` always reports failure.
    #[arg(long, env = "ACREMOTE_NO_AI")]
    no_ai: bool,

    /// IR protocol to start with, by name (e.g. `yb1f2`, `wifi`).
    #[arg(long, env = "ACREMOTE_PROTOCOL")]
    protocol: Option<IrProtocol>,
}

type Pending = Option<JoinHandle<Option<Suggestion>>>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("acremote: failed to load .env: {e}");
        }
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let recommender = build_recommender(cli.no_ai);

    let mut state = ApplianceState::default();
    if let Some(protocol) = cli.protocol {
        state.protocol = protocol;
    }

    match run(Session::new(state), recommender).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("acremote: {e}");
            ExitCode::FAILURE
        }
    }
}

fn build_recommender(no_ai: bool) -> Arc<dyn Recommender> {
    if no_ai {
        tracing::info!("AI disabled by flag");
        return Arc::new(UnavailableRecommender::new("disabled by --no-ai"));
    }
    // Non-fatal: the remote still works, `ask` just reports failure.
    match LlmClient::from_env() {
        Ok(client) => {
            tracing::info!(model = client.model(), "LLM client initialized");
            Arc::new(LlmRecommender::new(Arc::new(client)))
        }
        Err(e) => {
            tracing::warn!(error = %e, "LLM client not configured, AI features disabled");
            Arc::new(UnavailableRecommender::new(e.to_string()))
        }
    }
}

async fn run(mut session: Session, recommender: Arc<dyn Recommender>) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending: Pending = None;

    println!("{}", render::help_text());
    redraw(&session)?;

    loop {
        let deadline = session.notices().deadline();
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => execute(&mut session, command, &recommender, &mut pending),
                    Err(CommandError::Empty) => {}
                    Err(e) => println!("  ! {e}"),
                }
                redraw(&session)?;
            }
            joined = join_pending(&mut pending) => {
                let result = joined.unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "assist task failed");
                    None
                });
                session.complete_assist(result);
                redraw(&session)?;
            }
            () = sleep_until(deadline) => {
                if session.notices_mut().clear_expired() {
                    redraw(&session)?;
                }
            }
        }
    }

    if let Some(handle) = pending {
        handle.abort();
    }
    Ok(())
}

fn execute(session: &mut Session, command: Command, recommender: &Arc<dyn Recommender>, pending: &mut Pending) {
    match command {
        Command::Press(transition) => session.dispatch(transition),
        Command::OpenSettings => session.open_settings(),
        Command::CloseSettings => session.close_settings(),
        Command::SelectProtocol(protocol) => session.select_protocol(protocol),
        Command::Ask(text) => {
            if session.is_thinking() {
                println!("  ! AI is still thinking");
                return;
            }
            session.set_ai_input(text);
            if let Some(request) = session.begin_assist() {
                let recommender = Arc::clone(recommender);
                *pending = Some(tokio::spawn(async move {
                    recommender.recommend(&request.input, &request.snapshot).await
                }));
            }
        }
        Command::Help => println!("{}", render::help_text()),
        Command::Show | Command::Quit => {}
    }
}

fn redraw(session: &Session) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(render::render_session(session).as_bytes())?;
    stdout.write_all(b"> ")?;
    stdout.flush()
}

/// Resolve with the in-flight assist result, or never when idle.
async fn join_pending(pending: &mut Pending) -> Result<Option<Suggestion>, JoinError> {
    match pending {
        Some(handle) => {
            let result = handle.await;
            *pending = None;
            result
        }
        None => std::future::pending().await,
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
