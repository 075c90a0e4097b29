use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use game_core::{ClickOutcome, GameController, GameSession, RoundTiming};
use host_integration::{RngSource, VirtualContainer};
use shared::{error::ErrorNotice, messages::Messages};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::error::RecvError,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod input;
mod render;

use config::load_settings;
use input::{Command, InputSource};
use render::{start_feedback, ConsoleNotifier, TextRenderer};

const HELP: &str = "Type a token number to click it, `new` for another round, \
`reset` to clear the board, `quit` to exit.";

#[derive(Parser, Debug)]
#[command(name = "memory-rounds", about = "Token memory game for the terminal")]
struct Args {
    #[arg(long, default_value = "memory.toml")]
    config: PathBuf,
    /// Start the first round right away with this many tokens.
    #[arg(long)]
    tokens: Option<String>,
    #[arg(long)]
    time_unit_ms: Option<u64>,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    #[arg(long)]
    seed: Option<u64>,
    /// Print render events as JSON lines instead of the text board.
    #[arg(long)]
    json_events: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config)?;
    if let Some(v) = args.time_unit_ms {
        settings.time_unit_ms = v;
    }
    if let Some(v) = args.width {
        settings.container_width = v;
    }
    if let Some(v) = args.height {
        settings.container_height = v;
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    info!(
        time_unit_ms = settings.time_unit_ms,
        width = settings.container_width,
        height = settings.container_height,
        seed = ?settings.seed,
        "terminal: settings loaded"
    );

    let container = VirtualContainer::new(settings.container_size(), settings.token_size());
    let rng = match settings.seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_entropy(),
    };
    let session = GameSession::new_with_dependencies(
        GameController::new(container, rng),
        RoundTiming::new(settings.time_unit()),
        Arc::new(ConsoleNotifier),
        settings.messages.clone(),
    );

    spawn_renderer(&session, TextRenderer::new(settings.container_size(), args.json_events));

    let messages = settings.messages;
    let mut input = InputSource::new();
    if let Some(raw) = args.tokens.as_deref() {
        handle(&session, &mut input, &messages, args.json_events, raw).await;
    } else {
        prompt(&messages);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        if !handle(&session, &mut input, &messages, args.json_events, &line).await {
            break;
        }
    }

    session.reset().await;
    Ok(())
}

async fn handle(
    session: &Arc<GameSession>,
    input: &mut InputSource,
    messages: &Messages,
    json: bool,
    line: &str,
) -> bool {
    match input.interpret(line) {
        Command::Start(size) => {
            if let Some(text) = start_feedback(session.start(size).await, messages) {
                println!("{text}");
            }
        }
        Command::Invalid(err) => {
            debug!(%err, "terminal: rejected round size");
            if json {
                if let Ok(notice) = serde_json::to_string(&ErrorNotice::from(&err)) {
                    println!("{notice}");
                }
            }
            println!("{}", messages.invalid_input);
            prompt(messages);
        }
        Command::Click(token_id) => match session.click(token_id).await {
            ClickOutcome::Ignored => println!("Token {token_id} can't be clicked right now."),
            ClickOutcome::Matched { remaining, .. } => {
                debug!(%token_id, remaining, "terminal: click matched");
            }
            ClickOutcome::Won | ClickOutcome::Failed(_) => {}
        },
        Command::NewRound => prompt(messages),
        Command::Reset => {
            session.reset().await;
            prompt(messages);
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => return false,
        Command::Unknown(text) => println!("Unrecognized input '{text}'. {HELP}"),
    }
    true
}

fn prompt(messages: &Messages) {
    println!("{} (3-7) then press Enter to {}", messages.prompt, messages.go);
}

fn spawn_renderer(session: &Arc<GameSession>, mut renderer: TextRenderer) {
    let mut events = session.subscribe_events();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => match renderer.apply(&event) {
                    Ok(Some(text)) => println!("{text}"),
                    Ok(None) => {}
                    Err(err) => warn!(%err, "terminal: failed to render event"),
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "terminal: renderer fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}
