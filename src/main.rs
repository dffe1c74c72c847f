//! tictactoe - terminal front end for persisted tic-tac-toe sessions.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::io::{BufRead, Write};
use tictactoe_session::{
    KeyValueStore, Outcome, PlayInput, Session, SessionConfig, TerminalRenderer, parse_input,
    render_history, render_snapshot, render_statistics,
};
use tracing::{debug, info, instrument};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let session = Session::open(config.open_store(), config.storage_keys());

    match cli.command {
        Command::Play => run_play(session),
        Command::Stats => {
            println!("{}", render_statistics(session.statistics()));
            Ok(())
        }
        Command::History { limit } => {
            let history = session.history();
            let skip = limit.map_or(0, |n| history.len().saturating_sub(n));
            println!("{}", render_history(&history[skip..]));
            Ok(())
        }
        Command::ResetStats { yes } => run_reset_stats(session, yes),
    }
}

/// Resolves configuration: file, then environment, then flags.
#[instrument(skip(cli))]
fn load_config(cli: &Cli) -> Result<SessionConfig> {
    let mut config = match &cli.config {
        Some(path) => SessionConfig::from_file(path)?,
        None => SessionConfig::default(),
    }
    .with_env_overrides();

    if let Some(dir) = &cli.data_dir {
        config = config.with_data_dir(dir);
    }
    if cli.no_persist {
        config = config.with_persist(false);
    }
    config.validate()?;
    debug!(?config, "Configuration resolved");
    Ok(config)
}

/// Interactive game loop on stdin/stdout.
fn run_play<S: KeyValueStore>(mut session: Session<S>) -> Result<()> {
    info!("Starting terminal game");
    if !session.is_persistent() {
        eprintln!("Storage is unavailable; this session will not be saved.");
    }

    session.subscribe(TerminalRenderer::new(std::io::stdout()));
    println!("{}", render_snapshot(&session.snapshot()));

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("\n[1-9] move, [n]ew game, [u]ndo, [q]uit > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        match parse_input(&line?) {
            Some(PlayInput::Move(index)) => {
                // Rejections are rendered by the listener.
                let _ = session.apply_move(index);
                if session.outcome() != Outcome::InProgress {
                    println!("\nPress n for a new game.");
                }
            }
            Some(PlayInput::NewGame) => {
                session.new_game();
            }
            Some(PlayInput::Undo) => {
                if session.undo().is_none() {
                    println!("\nNothing to undo.");
                }
            }
            Some(PlayInput::Quit) => break,
            None => println!("\nUnrecognized input."),
        }
    }

    println!("\n{}", render_statistics(session.statistics()));
    Ok(())
}

/// Resets statistics when confirmed with `--yes`.
fn run_reset_stats<S: KeyValueStore>(mut session: Session<S>, confirmed: bool) -> Result<()> {
    if session.reset_statistics(confirmed) {
        println!("Statistics reset.");
    } else {
        println!("Refusing to reset statistics without --yes.");
    }
    Ok(())
}
