mod render;
mod storage;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use dexle_game::{GameEngine, GameError, GameMode, GameStorage};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use storage::{CatalogSource, JsonFileStorage, default_data_dir};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// Today's shared puzzle, six tries
    Daily,
    /// Random target, unlimited tries (unlocks after the daily game)
    FreePlay,
}

impl From<ModeArg> for GameMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Daily => Self::Daily,
            ModeArg::FreePlay => Self::FreePlay,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "dexle", version)]
#[command(about = "Daily deduction game: name the mystery entity from attribute hints")]
struct Args {
    /// Catalog JSON file to use instead of the bundled one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Directory holding saved progress and statistics
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Play as if today were this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    date: Option<NaiveDate>,

    /// Seed for free-play target draws
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play interactively (default)
    Play {
        #[arg(long, value_enum, default_value_t = ModeArg::Daily)]
        mode: ModeArg,
    },
    /// Submit guesses to today's daily game without prompting
    Guess {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Show daily and free-play statistics
    Stats {
        /// Print raw JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Print the spoiler-free share text for today's daily game
    Share,
    /// List catalog names containing a fragment
    Suggest { term: String },
    /// Discard today's daily progress (statistics are kept)
    Reset,
}

type Engine<S> = GameEngine<S, ChaCha20Rng>;

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let catalog = args
        .catalog
        .clone()
        .map_or(CatalogSource::Bundled, CatalogSource::File);
    let data_dir = args.data_dir.clone().unwrap_or_else(default_data_dir);
    let today = args.date.unwrap_or_else(|| Local::now().date_naive());
    let rng = ChaCha20Rng::seed_from_u64(args.seed.unwrap_or_else(|| rand::thread_rng().r#gen()));

    let mut engine = GameEngine::start(&catalog, JsonFileStorage::new(data_dir), rng, today)
        .context("failed to start Dexle")?;
    log::debug!("data directory {}", engine.storage().dir().display());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.command.unwrap_or(Command::Play {
        mode: ModeArg::Daily,
    }) {
        Command::Play { mode } => {
            let stdin = io::stdin();
            play(&mut engine, mode.into(), stdin.lock(), &mut out)?;
        }
        Command::Guess { names } => guess_all(&mut engine, &names, &mut out)?,
        Command::Stats { json } => print_stats(&engine, json, &mut out)?,
        Command::Share => write!(out, "{}", engine.share_text())?,
        Command::Suggest { term } => {
            for entity in engine.suggest(&term) {
                writeln!(out, "{entity}")?;
            }
        }
        Command::Reset => {
            engine.reset(Some(GameMode::Daily))?;
            writeln!(out, "Today's daily game was reset.")?;
        }
    }
    report_warnings(&mut engine);
    out.flush()?;
    Ok(())
}

fn report_warnings<S: GameStorage>(engine: &mut Engine<S>) {
    for warning in engine.take_persistence_warnings() {
        eprintln!("⚠️  {}", warning.to_string().yellow());
    }
}

const HELP: &str = "Type a name to guess. Commands: :help :share :stats :daily :free :reset :quit, ?<text> for suggestions";

/// Interactive loop over `input`. Returns when input ends or `:quit` is entered.
fn play<S, I, W>(engine: &mut Engine<S>, mode: GameMode, input: I, out: &mut W) -> Result<()>
where
    S: GameStorage,
    I: BufRead,
    W: Write,
{
    writeln!(out, "{}", "🔎 Dexle".bright_cyan().bold())?;
    writeln!(out, "{HELP}")?;
    if mode == GameMode::FreePlay {
        switch(engine, GameMode::FreePlay, out)?;
    }
    show_session(engine, out)?;

    for line in input.lines() {
        let line = line.context("failed to read input")?;
        let line = line.trim();
        match line {
            "" => continue,
            ":quit" | ":q" => break,
            ":help" => writeln!(out, "{HELP}")?,
            ":share" => write!(out, "{}", engine.share_text())?,
            ":stats" => print_stats(engine, false, out)?,
            ":daily" => switch(engine, GameMode::Daily, out)?,
            ":free" => switch(engine, GameMode::FreePlay, out)?,
            ":reset" => {
                let mode = engine.mode();
                if let Err(err) = engine.reset(Some(mode)) {
                    writeln!(out, "{}", err.to_string().yellow())?;
                }
                show_session(engine, out)?;
            }
            _ if line.starts_with('?') => {
                let names: Vec<String> = engine
                    .suggest(line.trim_start_matches('?'))
                    .iter()
                    .map(|entity| entity.name.clone())
                    .collect();
                writeln!(out, "{}", names.join(", "))?;
            }
            guess => submit(engine, guess, out)?,
        }
        report_warnings(engine);
    }
    Ok(())
}

fn switch<S: GameStorage, W: Write>(engine: &mut Engine<S>, mode: GameMode, out: &mut W) -> Result<()> {
    match engine.switch_mode(mode) {
        Ok(()) => {
            writeln!(out, "Switched to {mode}.")?;
            show_session(engine, out)
        }
        Err(err @ GameError::ModeSwitchDenied { .. }) => {
            writeln!(out, "{}", err.to_string().yellow())?;
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn submit<S: GameStorage, W: Write>(engine: &mut Engine<S>, guess: &str, out: &mut W) -> Result<()> {
    match engine.submit_guess(guess) {
        Ok(outcome) => {
            writeln!(out, "{}", render::report_line(&outcome.report))?;
            writeln!(out, "{}", render::status_line(engine.session()))?;
            if outcome.status.is_over() {
                writeln!(out)?;
                write!(out, "{}", engine.share_text())?;
            }
        }
        Err(GameError::Guess(err)) => writeln!(out, "{}", err.to_string().yellow())?,
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

fn guess_all<S: GameStorage, W: Write>(
    engine: &mut Engine<S>,
    names: &[String],
    out: &mut W,
) -> Result<()> {
    for name in names {
        submit(engine, name, out)?;
    }
    Ok(())
}

fn show_session<S: GameStorage, W: Write>(engine: &Engine<S>, out: &mut W) -> Result<()> {
    let session = engine.session();
    let title = match session.date() {
        Some(date) => format!("{} {date}", session.mode()),
        None => session.mode().to_string(),
    };
    writeln!(out, "{}", title.bold())?;
    if !session.history().is_empty() {
        write!(out, "{}", render::board(session))?;
    }
    writeln!(out, "{}", render::status_line(session))?;
    Ok(())
}

fn print_stats<S: GameStorage, W: Write>(engine: &Engine<S>, json: bool, out: &mut W) -> Result<()> {
    let stats = engine.stats();
    if json {
        let value = serde_json::json!({
            "daily": stats.daily,
            "freePlay": stats.free_play,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
    } else {
        write!(out, "{}", render::daily_stats(&stats.daily))?;
        writeln!(out)?;
        write!(out, "{}", render::free_play_stats(&stats.free_play))?;
    }
    Ok(())
}
