use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow};
use casino::game::{Blackjack, ThreeCardPoker};
use casino::{
    CasinoOptions, Console, InMemoryLedger, JsonFileLedger, Ledger, Session, SharedShoe, Shoe,
};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const LOG_TARGET: &str = "casino::main";
const DEFAULT_FILTER: &str = "casino=info";

#[derive(Debug, Parser)]
#[command(name = "casino")]
#[command(about = "Play blackjack or three-card poker against the house", long_about = None)]
struct Args {
    /// Shoe seed; derived from the clock when omitted
    #[arg(long, env = "CASINO_SEED")]
    seed: Option<u64>,

    /// Bankroll for a fresh ledger and for each daily top-up
    #[arg(long, env = "CASINO_CHIPS", default_value_t = 1000)]
    chips: u64,

    /// Keep the bankroll in this JSON file instead of in memory
    #[arg(long, env = "CASINO_SAVE_FILE")]
    save_file: Option<PathBuf>,

    /// Append logs to this file; nothing is logged without one
    #[arg(long, env = "CASINO_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Write logs as JSON
    #[arg(long, env = "CASINO_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args)?;

    let options = CasinoOptions::default()
        .with_starting_chips(args.chips)
        .with_seed(args.seed);
    let seed = options.resolve_seed();
    info!(target = LOG_TARGET, seed, chips = options.starting_chips, "starting session");

    let shoe = SharedShoe::new(Shoe::new(seed));
    let ledger: Arc<dyn Ledger> = match args.save_file {
        Some(path) => Arc::new(JsonFileLedger::new(path, options.starting_chips)),
        None => Arc::new(InMemoryLedger::new(options.starting_chips)),
    };

    let (console, lines) = Console::new(options.prompt.clone());
    let stop = console.stop_handle();
    let (display, inbound) = mpsc::unbounded_channel();
    let console_task = tokio::spawn(console.run(inbound));

    let session = Session::new(stop.clone())
        .with_game(Blackjack::new(shoe.clone(), Arc::clone(&ledger), &options))
        .with_game(ThreeCardPoker::new(shoe, ledger, &options));
    let played = session.run(lines, display).await;

    stop.stop();
    let console_result = console_task.await.context("console task panicked")?;
    println!("Thanks for playing!");

    console_result.context("console failed")?;
    played.context("game failed")?;
    Ok(())
}

fn init_tracing(args: &Args) -> Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    if args.json {
        builder
            .json()
            .try_init()
            .map_err(|err| anyhow!("failed to initialize tracing subscriber: {err}"))
    } else {
        builder
            .try_init()
            .map_err(|err| anyhow!("failed to initialize tracing subscriber: {err}"))
    }
}
