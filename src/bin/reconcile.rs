//! Offline Reconciler
//!
//! Replays a recorded classifier reply through the math brain and prints
//! the authoritative JSON record. Useful for checking what the bot would
//! have said without calling the classifier.

use clap::Parser;
use number_bot::brain::Brain;
use number_bot::core::config::BotConfig;
use number_bot::llm::context::BrainContext;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Offline Reconciler - replay classifier output through the math brain
#[derive(Parser, Debug)]
#[command(name = "reconcile")]
#[command(about = "Reconcile a recorded classifier reply and print the corrected JSON")]
struct Args {
    /// File with the raw classifier reply (reads stdin when omitted)
    input: Option<PathBuf>,

    /// The utterance the reply answers
    #[arg(long, short = 'u', default_value = "")]
    user_text: String,

    /// Configuration file (evaluator limits are taken from here)
    #[arg(long, default_value = "data/number_bot.toml")]
    config: PathBuf,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("number_bot=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> number_bot::core::error::Result<()> {
    let config = BotConfig::load_or_default(&args.config)?;

    let raw = match &args.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let brain = Brain::new(&config, BrainContext::builtin(), None);
    let result = brain.respond_to_reply(&raw, &args.user_text);

    let output = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", output);
    Ok(())
}
