//! Number Bot - Entry Point
//!
//! Interactive console for the math brain. With LLM_API_KEY set, free text
//! goes to the classifier and the reconciled reply is printed as JSON.
//! Without it, `calc` and `count` exercise the deterministic core directly.

use number_bot::brain::Brain;
use number_bot::core::config::BotConfig;
use number_bot::core::error::Result;
use number_bot::core::types::{Intent, IntentResult, MathLogic};
use number_bot::math::parse_grouped;
use number_bot::math::Number;

use std::io::{self, Write};
use std::path::Path;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "data/number_bot.toml";

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("number_bot=info")),
        )
        .init();

    tracing::info!("Number Bot starting...");

    let config = BotConfig::load_or_default(Path::new(CONFIG_PATH))?;

    // Create the async runtime for classifier calls
    let rt = Runtime::new()?;

    let brain = Brain::from_config(&config);
    if !brain.has_classifier() {
        tracing::warn!("LLM_API_KEY not set - running without the classifier");
    }

    // Display welcome message
    println!("\n=== NUMBER BOT ===");
    println!("A counting and math buddy that never makes up numbers");
    println!();
    println!("Commands:");
    println!("  calc <expr>     - Solve an arithmetic expression");
    println!("  count <n>       - Plan the jumps for counting to n");
    println!("  quit / q        - Exit");
    if brain.has_classifier() {
        println!("  <any text>      - Ask the bot (classified by LLM)");
    }
    println!();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input == "quit" || input == "q" {
            break;
        }

        if let Some(expression) = input.strip_prefix("calc ") {
            let request = local_request(Intent::Calculate, |logic| {
                logic.expression = Some(expression.to_string());
            });
            print_result(&brain.reconcile(request, expression))?;
            continue;
        }

        if let Some(target) = input.strip_prefix("count ") {
            match parse_grouped(target) {
                Some(n) => {
                    let request = local_request(Intent::Count, |logic| {
                        logic.target_number = Some(Number::Int(n));
                    });
                    print_result(&brain.reconcile(request, input))?;
                }
                None => println!("Usage: count <whole number>"),
            }
            continue;
        }

        if brain.has_classifier() {
            match rt.block_on(brain.respond(input)) {
                Ok(result) => print_result(&result)?,
                Err(e) => println!("Could not get an answer: {}", e),
            }
        } else {
            println!("Unknown command. Available: calc <expr>, count <n>, quit");
        }
    }

    println!("\nGoodbye!");
    Ok(())
}

/// Build a request as if the classifier had produced it
fn local_request(intent: Intent, fill: impl FnOnce(&mut MathLogic)) -> IntentResult {
    let mut result = IntentResult::default();
    result.math_logic.intent = intent;
    fill(&mut result.math_logic);
    result
}

fn print_result(result: &IntentResult) -> Result<()> {
    println!();
    println!("{}", result.display_text);
    if !result.screen_summary.is_empty() {
        println!("[screen] {}", result.screen_summary);
    }
    println!("{}", serde_json::to_string_pretty(result)?);
    println!();
    Ok(())
}
