//! Story Validator: checks the story graph, puzzles and agent data of a game.
//!
//! Usage: story_validator
//!
//! Reads `web/data/{agents,story,puzzles}.json` and the assets under `web/`
//! relative to the working directory, or the paths given in an optional
//! `story_validator.ron`. Exits 1 if any error was found.

use std::path::Path;
use std::process;

use story_integrity::{validate, ValidatorConfig};

const LOG_ENV: &str = "STORY_VALIDATOR_LOG";

fn main() {
    init_tracing();

    let config = match ValidatorConfig::discover(Path::new(".")) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("WARNING: ignoring invalid config file: {}", e);
            ValidatorConfig::default()
        }
    };

    let outcome = validate(&config);
    print!("{}", outcome);

    process::exit(outcome.exit_code());
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("WARNING: failed to initialize logging: {}", e);
    }
}
