//! relaydesk-envclean - collapse duplicate keys in a local env file.
//!
//! Standalone counterpart of the reconciler's fallback-file sync: keeps the
//! last value of each duplicated key while preserving comment order.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use relaydesk::envfile::dedup_file;

#[derive(Debug, Parser)]
#[command(
    name = "relaydesk-envclean",
    author,
    version,
    about = "Clean duplicate entries in an env file, keeping the last occurrence of each key."
)]
struct Cli {
    /// Env file to clean
    #[arg(default_value = ".env.local")]
    path: PathBuf,

    /// Print the cleaned content
    #[arg(long)]
    show: bool,
}

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        let _ = writeln!(io::stderr(), "Error: {err:?}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

#[tokio::main]
async fn try_main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let (clean, overrides) = dedup_file(&cli.path)
        .await
        .with_context(|| format!("cleaning {}", cli.path.display()))?;

    if overrides.is_empty() {
        println!("No duplicate keys found in {}", cli.path.display());
    } else {
        println!(
            "Collapsed {} duplicate(s) in {}:",
            overrides.len(),
            cli.path.display()
        );
        for o in &overrides {
            println!("  {}: {} -> {}", o.key, o.old_value, o.new_value);
        }
    }

    let unique_keys = clean
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#') && trimmed.contains('=')
        })
        .count();
    println!("Total unique keys: {unique_keys}");

    if cli.show {
        println!();
        print!("{clean}");
    }

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("relaydesk=info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
        .ok();
}
