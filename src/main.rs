use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use po_autotranslate::{
    config::Config,
    orchestrator::{self, BatchOptions},
    report, scanner,
    translation::{Dialect, TranslationClient},
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Show untranslated entries
    Report,
    /// Show the report, then auto-translate
    Translate,
}

#[derive(Parser)]
#[command(name = "po-autotranslate")]
#[command(version)]
#[command(about = "Auto-translate empty msgstr entries in .po files using a DeepL-compatible service")]
#[command(long_about = None)]
struct Cli {
    /// What to do with the untranslated entries
    #[arg(long, value_enum, default_value = "report")]
    mode: Mode,

    /// Catalog root containing one directory per language [env: PO_DIR]
    #[arg(long, value_name = "DIR")]
    po_dir: Option<PathBuf>,

    /// Translation service base URL [env: TRANSLATE_API_URL]
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Endpoint dialect: restricted (free), extended (pro) or standard (official) [env: TRANSLATE_ENDPOINT]
    #[arg(long, value_name = "DIALECT")]
    endpoint: Option<Dialect>,

    /// Entries per translation request [env: BATCH_SIZE]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    batch_size: Option<u64>,

    /// Seconds to wait between batches [env: BATCH_DELAY_SECS]
    #[arg(long, value_name = "SECS")]
    delay: Option<f64>,

    /// Seconds to wait between single-text requests of the restricted dialect [env: REQUEST_DELAY_SECS]
    #[arg(long, value_name = "SECS")]
    request_delay: Option<f64>,

    /// Attempts per HTTP request [env: MAX_RETRIES]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    max_retries: Option<u32>,

    /// Show what would be translated without calling the service or writing files
    #[arg(long)]
    dry_run: bool,

    /// Do not ask for confirmation before translating
    #[arg(short, long)]
    yes: bool,
}

fn seconds(value: f64, flag: &str) -> Result<Duration> {
    Duration::try_from_secs_f64(value).with_context(|| format!("Invalid --{}: {}", flag, value))
}

/// Environment configuration with command line overrides applied.
fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::from_env()?;

    if let Some(po_dir) = &cli.po_dir {
        config.po_dir = po_dir.clone();
    }
    if let Some(api_url) = &cli.api_url {
        config.api_url = api_url.clone();
    }
    if let Some(dialect) = cli.endpoint {
        config.dialect = dialect;
    }
    if let Some(batch_size) = cli.batch_size {
        config.batch_size = usize::try_from(batch_size).context("Invalid --batch-size")?;
    }
    if let Some(delay) = cli.delay {
        config.batch_delay = seconds(delay, "delay")?;
    }
    if let Some(delay) = cli.request_delay {
        config.request_delay = seconds(delay, "request-delay")?;
    }
    if let Some(max_retries) = cli.max_retries {
        config.max_retries = max_retries;
    }
    config.dry_run = cli.dry_run;

    Ok(config)
}

fn confirm() -> Result<bool> {
    print!("Proceed with translation? (yes/no): ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("po_autotranslate=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;

    if !config.po_dir.is_dir() {
        error!("Directory not found: {}", config.po_dir.display());
        std::process::exit(1);
    }

    info!("Scanning .po files in: {}", config.po_dir.display());
    let results = scanner::scan(&config.po_dir)?;

    if results.is_empty() {
        println!("No untranslated entries found!");
        return Ok(());
    }

    report::print_report(&results);

    if cli.mode == Mode::Report {
        return Ok(());
    }

    println!();
    if !config.dry_run && !cli.yes && !confirm()? {
        println!("Translation cancelled");
        return Ok(());
    }

    let client = TranslationClient::from_config(&config)?;
    let total = orchestrator::run(&results, &client, &BatchOptions::from_config(&config)).await?;

    println!();
    println!("{}", "=".repeat(80));
    println!("Translation complete! Translated {} entries", total);
    println!("{}", "=".repeat(80));

    Ok(())
}
