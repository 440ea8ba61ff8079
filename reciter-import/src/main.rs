//! reciter-import - archive.org reciter importer
//!
//! Fetches an archive.org item page, extracts its MP3 files, infers how the
//! files are named and adds the resulting reciter entry to
//! `custom-reciters.json`.
//!
//! Exit code 0 on success or when the user declines an overwrite, 1 on any
//! error.

use anyhow::Result;
use clap::Parser;
use reciter_common::config::{load_toml_config, ConfigOverrides, ImportConfig, LoadedConfig};
use reciter_common::Confirm;
use reciter_import::fetch::PageFetcher;
use reciter_import::prompt::{AssumeYes, LinePrompt};
use reciter_import::{import_page, ImportRequest};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};

/// Command-line arguments for reciter-import
#[derive(Parser, Debug)]
#[command(name = "reciter-import")]
#[command(about = "Import Quran reciters from archive.org to custom-reciters.json")]
#[command(version)]
struct Args {
    /// Archive.org URL (e.g., https://archive.org/details/uzbekquran)
    url: String,

    /// Name of the reciter to display
    #[arg(long)]
    name: String,

    /// Path to custom-reciters.json file [default: custom-reciters.json]
    #[arg(long, env = "RECITER_OUTPUT")]
    output: Option<PathBuf>,

    /// Print the entry without adding to file
    #[arg(long)]
    dry_run: bool,

    /// Overwrite an existing entry without asking
    #[arg(short, long)]
    yes: bool,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[arg(long, value_name = "SECS", env = "RECITER_TIMEOUT_SECS")]
    timeout: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Config is read before tracing exists so its log level can apply
    let loaded = load_toml_config(args.config.as_deref());
    let log_level = loaded
        .as_ref()
        .map(|l| l.config.logging.level.clone())
        .unwrap_or_else(|_| "warn".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    debug!(
        "reciter-import v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let loaded = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(1);
        }
    };

    match run(args, loaded).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(1)
        }
    }
}

async fn run(args: Args, loaded: LoadedConfig) -> Result<()> {
    match &loaded.source {
        Some(path) => debug!("Loaded configuration from {}", path.display()),
        None => debug!("No config file found; using defaults"),
    }

    let config = ImportConfig::resolve(
        &loaded.config,
        ConfigOverrides {
            output: args.output,
            timeout_secs: args.timeout,
        },
    )?;

    println!("Fetching page: {}", args.url);
    let fetcher = PageFetcher::from_config(&config)?;
    let html = fetcher.fetch(&args.url).await?;

    let mut confirm: Box<dyn Confirm> = if args.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(LinePrompt::stdio())
    };

    let request = ImportRequest {
        name: &args.name,
        output: &config.output,
        dry_run: args.dry_run,
    };
    import_page(&html, &request, confirm.as_mut(), &mut std::io::stdout())?;

    Ok(())
}
