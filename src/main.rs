//! Library Manager - interactive console front end

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use library_manager::{
    cli,
    config::{AppConfig, LoggingConfig},
    JsonFileStore, LibraryService,
};

/// Track books, users and loans from the terminal.
#[derive(Parser)]
#[command(name = "library-manager", version, about, long_about = None)]
struct Cli {
    /// Library JSON file (overrides `library.data_file`).
    #[arg(short, long)]
    data_file: Option<PathBuf>,

    /// Extra configuration file layered over `config/default`.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Cli::parse();

    let mut config =
        AppConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    if let Some(data_file) = args.data_file {
        config.library.data_file = data_file;
    }

    let _guard = init_tracing(&config.logging, args.verbose)?;

    tracing::info!("Starting Library Manager v{}", env!("CARGO_PKG_VERSION"));

    let data_file = config.library.data_file.clone();
    let mut library = LibraryService::new(config.library.loan_period_days);
    tracing::debug!(
        "Loans run for {} days, data file {}",
        library.loan_period_days(),
        data_file.display()
    );
    cli::restore_library(&mut library, &JsonFileStore::new(&data_file));

    let stdin = io::stdin();
    let stdout = io::stdout();
    cli::run(&mut library, &data_file, stdin.lock(), stdout.lock())
        .context("terminal I/O failed")?;

    tracing::info!("Library Manager stopped");
    Ok(())
}

/// Logs go to stderr so the menu on stdout stays readable. `RUST_LOG`
/// overrides the configured level.
fn init_tracing(logging: &LoggingConfig, verbose: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("library_manager={}", level).into());

    let (file_layer, guard) = match &logging.directory {
        Some(dir) => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix("library-manager")
                .filename_suffix("log")
                .build(dir)
                .with_context(|| format!("failed to open log directory {}", dir.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);
    if logging.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .try_init()?;
    } else {
        registry.with(fmt::layer().with_writer(io::stderr)).try_init()?;
    }

    Ok(guard)
}
