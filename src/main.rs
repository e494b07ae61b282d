//! MathNotes: symbolic math analysis over HTTP.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::info;

use mathnotes::service::{create_router, AppState, ServerConfig, ServiceKind, SymbolTable};

#[derive(Parser)]
#[command(
    name = "mathnotes",
    version = env!("CARGO_PKG_VERSION"),
    about = "Symbolic math analysis over HTTP",
    after_help = r#"
Environment Variables:
  MATHNOTES_HOST=0.0.0.0        Address to bind
  MATHNOTES_PORT=8000           Port to bind
  MATHNOTES_LOG_LEVEL=info      Log level (error, warn, info, debug, trace)
"#
)]
struct Cli {
    /// Address to bind
    #[arg(long, env = "MATHNOTES_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to bind
    #[arg(long, env = "MATHNOTES_PORT", default_value_t = 8000)]
    port: u16,

    /// Set log level
    #[arg(long, value_enum, env = "MATHNOTES_LOG_LEVEL", default_value = "info")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Equation analysis: `POST /analyze`
    Analysis,
    /// Expression toolkit: `POST /solve`, `/derivative`, `/integrate`, `/latex`
    Toolkit,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl From<Commands> for ServiceKind {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Analysis => ServiceKind::Analysis,
            Commands::Toolkit => ServiceKind::Toolkit,
        }
    }
}

/// Stack of runtime and engine threads; canonicalization recurses over the expression tree.
const THREAD_STACK_SIZE: usize = 8 * 1024 * 1024;

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .filter_level(cli.log_level.into())
        .init();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_stack_size(THREAD_STACK_SIZE)
        .build()
        .context("failed to start the runtime")?
        .block_on(serve(cli))
}

async fn serve(cli: Cli) -> Result<()> {
    let config = ServerConfig::new(cli.command.into(), &cli.host, cli.port)
        .with_context(|| format!("invalid host '{}'", cli.host))?;
    let router = create_router(AppState::new(config.service, SymbolTable::standard()));

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    info!(
        "{} {} listening on http://{}",
        config.info.title, config.info.version, config.addr
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {err}");
    }
}
