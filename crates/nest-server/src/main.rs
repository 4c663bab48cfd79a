//! BookNest server.
//!
//! Commands:
//! - `booknest serve` - Run the HTTP API (default)
//! - `booknest migrate` - Apply the database schema
//! - `booknest seed` - Load sample data and an admin account

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use nest_db::Db;
use nest_server::{app, seed, AppState, ServerConfig};

/// BookNest - online bookstore backend
#[derive(Parser)]
#[command(name = "booknest")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path (TOML or JSON)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// SQLite database path, or :memory:
    #[arg(long, global = true)]
    database: Option<String>,

    /// Address to listen on, host:port
    #[arg(short, long, global = true)]
    bind: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve(ServeArgs),

    /// Apply the database schema and exit
    Migrate,

    /// Load sample catalog data and an admin account
    Seed(SeedArgs),
}

#[derive(Args, Default)]
struct ServeArgs {
    /// Seed sample data before serving
    #[arg(long)]
    seed: bool,
}

#[derive(Args)]
struct SeedArgs {
    /// Password for the admin account, if it has to be created
    #[arg(long)]
    admin_password: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = ServerConfig::resolve(cli.config.as_deref())?;
    if let Some(path) = cli.database {
        config.database.path = path;
    }
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    if cli.verbose {
        config.log.level = "debug".to_string();
    }
    config.validate()?;
    nest_server::logging::init(&config.log.level, config.log.format)?;

    let db = Arc::new(open_database(&config)?);

    match cli.command.unwrap_or(Commands::Serve(ServeArgs::default())) {
        Commands::Migrate => {
            tracing::info!(path = %config.database.path, "schema applied");
            Ok(())
        }
        Commands::Seed(args) => run_seed(db, &config, args.admin_password).await,
        Commands::Serve(args) => {
            if args.seed {
                run_seed(db.clone(), &config, None).await?;
            }
            serve(db, &config).await
        }
    }
}

fn open_database(config: &ServerConfig) -> Result<Db> {
    let db = if config.database.is_in_memory() {
        Db::open_in_memory()
    } else {
        Db::open(&config.database.path)
    }
    .with_context(|| format!("Failed to open database: {}", config.database.path))?;
    db.migrate().context("Failed to apply schema")?;
    Ok(db)
}

async fn run_seed(db: Arc<Db>, config: &ServerConfig, admin_password: Option<String>) -> Result<()> {
    let admin_password = admin_password
        .or_else(|| std::env::var("BOOKNEST_ADMIN_PASSWORD").ok())
        .unwrap_or_else(|| seed::DEFAULT_ADMIN_PASSWORD.to_string());
    let state = AppState::new(db, config);
    let report = tokio::task::spawn_blocking(move || {
        seed::seed(&state.store, &state.accounts, &admin_password)
    })
    .await??;
    if report.is_empty() {
        tracing::info!("sample data already present");
    }
    Ok(())
}

async fn serve(db: Arc<Db>, config: &ServerConfig) -> Result<()> {
    if config.uses_dev_secret() {
        tracing::warn!("using the development JWT secret; set BOOKNEST_JWT_SECRET");
    }
    let router = app(AppState::new(db, config));

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    tracing::info!(addr = %config.server.bind, database = %config.database.path, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
