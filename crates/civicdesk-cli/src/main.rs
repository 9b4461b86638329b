//! CLI entry point for CivicDesk.
//!
//! This binary provides the `civicdesk` command with subcommands for
//! serving the web front end and administering the complaint store from
//! the shell.

mod cli;
mod config;

use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use civicdesk_store::{ComplaintStore, StatusUpdate, UserCreation, open_store};
use civicdesk_web::WebServer;

use crate::cli::{Cli, Commands, ComplaintAction, UserAction};
use crate::config::{AppConfig, load_dotenv};

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Before tracing, so RUST_LOG from .env applies.
    let dotenv = load_dotenv()?;

    let default_level = match cli.command {
        Commands::Serve { .. } => "info",
        _ => "warn",
    };
    init_tracing(default_level, cli.log_json);
    if let Some(path) = dotenv {
        debug!(path = %path.display(), "loaded .env");
    }

    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { bind, port } => cmd_serve(config, bind, port).await,
        Commands::Seed => cmd_seed(&config).await,
        Commands::Complaints { action } => match action {
            ComplaintAction::List { json } => cmd_complaints_list(&config, json).await,
            ComplaintAction::SetStatus { id, status } => {
                cmd_complaints_set_status(&config, id, &status).await
            }
        },
        Commands::Users { action } => match action {
            UserAction::Add { name, mobile } => cmd_users_add(&config, &name, &mobile).await,
        },
    }
}

/// Initialise the global tracing subscriber.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_tracing(default_level: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

async fn store(config: &AppConfig) -> Result<Arc<dyn ComplaintStore>> {
    open_store(&config.store)
        .await
        .with_context(|| format!("failed to open {} store", config.store.backend))
}

// ---------------------------------------------------------------------------
// Subcommand: serve
// ---------------------------------------------------------------------------

async fn cmd_serve(mut config: AppConfig, bind: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let store = store(&config).await?;
    let seeded = store
        .seed_default_user()
        .await
        .context("failed to seed default user")?;
    info!(backend = store.backend_name(), seeded, "store ready");

    let server = WebServer::new(config.web_config()?, store);
    println!();
    println!("  CivicDesk v{}", env!("CARGO_PKG_VERSION"));
    println!("  Listening on http://{}", server.addr());
    println!();

    server
        .start()
        .await
        .map_err(|e| anyhow!(e))
        .context("web server failed")
}

// ---------------------------------------------------------------------------
// Subcommand: seed
// ---------------------------------------------------------------------------

async fn cmd_seed(config: &AppConfig) -> Result<()> {
    let store = store(config).await?;
    if store.seed_default_user().await.context("failed to seed")? {
        println!("Seeded default user.");
    } else {
        println!("Default user already present.");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: complaints
// ---------------------------------------------------------------------------

async fn cmd_complaints_list(config: &AppConfig, json: bool) -> Result<()> {
    let store = store(config).await?;
    let complaints = store
        .list_complaints()
        .await
        .context("failed to list complaints")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&complaints)?);
        return Ok(());
    }

    if complaints.is_empty() {
        println!("No complaints filed yet.");
        return Ok(());
    }

    println!(
        "{:>4}  {:<16}  {:<12}  {:<20}  {:<18}  {:<8}  STATUS",
        "ID", "NAME", "MOBILE", "LOCATION", "DEPARTMENT", "PRIORITY"
    );
    for c in &complaints {
        println!(
            "{:>4}  {:<16}  {:<12}  {:<20}  {:<18}  {:<8}  {}",
            c.id, c.name, c.mobile, c.location, c.department, c.priority, c.status
        );
    }
    Ok(())
}

async fn cmd_complaints_set_status(config: &AppConfig, id: i64, status: &str) -> Result<()> {
    let status = status.trim();
    if status.is_empty() {
        bail!("status must not be empty");
    }

    let store = store(config).await?;
    match store
        .update_status(id, status)
        .await
        .context("failed to update status")?
    {
        StatusUpdate::Updated => {
            println!("Complaint #{id} marked {status}.");
            Ok(())
        }
        StatusUpdate::NotFound => bail!("complaint #{id} not found"),
    }
}

// ---------------------------------------------------------------------------
// Subcommand: users
// ---------------------------------------------------------------------------

async fn cmd_users_add(config: &AppConfig, name: &str, mobile: &str) -> Result<()> {
    let (name, mobile) = (name.trim(), mobile.trim());
    if name.is_empty() || mobile.is_empty() {
        bail!("name and mobile are required");
    }

    let store = store(config).await?;
    match store
        .create_user(name, mobile)
        .await
        .context("failed to create user")?
    {
        UserCreation::Created(user) => {
            println!("Registered {} ({}).", user.name, user.mobile);
            Ok(())
        }
        UserCreation::AlreadyExists => bail!("user with mobile {mobile} already exists"),
    }
}
