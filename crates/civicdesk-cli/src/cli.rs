//! CLI argument definitions for CivicDesk.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// CivicDesk -- municipal complaint intake.
#[derive(Parser)]
#[command(
    name = "civicdesk",
    version,
    about = "CivicDesk -- municipal complaint intake",
    long_about = "Residents register, file complaints that are routed to a department, \
                  and an administrator tracks their status."
)]
pub struct Cli {
    /// Path to the TOML config file. Defaults to `config/civicdesk.toml`
    /// when that file exists.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines instead of the compact text format.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Seed the default user, then start the web server.
    Serve {
        /// Address to bind the HTTP server to.
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on.
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Insert the default user if it is missing.
    Seed,

    /// Inspect and update complaints.
    Complaints {
        #[command(subcommand)]
        action: ComplaintAction,
    },

    /// Manage registered users.
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
}

/// Actions for complaints.
#[derive(Subcommand)]
pub enum ComplaintAction {
    /// List all complaints in the order they were filed.
    List {
        /// Print a JSON array instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Set the status of one complaint.
    SetStatus {
        /// Complaint id.
        id: i64,
        /// New status text, e.g. "Resolved".
        status: String,
    },
}

/// Actions for users.
#[derive(Subcommand)]
pub enum UserAction {
    /// Register a user.
    Add {
        /// Display name.
        name: String,
        /// Mobile number, unique per user.
        mobile: String,
    },
}
