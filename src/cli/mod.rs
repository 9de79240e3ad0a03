pub mod context;
pub mod commands;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

pub use context::CliContext;

#[derive(Debug, Parser)]
#[command(
    name = "prm-contacts",
    version,
    about = "Personal relationship manager: contacts and their families"
)]
pub struct Cli {
    /// Database file path (default: .data/prm.db)
    #[arg(short = 'f', long = "file", env = "PRM_DB", global = true)]
    pub file: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, env = "PRM_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the account that owns every contact
    Init {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
    },
    /// Add a contact
    Add {
        first_name: String,
        #[arg(long)]
        last_name: Option<String>,
        /// Placeholder that only exists inside someone's family
        #[arg(long)]
        partial: bool,
    },
    /// List contacts of the account
    List,
    /// Link two contacts as partners
    Partner {
        contact: String,
        partner: String,
        /// Only create contact -> partner
        #[arg(long)]
        one_way: bool,
    },
    /// Remove a partner link
    Unpartner {
        contact: String,
        partner: String,
        #[arg(long)]
        one_way: bool,
    },
    /// Record CHILD as a child of PARENT
    Child {
        child: String,
        parent: String,
        #[arg(long)]
        one_way: bool,
    },
    /// Remove a parent/child link
    Unchild {
        parent: String,
        child: String,
        #[arg(long)]
        one_way: bool,
    },
    /// Show partners, children and parents of a contact
    Family { contact: String },
    /// Contacts that can still be linked to CONTACT
    Potential { contact: String },
    /// Set a contact's birthday (YYYY-MM-DD)
    Birthday { contact: String, date: NaiveDate },
    /// Recent audit events
    Events {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}
