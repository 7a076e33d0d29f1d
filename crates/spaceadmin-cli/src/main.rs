//! `spaceadmin` command line dashboard
//!
//! Signs in against the marketplace backend, keeps the session on disk and
//! drives the same list and form pages a browser dashboard would.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use spaceadmin_client::CancellationToken;
use spaceadmin_core::{Config, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::signal;
use tracing::{debug, error};

/// Command line interface for the `spaceadmin` dashboard
#[derive(Debug, Parser)]
#[command(
    name = "spaceadmin",
    version = env!("CARGO_PKG_VERSION"),
    about = "Administrative dashboard for a coworking and real-estate marketplace",
    long_about = "Sign in as an administrator, then list, inspect, create, edit, delete and activate marketplace records. Every action is gated by the role permission matrix of the signed-in user type."
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Backend base URL (overrides configuration)
    #[arg(long, value_name = "URL", env = "SPACEADMIN_BASE_URL")]
    base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable structured JSON logging
    #[arg(long)]
    json: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

/// Output format for records
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// One line per record
    Table,
    /// Pretty JSON
    Json,
}

/// Resources reachable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ResourceKind {
    /// Marketplace users
    Users,
    /// Partners (vendors)
    Partners,
    /// Partner sub-users
    SubUsers,
    /// Roles
    Roles,
    /// Role permission matrices
    RolePermissions,
    /// Properties
    Properties,
    /// Property categories
    PropertyCategories,
    /// Blog posts
    Blogs,
    /// Job openings
    Jobs,
    /// Establishment types
    EstablishmentTypes,
    /// Space types
    SpaceTypes,
    /// Space sub-types
    SpaceSubTypes,
}

impl ResourceKind {
    const fn name(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Partners => "partners",
            Self::SubUsers => "sub-users",
            Self::Roles => "roles",
            Self::RolePermissions => "role-permissions",
            Self::Properties => "properties",
            Self::PropertyCategories => "property-categories",
            Self::Blogs => "blogs",
            Self::Jobs => "jobs",
            Self::EstablishmentTypes => "establishment-types",
            Self::SpaceTypes => "space-types",
            Self::SpaceSubTypes => "space-sub-types",
        }
    }
}

/// Record payload given inline or from a file
#[derive(Debug, Clone, clap::Args)]
#[group(required = true, multiple = false)]
struct DataArgs {
    /// Record fields as a JSON object
    #[arg(long, value_name = "JSON")]
    data: Option<String>,

    /// Read the record fields from a JSON file
    #[arg(long, value_name = "FILE")]
    data_file: Option<PathBuf>,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long, env = "SPACEADMIN_PASSWORD", hide_env_values = true)]
        password: String,

        /// User type to sign in as (defaults to the configured one)
        #[arg(short, long)]
        user_type: Option<i64>,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user and granted permissions
    Whoami {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: Format,
    },

    /// Show the sidebar visible to the session
    Nav,

    /// Show or change the sidebar preference
    Sidebar {
        /// New visibility (`true` or `false`)
        #[arg(value_name = "VISIBLE")]
        visible: Option<bool>,
    },

    /// Check what the route guard does with a path
    Route {
        /// Dashboard path, e.g. `/blogs/add`
        path: String,
    },

    /// Validate configuration
    Config {
        /// Show resolved configuration
        #[arg(short, long)]
        show: bool,

        /// Validate configuration file
        #[arg(short, long)]
        validate: bool,
    },

    /// List records
    List {
        /// Resource
        #[arg(value_enum)]
        resource: ResourceKind,

        /// Page number
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Free-text search
        #[arg(short, long)]
        search: Option<String>,

        /// Status filter
        #[arg(long)]
        status: Option<String>,

        /// City filter
        #[arg(long)]
        city: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: Format,
    },

    /// Show one record
    Show {
        /// Resource
        #[arg(value_enum)]
        resource: ResourceKind,

        /// Record id
        id: String,
    },

    /// Create a record
    Add {
        /// Resource
        #[arg(value_enum)]
        resource: ResourceKind,

        /// Record fields
        #[command(flatten)]
        data: DataArgs,

        /// File uploads as `field=path`; sends a multipart form
        #[arg(long, value_name = "FIELD=PATH", value_parser = commands::parse_upload)]
        upload: Vec<(String, PathBuf)>,
    },

    /// Edit a record
    Update {
        /// Resource
        #[arg(value_enum)]
        resource: ResourceKind,

        /// Record id
        id: String,

        /// Record fields
        #[command(flatten)]
        data: DataArgs,
    },

    /// Delete a record
    Delete {
        /// Resource
        #[arg(value_enum)]
        resource: ResourceKind,

        /// Record id
        id: String,
    },

    /// Change the status of a record
    Status {
        /// Resource
        #[arg(value_enum)]
        resource: ResourceKind,

        /// Record id
        id: String,

        /// New status (active, inactive, pending, draft, published)
        status: String,
    },
}

/// Main entry point
#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if it exists (for development convenience)
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e.banner_message());
            return ExitCode::FAILURE;
        }
    };

    init_logging(&cli, &config);
    if let Err(e) = dotenv {
        debug!(error = %e, ".env file not loaded");
    }

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });

    match commands::run(cli.command, config, &cancel).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("error: {}", e.banner_message());
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging; falls back to stderr warnings if a subscriber exists
fn init_logging(cli: &Cli, config: &Config) {
    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    let format = if cli.json { "json" } else { config.logging.format.as_str() };

    if let Err(e) = spaceadmin_core::init_logging(level, format) {
        eprintln!("warning: {e}");
    }
}

/// Load configuration from file or environment, then apply flag overrides
///
/// # Errors
///
/// Returns error if the configuration cannot be read, parsed or validated
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    if let Some(base_url) = &cli.base_url {
        config.api.base_url.clone_from(base_url);
        config.validate()?;
    }

    Ok(config)
}
