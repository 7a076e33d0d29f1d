//! Core types and utilities for the `spaceadmin` marketplace admin client

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod config;
pub mod envelope;
pub mod error;
pub mod navigation;
pub mod permission;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use envelope::{Envelope, ListQuery, ListShape, Page, Paginated};
pub use error::{Error, Result};
pub use navigation::{NavItem, default_tree, filter_navigation};
pub use permission::{
    ModulePermission, PermissionAction, PermissionFlags, allowed_actions, has_permission,
};
pub use types::{AdminUser, RecordId, RecordStatus};

/// Initialize the logging system
///
/// `RUST_LOG` wins over `level` when it is set. `format` selects between
/// `json` and human readable output (`pretty` or `text`).
///
/// # Errors
///
/// Returns an error if a global subscriber was already installed.
pub fn init_logging(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match format {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        "text" => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        _ => registry
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
    };

    result.map_err(|e| Error::Configuration {
        message: format!("failed to initialize logging: {e}"),
    })
}
