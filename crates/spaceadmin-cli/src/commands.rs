//! Subcommand handlers

use crate::output;
use crate::{Commands, DataArgs, Format, ResourceKind};
use serde::de::DeserializeOwned;
use spaceadmin_client::http::Attachment;
use spaceadmin_client::resources::{
    Blogs, EstablishmentTypes, Jobs, Partners, Properties, PropertyCategories, RolePermissions,
    Roles, SpaceSubTypes, SpaceTypes, SubUsers, Users,
};
use spaceadmin_client::{AppState, CancellationToken, Creatable, Editable, Resource, Toggleable};
use spaceadmin_core::permission::PermissionAction;
use spaceadmin_core::types::{LoginRequest, RecordStatus};
use spaceadmin_core::{Config, Error, Result};
use std::path::PathBuf;
use tracing::{debug, info};

/// Parse a `field=path` upload argument
///
/// # Errors
///
/// Returns a message when the argument has no `=` or an empty side.
pub(crate) fn parse_upload(arg: &str) -> std::result::Result<(String, PathBuf), String> {
    match arg.split_once('=') {
        Some((field, path)) if !field.trim().is_empty() && !path.trim().is_empty() => {
            Ok((field.trim().to_string(), PathBuf::from(path.trim())))
        }
        _ => Err(format!("expected FIELD=PATH, got '{arg}'")),
    }
}

macro_rules! dispatch {
    ($kind:expr, $verb:literal, [$($variant:ident => $ty:ty),+ $(,)?], $handler:ident $args:tt) => {
        match $kind {
            $(ResourceKind::$variant => $handler::<$ty> $args .await,)+
            #[allow(unreachable_patterns)]
            other => Err(Error::validation(
                "resource",
                format!("{} cannot be {}", other.name(), $verb),
            )),
        }
    };
}

/// Run `command`
///
/// # Errors
///
/// Returns the first error of the command; the caller prints its banner.
pub(crate) async fn run(
    command: Commands,
    config: Config,
    cancel: &CancellationToken,
) -> Result<()> {
    if let Commands::Config { show, validate } = command {
        return handle_config_command(&config, show, validate);
    }

    let state = AppState::open(config)?;

    match command {
        Commands::Login {
            email,
            password,
            user_type,
        } => login(&state, email, password, user_type, cancel).await,
        Commands::Logout => {
            state.logout()?;
            println!("Logged out");
            Ok(())
        }
        other => {
            if state.is_authenticated() {
                state.fetch_user_permissions(cancel).await;
            }
            run_signed_in(&state, other, cancel).await
        }
    }
}

async fn run_signed_in(
    state: &AppState,
    command: Commands,
    cancel: &CancellationToken,
) -> Result<()> {
    match command {
        Commands::Whoami { format } => output::whoami(&state.session(), format),
        Commands::Nav => {
            output::navigation(&state.navigation());
            Ok(())
        }
        Commands::Sidebar { visible } => {
            if let Some(visible) = visible {
                state.set_sidebar_visible(visible)?;
            }
            println!("sidebar visible: {}", state.sidebar_visible());
            Ok(())
        }
        Commands::Route { path } => {
            output::route_decision(&path, &state.guard(&path));
            Ok(())
        }
        Commands::List {
            resource,
            page,
            search,
            status,
            city,
            format,
        } => {
            let filters = ListFilters {
                page,
                search,
                status,
                city,
                format,
            };
            dispatch!(resource, "listed", [
                Users => Users,
                Partners => Partners,
                SubUsers => SubUsers,
                Roles => Roles,
                RolePermissions => RolePermissions,
                Properties => Properties,
                PropertyCategories => PropertyCategories,
                Blogs => Blogs,
                Jobs => Jobs,
                EstablishmentTypes => EstablishmentTypes,
                SpaceTypes => SpaceTypes,
                SpaceSubTypes => SpaceSubTypes,
            ], list(state, &filters, cancel))
        }
        Commands::Show { resource, id } => dispatch!(resource, "shown", [
            Users => Users,
            Partners => Partners,
            SubUsers => SubUsers,
            Roles => Roles,
            RolePermissions => RolePermissions,
            Properties => Properties,
            PropertyCategories => PropertyCategories,
            Blogs => Blogs,
            Jobs => Jobs,
            EstablishmentTypes => EstablishmentTypes,
            SpaceTypes => SpaceTypes,
            SpaceSubTypes => SpaceSubTypes,
        ], show(state, &id, cancel)),
        Commands::Add {
            resource,
            data,
            upload,
        } => {
            let data = read_data(&data)?;
            dispatch!(resource, "created", [
                Partners => Partners,
                SubUsers => SubUsers,
                Roles => Roles,
                RolePermissions => RolePermissions,
                Properties => Properties,
                Blogs => Blogs,
                Jobs => Jobs,
                EstablishmentTypes => EstablishmentTypes,
                SpaceTypes => SpaceTypes,
                SpaceSubTypes => SpaceSubTypes,
            ], add(state, data, &upload, cancel))
        }
        Commands::Update { resource, id, data } => {
            let data = read_data(&data)?;
            dispatch!(resource, "edited", [
                Partners => Partners,
                Roles => Roles,
                RolePermissions => RolePermissions,
                Properties => Properties,
                Blogs => Blogs,
                Jobs => Jobs,
                EstablishmentTypes => EstablishmentTypes,
                SpaceTypes => SpaceTypes,
                SpaceSubTypes => SpaceSubTypes,
            ], update(state, &id, data, cancel))
        }
        Commands::Delete { resource, id } => dispatch!(resource, "deleted", [
            Partners => Partners,
            Roles => Roles,
            RolePermissions => RolePermissions,
            Properties => Properties,
            Blogs => Blogs,
            Jobs => Jobs,
            EstablishmentTypes => EstablishmentTypes,
            SpaceTypes => SpaceTypes,
            SpaceSubTypes => SpaceSubTypes,
        ], delete(state, &id, cancel)),
        Commands::Status {
            resource,
            id,
            status,
        } => {
            let status: RecordStatus = status.parse()?;
            dispatch!(resource, "activated or deactivated", [
                Users => Users,
                Partners => Partners,
            ], set_status(state, &id, status, cancel))
        }
        Commands::Login { .. } | Commands::Logout | Commands::Config { .. } => Ok(()),
    }
}

async fn login(
    state: &AppState,
    email: String,
    password: String,
    user_type: Option<i64>,
    cancel: &CancellationToken,
) -> Result<()> {
    let request = LoginRequest {
        email,
        password,
        user_type: user_type.unwrap_or(state.config().ui.default_user_type),
    };

    let user = state.login(&request, cancel).await?;
    let granted = state.session().permissions.len();
    info!(user = %user.email, granted, "signed in");
    println!("Signed in as {} ({})", user.name, user.email);
    Ok(())
}

struct ListFilters {
    page: u32,
    search: Option<String>,
    status: Option<String>,
    city: Option<String>,
    format: Format,
}

async fn list<R: Resource>(
    state: &AppState,
    filters: &ListFilters,
    cancel: &CancellationToken,
) -> Result<()> {
    state.require(R::MODULE, PermissionAction::View)?;

    let mut page = state.list_page::<R>();
    if let Some(search) = &filters.search {
        page.set_search(search.clone());
    }
    if let Some(status) = &filters.status {
        page.set_status_filter(status.clone());
    }
    if let Some(city) = &filters.city {
        page.set_city(city.clone());
    }
    page.set_page(filters.page);

    page.load(cancel).await?;
    match page.state().data() {
        Some(loaded) => output::records(loaded, filters.format),
        None => Ok(()),
    }
}

async fn show<R: Resource>(state: &AppState, id: &str, cancel: &CancellationToken) -> Result<()> {
    state.require(R::MODULE, PermissionAction::View)?;
    let record = state.resource::<R>().get(id, cancel).await?;
    output::json(&record)
}

async fn add<R>(
    state: &AppState,
    data: serde_json::Value,
    uploads: &[(String, PathBuf)],
    cancel: &CancellationToken,
) -> Result<()>
where
    R: Creatable,
    R::Draft: DeserializeOwned,
{
    state.require(R::MODULE, PermissionAction::Create)?;
    let draft: R::Draft = parse_draft(data)?;

    if uploads.is_empty() {
        let mut form = state.create_page::<R>();
        form.submit_create(&draft, cancel).await?;
        output::banner(form.banner());
        return Ok(());
    }

    let files = uploads
        .iter()
        .map(|(field, path)| Attachment::from_path(field.clone(), path))
        .collect::<Result<Vec<_>>>()?;
    let saved = state.resource::<R>().create_with_files(&draft, files, cancel).await?;
    println!("{}", if saved.message.is_empty() { "Created" } else { saved.message.as_str() });
    Ok(())
}

async fn update<R>(
    state: &AppState,
    id: &str,
    data: serde_json::Value,
    cancel: &CancellationToken,
) -> Result<()>
where
    R: Editable,
    R::Draft: DeserializeOwned,
{
    state.require(R::MODULE, PermissionAction::Edit)?;
    let draft: R::Draft = parse_draft(data)?;

    let mut form = state.edit_page::<R>(id);
    form.submit(&draft, cancel).await?;
    output::banner(form.banner());
    Ok(())
}

async fn delete<R: Editable>(state: &AppState, id: &str, cancel: &CancellationToken) -> Result<()> {
    state.require(R::MODULE, PermissionAction::Delete)?;

    let message = state.resource::<R>().delete(id, cancel).await?;
    debug!(resource = R::NAME, id, "delete confirmed");
    println!("{}", if message.is_empty() { "Deleted" } else { message.as_str() });
    Ok(())
}

async fn set_status<R: Toggleable>(
    state: &AppState,
    id: &str,
    status: RecordStatus,
    cancel: &CancellationToken,
) -> Result<()> {
    state.require(R::MODULE, PermissionAction::Edit)?;

    let message = state.resource::<R>().set_status(id, status, cancel).await?;
    println!("{}", if message.is_empty() { "Status updated" } else { message.as_str() });
    Ok(())
}

fn read_data(args: &DataArgs) -> Result<serde_json::Value> {
    let text = match (&args.data, &args.data_file) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => return Err(Error::validation("data", "record fields are required")),
    };
    serde_json::from_str(&text).map_err(|e| Error::validation("data", format!("invalid JSON: {e}")))
}

fn parse_draft<T: DeserializeOwned>(data: serde_json::Value) -> Result<T> {
    serde_json::from_value(data).map_err(|e| Error::validation("data", e.to_string()))
}

/// Handle configuration commands
///
/// # Errors
///
/// Returns error if configuration is invalid or cannot be serialized
fn handle_config_command(config: &Config, show: bool, validate: bool) -> Result<()> {
    if validate {
        config.validate()?;
        println!("Configuration is valid");
    }

    if show {
        let config_toml = toml::to_string_pretty(config)
            .map_err(|e| Error::configuration(format!("Failed to serialize configuration: {e}")))?;
        println!("{config_toml}");
    }

    Ok(())
}
