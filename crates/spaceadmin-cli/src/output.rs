//! Terminal rendering

use crate::Format;
use serde::Serialize;
use spaceadmin_client::{Banner, RouteDecision, Session};
use spaceadmin_core::navigation::NavItem;
use spaceadmin_core::permission::allowed_actions;
use spaceadmin_core::utils::mask_token;
use spaceadmin_core::{Page, Result};

/// Pretty-print `value` as JSON
///
/// # Errors
///
/// Returns an error if `value` cannot be serialized.
pub(crate) fn json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a loaded page of records
///
/// # Errors
///
/// Returns an error if a record cannot be serialized.
pub(crate) fn records<T: Serialize>(page: &Page<T>, format: Format) -> Result<()> {
    if format == Format::Json {
        return json(page);
    }

    for item in &page.items {
        println!("{}", summary_line(&serde_json::to_value(item)?));
    }
    println!(
        "-- page {} of {} ({} total)",
        page.page,
        page.total_pages(),
        page.total
    );
    Ok(())
}

/// `id  label  status` for a record
fn summary_line(value: &serde_json::Value) -> String {
    let field = |name: &str| value.get(name).and_then(serde_json::Value::as_str);

    let id = field("id").unwrap_or("-");
    let label = ["name", "title", "role_name", "email"]
        .iter()
        .find_map(|name| field(name))
        .unwrap_or("");

    match field("status") {
        Some(status) => format!("{id:<26} {label:<40} {status}"),
        None => format!("{id:<26} {label}"),
    }
}

/// Print the signed-in user and the permission matrix
///
/// # Errors
///
/// Returns an error if JSON output cannot be serialized.
pub(crate) fn whoami(session: &Session, format: Format) -> Result<()> {
    let Some(user) = &session.user else {
        println!("Not signed in");
        return Ok(());
    };

    if format == Format::Json {
        return json(&serde_json::json!({
            "user": user,
            "user_type": session.user_type,
            "permissions": session.permissions,
        }));
    }

    println!("{} <{}>", user.name, user.email);
    if let Some(role) = &user.role {
        println!("role:      {role}");
    }
    if let Some(user_type) = session.user_type {
        println!("user type: {user_type}");
    }
    if let Some(token) = &session.token {
        println!("token:     {}", mask_token(token));
    }

    for module in &session.permissions {
        let actions: Vec<_> = allowed_actions(&session.permissions, &module.module_name)
            .into_iter()
            .map(|a| a.as_str())
            .collect();
        if !actions.is_empty() {
            println!("  {:<18} {}", module.module_name, actions.join(", "));
        }
    }
    Ok(())
}

/// Print the sidebar tree
pub(crate) fn navigation(items: &[NavItem]) {
    fn walk(items: &[NavItem], depth: usize) {
        for item in items {
            let indent = "  ".repeat(depth);
            match &item.path {
                Some(path) => println!("{indent}{:<24} {path}", item.title),
                None => println!("{indent}{}", item.title),
            }
            walk(&item.children, depth + 1);
        }
    }

    walk(items, 0);
}

/// Print the route guard's decision
pub(crate) fn route_decision(path: &str, decision: &RouteDecision) {
    match decision {
        RouteDecision::Render => println!("{path}: render"),
        RouteDecision::Redirect(to) => println!("{path}: redirect to {to}"),
        RouteDecision::Forbidden { module } => println!("{path}: forbidden (no view on {module})"),
        RouteDecision::NotFound => println!("{path}: not found"),
    }
}

/// Print a page banner
pub(crate) fn banner(banner: Option<&Banner>) {
    match banner {
        Some(Banner::Success(message)) => println!("{message}"),
        Some(Banner::Error(message)) => eprintln!("error: {message}"),
        None => {}
    }
}
