//! Route table and guard
//!
//! Public routes render for anyone, except that a signed-in session visiting
//! the login form is sent to the dashboard. Protected routes need a session
//! and, when a sidebar module gates them, `view` on that module.

use crate::session::Session;
use spaceadmin_core::navigation::{NavItem, module_for_path};
use spaceadmin_core::permission::{PermissionAction, has_permission, modules};

/// Where signed-out visitors are sent
pub const LOGIN_ROUTE: &str = "/admin";

/// Where signed-in sessions land
pub const HOME_ROUTE: &str = "/dashboard";

/// Routes open to everyone
pub const PUBLIC_ROUTES: [&str; 3] = ["/", "/admin", "/login"];

/// Route prefixes that need a session
pub const PROTECTED_PREFIXES: [&str; 14] = [
    "/dashboard",
    "/users",
    "/partners",
    "/roles",
    "/property",
    "/blogs",
    "/jobs",
    "/establishment",
    "/amenities",
    "/sub-users",
    "/profile",
    "/payments",
    "/notifications",
    "/support",
];

/// A parsed route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppRoute {
    /// Landing page or login form
    Public(String),
    /// Dashboard page behind the guard
    Protected(String),
    /// Not in the route table
    NotFound(String),
}

impl AppRoute {
    /// Classify `path`; query strings, fragments and trailing slashes are ignored
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = normalize(path);

        if PUBLIC_ROUTES.contains(&path.as_str()) {
            return Self::Public(path);
        }

        let protected = PROTECTED_PREFIXES.iter().any(|prefix| {
            path == *prefix
                || path
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('/'))
        });

        if protected {
            Self::Protected(path)
        } else {
            Self::NotFound(path)
        }
    }

    /// Normalized path
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Public(p) | Self::Protected(p) | Self::NotFound(p) => p,
        }
    }
}

/// Outcome of guarding a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the page
    Render,
    /// Send the visitor elsewhere
    Redirect(&'static str),
    /// Signed in, but the module is not granted
    Forbidden {
        /// Module gating the route
        module: String,
    },
    /// Unknown route
    NotFound,
}

/// Decide what to do with `route` for `session`
///
/// `tree` resolves which module gates a protected path. The dashboard and
/// profile pages are open to every signed-in session.
#[must_use]
pub fn guard(route: &AppRoute, session: &Session, tree: &[NavItem]) -> RouteDecision {
    match route {
        AppRoute::NotFound(_) => RouteDecision::NotFound,
        AppRoute::Public(path) => {
            if path == "/login" && session.is_authenticated() {
                RouteDecision::Redirect(HOME_ROUTE)
            } else {
                RouteDecision::Render
            }
        }
        AppRoute::Protected(path) => {
            if !session.is_authenticated() {
                return RouteDecision::Redirect(LOGIN_ROUTE);
            }

            match module_for_path(tree, path) {
                Some(module)
                    if module != modules::DASHBOARD
                        && !has_permission(&session.permissions, module, PermissionAction::View) =>
                {
                    RouteDecision::Forbidden {
                        module: module.to_string(),
                    }
                }
                _ => RouteDecision::Render,
            }
        }
    }
}

fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default().trim();
    let trimmed = path.trim_end_matches('/');

    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
