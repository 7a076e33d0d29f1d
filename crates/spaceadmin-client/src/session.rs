//! Authenticated session
//!
//! The in-memory [`Session`] is the source of truth once the process is
//! running. Storage is read once by [`SessionStore::restore`] and written at
//! login, logout and when the sidebar preference changes.

use crate::storage::{Storage, keys};
use parking_lot::RwLock;
use spaceadmin_core::permission::{ModulePermission, PermissionAction, has_permission};
use spaceadmin_core::utils::{mask_token, parse_stored_bool};
use spaceadmin_core::{AdminUser, Error, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Session shared between the HTTP client, pages and the application state
pub type SharedSession = Arc<RwLock<SessionStore>>;

/// Snapshot of the signed-in administrator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Bearer token
    pub token: Option<String>,
    /// Signed-in account
    pub user: Option<AdminUser>,
    /// User type driving the permission matrix
    pub user_type: Option<i64>,
    /// Permission matrix fetched for `user_type`
    pub permissions: Vec<ModulePermission>,
}

impl Session {
    /// Whether both a token and a user are present
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }
}

/// Owner of the [`Session`] and its persisted copy
#[derive(Debug)]
pub struct SessionStore {
    session: Session,
    storage: Arc<dyn Storage>,
    default_user_type: i64,
    sidebar_visible: bool,
}

impl SessionStore {
    /// Create an unauthenticated store backed by `storage`
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, default_user_type: i64) -> Self {
        Self {
            session: Session::default(),
            storage,
            default_user_type,
            sidebar_visible: true,
        }
    }

    /// Wrap the store for sharing
    #[must_use]
    pub fn into_shared(self) -> SharedSession {
        Arc::new(RwLock::new(self))
    }

    /// Load the persisted session
    ///
    /// Returns whether a session was restored. A partial or malformed
    /// persisted session counts as signed out and is wiped from storage.
    pub fn restore(&mut self) -> bool {
        self.sidebar_visible = self
            .read_key(keys::SIDEBAR_VISIBLE)
            .and_then(|v| parse_stored_bool(&v))
            .unwrap_or(true);

        let token = self.read_key(keys::ADMIN_TOKEN).filter(|t| !t.trim().is_empty());
        let blob = self.read_key(keys::USER_DATA);

        let (token, blob) = match (token, blob) {
            (Some(token), Some(blob)) => (token, blob),
            (None, None) => {
                debug!("no persisted session");
                self.session = Session::default();
                return false;
            }
            _ => {
                warn!("persisted session is incomplete, clearing it");
                self.clear_storage();
                return false;
            }
        };

        let user: AdminUser = match serde_json::from_str(&blob) {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "persisted user data is malformed, clearing session");
                self.clear_storage();
                return false;
            }
        };

        let user_type = self
            .read_key(keys::USER_TYPE)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .or(user.user_type)
            .unwrap_or(self.default_user_type);

        info!(user = %user.email, user_type, token = %mask_token(&token), "restored session");

        self.session = Session {
            token: Some(token),
            user: Some(user),
            user_type: Some(user_type),
            permissions: Vec::new(),
        };
        true
    }

    /// Record a successful login and persist it
    ///
    /// The user type comes from the user record, then from `requested`
    /// (the type the login form asked for), then from the configured
    /// default. Permissions start empty until fetched.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank token, or a storage error if
    /// the session cannot be persisted. The in-memory session is left
    /// untouched on error.
    pub fn login(&mut self, token: String, user: AdminUser, requested: Option<i64>) -> Result<()> {
        if token.trim().is_empty() {
            return Err(Error::validation("token", "login returned an empty token"));
        }

        let user_type = user
            .user_type
            .or(requested)
            .unwrap_or(self.default_user_type);
        let blob = serde_json::to_string(&user)?;

        self.storage.set(keys::ADMIN_TOKEN, &token)?;
        self.storage.set(keys::USER_DATA, &blob)?;
        self.storage.set(keys::USER_TYPE, &user_type.to_string())?;

        info!(user = %user.email, user_type, "logged in");

        self.session = Session {
            token: Some(token),
            user: Some(user),
            user_type: Some(user_type),
            permissions: Vec::new(),
        };
        Ok(())
    }

    /// Forget the session in memory and in storage
    ///
    /// Every key is attempted even if an earlier removal fails.
    ///
    /// # Errors
    ///
    /// Returns the first storage error encountered.
    pub fn logout(&mut self) -> Result<()> {
        self.session = Session::default();
        self.sidebar_visible = true;

        let mut first_error = None;
        for key in keys::ALL {
            if let Err(e) = self.storage.remove(key) {
                warn!(key, error = %e, "failed to remove session key");
                first_error.get_or_insert(e);
            }
        }

        info!("logged out");
        first_error.map_or(Ok(()), Err)
    }

    /// Replace the permission matrix
    pub fn set_permissions(&mut self, permissions: Vec<ModulePermission>) {
        debug!(modules = permissions.len(), "permissions updated");
        self.session.permissions = permissions;
    }

    /// Whether the session grants `action` on `module`
    #[must_use]
    pub fn has_permission(&self, module: &str, action: PermissionAction) -> bool {
        has_permission(&self.session.permissions, module, action)
    }

    /// Current session
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Current bearer token
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.session.token.as_deref()
    }

    /// Current user type
    #[must_use]
    pub const fn user_type(&self) -> Option<i64> {
        self.session.user_type
    }

    /// Whether the session is signed in
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Sidebar preference
    #[must_use]
    pub const fn sidebar_visible(&self) -> bool {
        self.sidebar_visible
    }

    /// Change and persist the sidebar preference
    ///
    /// # Errors
    ///
    /// Returns a storage error if the preference cannot be persisted.
    pub fn set_sidebar_visible(&mut self, visible: bool) -> Result<()> {
        self.storage.set(keys::SIDEBAR_VISIBLE, if visible { "true" } else { "false" })?;
        self.sidebar_visible = visible;
        Ok(())
    }

    fn read_key(&self, key: &str) -> Option<String> {
        self.storage.get(key).unwrap_or_else(|e| {
            warn!(key, error = %e, "failed to read session key");
            None
        })
    }

    fn clear_storage(&mut self) {
        self.session = Session::default();
        for key in keys::ALL {
            if let Err(e) = self.storage.remove(key) {
                warn!(key, error = %e, "failed to remove session key");
            }
        }
    }
}
