//! Application state container
//!
//! Owns the configuration, the shared session and the HTTP client. Everything
//! else (resource APIs, pages, the filtered sidebar) is derived from it.

use crate::http::HttpClient;
use crate::page::{FormPage, ListPage};
use crate::permissions::{PermissionApi, fetch_user_permissions};
use crate::resources::{AuthApi, Creatable, Editable, Resource, ResourceApi};
use crate::routes::{AppRoute, RouteDecision, guard};
use crate::session::{Session, SessionStore, SharedSession};
use crate::storage::{FileStorage, Storage};
use spaceadmin_core::navigation::{NavItem, default_tree, filter_navigation};
use spaceadmin_core::permission::{ModulePermission, PermissionAction};
use spaceadmin_core::types::LoginRequest;
use spaceadmin_core::{AdminUser, Config, Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    config: Arc<Config>,
    session: SharedSession,
    http: HttpClient,
    tree: Arc<Vec<NavItem>>,
}

impl AppState {
    /// Build a signed-out state over `storage`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: Config, storage: Arc<dyn Storage>) -> Result<Self> {
        let session = SessionStore::new(storage, config.ui.default_user_type).into_shared();
        let http = HttpClient::new(&config.api, session.clone())?;

        Ok(Self {
            config: Arc::new(config),
            session,
            http,
            tree: Arc::new(default_tree()),
        })
    }

    /// Build the state over the configured session file and restore it
    ///
    /// # Errors
    ///
    /// Returns an error if the session file location cannot be resolved or
    /// read, or the HTTP client cannot be built.
    pub fn open(config: Config) -> Result<Self> {
        let path = config.storage.resolved_path()?;
        let storage = Arc::new(FileStorage::open(path)?);
        let state = Self::new(config, storage)?;
        state.restore();
        Ok(state)
    }

    /// Restore the persisted session; returns whether one was found
    pub fn restore(&self) -> bool {
        self.session.write().restore()
    }

    /// Restore the persisted session and, if signed in, fetch its permissions
    pub async fn bootstrap(&self, cancel: &CancellationToken) -> bool {
        let restored = self.restore();
        if restored {
            self.fetch_user_permissions(cancel).await;
        }
        restored
    }

    /// Configuration
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared session
    #[must_use]
    pub const fn shared_session(&self) -> &SharedSession {
        &self.session
    }

    /// HTTP client
    #[must_use]
    pub const fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Snapshot of the session
    #[must_use]
    pub fn session(&self) -> Session {
        self.session.read().session().clone()
    }

    /// Whether a session is signed in
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_authenticated()
    }

    /// Sign in, persist the session and fetch its permissions
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad credentials input, the request
    /// error of the login call, or a storage error. A failed permission
    /// fetch is not an error; the session just sees no gated modules.
    pub async fn login(
        &self,
        request: &LoginRequest,
        cancel: &CancellationToken,
    ) -> Result<AdminUser> {
        let response = AuthApi::new(self.http.clone()).login(request, cancel).await?;
        let user = response.user.clone();

        self.session
            .write()
            .login(response.token, response.user, Some(request.user_type))?;
        self.fetch_user_permissions(cancel).await;

        info!(user = %user.email, "session started");
        Ok(user)
    }

    /// Sign out and wipe the persisted session
    ///
    /// # Errors
    ///
    /// Returns the first storage error; the in-memory session is cleared
    /// regardless.
    pub fn logout(&self) -> Result<()> {
        self.session.write().logout()
    }

    /// Refresh the permission matrix of the current user type
    pub async fn fetch_user_permissions(
        &self,
        cancel: &CancellationToken,
    ) -> Vec<ModulePermission> {
        fetch_user_permissions(&self.session, &self.permissions_api(), cancel).await
    }

    /// Whether the session grants `action` on `module`
    #[must_use]
    pub fn has_permission(&self, module: &str, action: PermissionAction) -> bool {
        self.session.read().has_permission(module, action)
    }

    /// Fail with [`Error::Unauthenticated`] or [`Error::Forbidden`] unless
    /// the session may perform `action` on `module`
    ///
    /// # Errors
    ///
    /// See above.
    pub fn require(&self, module: &str, action: PermissionAction) -> Result<()> {
        let session = self.session.read();
        if !session.is_authenticated() {
            return Err(Error::Unauthenticated);
        }
        if !session.has_permission(module, action) {
            return Err(Error::Forbidden {
                module: module.to_string(),
                action: action.to_string(),
            });
        }
        Ok(())
    }

    /// Sidebar entries visible to the session
    #[must_use]
    pub fn navigation(&self) -> Vec<NavItem> {
        filter_navigation(&self.tree, &self.session.read().session().permissions)
    }

    /// Guard `path` for the current session
    #[must_use]
    pub fn guard(&self, path: &str) -> RouteDecision {
        guard(&AppRoute::parse(path), self.session.read().session(), &self.tree)
    }

    /// Sidebar preference
    #[must_use]
    pub fn sidebar_visible(&self) -> bool {
        self.session.read().sidebar_visible()
    }

    /// Change and persist the sidebar preference
    ///
    /// # Errors
    ///
    /// Returns a storage error if the preference cannot be persisted.
    pub fn set_sidebar_visible(&self, visible: bool) -> Result<()> {
        self.session.write().set_sidebar_visible(visible)
    }

    /// Login API
    #[must_use]
    pub fn auth_api(&self) -> AuthApi {
        AuthApi::new(self.http.clone())
    }

    /// Permission matrix API
    #[must_use]
    pub fn permissions_api(&self) -> PermissionApi {
        PermissionApi::new(self.http.clone())
    }

    /// CRUD API of resource `R`
    #[must_use]
    pub fn resource<R: Resource>(&self) -> ResourceApi<R> {
        ResourceApi::new(self.http.clone())
    }

    /// List page of resource `R` sized by the configuration
    #[must_use]
    pub fn list_page<R: Resource>(&self) -> ListPage<R> {
        ListPage::new(self.resource(), self.config.ui.page_size)
    }

    /// Create form of resource `R`
    #[must_use]
    pub fn create_page<R: Creatable>(&self) -> FormPage<R> {
        FormPage::create(self.resource(), self.redirect_delay())
    }

    /// Edit form of record `id` of resource `R`
    #[must_use]
    pub fn edit_page<R: Editable>(&self, id: impl Into<String>) -> FormPage<R> {
        FormPage::edit(self.resource(), id, self.redirect_delay())
    }

    fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.config.ui.redirect_delay_ms)
    }
}
