//! Permission matrix lookup

use crate::http::{HttpClient, RequestOptions};
use crate::session::SharedSession;
use reqwest::Method;
use spaceadmin_core::permission::ModulePermission;
use spaceadmin_core::{Error, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Path of the per-user-type permission matrix
#[must_use]
pub fn user_type_path(user_type: i64) -> String {
    format!("/role-permission/user-type/{user_type}")
}

/// Reads permission matrices from the backend
#[derive(Debug, Clone)]
pub struct PermissionApi {
    http: HttpClient,
}

impl PermissionApi {
    /// Create the API over `http`
    #[must_use]
    pub const fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Fetch the matrix of `user_type`
    ///
    /// # Errors
    ///
    /// Returns the transport, status or decode error of the request.
    pub async fn for_user_type(
        &self,
        user_type: i64,
        cancel: &CancellationToken,
    ) -> Result<Vec<ModulePermission>> {
        let envelope = self
            .http
            .request_envelope::<Vec<ModulePermission>>(
                Method::GET,
                &user_type_path(user_type),
                RequestOptions::new(),
                cancel,
            )
            .await?;
        Ok(envelope.data)
    }
}

/// Refresh the session's permission matrix
///
/// Never fails: without a user type, or when the request fails, the session
/// ends up with an empty matrix, which hides every gated module. A matrix
/// that arrives after the session changed (logout or another login) is
/// dropped. Returns the matrix the session holds afterwards.
pub async fn fetch_user_permissions(
    session: &SharedSession,
    api: &PermissionApi,
    cancel: &CancellationToken,
) -> Vec<ModulePermission> {
    let (user_type, token) = {
        let guard = session.read();
        (guard.user_type(), guard.token().map(ToString::to_string))
    };
    let Some(user_type) = user_type else {
        debug!("no user type, clearing permissions");
        session.write().set_permissions(Vec::new());
        return Vec::new();
    };

    let permissions = match api.for_user_type(user_type, cancel).await {
        Ok(permissions) => permissions,
        Err(Error::Cancelled) => {
            debug!(user_type, "permission fetch cancelled");
            return session.read().session().permissions.clone();
        }
        Err(e) => {
            warn!(user_type, error = %e, "failed to fetch permissions");
            Vec::new()
        }
    };

    let mut guard = session.write();
    if guard.user_type() != Some(user_type) || guard.token() != token.as_deref() {
        debug!(user_type, "session changed during permission fetch, discarding");
        return guard.session().permissions.clone();
    }
    guard.set_permissions(permissions.clone());
    permissions
}
