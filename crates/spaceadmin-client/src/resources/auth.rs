//! Admin login

use crate::http::{HttpClient, RequestBody, RequestOptions};
use reqwest::Method;
use spaceadmin_core::Result;
use spaceadmin_core::types::{LoginRequest, LoginResponse};
use tokio_util::sync::CancellationToken;
use validator::Validate;

/// Login endpoint
pub const LOGIN_PATH: &str = "/admin/login";

/// Credentials exchange
#[derive(Debug, Clone)]
pub struct AuthApi {
    http: HttpClient,
}

impl AuthApi {
    /// Create the API over `http`
    #[must_use]
    pub const fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Exchange credentials for a token and the user record
    ///
    /// # Errors
    ///
    /// Returns a validation error before any request is sent, or the
    /// transport, status or decode error of the request.
    pub async fn login(
        &self,
        request: &LoginRequest,
        cancel: &CancellationToken,
    ) -> Result<LoginResponse> {
        request.validate()?;

        let options = RequestOptions::new().body(RequestBody::json(request)?);
        let envelope = self
            .http
            .request_envelope::<LoginResponse>(Method::POST, LOGIN_PATH, options, cancel)
            .await?;
        Ok(envelope.data)
    }
}
