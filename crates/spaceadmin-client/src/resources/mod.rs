//! Backend resources and their CRUD endpoints
//!
//! Each resource is a unit type implementing [`Resource`] plus whichever of
//! [`Creatable`], [`Editable`] and [`Toggleable`] the backend supports for it.
//! [`ResourceApi`] turns those declarations into requests against
//! `{BASE}/list`, `{BASE}/detail/{id}`, `{BASE}/add`, `{BASE}/update/{id}`,
//! `{BASE}/delete/{id}` and `{BASE}/status/{id}`.

pub mod auth;
pub mod content;
pub mod partners;
pub mod property;
pub mod roles;
pub mod users;

pub use auth::AuthApi;
pub use content::{Blogs, Jobs};
pub use partners::{Partners, SubUsers};
pub use property::{EstablishmentTypes, Properties, PropertyCategories, SpaceSubTypes, SpaceTypes};
pub use roles::{RolePermissions, Roles};
pub use users::Users;

use crate::http::{Attachment, HttpClient, MultipartBody, RequestBody, RequestOptions};
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use spaceadmin_core::types::{RecordStatus, StatusUpdate};
use spaceadmin_core::{Envelope, Error, ListQuery, ListShape, Page, Result};
use std::fmt;
use std::marker::PhantomData;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use validator::Validate;

/// A record with a backend identifier
pub trait Identified {
    /// Identifier
    fn id(&self) -> &str;
}

macro_rules! impl_identified {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Identified for $ty {
                fn id(&self) -> &str {
                    &self.id
                }
            }
        )+
    };
}

impl_identified!(
    spaceadmin_core::types::User,
    spaceadmin_core::types::Partner,
    spaceadmin_core::types::SubUser,
    spaceadmin_core::types::Role,
    spaceadmin_core::types::RolePermission,
    spaceadmin_core::types::Property,
    spaceadmin_core::types::PropertyCategory,
    spaceadmin_core::types::Blog,
    spaceadmin_core::types::Job,
    spaceadmin_core::types::EstablishmentType,
    spaceadmin_core::types::SpaceType,
    spaceadmin_core::types::SpaceSubType,
);

/// A backend collection that can at least be listed
pub trait Resource: Send + Sync + 'static {
    /// Singular display name
    const NAME: &'static str;
    /// Module gating the resource in the permission matrix
    const MODULE: &'static str;
    /// Endpoint base, relative to the API base URL
    const BASE: &'static str;
    /// Dashboard route of the list page
    const ROUTE: &'static str;
    /// Query key the free-text search is sent under
    const SEARCH_KEY: &'static str = "search";
    /// Body shape of `{BASE}/list`
    const LIST_SHAPE: ListShape;

    /// Record type
    type Record: DeserializeOwned + Serialize + Identified + Clone + fmt::Debug + Send + Sync;
}

/// Resources with `{BASE}/add`
pub trait Creatable: Resource {
    /// Form payload
    type Draft: Serialize + Validate + fmt::Debug + Send + Sync;
}

/// Resources with `{BASE}/update/{id}` and `{BASE}/delete/{id}`
pub trait Editable: Creatable {}

/// Resources with `{BASE}/status/{id}`
pub trait Toggleable: Resource {}

/// Outcome of a create or update
#[derive(Debug, Clone, PartialEq)]
pub struct Saved<T> {
    /// Server message
    pub message: String,
    /// Saved record, when the backend echoes it
    pub record: Option<T>,
}

/// Typed CRUD calls for resource `R`
pub struct ResourceApi<R> {
    http: HttpClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceApi<R> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> fmt::Debug for ResourceApi<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceApi")
            .field("resource", &R::NAME)
            .field("base", &R::BASE)
            .finish()
    }
}

impl<R: Resource> ResourceApi<R> {
    /// Create the API over `http`
    #[must_use]
    pub const fn new(http: HttpClient) -> Self {
        Self {
            http,
            _resource: PhantomData,
        }
    }

    /// `{BASE}/{action}`
    #[must_use]
    pub fn endpoint(action: &str) -> String {
        format!("{}/{action}", R::BASE)
    }

    /// `{BASE}/{action}/{id}` with the id percent-encoded
    #[must_use]
    pub fn record_endpoint(action: &str, id: &str) -> String {
        format!("{}/{action}/{}", R::BASE, urlencoding::encode(id))
    }

    /// Fetch one page of records
    ///
    /// # Errors
    ///
    /// Returns the transport, status or decode error of the request.
    pub async fn list(
        &self,
        query: &ListQuery,
        cancel: &CancellationToken,
    ) -> Result<Page<R::Record>> {
        let page = self
            .http
            .list(
                &Self::endpoint("list"),
                query.to_pairs(R::SEARCH_KEY),
                R::LIST_SHAPE,
                cancel,
            )
            .await?;
        debug!(resource = R::NAME, rows = page.items.len(), total = page.total, "listed");
        Ok(page)
    }

    /// Fetch one record
    ///
    /// # Errors
    ///
    /// Returns the transport, status or decode error of the request.
    pub async fn get(&self, id: &str, cancel: &CancellationToken) -> Result<R::Record> {
        let envelope: Envelope<Option<R::Record>> = self
            .http
            .request_envelope(
                Method::GET,
                &Self::record_endpoint("detail", id),
                RequestOptions::new(),
                cancel,
            )
            .await?;

        envelope.data.ok_or_else(|| Error::NotFound {
            resource: format!("{} {id}", R::NAME),
        })
    }

    async fn mutate<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
        cancel: &CancellationToken,
    ) -> Result<Saved<T>> {
        let mut options = RequestOptions::new();
        options.body = body;

        let envelope: Envelope<Option<serde_json::Value>> =
            self.http.request_envelope(method, path, options, cancel).await?;

        // Some endpoints echo the record, others an id or nothing at all
        let record = envelope
            .data
            .and_then(|value| serde_json::from_value::<T>(value).ok());

        Ok(Saved {
            message: envelope.message,
            record,
        })
    }
}

impl<R: Creatable> ResourceApi<R> {
    /// Create a record from `draft` after validating it
    ///
    /// # Errors
    ///
    /// Returns a validation error before any request is sent, or the
    /// transport, status or decode error of the request.
    pub async fn create(
        &self,
        draft: &R::Draft,
        cancel: &CancellationToken,
    ) -> Result<Saved<R::Record>> {
        draft.validate()?;
        let saved = self
            .mutate(
                Method::POST,
                &Self::endpoint("add"),
                Some(RequestBody::json(draft)?),
                cancel,
            )
            .await?;
        info!(resource = R::NAME, "created");
        Ok(saved)
    }

    /// Create a record from `draft` with file uploads, as a multipart form
    ///
    /// # Errors
    ///
    /// Same as [`Self::create`].
    pub async fn create_with_files(
        &self,
        draft: &R::Draft,
        files: Vec<Attachment>,
        cancel: &CancellationToken,
    ) -> Result<Saved<R::Record>> {
        draft.validate()?;
        let form = files
            .into_iter()
            .fold(MultipartBody::from_draft(draft)?, MultipartBody::with_file);
        let saved = self
            .mutate(
                Method::POST,
                &Self::endpoint("add"),
                Some(RequestBody::Multipart(form)),
                cancel,
            )
            .await?;
        info!(resource = R::NAME, "created with uploads");
        Ok(saved)
    }
}

impl<R: Editable> ResourceApi<R> {
    /// Replace record `id` with `draft` after validating it
    ///
    /// # Errors
    ///
    /// Returns a validation error before any request is sent, or the
    /// transport, status or decode error of the request.
    pub async fn update(
        &self,
        id: &str,
        draft: &R::Draft,
        cancel: &CancellationToken,
    ) -> Result<Saved<R::Record>> {
        draft.validate()?;
        let saved = self
            .mutate(
                Method::PUT,
                &Self::record_endpoint("update", id),
                Some(RequestBody::json(draft)?),
                cancel,
            )
            .await?;
        info!(resource = R::NAME, id, "updated");
        Ok(saved)
    }

    /// Delete record `id`, returning the server message
    ///
    /// # Errors
    ///
    /// Returns the transport, status or decode error of the request.
    pub async fn delete(&self, id: &str, cancel: &CancellationToken) -> Result<String> {
        let saved: Saved<serde_json::Value> = self
            .mutate(Method::DELETE, &Self::record_endpoint("delete", id), None, cancel)
            .await?;
        info!(resource = R::NAME, id, "deleted");
        Ok(saved.message)
    }
}

impl<R: Toggleable> ResourceApi<R> {
    /// Change the status of record `id`, returning the server message
    ///
    /// # Errors
    ///
    /// Returns the transport, status or decode error of the request.
    pub async fn set_status(
        &self,
        id: &str,
        status: RecordStatus,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let saved: Saved<serde_json::Value> = self
            .mutate(
                Method::PUT,
                &Self::record_endpoint("status", id),
                Some(RequestBody::json(&StatusUpdate { status })?),
                cancel,
            )
            .await?;
        info!(resource = R::NAME, id, %status, "status changed");
        Ok(saved.message)
    }
}
