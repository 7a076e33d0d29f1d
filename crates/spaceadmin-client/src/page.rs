//! Page controllers
//!
//! A page moves `Idle -> Loading -> Success | Error` for every load. Mutations
//! report through an inline [`Banner`] and only touch the local list once the
//! backend confirmed them. A cancelled load leaves the previous state in
//! place.

use crate::resources::{Creatable, Editable, Identified, Resource, ResourceApi, Saved, Toggleable};
use spaceadmin_core::types::RecordStatus;
use spaceadmin_core::{Error, ListQuery, Page, Result};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use validator::Validate;

/// Load state of a page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageState<T> {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Request in flight
    Loading,
    /// Data loaded
    Success(T),
    /// Load failed with this banner text
    Error(String),
}

impl<T> PageState<T> {
    /// Whether a request is in flight
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Loaded data
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    /// Error banner text
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Inline alert
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    /// Green alert
    Success(String),
    /// Red alert
    Error(String),
}

impl Banner {
    /// Alert text
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success(m) | Self::Error(m) => m,
        }
    }

    fn from_error(error: &Error) -> Self {
        Self::Error(error.banner_message())
    }
}

fn or_default(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

async fn run_load<T, F>(state: &mut PageState<T>, fut: F) -> Result<()>
where
    F: Future<Output = Result<T>>,
{
    let previous = std::mem::replace(state, PageState::Loading);
    match fut.await {
        Ok(data) => {
            *state = PageState::Success(data);
            Ok(())
        }
        Err(Error::Cancelled) => {
            debug!("load cancelled, keeping previous state");
            *state = previous;
            Err(Error::Cancelled)
        }
        Err(e) => {
            warn!(error = %e, "page load failed");
            *state = PageState::Error(e.banner_message());
            Err(e)
        }
    }
}

/// Paginated, filterable table of one resource
#[derive(Debug)]
pub struct ListPage<R: Resource> {
    api: ResourceApi<R>,
    query: ListQuery,
    state: PageState<Page<R::Record>>,
    banner: Option<Banner>,
}

impl<R: Resource> ListPage<R> {
    /// Page over `api` showing `page_size` rows
    #[must_use]
    pub const fn new(api: ResourceApi<R>, page_size: u32) -> Self {
        Self {
            api,
            query: ListQuery::new(page_size),
            state: PageState::Idle,
            banner: None,
        }
    }

    /// Current query
    #[must_use]
    pub const fn query(&self) -> &ListQuery {
        &self.query
    }

    /// Current load state
    #[must_use]
    pub const fn state(&self) -> &PageState<Page<R::Record>> {
        &self.state
    }

    /// Current banner
    #[must_use]
    pub const fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Dismiss the banner
    pub fn clear_banner(&mut self) {
        self.banner = None;
    }

    /// Rows currently shown
    #[must_use]
    pub fn items(&self) -> &[R::Record] {
        self.state.data().map_or(&[], |page| page.items.as_slice())
    }

    /// Set the search term and go back to the first page
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.query = self.query.clone().search(term).page(1);
    }

    /// Set the status filter and go back to the first page
    pub fn set_status_filter(&mut self, status: impl Into<String>) {
        self.query = self.query.clone().status(status).page(1);
    }

    /// Set the city filter and go back to the first page
    pub fn set_city(&mut self, city: impl Into<String>) {
        self.query = self.query.clone().city(city).page(1);
    }

    /// Select a page (clamped to 1)
    pub fn set_page(&mut self, page: u32) {
        self.query = self.query.clone().page(page);
    }

    /// Load the current query
    ///
    /// # Errors
    ///
    /// Returns the load error, which is also reflected in [`Self::state`].
    pub async fn load(&mut self, cancel: &CancellationToken) -> Result<()> {
        let api = self.api.clone();
        let query = self.query.clone();
        run_load(&mut self.state, async move { api.list(&query, cancel).await }).await
    }
}

impl<R: Editable> ListPage<R> {
    /// Delete `id`; the row disappears only if the backend confirms
    ///
    /// # Errors
    ///
    /// Returns the request error, which is also shown as an error banner.
    pub async fn delete(&mut self, id: &str, cancel: &CancellationToken) -> Result<()> {
        match self.api.delete(id, cancel).await {
            Ok(message) => {
                if let PageState::Success(page) = &mut self.state {
                    let before = page.items.len();
                    page.items.retain(|item| item.id() != id);
                    if page.items.len() < before {
                        page.total = page.total.saturating_sub(1);
                    }
                }
                self.banner = Some(Banner::Success(or_default(
                    message,
                    &format!("{} deleted successfully", capitalize(R::NAME)),
                )));
                Ok(())
            }
            Err(e) => {
                self.banner = Some(Banner::from_error(&e));
                Err(e)
            }
        }
    }
}

impl<R: Toggleable> ListPage<R> {
    /// Change the status of `id`; the row changes only if the backend confirms
    ///
    /// `apply` writes the new status into the local record.
    ///
    /// # Errors
    ///
    /// Returns the request error, which is also shown as an error banner.
    pub async fn update_status<F>(
        &mut self,
        id: &str,
        status: RecordStatus,
        apply: F,
        cancel: &CancellationToken,
    ) -> Result<()>
    where
        F: FnOnce(&mut R::Record, RecordStatus),
    {
        match self.api.set_status(id, status, cancel).await {
            Ok(message) => {
                if let PageState::Success(page) = &mut self.state
                    && let Some(item) = page.items.iter_mut().find(|item| item.id() == id)
                {
                    apply(item, status);
                }
                self.banner = Some(Banner::Success(or_default(
                    message,
                    "Status updated successfully",
                )));
                Ok(())
            }
            Err(e) => {
                self.banner = Some(Banner::from_error(&e));
                Err(e)
            }
        }
    }
}

/// Whether a form creates a record or edits one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    /// New record
    Create,
    /// Existing record
    Edit(String),
}

/// What the page does after a successful submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Navigate to `to` once `after` has passed, showing the banner meanwhile
    Redirect {
        /// Target route
        to: String,
        /// Delay before navigating
        after: Duration,
    },
    /// Stay on the page with a success banner
    Stay,
}

/// Create or edit form for one resource
#[derive(Debug)]
pub struct FormPage<R: Creatable> {
    api: ResourceApi<R>,
    mode: FormMode,
    state: PageState<R::Record>,
    banner: Option<Banner>,
    submitting: bool,
    redirect_delay: Duration,
}

impl<R: Creatable> FormPage<R> {
    /// Create form
    #[must_use]
    pub const fn create(api: ResourceApi<R>, redirect_delay: Duration) -> Self {
        Self {
            api,
            mode: FormMode::Create,
            state: PageState::Idle,
            banner: None,
            submitting: false,
            redirect_delay,
        }
    }

    /// Form mode
    #[must_use]
    pub const fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// Loaded record in edit mode
    #[must_use]
    pub const fn state(&self) -> &PageState<R::Record> {
        &self.state
    }

    /// Current banner
    #[must_use]
    pub const fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Whether a submit is in flight
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    fn success(&mut self, saved: Saved<R::Record>, fallback: &str) {
        if let Some(record) = saved.record {
            self.state = PageState::Success(record);
        }
        self.banner = Some(Banner::Success(or_default(saved.message, fallback)));
    }

    fn failure(&mut self, error: &Error) {
        self.banner = Some(Banner::from_error(error));
    }

    /// Submit a new record
    ///
    /// The draft is validated first; an invalid draft never reaches the
    /// backend. On success the page asks to return to the list.
    ///
    /// # Errors
    ///
    /// Returns the validation or request error, also shown as an error banner.
    pub async fn submit_create(
        &mut self,
        draft: &R::Draft,
        cancel: &CancellationToken,
    ) -> Result<SubmitOutcome> {
        if let Err(e) = draft.validate() {
            let error = Error::from(e);
            self.failure(&error);
            return Err(error);
        }

        self.submitting = true;
        self.banner = None;
        let result = self.api.create(draft, cancel).await;
        self.submitting = false;

        match result {
            Ok(saved) => {
                self.success(saved, &format!("{} created successfully", capitalize(R::NAME)));
                Ok(SubmitOutcome::Redirect {
                    to: R::ROUTE.to_string(),
                    after: self.redirect_delay,
                })
            }
            Err(e) => {
                self.failure(&e);
                Err(e)
            }
        }
    }
}

impl<R: Editable> FormPage<R> {
    /// Edit form for record `id`
    #[must_use]
    pub fn edit(api: ResourceApi<R>, id: impl Into<String>, redirect_delay: Duration) -> Self {
        Self {
            mode: FormMode::Edit(id.into()),
            ..Self::create(api, redirect_delay)
        }
    }

    /// Load the record being edited
    ///
    /// # Errors
    ///
    /// Returns the load error, also reflected in [`Self::state`]. Calling
    /// this on a create form is a validation error.
    pub async fn load(&mut self, cancel: &CancellationToken) -> Result<()> {
        let FormMode::Edit(id) = self.mode.clone() else {
            return Err(Error::validation("id", "nothing to load on a create form"));
        };
        let api = self.api.clone();
        run_load(&mut self.state, async move { api.get(&id, cancel).await }).await
    }

    /// Submit the draft, creating or updating depending on the mode
    ///
    /// Edits stay on the page with a success banner.
    ///
    /// # Errors
    ///
    /// Returns the validation or request error, also shown as an error banner.
    pub async fn submit(
        &mut self,
        draft: &R::Draft,
        cancel: &CancellationToken,
    ) -> Result<SubmitOutcome> {
        let FormMode::Edit(id) = self.mode.clone() else {
            return self.submit_create(draft, cancel).await;
        };

        if let Err(e) = draft.validate() {
            let error = Error::from(e);
            self.failure(&error);
            return Err(error);
        }

        self.submitting = true;
        self.banner = None;
        let result = self.api.update(&id, draft, cancel).await;
        self.submitting = false;

        match result {
            Ok(saved) => {
                self.success(saved, &format!("{} updated successfully", capitalize(R::NAME)));
                Ok(SubmitOutcome::Stay)
            }
            Err(e) => {
                self.failure(&e);
                Err(e)
            }
        }
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
