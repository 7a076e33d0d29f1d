//! Backend client, session store and page controllers for the `spaceadmin`
//! marketplace dashboard

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod http;
pub mod page;
pub mod permissions;
pub mod resources;
pub mod routes;
pub mod session;
pub mod state;
pub mod storage;

// Re-export commonly used types
pub use http::{Attachment, HttpClient, MultipartBody, RequestBody, RequestOptions};
pub use page::{Banner, FormMode, FormPage, ListPage, PageState, SubmitOutcome};
pub use permissions::{PermissionApi, fetch_user_permissions};
pub use resources::{Creatable, Editable, Resource, ResourceApi, Saved, Toggleable};
pub use routes::{AppRoute, RouteDecision};
pub use session::{Session, SessionStore, SharedSession};
pub use state::AppState;
pub use storage::{FileStorage, MemoryStorage, Storage};

pub use spaceadmin_core::{Config, Error, Result};
pub use tokio_util::sync::CancellationToken;
