//! HTTP client for the marketplace backend
//!
//! [`HttpClient::send`] resolves the path against the configured base URL,
//! attaches the session's bearer token and a JSON content type, and hands
//! back the raw response without looking at its status. The `*_envelope`
//! and `list` helpers add status checking and typed decoding on top.

use crate::session::SharedSession;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use spaceadmin_core::config::ApiConfig;
use spaceadmin_core::envelope::{decode_envelope, error_message};
use spaceadmin_core::utils::join_url;
use spaceadmin_core::{Envelope, Error, ListShape, Page, Result};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, debug_span, warn};
use uuid::Uuid;

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// File attached to a multipart body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Form field name
    pub field: String,
    /// File name sent to the server
    pub file_name: String,
    /// MIME type
    pub mime: String,
    /// File contents
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Read `path` into an attachment for `field`, guessing the MIME type
    /// from the extension
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn from_path(field: impl Into<String>, path: &std::path::Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
        let mime = match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("png") => "image/png",
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("webp") => "image/webp",
            Some("gif") => "image/gif",
            Some("pdf") => "application/pdf",
            _ => "application/octet-stream",
        };

        Ok(Self {
            field: field.into(),
            file_name,
            mime: mime.to_string(),
            bytes,
        })
    }
}

/// Multipart form body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartBody {
    /// Plain text fields
    pub fields: Vec<(String, String)>,
    /// File parts
    pub files: Vec<Attachment>,
}

impl MultipartBody {
    /// Build text fields from a serializable draft
    ///
    /// Top-level string values are sent verbatim, other scalars as their JSON
    /// text, and nested values as JSON. Null fields are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the draft does not serialize to a JSON object.
    pub fn from_draft<T: Serialize>(draft: &T) -> Result<Self> {
        let serde_json::Value::Object(map) = serde_json::to_value(draft)? else {
            return Err(Error::validation("form", "form data must be an object"));
        };

        let fields = map
            .into_iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| match v {
                serde_json::Value::String(s) => (k, s),
                other => (k, other.to_string()),
            })
            .collect();

        Ok(Self {
            fields,
            files: Vec::new(),
        })
    }

    /// Add a file part
    #[must_use]
    pub fn with_file(mut self, attachment: Attachment) -> Self {
        self.files.push(attachment);
        self
    }

    fn into_form(self) -> Result<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        for file in self.files {
            let part = reqwest::multipart::Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.mime)
                .map_err(|e| {
                    Error::validation(file.field.clone(), format!("invalid MIME type: {e}"))
                })?;
            form = form.part(file.field, part);
        }
        Ok(form)
    }
}

/// Request body
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// JSON value, serialized by the client
    Json(serde_json::Value),
    /// Pre-serialized text, sent as-is
    Raw(String),
    /// Multipart form; the transport sets its own content type
    Multipart(MultipartBody),
}

impl RequestBody {
    /// Serialize `value` into a JSON body
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be serialized.
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    const fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}

/// Per-call request options
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Extra headers; a caller-supplied `Authorization` or `Content-Type`
    /// is never replaced
    pub headers: HeaderMap,
    /// Query pairs appended to the URL in order
    pub query: Vec<(String, String)>,
    /// Body
    pub body: Option<RequestBody>,
}

impl RequestOptions {
    /// Empty options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header
    ///
    /// # Errors
    ///
    /// Returns a validation error if the name or value is not a valid header.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::validation("header", e.to_string()))?;
        let value =
            HeaderValue::from_str(value).map_err(|e| Error::validation("header", e.to_string()))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Set the query pairs
    #[must_use]
    pub fn query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query = pairs;
        self
    }

    /// Set the body
    #[must_use]
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }
}

/// Append `pairs` to `url` as an encoded query string
#[must_use]
pub fn append_query(url: &str, pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        return url.to_string();
    }

    let query = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{query}")
}

/// HTTP client bound to the backend base URL and the shared session
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    session: SharedSession,
}

impl HttpClient {
    /// Create a client for `api`, reading the token from `session`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the TLS backend cannot be initialized.
    pub fn new(api: &ApiConfig, session: SharedSession) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = api.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| Error::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Configured base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Session the client reads its token from
    #[must_use]
    pub const fn session(&self) -> &SharedSession {
        &self.session
    }

    /// Resolve `path` against the base URL; absolute URLs pass through
    #[must_use]
    pub fn resolve(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Build the request without sending it
    ///
    /// # Errors
    ///
    /// Returns an error if the URL, headers or body are invalid.
    pub fn build_request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<reqwest::Request> {
        let RequestOptions {
            mut headers,
            query,
            body,
        } = options;

        let url = append_query(&self.resolve(path), &query);

        if !headers.contains_key(AUTHORIZATION)
            && let Some(token) = self.session.read().token().map(str::to_owned)
        {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| Error::validation("token", e.to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        if body.as_ref().is_some_and(|b| !b.is_multipart()) && !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        let mut builder = self.client.request(method, url).headers(headers);
        builder = match body {
            None => builder,
            Some(RequestBody::Json(value)) => builder.body(serde_json::to_vec(&value)?),
            Some(RequestBody::Raw(text)) => builder.body(text),
            Some(RequestBody::Multipart(form)) => builder.multipart(form.into_form()?),
        };

        builder
            .build()
            .map_err(|e| Error::validation("url", format!("invalid request: {e}")))
    }

    /// Send a request and return the raw response, whatever its status
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] if no response was received.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response> {
        self.send_cancellable(method, path, options, &CancellationToken::new())
            .await
    }

    /// Like [`Self::send`], abandoning the request when `cancel` fires
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] if cancelled first, or [`Error::Network`]
    /// if no response was received.
    pub async fn send_cancellable(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
        cancel: &CancellationToken,
    ) -> Result<Response> {
        let request_id = Uuid::new_v4();
        let mut request = self.build_request(method, path, options)?;
        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            request.headers_mut().insert(REQUEST_ID_HEADER, value);
        }

        let span = debug_span!("http", %request_id, method = %request.method(), path);

        async {
            debug!(url = %request.url(), "sending request");

            let response = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!("request cancelled");
                    return Err(Error::Cancelled);
                }
                result = self.client.execute(request) => result.map_err(|e| {
                    warn!(error = %e, "request failed");
                    Error::Network(e.to_string())
                })?,
            };

            debug!(status = response.status().as_u16(), "response received");
            Ok(response)
        }
        .instrument(span)
        .await
    }

    /// Send a request and return the body of a successful response
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] with the server's message for non-success
    /// statuses, plus the errors of [`Self::send_cancellable`].
    pub async fn fetch_bytes(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>> {
        let response = self.send_cancellable(method, path, options, cancel).await?;
        let status = response.status();

        let bytes = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(Error::Cancelled),
            body = response.bytes() => body.map_err(|e| Error::Network(e.to_string()))?,
        };

        if !status.is_success() {
            let error = Error::api(status.as_u16(), error_message(&bytes));
            debug!(path, status = status.as_u16(), error = %error, "backend rejected request");
            return Err(error);
        }

        Ok(bytes.to_vec())
    }

    /// Send a request and decode `Envelope<T>` from a successful response
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the body is not an envelope of `T`, plus
    /// the errors of [`Self::fetch_bytes`].
    pub async fn request_envelope<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
        cancel: &CancellationToken,
    ) -> Result<Envelope<T>> {
        let bytes = self.fetch_bytes(method, path, options, cancel).await?;
        decode_envelope(path, &bytes)
    }

    /// GET a list endpoint and decode it against its declared shape
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the body does not have `shape`, plus the
    /// errors of [`Self::fetch_bytes`].
    pub async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
        shape: ListShape,
        cancel: &CancellationToken,
    ) -> Result<Page<T>> {
        let bytes = self
            .fetch_bytes(Method::GET, path, RequestOptions::new().query(query), cancel)
            .await?;
        shape.decode(path, &bytes)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use crate::session::SessionStore;
    use crate::storage::MemoryStorage;
    use pretty_assertions::assert_eq;
    use spaceadmin_core::AdminUser;
    use std::sync::Arc;

    fn client(token: Option<&str>) -> HttpClient {
        let mut store = SessionStore::new(Arc::new(MemoryStorage::new()), 1);
        if let Some(token) = token {
            store
                .login(
                    token.to_string(),
                    AdminUser {
                        id: "a1".to_string(),
                        name: "Asha".to_string(),
                        email: "asha@example.com".to_string(),
                        user_type: Some(1),
                        role: None,
                    },
                    None,
                )
                .unwrap();
        }
        let api = ApiConfig {
            base_url: "http://localhost:8000/api/v1/".to_string(),
            request_timeout_secs: None,
        };
        HttpClient::new(&api, store.into_shared()).unwrap()
    }

    fn header<'a>(request: &'a reqwest::Request, name: &str) -> Option<&'a str> {
        request.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[test]
    fn test_relative_path_is_joined_to_base() {
        let request = client(None)
            .build_request(Method::GET, "/blog/list", RequestOptions::new())
            .unwrap();
        assert_eq!(request.url().as_str(), "http://localhost:8000/api/v1/blog/list");
    }

    #[test]
    fn test_absolute_url_passes_through() {
        let request = client(None)
            .build_request(Method::GET, "https://cdn.example.com/x.json", RequestOptions::new())
            .unwrap();
        assert_eq!(request.url().as_str(), "https://cdn.example.com/x.json");
    }

    #[test]
    fn test_bearer_token_attached_when_signed_in() {
        let request = client(Some("abc"))
            .build_request(Method::GET, "/user/list", RequestOptions::new())
            .unwrap();
        assert_eq!(header(&request, "authorization"), Some("Bearer abc"));

        let request = client(None)
            .build_request(Method::GET, "/user/list", RequestOptions::new())
            .unwrap();
        assert_eq!(header(&request, "authorization"), None);
    }

    #[test]
    fn test_caller_authorization_is_kept() {
        let options = RequestOptions::new().header("Authorization", "Basic xyz").unwrap();
        let request = client(Some("abc"))
            .build_request(Method::GET, "/user/list", options)
            .unwrap();
        assert_eq!(header(&request, "authorization"), Some("Basic xyz"));
    }

    #[test]
    fn test_json_content_type_only_with_body() {
        let http = client(None);

        let request = http
            .build_request(Method::GET, "/role/list", RequestOptions::new())
            .unwrap();
        assert_eq!(header(&request, "content-type"), None);

        let options =
            RequestOptions::new().body(RequestBody::Json(serde_json::json!({"name": "x"})));
        let request = http.build_request(Method::POST, "/role/add", options).unwrap();
        assert_eq!(header(&request, "content-type"), Some("application/json"));

        let options = RequestOptions::new().body(RequestBody::Raw("{}".to_string()));
        let request = http.build_request(Method::POST, "/role/add", options).unwrap();
        assert_eq!(header(&request, "content-type"), Some("application/json"));
    }

    #[test]
    fn test_multipart_gets_transport_content_type() {
        let form = MultipartBody {
            fields: vec![("title".to_string(), "Launch".to_string())],
            files: vec![Attachment {
                field: "image".to_string(),
                file_name: "cover.png".to_string(),
                mime: "image/png".to_string(),
                bytes: vec![1, 2, 3],
            }],
        };
        let options = RequestOptions::new().body(RequestBody::Multipart(form));
        let request = client(None)
            .build_request(Method::POST, "/blog/add", options)
            .unwrap();

        let content_type = header(&request, "content-type").unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));
    }

    #[test]
    fn test_caller_content_type_is_kept() {
        let options = RequestOptions::new()
            .header("Content-Type", "text/plain")
            .unwrap()
            .body(RequestBody::Raw("hello".to_string()));
        let request = client(None)
            .build_request(Method::POST, "/support/add", options)
            .unwrap();
        assert_eq!(header(&request, "content-type"), Some("text/plain"));
    }

    #[test]
    fn test_append_query_encodes_values() {
        let pairs = vec![
            ("page".to_string(), "1".to_string()),
            ("search".to_string(), "co work & more".to_string()),
        ];
        assert_eq!(
            append_query("http://h/x", &pairs),
            "http://h/x?page=1&search=co%20work%20%26%20more"
        );
        assert_eq!(append_query("http://h/x?a=b", &pairs[..1]), "http://h/x?a=b&page=1");
        assert_eq!(append_query("http://h/x", &[]), "http://h/x");
    }

    #[test]
    fn test_multipart_from_draft_flattens_scalars() {
        #[derive(Serialize)]
        struct Draft {
            title: String,
            price: f64,
            city: Option<String>,
        }

        let mut body = MultipartBody::from_draft(&Draft {
            title: "Loft".to_string(),
            price: 12.5,
            city: None,
        })
        .unwrap();
        body.fields.sort();

        assert_eq!(
            body.fields,
            vec![
                ("price".to_string(), "12.5".to_string()),
                ("title".to_string(), "Loft".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_cancelled_before_send() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = client(None)
            .send_cancellable(
                Method::GET,
                "http://127.0.0.1:9/never",
                RequestOptions::new(),
                &cancel,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }
}
