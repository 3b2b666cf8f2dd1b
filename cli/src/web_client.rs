use std::future::Future;

use notehub_core::{CreateNotePayload, FetchNotesParams, Note, NotesPage};
use reqwest::{header, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://notehub-public.goit.study/api";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Note not found")]
    NotFound,
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Unexpected response: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

/// Operations the notes API offers
pub trait NotesApi: Send + Sync + 'static {
    fn fetch_notes(
        &self,
        params: &FetchNotesParams,
    ) -> impl Future<Output = ApiResult<NotesPage>> + Send;

    fn fetch_note_by_id(&self, id: &str) -> impl Future<Output = ApiResult<Note>> + Send;

    fn create_note(
        &self,
        payload: &CreateNotePayload,
    ) -> impl Future<Output = ApiResult<Note>> + Send;

    fn delete_note(&self, id: &str) -> impl Future<Output = ApiResult<Note>> + Send;
}

/// HTTP client for the NoteHub REST API
#[derive(Debug, Clone)]
pub struct NotesClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl NotesClient {
    pub fn new(base_url: &str, token: Option<String>) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("notehub/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = self.url(path);
        debug!("{} {}", method, url);

        let builder = self
            .http
            .request(method, url)
            .header(header::ACCEPT, "application/json");

        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: reqwest::RequestBuilder) -> ApiResult<T> {
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            debug!("API responded with {}: {}", status, message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&message, status),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Pulls a readable message out of an error body, which is usually `{"message": "..."}`.
fn error_message(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        })
}

impl NotesApi for NotesClient {
    async fn fetch_notes(&self, params: &FetchNotesParams) -> ApiResult<NotesPage> {
        let builder = self
            .request(reqwest::Method::GET, "/notes")
            .query(&params.query_pairs());
        self.send(builder).await
    }

    async fn fetch_note_by_id(&self, id: &str) -> ApiResult<Note> {
        let path = format!("/notes/{}", id);
        self.send(self.request(reqwest::Method::GET, &path)).await
    }

    async fn create_note(&self, payload: &CreateNotePayload) -> ApiResult<Note> {
        let builder = self.request(reqwest::Method::POST, "/notes").json(payload);
        self.send(builder).await
    }

    async fn delete_note(&self, id: &str) -> ApiResult<Note> {
        let path = format!("/notes/{}", id);
        self.send(self.request(reqwest::Method::DELETE, &path)).await
    }
}
