#![allow(clippy::unwrap_used)]
#![allow(deprecated)]
#![allow(dead_code)]

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    thread,
};

use assert_cmd::Command;
use axum::{
    extract::{Path, Query, RawQuery, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tempfile::TempDir;

#[derive(Default)]
struct StubState {
    notes: Mutex<Vec<Value>>,
    requests: Mutex<Vec<String>>,
    next_id: AtomicUsize,
}

impl StubState {
    fn record(&self, request: String) {
        self.requests.lock().unwrap().push(request);
    }

    fn insert(&self, title: &str, content: &str, tag: &str) -> Value {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let note = json!({
            "id": format!("stub-{}", n),
            "title": title,
            "content": content,
            "tag": tag,
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-01T10:00:00Z",
        });
        self.notes.lock().unwrap().push(note.clone());
        note
    }
}

/// In-process stand-in for the notes REST API, served on a random local port
pub struct StubApi {
    pub url: String,
    state: Arc<StubState>,
}

impl StubApi {
    pub fn start() -> Self {
        let state = Arc::new(StubState::default());
        let app = router(Arc::clone(&state));

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let address = listener.local_addr().unwrap();

        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();

            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                axum::serve(listener, app).await.unwrap();
            });
        });

        Self {
            url: format!("http://{}/api", address),
            state,
        }
    }

    pub fn with_notes(notes: &[(&str, &str, &str)]) -> Self {
        let stub = Self::start();
        for (title, content, tag) in notes {
            stub.state.insert(title, content, tag);
        }
        stub
    }

    pub fn ids(&self) -> Vec<String> {
        self.state
            .notes
            .lock()
            .unwrap()
            .iter()
            .map(|n| n["id"].as_str().unwrap().to_string())
            .collect()
    }

    pub fn titles(&self) -> Vec<String> {
        self.state
            .notes
            .lock()
            .unwrap()
            .iter()
            .map(|n| n["title"].as_str().unwrap().to_string())
            .collect()
    }

    /// Requests seen so far, as `METHOD path?query`
    pub fn requests(&self) -> Vec<String> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.starts_with(prefix))
            .count()
    }
}

fn router(state: Arc<StubState>) -> Router {
    Router::new()
        .route("/api/notes", get(list_notes).post(create_note))
        .route("/api/notes/:id", get(get_note).delete(delete_note))
        .with_state(state)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    page: Option<usize>,
    per_page: Option<usize>,
    search: Option<String>,
}

async fn list_notes(
    State(state): State<Arc<StubState>>,
    Query(query): Query<ListQuery>,
    RawQuery(raw): RawQuery,
) -> Json<Value> {
    state.record(format!("GET /notes?{}", raw.unwrap_or_default()));

    let search = query.search.unwrap_or_default().to_lowercase();
    let matching: Vec<Value> = state
        .notes
        .lock()
        .unwrap()
        .iter()
        .filter(|n| {
            search.is_empty()
                || n["title"].as_str().unwrap().to_lowercase().contains(&search)
                || n["content"].as_str().unwrap().to_lowercase().contains(&search)
        })
        .cloned()
        .collect();

    let per_page = query.per_page.unwrap_or(12).max(1);
    let page = query.page.unwrap_or(1).max(1);
    let total_pages = matching.len().div_ceil(per_page);
    let notes: Vec<Value> = matching
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();

    Json(json!({ "notes": notes, "totalPages": total_pages }))
}

fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Note not found" })),
    )
}

async fn get_note(
    State(state): State<Arc<StubState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state.record(format!("GET /notes/{}", id));

    state
        .notes
        .lock()
        .unwrap()
        .iter()
        .find(|n| n["id"] == id.as_str())
        .cloned()
        .map(Json)
        .ok_or_else(not_found)
}

async fn create_note(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.record("POST /notes".to_string());

    let note = state.insert(
        body["title"].as_str().unwrap_or_default(),
        body["content"].as_str().unwrap_or_default(),
        body["tag"].as_str().unwrap_or_default(),
    );
    (StatusCode::CREATED, Json(note))
}

async fn delete_note(
    State(state): State<Arc<StubState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state.record(format!("DELETE /notes/{}", id));

    let mut notes = state.notes.lock().unwrap();
    let pos = notes
        .iter()
        .position(|n| n["id"] == id.as_str())
        .ok_or_else(not_found)?;
    Ok(Json(notes.remove(pos)))
}

/// Isolated config directory plus a command preconfigured for it
pub struct TestEnv {
    pub config_home: TempDir,
    pub api_url: String,
}

impl TestEnv {
    pub fn new(api_url: &str) -> Self {
        Self {
            config_home: TempDir::new().unwrap(),
            api_url: api_url.to_string(),
        }
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("notehub").unwrap();
        cmd.env("XDG_CONFIG_HOME", self.config_home.path())
            .env("NOTEHUB_API_URL", &self.api_url)
            .env_remove("NOTEHUB_TOKEN")
            .env_remove("NOTEHUB_PROFILE")
            .env_remove("RUST_LOG");
        cmd
    }
}
