use std::{io, sync::Arc};

use notehub_core::Note;
use termcolor::WriteColor;
use tracing::debug;

use crate::{
    args::OutputFormat,
    query::{DehydratedState, QueryCache, QueryClient, QueryStatus},
    ui::details::{self, DetailView},
    web_client::NotesApi,
};

/// Container of the note detail page.
///
/// Mirrors a server-rendered page: the note is first loaded into a throwaway
/// cache, that cache is dehydrated and hydrated into the session cache, and
/// only then does the client revalidate on its own.
pub struct NoteDetailsScreen<A> {
    api: Arc<A>,
    queries: Arc<QueryClient>,
    id: String,
}

impl<A: NotesApi> NoteDetailsScreen<A> {
    pub fn new(api: Arc<A>, queries: Arc<QueryClient>, id: &str) -> Self {
        Self {
            api,
            queries,
            id: id.trim().to_string(),
        }
    }

    /// Prefetches and hydrates, so the first render already has the note.
    pub async fn load(api: Arc<A>, queries: Arc<QueryClient>, id: &str) -> Self {
        let screen = Self::new(api, queries, id);
        if !screen.id.is_empty() {
            let state = prefetch(&screen.api, &screen.id).await;
            screen.queries.note.hydrate(state);
        }
        screen
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn note(&self) -> Option<Arc<Note>> {
        self.queries.note.get_data(&self.id)
    }

    /// Fetches the note again. Returns true when what is shown changed.
    pub async fn revalidate(&mut self) -> bool {
        if self.id.is_empty() {
            return false;
        }

        let before = self.shown();
        let api = Arc::clone(&self.api);
        let id = self.id.clone();

        let result = self
            .queries
            .note
            .fetch(self.id.clone(), move || async move {
                api.fetch_note_by_id(&id).await
            })
            .await;

        if let Err(e) = result {
            debug!("Revalidating note {} failed: {}", self.id, e);
        }

        self.shown() != before
    }

    fn shown(&self) -> Shown {
        let state = self.queries.note.state(&self.id);

        match (state.status, state.data) {
            (QueryStatus::Success, Some(note)) => Shown::Note(note),
            (QueryStatus::Pending, _) if state.is_fetching => Shown::Loading,
            _ => Shown::Failed,
        }
    }

    pub fn render(&self, out: &mut impl WriteColor, output: &OutputFormat) -> io::Result<()> {
        let view = match &self.shown() {
            Shown::Note(note) => return details::render(out, DetailView::Loaded(note), output),
            Shown::Loading => DetailView::Loading,
            Shown::Failed => DetailView::Failed,
        };
        details::render(out, view, output)
    }
}

#[derive(Debug, PartialEq)]
enum Shown {
    Loading,
    Failed,
    Note(Arc<Note>),
}

/// Loads one note into a fresh cache and returns that cache's dehydrated state.
pub async fn prefetch<A: NotesApi>(api: &Arc<A>, id: &str) -> DehydratedState<String, Note> {
    let cache: QueryCache<String, Note> = QueryCache::new();
    let api = Arc::clone(api);
    let request = id.to_string();

    cache
        .prefetch(id.to_string(), move || async move {
            api.fetch_note_by_id(&request).await
        })
        .await;

    cache.dehydrate()
}
