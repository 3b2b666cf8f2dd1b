use std::{io, sync::Arc, time::Duration};

use notehub_core::{CreateNotePayload, FetchNotesParams, Note, NotesPage, DEFAULT_PER_PAGE};
use termcolor::{ColorSpec, WriteColor};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::{
    args::OutputFormat,
    query::{Debounce, QueryClient, DEFAULT_DEBOUNCE},
    ui::{
        form::{FormOutcome, NoteForm},
        list::NoteListFormatter,
        modal,
        pagination::Pagination,
        search_box, Intent, Notifier,
    },
    web_client::{ApiError, NotesApi},
};

pub const LOADING_TEXT: &str = "Loading...";
pub const UPDATING_TEXT: &str = "Updating...";
pub const LOAD_FAILED_TEXT: &str = "Failed to load notes";

pub const NOTE_CREATED: &str = "Note created";
pub const CREATE_FAILED: &str = "Failed to create note";
pub const NOTE_DELETED: &str = "Note deleted";
pub const DELETE_FAILED: &str = "Failed to delete note";
pub const NO_NOTES_FOUND: &str = "No notes found";

#[derive(Debug, Clone)]
pub struct NotesSettings {
    pub per_page: u32,
    pub debounce: Duration,
}

impl Default for NotesSettings {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// What the caller should do after an intent was handled
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// State changed, draw the screen again
    Render,
    /// Nothing visible changed
    Idle,
    /// Navigate to the detail view of a note
    View(String),
    Help,
    Quit,
}

/// Container of the notes list page.
///
/// Owns the search text, current page and modal state; reads and mutations go
/// through the shared query cache and the API, never through local edits.
pub struct NotesScreen<A, N> {
    api: Arc<A>,
    queries: Arc<QueryClient>,
    notifier: N,
    settings: NotesSettings,
    search: String,
    applied_search: String,
    debounce: Debounce<String>,
    page: u32,
    data: Option<Arc<NotesPage>>,
    data_params: Option<FetchNotesParams>,
    error: Option<ApiError>,
    modal: Option<NoteForm>,
    empty_notified: Option<FetchNotesParams>,
}

impl<A: NotesApi, N: Notifier> NotesScreen<A, N> {
    pub fn new(api: Arc<A>, queries: Arc<QueryClient>, notifier: N, settings: NotesSettings) -> Self {
        let debounce = Debounce::new(settings.debounce);
        Self {
            api,
            queries,
            notifier,
            settings,
            search: String::new(),
            applied_search: String::new(),
            debounce,
            page: 1,
            data: None,
            data_params: None,
            error: None,
            modal: None,
            empty_notified: None,
        }
    }

    /// Starts on the given page and search without waiting for the debounce.
    pub fn with_initial(mut self, page: u32, search: &str) -> Self {
        self.page = page.max(1);
        self.search = search.to_string();
        self.applied_search = search.to_string();
        self
    }

    pub fn params(&self) -> FetchNotesParams {
        FetchNotesParams {
            page: self.page,
            per_page: self.settings.per_page,
            search: self.applied_search.clone(),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn applied_search(&self) -> &str {
        &self.applied_search
    }

    pub fn notes(&self) -> &[Note] {
        self.data.as_deref().map(|d| d.notes.as_slice()).unwrap_or(&[])
    }

    /// The page currently shown, possibly a placeholder from the previous query.
    pub fn data(&self) -> Option<&NotesPage> {
        self.data.as_deref()
    }

    pub fn total_pages(&self) -> u32 {
        self.data.as_ref().map(|d| d.total_pages).unwrap_or(0)
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    pub fn modal(&self) -> Option<&NoteForm> {
        self.modal.as_ref()
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal.is_some()
    }

    /// True while the shown data belongs to a different query than the current one.
    pub fn is_placeholder(&self) -> bool {
        self.data.is_some() && self.is_stale()
    }

    /// Status line to show while a fetch for the current query is pending.
    pub fn fetch_status(&self) -> &'static str {
        if self.data.is_none() {
            LOADING_TEXT
        } else {
            UPDATING_TEXT
        }
    }

    pub fn set_search(&mut self, text: &str, now: Instant) {
        self.search = text.to_string();
        self.page = 1;
        self.debounce.push(text.to_string(), now);
    }

    pub fn search_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    /// Applies the debounced search once its delay has passed.
    /// Returns true when a new query must be fetched.
    pub fn apply_debounced(&mut self, now: Instant) -> bool {
        match self.debounce.take_ready(now) {
            Some(text) => self.apply_search(text) || self.is_stale(),
            None => false,
        }
    }

    /// True when what is shown was not loaded for the current query.
    pub fn is_stale(&self) -> bool {
        self.data_params.as_ref() != Some(&self.params())
    }

    fn apply_search(&mut self, text: String) -> bool {
        if text == self.applied_search {
            return false;
        }
        debug!("Applying search {:?}", text);
        self.applied_search = text;
        true
    }

    pub fn set_page(&mut self, page: u32) -> bool {
        let page = if self.data.is_some() {
            Pagination::new(self.page, self.total_pages()).clamp(page)
        } else {
            page.max(1)
        };

        if page == self.page {
            return false;
        }
        self.page = page;
        true
    }

    /// Loads the current query, keeping the previous page on screen until it resolves.
    ///
    /// A page past the last one is pulled back to the last page and loaded again.
    pub async fn refresh(&mut self) {
        loop {
            let params = self.params();
            let api = Arc::clone(&self.api);
            let request = params.clone();

            let result = self
                .queries
                .notes
                .ensure(params.clone(), move || async move {
                    api.fetch_notes(&request).await
                })
                .await;

            match result {
                Ok(page) if page.total_pages > 0 && params.page > page.total_pages => {
                    debug!("Page {} is past the last page {}", params.page, page.total_pages);
                    self.page = page.total_pages;
                    continue;
                }
                Ok(page) => {
                    self.data = Some(page);
                    self.data_params = Some(params);
                    self.error = None;
                    self.notify_if_empty();
                }
                Err(e) => {
                    debug!("Loading notes failed: {}", e);
                    self.error = Some(e);
                }
            }
            break;
        }

        self.queries.gc();
    }

    fn notify_if_empty(&mut self) {
        let searching = !self.applied_search.trim().is_empty();

        if !self.notes().is_empty() || !searching {
            self.empty_notified = None;
            return;
        }

        let params = self.params();
        if self.empty_notified.as_ref() != Some(&params) {
            self.notifier.error(NO_NOTES_FOUND);
            self.empty_notified = Some(params);
        }
    }

    pub fn open_modal(&mut self) {
        self.modal = Some(NoteForm::new());
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    /// Feeds a line to the open form, submitting it once complete.
    pub async fn form_input(&mut self, line: &str) -> Flow {
        let Some(form) = self.modal.as_mut() else {
            return Flow::Idle;
        };

        match form.input(line) {
            FormOutcome::Submit(payload) => self.create(payload).await,
            FormOutcome::Busy => Flow::Idle,
            FormOutcome::Next | FormOutcome::Invalid(_) => Flow::Render,
        }
    }

    /// Creates a note. Invalid payloads never reach the API.
    pub async fn create(&mut self, payload: CreateNotePayload) -> Flow {
        if let Err(errors) = payload.validate() {
            if let Some(form) = self.modal.as_mut() {
                form.set_errors(errors);
            }
            return Flow::Render;
        }

        if let Some(form) = self.modal.as_mut() {
            if form.is_submitting() {
                return Flow::Idle;
            }
            form.set_submitting(true);
        }

        match self.api.create_note(&payload).await {
            Ok(note) => {
                info!("Created note {}", note.id);
                self.notifier.success(NOTE_CREATED);
                self.modal = None;
                self.queries.invalidate_notes();
                self.refresh().await;
            }
            Err(e) => {
                debug!("Create failed: {}", e);
                self.notifier.error(CREATE_FAILED);
                if let Some(form) = self.modal.as_mut() {
                    form.set_submitting(false);
                }
            }
        }

        Flow::Render
    }

    /// Resolves a 1-based list position to a note id; anything else is taken as an id.
    pub fn resolve(&self, target: &str) -> String {
        target
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| self.notes().get(i))
            .map(|note| note.id.clone())
            .unwrap_or_else(|| target.to_string())
    }

    pub async fn delete(&mut self, target: &str) -> Flow {
        let id = self.resolve(target);

        match self.api.delete_note(&id).await {
            Ok(_) => {
                info!("Deleted note {}", id);
                self.notifier.success(NOTE_DELETED);
                self.queries.invalidate_notes();
                self.queries.forget_note(&id);
                self.refresh().await;
            }
            Err(e) => {
                debug!("Delete of {} failed: {}", id, e);
                self.notifier.error(DELETE_FAILED);
            }
        }

        Flow::Render
    }

    pub async fn handle(&mut self, intent: Intent, now: Instant) -> Flow {
        match intent {
            Intent::Search(text) => {
                let page = self.page;
                self.set_search(&text, now);
                // Back on page 1 with the applied search until the debounce fires
                if page != self.page {
                    self.refresh().await;
                }
                Flow::Render
            }
            Intent::NextPage => {
                let next = Pagination::new(self.page, self.total_pages()).next();
                self.change_page(next).await
            }
            Intent::PrevPage => {
                let prev = Pagination::new(self.page, self.total_pages()).prev();
                self.change_page(prev).await
            }
            Intent::GoToPage(page) => self.change_page(page).await,
            Intent::View(target) => Flow::View(self.resolve(&target)),
            Intent::Delete(target) => self.delete(&target).await,
            Intent::OpenCreate => {
                self.open_modal();
                Flow::Render
            }
            Intent::FormInput(line) => self.form_input(&line).await,
            Intent::CloseModal => {
                self.close_modal();
                Flow::Render
            }
            Intent::Refresh => {
                if let Some(text) = self.debounce.flush() {
                    self.apply_search(text);
                }
                self.queries.invalidate_notes();
                self.refresh().await;
                Flow::Render
            }
            Intent::Help => Flow::Help,
            Intent::Quit => Flow::Quit,
            Intent::Unknown(line) => {
                debug!("Unknown input {:?}", line);
                Flow::Help
            }
        }
    }

    async fn change_page(&mut self, page: u32) -> Flow {
        if !self.set_page(page) {
            return Flow::Idle;
        }
        self.refresh().await;
        Flow::Render
    }

    pub fn render(&self, out: &mut impl WriteColor, output: &OutputFormat) -> io::Result<()> {
        if matches!(output, OutputFormat::Json) {
            return match &self.data {
                Some(page) => NoteListFormatter::new(OutputFormat::Json).print_page(out, page),
                None => Ok(()),
            };
        }

        if matches!(output, OutputFormat::Pretty) {
            search_box::render(out, &self.search, self.debounce.is_pending())?;
            Pagination::new(self.page, self.total_pages()).render(out)?;
            writeln!(out)?;
        }

        if let Some(error) = &self.error {
            writeln!(out, "{}", status_text(error))?;
        } else if let Some(page) = &self.data {
            if self.is_placeholder() {
                writeln!(out, "{}", UPDATING_TEXT)?;
            }
            NoteListFormatter::new(output.clone()).print_notes(out, &page.notes)?;
        } else {
            writeln!(out, "{}", LOADING_TEXT)?;
        }

        if let Some(form) = &self.modal {
            modal::render(out, "Create note", |out| form.render(out))?;
        } else if matches!(output, OutputFormat::Pretty) {
            out.set_color(ColorSpec::new().set_dimmed(true))?;
            writeln!(out, "Create note + (c)   help (h)")?;
            out.reset()?;
        }

        Ok(())
    }
}

/// Inline status for a failed list fetch
pub fn status_text(error: &ApiError) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        LOAD_FAILED_TEXT.to_string()
    } else {
        message
    }
}
