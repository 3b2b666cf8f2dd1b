use std::{sync::Arc, time::Duration};

use notehub_core::{CreateNotePayload, Field, FetchNotesParams, NoteTag};
use termcolor::NoColor;
use tokio::time::Instant;

use super::fake_api::{InMemoryApi, RecordingNotifier};
use crate::{
    args::OutputFormat,
    query::QueryClient,
    screens::{
        notes::{LOADING_TEXT, NOTE_CREATED, NOTE_DELETED, NO_NOTES_FOUND, UPDATING_TEXT},
        Flow, NotesScreen, NotesSettings,
    },
    ui::{toast::Toast, Intent},
    web_client::ApiError,
};

const DEBOUNCE: Duration = Duration::from_millis(500);

fn screen(api: &Arc<InMemoryApi>) -> (NotesScreen<InMemoryApi, RecordingNotifier>, RecordingNotifier) {
    let notifier = RecordingNotifier::default();
    let screen = NotesScreen::new(
        Arc::clone(api),
        Arc::new(QueryClient::new()),
        notifier.clone(),
        NotesSettings::default(),
    );
    (screen, notifier)
}

fn numbered(count: usize) -> Arc<InMemoryApi> {
    let api = InMemoryApi::new();
    for i in 1..=count {
        api.insert(&format!("Note {}", i), "", NoteTag::Work);
    }
    Arc::new(api)
}

fn render(screen: &NotesScreen<InMemoryApi, RecordingNotifier>) -> String {
    let mut out = NoColor::new(Vec::new());
    screen.render(&mut out, &OutputFormat::Pretty).unwrap();
    String::from_utf8(out.into_inner()).unwrap()
}

#[tokio::test]
async fn test_first_load_shows_first_page() {
    let api = numbered(15);
    let (mut screen, _) = screen(&api);

    assert_eq!(screen.fetch_status(), LOADING_TEXT);
    screen.refresh().await;

    assert_eq!(screen.notes().len(), 12);
    assert_eq!(screen.total_pages(), 2);
    assert!(render(&screen).contains("Page 1 of 2"));
}

#[tokio::test]
async fn test_search_without_matches_notifies_once() {
    let api = Arc::new(InMemoryApi::with_notes(&["Groceries", "Standup"]));
    let (mut screen, notifier) = screen(&api);
    screen.refresh().await;

    let now = Instant::now();
    screen.set_search("zzz", now);
    assert!(screen.apply_debounced(now + DEBOUNCE));
    screen.refresh().await;

    assert!(screen.notes().is_empty());
    let empty = Toast::Error(NO_NOTES_FOUND.to_string());
    assert_eq!(notifier.count(&empty), 1);

    // Same query again, no second toast
    screen.handle(Intent::Refresh, now + DEBOUNCE).await;
    assert_eq!(notifier.count(&empty), 1);
}

#[tokio::test]
async fn test_empty_list_without_search_is_silent() {
    let api = Arc::new(InMemoryApi::new());
    let (mut screen, notifier) = screen(&api);

    screen.refresh().await;

    assert!(notifier.toasts().is_empty());
    assert!(render(&screen).contains("No notes yet."));
}

#[tokio::test]
async fn test_search_resets_page() {
    let api = numbered(30);
    let (mut screen, _) = screen(&api);
    screen.refresh().await;

    assert_eq!(screen.handle(Intent::GoToPage(3), Instant::now()).await, Flow::Render);
    assert_eq!(screen.page(), 3);

    screen.set_search("note", Instant::now());

    assert_eq!(screen.page(), 1);
    assert_eq!(screen.search(), "note");
    assert_eq!(screen.applied_search(), "");
}

#[tokio::test]
async fn test_unchanged_search_still_loads_first_page() {
    let api = numbered(30);
    let (screen, _) = screen(&api);
    let mut screen = screen.with_initial(3, "");
    screen.refresh().await;
    assert_eq!(screen.notes()[0].title, "Note 25");
    assert_eq!(InMemoryApi::count(&api.list_calls), 1);

    // Typing back the applied search leaves nothing new to apply
    let now = Instant::now();
    assert_eq!(screen.handle(Intent::Search(String::new()), now).await, Flow::Render);
    if screen.apply_debounced(now + DEBOUNCE) {
        screen.refresh().await;
    }

    assert_eq!(screen.page(), 1);
    assert!(!screen.is_placeholder());
    assert!(!screen.is_stale());
    let titles: Vec<String> = screen.notes().iter().map(|n| n.title.clone()).collect();
    let expected: Vec<String> = (1..=12).map(|i| format!("Note {}", i)).collect();
    assert_eq!(titles, expected);
    assert_eq!(InMemoryApi::count(&api.list_calls), 2);
}

#[tokio::test]
async fn test_page_past_the_end_falls_back_to_last() {
    let api = numbered(30);
    let (screen, _) = screen(&api);
    let mut screen = screen.with_initial(u32::MAX, "");

    screen.refresh().await;

    assert_eq!(screen.total_pages(), 3);
    assert_eq!(screen.page(), 3);
    assert_eq!(screen.notes().len(), 6);
    assert!(render(&screen).contains("Page 3 of 3"));

    assert_eq!(screen.handle(Intent::NextPage, Instant::now()).await, Flow::Idle);
    assert_eq!(screen.page(), 3);
}

#[tokio::test]
async fn test_debounce_applies_last_value_only() {
    let api = numbered(3);
    let (mut screen, _) = screen(&api);
    screen.refresh().await;

    let start = Instant::now();
    screen.set_search("n", start);
    screen.set_search("no", start + Duration::from_millis(100));
    screen.set_search("note 2", start + Duration::from_millis(200));

    assert!(!screen.apply_debounced(start + Duration::from_millis(600)));
    assert!(screen.apply_debounced(start + Duration::from_millis(700)));
    assert_eq!(screen.applied_search(), "note 2");

    screen.refresh().await;
    assert_eq!(screen.notes().len(), 1);
    assert_eq!(InMemoryApi::count(&api.list_calls), 2);
}

#[tokio::test]
async fn test_refresh_flushes_pending_search() {
    let api = numbered(3);
    let (mut screen, _) = screen(&api);
    screen.refresh().await;

    screen.set_search("note 3", Instant::now());
    screen.handle(Intent::Refresh, Instant::now()).await;

    assert_eq!(screen.applied_search(), "note 3");
    assert_eq!(screen.notes().len(), 1);
}

#[tokio::test]
async fn test_previous_page_stays_until_next_resolves() {
    let api = numbered(20);
    let (mut screen, _) = screen(&api);
    screen.refresh().await;
    let first_page: Vec<String> = screen.notes().iter().map(|n| n.id.clone()).collect();

    assert!(screen.set_page(2));

    assert!(screen.is_placeholder());
    assert_eq!(screen.fetch_status(), UPDATING_TEXT);
    let shown: Vec<String> = screen.notes().iter().map(|n| n.id.clone()).collect();
    assert_eq!(shown, first_page);

    screen.refresh().await;
    assert!(!screen.is_placeholder());
    assert_eq!(screen.notes().len(), 8);
}

#[tokio::test]
async fn test_page_is_clamped_to_total() {
    let api = numbered(20);
    let (mut screen, _) = screen(&api);
    screen.refresh().await;

    assert_eq!(screen.handle(Intent::GoToPage(9), Instant::now()).await, Flow::Render);
    assert_eq!(screen.page(), 2);
    assert_eq!(screen.handle(Intent::NextPage, Instant::now()).await, Flow::Idle);
}

#[tokio::test]
async fn test_short_title_never_reaches_api() {
    let api = Arc::new(InMemoryApi::new());
    let (mut screen, _) = screen(&api);
    screen.refresh().await;

    screen.handle(Intent::OpenCreate, Instant::now()).await;
    let flow = screen.form_input("ab").await;

    assert_eq!(flow, Flow::Render);
    let form = screen.modal().unwrap();
    assert_eq!(
        form.errors().get(Field::Title),
        Some("Title must be at least 3 characters")
    );

    let payload = CreateNotePayload {
        title: "ab".to_string(),
        content: String::new(),
        tag: NoteTag::Todo,
    };
    screen.create(payload).await;

    assert_eq!(InMemoryApi::count(&api.create_calls), 0);
}

#[tokio::test]
async fn test_create_closes_modal_and_refetches() {
    let api = Arc::new(InMemoryApi::with_notes(&["Existing"]));
    let (mut screen, notifier) = screen(&api);
    screen.refresh().await;
    assert_eq!(InMemoryApi::count(&api.list_calls), 1);

    screen.open_modal();
    screen.form_input("abc").await;
    screen.form_input("three characters is enough").await;
    let flow = screen.form_input("meeting").await;

    assert_eq!(flow, Flow::Render);
    assert!(!screen.is_modal_open());
    assert_eq!(InMemoryApi::count(&api.create_calls), 1);
    assert_eq!(InMemoryApi::count(&api.list_calls), 2);
    assert!(screen.notes().iter().any(|n| n.title == "abc" && n.tag == NoteTag::Meeting));
    assert_eq!(notifier.toasts(), vec![Toast::Success(NOTE_CREATED.to_string())]);
}

#[tokio::test]
async fn test_failed_create_keeps_modal_open() {
    let api = Arc::new(InMemoryApi::new());
    let (mut screen, notifier) = screen(&api);
    screen.refresh().await;
    api.fail_with(ApiError::Status {
        status: 500,
        message: "boom".to_string(),
    });

    screen.open_modal();
    screen.form_input("Weekly sync").await;
    screen.form_input("").await;
    screen.form_input("").await;

    let form = screen.modal().unwrap();
    assert!(!form.is_submitting());
    assert_eq!(
        notifier.toasts(),
        vec![Toast::Error("Failed to create note".to_string())]
    );
}

#[tokio::test]
async fn test_close_modal_discards_form() {
    let api = Arc::new(InMemoryApi::new());
    let (mut screen, _) = screen(&api);

    screen.handle(Intent::OpenCreate, Instant::now()).await;
    screen.handle(Intent::FormInput("Draft".into()), Instant::now()).await;
    screen.handle(Intent::CloseModal, Instant::now()).await;

    assert!(!screen.is_modal_open());
    screen.open_modal();
    assert_eq!(screen.modal().unwrap().draft().title, "");
}

#[tokio::test]
async fn test_delete_removes_note_from_next_fetch() {
    let api = Arc::new(InMemoryApi::with_notes(&["First", "Second"]));
    let (mut screen, notifier) = screen(&api);
    screen.refresh().await;
    let doomed = screen.notes()[0].id.clone();

    screen.handle(Intent::Delete("1".to_string()), Instant::now()).await;

    assert!(!screen.notes().iter().any(|n| n.id == doomed));
    assert!(!api.ids().contains(&doomed));
    assert_eq!(notifier.toasts(), vec![Toast::Success(NOTE_DELETED.to_string())]);
}

#[tokio::test]
async fn test_failed_delete_notifies() {
    let api = Arc::new(InMemoryApi::with_notes(&["First"]));
    let (mut screen, notifier) = screen(&api);
    screen.refresh().await;

    screen.delete("missing-id").await;

    assert_eq!(screen.notes().len(), 1);
    assert_eq!(
        notifier.toasts(),
        vec![Toast::Error("Failed to delete note".to_string())]
    );
}

#[tokio::test]
async fn test_view_resolves_list_position() {
    let api = Arc::new(InMemoryApi::with_notes(&["First", "Second"]));
    let (mut screen, _) = screen(&api);
    screen.refresh().await;
    let second = screen.notes()[1].id.clone();

    assert_eq!(
        screen.handle(Intent::View("2".into()), Instant::now()).await,
        Flow::View(second)
    );
    assert_eq!(
        screen.handle(Intent::View("abc".into()), Instant::now()).await,
        Flow::View("abc".to_string())
    );
}

#[tokio::test]
async fn test_load_error_is_shown_inline() {
    let api = Arc::new(InMemoryApi::new());
    api.fail_with(ApiError::Network("connection refused".to_string()));
    let (mut screen, _) = screen(&api);

    screen.refresh().await;

    assert!(screen.error().is_some());
    assert!(render(&screen).contains("Network error: connection refused"));
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_identical_fetches_are_coalesced() {
    let api = Arc::new(InMemoryApi::with_notes(&["Only"]).with_delay(Duration::from_millis(50)));
    let queries = QueryClient::new();
    let params = FetchNotesParams::default();

    let fetch = || {
        let api = Arc::clone(&api);
        let request = params.clone();
        move || async move { crate::web_client::NotesApi::fetch_notes(&*api, &request).await }
    };

    let (a, b) = tokio::join!(
        queries.notes.fetch(params.clone(), fetch()),
        queries.notes.fetch(params.clone(), fetch())
    );

    assert_eq!(a.unwrap().notes.len(), 1);
    assert_eq!(b.unwrap().notes.len(), 1);
    assert_eq!(InMemoryApi::count(&api.list_calls), 1);
}
