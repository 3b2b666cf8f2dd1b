use std::{io::Write, process::ExitCode, sync::Arc};

use anyhow::Context;
use notehub_core::NoteDraft;
use tracing::{debug, info};

use crate::{
    args::{NoteCommand, NoteCreateArgs, NoteDeleteArgs, NoteListArgs, NoteShowArgs, OutputFormat},
    editor::{Editor, EditorTemplate},
    query::QueryClient,
    screens::{
        notes::{status_text, CREATE_FAILED, DELETE_FAILED, NOTE_CREATED, NOTE_DELETED},
        NoteDetailsScreen, NotesScreen, NotesSettings,
    },
    ui::{self, list::NoteListFormatter, pagination::Pagination, Notifier},
    web_client::NotesApi,
};

pub async fn note_cmd<A, N>(
    api: Arc<A>,
    notifier: N,
    settings: NotesSettings,
    subcommand: NoteCommand,
) -> anyhow::Result<ExitCode>
where
    A: NotesApi,
    N: Notifier,
{
    match subcommand {
        NoteCommand::List(args) => list(api, notifier, settings, args).await,
        NoteCommand::Show(args) => show(api, args).await,
        NoteCommand::Create(args) => create(api, notifier, args).await,
        NoteCommand::Delete(args) => delete(api, notifier, args).await,
    }
}

async fn list<A: NotesApi, N: Notifier>(
    api: Arc<A>,
    notifier: N,
    settings: NotesSettings,
    args: NoteListArgs,
) -> anyhow::Result<ExitCode> {
    let settings = NotesSettings {
        per_page: args.per_page.unwrap_or(settings.per_page),
        ..settings
    };
    let term = args.term.as_deref().unwrap_or_default();

    let mut screen = NotesScreen::new(api, Arc::new(QueryClient::new()), notifier, settings)
        .with_initial(args.page, term);
    screen.refresh().await;

    if let Some(error) = screen.error() {
        eprintln!("{}", status_text(error));
        return Ok(ExitCode::FAILURE);
    }

    let mut out = ui::stdout();
    let formatter = NoteListFormatter::new(args.output.clone()).with_lines(args.lines);

    if let Some(page) = screen.data() {
        if matches!(args.output, OutputFormat::Json) {
            formatter.print_page(&mut out, page)?;
        } else {
            formatter.print_notes(&mut out, &page.notes)?;

            let pagination = Pagination::new(screen.page(), page.total_pages);
            if matches!(args.output, OutputFormat::Pretty) && pagination.is_visible() {
                writeln!(out)?;
                pagination.render(&mut out)?;
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn show<A: NotesApi>(api: Arc<A>, args: NoteShowArgs) -> anyhow::Result<ExitCode> {
    let mut screen = NoteDetailsScreen::load(api, Arc::new(QueryClient::new()), &args.id).await;
    let mut out = ui::stdout();

    if screen.note().is_some() {
        screen.render(&mut out, &args.output)?;
        if screen.revalidate().await {
            debug!("Note {} changed while shown", screen.id());
            screen.render(&mut out, &args.output)?;
        }
    } else {
        screen.revalidate().await;
        screen.render(&mut out, &args.output)?;
    }

    Ok(ExitCode::SUCCESS)
}

async fn create<A: NotesApi, N: Notifier>(
    api: Arc<A>,
    notifier: N,
    args: NoteCreateArgs,
) -> anyhow::Result<ExitCode> {
    let payload = if args.interactive {
        let template = EditorTemplate::from_args(&args).render()?;
        Editor::new(&template).open()?
    } else {
        let draft = NoteDraft {
            title: args.title.unwrap_or_default(),
            content: args.content.unwrap_or_default(),
            tag: args.tag,
        };

        match draft.validate() {
            Ok(payload) => payload,
            Err(errors) => {
                for error in &errors.errors {
                    eprintln!("{}: {}", error.field.label(), error.message);
                }
                return Ok(ExitCode::FAILURE);
            }
        }
    };

    match api.create_note(&payload).await {
        Ok(note) => {
            info!("Created note {}", note.id);
            notifier.success(NOTE_CREATED);
            println!("{}", note.id);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            debug!("Create failed: {}", e);
            notifier.error(CREATE_FAILED);
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn delete<A: NotesApi, N: Notifier>(
    api: Arc<A>,
    notifier: N,
    args: NoteDeleteArgs,
) -> anyhow::Result<ExitCode> {
    if !args.yes {
        let prompt = match args.ids.as_slice() {
            [id] => format!("Delete note {}?", id),
            ids => format!("Delete {} notes?", ids.len()),
        };

        let confirmed = cliclack::confirm(prompt)
            .initial_value(false)
            .interact()
            .context("Couldn't read confirmation")?;

        if !confirmed {
            println!("Nothing deleted");
            return Ok(ExitCode::SUCCESS);
        }
    }

    let mut failed = 0;

    for id in &args.ids {
        match api.delete_note(id).await {
            Ok(note) => {
                info!("Deleted note {}", note.id);
                notifier.success(NOTE_DELETED);
                println!("Deleted note {}", id);
            }
            Err(e) => {
                debug!("Delete of {} failed: {}", id, e);
                notifier.error(DELETE_FAILED);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
