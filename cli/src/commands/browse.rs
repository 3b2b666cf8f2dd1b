use std::{io::Write, process::ExitCode, sync::Arc, time::Duration};

use anyhow::Context;
use termcolor::{ColorSpec, WriteColor};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    time::Instant,
};
use tracing::debug;

use crate::{
    args::{BrowseArgs, OutputFormat},
    query::QueryClient,
    screens::{Flow, NoteDetailsScreen, NotesScreen, NotesSettings},
    ui::{self, details, input, Intent, Notifier},
    web_client::NotesApi,
};

/// Stand-in deadline while no search is waiting on the debounce
const IDLE_WAIT: Duration = Duration::from_secs(60 * 60);

/// Line-driven notes browser.
///
/// Lines typed on stdin become intents for the notes screen. A pending search
/// is applied once its debounce deadline passes, even without further input.
pub async fn browse_cmd<A, N>(
    api: Arc<A>,
    notifier: N,
    settings: NotesSettings,
    args: BrowseArgs,
) -> anyhow::Result<ExitCode>
where
    A: NotesApi,
    N: Notifier,
{
    let queries = Arc::new(QueryClient::new());
    let mut screen = NotesScreen::new(Arc::clone(&api), Arc::clone(&queries), notifier, settings)
        .with_initial(args.page, &args.search);

    let mut out = ui::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    status(&mut out, screen.fetch_status())?;
    screen.refresh().await;
    draw(&mut out, &screen)?;

    loop {
        let deadline = screen.search_deadline();
        let wake_at = deadline.unwrap_or_else(|| Instant::now() + IDLE_WAIT);

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Couldn't read input")? else {
                    debug!("Input closed");
                    break;
                };

                let intent = input::parse_line(&line, screen.is_modal_open());
                if matches!(
                    intent,
                    Intent::NextPage | Intent::PrevPage | Intent::GoToPage(_) | Intent::Refresh
                ) {
                    status(&mut out, screen.fetch_status())?;
                }

                match screen.handle(intent, Instant::now()).await {
                    Flow::Render => draw(&mut out, &screen)?,
                    Flow::Idle => {}
                    Flow::View(id) => {
                        show_note(&api, &queries, &id, &mut out).await?;
                    }
                    Flow::Help => writeln!(out, "{}", input::HELP)?,
                    Flow::Quit => break,
                }
            }
            _ = tokio::time::sleep_until(wake_at), if deadline.is_some() => {
                if screen.apply_debounced(Instant::now()) {
                    status(&mut out, screen.fetch_status())?;
                    screen.refresh().await;
                    draw(&mut out, &screen)?;
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn draw<A: NotesApi, N: Notifier>(
    out: &mut impl WriteColor,
    screen: &NotesScreen<A, N>,
) -> std::io::Result<()> {
    writeln!(out)?;
    screen.render(out, &OutputFormat::Pretty)?;
    out.flush()
}

fn status(out: &mut impl WriteColor, text: &str) -> std::io::Result<()> {
    out.set_color(ColorSpec::new().set_dimmed(true))?;
    writeln!(out, "{}", text)?;
    out.reset()?;
    out.flush()
}

async fn show_note<A: NotesApi>(
    api: &Arc<A>,
    queries: &Arc<QueryClient>,
    id: &str,
    out: &mut impl WriteColor,
) -> anyhow::Result<()> {
    writeln!(out)?;
    status(out, details::LOADING_TEXT)?;

    let mut screen = NoteDetailsScreen::load(Arc::clone(api), Arc::clone(queries), id).await;
    if screen.note().is_some() {
        screen.render(out, &OutputFormat::Pretty)?;
        if screen.revalidate().await {
            screen.render(out, &OutputFormat::Pretty)?;
        }
    } else {
        screen.revalidate().await;
        screen.render(out, &OutputFormat::Pretty)?;
    }

    status(out, "Back to the list: r")?;
    Ok(())
}
