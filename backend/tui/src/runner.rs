//! Terminal event loop.
//!
//! Keys mutate the form directly. Extraction runs in a spawned task that
//! owns only its ticket and the extractor, and reports back over a channel.

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use receiptdesk_form::{ExpenseForm, ExtractionReport, ExtractionTicket, Extractor};
use receiptdesk_media::load_receipt_image;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::app::AppState;
use crate::input::{handle_key_event, Action};
use crate::render::draw_ui;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Raw mode and the alternate screen, undone on drop. Held for the whole
/// session so an error or panic anywhere after setup still restores the shell.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let guard = TerminalGuard;
        execute!(io::stdout(), EnterAlternateScreen).context("Failed to enter alternate screen")?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Nothing useful to do with a failure here.
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
    }
}

/// Run the interactive form until the user quits.
pub async fn run(form: ExpenseForm, extractor: Extractor, initial: Option<PathBuf>) -> Result<()> {
    let mut state = AppState::new(form);
    if let Some(path) = initial {
        load_into(&mut state, path).await;
    }

    let _guard = TerminalGuard::enter()?;
    let mut terminal =
        Terminal::new(CrosstermBackend::new(io::stdout())).context("Failed to create terminal")?;
    event_loop(&mut terminal, &mut state, extractor).await
}

async fn event_loop(terminal: &mut Term, state: &mut AppState, extractor: Extractor) -> Result<()> {
    let (report_tx, mut report_rx) = mpsc::channel::<ExtractionReport>(4);

    loop {
        terminal.draw(|f| draw_ui(f, state))?;
        drain_reports(state, &mut report_rx);

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                match handle_key_event(key, state) {
                    Some(Action::LoadImage(path)) => load_into(state, path).await,
                    Some(Action::Extract) => {
                        if let Some(ticket) = state.begin_extraction() {
                            spawn_extraction(extractor.clone(), ticket, report_tx.clone());
                        }
                    }
                    None => {}
                }
            }
        }

        if state.should_quit {
            return Ok(());
        }
    }
}

/// Run `ticket` off the UI task; its report comes back through `tx`.
fn spawn_extraction(
    extractor: Extractor,
    ticket: ExtractionTicket,
    tx: mpsc::Sender<ExtractionReport>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let report = extractor.run_ticket(ticket).await;
        if tx.send(report).await.is_err() {
            debug!("Form closed before extraction finished");
        }
    })
}

/// Apply every report that has arrived without waiting for more.
fn drain_reports(state: &mut AppState, rx: &mut mpsc::Receiver<ExtractionReport>) {
    while let Ok(report) = rx.try_recv() {
        debug!(generation = report.generation, "Extraction report received");
        state.apply_report(report);
    }
}

async fn load_into(state: &mut AppState, path: PathBuf) {
    match load_receipt_image(&path).await {
        Ok(image) => state.select_image(image),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not open receipt");
            state.error(format!("{e:#}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use receiptdesk_core::{Classification, ReceiptImage};
    use receiptdesk_media::PreviewStore;
    use receiptdesk_understanding::{MockClassifier, MockOcr};

    use crate::app::StatusKind;

    fn extractor() -> Extractor {
        Extractor::new(
            Arc::new(MockOcr::with_text("CORNER SHOP\nTOTAL 4.20")),
            Arc::new(MockClassifier::with_result(Classification {
                category: Some("Groceries".into()),
                amount: Some(4.2),
                date: Some("2024-03-09".into()),
                merchant: Some("Corner Shop".into()),
            })),
        )
    }

    fn state_with_image() -> AppState {
        let mut state = AppState::new(ExpenseForm::new(PreviewStore::new()));
        state.select_image(ReceiptImage::new("r.png", "image/png", &b"png"[..]));
        state
    }

    #[tokio::test]
    async fn spawned_report_reaches_the_form() {
        let mut state = state_with_image();
        let (tx, mut rx) = mpsc::channel(4);

        let ticket = state.begin_extraction().unwrap();
        spawn_extraction(extractor(), ticket, tx).await.unwrap();
        assert!(state.form.is_loading());

        drain_reports(&mut state, &mut rx);
        assert!(!state.form.is_loading());
        assert_eq!(state.form.draft().amount, "4.2");
        assert_eq!(state.form.draft().name, "Corner Shop");
        assert_eq!(state.status.unwrap().kind, StatusKind::Info);
    }

    #[tokio::test]
    async fn report_for_replaced_image_is_ignored() {
        let mut state = state_with_image();
        let (tx, mut rx) = mpsc::channel(4);

        let ticket = state.begin_extraction().unwrap();
        state.select_image(ReceiptImage::new("other.png", "image/png", &b"other"[..]));
        spawn_extraction(extractor(), ticket, tx).await.unwrap();

        drain_reports(&mut state, &mut rx);
        assert!(!state.form.is_loading());
        assert_eq!(state.form.draft().amount, "");
        let status = state.status.unwrap();
        assert_eq!(status.kind, StatusKind::Info);
        assert_eq!(status.text, "Ignored result for a replaced image");
    }

    #[tokio::test]
    async fn closed_form_does_not_fail_the_task() {
        let mut state = state_with_image();
        let (tx, rx) = mpsc::channel(4);
        drop(rx);

        let ticket = state.begin_extraction().unwrap();
        assert!(spawn_extraction(extractor(), ticket, tx).await.is_ok());
    }
}
