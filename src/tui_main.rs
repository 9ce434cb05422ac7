use anyhow::Result;
use chrono::Utc;
use crossterm::{
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tokio::sync::watch;

use rank_tracker::{
    api::RankSource,
    tracker::RankTracker,
    tui::{ui, App, Event as TuiEvent, EventHandler},
};

use crate::signals;

pub async fn run_tui<S: RankSource>(
    tracker: &mut RankTracker<S>,
    title: &str,
    refresh_interval: chrono::Duration,
    shutdown: &mut watch::Receiver<bool>,
) -> Result<()> {
    // Log lines would corrupt the alternate screen
    disable_logging_output();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(title, refresh_interval);
    let events = EventHandler::new(250);

    let res = run_app(&mut terminal, &mut app, &events, tracker, shutdown).await;

    // Always restore terminal state, even if there was an error
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn disable_logging_output() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

    let null_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::sink)
        .with_filter(tracing_subscriber::filter::LevelFilter::OFF);

    let _ = tracing_subscriber::registry().with(null_layer).try_init();
}

async fn run_app<B: ratatui::backend::Backend, S: RankSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &EventHandler,
    tracker: &mut RankTracker<S>,
    shutdown: &mut watch::Receiver<bool>,
) -> Result<()> {
    loop {
        let signalled = *shutdown.borrow();
        if app.should_quit || signalled {
            return Ok(());
        }

        if app.refresh_due(Utc::now()) {
            app.set_loading("Fetching player data...");
            terminal.draw(|f| ui::draw(f, &*app))?;
            match tracker.refresh_until(signals::requested(shutdown)).await {
                Some(report) => app.apply_report(report),
                None => return Ok(()),
            }
        }

        terminal.draw(|f| ui::draw(f, &*app))?;

        match events.next()? {
            TuiEvent::Key(key) => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.should_quit = true;
                }
                KeyCode::Char('r') => app.request_refresh(),
                KeyCode::Up => app.move_selection_up(),
                KeyCode::Down => app.move_selection_down(),
                _ => {}
            },
            TuiEvent::Resize(_, _) => {
                // Terminal was resized, redraw will happen automatically
            }
            TuiEvent::Tick => {}
        }
    }
}
