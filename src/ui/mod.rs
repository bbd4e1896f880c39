pub mod app;
pub mod render;

use std::io;
use std::time::Duration;

use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use crate::bridge::RankingSource;
use crate::config::UI_TICK_MS;

pub use app::App;

/// Take over the terminal and run until the user quits.
pub async fn run<S: RankingSource>(mut app: App<S>) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app).await;

    // Restore terminal regardless of result
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_loop<S: RankingSource>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<S>,
) -> io::Result<()> {
    let tick = Duration::from_millis(UI_TICK_MS);

    loop {
        app.session.drain();

        let now = Utc::now();
        terminal.draw(|f| render::render(f, app.session.selector(), &app.menu, now))?;

        if event::poll(tick)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code, now);
                }
            }
        }

        if app.should_quit {
            info!("Quit requested");
            return Ok(());
        }

        // let spawned fetches make progress between frames
        tokio::task::yield_now().await;
    }
}
