use chrono::{DateTime, Utc};
use crossterm::event::KeyCode;

use crate::bridge::RankingSource;
use crate::selector::{FetchStatus, TimeframeSelector};
use crate::session::LeaderboardSession;
use crate::types::TimeWindow;

// ---------------------------------------------------------------------------
// UI state
// ---------------------------------------------------------------------------

/// Timeframe dropdown. The labels themselves are recomputed every frame
/// because which periods are selectable depends on the clock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuState {
    pub open: bool,
    pub cursor: usize,
}

pub struct App<S: RankingSource> {
    pub session: LeaderboardSession<S>,
    pub menu: MenuState,
    pub should_quit: bool,
}

impl<S: RankingSource> App<S> {
    pub fn new(session: LeaderboardSession<S>) -> Self {
        Self {
            session,
            menu: MenuState::default(),
            should_quit: false,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, now: DateTime<Utc>) {
        let labels = self.session.selector().menu(now);

        if self.menu.open {
            match code {
                KeyCode::Up | KeyCode::Char('k') => {
                    self.menu.cursor = self.menu.cursor.saturating_sub(1);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    let max = labels.len().saturating_sub(1);
                    self.menu.cursor = (self.menu.cursor + 1).min(max);
                }
                KeyCode::Enter => {
                    if let Some(label) = labels.get(self.menu.cursor) {
                        self.session.select(label);
                    }
                    self.menu.open = false;
                }
                KeyCode::Esc | KeyCode::Char('t') => self.menu.open = false,
                KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char('t') | KeyCode::Enter => {
                let current = self.session.selector().timeframe_label();
                self.menu.cursor = labels.iter().position(|l| l == current).unwrap_or(0);
                self.menu.open = true;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.session.refresh(),
            KeyCode::Char('d') | KeyCode::Esc => self.session.dismiss_notification(),
            _ => {}
        }
    }
}

/// Placement of the signed-in user in the current list, if they appear in it.
pub fn self_placement(selector: &TimeframeSelector) -> Option<usize> {
    let me = selector.self_uuid()?;
    match selector.status() {
        FetchStatus::Loaded(p) => p
            .podium
            .iter()
            .chain(&p.rest)
            .find(|slot| slot.uuid() == me)
            .map(|slot| slot.placement()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// `1234567` → `1,234,567`
pub fn format_points(points: u64) -> String {
    let digits = points.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Human-readable window bounds for the header. The end is exclusive.
pub fn format_window(window: &TimeWindow) -> String {
    if window.is_unbounded() {
        return "all recorded activity".to_string();
    }
    let day = |secs: i64| {
        DateTime::from_timestamp(secs, 0)
            .map(|t| t.format("%b %-d, %Y").to_string())
            .unwrap_or_else(|| secs.to_string())
    };
    format!("{} → {}", day(window.start_unix), day(window.end_unix))
}

pub fn placement_label(placement: usize) -> String {
    match placement {
        1 => "1st".to_string(),
        2 => "2nd".to_string(),
        3 => "3rd".to_string(),
        n => format!("{n}th"),
    }
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::bridge::DemoRankingSource;
    use crate::catalog::tests::{at, sample_catalog};
    use crate::types::Selection;

    fn app_at(now: DateTime<Utc>) -> App<DemoRankingSource> {
        let source = Arc::new(DemoRankingSource::new(std::time::Duration::from_millis(1)));
        let session = LeaderboardSession::start(Arc::new(sample_catalog()), source, None, now).unwrap();
        App::new(session)
    }

    #[test]
    fn formats_points_with_separators() {
        assert_eq!(format_points(0), "0");
        assert_eq!(format_points(999), "999");
        assert_eq!(format_points(1_000), "1,000");
        assert_eq!(format_points(1_234_567), "1,234,567");
    }

    #[test]
    fn formats_window_bounds() {
        assert_eq!(format_window(&TimeWindow::ALL_TIME), "all recorded activity");
        let w = TimeWindow {
            start_unix: at(2021, 9, 20).timestamp(),
            end_unix: at(2022, 9, 19).timestamp(),
        };
        assert_eq!(format_window(&w), "Sep 20, 2021 → Sep 19, 2022");
    }

    #[test]
    fn placement_labels() {
        assert_eq!(placement_label(1), "1st");
        assert_eq!(placement_label(3), "3rd");
        assert_eq!(placement_label(11), "11th");
    }

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Zoë Quellington", 5), "Zoë …");
    }

    #[tokio::test]
    async fn menu_opens_on_current_selection_and_selects() {
        let now = at(2021, 11, 1);
        let mut app = app_at(now);
        app.handle_key(KeyCode::Char('t'), now);
        assert!(app.menu.open);
        // ["All Time", "2020-2021", "2021-2022"]
        assert_eq!(app.menu.cursor, 2);

        app.handle_key(KeyCode::Up, now);
        app.handle_key(KeyCode::Enter, now);
        assert!(!app.menu.open);
        assert_eq!(
            app.session.selector().selection(),
            &Selection::Period("2020-2021".to_string())
        );
    }

    #[tokio::test]
    async fn cursor_stays_in_bounds() {
        let now = at(2021, 11, 1);
        let mut app = app_at(now);
        app.handle_key(KeyCode::Enter, now);
        for _ in 0..10 {
            app.handle_key(KeyCode::Down, now);
        }
        assert_eq!(app.menu.cursor, 2);
        for _ in 0..10 {
            app.handle_key(KeyCode::Char('k'), now);
        }
        assert_eq!(app.menu.cursor, 0);
        app.handle_key(KeyCode::Esc, now);
        assert!(!app.menu.open);
    }

    #[tokio::test]
    async fn quit_key() {
        let now = at(2021, 11, 1);
        let mut app = app_at(now);
        app.handle_key(KeyCode::Char('q'), now);
        assert!(app.should_quit);
    }
}
