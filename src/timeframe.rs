use chrono::{DateTime, Utc};

use crate::catalog::PeriodCatalog;
use crate::error::Result;
use crate::types::{Selection, TimeWindow};

/// Translate a selection into the window used to scope the leaderboard query.
///
/// A period's window runs from its own start up to the start of the next
/// period in the catalog, so activity during the gap between two periods
/// (summer) is credited to the earlier one. The last known period has no
/// successor and ends at its own `end`.
pub fn resolve(catalog: &PeriodCatalog, selection: &Selection) -> Result<TimeWindow> {
    let name = match selection {
        Selection::AllTime => return Ok(TimeWindow::ALL_TIME),
        Selection::Period(name) => name,
    };

    let this = catalog.bounds(name)?;
    let end = match catalog.successor(name)? {
        Some(next) => next.start,
        None => this.end,
    };

    Ok(TimeWindow {
        start_unix: this.start.timestamp(),
        end_unix: end.timestamp(),
    })
}

/// Selection shown when the leaderboard first opens: the period containing
/// `now`, or all time when `now` falls between or outside known periods.
pub fn initial_selection(catalog: &PeriodCatalog, now: DateTime<Utc>) -> Selection {
    catalog
        .current_period(now)
        .map(|p| Selection::Period(p.name.clone()))
        .unwrap_or(Selection::AllTime)
}
