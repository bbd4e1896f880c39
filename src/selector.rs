use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::catalog::PeriodCatalog;
use crate::config::{ALL_TIME_LABEL, DEFAULT_LIMIT, DEFAULT_OFFSET};
use crate::error::Result;
use crate::ranking::partition;
use crate::timeframe::{initial_selection, resolve};
use crate::types::{FetchQuery, Partition, RankedUser, Selection, TimeWindow};

/// Identifies one issued fetch. Only the most recently issued tag is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTag(u64);

impl RequestTag {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

/// A fetch the caller must run and report back through [`TimeframeSelector::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub tag: RequestTag,
    pub selection: Selection,
    pub query: FetchQuery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    /// Waiting on the current request; nothing has been shown for this selection yet.
    Loading,
    Loaded(Partition),
    /// The current request was rejected. Rendered as an empty result.
    Failed,
}

/// Whether a reported outcome was applied or dropped as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Current,
    Stale,
}

/// Menu labels offered at `now`: `"All Time"` plus every period that has
/// already started, in catalog order.
pub fn selectable_labels(catalog: &PeriodCatalog, now: DateTime<Utc>) -> Vec<String> {
    catalog
        .all_period_names()
        .into_iter()
        .filter(|label| {
            if label == ALL_TIME_LABEL {
                return true;
            }
            match catalog.bounds(label) {
                Ok(period) => period.start < now,
                Err(e) => {
                    error!("Dropping menu entry: {e}");
                    false
                }
            }
        })
        .collect()
}

/// Timeframe selector state: `Idle(selection, window)` plus whatever the most
/// recent request produced. Every transition issues a new tagged request and
/// outcomes carrying any older tag are dropped, so the displayed list always
/// belongs to the displayed selection.
#[derive(Debug)]
pub struct TimeframeSelector {
    catalog: Arc<PeriodCatalog>,
    self_uuid: Option<String>,
    selection: Selection,
    window: TimeWindow,
    current: RequestTag,
    status: FetchStatus,
    notification: Option<String>,
}

impl TimeframeSelector {
    /// Opens on the period containing `now` (or all time) and returns the
    /// request for it.
    pub fn new(
        catalog: Arc<PeriodCatalog>,
        self_uuid: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(Self, FetchRequest)> {
        let selection = initial_selection(&catalog, now);
        let window = resolve(&catalog, &selection)?;
        info!(selection = %selection, window = %window, "Initial timeframe");

        let mut selector = Self {
            catalog,
            self_uuid,
            selection,
            window,
            current: RequestTag(0),
            status: FetchStatus::Loading,
            notification: None,
        };
        let request = selector.issue();
        Ok((selector, request))
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    pub fn notification(&self) -> Option<&str> {
        self.notification.as_deref()
    }

    pub fn self_uuid(&self) -> Option<&str> {
        self.self_uuid.as_deref()
    }

    pub fn timeframe_label(&self) -> &str {
        self.selection.label()
    }

    pub fn menu(&self, now: DateTime<Utc>) -> Vec<String> {
        selectable_labels(&self.catalog, now)
    }

    /// Switch to the period labelled `label`. Re-picking the active selection
    /// is a no-op (`Ok(None)`). An unknown label leaves the state untouched.
    pub fn select(&mut self, label: &str) -> Result<Option<FetchRequest>> {
        let selection = Selection::from_label(label);
        if selection == self.selection {
            return Ok(None);
        }
        let window = resolve(&self.catalog, &selection)?;
        info!(from = %self.selection, to = %selection, window = %window, "Timeframe changed");

        self.selection = selection;
        self.window = window;
        self.status = FetchStatus::Loading;
        Ok(Some(self.issue()))
    }

    /// Re-request the current window. Supersedes anything still in flight.
    pub fn refresh(&mut self) -> FetchRequest {
        self.status = FetchStatus::Loading;
        self.issue()
    }

    /// Report the outcome of a request. Outcomes for any tag other than the
    /// latest are discarded without touching state.
    pub fn apply(&mut self, tag: RequestTag, outcome: Result<Vec<RankedUser>>) -> Applied {
        if tag != self.current {
            debug!(seq = tag.seq(), current = self.current.seq(), "Discarding stale leaderboard response");
            return Applied::Stale;
        }

        match outcome {
            Ok(users) => {
                let partition = partition(&users, self.self_uuid.as_deref());
                info!(
                    seq = tag.seq(),
                    selection = %self.selection,
                    entries = partition.len(),
                    invalid = partition.invalid_count(),
                    "Leaderboard updated"
                );
                self.status = FetchStatus::Loaded(partition);
            }
            Err(e) => {
                warn!(seq = tag.seq(), selection = %self.selection, "Leaderboard fetch failed: {e}");
                self.status = FetchStatus::Failed;
                self.notification = Some(e.to_string());
            }
        }
        Applied::Current
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    fn issue(&mut self) -> FetchRequest {
        self.current = RequestTag(self.current.0 + 1);
        FetchRequest {
            tag: self.current,
            selection: self.selection.clone(),
            query: FetchQuery {
                offset: DEFAULT_OFFSET,
                limit: DEFAULT_LIMIT,
                window: self.window,
            },
        }
    }
}
