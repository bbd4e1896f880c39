use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::bridge::RankingSource;
use crate::catalog::PeriodCatalog;
use crate::config::CHANNEL_CAPACITY;
use crate::error::Result;
use crate::selector::{Applied, FetchRequest, RequestTag, TimeframeSelector};
use crate::types::RankedUser;

/// Result of one spawned fetch, routed back to the session owner.
#[derive(Debug)]
pub struct FetchOutcome {
    pub tag: RequestTag,
    pub result: Result<Vec<RankedUser>>,
}

/// Owns the selector and runs its fetches. Fetches execute as tokio tasks;
/// their outcomes come back over a channel and are applied by whoever owns
/// the session, so selector state is only ever touched from one place.
pub struct LeaderboardSession<S: RankingSource> {
    selector: TimeframeSelector,
    source: Arc<S>,
    outcome_tx: mpsc::Sender<FetchOutcome>,
    outcome_rx: mpsc::Receiver<FetchOutcome>,
}

impl<S: RankingSource> LeaderboardSession<S> {
    /// Builds the initial selector state and issues its first fetch.
    pub fn start(
        catalog: Arc<PeriodCatalog>,
        source: Arc<S>,
        self_uuid: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let (selector, request) = TimeframeSelector::new(catalog, self_uuid, now)?;
        let (outcome_tx, outcome_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let session = Self {
            selector,
            source,
            outcome_tx,
            outcome_rx,
        };
        session.spawn(request);
        Ok(session)
    }

    pub fn selector(&self) -> &TimeframeSelector {
        &self.selector
    }

    /// Select a menu label. Unknown labels are logged and otherwise ignored.
    pub fn select(&mut self, label: &str) {
        match self.selector.select(label) {
            Ok(Some(request)) => self.spawn(request),
            Ok(None) => {}
            Err(e) => error!(label, "Ignoring selection: {e}"),
        }
    }

    pub fn refresh(&mut self) {
        let request = self.selector.refresh();
        self.spawn(request);
    }

    pub fn dismiss_notification(&mut self) {
        self.selector.dismiss_notification();
    }

    /// Apply every outcome that has already arrived. Returns how many were
    /// current (not stale).
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            if self.selector.apply(outcome.tag, outcome.result) == Applied::Current {
                applied += 1;
            }
        }
        applied
    }

    fn spawn(&self, request: FetchRequest) {
        info!(
            seq = request.tag.seq(),
            selection = %request.selection,
            window = %request.query.window,
            "Fetching leaderboard"
        );
        let source = Arc::clone(&self.source);
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = source.fetch(request.query).await;
            let outcome = FetchOutcome { tag: request.tag, result };
            if tx.send(outcome).await.is_err() {
                debug!(seq = request.tag.seq(), "Session closed before fetch completed");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use tokio::sync::oneshot;

    use super::*;
    use crate::catalog::tests::{at, sample_catalog};
    use crate::error::AppError;
    use crate::ranking::tests::user;
    use crate::selector::FetchStatus;
    use crate::timeframe::resolve;
    use crate::types::{FetchQuery, Selection, TimeWindow};

    type Reply = Result<Vec<RankedUser>>;

    /// Holds each window's response until the test releases it.
    #[derive(Default)]
    struct GatedSource {
        gates: Mutex<HashMap<TimeWindow, oneshot::Receiver<Reply>>>,
    }

    impl GatedSource {
        fn gate(&self, window: TimeWindow) -> oneshot::Sender<Reply> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().insert(window, rx);
            tx
        }
    }

    impl RankingSource for GatedSource {
        async fn fetch(&self, query: FetchQuery) -> Result<Vec<RankedUser>> {
            let gate = self.gates.lock().unwrap().remove(&query.window);
            match gate {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(AppError::Fetch("gate dropped".to_string()))),
                None => Ok(Vec::new()),
            }
        }
    }

    /// Wait for the next outcome and apply it.
    async fn next_outcome<S: RankingSource>(session: &mut LeaderboardSession<S>) -> Option<Applied> {
        let outcome = session.outcome_rx.recv().await?;
        Some(session.selector.apply(outcome.tag, outcome.result))
    }

    fn window_of(label: &str) -> TimeWindow {
        resolve(&sample_catalog(), &Selection::from_label(label)).unwrap()
    }

    fn loaded_uuids<S: RankingSource>(session: &LeaderboardSession<S>) -> Vec<String> {
        match session.selector().status() {
            FetchStatus::Loaded(p) => p.podium.iter().chain(&p.rest).map(|s| s.uuid().to_string()).collect(),
            other => panic!("expected Loaded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn later_selection_wins_over_slow_earlier_one() {
        let source = Arc::new(GatedSource::default());
        let initial = source.gate(window_of("2021-2022"));
        let a = source.gate(window_of("2020-2021"));
        let b = source.gate(TimeWindow::ALL_TIME);

        let mut session =
            LeaderboardSession::start(Arc::new(sample_catalog()), Arc::clone(&source), None, at(2021, 11, 1))
                .unwrap();
        session.select("2020-2021");
        session.select("All Time");

        b.send(Ok(vec![user("b1", "90", "1"), user("b2", "80", "2")])).unwrap();
        assert_eq!(next_outcome(&mut session).await, Some(Applied::Current));

        a.send(Ok(vec![user("a1", "70", "1")])).unwrap();
        assert_eq!(next_outcome(&mut session).await, Some(Applied::Stale));

        initial.send(Ok(vec![user("i1", "60", "1")])).unwrap();
        assert_eq!(next_outcome(&mut session).await, Some(Applied::Stale));

        assert_eq!(session.selector().timeframe_label(), "All Time");
        assert_eq!(loaded_uuids(&session), vec!["b1", "b2"]);
    }

    #[tokio::test]
    async fn rejection_becomes_notification() {
        let source = Arc::new(GatedSource::default());
        let initial = source.gate(window_of("2021-2022"));
        let mut session =
            LeaderboardSession::start(Arc::new(sample_catalog()), source, None, at(2021, 11, 1)).unwrap();

        initial.send(Err(AppError::Fetch("Leaderboard unavailable".to_string()))).unwrap();
        assert_eq!(next_outcome(&mut session).await, Some(Applied::Current));
        assert_eq!(session.selector().status(), &FetchStatus::Failed);
        assert_eq!(session.selector().notification(), Some("Leaderboard unavailable"));

        session.dismiss_notification();
        assert!(session.selector().notification().is_none());
    }

    #[tokio::test]
    async fn unknown_label_issues_nothing() {
        let source = Arc::new(GatedSource::default());
        let initial = source.gate(window_of("2021-2022"));
        let mut session =
            LeaderboardSession::start(Arc::new(sample_catalog()), source, None, at(2021, 11, 1)).unwrap();
        session.select("not-a-period");
        assert_eq!(session.selector().timeframe_label(), "2021-2022");

        initial.send(Ok(vec![user("i1", "1", "1")])).unwrap();
        assert_eq!(next_outcome(&mut session).await, Some(Applied::Current));
        assert_eq!(loaded_uuids(&session), vec!["i1"]);
    }

    #[tokio::test]
    async fn drain_applies_ready_outcomes() {
        let source = Arc::new(GatedSource::default());
        let mut session =
            LeaderboardSession::start(Arc::new(sample_catalog()), source, None, at(2021, 11, 1)).unwrap();
        // ungated window answers immediately with an empty list
        while session.drain() == 0 {
            tokio::task::yield_now().await;
        }
        assert_eq!(session.selector().status(), &FetchStatus::Loaded(Default::default()));
    }
}
