use std::time::Duration;

use super::RankingSource;
use crate::error::Result;
use crate::types::{FetchQuery, RankedUser, TimeWindow};

const ROSTER: &[(&str, &str)] = &[
    ("Ada", "Lovelace"),
    ("Grace", "Hopper"),
    ("Alan", "Turing"),
    ("Barbara", "Liskov"),
    ("Edsger", "Dijkstra"),
    ("Frances", "Allen"),
    ("Donald", "Knuth"),
    ("Margaret", "Hamilton"),
    ("Ken", "Thompson"),
    ("Radia", "Perlman"),
    ("John", "Backus"),
    ("Shafi", "Goldwasser"),
];

/// Offline stand-in for the leaderboard API. Output is a pure function of the
/// window; latency varies per window so out-of-order responses actually occur
/// when flicking through the menu.
#[derive(Debug, Clone)]
pub struct DemoRankingSource {
    base_latency: Duration,
}

impl DemoRankingSource {
    pub fn new(base_latency: Duration) -> Self {
        Self { base_latency }
    }

    fn latency_for(&self, window: &TimeWindow) -> Duration {
        let jitter = (window.start_unix.rem_euclid(7) as u32) * 120;
        self.base_latency + Duration::from_millis(u64::from(jitter))
    }
}

impl Default for DemoRankingSource {
    fn default() -> Self {
        Self::new(Duration::from_millis(150))
    }
}

impl RankingSource for DemoRankingSource {
    async fn fetch(&self, query: FetchQuery) -> Result<Vec<RankedUser>> {
        tokio::time::sleep(self.latency_for(&query.window)).await;
        Ok(demo_leaderboard(&query.window))
    }
}

/// Deterministic roster for a window, best first. The unbounded window gets
/// everyone; bounded windows get a window-dependent subset and scores. One
/// row always carries a malformed `points` value.
pub fn demo_leaderboard(window: &TimeWindow) -> Vec<RankedUser> {
    let seed = (window.start_unix / 86_400).rem_euclid(97) as u64;
    let count = if window.is_unbounded() {
        ROSTER.len()
    } else {
        4 + (seed as usize % (ROSTER.len() - 3))
    };

    let mut scored: Vec<(usize, u64)> = ROSTER
        .iter()
        .enumerate()
        .map(|(i, _)| (i, (seed * 31 + i as u64 * 53) % 1_000 + 50))
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.truncate(count);

    scored
        .into_iter()
        .enumerate()
        .map(|(pos, (i, points))| {
            let (first, last) = ROSTER[i];
            let points = if pos == count / 2 {
                format!("{points}a")
            } else {
                points.to_string()
            };
            RankedUser {
                uuid: format!("00000000-0000-4000-8000-{i:012}"),
                first_name: first.to_string(),
                last_name: last.to_string(),
                profile_picture: String::new(),
                points,
                rank: (pos + 1).to_string(),
            }
        })
        .collect()
}
